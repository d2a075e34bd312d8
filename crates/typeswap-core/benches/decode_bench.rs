//! Criterion benchmarks for the per-keystroke hot path.
//!
//! Every key press runs decode → buffer mutation → suffix match against the
//! full snippet snapshot.  These benchmarks keep that path well under the
//! time between two keystrokes even for a few hundred snippets.
//!
//! Run with:
//! ```bash
//! cargo bench --package typeswap-core --bench decode_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use typeswap_core::{
    resolve_key, DeviceId, KeyCode, KeyEventDecoder, KeyValue, ModifierState, RawInputEvent,
    Snippet, TriggerBuffer,
};

// ── Fixtures ─────────────────────────────────────────────────────────────────

/// Key codes for "hello world" typed on a US layout (space included).
const HELLO_WORLD: &[KeyCode] = &[
    KeyCode::H,
    KeyCode::E,
    KeyCode::L,
    KeyCode::L,
    KeyCode::O,
    KeyCode::Space,
    KeyCode::W,
    KeyCode::O,
    KeyCode::R,
    KeyCode::L,
    KeyCode::D,
];

fn snippets(count: usize) -> Vec<Snippet> {
    (0..count)
        .map(|i| Snippet {
            id: i as i64,
            name: format!("snippet {i}"),
            trigger: Some(format!(";t{i}x")),
            content: "expansion".to_string(),
        })
        .collect()
}

// ── Benchmarks: decoding ─────────────────────────────────────────────────────

fn bench_resolve_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let shifted = ModifierState {
        shift: true,
        ..ModifierState::default()
    };

    group.bench_function("resolve_letter", |b| {
        b.iter(|| resolve_key(black_box(KeyCode::A), black_box(ModifierState::default())))
    });

    group.bench_function("resolve_shifted_symbol", |b| {
        b.iter(|| resolve_key(black_box(KeyCode::Digit1), black_box(shifted)))
    });

    group.bench_function("decode_press_release_11_keys", |b| {
        b.iter(|| {
            let mut decoder = KeyEventDecoder::new();
            for &code in HELLO_WORLD {
                for value in [KeyValue::Down, KeyValue::Up] {
                    let event = RawInputEvent::now(DeviceId(0), code.as_u16(), value);
                    black_box(decoder.decode(&event));
                }
            }
        })
    });

    group.finish();
}

// ── Benchmarks: trigger matching ─────────────────────────────────────────────

fn bench_trigger_feed(c: &mut Criterion) {
    let mut group = c.benchmark_group("trigger");

    for count in [10usize, 100, 500] {
        let snapshot = snippets(count);
        group.bench_with_input(BenchmarkId::new("feed_no_match", count), &snapshot, |b, snaps| {
            let mut buffer = TriggerBuffer::default();
            b.iter(|| buffer.feed(black_box(&'q'.into()), snaps))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve_key, bench_trigger_feed);
criterion_main!(benches);
