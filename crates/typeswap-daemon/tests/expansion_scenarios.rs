//! End-to-end expansion scenarios.
//!
//! Raw key events go through a full [`ExpansionSession`] (decoder, trigger
//! buffer, snippet store and orchestrator) and the synthetic output is
//! checked on a [`MockKeyEmitter`].  No devices, display or clipboard tools
//! are needed.

use std::time::Duration;

use typeswap_core::{DeviceId, KeyCode, KeyValue, RawInputEvent, SnippetStore};
use typeswap_daemon::application::emulate_input::VirtualKeyboard;
use typeswap_daemon::application::expand::{
    ExpansionOrchestrator, ExpansionReport, ExpansionSettings, InjectionStrategy,
};
use typeswap_daemon::application::listen::ExpansionSession;
use typeswap_daemon::infrastructure::clipboard::MemoryClipboard;
use typeswap_daemon::infrastructure::input_emulation::mock::MockKeyEmitter;
use typeswap_daemon::infrastructure::storage::snippets::SqliteSnippetStore;

// ── Helpers ───────────────────────────────────────────────────────────────────

struct Harness<S: SnippetStore> {
    session: ExpansionSession<S, MockKeyEmitter, MemoryClipboard>,
    emitter: MockKeyEmitter,
    clipboard: MemoryClipboard,
    reports: Vec<ExpansionReport>,
}

impl<S: SnippetStore> Harness<S> {
    fn new(store: S, clipboard: MemoryClipboard) -> Self {
        let emitter = MockKeyEmitter::new();
        let keyboard = VirtualKeyboard::new(emitter.clone(), Duration::ZERO);
        let settings = ExpansionSettings {
            clipboard_threshold: 50,
            clipboard_settle: Duration::ZERO,
            restore_delay: Duration::ZERO,
        };
        let orchestrator = ExpansionOrchestrator::new(keyboard, clipboard.clone(), settings);
        Self {
            session: ExpansionSession::new(store, orchestrator, 50),
            emitter,
            clipboard,
            reports: Vec::new(),
        }
    }

    fn key(&mut self, code: KeyCode, value: KeyValue) {
        let event = RawInputEvent::now(DeviceId(0), code.as_u16(), value);
        if let Some(result) = self.session.handle_event(&event) {
            self.reports.push(result.expect("expansion succeeds"));
        }
    }

    fn tap(&mut self, code: KeyCode) {
        self.key(code, KeyValue::Down);
        self.key(code, KeyValue::Up);
    }

    /// Types lowercase letters, digits, space and `;`.
    fn type_str(&mut self, text: &str) {
        for ch in text.chars() {
            let code = match ch {
                ' ' => KeyCode::Space,
                ';' => KeyCode::Semicolon,
                'a'..='z' => letter_code(ch),
                other => panic!("harness cannot type {other:?}"),
            };
            self.tap(code);
        }
    }
}

fn letter_code(ch: char) -> KeyCode {
    const LETTERS: [KeyCode; 26] = [
        KeyCode::A, KeyCode::B, KeyCode::C, KeyCode::D, KeyCode::E, KeyCode::F, KeyCode::G,
        KeyCode::H, KeyCode::I, KeyCode::J, KeyCode::K, KeyCode::L, KeyCode::M, KeyCode::N,
        KeyCode::O, KeyCode::P, KeyCode::Q, KeyCode::R, KeyCode::S, KeyCode::T, KeyCode::U,
        KeyCode::V, KeyCode::W, KeyCode::X, KeyCode::Y, KeyCode::Z,
    ];
    LETTERS[(ch as u8 - b'a') as usize]
}

// ── Scenario A: short content is typed ────────────────────────────────────────

#[test]
fn test_short_snippet_is_deleted_and_typed() {
    // Arrange
    let store = SqliteSnippetStore::open_in_memory().unwrap();
    store.add("signature", "Jane Doe", Some(";sig")).unwrap();
    let mut harness = Harness::new(store, MemoryClipboard::new());

    // Act
    harness.type_str("hello ;sig");

    // Assert
    assert_eq!(harness.reports.len(), 1);
    let report = &harness.reports[0];
    assert_eq!(report.backspaces, 4);
    assert_eq!(report.strategy, InjectionStrategy::Typed);
    assert_eq!(
        harness.emitter.down_codes(),
        vec![
            KeyCode::Backspace,
            KeyCode::Backspace,
            KeyCode::Backspace,
            KeyCode::Backspace,
            KeyCode::LeftShift,
            KeyCode::J,
            KeyCode::A,
            KeyCode::N,
            KeyCode::E,
            KeyCode::Space,
            KeyCode::LeftShift,
            KeyCode::D,
            KeyCode::O,
            KeyCode::E,
        ]
    );
    assert!(harness.session.buffer().is_empty());
    assert!(harness.clipboard.history().is_empty());
}

#[test]
fn test_every_synthetic_down_has_a_matching_up() {
    let store = SqliteSnippetStore::open_in_memory().unwrap();
    store.add("signature", "Jane Doe", Some(";sig")).unwrap();
    let mut harness = Harness::new(store, MemoryClipboard::new());

    harness.type_str(";sig");

    let events = harness.emitter.events();
    let downs = events.iter().filter(|(_, v)| *v == KeyValue::Down).count();
    let ups = events.iter().filter(|(_, v)| *v == KeyValue::Up).count();
    assert_eq!(downs, ups);
    assert_eq!(events.last(), Some(&(KeyCode::E, KeyValue::Up)));
}

#[test]
fn test_trigger_typed_twice_expands_twice() {
    let store = SqliteSnippetStore::open_in_memory().unwrap();
    store.add("signature", "x", Some(";sig")).unwrap();
    let mut harness = Harness::new(store, MemoryClipboard::new());

    harness.type_str(";sig ;sig");

    assert_eq!(harness.reports.len(), 2);
}

#[test]
fn test_snippet_without_trigger_never_expands() {
    let store = SqliteSnippetStore::open_in_memory().unwrap();
    store.add("note", "never typed", None).unwrap();
    store.add("blank", "never typed", Some("")).unwrap();
    let mut harness = Harness::new(store, MemoryClipboard::new());

    harness.type_str("note blank");

    assert!(harness.reports.is_empty());
    assert!(harness.emitter.events().is_empty());
}

// ── Scenario B: long content is pasted ────────────────────────────────────────

#[test]
fn test_long_snippet_is_pasted_and_clipboard_restored() {
    // Arrange
    let content: String = "The quick brown fox jumps over the lazy dog. "
        .chars()
        .cycle()
        .take(120)
        .collect();
    let store = SqliteSnippetStore::open_in_memory().unwrap();
    store.add("long", &content, Some(";long")).unwrap();
    let clipboard = MemoryClipboard::with_content("previous clipboard");
    let mut harness = Harness::new(store, clipboard);

    // Act
    harness.type_str(";long");

    // Assert
    assert_eq!(harness.reports.len(), 1);
    assert_eq!(
        harness.reports[0].strategy,
        InjectionStrategy::Pasted { restored: true }
    );
    assert_eq!(
        harness.clipboard.history(),
        vec![content, "previous clipboard".to_string()]
    );
    assert_eq!(
        harness.emitter.events()[10..],
        [
            (KeyCode::LeftCtrl, KeyValue::Down),
            (KeyCode::V, KeyValue::Down),
            (KeyCode::V, KeyValue::Up),
            (KeyCode::LeftCtrl, KeyValue::Up),
        ]
    );
    assert!(harness.session.buffer().is_empty());
}

#[test]
fn test_long_snippet_with_unwritable_clipboard_is_typed() {
    let content = "z".repeat(60);
    let store = SqliteSnippetStore::open_in_memory().unwrap();
    store.add("zs", &content, Some(";zz")).unwrap();
    let clipboard = MemoryClipboard::new();
    clipboard.fail_copy();
    let mut harness = Harness::new(store, clipboard);

    harness.type_str(";zz");

    assert_eq!(
        harness.reports[0].strategy,
        InjectionStrategy::TypedAfterClipboardFailure
    );
    let typed_z = harness
        .emitter
        .down_codes()
        .into_iter()
        .filter(|c| *c == KeyCode::Z)
        .count();
    assert_eq!(typed_z, 60);
}
