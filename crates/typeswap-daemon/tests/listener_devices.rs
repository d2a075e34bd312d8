//! Listener thread over a real `DeviceMultiplexer`.
//!
//! Keyboards are simulated with Unix socket pairs: the test writes 6-byte
//! key records (`code: u16`, `value: i32`, little-endian) to one end and the
//! multiplexer polls the other.  Closing the test's end looks like an unplug.

use std::io::{self, Read, Write};
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::net::UnixStream;
use std::time::{Duration, Instant, SystemTime};

use typeswap_core::{KeyCode, KeyValue, MemorySnippetStore};
use typeswap_daemon::application::emulate_input::VirtualKeyboard;
use typeswap_daemon::application::expand::{ExpansionOrchestrator, ExpansionSettings};
use typeswap_daemon::application::listen::{ExpansionSession, Listener};
use typeswap_daemon::infrastructure::clipboard::MemoryClipboard;
use typeswap_daemon::infrastructure::input_capture::multiplexer::DeviceMultiplexer;
use typeswap_daemon::infrastructure::input_capture::{KeyRecord, KeyboardDevice};
use typeswap_daemon::infrastructure::input_emulation::mock::MockKeyEmitter;

const POLL_TIMEOUT: Duration = Duration::from_millis(20);

struct SocketKeyboard {
    name: String,
    stream: UnixStream,
}

impl KeyboardDevice for SocketKeyboard {
    fn name(&self) -> &str {
        &self.name
    }

    fn raw_fd(&self) -> RawFd {
        self.stream.as_raw_fd()
    }

    fn read_key_records(&mut self) -> io::Result<Vec<KeyRecord>> {
        let mut buf = [0u8; 600];
        let n = self.stream.read(&mut buf)?;
        if n == 0 {
            return Err(io::Error::from_raw_os_error(libc::ENODEV));
        }
        Ok(buf[..n]
            .chunks_exact(6)
            .map(|c| KeyRecord {
                code: u16::from_le_bytes([c[0], c[1]]),
                value: i32::from_le_bytes([c[2], c[3], c[4], c[5]]),
                timestamp: SystemTime::now(),
            })
            .collect())
    }
}

/// The test's end of a simulated keyboard.
struct Plug(UnixStream);

impl Plug {
    fn tap(&mut self, code: KeyCode) {
        for value in [1i32, 0] {
            let mut record = code.as_u16().to_le_bytes().to_vec();
            record.extend_from_slice(&value.to_le_bytes());
            self.0.write_all(&record).unwrap();
        }
    }
}

fn keyboard(name: &str) -> (SocketKeyboard, Plug) {
    let (ours, theirs) = UnixStream::pair().unwrap();
    ours.set_nonblocking(true).unwrap();
    (
        SocketKeyboard {
            name: name.to_string(),
            stream: ours,
        },
        Plug(theirs),
    )
}

fn spawn_listener(
    devices: Vec<SocketKeyboard>,
    store: &MemorySnippetStore,
    emitter: &MockKeyEmitter,
) -> Listener {
    let keyboard = VirtualKeyboard::new(emitter.clone(), Duration::ZERO);
    let settings = ExpansionSettings {
        clipboard_settle: Duration::ZERO,
        restore_delay: Duration::ZERO,
        ..ExpansionSettings::default()
    };
    let orchestrator = ExpansionOrchestrator::new(keyboard, MemoryClipboard::new(), settings);
    let session = ExpansionSession::new(store.clone(), orchestrator, 50);
    Listener::spawn(DeviceMultiplexer::new(devices), session, POLL_TIMEOUT).unwrap()
}

fn wait_until(mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    check()
}

// ── Scenario D: unplugging one keyboard ───────────────────────────────────────

#[test]
fn test_unplugging_one_keyboard_leaves_the_other_working() {
    // Arrange: the trigger spans both keyboards, so a lost or repeated key
    // from either one breaks the match
    let store = MemorySnippetStore::new();
    store.insert("ok", Some("h;s"), "ok");
    let emitter = MockKeyEmitter::new();
    let (kbd_a, mut plug_a) = keyboard("a");
    let (kbd_b, mut plug_b) = keyboard("b");
    let mut listener = spawn_listener(vec![kbd_a, kbd_b], &store, &emitter);

    // Act: A types, B starts the trigger, A is unplugged, B finishes it
    plug_a.tap(KeyCode::H);
    std::thread::sleep(POLL_TIMEOUT * 3);
    plug_b.tap(KeyCode::Semicolon);
    std::thread::sleep(POLL_TIMEOUT * 3);
    drop(plug_a);
    std::thread::sleep(POLL_TIMEOUT * 3);
    plug_b.tap(KeyCode::S);
    let expanded = wait_until(|| emitter.down_codes().contains(&KeyCode::K));
    std::thread::sleep(POLL_TIMEOUT * 3);
    listener.stop();

    // Assert
    assert!(expanded);
    assert_eq!(
        emitter.events(),
        vec![
            (KeyCode::Backspace, KeyValue::Down),
            (KeyCode::Backspace, KeyValue::Up),
            (KeyCode::Backspace, KeyValue::Down),
            (KeyCode::Backspace, KeyValue::Up),
            (KeyCode::Backspace, KeyValue::Down),
            (KeyCode::Backspace, KeyValue::Up),
            (KeyCode::O, KeyValue::Down),
            (KeyCode::O, KeyValue::Up),
            (KeyCode::K, KeyValue::Down),
            (KeyCode::K, KeyValue::Up),
        ]
    );
}

#[test]
fn test_surviving_keyboard_keystrokes_are_not_repeated_after_unplug() {
    // Arrange: a repeated `;` would match ";;;s" first, a lost one nothing
    let store = MemorySnippetStore::new();
    store.insert("thrice", Some(";;;s"), "y");
    store.insert("twice", Some(";;s"), "x");
    let emitter = MockKeyEmitter::new();
    let (kbd_a, plug_a) = keyboard("a");
    let (kbd_b, mut plug_b) = keyboard("b");
    let mut listener = spawn_listener(vec![kbd_a, kbd_b], &store, &emitter);

    // Act
    plug_b.tap(KeyCode::Semicolon);
    std::thread::sleep(POLL_TIMEOUT * 3);
    drop(plug_a);
    std::thread::sleep(POLL_TIMEOUT * 3);
    plug_b.tap(KeyCode::Semicolon);
    plug_b.tap(KeyCode::S);
    let expanded = wait_until(|| !emitter.down_codes().is_empty());
    std::thread::sleep(POLL_TIMEOUT * 3);
    listener.stop();

    // Assert
    assert!(expanded);
    assert_eq!(
        emitter.down_codes(),
        vec![KeyCode::Backspace, KeyCode::Backspace, KeyCode::Backspace, KeyCode::X]
    );
}

#[test]
fn test_losing_every_keyboard_keeps_listener_alive_until_stopped() {
    // Arrange
    let store = MemorySnippetStore::new();
    let emitter = MockKeyEmitter::new();
    let (kbd, plug) = keyboard("only");
    let mut listener = spawn_listener(vec![kbd], &store, &emitter);

    // Act
    drop(plug);
    std::thread::sleep(POLL_TIMEOUT * 5);
    let alive = !listener.is_finished();
    let started = Instant::now();
    listener.stop();

    // Assert
    assert!(alive);
    assert!(listener.is_finished());
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_keys_from_two_keyboards_share_one_buffer() {
    // Arrange
    let store = MemorySnippetStore::new();
    store.insert("pair", Some("ab"), "c");
    let emitter = MockKeyEmitter::new();
    let (kbd_a, mut plug_a) = keyboard("a");
    let (kbd_b, mut plug_b) = keyboard("b");
    let mut listener = spawn_listener(vec![kbd_a, kbd_b], &store, &emitter);

    // Act
    plug_a.tap(KeyCode::A);
    std::thread::sleep(POLL_TIMEOUT * 3);
    plug_b.tap(KeyCode::B);
    let expanded = wait_until(|| emitter.down_codes().contains(&KeyCode::C));
    listener.stop();

    // Assert
    assert!(expanded);
    assert_eq!(
        emitter.down_codes(),
        vec![KeyCode::Backspace, KeyCode::Backspace, KeyCode::C]
    );
}
