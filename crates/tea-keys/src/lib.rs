//! Byte-stream decoder for the ANSI/VT/xterm keyboard escape-sequence
//! grammar: prefix-overlapping CSI/SS3 sequences, timeout-based
//! disambiguation of a lone ESC, control bytes, and UTF-8 continuation.
//!
//! The byte source is abstracted behind [`ByteSource`] so the ESC
//! disambiguation timing can be driven deterministically in tests, without a
//! real TTY or a wall-clock sleep.

use std::io::{self, Read};
use std::time::Duration;

/// Default ESC-disambiguation window; overridable via `tea_config::Config`.
pub const DEFAULT_ESC_TIMEOUT: Duration = Duration::from_millis(50);

/// One decoded key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Canonical key name, e.g. `"a"`, `"up"`, `"ctrl+c"`, `"alt+x"`, `"esc"`.
    pub key: String,
    /// The literal UTF-8 runes that produced this key, when applicable
    /// (empty for named/control keys that carry no printable payload).
    pub runes: String,
    pub alt: bool,
}

impl KeyEvent {
    fn named(name: &str) -> Self {
        Self {
            key: name.to_string(),
            runes: String::new(),
            alt: false,
        }
    }

    fn rune(c: char) -> Self {
        Self {
            key: c.to_string(),
            runes: c.to_string(),
            alt: false,
        }
    }
}

/// Outcome of one [`ByteSource::read`] call.
pub enum ReadOutcome {
    Byte(u8),
    /// No byte arrived within the requested time budget.
    Timeout,
    Eof,
}

/// Abstracts "the next byte from stdin" so the parser's timing-sensitive ESC
/// disambiguation can be tested without real wall-clock delays.
pub trait ByteSource {
    /// `timeout = None` blocks indefinitely for the next byte (or EOF).
    /// `timeout = Some(d)` returns `Timeout` if no byte arrives within `d`.
    fn read(&mut self, timeout: Option<Duration>) -> io::Result<ReadOutcome>;
}

/// Reads raw bytes from real stdin. Readiness-within-timeout is checked with
/// `crossterm::event::poll`, which only waits on the file descriptor (it
/// does not consume bytes), leaving the actual read to plain [`std::io::Read`].
pub struct StdinSource {
    stdin: io::Stdin,
}

impl Default for StdinSource {
    fn default() -> Self {
        Self { stdin: io::stdin() }
    }
}

impl ByteSource for StdinSource {
    fn read(&mut self, timeout: Option<Duration>) -> io::Result<ReadOutcome> {
        if let Some(d) = timeout {
            let ready = crossterm::event::poll(d).map_err(io::Error::other)?;
            if !ready {
                return Ok(ReadOutcome::Timeout);
            }
        }
        let mut buf = [0u8; 1];
        match self.stdin.lock().read(&mut buf) {
            Ok(0) => Ok(ReadOutcome::Eof),
            Ok(_) => Ok(ReadOutcome::Byte(buf[0])),
            Err(e) => Err(e),
        }
    }
}

/// Reads exactly one key event from `source`, or `None` on EOF.
///
/// Blocks for at least one byte. Unknown escape sequences recover locally as
/// `KeyEvent{key: "unknown"}` rather than propagating an error — the spec's
/// `ParserOverflow` kind is local recovery, not a fatal condition.
pub fn read_key<S: ByteSource>(source: &mut S, esc_timeout: Duration) -> io::Result<Option<KeyEvent>> {
    let b = match source.read(None)? {
        ReadOutcome::Byte(b) => b,
        ReadOutcome::Eof => return Ok(None),
        ReadOutcome::Timeout => unreachable!("a blocking read cannot time out"),
    };

    if b == 0x1b {
        return Ok(Some(read_escape(source, esc_timeout)?));
    }
    if b == 0x20 {
        return Ok(Some(KeyEvent {
            key: "space".into(),
            runes: " ".into(),
            alt: false,
        }));
    }
    if b == 0x7f {
        return Ok(Some(KeyEvent::named("backspace")));
    }
    if b < 0x20 {
        return Ok(Some(control_key(b)));
    }
    if b >= 0x80 {
        return Ok(Some(read_utf8(source, b)?));
    }
    Ok(Some(KeyEvent::rune(b as char)))
}

fn control_key(b: u8) -> KeyEvent {
    match b {
        0x09 => KeyEvent::named("tab"),
        0x0d => KeyEvent::named("enter"),
        0x08 => KeyEvent::named("backspace"),
        0x01..=0x1a => {
            let c = (b - 1 + b'a') as char;
            KeyEvent::named(&format!("ctrl+{c}"))
        }
        _ => KeyEvent::named("unknown"),
    }
}

fn utf8_len(first: u8) -> usize {
    if first & 0xE0 == 0xC0 {
        2
    } else if first & 0xF0 == 0xE0 {
        3
    } else if first & 0xF8 == 0xF0 {
        4
    } else {
        1
    }
}

fn read_utf8<S: ByteSource>(source: &mut S, first: u8) -> io::Result<KeyEvent> {
    let len = utf8_len(first);
    let mut bytes = vec![first];
    for _ in 1..len {
        match source.read(None)? {
            ReadOutcome::Byte(b) => bytes.push(b),
            _ => break,
        }
    }
    let s = String::from_utf8_lossy(&bytes).into_owned();
    Ok(KeyEvent {
        key: s.clone(),
        runes: s,
        alt: false,
    })
}

/// After a lone ESC, disambiguate between a bare `esc` press, `alt+<rune>`,
/// and a CSI/SS3 escape sequence, per the spec's `esc_timeout` window.
fn read_escape<S: ByteSource>(source: &mut S, esc_timeout: Duration) -> io::Result<KeyEvent> {
    match source.read(Some(esc_timeout))? {
        ReadOutcome::Timeout | ReadOutcome::Eof => Ok(KeyEvent::named("esc")),
        ReadOutcome::Byte(b'[') => read_csi(source, esc_timeout),
        ReadOutcome::Byte(b'O') => read_ss3(source, esc_timeout),
        ReadOutcome::Byte(c) if (0x20..0x7f).contains(&c) => Ok(KeyEvent {
            key: (c as char).to_string(),
            runes: (c as char).to_string(),
            alt: true,
        }),
        ReadOutcome::Byte(_) => Ok(KeyEvent::named("unknown")),
    }
}

const CSI_OVERFLOW_GUARD: usize = 32;

fn read_ss3<S: ByteSource>(source: &mut S, esc_timeout: Duration) -> io::Result<KeyEvent> {
    match source.read(Some(esc_timeout))? {
        ReadOutcome::Byte(b) => Ok(decode_final(b, "", None)),
        _ => Ok(KeyEvent::named("unknown")),
    }
}

fn read_csi<S: ByteSource>(source: &mut S, esc_timeout: Duration) -> io::Result<KeyEvent> {
    let mut buf = Vec::new();
    loop {
        match source.read(Some(esc_timeout))? {
            ReadOutcome::Byte(b) => {
                buf.push(b);
                if (0x40..=0x7e).contains(&b) {
                    break;
                }
                if buf.len() >= CSI_OVERFLOW_GUARD {
                    return Ok(KeyEvent::named("unknown"));
                }
            }
            ReadOutcome::Timeout | ReadOutcome::Eof => return Ok(KeyEvent::named("unknown")),
        }
    }
    let final_byte = *buf.last().unwrap();
    let params = std::str::from_utf8(&buf[..buf.len() - 1]).unwrap_or("");
    let mut parts = params.split(';');
    let p1 = parts.next().unwrap_or("");
    let modifier = parts.next().and_then(|p| p.parse::<u8>().ok());

    if final_byte == b'~' {
        return Ok(decode_tilde(p1, modifier));
    }
    Ok(decode_final(final_byte, p1, modifier))
}

fn decode_final(final_byte: u8, _p1: &str, modifier: Option<u8>) -> KeyEvent {
    let name = match final_byte {
        b'A' => "up",
        b'B' => "down",
        b'C' => "right",
        b'D' => "left",
        b'H' => "home",
        b'F' => "end",
        b'P' => "f1",
        b'Q' => "f2",
        b'R' => "f3",
        b'S' => "f4",
        _ => return KeyEvent::named("unknown"),
    };
    apply_modifier(name, modifier)
}

fn decode_tilde(p1: &str, modifier: Option<u8>) -> KeyEvent {
    let name = match p1 {
        "1" | "7" => "home",
        "2" => "insert",
        "3" => "delete",
        "4" | "8" => "end",
        "5" => "pgup",
        "6" => "pgdown",
        "11" => "f1",
        "12" => "f2",
        "13" => "f3",
        "14" => "f4",
        "15" => "f5",
        "17" => "f6",
        "18" => "f7",
        "19" => "f8",
        "20" => "f9",
        "21" => "f10",
        "23" => "f11",
        "24" => "f12",
        _ => return KeyEvent::named("unknown"),
    };
    apply_modifier(name, modifier)
}

/// xterm modifier parameter: 2=shift, 3=alt, 4=shift+alt, 5=ctrl,
/// 6=shift+ctrl, 7=alt+ctrl, 8=shift+alt+ctrl.
fn apply_modifier(name: &str, modifier: Option<u8>) -> KeyEvent {
    let key = match modifier {
        Some(2) | Some(6) => format!("shift+{name}"),
        Some(3) | Some(4) | Some(7) | Some(8) => format!("alt+{name}"),
        Some(5) => format!("ctrl+{name}"),
        _ => name.to_string(),
    };
    let alt = matches!(modifier, Some(3) | Some(4) | Some(7) | Some(8));
    KeyEvent {
        key,
        runes: String::new(),
        alt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// A scripted byte source: each scheduled byte carries the simulated
    /// delay before it "arrives", letting tests exercise ESC disambiguation
    /// without a real clock.
    #[derive(Clone)]
    struct ScriptedSource {
        events: Arc<Mutex<VecDeque<(u8, Duration)>>>,
    }

    impl ScriptedSource {
        fn new(events: Vec<(u8, Duration)>) -> Self {
            Self {
                events: Arc::new(Mutex::new(events.into())),
            }
        }
    }

    impl ByteSource for ScriptedSource {
        fn read(&mut self, timeout: Option<Duration>) -> io::Result<ReadOutcome> {
            let mut events = self.events.lock().unwrap();
            match events.front() {
                None => Ok(ReadOutcome::Eof),
                Some((b, delay)) => {
                    if let Some(budget) = timeout
                        && *delay > budget
                    {
                        return Ok(ReadOutcome::Timeout);
                    }
                    let (b, _) = events.pop_front().unwrap();
                    Ok(ReadOutcome::Byte(b))
                }
            }
        }
    }

    #[test]
    fn lone_esc_after_silence_is_esc_key() {
        let mut src = ScriptedSource::new(vec![(0x1b, Duration::ZERO)]);
        let key = read_key(&mut src, Duration::from_millis(50)).unwrap().unwrap();
        assert_eq!(key.key, "esc");
    }

    #[test]
    fn esc_then_quick_printable_is_alt_rune() {
        let mut src = ScriptedSource::new(vec![
            (0x1b, Duration::ZERO),
            (b'a', Duration::from_millis(10)),
        ]);
        let key = read_key(&mut src, Duration::from_millis(50)).unwrap().unwrap();
        assert_eq!(key.key, "a");
        assert!(key.alt);
    }

    #[test]
    fn up_arrow_csi_sequence() {
        let mut src = ScriptedSource::new(vec![
            (0x1b, Duration::ZERO),
            (b'[', Duration::ZERO),
            (b'A', Duration::ZERO),
        ]);
        let key = read_key(&mut src, Duration::from_millis(50)).unwrap().unwrap();
        assert_eq!(key.key, "up");
    }

    #[test]
    fn ctrl_right_arrow_with_modifier() {
        let mut src = ScriptedSource::new(
            "\x1b[1;5C"
                .bytes()
                .map(|b| (b, Duration::ZERO))
                .collect(),
        );
        let key = read_key(&mut src, Duration::from_millis(50)).unwrap().unwrap();
        assert_eq!(key.key, "ctrl+right");
    }

    #[test]
    fn f1_via_ss3_sequence() {
        let mut src = ScriptedSource::new(
            "\x1bOP".bytes().map(|b| (b, Duration::ZERO)).collect(),
        );
        let key = read_key(&mut src, Duration::from_millis(50)).unwrap().unwrap();
        assert_eq!(key.key, "f1");
    }

    #[test]
    fn delete_via_tilde_sequence() {
        let mut src = ScriptedSource::new(
            "\x1b[3~".bytes().map(|b| (b, Duration::ZERO)).collect(),
        );
        let key = read_key(&mut src, Duration::from_millis(50)).unwrap().unwrap();
        assert_eq!(key.key, "delete");
    }

    #[test]
    fn control_a_through_z() {
        let mut src = ScriptedSource::new(vec![(0x01, Duration::ZERO)]);
        let key = read_key(&mut src, Duration::from_millis(50)).unwrap().unwrap();
        assert_eq!(key.key, "ctrl+a");
    }

    #[test]
    fn del_byte_is_backspace() {
        let mut src = ScriptedSource::new(vec![(0x7f, Duration::ZERO)]);
        let key = read_key(&mut src, Duration::from_millis(50)).unwrap().unwrap();
        assert_eq!(key.key, "backspace");
    }

    #[test]
    fn utf8_continuation_is_decoded() {
        let bytes: Vec<u8> = "界".bytes().collect();
        let mut src = ScriptedSource::new(bytes.into_iter().map(|b| (b, Duration::ZERO)).collect());
        let key = read_key(&mut src, Duration::from_millis(50)).unwrap().unwrap();
        assert_eq!(key.key, "界");
        assert_eq!(key.runes, "界");
    }

    #[test]
    fn eof_yields_none() {
        let mut src = ScriptedSource::new(vec![]);
        assert!(read_key(&mut src, Duration::from_millis(50)).unwrap().is_none());
    }

    #[test]
    fn unrecognized_csi_recovers_as_unknown() {
        let mut src = ScriptedSource::new(
            "\x1b[9zz".bytes().map(|b| (b, Duration::ZERO)).collect(),
        );
        let key = read_key(&mut src, Duration::from_millis(50)).unwrap().unwrap();
        assert_eq!(key.key, "unknown");
    }
}
