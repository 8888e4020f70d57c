//! Numeric line entry
//!
//! Characters arrive one at a time from a polled console. The editor keeps
//! only what could still become a valid decimal number, so the committed
//! text either parses or is rejected as a whole.

use heapless::String;

/// Maximum characters held by a [`NumberEntry`]
pub const ENTRY_CAPACITY: usize = 16;

/// Largest duty magnitude accepted from the operator (%)
pub const DUTY_LIMIT: f32 = 100.0;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;

/// Result of feeding one byte to the editor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EntryEvent {
    /// Byte appended or removed; entry still open
    Edited,
    /// Byte not allowed at this position; entry unchanged
    Ignored,
    /// Enter pressed on a parseable number
    Committed(f32),
    /// Enter pressed on text that is not a number (empty, `-`, `.`)
    Invalid,
}

/// Line editor for a single decimal number
#[derive(Debug, Clone, Default)]
pub struct NumberEntry {
    buffer: String<ENTRY_CAPACITY>,
}

impl NumberEntry {
    /// Create an empty entry
    pub const fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Text typed so far
    pub fn as_str(&self) -> &str {
        self.buffer.as_str()
    }

    /// Discard the current text
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Feed one received byte
    ///
    /// The buffer is cleared on commit, valid or not.
    pub fn push(&mut self, byte: u8) -> EntryEvent {
        match byte {
            b'0'..=b'9' => self.append(byte),
            b'-' if self.buffer.is_empty() => self.append(byte),
            b'.' if !self.buffer.contains('.') => self.append(byte),
            BACKSPACE | DELETE => {
                if self.buffer.pop().is_some() {
                    EntryEvent::Edited
                } else {
                    EntryEvent::Ignored
                }
            }
            b'\r' | b'\n' => {
                let parsed = self.buffer.parse::<f32>();
                self.buffer.clear();
                match parsed {
                    Ok(value) => EntryEvent::Committed(value),
                    Err(_) => EntryEvent::Invalid,
                }
            }
            _ => EntryEvent::Ignored,
        }
    }

    fn append(&mut self, byte: u8) -> EntryEvent {
        match self.buffer.push(byte as char) {
            Ok(()) => EntryEvent::Edited,
            Err(()) => EntryEvent::Ignored,
        }
    }
}

/// Limit an operator duty request to ±[`DUTY_LIMIT`]
pub fn clamp_duty(value: f32) -> f32 {
    value.clamp(-DUTY_LIMIT, DUTY_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(entry: &mut NumberEntry, text: &[u8]) -> EntryEvent {
        let mut last = EntryEvent::Ignored;
        for &b in text {
            last = entry.push(b);
        }
        last
    }

    #[test]
    fn test_commit_integer() {
        let mut entry = NumberEntry::new();
        assert_eq!(feed(&mut entry, b"42\r"), EntryEvent::Committed(42.0));
        assert_eq!(entry.as_str(), "");
    }

    #[test]
    fn test_duty_is_clamped() {
        let mut entry = NumberEntry::new();
        match feed(&mut entry, b"150\r") {
            EntryEvent::Committed(v) => assert_eq!(clamp_duty(v), 100.0),
            other => panic!("unexpected {:?}", other),
        }
        match feed(&mut entry, b"-250\n") {
            EntryEvent::Committed(v) => assert_eq!(clamp_duty(v), -100.0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_minus_only_at_start() {
        let mut entry = NumberEntry::new();
        assert_eq!(entry.push(b'-'), EntryEvent::Edited);
        assert_eq!(entry.push(b'3'), EntryEvent::Edited);
        assert_eq!(entry.push(b'-'), EntryEvent::Ignored);
        assert_eq!(entry.as_str(), "-3");
    }

    #[test]
    fn test_single_decimal_point() {
        let mut entry = NumberEntry::new();
        assert_eq!(feed(&mut entry, b"0.1.6"), EntryEvent::Edited);
        assert_eq!(entry.as_str(), "0.16");
        assert_eq!(entry.push(b'\r'), EntryEvent::Committed(0.16));
    }

    #[test]
    fn test_backspace_variants() {
        let mut entry = NumberEntry::new();
        feed(&mut entry, b"123");
        assert_eq!(entry.push(0x08), EntryEvent::Edited);
        assert_eq!(entry.push(0x7F), EntryEvent::Edited);
        assert_eq!(entry.as_str(), "1");
        entry.clear();
        assert_eq!(entry.push(0x08), EntryEvent::Ignored);
    }

    #[test]
    fn test_letters_ignored() {
        let mut entry = NumberEntry::new();
        assert_eq!(entry.push(b'a'), EntryEvent::Ignored);
        assert_eq!(entry.push(b' '), EntryEvent::Ignored);
        assert_eq!(entry.as_str(), "");
    }

    #[test]
    fn test_empty_or_sign_only_is_invalid() {
        let mut entry = NumberEntry::new();
        assert_eq!(entry.push(b'\r'), EntryEvent::Invalid);
        assert_eq!(feed(&mut entry, b"-\r"), EntryEvent::Invalid);
        assert_eq!(feed(&mut entry, b".\n"), EntryEvent::Invalid);
        // Editor is usable again after a rejected commit
        assert_eq!(feed(&mut entry, b"7\r"), EntryEvent::Committed(7.0));
    }

    #[test]
    fn test_capacity_limit() {
        let mut entry = NumberEntry::new();
        for _ in 0..ENTRY_CAPACITY {
            assert_eq!(entry.push(b'1'), EntryEvent::Edited);
        }
        assert_eq!(entry.push(b'1'), EntryEvent::Ignored);
        assert_eq!(entry.as_str().len(), ENTRY_CAPACITY);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;
        use std::format;

        proptest! {
            #[test]
            fn prop_committed_integers(value in -99_999i32..=99_999) {
                let mut entry = NumberEntry::new();
                let text = format!("{}\r", value);
                prop_assert_eq!(feed(&mut entry, text.as_bytes()), EntryEvent::Committed(value as f32));
            }

            #[test]
            fn prop_held_text_parses_or_is_partial(bytes in proptest::collection::vec(any::<u8>(), 0..40)) {
                let mut entry = NumberEntry::new();
                for b in bytes.into_iter().filter(|b| *b != b'\r' && *b != b'\n') {
                    entry.push(b);
                    let text = entry.as_str();
                    let partial = matches!(text, "" | "-" | "." | "-.");
                    prop_assert!(partial || text.parse::<f32>().is_ok(), "held {:?}", text);
                }
            }

            #[test]
            fn prop_clamped_duty_in_range(value in proptest::num::f32::NORMAL | proptest::num::f32::INFINITE) {
                prop_assert!(clamp_duty(value).abs() <= DUTY_LIMIT);
            }
        }
    }
}
