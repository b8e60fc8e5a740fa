//! Inbound byte stream decoder
//!
//! Feeds one byte at a time and yields a [`Command`] whenever one is
//! complete. The first byte of each message selects the grammar:
//!
//! - `{` starts a structured frame, buffered until a newline
//! - anything else is a one-byte legacy token
//!
//! A frame that fails to parse, or grows past [`MAX_FRAME_LEN`] without a
//! newline, is discarded and reported as a [`DecodeError`]. The rest of an
//! oversized frame is dropped up to its newline; only then does the
//! decoder return to the idle state and classify bytes afresh.

use heapless::Vec;

use crate::command::Command;
use crate::fields::parse_fields;
use crate::legacy;

/// Structured frame start byte
pub const FRAME_START: u8 = b'{';

/// Structured frame terminator
pub const FRAME_END: u8 = b'\n';

/// Maximum structured frame length, counted from `{`, terminator excluded
pub const MAX_FRAME_LEN: usize = 128;

/// Errors that can occur while decoding a structured frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Frame body is not a well-formed key/value object
    Malformed,
    /// Frame exceeded the maximum length before a terminator arrived
    Overflow,
    /// A field required by the frame's `type` is absent
    MissingField,
    /// A numeric field does not fit its type
    OutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Between messages; next byte picks the grammar
    Idle,
    /// Accumulating a structured frame
    Framing,
    /// Dropping the tail of an oversized frame until its terminator
    Skipping,
}

/// State machine for decoding inbound commands
#[derive(Debug, Clone)]
pub struct Decoder {
    state: DecodeState,
    buffer: Vec<u8, MAX_FRAME_LEN>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self {
            state: DecodeState::Idle,
            buffer: Vec::new(),
        }
    }

    /// Reset the decoder, discarding any partial frame
    pub fn reset(&mut self) {
        self.state = DecodeState::Idle;
        self.buffer.clear();
    }

    /// Check if a structured frame is partially received
    ///
    /// Also true while the tail of an oversized frame is being dropped.
    pub fn is_framing(&self) -> bool {
        self.state != DecodeState::Idle
    }

    /// Number of bytes held for the current frame
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a single byte to the decoder
    ///
    /// Returns `Ok(Some(command))` when a command is complete,
    /// `Ok(None)` when more bytes are needed, or `Err` when a structured
    /// frame had to be discarded.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Command>, DecodeError> {
        match self.state {
            DecodeState::Idle => {
                if byte == FRAME_START {
                    self.buffer.clear();
                    // Cannot fail: buffer was just cleared
                    let _ = self.buffer.push(byte);
                    self.state = DecodeState::Framing;
                    Ok(None)
                } else {
                    Ok(Some(legacy::decode(byte)))
                }
            }
            DecodeState::Framing => {
                if byte == FRAME_END {
                    let result = Self::parse(&self.buffer);
                    self.reset();
                    return result.map(Some);
                }

                if self.buffer.push(byte).is_err() {
                    self.buffer.clear();
                    self.state = DecodeState::Skipping;
                    return Err(DecodeError::Overflow);
                }
                Ok(None)
            }
            DecodeState::Skipping => {
                if byte == FRAME_END {
                    self.state = DecodeState::Idle;
                }
                Ok(None)
            }
        }
    }

    /// Feed multiple bytes to the decoder
    ///
    /// Returns the first complete command (or error) found, together with
    /// the number of bytes consumed. Bytes after that point are untouched.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> (usize, Result<Option<Command>, DecodeError>) {
        for (i, &byte) in bytes.iter().enumerate() {
            match self.feed(byte) {
                Ok(None) => continue,
                result => return (i + 1, result),
            }
        }
        (bytes.len(), Ok(None))
    }

    fn parse(frame: &[u8]) -> Result<Command, DecodeError> {
        let body = frame.strip_suffix(b"\r").unwrap_or(frame);
        let fields = parse_fields(body)?;
        Command::from_fields(&fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decode_all(decoder: &mut Decoder, bytes: &[u8]) -> Result<Option<Command>, DecodeError> {
        let (used, result) = decoder.feed_bytes(bytes);
        assert_eq!(used, bytes.len(), "frame completed early");
        result
    }

    #[test]
    fn test_legacy_byte_consumed_alone() {
        let mut decoder = Decoder::new();
        let (used, result) = decoder.feed_bytes(b"et");
        assert_eq!(used, 1);
        assert_eq!(result, Ok(Some(Command::MotorEnable)));
        assert!(!decoder.is_framing());
    }

    #[test]
    fn test_structured_frame() {
        let mut decoder = Decoder::new();
        let result = decode_all(&mut decoder, b"{\"type\":\"set_stepsize\",\"microstep\":2}\n");
        assert_eq!(result, Ok(Some(Command::SetStepsize { microstep: 2 })));
        assert_eq!(decoder.buffered_len(), 0);
    }

    #[test]
    fn test_frame_split_across_feeds() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.feed_bytes(b"{\"type\":\"ar").1, Ok(None));
        assert!(decoder.is_framing());
        assert_eq!(decoder.feed_bytes(b"m_jog\",\"direction_up\":fal").1, Ok(None));
        let (_, result) = decoder.feed_bytes(b"se,\"steps\":4}\n");
        assert_eq!(
            result,
            Ok(Some(Command::ArmJog {
                direction_up: false,
                steps: 4
            }))
        );
    }

    #[test]
    fn test_crlf_terminator() {
        let mut decoder = Decoder::new();
        let result = decode_all(&mut decoder, b"{\"type\":\"motor_enable\"}\r\n");
        assert_eq!(result, Ok(Some(Command::MotorEnable)));
    }

    #[test]
    fn test_malformed_frame_then_legacy() {
        let mut decoder = Decoder::new();
        assert_eq!(
            decode_all(&mut decoder, b"{\"type\":\n"),
            Err(DecodeError::Malformed)
        );
        assert!(!decoder.is_framing());
        assert_eq!(decoder.feed(b't'), Ok(Some(Command::TapManual)));
    }

    #[test]
    fn test_overflow_then_legacy() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.feed(b'{'), Ok(None));
        for _ in 1..MAX_FRAME_LEN {
            assert_eq!(decoder.feed(b' '), Ok(None));
        }
        assert_eq!(decoder.buffered_len(), MAX_FRAME_LEN);
        assert_eq!(decoder.feed(b' '), Err(DecodeError::Overflow));
        assert_eq!(decoder.buffered_len(), 0);
        assert!(decoder.is_framing());
        assert_eq!(decoder.feed(FRAME_END), Ok(None));
        assert!(!decoder.is_framing());
        assert_eq!(decoder.feed(b'e'), Ok(Some(Command::MotorEnable)));
    }

    #[test]
    fn test_oversized_frame_tail_dropped() {
        let mut frame = std::vec::Vec::new();
        frame.extend_from_slice(b"{\"type\":\"arm_jog\",\"note\":\"");
        for _ in 0..16 {
            frame.extend_from_slice(b"tedrl12345");
        }
        frame.extend_from_slice(b"\",\"direction_up\":true,\"steps\":3}\n");
        assert!(frame.len() > MAX_FRAME_LEN + 1);

        let mut decoder = Decoder::new();
        let mut errors = 0;
        for &byte in &frame {
            match decoder.feed(byte) {
                Ok(None) => {}
                Ok(Some(command)) => panic!("command {:?} from a discarded frame", command),
                Err(e) => {
                    assert_eq!(e, DecodeError::Overflow);
                    errors += 1;
                }
            }
        }
        assert_eq!(errors, 1);
        assert!(!decoder.is_framing());
        assert_eq!(decoder.feed(b'e'), Ok(Some(Command::MotorEnable)));
    }

    #[test]
    fn test_reset_ends_skipping() {
        let mut decoder = Decoder::new();
        let _ = decoder.feed(b'{');
        for _ in 0..MAX_FRAME_LEN {
            let _ = decoder.feed(b'x');
        }
        assert!(decoder.is_framing());
        decoder.reset();
        assert_eq!(decoder.feed(b't'), Ok(Some(Command::TapManual)));
    }

    #[test]
    fn test_max_length_frame_accepted() {
        let mut frame = Vec::<u8, { MAX_FRAME_LEN + 1 }>::new();
        frame.extend_from_slice(b"{\"type\":\"tap_manual\"").unwrap();
        while frame.len() < MAX_FRAME_LEN - 1 {
            frame.push(b' ').unwrap();
        }
        frame.push(b'}').unwrap();
        frame.push(FRAME_END).unwrap();

        let mut decoder = Decoder::new();
        assert_eq!(decode_all(&mut decoder, &frame), Ok(Some(Command::TapManual)));
    }

    #[test]
    fn test_reset_discards_partial_frame() {
        let mut decoder = Decoder::new();
        decoder.feed_bytes(b"{\"type\"");
        decoder.reset();
        assert!(!decoder.is_framing());
        assert_eq!(decoder.feed(b'd'), Ok(Some(Command::MotorDisable)));
    }

    fn any_command() -> impl Strategy<Value = Command> {
        prop_oneof![
            Just(Command::Unknown),
            Just(Command::RunStart),
            Just(Command::RunStop),
            Just(Command::TapManual),
            Just(Command::MotorEnable),
            Just(Command::MotorDisable),
            (any::<bool>(), any::<u8>()).prop_map(|(direction_up, steps)| Command::ArmJog {
                direction_up,
                steps
            }),
            any::<u8>().prop_map(|microstep| Command::SetStepsize { microstep }),
            any::<u32>().prop_map(|value| Command::Seed { value }),
        ]
    }

    proptest! {
        #[test]
        fn prop_structured_roundtrip(command in any_command()) {
            let frame = command.to_frame().unwrap();
            let mut decoder = Decoder::new();
            let (used, result) = decoder.feed_bytes(&frame);
            prop_assert_eq!(used, frame.len());
            prop_assert_eq!(result, Ok(Some(command)));
        }
    }
}
