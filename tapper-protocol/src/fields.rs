//! Structured frame body parser
//!
//! Parses the flat key/value object carried by a structured frame:
//!
//! ```text
//! { "key" : value , "key" : value }
//! ```
//!
//! Values are strings, unsigned decimal integers or `true`/`false`.
//! Nested objects, arrays, negative numbers and floats are rejected.
//! Unrecognized keys are skipped once their value has been validated.
//!
//! The parser works directly on the frame bytes and borrows from them;
//! nothing is copied or allocated.

use crate::decoder::DecodeError;

/// Known fields of a structured frame
///
/// Each field is `None` until its key appears. A repeated key keeps the
/// last value seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fields<'a> {
    /// Raw bytes of the `type` string (escapes are not expanded)
    pub kind: Option<&'a [u8]>,
    pub microstep: Option<u8>,
    pub direction_up: Option<bool>,
    pub steps: Option<u8>,
    pub period_ms: Option<u32>,
    pub seed: Option<u32>,
}

/// A single parsed value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Value<'a> {
    Str(&'a [u8]),
    Number(u64),
    Bool(bool),
}

impl<'a> Value<'a> {
    fn as_str(self) -> Result<&'a [u8], DecodeError> {
        match self {
            Value::Str(s) => Ok(s),
            _ => Err(DecodeError::Malformed),
        }
    }

    fn as_bool(self) -> Result<bool, DecodeError> {
        match self {
            Value::Bool(b) => Ok(b),
            _ => Err(DecodeError::Malformed),
        }
    }

    fn as_u8(self) -> Result<u8, DecodeError> {
        match self {
            Value::Number(n) => u8::try_from(n).map_err(|_| DecodeError::OutOfRange),
            _ => Err(DecodeError::Malformed),
        }
    }

    fn as_u32(self) -> Result<u32, DecodeError> {
        match self {
            Value::Number(n) => u32::try_from(n).map_err(|_| DecodeError::OutOfRange),
            _ => Err(DecodeError::Malformed),
        }
    }
}

/// Parse a complete frame body (from `{` up to, not including, the newline)
pub fn parse_fields(input: &[u8]) -> Result<Fields<'_>, DecodeError> {
    let mut cursor = Cursor { input, pos: 0 };
    let mut fields = Fields::default();

    cursor.skip_ws();
    cursor.expect(b'{')?;
    cursor.skip_ws();

    if cursor.peek() == Some(b'}') {
        cursor.pos += 1;
    } else {
        loop {
            let key = cursor.string()?;
            cursor.skip_ws();
            cursor.expect(b':')?;
            cursor.skip_ws();
            let value = cursor.value()?;
            fields.assign(key, value)?;
            cursor.skip_ws();

            match cursor.next() {
                Some(b',') => cursor.skip_ws(),
                Some(b'}') => break,
                _ => return Err(DecodeError::Malformed),
            }
        }
    }

    // Nothing but whitespace may follow the closing brace
    cursor.skip_ws();
    if cursor.peek().is_some() {
        return Err(DecodeError::Malformed);
    }

    Ok(fields)
}

impl<'a> Fields<'a> {
    fn assign(&mut self, key: &[u8], value: Value<'a>) -> Result<(), DecodeError> {
        match key {
            b"type" => self.kind = Some(value.as_str()?),
            b"microstep" => self.microstep = Some(value.as_u8()?),
            b"direction_up" => self.direction_up = Some(value.as_bool()?),
            b"steps" => self.steps = Some(value.as_u8()?),
            b"period_ms" => self.period_ms = Some(value.as_u32()?),
            b"seed" => self.seed = Some(value.as_u32()?),
            _ => {}
        }
        Ok(())
    }
}

/// Byte cursor over a frame body
struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn expect(&mut self, expected: u8) -> Result<(), DecodeError> {
        match self.next() {
            Some(b) if b == expected => Ok(()),
            _ => Err(DecodeError::Malformed),
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r')) {
            self.pos += 1;
        }
    }

    /// Quoted string; returns the raw bytes between the quotes
    fn string(&mut self) -> Result<&'a [u8], DecodeError> {
        self.expect(b'"')?;
        let start = self.pos;
        loop {
            match self.next() {
                Some(b'"') => return Ok(&self.input[start..self.pos - 1]),
                Some(b'\\') => match self.next() {
                    Some(b'"' | b'\\') => {}
                    _ => return Err(DecodeError::Malformed),
                },
                Some(_) => {}
                None => return Err(DecodeError::Malformed),
            }
        }
    }

    fn value(&mut self) -> Result<Value<'a>, DecodeError> {
        match self.peek() {
            Some(b'"') => Ok(Value::Str(self.string()?)),
            Some(b'0'..=b'9') => self.number(),
            Some(b't') => self.literal(b"true").map(|_| Value::Bool(true)),
            Some(b'f') => self.literal(b"false").map(|_| Value::Bool(false)),
            _ => Err(DecodeError::Malformed),
        }
    }

    fn number(&mut self) -> Result<Value<'a>, DecodeError> {
        let mut value: u64 = 0;
        while let Some(digit @ b'0'..=b'9') = self.peek() {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add((digit - b'0') as u64))
                .ok_or(DecodeError::OutOfRange)?;
            self.pos += 1;
        }
        Ok(Value::Number(value))
    }

    fn literal(&mut self, word: &[u8]) -> Result<(), DecodeError> {
        let end = self.pos + word.len();
        if self.input.get(self.pos..end) == Some(word) {
            self.pos = end;
            Ok(())
        } else {
            Err(DecodeError::Malformed)
        }
    }
}
