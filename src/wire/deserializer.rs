use std::str::{self, Utf8Error};

use thiserror::Error;

/// Errors raised while decoding a response buffer.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("needed {needed} more bytes but only {remaining} remain in the buffer")]
    UnexpectedEnd { needed: usize, remaining: usize },

    #[error("string payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),

    #[error("string terminator byte is {0:#04x}, expected 0x00")]
    UnterminatedString(u8),

    #[error("{0} bytes left over after decoding the full response")]
    TrailingBytes(usize),
}

/// Read cursor over one received response buffer.
///
/// Values are decoded in exactly the order the server serialized them; each
/// `parse_*` call advances the cursor past the bytes it consumed. Every read
/// is bounds checked: a read past the end of the buffer is a
/// [`WireError::UnexpectedEnd`], never a zero fill.
///
/// A well-formed response is consumed completely. Callers finish decoding
/// with [`Deserializer::finish`], which rejects trailing bytes.
#[derive(Debug)]
pub struct Deserializer<'a> {
    data: &'a [u8],
    cursor: usize,
}

impl<'a> Deserializer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, cursor: 0 }
    }

    pub fn parse_u8(&mut self) -> Result<u8, WireError> {
        Ok(u8::from_be_bytes(self.take::<1>()?))
    }

    pub fn parse_u16(&mut self) -> Result<u16, WireError> {
        Ok(u16::from_be_bytes(self.take::<2>()?))
    }

    pub fn parse_u32(&mut self) -> Result<u32, WireError> {
        Ok(u32::from_be_bytes(self.take::<4>()?))
    }

    pub fn parse_u64(&mut self) -> Result<u64, WireError> {
        Ok(u64::from_be_bytes(self.take::<8>()?))
    }

    pub fn parse_i8(&mut self) -> Result<i8, WireError> {
        Ok(i8::from_be_bytes(self.take::<1>()?))
    }

    pub fn parse_i16(&mut self) -> Result<i16, WireError> {
        Ok(i16::from_be_bytes(self.take::<2>()?))
    }

    pub fn parse_i32(&mut self) -> Result<i32, WireError> {
        Ok(i32::from_be_bytes(self.take::<4>()?))
    }

    pub fn parse_i64(&mut self) -> Result<i64, WireError> {
        Ok(i64::from_be_bytes(self.take::<8>()?))
    }

    pub fn parse_float(&mut self) -> Result<f32, WireError> {
        Ok(f32::from_be_bytes(self.take::<4>()?))
    }

    pub fn parse_double(&mut self) -> Result<f64, WireError> {
        Ok(f64::from_be_bytes(self.take::<8>()?))
    }

    /// Decodes a length-prefixed string: u16 byte length, UTF-8 payload, and
    /// one NUL terminator.
    ///
    /// The terminator is redundant with the length but is part of the wire
    /// format; it is always consumed and must be `0x00`.
    pub fn parse_string(&mut self) -> Result<String, WireError> {
        let size = self.parse_u16()? as usize;
        let bytes = self.parse_bytes(size)?;
        let terminator = self.parse_u8()?;
        if terminator != 0 {
            return Err(WireError::UnterminatedString(terminator));
        }
        Ok(str::from_utf8(bytes)?.to_owned())
    }

    /// Raw byte extraction; the primitive every typed read builds on.
    pub fn parse_bytes(&mut self, size: usize) -> Result<&'a [u8], WireError> {
        let remaining = self.remaining();
        if size > remaining {
            return Err(WireError::UnexpectedEnd {
                needed: size,
                remaining,
            });
        }
        let bytes = &self.data[self.cursor..self.cursor + size];
        self.cursor += size;
        Ok(bytes)
    }

    /// Bytes not yet consumed by the cursor.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Asserts the cursor consumed the whole buffer.
    ///
    /// A response with bytes left over does not match the schema it was
    /// decoded against and is a protocol error.
    pub fn finish(self) -> Result<(), WireError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(WireError::TrailingBytes(n)),
        }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let bytes = self.parse_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }
}
