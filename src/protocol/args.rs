//! Positional typed reads over a frame's argument fields.
//!
//! Handlers consume arguments left to right; every read advances the
//! cursor by one field. Reading past the last field or against the wrong
//! wire form fails with [`Error::MalformedArgument`] and never panics,
//! so a handler facing truncated input can answer with an error frame
//! and move on.
//!
//! Text forms are ASCII decimal (scientific notation accepted for the
//! floating kinds). Binary forms are fixed-width little-endian spans,
//! already unescaped by the tokenizer.

use bytes::Bytes;

use crate::error::{Error, Result};

use super::Frame;

/// Cursor over the argument fields of one frame.
#[derive(Debug)]
pub struct ArgReader<'a> {
    fields: &'a [Bytes],
    pos: usize,
}

impl<'a> ArgReader<'a> {
    /// Create a cursor positioned at the frame's first argument.
    pub fn new(frame: &'a Frame) -> Self {
        Self {
            fields: frame.args(),
            pos: 0,
        }
    }

    /// Number of arguments left to read.
    pub fn remaining(&self) -> usize {
        self.fields.len().saturating_sub(self.pos)
    }

    /// Advance to the next field, or fail with the position and the wire
    /// form the caller asked for.
    fn next(&mut self, expected: &'static str) -> Result<(usize, &'a [u8])> {
        let index = self.pos;
        match self.fields.get(index) {
            Some(field) => {
                self.pos += 1;
                Ok((index, field))
            }
            None => Err(Error::MalformedArgument { index, expected }),
        }
    }

    fn next_text(&mut self, expected: &'static str) -> Result<(usize, &'a str)> {
        let (index, raw) = self.next(expected)?;
        match std::str::from_utf8(raw) {
            Ok(text) => Ok((index, text)),
            Err(_) => Err(Error::MalformedArgument { index, expected }),
        }
    }

    /// Text bool: exactly `"0"` or `"1"`.
    pub fn read_bool(&mut self) -> Result<bool> {
        let (index, text) = self.next_text("bool")?;
        match text {
            "0" => Ok(false),
            "1" => Ok(true),
            _ => Err(Error::MalformedArgument {
                index,
                expected: "bool",
            }),
        }
    }

    /// Text 16-bit integer.
    pub fn read_i16(&mut self) -> Result<i16> {
        let (index, text) = self.next_text("int16")?;
        text.parse().map_err(|_| Error::MalformedArgument {
            index,
            expected: "int16",
        })
    }

    /// Text 32-bit integer.
    pub fn read_i32(&mut self) -> Result<i32> {
        let (index, text) = self.next_text("int32")?;
        text.parse().map_err(|_| Error::MalformedArgument {
            index,
            expected: "int32",
        })
    }

    /// Text single-precision float; plain or scientific notation.
    pub fn read_f32(&mut self) -> Result<f32> {
        let (index, text) = self.next_text("float")?;
        text.parse().map_err(|_| Error::MalformedArgument {
            index,
            expected: "float",
        })
    }

    /// Text double-precision float; plain or scientific notation.
    pub fn read_f64(&mut self) -> Result<f64> {
        let (index, text) = self.next_text("double")?;
        text.parse().map_err(|_| Error::MalformedArgument {
            index,
            expected: "double",
        })
    }

    /// Single-byte character field.
    pub fn read_char(&mut self) -> Result<u8> {
        let (index, raw) = self.next("char")?;
        if raw.len() != 1 {
            return Err(Error::MalformedArgument {
                index,
                expected: "char",
            });
        }
        Ok(raw[0])
    }

    /// String field as UTF-8 text.
    pub fn read_str(&mut self) -> Result<&'a str> {
        Ok(self.next_text("string")?.1)
    }

    /// Raw field bytes, whatever they hold.
    pub fn read_bytes(&mut self) -> Result<&'a [u8]> {
        Ok(self.next("bytes")?.1)
    }

    /// Binary bool: one byte, zero is false.
    pub fn read_bin_bool(&mut self) -> Result<bool> {
        let (index, raw) = self.next("binary bool")?;
        if raw.len() != 1 {
            return Err(Error::MalformedArgument {
                index,
                expected: "binary bool",
            });
        }
        Ok(raw[0] != 0)
    }

    /// Binary 16-bit integer, little-endian.
    pub fn read_bin_i16(&mut self) -> Result<i16> {
        let (index, raw) = self.next("binary int16")?;
        let bytes: [u8; 2] = raw.try_into().map_err(|_| Error::MalformedArgument {
            index,
            expected: "binary int16",
        })?;
        Ok(i16::from_le_bytes(bytes))
    }

    /// Binary 32-bit integer, little-endian.
    pub fn read_bin_i32(&mut self) -> Result<i32> {
        let (index, raw) = self.next("binary int32")?;
        let bytes: [u8; 4] = raw.try_into().map_err(|_| Error::MalformedArgument {
            index,
            expected: "binary int32",
        })?;
        Ok(i32::from_le_bytes(bytes))
    }

    /// Binary IEEE-754 single, little-endian.
    pub fn read_bin_f32(&mut self) -> Result<f32> {
        let (index, raw) = self.next("binary float")?;
        let bytes: [u8; 4] = raw.try_into().map_err(|_| Error::MalformedArgument {
            index,
            expected: "binary float",
        })?;
        Ok(f32::from_le_bytes(bytes))
    }

    /// Binary IEEE-754 double, little-endian.
    pub fn read_bin_f64(&mut self) -> Result<f64> {
        let (index, raw) = self.next("binary double")?;
        let bytes: [u8; 8] = raw.try_into().map_err(|_| Error::MalformedArgument {
            index,
            expected: "binary double",
        })?;
        Ok(f64::from_le_bytes(bytes))
    }

    /// Binary single-byte character.
    pub fn read_bin_char(&mut self) -> Result<u8> {
        let (index, raw) = self.next("binary char")?;
        if raw.len() != 1 {
            return Err(Error::MalformedArgument {
                index,
                expected: "binary char",
            });
        }
        Ok(raw[0])
    }
}
