//! Converting text between character encodings.
//!
//! The decoder needs to turn the various string types of ASN.1 into UTF-8.
//! This module provides a small transcoder for the encodings involved. It
//! works incrementally: a call to [`Transcoder::convert`] converts as much
//! of its input as fits into the output and advances the input accordingly,
//! so long input can be processed in chunks of bounded size.

use std::{error, fmt, str};


//------------ Charset -------------------------------------------------------

/// A character encoding known to the transcoder.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Charset {
    /// UTF-8.
    Utf8,

    /// ISO 8859-1, each octet is the Unicode code point of the same value.
    Latin1,

    /// UTF-16 in network byte order.
    Utf16Be,

    /// UTF-32 in network byte order.
    Utf32Be,
}

impl Charset {
    pub fn as_str(self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Latin1 => "ISO-8859-1",
            Charset::Utf16Be => "UTF-16BE",
            Charset::Utf32Be => "UTF-32BE",
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


//------------ Transcoder ----------------------------------------------------

/// Converts text from one encoding into UTF-8.
#[derive(Clone, Copy, Debug)]
pub struct Transcoder {
    from: Charset,
}

impl Transcoder {
    /// Creates a transcoder between two encodings.
    ///
    /// Only UTF-8 is currently supported as the target.
    pub fn new(from: Charset, to: Charset) -> Result<Self, TranscodeError> {
        if to != Charset::Utf8 {
            return Err(TranscodeError::Unsupported)
        }
        Ok(Transcoder { from })
    }

    /// Returns the source encoding.
    pub fn from(&self) -> Charset {
        self.from
    }

    /// Converts input, appending to `output`.
    ///
    /// Characters are taken from the start of `input` and appended to
    /// `output` as long as its length stays within `capacity`. On return,
    /// `input` has been advanced past all characters that were converted.
    ///
    /// If a character doesn’t fit anymore, returns
    /// [`TranscodeError::OutputFull`]. The caller can make room and call
    /// again to continue. Malformed input results in
    /// [`TranscodeError::InvalidSequence`] and input that ends in the middle
    /// of a character in [`TranscodeError::IncompleteSequence`]. In both
    /// cases, `input` starts with the offending octets.
    pub fn convert(
        &self,
        input: &mut &[u8],
        output: &mut Vec<u8>,
        capacity: usize,
    ) -> Result<(), TranscodeError> {
        let mut buf = [0u8; 4];
        while !input.is_empty() {
            let (ch, len) = self.decode_char(input)?;
            let encoded = ch.encode_utf8(&mut buf).as_bytes();
            if output.len() + encoded.len() > capacity {
                return Err(TranscodeError::OutputFull)
            }
            output.extend_from_slice(encoded);
            *input = &input[len..];
        }
        Ok(())
    }

    /// Decodes the first character of non-empty `input`.
    ///
    /// Returns the character and the number of octets it occupies.
    fn decode_char(
        &self, input: &[u8]
    ) -> Result<(char, usize), TranscodeError> {
        match self.from {
            Charset::Utf8 => decode_utf8(input),
            Charset::Latin1 => Ok((char::from(input[0]), 1)),
            Charset::Utf16Be => decode_utf16be(input),
            Charset::Utf32Be => decode_utf32be(input),
        }
    }
}


//------------ Helper Functions ----------------------------------------------

fn decode_utf8(input: &[u8]) -> Result<(char, usize), TranscodeError> {
    // No character is longer than four octets.
    let probe = &input[..input.len().min(4)];
    let valid = match str::from_utf8(probe) {
        Ok(s) => s,
        Err(err) if err.valid_up_to() > 0 => {
            // The prefix up to valid_up_to() is valid UTF-8 by definition.
            str::from_utf8(&probe[..err.valid_up_to()]).map_err(|_| {
                TranscodeError::InvalidSequence
            })?
        }
        Err(err) => {
            return Err(match err.error_len() {
                Some(_) => TranscodeError::InvalidSequence,
                None => TranscodeError::IncompleteSequence,
            })
        }
    };
    match valid.chars().next() {
        Some(ch) => Ok((ch, ch.len_utf8())),
        None => Err(TranscodeError::IncompleteSequence)
    }
}

fn decode_utf16be(input: &[u8]) -> Result<(char, usize), TranscodeError> {
    let unit = |pos: usize| -> Result<u16, TranscodeError> {
        match input.get(pos..pos + 2) {
            Some(&[hi, lo]) => Ok(u16::from_be_bytes([hi, lo])),
            _ => Err(TranscodeError::IncompleteSequence)
        }
    };
    let first = unit(0)?;
    if (0xd800..0xdc00).contains(&first) {
        let second = unit(2)?;
        match char::decode_utf16([first, second]).next() {
            Some(Ok(ch)) => Ok((ch, 4)),
            _ => Err(TranscodeError::InvalidSequence)
        }
    }
    else {
        match char::from_u32(u32::from(first)) {
            Some(ch) => Ok((ch, 2)),
            None => Err(TranscodeError::InvalidSequence)
        }
    }
}

fn decode_utf32be(input: &[u8]) -> Result<(char, usize), TranscodeError> {
    let value = match input.get(..4) {
        Some(&[a, b, c, d]) => u32::from_be_bytes([a, b, c, d]),
        _ => return Err(TranscodeError::IncompleteSequence)
    };
    match char::from_u32(value) {
        Some(ch) => Ok((ch, 4)),
        None => Err(TranscodeError::InvalidSequence)
    }
}


//------------ TranscodeError ------------------------------------------------

/// Converting text has failed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TranscodeError {
    /// The requested pair of encodings is not supported.
    Unsupported,

    /// The input contains octets that are not valid in its encoding.
    InvalidSequence,

    /// The input ends in the middle of a character.
    IncompleteSequence,

    /// There is no more room in the output.
    OutputFull,
}

impl fmt::Display for TranscodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            TranscodeError::Unsupported => "unsupported conversion",
            TranscodeError::InvalidSequence => "invalid character sequence",
            TranscodeError::IncompleteSequence => {
                "incomplete character sequence"
            }
            TranscodeError::OutputFull => "output buffer full",
        })
    }
}

impl error::Error for TranscodeError { }


//============ Tests =========================================================
