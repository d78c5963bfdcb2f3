//! Text string values.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::str;
use crate::charset::{Charset, Transcoder, TranscodeError};
use super::mode::ParserOptions;
use super::tag::Tag;


//------------ TextData ------------------------------------------------------

/// A value of one of the universal text string types.
///
/// The value keeps the content octets together with the options the decoder
/// ran with since they determine how the octets are to be interpreted.
///
/// Only primitive strings are represented by this type. In BER, strings
/// may also be constructed from segments. These are left to the user to
/// put back together.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TextData<'a> {
    tag: Tag,
    body: &'a [u8],
    validate_utf8: bool,
    teletex_as_latin1: bool,
}

impl<'a> TextData<'a> {
    /// Size of the output chunks used when validating UTF-8.
    const VALIDATION_CHUNK: usize = 1024;

    /// Creates a new value from its parts.
    ///
    /// The tag should be one of the text types. The value is not validated.
    pub fn new(tag: Tag, body: &'a [u8], options: &ParserOptions) -> Self {
        TextData {
            tag,
            body,
            validate_utf8: options.validate_utf8(),
            teletex_as_latin1: options.treat_teletex_as_latin1(),
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn body(&self) -> &'a [u8] {
        self.body
    }

    /// Returns whether the content is valid for the string type.
    ///
    /// UniversalString and BMPString are always considered valid as X.680
    /// is unclear about which code points they may contain. UTF8String is
    /// only checked if UTF-8 validation is enabled. Tags that aren’t text
    /// types are never valid.
    pub fn validate(&self) -> bool {
        let body = self.body;
        match self.tag {
            Tag::UTF8_STRING => {
                !self.validate_utf8 || is_valid_utf8(body)
            }
            Tag::NUMERIC_STRING => body.iter().all(|&ch| is_numeric(ch)),
            Tag::PRINTABLE_STRING => body.iter().all(|&ch| is_printable(ch)),
            Tag::TELETEX_STRING => {
                self.teletex_as_latin1 || body.iter().all(|&ch| is_t61(ch))
            }
            Tag::IA5_STRING => body.is_ascii(),
            Tag::UNIVERSAL_STRING | Tag::BMP_STRING => true,
            _ => false
        }
    }

    /// Converts the content into a UTF-8 string.
    ///
    /// Any byte order mark in a UniversalString or BMPString is kept.
    pub fn to_utf8(&self) -> Result<String, TranscodeError> {
        if self.body.is_empty() {
            return Ok(String::new())
        }
        let charset = match self.tag {
            Tag::UTF8_STRING | Tag::NUMERIC_STRING
            | Tag::PRINTABLE_STRING | Tag::IA5_STRING => {
                return match str::from_utf8(self.body) {
                    Ok(s) => Ok(s.into()),
                    Err(_) => Err(TranscodeError::InvalidSequence)
                }
            }
            Tag::TELETEX_STRING if !self.teletex_as_latin1 => {
                return t61_to_utf8(self.body)
            }
            Tag::TELETEX_STRING => Charset::Latin1,
            Tag::UNIVERSAL_STRING => Charset::Utf32Be,
            Tag::BMP_STRING => Charset::Utf16Be,
            _ => return Err(TranscodeError::Unsupported)
        };

        // None of the encodings grows by more than a factor of two.
        let transcoder = Transcoder::new(charset, Charset::Utf8)?;
        let mut input = self.body;
        let mut output = Vec::with_capacity(self.body.len() * 2);
        transcoder.convert(&mut input, &mut output, self.body.len() * 2)?;
        String::from_utf8(output).map_err(|_| TranscodeError::InvalidSequence)
    }
}


//------------ Character Classes ---------------------------------------------

/// Returns whether a character is allowed in a NumericString.
fn is_numeric(ch: u8) -> bool {
    ch == b' ' || ch.is_ascii_digit()
}

/// Returns whether a character is allowed in a PrintableString.
///
/// These are the characters of table 10 of X.680 plus the asterisk which
/// isn’t allowed but appears in certificates anyway.
fn is_printable(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || b" '()+,-./:=?*".contains(&ch)
}

/// Returns whether a character is defined in T.61.
fn is_t61(ch: u8) -> bool {
    T61_TABLE[usize::from(ch)] != 0
}

/// Checks UTF-8 by converting it to UTF-8 in chunks of bounded size.
fn is_valid_utf8(data: &[u8]) -> bool {
    let transcoder = match Transcoder::new(Charset::Utf8, Charset::Utf8) {
        Ok(transcoder) => transcoder,
        Err(_) => return false
    };
    let mut input = data;
    let mut chunk = Vec::with_capacity(TextData::VALIDATION_CHUNK);
    loop {
        chunk.clear();
        match transcoder.convert(
            &mut input, &mut chunk, TextData::VALIDATION_CHUNK
        ) {
            Ok(()) => return true,
            Err(TranscodeError::OutputFull) => { }
            Err(_) => return false
        }
    }
}

/// Converts T.61 into UTF-8.
fn t61_to_utf8(data: &[u8]) -> Result<String, TranscodeError> {
    data.iter().map(|&ch| {
        let code = T61_TABLE[usize::from(ch)];
        if code == 0 {
            return Err(TranscodeError::InvalidSequence)
        }
        char::from_u32(u32::from(code)).ok_or(TranscodeError::InvalidSequence)
    }).collect()
}


//------------ T61_TABLE -----------------------------------------------------

/// The Unicode code point for each T.61 character.
///
/// Characters not defined by T.61 are marked with 0. The non-spacing
/// diacritical marks in 0xc0 to 0xcf are not supported.
static T61_TABLE: [u16; 256] = [
    0x0000, 0x0001, 0x0002, 0x0003, 0x0004, 0x0005, 0x0006, 0x0007,
    0x0008, 0x0009, 0x000a, 0x000b, 0x000c, 0x000d, 0x000e, 0x000f,
    0x0010, 0x0011, 0x0012, 0x0013, 0x0014, 0x0015, 0x0016, 0x0017,
    0x0018, 0x0019, 0x001a, 0x001b, 0x001c, 0x001d, 0x001e, 0x001f,
    0x0020, 0x0021, 0x0022, 0x0000, 0x0000, 0x0025, 0x0026, 0x0027,
    0x0028, 0x0029, 0x002a, 0x002b, 0x002c, 0x002d, 0x002e, 0x002f,
    0x0030, 0x0031, 0x0032, 0x0033, 0x0034, 0x0035, 0x0036, 0x0037,
    0x0038, 0x0039, 0x003a, 0x003b, 0x003c, 0x003d, 0x003e, 0x003f,
    0x0040, 0x0041, 0x0042, 0x0043, 0x0044, 0x0045, 0x0046, 0x0047,
    0x0048, 0x0049, 0x004a, 0x004b, 0x004c, 0x004d, 0x004e, 0x004f,
    0x0050, 0x0051, 0x0052, 0x0053, 0x0054, 0x0055, 0x0056, 0x0057,
    0x0058, 0x0059, 0x005a, 0x005b, 0x0000, 0x005d, 0x0000, 0x005f,
    0x0000, 0x0061, 0x0062, 0x0063, 0x0064, 0x0065, 0x0066, 0x0067,
    0x0068, 0x0069, 0x006a, 0x006b, 0x006c, 0x006d, 0x006e, 0x006f,
    0x0070, 0x0071, 0x0072, 0x0073, 0x0074, 0x0075, 0x0076, 0x0077,
    0x0078, 0x0079, 0x007a, 0x0000, 0x007c, 0x0000, 0x0000, 0x007f,
    0x0080, 0x0081, 0x0082, 0x0083, 0x0084, 0x0085, 0x0086, 0x0087,
    0x0088, 0x0089, 0x008a, 0x008b, 0x008c, 0x008d, 0x008e, 0x008f,
    0x0090, 0x0091, 0x0092, 0x0093, 0x0094, 0x0095, 0x0096, 0x0097,
    0x0098, 0x0099, 0x009a, 0x009b, 0x009c, 0x009d, 0x009e, 0x009f,
    0x0000, 0x00a1, 0x00a2, 0x00a3, 0x0024, 0x00a5, 0x0023, 0x00a7,
    0x00a4, 0x0000, 0x0000, 0x00ab, 0x0000, 0x0000, 0x0000, 0x0000,
    0x00b0, 0x00b1, 0x00b2, 0x00b3, 0x00d7, 0x00b5, 0x00b6, 0x00b7,
    0x00f7, 0x0000, 0x0000, 0x00bb, 0x00bc, 0x00bd, 0x00be, 0x00bf,
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000,
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000,
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000,
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000,
    0x2126, 0x00c6, 0x00d0, 0x00aa, 0x0126, 0x0000, 0x0132, 0x013f,
    0x0141, 0x00d8, 0x0152, 0x00ba, 0x00de, 0x0166, 0x014a, 0x0149,
    0x0138, 0x00e6, 0x0111, 0x00f0, 0x0127, 0x0131, 0x0133, 0x0140,
    0x0142, 0x00f8, 0x0153, 0x00df, 0x00fe, 0x0167, 0x014b, 0x0000,
];


//============ Tests =========================================================
