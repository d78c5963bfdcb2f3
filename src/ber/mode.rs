//! Encoding rules and decoder options.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::fmt;
use std::str::FromStr;
use super::decode::Parser;
use super::error::Error;
use super::value::Value;


//------------ Mode ----------------------------------------------------------

/// The BER mode in use.
///
/// DER is a strict subset of BER. Data that decodes as DER also decodes
/// as BER, the reverse is not true.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Mode {
    /// Basic Encoding Rules.
    ///
    /// These are the most flexible rules, allowing alternative encodings for
    /// some types as well as indefinite length values.
    Ber,

    /// Distinguished Encoding Rules.
    ///
    /// These rules always employ definite length values and require the
    /// shortest possible encoding. Additional rules apply to some types.
    #[default]
    Der,
}

impl Mode {
    /// Returns whether the mode is DER.
    pub fn is_der(self) -> bool {
        matches!(self, Mode::Der)
    }

    /// Returns whether the mode is BER.
    pub fn is_ber(self) -> bool {
        matches!(self, Mode::Ber)
    }

    /// Returns the mode’s name as used in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Ber => "ber",
            Mode::Der => "der",
        }
    }

    /// Decodes exactly one value using the default options for this mode.
    ///
    /// The value has to cover all of `data`.
    pub fn decode(self, data: &[u8]) -> Result<Value<'_>, Error> {
        ParserOptions::new(self).decode(data)
    }
}

impl FromStr for Mode {
    type Err = InvalidMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ber" | "BER" => Ok(Mode::Ber),
            "der" | "DER" => Ok(Mode::Der),
            _ => Err(InvalidMode)
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


//------------ ParserOptions -------------------------------------------------

/// The options a decoder runs with.
///
/// The options are handed down to the decoding of nested values. Besides
/// the things a user can choose, they carry the current nesting depth which
/// is incremented for every level.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParserOptions {
    /// The encoding rules to follow.
    mode: Mode,

    /// Whether to reject UTF8String values with invalid UTF-8.
    ///
    /// This is on by default. Some certificates found in the wild carry
    /// invalid UTF-8 which can be accepted by switching it off.
    validate_utf8: bool,

    /// Whether to interpret TeletexString values as Latin-1 instead of T.61.
    treat_teletex_as_latin1: bool,

    /// The nesting level of the value being decoded.
    recursion_depth: usize,
}

impl ParserOptions {
    /// The maximum nesting level of values.
    ///
    /// A value at this level can still be decoded, a value nested one
    /// level deeper is rejected.
    pub const RECURSION_DEPTH_LIMIT: usize = 1024;

    /// Creates default options for the given mode.
    pub fn new(mode: Mode) -> Self {
        ParserOptions {
            mode,
            validate_utf8: true,
            treat_teletex_as_latin1: false,
            recursion_depth: 0,
        }
    }

    /// Creates default options for BER.
    pub fn ber() -> Self {
        Self::new(Mode::Ber)
    }

    /// Creates default options for DER.
    pub fn der() -> Self {
        Self::new(Mode::Der)
    }

    /// Sets whether UTF8String values are validated.
    pub fn with_validate_utf8(mut self, validate: bool) -> Self {
        self.validate_utf8 = validate;
        self
    }

    /// Sets whether TeletexString values are treated as Latin-1.
    pub fn with_teletex_as_latin1(mut self, latin1: bool) -> Self {
        self.treat_teletex_as_latin1 = latin1;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn validate_utf8(&self) -> bool {
        self.validate_utf8
    }

    pub fn treat_teletex_as_latin1(&self) -> bool {
        self.treat_teletex_as_latin1
    }

    pub fn recursion_depth(&self) -> usize {
        self.recursion_depth
    }

    /// Returns whether the nesting level is beyond the limit.
    pub fn is_too_deep(&self) -> bool {
        self.recursion_depth > Self::RECURSION_DEPTH_LIMIT
    }

    /// Returns the options for decoding values nested one level deeper.
    pub fn deeper(&self) -> Self {
        ParserOptions {
            recursion_depth: self.recursion_depth + 1,
            ..*self
        }
    }

    /// Decodes exactly one value covering all of `data`.
    pub fn decode(self, data: &[u8]) -> Result<Value<'_>, Error> {
        Parser::new(data, self).parse_all()
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

impl From<Mode> for ParserOptions {
    fn from(mode: Mode) -> Self {
        Self::new(mode)
    }
}


//------------ InvalidMode ---------------------------------------------------

/// A string did not name a known mode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InvalidMode;

impl fmt::Display for InvalidMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("expected 'ber' or 'der'")
    }
}

impl std::error::Error for InvalidMode { }


//============ Tests =========================================================
