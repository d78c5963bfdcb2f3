//! Decoding errors.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::{error, fmt};


//------------ Error ---------------------------------------------------------

/// Decoding of BER or DER encoded data has failed.
///
/// Error reporting is limited on purpose: the decoder runs against
/// untrusted input and only tells you which of three broad categories a
/// failure falls into. If you need to know more, build with the
/// `extra-debug` feature.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Error {
    /// The data violates a structural or semantic rule.
    ///
    /// This covers bad tags, bad length forms, failed type specific
    /// validation, and canonical ordering violations in DER.
    InvalidFormat,

    /// A read would have exceeded the available data.
    OutOfBounds,

    /// A value was decoded successfully but data is left over.
    UnconsumedData,
}

impl Error {
    /// Returns a short, static description of the error category.
    pub fn as_str(self) -> &'static str {
        match self {
            Error::InvalidFormat => "invalid format",
            Error::OutOfBounds => "out of bounds",
            Error::UnconsumedData => "unconsumed data",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl error::Error for Error { }
