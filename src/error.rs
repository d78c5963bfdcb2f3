//! Error types used by the application.
//!
//! There are two error types that are used by the `asn1parse` tool. Neither
//! is used by the decoder itself which has its own, more precise error type
//! in [`ber::Error`][crate::ber::Error].
//!
//! The most important is [`Failed`]. This error indicates that an
//! operation had to be canceled for some reason and callers can assume
//! that all diagnostic information has been logged and they need not do
//! anything further.
//!
//! Secondly, [`ExitError`] is used when the program should be terminated. It
//! provides enough information to determine the exit code of the program.

use std::process;


//------------ Failed --------------------------------------------------------

/// An operation has failed to complete.
///
/// This error types is used to indicate that an operation has failed,
/// diagnostic information has been printed or logged, and the caller can’t
/// really do anything to recover.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Failed;


//------------ ExitError -----------------------------------------------------

/// An error happened that should lead to terminating the program.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExitError {
    /// Something has happened.
    ///
    /// This should be exit status 1.
    Generic,

    /// The input data could not be decoded.
    ///
    /// This should be exit status 2.
    Invalid,
}

impl ExitError {
    /// Returns the process exit code for the error.
    pub fn exit_code(self) -> i32 {
        match self {
            ExitError::Generic => 1,
            ExitError::Invalid => 2,
        }
    }

    /// Terminates the process with the exit code for the error.
    pub fn exit(self) -> ! {
        process::exit(self.exit_code())
    }
}

impl From<Failed> for ExitError {
    fn from(_: Failed) -> ExitError {
        ExitError::Generic
    }
}


//============ Tests =========================================================
