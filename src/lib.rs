//! A hardened decoder for ASN.1 BER and DER encoded data.
//!
//! The heart of this crate is the [`ber`] module. It decodes data encoded
//! according to the Basic Encoding Rules or the stricter Distinguished
//! Encoding Rules into a tree of values borrowing from the input. It is
//! meant for data from untrusted sources: every length, tag, and content
//! is checked and anything that doesn’t play by the rules is rejected
//! with an error rather than a panic.
//!
//! The [`charset`] module contains the transcoder used to turn the various
//! ASN.1 string types into UTF-8.
//!
//! The remaining modules make up the `asn1parse` command line tool. The
//! application itself, via `main.rs`, is only a very tiny frontend.

#[macro_use] mod debug;

pub use self::config::Config;
pub use self::error::{ExitError, Failed};
pub use self::operation::Operation;

pub mod ber;
pub mod charset;
pub mod config;
pub mod error;
pub mod input;
pub mod log;
pub mod operation;
pub mod output;
pub mod utils;

mod test;
