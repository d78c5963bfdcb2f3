//! Decoding of data in Basic Encoding Rules.
//!
//! This module decodes data encoded in ASN.1’s _Basic Encoding Rules_ as
//! defined in ITU recommendation X.690 as well as their stricter companion,
//! the _Distinguished Encoding Rules._
//!
//! These rules encode data as a stream of nested values. Each value has an
//! indication of its type, called a [`Tag`], and is either primitive, in
//! which case it contains the actual data, or constructed, in which case it
//! contains a sequence of more values.
//!
//! The decoder is meant for data from untrusted sources. It checks
//! everything it decodes and rejects the whole value if anything is amiss.
//! What exactly it checks depends on the [`Mode`]: `Mode::Ber` is the most
//! general, `Mode::Der` additionally insists on canonical encoding. The
//! mode and a few more knobs are kept in [`ParserOptions`].
//!
//! Decoding happens through a [`Parser`] which produces [`Value`]s. Values
//! never copy data but borrow from the decoded octets:
//!
//! ```
//! use asn1parse::ber::{Mode, Tag};
//!
//! let data = b"\x30\x06\x05\x00\x05\x00\x05\x00";
//! let value = Mode::Der.decode(data).unwrap();
//! assert!(value.is_universal_type(Tag::SEQUENCE));
//! assert_eq!(value.as_constructed().unwrap().len(), 3);
//! ```
//!
//! Some universal types are interpreted by the decoder. A BOOLEAN becomes a
//! [`Boolean`], an OBJECT IDENTIFIER an [`OidValue`] holding an [`Oid`], the
//! text string types become [`TextData`], and UTCTime becomes a
//! [`UtcTimeValue`]. All other primitive values are kept as [`Generic`].
//!
//! The module also exports the [`Reader`] it uses for picking apart the
//! encoded data. It can be used for other binary formats that consist of
//! fixed-width integers and length-prefixed fields.

pub use self::decode::Parser;
pub use self::error::Error;
pub use self::length::Length;
pub use self::mode::{InvalidMode, Mode, ParserOptions};
pub use self::oid::{InvalidOid, Oid};
pub use self::reader::{BigEndian, Endian, LittleEndian, Reader};
pub use self::tag::{Class, Tag};
pub use self::text::TextData;
pub use self::time::UtcTime;
pub use self::value::{
    Boolean, Constructed, Generic, OidValue, UtcTimeValue, Value
};

mod decode;
mod error;
mod length;
mod mode;
mod oid;
mod reader;
mod tag;
mod text;
mod time;
mod value;
