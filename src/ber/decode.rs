//! The decoder.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use log::{debug, trace};
use super::error::Error;
use super::length::Length;
use super::mode::{Mode, ParserOptions};
use super::oid::Oid;
use super::reader::{BigEndian, Reader};
use super::tag::Tag;
use super::text::TextData;
use super::time::UtcTime;
use super::value::{
    Boolean, Constructed, Generic, OidValue, UtcTimeValue, Value
};


//------------ Parser --------------------------------------------------------

/// A decoder for a sequence of BER encoded values.
///
/// The parser decodes values one after another from the data it was given.
/// Each decoded value is checked completely: if any part of it violates the
/// rules of the selected mode, the whole value is rejected and nothing of
/// it is returned.
///
/// A failure with [`Error::InvalidFormat`] or [`Error::OutOfBounds`] leaves
/// the parser unusable since there is no way to know where the next value
/// would start. All further attempts fail with the same error. If
/// [`parse_all`][Self::parse_all] fails with [`Error::UnconsumedData`], the
/// failure is recorded but the parser can still be used to decode the
/// remaining data.
#[derive(Clone, Debug)]
pub struct Parser<'a> {
    reader: Reader<'a, BigEndian>,
    options: ParserOptions,

    /// The most recent failure.
    failure: Option<Error>,

    /// Whether decoding may continue.
    valid: bool,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given data.
    pub fn new(data: &'a [u8], options: ParserOptions) -> Self {
        Parser {
            reader: Reader::new(data),
            options,
            failure: None,
            valid: true,
        }
    }

    /// Decodes the next value.
    ///
    /// The value may be followed by more data. Use
    /// [`has_unconsumed_data`][Self::has_unconsumed_data] to find out.
    pub fn parse(&mut self) -> Result<Value<'a>, Error> {
        if !self.valid {
            let err = self.failure.unwrap_or(Error::InvalidFormat);
            debug!("Parser used after failing with {}.", err);
            return Err(err)
        }
        let start = self.reader.pos();
        // An end-of-content marker is only allowed inside a value.
        let res = match take_value(&mut self.reader, &self.options) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => xerr!(Err(Error::InvalidFormat)),
            Err(err) => Err(err)
        };
        if let Err(err) = res {
            trace!(
                "Rejected {} value at offset {}: {}.",
                self.options.mode(), start, err
            );
            self.valid = false;
            self.failure = Some(err);
        }
        res
    }

    /// Decodes exactly one value covering all remaining data.
    pub fn parse_all(&mut self) -> Result<Value<'a>, Error> {
        let res = self.parse()?;
        if self.reader.has_unconsumed_data() {
            trace!(
                "{} octets left after value.", self.reader.remaining()
            );
            self.failure = Some(Error::UnconsumedData);
            return Err(Error::UnconsumedData)
        }
        Ok(res)
    }

    /// Returns whether the parser can still be used.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns the most recent failure, if any.
    pub fn failure(&self) -> Option<Error> {
        self.failure
    }

    /// Returns whether there is data left to decode.
    pub fn has_unconsumed_data(&self) -> bool {
        self.reader.has_unconsumed_data()
    }

    /// Returns the offset of the next value in the data.
    pub fn pos(&self) -> usize {
        self.reader.pos()
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }
}


//------------ Decoding ------------------------------------------------------

/// Takes a single value from the reader.
///
/// Returns `Ok(None)` if the value is an end-of-content marker.
fn take_value<'a>(
    reader: &mut Reader<'a, BigEndian>,
    options: &ParserOptions,
) -> Result<Option<Value<'a>>, Error> {
    let (tag, constructed) = Tag::take_from(reader)?;
    if options.is_too_deep() {
        xerr!(return Err(Error::InvalidFormat))
    }
    let length = Length::take_from(reader, options.mode())?;

    if tag == Tag::END_OF_CONTENT {
        if constructed || !length.is_zero() {
            xerr!(return Err(Error::InvalidFormat))
        }
        return Ok(None)
    }

    let value = match length {
        Length::Definite(len) => {
            let body = reader.take_bytes(len)?;
            if constructed {
                take_constructed(tag, body, options)?
            }
            else {
                take_primitive(tag, body, options)?
            }
        }
        Length::Indefinite => {
            if !constructed {
                xerr!(return Err(Error::InvalidFormat))
            }
            take_indefinite(tag, reader, options)?
        }
    };
    Ok(Some(value))
}

/// Decodes a constructed value of definite length.
fn take_constructed<'a>(
    tag: Tag,
    body: &'a [u8],
    options: &ParserOptions,
) -> Result<Value<'a>, Error> {
    check_constructed(tag, options.mode())?;
    let mut elements = Elements::new(tag, options.mode());
    let nested = options.deeper();
    let mut reader = Reader::new(body);
    while reader.has_unconsumed_data() {
        // A nested value that runs past the end of our content is malformed
        // content rather than missing data.
        let value = match take_value(&mut reader, &nested) {
            Ok(Some(value)) => value,
            Ok(None) => xerr!(return Err(Error::InvalidFormat)),
            Err(Error::OutOfBounds) => {
                xerr!(return Err(Error::InvalidFormat))
            }
            Err(err) => return Err(err)
        };
        elements.push(value)?;
    }
    Ok(Value::Constructed(elements.finish(body)))
}

/// Decodes a constructed value of indefinite length.
///
/// The nested values are taken directly from `reader` until an
/// end-of-content marker is found. The content of the value covers
/// everything up to and including that marker.
fn take_indefinite<'a>(
    tag: Tag,
    reader: &mut Reader<'a, BigEndian>,
    options: &ParserOptions,
) -> Result<Value<'a>, Error> {
    check_constructed(tag, options.mode())?;
    let start = reader.pos();
    let mut elements = Elements::new(tag, options.mode());
    let nested = options.deeper();
    while let Some(value) = take_value(reader, &nested)? {
        elements.push(value)?;
    }
    Ok(Value::Constructed(elements.finish(reader.since(start))))
}

/// Checks that a value with this tag may be constructed.
///
/// SEQUENCE and SET always are. BER also allows the string types, BIT
/// STRING, and OCTET STRING to be constructed from segments. Tags of other
/// classes have no restrictions.
fn check_constructed(tag: Tag, mode: Mode) -> Result<(), Error> {
    if tag.is_universal()
        && !tag.is_constructed_type()
        && !(mode.is_ber() && tag.can_be_constructed())
    {
        xerr!(return Err(Error::InvalidFormat))
    }
    Ok(())
}

/// Decodes a primitive value.
fn take_primitive<'a>(
    tag: Tag,
    body: &'a [u8],
    options: &ParserOptions,
) -> Result<Value<'a>, Error> {
    if !tag.is_universal() {
        return Ok(Value::Generic(Generic::new(tag, body)))
    }
    if tag.is_constructed_type() {
        xerr!(return Err(Error::InvalidFormat))
    }
    match tag {
        Tag::BOOLEAN => {
            let octet = match *body {
                [octet] => octet,
                _ => xerr!(return Err(Error::InvalidFormat))
            };
            if options.mode().is_der() && octet != 0 && octet != 0xff {
                xerr!(return Err(Error::InvalidFormat))
            }
            Ok(Value::Boolean(Boolean::new(body)))
        }
        Tag::OID => {
            if !Oid(body).is_valid() {
                xerr!(return Err(Error::InvalidFormat))
            }
            Ok(Value::Oid(OidValue::new(body)))
        }
        Tag::UTC_TIME => {
            let time = UtcTime::parse(body, options.mode())?;
            Ok(Value::UtcTime(UtcTimeValue::new(body, time)))
        }
        Tag::NULL => {
            if !body.is_empty() {
                xerr!(return Err(Error::InvalidFormat))
            }
            Ok(Value::Generic(Generic::new(tag, body)))
        }
        _ if tag.is_text_type() => {
            let text = TextData::new(tag, body, options);
            if !text.validate() {
                xerr!(return Err(Error::InvalidFormat))
            }
            Ok(Value::Text(text))
        }
        _ => Ok(Value::Generic(Generic::new(tag, body)))
    }
}


//------------ Elements ------------------------------------------------------

/// Collects the nested values of a constructed value.
struct Elements<'a> {
    tag: Tag,
    values: Vec<Value<'a>>,

    /// Whether the values have to be in ascending order.
    ///
    /// DER requires this for the elements of a SET.
    ordered: bool,
}

impl<'a> Elements<'a> {
    fn new(tag: Tag, mode: Mode) -> Self {
        Elements {
            tag,
            values: Vec::new(),
            ordered: mode.is_der() && tag == Tag::SET,
        }
    }

    fn push(&mut self, value: Value<'a>) -> Result<(), Error> {
        if self.ordered {
            if let Some(last) = self.values.last() {
                if value.body() < last.body() {
                    xerr!(return Err(Error::InvalidFormat))
                }
            }
        }
        self.values.push(value);
        Ok(())
    }

    fn finish(self, body: &'a [u8]) -> Constructed<'a> {
        Constructed::new(self.tag, body, self.values)
    }
}


//============ Tests =========================================================
