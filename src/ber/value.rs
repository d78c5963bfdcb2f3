//! Decoded values.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::slice;
use super::oid::Oid;
use super::tag::{Class, Tag};
use super::text::TextData;
use super::time::UtcTime;


//------------ Value ---------------------------------------------------------

/// A decoded BER value.
///
/// Values never copy their content. They borrow the content octets from the
/// data they were decoded from, so they cannot outlive it. The nested values
/// of a constructed value borrow from the same data.
///
/// The variants distinguish the types the decoder interprets. Everything
/// else ends up as [`Value::Generic`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value<'a> {
    /// A value without special treatment.
    Generic(Generic<'a>),

    /// A value that consists of a sequence of nested values.
    Constructed(Constructed<'a>),

    /// A BOOLEAN.
    Boolean(Boolean<'a>),

    /// An OBJECT IDENTIFIER.
    Oid(OidValue<'a>),

    /// One of the text string types.
    Text(TextData<'a>),

    /// A UTCTime.
    UtcTime(UtcTimeValue<'a>),
}

impl<'a> Value<'a> {
    pub fn tag(&self) -> Tag {
        match *self {
            Value::Generic(ref inner) => inner.tag,
            Value::Constructed(ref inner) => inner.tag,
            Value::Boolean(_) => Tag::BOOLEAN,
            Value::Oid(_) => Tag::OID,
            Value::Text(ref inner) => inner.tag(),
            Value::UtcTime(_) => Tag::UTC_TIME,
        }
    }

    pub fn class(&self) -> Class {
        self.tag().class()
    }

    /// Returns whether the value was encoded in constructed form.
    pub fn is_constructed(&self) -> bool {
        matches!(*self, Value::Constructed(_))
    }

    /// Returns the content octets of the value.
    ///
    /// For a value of indefinite length, this includes the end-of-content
    /// value that terminated it.
    pub fn body(&self) -> &'a [u8] {
        match *self {
            Value::Generic(ref inner) => inner.body,
            Value::Constructed(ref inner) => inner.body,
            Value::Boolean(ref inner) => inner.body,
            Value::Oid(ref inner) => inner.oid.0,
            Value::Text(ref inner) => inner.body(),
            Value::UtcTime(ref inner) => inner.body,
        }
    }

    /// Returns whether the value is of the given universal type.
    pub fn is_universal_type(&self, tag: Tag) -> bool {
        tag.is_universal() && self.tag() == tag
    }

    /// Returns whether the value is of one of the universal text types.
    pub fn is_text(&self) -> bool {
        self.tag().is_text_type()
    }

    /// Returns a human readable description of the type of the value.
    ///
    /// Universal types known to the decoder have a name, all others are
    /// described by their class and tag number, e.g. `CONTEXT-SPECIFIC 0`.
    pub fn type_desc(&self) -> String {
        self.tag().to_string()
    }

    pub fn as_constructed(&self) -> Option<&Constructed<'a>> {
        match *self {
            Value::Constructed(ref inner) => Some(inner),
            _ => None
        }
    }

    pub fn as_boolean(&self) -> Option<&Boolean<'a>> {
        match *self {
            Value::Boolean(ref inner) => Some(inner),
            _ => None
        }
    }

    pub fn as_oid(&self) -> Option<&OidValue<'a>> {
        match *self {
            Value::Oid(ref inner) => Some(inner),
            _ => None
        }
    }

    pub fn as_text(&self) -> Option<&TextData<'a>> {
        match *self {
            Value::Text(ref inner) => Some(inner),
            _ => None
        }
    }

    pub fn as_utc_time(&self) -> Option<&UtcTimeValue<'a>> {
        match *self {
            Value::UtcTime(ref inner) => Some(inner),
            _ => None
        }
    }
}


//------------ Generic -------------------------------------------------------

/// A primitive value the decoder doesn’t interpret.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Generic<'a> {
    tag: Tag,
    body: &'a [u8],
}

impl<'a> Generic<'a> {
    pub(super) fn new(tag: Tag, body: &'a [u8]) -> Self {
        Generic { tag, body }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn body(&self) -> &'a [u8] {
        self.body
    }
}


//------------ Constructed ---------------------------------------------------

/// A value made up of nested values.
///
/// The elements are kept in the order they appear in the encoded data.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Constructed<'a> {
    tag: Tag,
    body: &'a [u8],
    elements: Vec<Value<'a>>,
}

impl<'a> Constructed<'a> {
    pub(super) fn new(
        tag: Tag, body: &'a [u8], elements: Vec<Value<'a>>
    ) -> Self {
        Constructed { tag, body, elements }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn body(&self) -> &'a [u8] {
        self.body
    }

    /// Returns the nested values.
    pub fn elements(&self) -> &[Value<'a>] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Value<'a>> {
        self.elements.iter()
    }
}

impl<'s, 'a> IntoIterator for &'s Constructed<'a> {
    type Item = &'s Value<'a>;
    type IntoIter = slice::Iter<'s, Value<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}


//------------ Boolean -------------------------------------------------------

/// A BOOLEAN value.
///
/// The content is exactly one octet. Any value other than zero is true.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Boolean<'a> {
    body: &'a [u8],
}

impl<'a> Boolean<'a> {
    pub(super) fn new(body: &'a [u8]) -> Self {
        Boolean { body }
    }

    pub fn get(&self) -> bool {
        self.body.first().map_or(false, |&octet| octet != 0)
    }
}


//------------ OidValue ------------------------------------------------------

/// An OBJECT IDENTIFIER value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OidValue<'a> {
    oid: Oid<&'a [u8]>,
}

impl<'a> OidValue<'a> {
    pub(super) fn new(body: &'a [u8]) -> Self {
        OidValue { oid: Oid(body) }
    }

    pub fn oid(&self) -> &Oid<&'a [u8]> {
        &self.oid
    }

    /// Returns the components of the identifier.
    pub fn components(&self) -> Option<Vec<u32>> {
        self.oid.components()
    }
}


//------------ UtcTimeValue --------------------------------------------------

/// A UTCTime value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UtcTimeValue<'a> {
    body: &'a [u8],
    time: UtcTime,
}

impl<'a> UtcTimeValue<'a> {
    pub(super) fn new(body: &'a [u8], time: UtcTime) -> Self {
        UtcTimeValue { body, time }
    }

    /// Returns the parsed date and time.
    pub fn time(&self) -> &UtcTime {
        &self.time
    }
}


//============ Tests =========================================================
