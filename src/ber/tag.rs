//! The identifier octets of a BER encoded value.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::fmt;
use super::error::Error;
use super::reader::Reader;


//------------ Class ---------------------------------------------------------

/// The class of a tag.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Class {
    /// Types defined by X.680 itself.
    Universal,

    /// Types specific to an application.
    Application,

    /// Types whose meaning depends on where they appear.
    ContextSpecific,

    /// Types defined by private agreement.
    Private,
}

impl Class {
    /// Returns the class encoded in bits 7 and 6 of an identifier octet.
    fn from_octet(octet: u8) -> Self {
        match octet >> 6 {
            0 => Class::Universal,
            1 => Class::Application,
            2 => Class::ContextSpecific,
            _ => Class::Private,
        }
    }

    /// Returns the name of the class as used in type descriptions.
    pub fn as_str(self) -> &'static str {
        match self {
            Class::Universal => "UNIVERSAL",
            Class::Application => "APPLICATION",
            Class::ContextSpecific => "CONTEXT-SPECIFIC",
            Class::Private => "PRIVATE",
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


//------------ Tag -----------------------------------------------------------

/// The tag of a BER encoded value.
///
/// Each BER encoded value starts with an identifier octet. It encodes both
/// the tag of the value as well as whether the value is primitive or
/// constructed. This type represents the tag, i.e., the class and the
/// number. Whether the value is constructed is returned separately by
/// [`take_from`][Self::take_from].
///
/// The universal types the decoder knows about are available as associated
/// constants.
///
/// # Limitations
///
/// Only single-octet identifiers are supported. That is, tag numbers range
/// from 0 to 30.
//
//  The tag is stored as the identifier octet with the constructed bit
//  cleared.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Tag(u8);

impl Tag {
    /// The bit marking a constructed value in the identifier octet.
    const CONSTRUCTED: u8 = 0x20;

    /// The bits of the identifier octet holding the tag number.
    const NUMBER: u8 = 0x1f;

    /// The tag marking the end of an indefinite length value, UNIVERSAL 0.
    pub const END_OF_CONTENT: Self = Tag(0x00);

    /// The tag for the BOOLEAN type, UNIVERSAL 1.
    pub const BOOLEAN: Self = Tag(0x01);

    /// The tag for the INTEGER type, UNIVERSAL 2.
    pub const INTEGER: Self = Tag(0x02);

    /// The tag for the BIT STRING type, UNIVERSAL 3.
    pub const BIT_STRING: Self = Tag(0x03);

    /// The tag for the OCTET STRING type, UNIVERSAL 4.
    pub const OCTET_STRING: Self = Tag(0x04);

    /// The tag for the NULL type, UNIVERSAL 5.
    pub const NULL: Self = Tag(0x05);

    /// The tag for the OBJECT IDENTIFIER type, UNIVERSAL 6.
    pub const OID: Self = Tag(0x06);

    /// The tag for the ENUMERATED type, UNIVERSAL 10.
    pub const ENUMERATED: Self = Tag(0x0a);

    /// The tag for the UTF8String type, UNIVERSAL 12.
    pub const UTF8_STRING: Self = Tag(0x0c);

    /// The tag for the RELATIVE-OID type, UNIVERSAL 13.
    pub const RELATIVE_OID: Self = Tag(0x0d);

    /// The tag for the SEQUENCE and SEQUENCE OF types, UNIVERSAL 16.
    pub const SEQUENCE: Self = Tag(0x10);

    /// The tag for the SET and SET OF types, UNIVERSAL 17.
    pub const SET: Self = Tag(0x11);

    /// The tag for the NumericString type, UNIVERSAL 18.
    pub const NUMERIC_STRING: Self = Tag(0x12);

    /// The tag for the PrintableString type, UNIVERSAL 19.
    pub const PRINTABLE_STRING: Self = Tag(0x13);

    /// The tag for the TeletexString type, UNIVERSAL 20.
    pub const TELETEX_STRING: Self = Tag(0x14);

    /// The tag for the IA5String type, UNIVERSAL 22.
    pub const IA5_STRING: Self = Tag(0x16);

    /// The tag for the UTCTime type, UNIVERSAL 23.
    pub const UTC_TIME: Self = Tag(0x17);

    /// The tag for the UniversalString type, UNIVERSAL 28.
    pub const UNIVERSAL_STRING: Self = Tag(0x1c);

    /// The tag for the BMPString type, UNIVERSAL 30.
    pub const BMP_STRING: Self = Tag(0x1e);
}

impl Tag {
    /// Creates a tag from a class and a number.
    ///
    /// Returns `None` if the number does not fit into a single identifier
    /// octet, i.e., if it is larger than 30.
    pub fn new(class: Class, number: u8) -> Option<Self> {
        if number >= Tag::NUMBER {
            return None
        }
        Some(Tag((class as u8) << 6 | number))
    }

    /// Takes a tag from the beginning of a reader.
    ///
    /// Upon success, returns both the tag and whether the value is
    /// constructed. If the tag number indicates the multi-octet form, which
    /// isn’t supported, fails with [`Error::InvalidFormat`].
    pub fn take_from<E>(
        reader: &mut Reader<E>
    ) -> Result<(Self, bool), Error> {
        let octet = reader.take_u8()?;
        if octet & Tag::NUMBER == Tag::NUMBER {
            xerr!(return Err(Error::InvalidFormat))
        }
        Ok((Tag(octet & !Tag::CONSTRUCTED), octet & Tag::CONSTRUCTED != 0))
    }

    /// Returns the class of the tag.
    pub fn class(self) -> Class {
        Class::from_octet(self.0)
    }

    /// Returns the tag number.
    pub fn number(self) -> u8 {
        self.0 & Tag::NUMBER
    }

    /// Returns whether the tag is of the universal class.
    pub fn is_universal(self) -> bool {
        self.class() == Class::Universal
    }

    /// Returns whether values with this tag must always be constructed.
    ///
    /// This is only true for SEQUENCE and SET.
    pub fn is_constructed_type(self) -> bool {
        self == Tag::SEQUENCE || self == Tag::SET
    }

    /// Returns whether the tag is one of the universal text types.
    ///
    /// Note that this does not include BIT STRING and OCTET STRING.
    pub fn is_text_type(self) -> bool {
        matches!(
            self,
            Tag::UTF8_STRING | Tag::NUMERIC_STRING | Tag::PRINTABLE_STRING
            | Tag::TELETEX_STRING | Tag::IA5_STRING | Tag::UNIVERSAL_STRING
            | Tag::BMP_STRING
        )
    }

    /// Returns whether values with this tag may be constructed in BER.
    pub fn can_be_constructed(self) -> bool {
        self.is_constructed_type()
        || self.is_text_type()
        || self == Tag::BIT_STRING
        || self == Tag::OCTET_STRING
    }

    /// Returns the name of a universal type the decoder knows about.
    pub fn universal_name(self) -> Option<&'static str> {
        let res = match self {
            Tag::END_OF_CONTENT => "End of Content",
            Tag::BOOLEAN => "Boolean",
            Tag::INTEGER => "Integer",
            Tag::BIT_STRING => "Bit String",
            Tag::OCTET_STRING => "Octet String",
            Tag::NULL => "Null",
            Tag::OID => "OID",
            Tag::ENUMERATED => "Enumeration",
            Tag::UTF8_STRING => "UTF-8 String",
            Tag::RELATIVE_OID => "Relative OID",
            Tag::SEQUENCE => "Sequence",
            Tag::SET => "Set",
            Tag::NUMERIC_STRING => "Numeric String",
            Tag::PRINTABLE_STRING => "Printable String",
            Tag::TELETEX_STRING => "Teletex String",
            Tag::IA5_STRING => "ASCII String",
            Tag::UTC_TIME => "UTC Time",
            Tag::UNIVERSAL_STRING => "UTF-32 String",
            Tag::BMP_STRING => "BMP String",
            _ => return None
        };
        Some(res)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.universal_name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{} {}", self.class(), self.number())
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag(0x{:02x})", self.0)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use super::super::reader::BigEndian;

    fn take(octet: u8) -> Result<(Tag, bool), Error> {
        Tag::take_from(&mut Reader::<BigEndian>::new(&[octet]))
    }

    #[test]
    fn identifier_octet() {
        assert_eq!(take(0x30), Ok((Tag::SEQUENCE, true)));
        assert_eq!(take(0x04), Ok((Tag::OCTET_STRING, false)));

        let (tag, constructed) = take(0xa3).unwrap();
        assert!(constructed);
        assert_eq!(tag.class(), Class::ContextSpecific);
        assert_eq!(tag.number(), 3);

        let (tag, constructed) = take(0x5e).unwrap();
        assert!(!constructed);
        assert_eq!(tag.class(), Class::Application);
        assert_eq!(tag.number(), 30);

        assert_eq!(take(0x1f), Err(Error::InvalidFormat));
        assert_eq!(take(0xff), Err(Error::InvalidFormat));
        assert_eq!(
            Tag::take_from(&mut Reader::<BigEndian>::new(b"")),
            Err(Error::OutOfBounds)
        );
    }

    #[test]
    fn new() {
        assert_eq!(Tag::new(Class::Universal, 16), Some(Tag::SEQUENCE));
        assert_eq!(
            Tag::new(Class::Private, 1).map(Tag::class), Some(Class::Private)
        );
        assert_eq!(Tag::new(Class::Universal, 31), None);
    }

    #[test]
    fn classification() {
        assert!(Tag::SET.is_constructed_type());
        assert!(!Tag::OCTET_STRING.is_constructed_type());
        assert!(Tag::BMP_STRING.is_text_type());
        assert!(!Tag::BIT_STRING.is_text_type());
        assert!(Tag::BIT_STRING.can_be_constructed());
        assert!(Tag::TELETEX_STRING.can_be_constructed());
        assert!(!Tag::BOOLEAN.can_be_constructed());
        assert!(!Tag::UTC_TIME.can_be_constructed());

        let ctx = Tag::new(Class::ContextSpecific, 16).unwrap();
        assert!(!ctx.is_constructed_type());
        assert!(!ctx.can_be_constructed());
    }

    #[test]
    fn display() {
        assert_eq!(Tag::UNIVERSAL_STRING.to_string(), "UTF-32 String");
        assert_eq!(Tag::IA5_STRING.to_string(), "ASCII String");
        assert_eq!(
            Tag::new(Class::Universal, 9).unwrap().to_string(),
            "UNIVERSAL 9"
        );
        assert_eq!(
            Tag::new(Class::ContextSpecific, 3).unwrap().to_string(),
            "CONTEXT-SPECIFIC 3"
        );
    }
}
