//! The length octets of a BER encoded value.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::mem;
use super::error::Error;
use super::mode::Mode;
use super::reader::Reader;


//------------ Length -------------------------------------------------------

/// The length octets of an encoded value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Length {
    /// A length value in definite form.
    ///
    /// Provides the actual length of the content in octets.
    Definite(usize),

    /// A length value in indefinite form.
    ///
    /// In this form, the end of a value is determined by an end-of-content
    /// value. Only BER allows this form.
    Indefinite
}

impl Length {
    /// Takes the length octets from the beginning of a reader.
    ///
    /// Which forms are acceptable depends on `mode`. DER rejects the
    /// indefinite form and demands that the long form is only used for
    /// lengths of 128 and more and with as few octets as possible.
    pub fn take_from<E>(
        reader: &mut Reader<E>, mode: Mode
    ) -> Result<Self, Error> {
        match reader.take_u8()? {
            // Reserved by X.690.
            0xff => xerr!(Err(Error::InvalidFormat)),

            // Bit 7 clear: other bits are the length
            n if (n & 0x80) == 0 => Ok(Length::Definite(usize::from(n))),

            // Bit 7 set: other bits are the number of octets that
            // encode the length. Unless they are all 0, in which case this
            // is the indefinite form.
            0x80 => {
                if mode.is_der() {
                    xerr!(return Err(Error::InvalidFormat))
                }
                Ok(Length::Indefinite)
            }
            n => {
                let count = usize::from(n & 0x7f);
                if count > mem::size_of::<usize>() {
                    xerr!(return Err(Error::InvalidFormat))
                }
                let mut len = 0usize;
                for &octet in reader.take_bytes(count)? {
                    len = len << 8 | usize::from(octet);
                }
                if mode.is_der() && (len < 0x80 || octet_len(len) != count) {
                    xerr!(return Err(Error::InvalidFormat))
                }
                Ok(Length::Definite(len))
            }
        }
    }

    /// Returns whether the length is definite and zero.
    pub fn is_zero(self) -> bool {
        matches!(self, Length::Definite(0))
    }
}


//------------ Helper Functions ----------------------------------------------

/// Returns the number of octets necessary to represent `len`.
fn octet_len(mut len: usize) -> usize {
    let mut res = 0;
    while len != 0 {
        len >>= 8;
        res += 1;
    }
    res
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use super::super::reader::BigEndian;

    fn take(data: &[u8], mode: Mode) -> Result<Length, Error> {
        let mut reader = Reader::<BigEndian>::new(data);
        let res = Length::take_from(&mut reader, mode)?;
        assert!(!reader.has_unconsumed_data());
        Ok(res)
    }

    #[test]
    fn short_form() {
        assert_eq!(take(b"\x00", Mode::Der), Ok(Length::Definite(0)));
        assert_eq!(take(b"\x7f", Mode::Der), Ok(Length::Definite(127)));
        assert!(take(b"\x00", Mode::Ber).unwrap().is_zero());
    }

    #[test]
    fn long_form() {
        assert_eq!(take(b"\x81\x80", Mode::Der), Ok(Length::Definite(128)));
        assert_eq!(
            take(b"\x82\x01\x00", Mode::Der), Ok(Length::Definite(256))
        );
        assert_eq!(
            take(b"\x84\x01\x02\x03\x04", Mode::Ber),
            Ok(Length::Definite(0x0102_0304))
        );

        // Should have been short form.
        assert_eq!(take(b"\x81\x01", Mode::Der), Err(Error::InvalidFormat));
        assert_eq!(take(b"\x81\x01", Mode::Ber), Ok(Length::Definite(1)));

        // Leading zero octet.
        assert_eq!(
            take(b"\x82\x00\xff", Mode::Der), Err(Error::InvalidFormat)
        );
        assert_eq!(
            take(b"\x82\x00\xff", Mode::Ber), Ok(Length::Definite(255))
        );
    }

    #[test]
    fn bad_forms() {
        assert_eq!(take(b"\xff", Mode::Ber), Err(Error::InvalidFormat));
        assert_eq!(
            take(b"\x8f\xff\xff\xff\xff\xff\xff\xff\xff\xff", Mode::Ber),
            Err(Error::InvalidFormat)
        );
        assert_eq!(take(b"\x83\x01\x00", Mode::Ber), Err(Error::OutOfBounds));
        assert_eq!(take(b"", Mode::Ber), Err(Error::OutOfBounds));
    }

    #[test]
    fn indefinite() {
        assert_eq!(take(b"\x80", Mode::Ber), Ok(Length::Indefinite));
        assert_eq!(take(b"\x80", Mode::Der), Err(Error::InvalidFormat));
        assert!(!Length::Indefinite.is_zero());
    }

    #[test]
    fn octet_lengths() {
        assert_eq!(octet_len(0), 0);
        assert_eq!(octet_len(0xff), 1);
        assert_eq!(octet_len(0x100), 2);
        assert_eq!(octet_len(usize::MAX), mem::size_of::<usize>());
    }
}
