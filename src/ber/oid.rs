//! Object Identifiers.
//!
//! This is a private module. Its public content is re-exported by the parent.

use std::{error, fmt};
use std::str::FromStr;


//------------ Oid -----------------------------------------------------------

/// An object identifier.
///
/// The type keeps the identifier in its encoded form, i.e., the content
/// octets of a BER encoded OBJECT IDENTIFIER value. The first two
/// components are packed into the first octet as `40 * c0 + c1`, all
/// further components follow in base 128 with the most significant group
/// first and bit 7 set on all but the last octet of each component.
///
/// Since the octets may come from anywhere, an `Oid` is not necessarily
/// valid. Use [`components`][Self::components] or
/// [`is_valid`][Self::is_valid] to check. Components are limited to `u32`;
/// an encoding with a component that doesn’t fit is considered invalid.
#[derive(Clone, Debug)]
pub struct Oid<T: AsRef<[u8]> = Vec<u8>>(pub T);

impl Oid<Vec<u8>> {
    /// Encodes an object identifier from its components.
    ///
    /// At least two components have to be given and the first two have to
    /// fit into a single octet, i.e., the second component has to be less
    /// than 40 and `40 * c0 + c1` must not exceed 255. Returns an error
    /// otherwise.
    pub fn from_components(components: &[u32]) -> Result<Self, InvalidOid> {
        let (first, second, tail) = match *components {
            [first, second, ref tail @ ..] => (first, second, tail),
            _ => return Err(InvalidOid)
        };
        if second >= 40 {
            return Err(InvalidOid)
        }
        let head = u64::from(first) * 40 + u64::from(second);
        let head = u8::try_from(head).map_err(|_| InvalidOid)?;

        let mut res = Vec::with_capacity(1 + tail.len() * 2);
        res.push(head);
        for &id in tail {
            push_component(&mut res, id)
        }
        Ok(Oid(res))
    }
}

impl<T: AsRef<[u8]>> Oid<T> {
    /// Returns the encoded form.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns whether the encoding is a valid object identifier.
    pub fn is_valid(&self) -> bool {
        self.components().is_some()
    }

    /// Decodes the components of the identifier.
    ///
    /// Returns `None` if the encoding is empty, if a component does not
    /// fit into a `u32`, or if the last octet announces more to come.
    pub fn components(&self) -> Option<Vec<u32>> {
        let (&first, mut tail) = self.as_slice().split_first()?;
        let mut res = Vec::with_capacity(2 + tail.len());
        res.push(u32::from(first / 40));
        res.push(u32::from(first % 40));
        while !tail.is_empty() {
            let (id, rest) = take_component(tail)?;
            res.push(id);
            tail = rest;
        }
        Some(res)
    }
}

impl<T: AsRef<[u8]>> AsRef<[u8]> for Oid<T> {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl<T: AsRef<[u8]>, U: AsRef<[u8]>> PartialEq<U> for Oid<T> {
    fn eq(&self, other: &U) -> bool {
        self.0.as_ref() == other.as_ref()
    }
}

impl<T: AsRef<[u8]>> Eq for Oid<T> { }

impl FromStr for Oid<Vec<u8>> {
    type Err = InvalidOid;

    /// Parses an identifier in dotted notation, e.g., `1.2.840.113549`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components = s.split('.').map(|item| {
            u32::from_str(item).map_err(|_| InvalidOid)
        }).collect::<Result<Vec<_>, _>>()?;
        Self::from_components(&components)
    }
}

impl<T: AsRef<[u8]>> fmt::Display for Oid<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let components = match self.components() {
            Some(components) => components,
            None => return f.write_str("[invalid OID]")
        };
        let mut components = components.into_iter();
        if let Some(first) = components.next() {
            write!(f, "{}", first)?;
        }
        for id in components {
            write!(f, ".{}", id)?;
        }
        Ok(())
    }
}


//------------ Helper Functions ----------------------------------------------

/// Takes one base 128 component from the beginning of `data`.
///
/// Returns the component and the remaining data.
fn take_component(data: &[u8]) -> Option<(u32, &[u8])> {
    let mut res = 0u32;
    for (idx, &octet) in data.iter().enumerate() {
        if res > u32::MAX >> 7 {
            return None
        }
        res = res << 7 | u32::from(octet & 0x7f);
        if octet & 0x80 == 0 {
            return Some((res, &data[idx + 1..]))
        }
    }
    None
}

/// Appends the base 128 encoding of a component.
fn push_component(target: &mut Vec<u8>, mut id: u32) {
    let mut groups = [0u8; 5];
    let mut len = 0;
    loop {
        groups[len] = (id & 0x7f) as u8;
        len += 1;
        id >>= 7;
        if id == 0 {
            break
        }
    }
    for idx in (0..len).rev() {
        let more = if idx == 0 { 0 } else { 0x80 };
        target.push(groups[idx] | more);
    }
}


//------------ InvalidOid ----------------------------------------------------

/// Components could not be turned into an object identifier.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InvalidOid;

impl fmt::Display for InvalidOid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid object identifier")
    }
}

impl error::Error for InvalidOid { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn oid(hex: &str) -> Oid {
        Oid(hex::decode(hex).unwrap())
    }

    #[test]
    fn decode() {
        assert_eq!(
            oid("2a864886f70d0101").components(),
            Some(vec![1, 2, 840, 113549, 1, 1])
        );
        assert_eq!(
            oid("2a864886f712040186ee1b01e039").components(),
            Some(vec![1, 2, 840, 113554, 4, 1, 112411, 1, 12345])
        );
        assert_eq!(oid("55").components(), Some(vec![2, 5]));
    }

    #[test]
    fn decode_invalid() {
        assert_eq!(oid("").components(), None);
        assert_eq!(oid("ffff").components(), None);
        assert_eq!(oid("2a86").components(), None);
        assert_eq!(oid("2affffffffffffffff00").components(), None);
        assert!(!oid("2affffffffffffffff00").is_valid());
    }

    #[test]
    fn component_limit() {
        // 2^32 - 1 still fits.
        assert_eq!(
            oid("2a8fffffff7f").components(), Some(vec![1, 2, u32::MAX])
        );
        // 2^32 doesn’t.
        assert_eq!(oid("2a9080808000").components(), None);
    }

    #[test]
    fn encode() {
        assert_eq!(
            Oid::from_components(&[1, 2, 840, 113549, 1, 1]).unwrap(),
            oid("2a864886f70d0101")
        );
        assert_eq!(
            Oid::from_components(&[1, 2, u32::MAX]).unwrap(),
            oid("2a8fffffff7f")
        );
        assert_eq!(Oid::from_components(&[0, 0]).unwrap(), oid("00"));
        assert_eq!(Oid::from_components(&[1]), Err(InvalidOid));
        assert_eq!(Oid::from_components(&[]), Err(InvalidOid));
        assert_eq!(Oid::from_components(&[1, 40]), Err(InvalidOid));
        assert_eq!(Oid::from_components(&[6, 16]), Err(InvalidOid));
        assert_eq!(Oid::from_components(&[6, 15]).unwrap(), oid("ff"));
    }

    #[test]
    fn round_trip() {
        let cases: &[&[u32]] = &[
            &[0, 39],
            &[1, 2, 0, 127, 128, 16383, 16384],
            &[2, 5, 4, 3],
            &[1, 3, 6, 1, 4, 1, 311, 21, 20],
            &[1, 2, 840, 113554, 4, 1, 112411, 1, 12345],
        ];
        for &components in cases {
            let encoded = Oid::from_components(components).unwrap();
            assert_eq!(encoded.components().unwrap(), components);
        }
    }

    #[test]
    fn dotted() {
        let parsed = Oid::from_str("1.2.840.113549.1.1").unwrap();
        assert_eq!(parsed, oid("2a864886f70d0101"));
        assert_eq!(parsed.to_string(), "1.2.840.113549.1.1");
        assert_eq!(Oid::from_str("1"), Err(InvalidOid));
        assert_eq!(Oid::from_str("1..2"), Err(InvalidOid));
        assert_eq!(Oid::from_str("1.2.x"), Err(InvalidOid));
        assert_eq!(Oid::from_str("1.2.4294967296"), Err(InvalidOid));
    }

    #[test]
    fn display_invalid() {
        assert_eq!(oid("").to_string(), "[invalid OID]");
        assert_eq!(oid("0602ffff").to_string(), "[invalid OID]");
    }
}
