//! Reading fixed-width fields from a bounded sequence of octets.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::marker::PhantomData;
use super::error::Error;


//------------ Endian --------------------------------------------------------

/// The byte order used for multi-octet integers.
///
/// The trait is implemented by the two marker types [`BigEndian`] and
/// [`LittleEndian`] so a [`Reader`] can be monomorphized for the byte order
/// of the format it reads.
pub trait Endian {
    /// Converts two octets into an integer.
    fn u16_from(octets: [u8; 2]) -> u16;

    /// Converts three octets into an integer.
    fn u24_from(octets: [u8; 3]) -> u32;

    /// Converts four octets into an integer.
    fn u32_from(octets: [u8; 4]) -> u32;

    /// Converts eight octets into an integer.
    fn u64_from(octets: [u8; 8]) -> u64;
}

/// Network byte order, most significant octet first.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BigEndian;

impl Endian for BigEndian {
    fn u16_from(octets: [u8; 2]) -> u16 {
        u16::from_be_bytes(octets)
    }

    fn u24_from(octets: [u8; 3]) -> u32 {
        u32::from(octets[0]) << 16
            | u32::from(octets[1]) << 8
            | u32::from(octets[2])
    }

    fn u32_from(octets: [u8; 4]) -> u32 {
        u32::from_be_bytes(octets)
    }

    fn u64_from(octets: [u8; 8]) -> u64 {
        u64::from_be_bytes(octets)
    }
}

/// Least significant octet first.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LittleEndian;

impl Endian for LittleEndian {
    fn u16_from(octets: [u8; 2]) -> u16 {
        u16::from_le_bytes(octets)
    }

    fn u24_from(octets: [u8; 3]) -> u32 {
        u32::from(octets[2]) << 16
            | u32::from(octets[1]) << 8
            | u32::from(octets[0])
    }

    fn u32_from(octets: [u8; 4]) -> u32 {
        u32::from_le_bytes(octets)
    }

    fn u64_from(octets: [u8; 8]) -> u64 {
        u64::from_le_bytes(octets)
    }
}


//------------ Reader --------------------------------------------------------

/// A cursor over a borrowed sequence of octets.
///
/// The reader can only move forward. Every read first checks that the
/// requested octets are actually there and fails with
/// [`Error::OutOfBounds`] if they aren’t, leaving the cursor where it was.
/// Byte ranges handed out by the reader borrow from the underlying data
/// and never extend past its end.
#[derive(Clone, Debug)]
pub struct Reader<'a, E = BigEndian> {
    /// The complete data.
    data: &'a [u8],

    /// The index of the next octet to read.
    pos: usize,

    marker: PhantomData<E>,
}

impl<'a, E> Reader<'a, E> {
    /// Creates a new reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Reader { data, pos: 0, marker: PhantomData }
    }

    /// Returns the complete data the reader was created from.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the current position of the cursor.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Returns the number of octets left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns whether there still are octets left to read.
    pub fn has_unconsumed_data(&self) -> bool {
        self.pos < self.data.len()
    }

    /// Returns the octets that haven’t been read yet.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Returns the octets read since the cursor was at `start`.
    ///
    /// If `start` lies beyond the current position, the result is empty.
    pub fn since(&self, start: usize) -> &'a [u8] {
        &self.data[start.min(self.pos)..self.pos]
    }

    /// Takes the next `len` octets.
    pub fn take_bytes(&mut self, len: usize) -> Result<&'a [u8], Error> {
        if len > self.remaining() {
            xerr!(return Err(Error::OutOfBounds))
        }
        let res = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(res)
    }

    /// Takes a single octet.
    pub fn take_u8(&mut self) -> Result<u8, Error> {
        match self.data.get(self.pos) {
            Some(&res) => {
                self.pos += 1;
                Ok(res)
            }
            None => xerr!(Err(Error::OutOfBounds))
        }
    }

    /// Takes the next `N` octets as an array.
    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut res = [0u8; N];
        res.copy_from_slice(self.take_bytes(N)?);
        Ok(res)
    }

    /// Takes an octet range whose length is given by a preceding octet.
    pub fn take_u8_prefixed(&mut self) -> Result<&'a [u8], Error> {
        let len = self.take_u8()?;
        self.take_bytes(usize::from(len))
    }

    /// Takes an octet range prefixed by an octet of bounded value.
    ///
    /// If the length is smaller than `min` or larger than `max`, fails with
    /// [`Error::InvalidFormat`].
    pub fn take_u8_prefixed_within(
        &mut self, min: u8, max: u8
    ) -> Result<&'a [u8], Error> {
        let len = self.take_u8()?;
        if len < min || len > max {
            xerr!(return Err(Error::InvalidFormat))
        }
        self.take_bytes(usize::from(len))
    }
}

impl<'a, E: Endian> Reader<'a, E> {
    /// Takes an unsigned 16 bit integer.
    pub fn take_u16(&mut self) -> Result<u16, Error> {
        self.take_array().map(E::u16_from)
    }

    /// Takes an unsigned 24 bit integer.
    pub fn take_u24(&mut self) -> Result<u32, Error> {
        self.take_array().map(E::u24_from)
    }

    /// Takes an unsigned 32 bit integer.
    pub fn take_u32(&mut self) -> Result<u32, Error> {
        self.take_array().map(E::u32_from)
    }

    /// Takes an unsigned 64 bit integer.
    pub fn take_u64(&mut self) -> Result<u64, Error> {
        self.take_array().map(E::u64_from)
    }

    /// Takes an octet range prefixed by a 16 bit length.
    pub fn take_u16_prefixed(&mut self) -> Result<&'a [u8], Error> {
        let len = self.take_u16()?;
        self.take_bytes(usize::from(len))
    }

    /// Takes an octet range prefixed by a 16 bit length of bounded value.
    pub fn take_u16_prefixed_within(
        &mut self, min: u16, max: u16
    ) -> Result<&'a [u8], Error> {
        let len = self.take_u16()?;
        if len < min || len > max {
            xerr!(return Err(Error::InvalidFormat))
        }
        self.take_bytes(usize::from(len))
    }

    /// Takes an octet range prefixed by a 24 bit length.
    pub fn take_u24_prefixed(&mut self) -> Result<&'a [u8], Error> {
        let len = self.take_u24()?;
        self.take_bytes(len as usize)
    }

    /// Takes an octet range prefixed by a 24 bit length of bounded value.
    pub fn take_u24_prefixed_within(
        &mut self, min: u32, max: u32
    ) -> Result<&'a [u8], Error> {
        let len = self.take_u24()?;
        if len < min || len > max {
            xerr!(return Err(Error::InvalidFormat))
        }
        self.take_bytes(len as usize)
    }
}


//============ Tests =========================================================
