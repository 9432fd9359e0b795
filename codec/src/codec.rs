// Taken from rustls <https://github.com/rustls/rustls>
//
// Copyright (c) 2016 Joe Birr-Pixton and rustls project contributors
// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

#[cfg(feature = "alloc")]
extern crate alloc;

use core::fmt::Debug;

/// Read from a byte slice.
pub struct Reader<'a> {
    buf: &'a [u8],
    offs: usize,
}

impl<'a> Reader<'a> {
    pub fn init(bytes: &[u8]) -> Reader {
        Reader {
            buf: bytes,
            offs: 0,
        }
    }

    pub fn rest(&mut self) -> &'a [u8] {
        let ret = &self.buf[self.offs..];
        self.offs = self.buf.len();
        ret
    }

    pub fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        if self.left() < len {
            return None;
        }

        let current = self.offs;
        self.offs += len;
        Some(&self.buf[current..current + len])
    }

    pub fn any_left(&self) -> bool {
        self.offs < self.buf.len()
    }

    pub fn left(&self) -> usize {
        self.buf.len() - self.offs
    }

    pub fn used(&self) -> usize {
        self.offs
    }

    pub fn sub(&mut self, len: usize) -> Option<Reader<'a>> {
        self.take(len).map(Reader::init)
    }
}

impl AsRef<[u8]> for Reader<'_> {
    fn as_ref(&self) -> &[u8] {
        &self.buf[self.offs..]
    }
}

/// Write to a byte slice.
pub struct Writer<'a> {
    buf: &'a mut [u8],
    offs: usize,
}

impl<'a> Writer<'a> {
    pub fn init(bytes: &mut [u8]) -> Writer {
        Writer {
            buf: bytes,
            offs: 0,
        }
    }

    pub fn clear(&mut self) {
        self.offs = 0;
    }

    pub fn extend_from_slice(&mut self, value: &[u8]) -> Option<usize> {
        if self.left() < value.len() {
            return None;
        }
        let added = value.len();
        self.buf[self.offs..self.offs + added].copy_from_slice(value);
        self.offs += added;
        Some(added)
    }

    pub fn push(&mut self, value: u8) -> Option<u8> {
        if self.left() < 1 {
            return None;
        }
        self.buf[self.offs] = value;
        self.offs += 1;
        Some(value)
    }

    /// Overwrite an already written byte, used to back-fill length fields
    /// once the size of the following data is known.
    pub fn patch(&mut self, pos: usize, value: u8) -> Option<u8> {
        if pos >= self.offs {
            return None;
        }
        self.buf[pos] = value;
        Some(value)
    }

    pub fn left(&self) -> usize {
        self.buf.len() - self.offs
    }

    pub fn used(&self) -> usize {
        self.offs
    }

    pub fn used_slice(&self) -> &[u8] {
        &self.buf[..self.offs]
    }

    pub fn mut_used_slice(&mut self) -> &mut [u8] {
        &mut self.buf[..self.offs]
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct EncodeErr;

/// Things we can encode and read from a Reader.
///
/// Multi-byte integers are big-endian on the wire.
pub trait Codec: Debug + Sized {
    /// Encode yourself by appending onto `bytes`.
    /// Return Ok(encoded size) or Err(EncodeErr)
    fn encode(&self, bytes: &mut Writer) -> Result<usize, EncodeErr>;

    /// Decode yourself by fiddling with the `Reader`.
    /// Return Some if it worked, None if not.
    fn read(_: &mut Reader) -> Option<Self>;

    /// Read one of these from the front of `bytes` and
    /// return it.
    fn read_bytes(bytes: &[u8]) -> Option<Self> {
        let mut rd = Reader::init(bytes);
        Self::read(&mut rd)
    }

    /// Like `read_bytes`, but fails if anything is left over.
    fn read_bytes_exact(bytes: &[u8]) -> Option<Self> {
        let mut rd = Reader::init(bytes);
        let ret = Self::read(&mut rd)?;
        if rd.any_left() {
            return None;
        }
        Some(ret)
    }

    #[cfg(feature = "alloc")]
    /// Read count T's and returns Vec<T>
    /// count: the number of T wants to read.
    fn read_vec<T: Codec>(reader: &mut Reader, count: usize) -> Option<alloc::vec::Vec<T>> {
        let mut data = alloc::vec::Vec::new();
        for _ in 0..count {
            let t = T::read(reader)?;
            data.push(t)
        }
        Some(data)
    }
}

impl Codec for u8 {
    fn encode(&self, bytes: &mut Writer) -> Result<usize, EncodeErr> {
        bytes.push(*self).ok_or(EncodeErr)?;
        Ok(1)
    }
    fn read(r: &mut Reader) -> Option<u8> {
        r.take(1).map(|b| b[0])
    }
}

pub fn put_u16(v: u16, out: &mut [u8]) {
    out[..2].copy_from_slice(&v.to_be_bytes());
}

pub fn decode_u16(bytes: &[u8]) -> Option<u16> {
    Some(u16::from_be_bytes([*bytes.first()?, *bytes.get(1)?]))
}

impl Codec for u16 {
    fn encode(&self, bytes: &mut Writer) -> Result<usize, EncodeErr> {
        let mut b16 = [0u8; 2];
        put_u16(*self, &mut b16);
        bytes.extend_from_slice(&b16).ok_or(EncodeErr)?;
        Ok(2)
    }

    fn read(r: &mut Reader) -> Option<u16> {
        r.take(2).and_then(decode_u16)
    }
}

pub fn decode_u32(bytes: &[u8]) -> Option<u32> {
    let mut b32 = [0u8; 4];
    b32.copy_from_slice(bytes.get(..4)?);
    Some(u32::from_be_bytes(b32))
}

impl Codec for u32 {
    fn encode(&self, bytes: &mut Writer) -> Result<usize, EncodeErr> {
        bytes
            .extend_from_slice(&self.to_be_bytes())
            .ok_or(EncodeErr)?;
        Ok(4)
    }

    fn read(r: &mut Reader) -> Option<u32> {
        r.take(4).and_then(decode_u32)
    }
}

impl<T: Codec + Copy + Default, const N: usize> Codec for [T; N] {
    fn encode(&self, bytes: &mut Writer) -> Result<usize, EncodeErr> {
        let used = bytes.used();
        for d in self.iter() {
            let _ = d.encode(bytes)?;
        }
        Ok(bytes.used() - used)
    }

    fn read(reader: &mut Reader) -> Option<Self> {
        let mut target = [T::default(); N];
        for t in target.iter_mut() {
            *t = T::read(reader)?;
        }

        Some(target)
    }
}
