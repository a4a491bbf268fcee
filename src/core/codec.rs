//! Positional field codec.
//!
//! Bodies carry no schema: the receiver knows the layout from the kind id.
//! All numerics are fixed-width little-endian, strings are `u32` length-prefixed
//! UTF-8, and lists are `u32` count-prefixed.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::core::packet::Guid;
use crate::error::{Result, SyncError};

/// A value with a single fixed wire layout.
pub trait WireField: Sized {
    fn write(&self, w: &mut WireWriter);
    fn read(r: &mut WireReader) -> Result<Self>;
}

/// Cursor over a packet body.
#[derive(Debug, Clone)]
pub struct WireReader {
    buf: Bytes,
}

impl WireReader {
    pub fn new(buf: Bytes) -> Self {
        Self { buf }
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    pub fn is_empty(&self) -> bool {
        !self.buf.has_remaining()
    }

    #[inline]
    fn need(&self, needed: usize) -> Result<()> {
        if self.buf.remaining() < needed {
            return Err(SyncError::TruncatedPacket {
                needed,
                available: self.buf.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.need(1)?;
        Ok(self.buf.get_u8())
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.need(4)?;
        Ok(self.buf.get_i32_le())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.need(4)?;
        Ok(self.buf.get_u32_le())
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.need(8)?;
        Ok(self.buf.get_u64_le())
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.need(4)?;
        Ok(self.buf.get_f32_le())
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.need(8)?;
        Ok(self.buf.get_f64_le())
    }

    pub fn read_guid(&mut self) -> Result<Guid> {
        Ok(Guid(self.read_u64()?))
    }

    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        self.need(len)?;
        let raw = self.buf.split_to(len);
        String::from_utf8(raw.to_vec()).map_err(|e| SyncError::InvalidString(e.to_string()))
    }

    /// Read a list count.
    ///
    /// Every list element occupies at least `min_element_len` bytes, so a count
    /// that cannot fit in the remaining buffer is rejected before allocating.
    pub fn read_count(&mut self, min_element_len: usize) -> Result<usize> {
        let count = self.read_u32()? as usize;
        let needed = count.saturating_mul(min_element_len.max(1));
        self.need(needed)?;
        Ok(count)
    }

    pub fn read_f32_array<const N: usize>(&mut self) -> Result<[f32; N]> {
        let mut out = [0.0; N];
        for value in out.iter_mut() {
            *value = self.read_f32()?;
        }
        Ok(out)
    }

    pub fn read_i32_array<const N: usize>(&mut self) -> Result<[i32; N]> {
        let mut out = [0; N];
        for value in out.iter_mut() {
            *value = self.read_i32()?;
        }
        Ok(out)
    }

    pub fn read_field<T: WireField>(&mut self) -> Result<T> {
        T::read(self)
    }

    /// Read a count-prefixed list of fields
    pub fn read_list<T: WireField>(&mut self, min_element_len: usize) -> Result<Vec<T>> {
        let count = self.read_count(min_element_len)?;
        (0..count).map(|_| T::read(self)).collect()
    }
}

/// Growable body buffer.
#[derive(Debug, Default)]
pub struct WireWriter {
    buf: BytesMut,
}

impl WireWriter {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(64),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.put_u8(u8::from(value));
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.put_i32_le(value);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.put_u32_le(value);
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.put_u64_le(value);
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buf.put_f32_le(value);
    }

    pub fn write_f64(&mut self, value: f64) {
        self.buf.put_f64_le(value);
    }

    pub fn write_guid(&mut self, guid: Guid) {
        self.write_u64(guid.0);
    }

    pub fn write_string(&mut self, value: &str) {
        self.buf.put_u32_le(value.len() as u32);
        self.buf.put_slice(value.as_bytes());
    }

    pub fn write_count(&mut self, count: usize) {
        self.buf.put_u32_le(count as u32);
    }

    pub fn write_f32_array(&mut self, values: &[f32]) {
        for value in values {
            self.write_f32(*value);
        }
    }

    pub fn write_i32_array(&mut self, values: &[i32]) {
        for value in values {
            self.write_i32(*value);
        }
    }

    pub fn write_field<T: WireField>(&mut self, value: &T) {
        value.write(self);
    }

    pub fn write_list<T: WireField>(&mut self, values: &[T]) {
        self.write_count(values.len());
        for value in values {
            value.write(self);
        }
    }

    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}
