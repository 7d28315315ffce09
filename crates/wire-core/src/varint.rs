//! Fixed-width primitives and variable-length integers (component C1).
//!
//! Generalizes the teacher's `common::wire::{WireDecode, WireEncode}` pair
//! (which only covers a 1-byte-shift/4-byte-max varint used for MQTT-style
//! remaining-length fields) to the full LEB128-style uvarint/svarint set
//! this protocol's messages need.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::CodecError;

const CONTINUATION_BIT: u8 = 0x80;
const DATA_MASK: u8 = 0x7F;
const DATA_BITS: u32 = 7;

/// Max bytes a 64-bit uvarint can occupy: ceil(64/7) = 10.
pub const UVARINT_MAX_BYTES: usize = 10;
/// Max bytes a 32-bit uvarint can occupy: ceil(32/7) = 5.
pub const UVARINT32_MAX_BYTES: usize = 5;

/// Extension trait on [`Bytes`] for reading typed wire-protocol fields.
pub trait WireDecode {
    fn read_u8(&mut self) -> Result<u8, CodecError>;
    fn read_u16(&mut self) -> Result<u16, CodecError>;
    fn read_u32(&mut self) -> Result<u32, CodecError>;
    fn read_u64(&mut self) -> Result<u64, CodecError>;
    fn read_bool(&mut self) -> Result<bool, CodecError>;
    /// Reads an unsigned LEB128-style varint (up to 10 bytes for a u64).
    fn read_uvarint(&mut self) -> Result<u64, CodecError>;
    /// Reads an unsigned LEB128-style varint capped at 32 bits (up to 5 bytes).
    fn read_uvarint32(&mut self) -> Result<u32, CodecError>;
    /// Reads a zigzag-encoded signed varint.
    fn read_svarint(&mut self) -> Result<i64, CodecError>;
    /// Reads exactly `len` bytes, failing with [`CodecError::ShortInput`] if
    /// fewer remain.
    fn read_exact_bytes(&mut self, len: usize) -> Result<Bytes, CodecError>;
    /// Reads the low `k` bytes (1..=7) of a 64-bit little-endian word.
    fn read_tail_le(&mut self, k: usize) -> Result<u64, CodecError>;
    /// Reads a full 8-byte little-endian word.
    fn read_word_le(&mut self) -> Result<u64, CodecError>;
    /// Returns the next byte without consuming it.
    fn peek_u8(&self) -> Result<u8, CodecError>;
    /// Advances the cursor by `len` bytes without returning them.
    fn skip_exact(&mut self, len: usize) -> Result<(), CodecError>;
}

impl WireDecode for Bytes {
    fn read_u8(&mut self) -> Result<u8, CodecError> {
        if self.remaining() < 1 {
            return Err(CodecError::short(1, self.remaining()));
        }
        Ok(self.get_u8())
    }

    fn read_u16(&mut self) -> Result<u16, CodecError> {
        if self.remaining() < 2 {
            return Err(CodecError::short(2, self.remaining()));
        }
        Ok(self.get_u16())
    }

    fn read_u32(&mut self) -> Result<u32, CodecError> {
        if self.remaining() < 4 {
            return Err(CodecError::short(4, self.remaining()));
        }
        Ok(self.get_u32())
    }

    fn read_u64(&mut self) -> Result<u64, CodecError> {
        if self.remaining() < 8 {
            return Err(CodecError::short(8, self.remaining()));
        }
        Ok(self.get_u64())
    }

    fn read_bool(&mut self) -> Result<bool, CodecError> {
        Ok(self.read_u8()? != 0)
    }

    fn read_uvarint(&mut self) -> Result<u64, CodecError> {
        let mut value: u64 = 0;
        let mut shift: u32 = 0;
        for _ in 0..UVARINT_MAX_BYTES {
            let byte = self.read_u8()?;
            value |= ((byte & DATA_MASK) as u64) << shift;
            if byte & CONTINUATION_BIT == 0 {
                return Ok(value);
            }
            shift += DATA_BITS;
        }
        Err(CodecError::MalformedVarInt { max_bytes: UVARINT_MAX_BYTES })
    }

    fn read_uvarint32(&mut self) -> Result<u32, CodecError> {
        let mut value: u32 = 0;
        let mut shift: u32 = 0;
        for _ in 0..UVARINT32_MAX_BYTES {
            let byte = self.read_u8()?;
            value |= ((byte & DATA_MASK) as u32) << shift;
            if byte & CONTINUATION_BIT == 0 {
                return Ok(value);
            }
            shift += DATA_BITS;
        }
        Err(CodecError::MalformedVarInt { max_bytes: UVARINT32_MAX_BYTES })
    }

    fn read_svarint(&mut self) -> Result<i64, CodecError> {
        let zigzag = self.read_uvarint()?;
        Ok(((zigzag >> 1) as i64) ^ -((zigzag & 1) as i64))
    }

    fn read_exact_bytes(&mut self, len: usize) -> Result<Bytes, CodecError> {
        if self.remaining() < len {
            return Err(CodecError::short(len, self.remaining()));
        }
        Ok(self.copy_to_bytes(len))
    }

    fn read_tail_le(&mut self, k: usize) -> Result<u64, CodecError> {
        debug_assert!((1..=7).contains(&k));
        if self.remaining() < k {
            return Err(CodecError::short(k, self.remaining()));
        }
        let mut out = 0u64;
        for i in 0..k {
            out |= (self.get_u8() as u64) << (8 * i);
        }
        Ok(out)
    }

    fn read_word_le(&mut self) -> Result<u64, CodecError> {
        if self.remaining() < 8 {
            return Err(CodecError::short(8, self.remaining()));
        }
        Ok(self.get_u64_le())
    }

    fn peek_u8(&self) -> Result<u8, CodecError> {
        if self.remaining() < 1 {
            return Err(CodecError::short(1, self.remaining()));
        }
        Ok(self.chunk()[0])
    }

    fn skip_exact(&mut self, len: usize) -> Result<(), CodecError> {
        if self.remaining() < len {
            return Err(CodecError::short(len, self.remaining()));
        }
        self.advance(len);
        Ok(())
    }
}

/// Extension trait on [`BytesMut`] for writing typed wire-protocol fields.
///
/// Mirrors [`WireDecode`] so encode and decode stay symmetric, as the
/// teacher's `WireEncode`/`WireDecode` pair does for its own primitive set.
pub trait WireEncode {
    fn put_bool(&mut self, value: bool);
    fn put_uvarint(&mut self, value: u64);
    fn put_uvarint32(&mut self, value: u32);
    fn put_svarint(&mut self, value: i64);
    /// Writes the low `k` bytes (1..=7) of `value`, little-endian.
    fn put_tail_le(&mut self, value: u64, k: usize);
    /// Writes a full 8-byte little-endian word.
    fn put_word_le(&mut self, value: u64);
}

impl WireEncode for BytesMut {
    fn put_bool(&mut self, value: bool) {
        self.put_u8(value as u8);
    }

    fn put_uvarint(&mut self, mut value: u64) {
        loop {
            let mut byte = (value & DATA_MASK as u64) as u8;
            value >>= DATA_BITS;
            if value > 0 {
                byte |= CONTINUATION_BIT;
            }
            self.put_u8(byte);
            if value == 0 {
                break;
            }
        }
    }

    fn put_uvarint32(&mut self, value: u32) {
        self.put_uvarint(value as u64);
    }

    fn put_svarint(&mut self, value: i64) {
        let zigzag = ((value << 1) ^ (value >> 63)) as u64;
        self.put_uvarint(zigzag);
    }

    fn put_tail_le(&mut self, value: u64, k: usize) {
        debug_assert!((1..=7).contains(&k));
        for i in 0..k {
            self.put_u8(((value >> (8 * i)) & 0xFF) as u8);
        }
    }

    fn put_word_le(&mut self, value: u64) {
        self.put_u64_le(value);
    }
}

/// Number of bytes `size_of_uvarint(0) == 1` and otherwise
/// `ceil((floor(log2 value) + 1) / 7)`, per spec.md S4.1.
pub fn size_of_uvarint(value: u64) -> usize {
    if value == 0 {
        return 1;
    }
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7)
}

pub fn size_of_uvarint32(value: u32) -> usize {
    size_of_uvarint(value as u64)
}

pub fn size_of_svarint(value: i64) -> usize {
    let zigzag = ((value << 1) ^ (value >> 63)) as u64;
    size_of_uvarint(zigzag)
}
