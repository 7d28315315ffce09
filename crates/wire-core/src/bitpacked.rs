//! Bit-packed fixed-width integer arrays (component C2).
//!
//! No teacher counterpart exists for this leaf codec (the teacher only
//! ever writes byte-aligned fields); the layout here follows spec.md S4.2
//! directly: entries are packed LSB-first into a rolling bit window,
//! flushed as 8-byte little-endian words with a minimal trailing tail.
//! The rolling window is kept in a `u128` accumulator purely as an
//! implementation convenience so a single entry (up to 64 bits) can never
//! overflow the space available before the next flush; the wire format
//! itself only ever deals in 64-bit words and sub-word tails.

use bytes::{Bytes, Buf, BytesMut};

use crate::error::CodecError;
use crate::varint::WireDecode;

/// Bits needed to represent every value in `0..=max`. `bits_for_max(0) == 0`.
pub fn bits_for_max(max: u64) -> u32 {
    if max == 0 {
        0
    } else {
        64 - max.leading_zeros()
    }
}

/// On-wire byte length of `count` entries packed at `bits` bits each.
pub fn packed_byte_len(count: usize, bits: u32) -> usize {
    ((count as u64) * (bits as u64)).div_ceil(8) as usize
}

/// Packs `values` at `bits` bits per entry into `dst`. Every value must be
/// `<= (1 << bits) - 1`; violating this is an encoder-side invariant
/// failure (`PackedOverflow`), not a recoverable condition.
pub fn pack(dst: &mut BytesMut, values: &[u64], bits: u32) -> Result<(), CodecError> {
    let max: u64 = if bits == 0 {
        0
    } else if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    };

    if bits == 0 {
        for &v in values {
            if v != 0 {
                return Err(CodecError::PackedOverflow { value: v, max });
            }
        }
        return Ok(());
    }

    let mut acc: u128 = 0;
    let mut acc_bits: u32 = 0;

    for &value in values {
        if value > max {
            return Err(CodecError::PackedOverflow { value, max });
        }
        acc |= (value as u128) << acc_bits;
        acc_bits += bits;
        while acc_bits >= 64 {
            let word = acc as u64;
            dst.extend_from_slice(&word.to_le_bytes());
            acc >>= 64;
            acc_bits -= 64;
        }
    }

    if acc_bits > 0 {
        let tail_bytes = (acc_bits as usize).div_ceil(8);
        let word = (acc as u64).to_le_bytes();
        dst.extend_from_slice(&word[..tail_bytes]);
    }

    Ok(())
}

/// Unpacks `count` values at `bits` bits per entry from `src`.
///
/// Every returned value is guaranteed `<= (1 << bits) - 1` by construction;
/// the caller must still separately check it against a declared `max` if
/// `max` is not exactly `(1 << bits) - 1` (spec.md invariant 6, S3).
pub fn unpack(src: &mut Bytes, count: usize, bits: u32) -> Result<Vec<u64>, CodecError> {
    if bits == 0 {
        return Ok(vec![0; count]);
    }

    let total_bytes = packed_byte_len(count, bits);
    if src.remaining() < total_bytes {
        return Err(CodecError::short(total_bytes, src.remaining()));
    }

    let mask: u64 = if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 };
    let mut acc: u128 = 0;
    let mut acc_bits: u32 = 0;
    let mut bytes_left = total_bytes;
    let mut out = Vec::with_capacity(count);

    for _ in 0..count {
        while acc_bits < bits {
            if bytes_left >= 8 {
                let word = src.read_word_le()?;
                acc |= (word as u128) << acc_bits;
                acc_bits += 64;
                bytes_left -= 8;
            } else if bytes_left > 0 {
                let k = bytes_left;
                let tail = src.read_tail_le(k)?;
                acc |= (tail as u128) << acc_bits;
                acc_bits += (k * 8) as u32;
                bytes_left = 0;
            } else {
                return Err(CodecError::short(1, 0));
            }
        }

        let value = (acc as u64) & mask;
        out.push(value);
        acc >>= bits;
        acc_bits -= bits;
    }

    Ok(out)
}
