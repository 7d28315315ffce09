//! Prefix-grouped collection codec (component C5): `RoutingKeys` and
//! `RoutingRanges` share this implementation, parameterized over any
//! [`Routable`].
//!
//! Grounded on `crates/protocol/src/wire.rs::Headers` (a plain
//! count-then-repeated-entries loop) and `crates/topic/src/lib.rs`'s
//! `Topic`/`TopicFilter` wrapping a lower-level wire type; generalized here
//! to runs of entries sharing a prefix, each run either fixed-width (no
//! offsets needed) or variable-width (a cumulative offset table up front).

use bytes::{Buf, BufMut, Bytes, BytesMut};

use wire_core::scratch::ScratchOffsets;
use wire_core::{CodecError, WireDecode, WireEncode};

use crate::key::Routable;

/// An ordered sequence of [`Routable`] entries, encoded as consecutive
/// same-prefix groups (spec.md §4.5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbstractKeys<R: Routable> {
    items: Vec<R>,
}

impl<R: Routable> AbstractKeys<R> {
    pub fn new(items: Vec<R>) -> Self {
        AbstractKeys { items }
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn into_items(self) -> Vec<R> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn encode(&self, dst: &mut BytesMut) {
        dst.put_uvarint(self.items.len() as u64);
        let mut i = 0;
        while i < self.items.len() {
            let prefix = self.items[i].prefix();
            let mut end = i + 1;
            while end < self.items.len() && self.items[end].prefix() == prefix {
                end += 1;
            }
            let group_len = end - i;
            let remaining_after = (self.items.len() - end) as u64;
            dst.put_uvarint(remaining_after);
            R::encode_prefix(&prefix, dst);

            match R::fixed_length_for_prefix(&prefix) {
                Some(_) => {
                    for item in &self.items[i..end] {
                        item.encode_body(dst);
                    }
                }
                None => {
                    let mut bodies = BytesMut::new();
                    let mut offsets = Vec::with_capacity(group_len * R::OFFSET_COUNT);
                    let mut cumulative: u32 = 0;
                    for item in &self.items[i..end] {
                        let local = item.piece_offsets();
                        for off in &local {
                            offsets.push(cumulative + off);
                        }
                        item.encode_body(&mut bodies);
                        cumulative += *local.last().expect("OFFSET_COUNT >= 1");
                    }
                    for off in &offsets {
                        dst.put_u32(*off);
                    }
                    dst.extend_from_slice(&bodies);
                }
            }

            i = end;
        }
    }

    pub fn decode(src: &mut Bytes) -> Result<Self, CodecError> {
        let count = src.read_uvarint()? as usize;
        let mut items = Vec::with_capacity(count);
        let mut consumed = 0usize;

        while consumed < count {
            let remaining_after = src.read_uvarint()? as usize;
            if remaining_after > count - consumed {
                return Err(CodecError::CorruptInput { reason: "group remaining-after exceeds outstanding count" });
            }
            let group_len = count - consumed - remaining_after;
            if group_len == 0 {
                return Err(CodecError::CorruptInput { reason: "empty group" });
            }
            let prefix = R::decode_prefix(src)?;

            match R::fixed_length_for_prefix(&prefix) {
                Some(per_entry) => {
                    let total = group_len.checked_mul(per_entry).ok_or(CodecError::CorruptInput {
                        reason: "fixed group length overflows usize",
                    })?;
                    if src.remaining() < total {
                        return Err(CodecError::short(total, src.remaining()));
                    }
                    for _ in 0..group_len {
                        let body = src.read_exact_bytes(per_entry)?;
                        let offsets = R::fixed_offsets(per_entry);
                        items.push(R::decode_from_body(prefix.clone(), &offsets, body)?);
                    }
                }
                None => {
                    let offset_count = group_len * R::OFFSET_COUNT;
                    let min_bytes = offset_count * 4;
                    if src.remaining() < min_bytes {
                        return Err(CodecError::ImplausibleCount {
                            count: group_len as u64,
                            remaining: src.remaining(),
                            min_bytes_per_element: 4 * R::OFFSET_COUNT,
                        });
                    }
                    let mut scratch = ScratchOffsets::acquire();
                    let offsets = scratch.as_vec();
                    offsets.reserve(offset_count);
                    for _ in 0..offset_count {
                        offsets.push(src.read_u32()?);
                    }
                    let total_len = *offsets.last().expect("offset_count >= 1") as usize;
                    let body_bytes = src.read_exact_bytes(total_len)?;

                    let mut entry_start = 0u32;
                    for chunk in offsets.chunks(R::OFFSET_COUNT) {
                        let entry_end = *chunk.last().expect("OFFSET_COUNT >= 1");
                        let local_offsets: Vec<u32> = chunk.iter().map(|&c| c - entry_start).collect();
                        let entry_body = body_bytes.slice((entry_start as usize)..(entry_end as usize));
                        items.push(R::decode_from_body(prefix.clone(), &local_offsets, entry_body)?);
                        entry_start = entry_end;
                    }
                }
            }

            consumed += group_len;
        }

        Ok(AbstractKeys { items })
    }

    /// On-wire byte length of [`Self::encode`]'s output, mirroring its
    /// grouping logic without materializing any buffers.
    pub fn encoded_len(&self) -> usize {
        let mut len = wire_core::varint::size_of_uvarint(self.items.len() as u64);
        let mut i = 0;
        while i < self.items.len() {
            let prefix = self.items[i].prefix();
            let mut end = i + 1;
            while end < self.items.len() && self.items[end].prefix() == prefix {
                end += 1;
            }
            let group_len = end - i;
            let remaining_after = (self.items.len() - end) as u64;
            len += wire_core::varint::size_of_uvarint(remaining_after);
            len += R::prefix_size(&prefix);

            match R::fixed_length_for_prefix(&prefix) {
                Some(per_entry) => len += group_len * per_entry,
                None => {
                    let mut total_body = 0u32;
                    for item in &self.items[i..end] {
                        total_body += *item.piece_offsets().last().expect("OFFSET_COUNT >= 1");
                    }
                    len += group_len * R::OFFSET_COUNT * 4 + total_body as usize;
                }
            }

            i = end;
        }
        len
    }

    /// Advances `src` past one encoded collection without allocating the
    /// decoded entries, returning only the declared count (spec.md
    /// testable property: "must be byte-identical whether decoded fully
    /// or only skipped").
    pub fn skip(src: &mut Bytes) -> Result<usize, CodecError> {
        let count = src.read_uvarint()? as usize;
        let mut consumed = 0usize;

        while consumed < count {
            let remaining_after = src.read_uvarint()? as usize;
            if remaining_after > count - consumed {
                return Err(CodecError::CorruptInput { reason: "group remaining-after exceeds outstanding count" });
            }
            let group_len = count - consumed - remaining_after;
            if group_len == 0 {
                return Err(CodecError::CorruptInput { reason: "empty group" });
            }
            let prefix = R::decode_prefix(src)?;

            match R::fixed_length_for_prefix(&prefix) {
                Some(per_entry) => {
                    let total = group_len.checked_mul(per_entry).ok_or(CodecError::CorruptInput {
                        reason: "fixed group length overflows usize",
                    })?;
                    src.skip_exact(total)?;
                }
                None => {
                    let offset_count = group_len * R::OFFSET_COUNT;
                    let min_bytes = offset_count * 4;
                    if src.remaining() < min_bytes {
                        return Err(CodecError::ImplausibleCount {
                            count: group_len as u64,
                            remaining: src.remaining(),
                            min_bytes_per_element: 4 * R::OFFSET_COUNT,
                        });
                    }
                    let mut last = 0u32;
                    for _ in 0..offset_count {
                        last = src.read_u32()?;
                    }
                    src.skip_exact(last as usize)?;
                }
            }

            consumed += group_len;
        }

        Ok(count)
    }
}

/// Encodes `subset` relative to `universe` as a bitmap (spec.md §4.5's
/// subset-relative form): `ceil(|universe|/8)` bytes, bit `i` set iff
/// `universe[i]` is present in `subset`. Requires `subset` to be an
/// order-preserving sub-sequence of `universe`.
pub fn encode_subset_bitmap<R: Routable + PartialEq>(universe: &[R], subset: &[R], dst: &mut BytesMut) {
    let mut bits = vec![0u8; universe.len().div_ceil(8)];
    let mut cursor = 0;
    for item in subset {
        while cursor < universe.len() && universe[cursor] != *item {
            cursor += 1;
        }
        if cursor < universe.len() {
            bits[cursor / 8] |= 1 << (cursor % 8);
            cursor += 1;
        }
    }
    dst.extend_from_slice(&bits);
}

/// On-wire byte length of [`encode_subset_bitmap`]'s output for a universe
/// of `universe_len` entries, regardless of subset size.
pub fn subset_bitmap_encoded_len(universe_len: usize) -> usize {
    universe_len.div_ceil(8)
}

pub fn decode_subset_bitmap<R: Routable>(universe: &[R], src: &mut Bytes) -> Result<Vec<R>, CodecError> {
    let byte_len = universe.len().div_ceil(8);
    let bits = src.read_exact_bytes(byte_len)?;
    let mut out = Vec::new();
    for (i, item) in universe.iter().enumerate() {
        if bits[i / 8] & (1 << (i % 8)) != 0 {
            out.push(item.clone());
        }
    }
    Ok(out)
}
