//! Key and range codec (component C4).
//!
//! Grounded on `crates/topic/src/topic_wire.rs::TopicWire`: a prefix (there,
//! the slash-delimited layer structure) decoded once, then a body whose
//! length is either implied by the prefix or carried explicitly. Here the
//! prefix/body split is made generic via the [`Routable`] trait so the same
//! grouping codec (`collection.rs`) works for both single keys and ranges.

use bytes::{Bytes, BytesMut};

use wire_core::{CodecError, WireDecode, WireEncode};

/// The minimum interface the grouping (C5), tagged-union (C6), and
/// segmented-map (C7) codecs need from a "thing with a routing prefix".
///
/// A type implementing `Routable` owns no encoding logic beyond its own
/// body: everything about *where* that body lands in a prefix-grouped run
/// (offsets, fixed-vs-variable dispatch) lives in `collection.rs`.
pub trait Routable: Sized + Clone {
    /// The partitioning prefix shared by every entry in a group (e.g. a
    /// table/keyspace id). Entries are grouped by equality of this value.
    type Prefix: PartialEq + Clone;

    /// Number of cumulative end-offsets recorded per entry in the
    /// variable-length encoding: 1 for a plain key, 2 for a range (one for
    /// the end of its start key, one for the end of its end key).
    const OFFSET_COUNT: usize;

    fn prefix(&self) -> Self::Prefix;
    fn encode_prefix(prefix: &Self::Prefix, dst: &mut BytesMut);
    fn decode_prefix(src: &mut Bytes) -> Result<Self::Prefix, CodecError>;
    fn prefix_size(prefix: &Self::Prefix) -> usize;

    /// Total fixed body length (summed across all `OFFSET_COUNT` pieces) for
    /// every entry sharing `prefix`, or `None` if entries under this prefix
    /// vary in length.
    fn fixed_length_for_prefix(prefix: &Self::Prefix) -> Option<usize>;

    /// Splits a known fixed total length into per-piece cumulative offsets.
    /// The default (`OFFSET_COUNT == 1`) is exact; [`super::range::Range`]
    /// overrides it to bisect evenly between its two keys.
    fn fixed_offsets(total_len: usize) -> Vec<u32> {
        vec![total_len as u32]
    }

    /// Writes this entry's raw body (no prefix, no length prefix).
    fn encode_body(&self, dst: &mut BytesMut);

    /// Cumulative end-offsets of each piece within this entry's own body,
    /// length `OFFSET_COUNT`, with the last entry equal to the body's total
    /// length.
    fn piece_offsets(&self) -> Vec<u32>;

    /// Reconstructs an entry from its prefix and a body slice, given the
    /// cumulative piece offsets (relative to the start of `body`).
    fn decode_from_body(prefix: Self::Prefix, offsets: &[u32], body: Bytes) -> Result<Self, CodecError>;
}

/// Writes a single `Routable` as a standalone value: prefix, then a
/// uvarint-length-prefixed body. Used for values that never participate in
/// prefix-grouping — the `homeKey` back-reference fallback in `route.rs`.
pub fn encode_standalone<R: Routable>(item: &R, dst: &mut BytesMut) {
    R::encode_prefix(&item.prefix(), dst);
    let mut body = BytesMut::new();
    item.encode_body(&mut body);
    dst.put_uvarint(body.len() as u64);
    dst.extend_from_slice(&body);
}

pub fn decode_standalone<R: Routable>(src: &mut Bytes) -> Result<R, CodecError> {
    let prefix = R::decode_prefix(src)?;
    let len = src.read_uvarint()? as usize;
    let body = src.read_exact_bytes(len)?;
    let offsets = R::fixed_offsets(len);
    R::decode_from_body(prefix, &offsets, body)
}

/// On-wire byte length of [`encode_standalone`]'s output for the same item.
pub fn standalone_encoded_len<R: Routable>(item: &R) -> usize {
    let body_len = *item.piece_offsets().last().expect("OFFSET_COUNT >= 1") as usize;
    R::prefix_size(&item.prefix()) + wire_core::varint::size_of_uvarint(body_len as u64) + body_len
}

/// A key's partitioning identity: a numeric id plus an optional declared
/// fixed body length (`None` means every key under this id is
/// variable-length). Real deployments would look this up from a schema the
/// collaborator owns; this crate only needs the value on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableId {
    pub id: u32,
    pub fixed_len: Option<u16>,
}

impl TableId {
    pub fn variable(id: u32) -> Self {
        TableId { id, fixed_len: None }
    }

    pub fn fixed(id: u32, len: u16) -> Self {
        TableId { id, fixed_len: Some(len) }
    }

    fn marker(&self) -> u64 {
        match self.fixed_len {
            None => 0,
            Some(len) => len as u64 + 1,
        }
    }
}

/// A simple routing key: a [`TableId`] prefix plus an opaque body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleKey {
    pub table: TableId,
    pub body: Bytes,
}

impl SimpleKey {
    pub fn new(table: TableId, body: impl Into<Bytes>) -> Self {
        SimpleKey { table, body: body.into() }
    }
}

impl Routable for SimpleKey {
    type Prefix = TableId;
    const OFFSET_COUNT: usize = 1;

    fn prefix(&self) -> TableId {
        self.table
    }

    fn encode_prefix(prefix: &TableId, dst: &mut BytesMut) {
        dst.put_uvarint(prefix.id as u64);
        dst.put_uvarint(prefix.marker());
    }

    fn decode_prefix(src: &mut Bytes) -> Result<TableId, CodecError> {
        let id = src.read_uvarint32()?;
        let marker = src.read_uvarint()?;
        let fixed_len = if marker == 0 { None } else { Some((marker - 1) as u16) };
        Ok(TableId { id, fixed_len })
    }

    fn prefix_size(prefix: &TableId) -> usize {
        wire_core::varint::size_of_uvarint32(prefix.id) + wire_core::varint::size_of_uvarint(prefix.marker())
    }

    fn fixed_length_for_prefix(prefix: &TableId) -> Option<usize> {
        prefix.fixed_len.map(|n| n as usize)
    }

    fn encode_body(&self, dst: &mut BytesMut) {
        dst.extend_from_slice(&self.body);
    }

    fn piece_offsets(&self) -> Vec<u32> {
        vec![self.body.len() as u32]
    }

    fn decode_from_body(prefix: TableId, _offsets: &[u32], body: Bytes) -> Result<Self, CodecError> {
        Ok(SimpleKey { table: prefix, body })
    }
}
