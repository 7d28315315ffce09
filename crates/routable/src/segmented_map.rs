//! Segmented map codec (component C7): a sorted boundary-key array of
//! length `n + 1` partitioning key-space into `n` segments, each carrying an
//! optional per-segment value (`KnownMap`, `LatestDeps` in BeginRecovery's
//! reply body).
//!
//! Grounded on `crates/protocol/src/message/publish.rs`'s header handling
//! (a kind byte gating a conditional payload), generalized here to a count
//! followed by `count` interleaved `(boundary, kind byte, value)` triples and
//! a final trailing boundary — each boundary a standalone [`Routable`]
//! encoding (spec.md §4.7), not a prefix-grouped `AbstractKeys` run.

use bytes::{BufMut, Bytes, BytesMut};

use wire_core::{CodecError, WireDecode, WireEncode, decode_optional, encode_optional, optional_encoded_len};

use crate::collection::AbstractKeys;
use crate::key::{Routable, decode_standalone, encode_standalone, standalone_encoded_len};
use crate::primitives::{Ballot, Deps, Known, KnownDeps};

/// Per-segment value codec. A `None` segment is the "no information for
/// this range" case every segmented map needs regardless of payload shape.
pub trait SegmentCodec: Sized {
    fn encode_segment(segment: &Option<Self>, dst: &mut BytesMut);
    fn decode_segment(src: &mut Bytes) -> Result<Option<Self>, CodecError>;
    fn encoded_len_segment(segment: &Option<Self>) -> usize;
}

/// `n + 1` sorted boundary keys and `n` segment values (spec.md §4.7's
/// "count + 1 boundaries" invariant), wire-encoded as `count` interleaved
/// `boundary, kind-byte, value` triples followed by a trailing boundary — or
/// just `uvarint(0)` with no boundaries at all when the map is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedMap<K: Routable, V: SegmentCodec> {
    boundaries: AbstractKeys<K>,
    segments: Vec<Option<V>>,
}

impl<K: Routable, V: SegmentCodec> SegmentedMap<K, V> {
    /// Builds a map from `n + 1` boundaries and `n` segments, or from zero
    /// boundaries and zero segments (the empty-map special case). Returns
    /// `None` if the counts satisfy neither shape.
    pub fn new(boundaries: AbstractKeys<K>, segments: Vec<Option<V>>) -> Option<Self> {
        if segments.is_empty() {
            if !boundaries.is_empty() {
                return None;
            }
        } else if boundaries.len() != segments.len() + 1 {
            return None;
        }
        Some(SegmentedMap { boundaries, segments })
    }

    pub fn boundaries(&self) -> &AbstractKeys<K> {
        &self.boundaries
    }

    pub fn segments(&self) -> &[Option<V>] {
        &self.segments
    }

    pub fn encode(&self, dst: &mut BytesMut) {
        let count = self.segments.len();
        dst.put_uvarint(count as u64);
        if count == 0 {
            return;
        }
        let boundaries = self.boundaries.items();
        for i in 0..count {
            encode_standalone(&boundaries[i], dst);
            V::encode_segment(&self.segments[i], dst);
        }
        encode_standalone(&boundaries[count], dst);
    }

    pub fn decode(src: &mut Bytes) -> Result<Self, CodecError> {
        let count = src.read_uvarint()? as usize;
        if count == 0 {
            return Ok(SegmentedMap { boundaries: AbstractKeys::new(Vec::new()), segments: Vec::new() });
        }
        let mut boundaries = Vec::with_capacity(count + 1);
        let mut segments = Vec::with_capacity(count);
        for _ in 0..count {
            boundaries.push(decode_standalone::<K>(src)?);
            segments.push(V::decode_segment(src)?);
        }
        boundaries.push(decode_standalone::<K>(src)?);
        Ok(SegmentedMap { boundaries: AbstractKeys::new(boundaries), segments })
    }

    pub fn encoded_len(&self) -> usize {
        let count = self.segments.len();
        let mut len = wire_core::varint::size_of_uvarint(count as u64);
        if count == 0 {
            return len;
        }
        let boundaries = self.boundaries.items();
        for i in 0..count {
            len += standalone_encoded_len(&boundaries[i]);
            len += V::encoded_len_segment(&self.segments[i]);
        }
        len += standalone_encoded_len(&boundaries[count]);
        len
    }
}

/// A segment value for `KnownMap`: the `(min, max)` range of [`Known`]
/// progress observed across a key range, collapsed to a single enum when
/// `min == max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownPair {
    pub min: Known,
    pub max: Known,
}

impl KnownPair {
    pub fn exact(known: Known) -> Self {
        KnownPair { min: known, max: known }
    }
}

impl SegmentCodec for KnownPair {
    fn encode_segment(segment: &Option<Self>, dst: &mut BytesMut) {
        match segment {
            None => dst.put_u8(0),
            Some(pair) if pair.min == pair.max => {
                dst.put_u8(1);
                pair.min.encode(dst);
            }
            Some(pair) => {
                dst.put_u8(2);
                pair.min.encode(dst);
                pair.max.encode(dst);
            }
        }
    }

    fn decode_segment(src: &mut Bytes) -> Result<Option<Self>, CodecError> {
        match src.read_u8()? {
            0 => Ok(None),
            1 => {
                let known = Known::decode(src)?;
                Ok(Some(KnownPair::exact(known)))
            }
            2 => {
                let min = Known::decode(src)?;
                let max = Known::decode(src)?;
                Ok(Some(KnownPair { min, max }))
            }
            other => Err(CodecError::UnexpectedVariant { observed: other }),
        }
    }

    fn encoded_len_segment(segment: &Option<Self>) -> usize {
        match segment {
            None => 1,
            Some(pair) if pair.min == pair.max => 1 + pair.min.encoded_len(),
            Some(pair) => 1 + pair.min.encoded_len() + pair.max.encoded_len(),
        }
    }
}

pub type KnownMap<K> = SegmentedMap<K, KnownPair>;

/// A segment value for `LatestDeps`: the most advanced deps knowledge for a
/// key range, or nothing if this range has no coordinator activity yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestDepsSegment {
    pub known_deps: KnownDeps,
    pub ballot: Ballot,
    pub coordinated_deps: Option<Deps>,
    pub local_deps: Option<Deps>,
}

impl SegmentCodec for LatestDepsSegment {
    fn encode_segment(segment: &Option<Self>, dst: &mut BytesMut) {
        match segment {
            None => dst.put_u8(0),
            Some(seg) => {
                dst.put_u8(1);
                seg.known_deps.encode(dst);
                seg.ballot.encode(dst);
                encode_optional(dst, &seg.coordinated_deps, |v, d| v.encode(d));
                encode_optional(dst, &seg.local_deps, |v, d| v.encode(d));
            }
        }
    }

    fn decode_segment(src: &mut Bytes) -> Result<Option<Self>, CodecError> {
        match src.read_u8()? {
            0 => Ok(None),
            1 => {
                let known_deps = KnownDeps::decode(src)?;
                let ballot = Ballot::decode(src)?;
                let coordinated_deps = decode_optional(src, |s| Deps::decode(s))?;
                let local_deps = decode_optional(src, |s| Deps::decode(s))?;
                Ok(Some(LatestDepsSegment { known_deps, ballot, coordinated_deps, local_deps }))
            }
            other => Err(CodecError::UnexpectedVariant { observed: other }),
        }
    }

    fn encoded_len_segment(segment: &Option<Self>) -> usize {
        match segment {
            None => 1,
            Some(seg) => {
                1 + seg.known_deps.encoded_len()
                    + seg.ballot.encoded_len()
                    + optional_encoded_len(&seg.coordinated_deps, |v| v.encoded_len())
                    + optional_encoded_len(&seg.local_deps, |v| v.encoded_len())
            }
        }
    }
}

pub type LatestDeps<K> = SegmentedMap<K, LatestDepsSegment>;
