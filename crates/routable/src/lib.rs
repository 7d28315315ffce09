//! Structural codecs for routing-shaped values: keys and ranges (C4),
//! prefix-grouped collections of either (C5), the six-variant tagged-union
//! routables (C6), and segmented boundary maps (C7). Every codec here is
//! generic over the [`key::Routable`] trait so the same grouping and
//! tagged-union machinery serves both key-shaped and range-shaped data.

#![forbid(unsafe_code)]

pub mod collection;
pub mod key;
pub mod primitives;
pub mod range;
pub mod route;
pub mod segmented_map;

pub use collection::{AbstractKeys, decode_subset_bitmap, encode_subset_bitmap, subset_bitmap_encoded_len};
pub use key::{Routable, SimpleKey, TableId, decode_standalone, encode_standalone, standalone_encoded_len};
pub use primitives::{
    AcceptOutcome, Ballot, Deps, Durability, Known, KnownDeps, OpaquePayload, Participants, PartialDeps, PartialTxn,
    SaveStatus, SimpleReply, Status, Timestamp, TxnId, Writes, decode_execute_at_delta, encode_execute_at_delta,
    execute_at_delta_encoded_len,
};
pub use range::Range;
pub use route::{KeyRoute, RangeRoute, Route, RouteTag};
pub use segmented_map::{KnownMap, KnownPair, LatestDeps, LatestDepsSegment, SegmentCodec, SegmentedMap};
