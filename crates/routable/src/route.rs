//! Tagged-union routables codec (component C6): the six ways a message can
//! describe "what this operation touches" — a bare key list, a key list
//! plus a distinguished home key (partial/full key route), a bare range
//! list, or a range list plus a distinguished home key.
//!
//! Grounded on `crates/protocol/src/codec.rs`'s `ServerCodec`/`ClientCodec`
//! dispatch on a leading [`Command`](crate) byte and
//! `crates/protocol/src/lib.rs::Command`'s explicit-discriminant enum;
//! generalized from a full 10-command dispatch to a 6-variant dispatch that
//! also checks the decoded tag against a caller-supplied permitted subset.

use bytes::{BufMut, Bytes, BytesMut};

use wire_core::{CodecError, WireDecode, WireEncode};

use crate::collection::AbstractKeys;
use crate::key::{Routable, decode_standalone, encode_standalone, standalone_encoded_len};
use crate::range::Range;

/// Wire discriminant for each `Route` variant. Explicit values so
/// reordering the enum in source never changes the wire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTag {
    RoutingKeys = 1,
    PartialKeyRoute = 2,
    FullKeyRoute = 3,
    RoutingRanges = 4,
    PartialRangeRoute = 5,
    FullRangeRoute = 6,
}

impl RouteTag {
    fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            1 => RouteTag::RoutingKeys,
            2 => RouteTag::PartialKeyRoute,
            3 => RouteTag::FullKeyRoute,
            4 => RouteTag::RoutingRanges,
            5 => RouteTag::PartialRangeRoute,
            6 => RouteTag::FullRangeRoute,
            _ => return None,
        })
    }
}

/// A key list plus a distinguished home key, back-reference-compressed
/// against the list when the home key is itself a member (spec.md §4.6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRoute<K: Routable> {
    pub keys: AbstractKeys<K>,
    pub home_key: K,
}

fn encode_home_key<K: Routable + PartialEq>(keys: &AbstractKeys<K>, home_key: &K, dst: &mut BytesMut) {
    match keys.items().iter().position(|k| k == home_key) {
        Some(index) => dst.put_uvarint(index as u64 + 1),
        None => {
            dst.put_uvarint(0);
            encode_standalone(home_key, dst);
        }
    }
}

fn decode_home_key<K: Routable>(keys: &AbstractKeys<K>, src: &mut Bytes) -> Result<K, CodecError> {
    let marker = src.read_uvarint()?;
    if marker == 0 {
        decode_standalone::<K>(src)
    } else {
        let index = (marker - 1) as usize;
        keys.items()
            .get(index)
            .cloned()
            .ok_or(CodecError::CorruptInput { reason: "homeKey back-reference out of range" })
    }
}

fn encode_home_key_len<K: Routable + PartialEq>(keys: &AbstractKeys<K>, home_key: &K) -> usize {
    match keys.items().iter().position(|k| k == home_key) {
        Some(index) => wire_core::varint::size_of_uvarint(index as u64 + 1),
        None => wire_core::varint::size_of_uvarint(0) + standalone_encoded_len(home_key),
    }
}

impl<K: Routable + PartialEq> KeyRoute<K> {
    pub fn encode(&self, dst: &mut BytesMut) {
        self.keys.encode(dst);
        encode_home_key(&self.keys, &self.home_key, dst);
    }

    pub fn decode(src: &mut Bytes) -> Result<Self, CodecError> {
        let keys = AbstractKeys::decode(src)?;
        let home_key = decode_home_key(&keys, src)?;
        Ok(KeyRoute { keys, home_key })
    }

    pub fn encoded_len(&self) -> usize {
        self.keys.encoded_len() + encode_home_key_len(&self.keys, &self.home_key)
    }
}

/// A range list plus a distinguished home key. Ranges never back-reference:
/// the home key is always a plain key, not a member of the range list, so
/// it is always standalone-encoded (spec.md §4.6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRoute<K: Routable> {
    pub ranges: AbstractKeys<Range<K>>,
    pub home_key: K,
}

impl<K: Routable> RangeRoute<K> {
    pub fn encode(&self, dst: &mut BytesMut) {
        self.ranges.encode(dst);
        encode_standalone(&self.home_key, dst);
    }

    pub fn decode(src: &mut Bytes) -> Result<Self, CodecError> {
        let ranges = AbstractKeys::decode(src)?;
        let home_key = decode_standalone::<K>(src)?;
        Ok(RangeRoute { ranges, home_key })
    }

    pub fn encoded_len(&self) -> usize {
        self.ranges.encoded_len() + standalone_encoded_len(&self.home_key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route<K: Routable + PartialEq> {
    RoutingKeys(AbstractKeys<K>),
    PartialKeyRoute(KeyRoute<K>),
    FullKeyRoute(KeyRoute<K>),
    RoutingRanges(AbstractKeys<Range<K>>),
    PartialRangeRoute(RangeRoute<K>),
    FullRangeRoute(RangeRoute<K>),
}

impl<K: Routable + PartialEq> Route<K> {
    fn tag(&self) -> RouteTag {
        match self {
            Route::RoutingKeys(_) => RouteTag::RoutingKeys,
            Route::PartialKeyRoute(_) => RouteTag::PartialKeyRoute,
            Route::FullKeyRoute(_) => RouteTag::FullKeyRoute,
            Route::RoutingRanges(_) => RouteTag::RoutingRanges,
            Route::PartialRangeRoute(_) => RouteTag::PartialRangeRoute,
            Route::FullRangeRoute(_) => RouteTag::FullRangeRoute,
        }
    }

    pub fn encode(&self, dst: &mut BytesMut) {
        dst.put_u8(self.tag() as u8);
        match self {
            Route::RoutingKeys(keys) => keys.encode(dst),
            Route::PartialKeyRoute(route) | Route::FullKeyRoute(route) => route.encode(dst),
            Route::RoutingRanges(ranges) => ranges.encode(dst),
            Route::PartialRangeRoute(route) | Route::FullRangeRoute(route) => route.encode(dst),
        }
    }

    /// Decodes a `Route`, rejecting any tag not present in `permitted` — the
    /// caller (a specific request/reply body) only accepts the subset its
    /// own wire format allows (spec.md §4.6).
    pub fn decode(src: &mut Bytes, permitted: &[RouteTag]) -> Result<Self, CodecError> {
        let byte = src.read_u8()?;
        let tag = RouteTag::from_byte(byte).ok_or(CodecError::UnexpectedVariant { observed: byte })?;
        if !permitted.contains(&tag) {
            return Err(CodecError::UnexpectedVariant { observed: byte });
        }
        Ok(match tag {
            RouteTag::RoutingKeys => Route::RoutingKeys(AbstractKeys::decode(src)?),
            RouteTag::PartialKeyRoute => Route::PartialKeyRoute(KeyRoute::decode(src)?),
            RouteTag::FullKeyRoute => Route::FullKeyRoute(KeyRoute::decode(src)?),
            RouteTag::RoutingRanges => Route::RoutingRanges(AbstractKeys::decode(src)?),
            RouteTag::PartialRangeRoute => Route::PartialRangeRoute(RangeRoute::decode(src)?),
            RouteTag::FullRangeRoute => Route::FullRangeRoute(RangeRoute::decode(src)?),
        })
    }

    pub fn encoded_len(&self) -> usize {
        1 + match self {
            Route::RoutingKeys(keys) => keys.encoded_len(),
            Route::PartialKeyRoute(route) | Route::FullKeyRoute(route) => route.encoded_len(),
            Route::RoutingRanges(ranges) => ranges.encoded_len(),
            Route::PartialRangeRoute(route) | Route::FullRangeRoute(route) => route.encoded_len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{SimpleKey, TableId};
    use bytes::Bytes as BytesOwned;

    const ALL: &[RouteTag] = &[
        RouteTag::RoutingKeys,
        RouteTag::PartialKeyRoute,
        RouteTag::FullKeyRoute,
        RouteTag::RoutingRanges,
        RouteTag::PartialRangeRoute,
        RouteTag::FullRangeRoute,
    ];

    fn key(body: &'static [u8]) -> SimpleKey {
        SimpleKey::new(TableId::variable(1), BytesOwned::from_static(body))
    }

    #[test]
    fn routing_keys_roundtrip() {
        let route = Route::RoutingKeys(AbstractKeys::new(vec![key(b"a"), key(b"b")]));
        let mut buf = BytesMut::new();
        route.encode(&mut buf);
        let mut bytes = buf.freeze();
        assert_eq!(Route::decode(&mut bytes, ALL).unwrap(), route);
    }

    #[test]
    fn key_route_with_home_key_as_member_uses_back_reference() {
        let keys = AbstractKeys::new(vec![key(b"a"), key(b"b"), key(b"c")]);
        let route = Route::FullKeyRoute(KeyRoute { home_key: keys.items()[1].clone(), keys });
        let mut buf = BytesMut::new();
        route.encode(&mut buf);
        let mut bytes = buf.freeze();
        assert_eq!(Route::decode(&mut bytes, ALL).unwrap(), route);
    }

    #[test]
    fn key_route_with_foreign_home_key_is_standalone_encoded() {
        let keys = AbstractKeys::new(vec![key(b"a"), key(b"b")]);
        let route = Route::PartialKeyRoute(KeyRoute { keys, home_key: key(b"not-a-member") });
        let mut buf = BytesMut::new();
        route.encode(&mut buf);
        let mut bytes = buf.freeze();
        assert_eq!(Route::decode(&mut bytes, ALL).unwrap(), route);
    }

    #[test]
    fn range_route_roundtrip() {
        let ranges = AbstractKeys::new(vec![Range::new(key(b"a"), key(b"b"))]);
        let route = Route::FullRangeRoute(RangeRoute { ranges, home_key: key(b"a") });
        let mut buf = BytesMut::new();
        route.encode(&mut buf);
        let mut bytes = buf.freeze();
        assert_eq!(Route::decode(&mut bytes, ALL).unwrap(), route);
    }

    #[test]
    fn encoded_len_matches_encode_for_every_variant() {
        let keys = AbstractKeys::new(vec![key(b"a"), key(b"b"), key(b"c")]);
        let ranges = AbstractKeys::new(vec![Range::new(key(b"a"), key(b"b"))]);
        let routes = vec![
            Route::RoutingKeys(keys.clone()),
            Route::FullKeyRoute(KeyRoute { home_key: keys.items()[1].clone(), keys: keys.clone() }),
            Route::PartialKeyRoute(KeyRoute { keys: keys.clone(), home_key: key(b"not-a-member") }),
            Route::RoutingRanges(ranges.clone()),
            Route::FullRangeRoute(RangeRoute { ranges, home_key: key(b"a") }),
        ];
        for route in routes {
            let mut buf = BytesMut::new();
            route.encode(&mut buf);
            assert_eq!(buf.len(), route.encoded_len());
        }
    }

    #[test]
    fn decode_rejects_variant_outside_permitted_subset() {
        let route = Route::RoutingKeys(AbstractKeys::new(vec![key(b"a")]));
        let mut buf = BytesMut::new();
        route.encode(&mut buf);
        let mut bytes = buf.freeze();
        let permitted = [RouteTag::PartialKeyRoute, RouteTag::FullKeyRoute];
        assert!(Route::decode(&mut bytes, &permitted).is_err());
    }

    #[test]
    fn decode_rejects_unknown_tag_byte() {
        let mut buf = BytesMut::new();
        buf.put_u8(0xFF);
        let mut bytes = buf.freeze();
        assert_eq!(Route::<SimpleKey>::decode(&mut bytes, ALL), Err(CodecError::UnexpectedVariant { observed: 0xFF }));
    }
}
