//! `Range<K>`: two keys under the same prefix, treated as a single
//! [`Routable`] entry with `OFFSET_COUNT = 2` so the grouping codec can pack
//! ranges exactly as densely as single keys (spec.md §4.5's "for Range, 2
//! offsets per entry: after-start, after-end").

use bytes::{Bytes, BytesMut};

use wire_core::CodecError;

use crate::key::Routable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range<K: Routable> {
    pub start: K,
    pub end: K,
}

impl<K: Routable> Range<K> {
    pub fn new(start: K, end: K) -> Self {
        Range { start, end }
    }
}

impl<K: Routable> Routable for Range<K> {
    type Prefix = K::Prefix;
    const OFFSET_COUNT: usize = 2;

    fn prefix(&self) -> K::Prefix {
        self.start.prefix()
    }

    fn encode_prefix(prefix: &K::Prefix, dst: &mut BytesMut) {
        K::encode_prefix(prefix, dst);
    }

    fn decode_prefix(src: &mut Bytes) -> Result<K::Prefix, CodecError> {
        K::decode_prefix(src)
    }

    fn prefix_size(prefix: &K::Prefix) -> usize {
        K::prefix_size(prefix)
    }

    fn fixed_length_for_prefix(prefix: &K::Prefix) -> Option<usize> {
        K::fixed_length_for_prefix(prefix).map(|n| n * 2)
    }

    fn fixed_offsets(total_len: usize) -> Vec<u32> {
        vec![(total_len / 2) as u32, total_len as u32]
    }

    fn encode_body(&self, dst: &mut BytesMut) {
        self.start.encode_body(dst);
        self.end.encode_body(dst);
    }

    fn piece_offsets(&self) -> Vec<u32> {
        let start_len = *self.start.piece_offsets().last().expect("nonempty");
        let end_len = *self.end.piece_offsets().last().expect("nonempty");
        vec![start_len, start_len + end_len]
    }

    fn decode_from_body(prefix: K::Prefix, offsets: &[u32], body: Bytes) -> Result<Self, CodecError> {
        let split = offsets[0] as usize;
        let total = offsets[1] as usize;
        let start_body = body.slice(0..split);
        let end_body = body.slice(split..total);
        let start = K::decode_from_body(prefix.clone(), &[offsets[0]], start_body)?;
        let end = K::decode_from_body(prefix, &[offsets[1] - offsets[0]], end_body)?;
        Ok(Range { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{SimpleKey, TableId, decode_standalone, encode_standalone};

    #[test]
    fn variable_range_roundtrip() {
        let table = TableId::variable(1);
        let range = Range::new(
            SimpleKey::new(table, Bytes::from_static(b"aaa")),
            SimpleKey::new(table, Bytes::from_static(b"zz")),
        );
        let mut buf = BytesMut::new();
        encode_standalone(&range, &mut buf);
        let mut bytes = buf.freeze();
        assert_eq!(decode_standalone::<Range<SimpleKey>>(&mut bytes).unwrap(), range);
    }

    #[test]
    fn fixed_range_roundtrip() {
        let table = TableId::fixed(2, 3);
        let range = Range::new(
            SimpleKey::new(table, Bytes::from_static(b"aaa")),
            SimpleKey::new(table, Bytes::from_static(b"zzz")),
        );
        assert_eq!(Range::<SimpleKey>::fixed_length_for_prefix(&table), Some(6));
        let mut buf = BytesMut::new();
        encode_standalone(&range, &mut buf);
        let mut bytes = buf.freeze();
        assert_eq!(decode_standalone::<Range<SimpleKey>>(&mut bytes).unwrap(), range);
    }
}
