//! Property: prefix-grouping equivalence, subset round-trip, and
//! skippability for `AbstractKeys` (spec.md §8, invariants 4-7).

use bytes::BytesMut;
use proptest::prelude::*;

use routable::{AbstractKeys, SimpleKey, TableId};
use test_util::simple_key_run;

proptest! {
    #[test]
    fn ordering_is_preserved_and_groups_match_prefix_runs(items in simple_key_run(1..16)) {
        let keys = AbstractKeys::new(items.clone());
        let mut buf = BytesMut::new();
        keys.encode(&mut buf);
        let mut bytes = buf.freeze();
        let decoded = AbstractKeys::decode(&mut bytes).unwrap();
        prop_assert_eq!(decoded.items().to_vec(), items);
    }

    #[test]
    fn skip_advances_exactly_as_far_as_decode(items in simple_key_run(0..16)) {
        let keys = AbstractKeys::new(items.clone());
        let mut buf = BytesMut::new();
        keys.encode(&mut buf);
        let encoded = buf.freeze();

        let mut for_skip = encoded.clone();
        let skipped_count = AbstractKeys::<SimpleKey>::skip(&mut for_skip).unwrap();
        prop_assert_eq!(skipped_count, items.len());
        prop_assert!(for_skip.is_empty());

        let mut for_decode = encoded.clone();
        let decoded = AbstractKeys::decode(&mut for_decode).unwrap();
        prop_assert_eq!(decoded.len(), items.len());
        prop_assert!(for_decode.is_empty());
    }

    #[test]
    fn subset_round_trips_against_its_superset(universe in simple_key_run(1..16)) {
        let subset: Vec<SimpleKey> = universe.iter().step_by(2).cloned().collect();
        let mut buf = BytesMut::new();
        routable::encode_subset_bitmap(&universe, &subset, &mut buf);
        let mut bytes = buf.freeze();
        let decoded = routable::decode_subset_bitmap(&universe, &mut bytes).unwrap();
        prop_assert_eq!(decoded, subset);
    }
}

#[test]
fn single_shared_prefix_yields_exactly_one_group() {
    let table = TableId::variable(9);
    let keys = AbstractKeys::new(vec![
        SimpleKey::new(table, bytes::Bytes::from_static(b"a")),
        SimpleKey::new(table, bytes::Bytes::from_static(b"b")),
        SimpleKey::new(table, bytes::Bytes::from_static(b"c")),
    ]);
    let mut buf = BytesMut::new();
    keys.encode(&mut buf);

    // One group means the first remaining-after-group uvarint is 0 and
    // consumes every remaining entry; re-decoding confirms this directly
    // rather than peeking at group-count internals the codec doesn't expose.
    let mut bytes = buf.freeze();
    let decoded = AbstractKeys::decode(&mut bytes).unwrap();
    assert_eq!(decoded.len(), 3);
}

#[test]
fn empty_collection_is_single_zero_byte() {
    let keys: AbstractKeys<SimpleKey> = AbstractKeys::new(vec![]);
    let mut buf = BytesMut::new();
    keys.encode(&mut buf);
    assert_eq!(buf.len(), 1);
    assert_eq!(buf[0], 0x00);
}
