//! Property: every composite type's `encoded_len` agrees exactly with the
//! length `encode` actually writes (spec.md §8's size-precomputation
//! invariant) — driven by `test_util`'s shared strategies so this sweeps
//! the same input space as the round-trip properties rather than a
//! hand-picked fixture per type.

use bytes::BytesMut;
use proptest::collection::vec;
use proptest::prelude::*;

use routable::{AbstractKeys, Known, KnownMap, KnownPair, Route, SegmentedMap, SimpleKey, TableId};
use test_util::{ballot, flag_word, range_of, simple_key, simple_key_run, table_id, timestamp, txn_id};

fn known() -> impl Strategy<Value = Known> {
    prop_oneof![
        Just(Known::Nothing),
        Just(Known::Definition),
        Just(Known::ExecuteAt),
        Just(Known::Deps),
        Just(Known::Outcome),
        Just(Known::Apply),
    ]
}

fn known_pair() -> impl Strategy<Value = KnownPair> {
    (known(), known()).prop_map(|(min, max)| KnownPair { min, max })
}

/// A boundary/segment pair shaped for [`SegmentedMap::new`]'s `n + 1`
/// boundaries, `n` segments invariant, or the empty-map special case.
fn known_map() -> impl Strategy<Value = KnownMap<SimpleKey>> {
    simple_key_run(0..12).prop_flat_map(|boundaries| {
        if boundaries.len() < 2 {
            return Just(SegmentedMap::new(AbstractKeys::new(vec![]), vec![]).unwrap()).boxed();
        }
        let segment_count = boundaries.len() - 1;
        vec(proptest::option::of(known_pair()), segment_count)
            .prop_map(move |segments| SegmentedMap::new(AbstractKeys::new(boundaries.clone()), segments).unwrap())
            .boxed()
    })
}

proptest! {
    #[test]
    fn timestamp_size_agrees(ts in timestamp()) {
        let mut buf = BytesMut::new();
        ts.encode(&mut buf);
        prop_assert_eq!(buf.len(), ts.encoded_len());
    }

    #[test]
    fn txn_id_and_ballot_size_agrees(txn in txn_id(), b in ballot()) {
        let mut txn_buf = BytesMut::new();
        txn.encode(&mut txn_buf);
        prop_assert_eq!(txn_buf.len(), txn.encoded_len());

        let mut ballot_buf = BytesMut::new();
        b.encode(&mut ballot_buf);
        prop_assert_eq!(ballot_buf.len(), b.encoded_len());
    }

    #[test]
    fn execute_at_delta_size_agrees(txn in txn_id(), execute_at in timestamp()) {
        let mut buf = BytesMut::new();
        routable::encode_execute_at_delta(&txn, &execute_at, &mut buf);
        prop_assert_eq!(buf.len(), routable::execute_at_delta_encoded_len(&txn, &execute_at));
    }

    #[test]
    fn flag_word_size_agrees(flags in flag_word()) {
        let mut buf = BytesMut::new();
        flags.encode(&mut buf);
        prop_assert_eq!(buf.len(), flags.encoded_len());
    }

    #[test]
    fn simple_key_standalone_size_agrees(key in table_id(None).prop_flat_map(|t| simple_key(t, 0..64))) {
        let mut buf = BytesMut::new();
        routable::encode_standalone(&key, &mut buf);
        prop_assert_eq!(buf.len(), routable::standalone_encoded_len(&key));
    }

    #[test]
    fn range_standalone_size_agrees(range in any::<u32>().prop_flat_map(|id| range_of(TableId::variable(id)))) {
        let mut buf = BytesMut::new();
        routable::encode_standalone(&range, &mut buf);
        prop_assert_eq!(buf.len(), routable::standalone_encoded_len(&range));
    }

    #[test]
    fn abstract_keys_size_agrees(items in simple_key_run(0..16)) {
        let keys = AbstractKeys::new(items);
        let mut buf = BytesMut::new();
        keys.encode(&mut buf);
        prop_assert_eq!(buf.len(), keys.encoded_len());
    }

    #[test]
    fn routing_keys_route_size_agrees(items in simple_key_run(1..8)) {
        let route = Route::RoutingKeys(AbstractKeys::new(items));
        let mut buf = BytesMut::new();
        route.encode(&mut buf);
        prop_assert_eq!(buf.len(), route.encoded_len());
    }

    #[test]
    fn known_map_size_agrees(map in known_map()) {
        let mut buf = BytesMut::new();
        map.encode(&mut buf);
        prop_assert_eq!(buf.len(), map.encoded_len());
    }
}
