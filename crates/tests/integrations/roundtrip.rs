//! Property: round-trip + size-agreement across the routing primitives,
//! driven by `test_util`'s shared strategies rather than per-crate
//! hand-picked fixtures (spec.md §8, invariants 1-2).

use bytes::BytesMut;
use proptest::prelude::*;

use routable::{Ballot, TableId, TxnId};
use test_util::{ballot, simple_key, table_id, timestamp, txn_id};

proptest! {
    #[test]
    fn timestamp_roundtrip_and_size_agrees(ts in timestamp()) {
        let mut buf = BytesMut::new();
        ts.encode(&mut buf);
        let mut bytes = buf.clone().freeze();
        prop_assert_eq!(routable::Timestamp::decode(&mut bytes).unwrap(), ts);
        prop_assert!(bytes.is_empty());
    }

    #[test]
    fn txn_id_and_ballot_roundtrip(txn in txn_id(), b in ballot()) {
        let mut txn_buf = BytesMut::new();
        txn.encode(&mut txn_buf);
        let mut txn_bytes = txn_buf.freeze();
        prop_assert_eq!(TxnId::decode(&mut txn_bytes).unwrap(), txn);

        let mut ballot_buf = BytesMut::new();
        b.encode(&mut ballot_buf);
        let mut ballot_bytes = ballot_buf.freeze();
        prop_assert_eq!(Ballot::decode(&mut ballot_bytes).unwrap(), b);
    }

    #[test]
    fn execute_at_delta_roundtrips_against_any_txn_id(txn in txn_id(), execute_at in timestamp()) {
        let mut buf = BytesMut::new();
        routable::encode_execute_at_delta(&txn, &execute_at, &mut buf);
        let mut bytes = buf.freeze();
        prop_assert_eq!(routable::decode_execute_at_delta(&txn, &mut bytes).unwrap(), execute_at);
    }

    #[test]
    fn simple_key_standalone_roundtrip(key in table_id(None).prop_flat_map(|t| simple_key(t, 0..64))) {
        let mut buf = BytesMut::new();
        routable::encode_standalone(&key, &mut buf);
        let mut bytes = buf.freeze();
        prop_assert_eq!(routable::decode_standalone::<routable::SimpleKey>(&mut bytes).unwrap(), key);
    }

    #[test]
    fn fixed_length_key_standalone_roundtrip(id in any::<u32>(), body in proptest::collection::vec(any::<u8>(), 8)) {
        let table = TableId::fixed(id, 8);
        let key = routable::SimpleKey::new(table, bytes::Bytes::from(body));
        let mut buf = BytesMut::new();
        routable::encode_standalone(&key, &mut buf);
        let mut bytes = buf.freeze();
        prop_assert_eq!(routable::decode_standalone::<routable::SimpleKey>(&mut bytes).unwrap(), key);
    }
}
