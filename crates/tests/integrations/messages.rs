//! End-to-end round-trips of full message bodies against envelopes built
//! from shared `test_util` strategies, plus the flag-field exclusivity
//! property (spec.md §8, invariant 8) for the Accept reply.

use bytes::{Bytes, BytesMut};
use proptest::prelude::*;

use accord_proto::{AcceptKind, AcceptReply, AcceptRequest, Envelope, NotAccept, Version};
use routable::{AbstractKeys, AcceptOutcome, Ballot, Deps, PartialDeps, Route, RouteTag, SimpleKey, Status, TableId, TxnId};
use test_util::{ballot, timestamp, txn_id};

fn sample_scope() -> Route<SimpleKey> {
    Route::RoutingKeys(AbstractKeys::new(vec![SimpleKey::new(
        TableId::variable(1),
        Bytes::from_static(b"scope"),
    )]))
}

#[test]
fn version_is_threaded_through_an_envelope_bearing_request() {
    let envelope = Envelope {
        txn_id: TxnId(routable::Timestamp { epoch: 1, hlc: 2, node: 3 }),
        scope: sample_scope(),
        wait_for_epoch: 1,
        min_epoch: 1,
    };
    let mut buf = BytesMut::new();
    Version::V1.encode(&mut buf);
    envelope.encode(&mut buf);

    let mut bytes = buf.freeze();
    assert_eq!(Version::decode(&mut bytes).unwrap(), Version::V1);
    assert_eq!(Envelope::decode(&mut bytes, &[RouteTag::RoutingKeys]).unwrap(), envelope);
}

#[test]
fn accept_request_and_reply_roundtrip_through_an_envelope() {
    let envelope = Envelope {
        txn_id: TxnId(routable::Timestamp { epoch: 4, hlc: 40, node: 1 }),
        scope: sample_scope(),
        wait_for_epoch: 4,
        min_epoch: 6,
    };
    let request = AcceptRequest {
        kind: AcceptKind::Accept,
        is_partial_accept: false,
        ballot: Ballot(routable::Timestamp { epoch: 4, hlc: 41, node: 2 }),
        execute_at: routable::Timestamp { epoch: 4, hlc: 50, node: 1 },
        partial_deps: PartialDeps(Bytes::from_static(b"partial-deps")),
    };

    let mut buf = BytesMut::new();
    envelope.encode(&mut buf);
    request.encode(&envelope.txn_id, &mut buf);

    let mut bytes = buf.freeze();
    let decoded_envelope = Envelope::decode(&mut bytes, &[RouteTag::RoutingKeys]).unwrap();
    assert_eq!(decoded_envelope, envelope);
    let decoded_request = AcceptRequest::decode(&decoded_envelope.txn_id, &mut bytes).unwrap();
    assert_eq!(decoded_request, request);

    let not_accept = NotAccept {
        status: Status::PreAccepted,
        ballot: request.ballot,
        txn_id: envelope.txn_id,
        participants: sample_scope(),
    };
    let mut reply_buf = BytesMut::new();
    not_accept.encode(&mut reply_buf);
    let mut reply_bytes = reply_buf.freeze();
    assert_eq!(NotAccept::decode(&mut reply_bytes).unwrap(), not_accept);
}

proptest! {
    #[test]
    fn accept_reply_flag_bits_exactly_match_field_presence(
        txn in txn_id(),
        outcome_ordinal in 0u8..4,
        superseded in proptest::option::of(ballot()),
        committed_execute_at in proptest::option::of(timestamp()),
        deps_present in proptest::bool::ANY,
    ) {
        let reply = AcceptReply {
            outcome: AcceptOutcome::from_ordinal(outcome_ordinal).unwrap(),
            superseded_by: superseded,
            committed_execute_at,
            successful: None,
            deps: if deps_present { Some(Deps(Bytes::from_static(b"d"))) } else { None },
            execute_flags: None,
        };
        let mut buf = BytesMut::new();
        reply.encode(&txn, &mut buf);
        let flags = buf[0];

        prop_assert_eq!(flags & 0x08 != 0, reply.superseded_by.is_some());
        prop_assert_eq!(flags & 0x10 != 0, reply.committed_execute_at.is_some());
        prop_assert_eq!(flags & 0x20 != 0, reply.successful.is_some());
        prop_assert_eq!(flags & 0x40 != 0, reply.deps.is_some());
        prop_assert_eq!(flags & 0x80 != 0, reply.execute_flags.is_some());

        let mut bytes = buf.freeze();
        prop_assert_eq!(AcceptReply::decode(&txn, &mut bytes).unwrap(), reply);
    }
}
