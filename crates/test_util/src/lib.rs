//! Reusable `proptest` strategies for the routable/message types, shared by
//! every integration test in `crates/tests` so each test file doesn't
//! reinvent the same arbitrary-value builders.
//!
//! Grounded on `amunchain-amunchain`'s `tests/prop_merkle_invariants.rs`
//! style (hand-built `Strategy` combinators feeding a `proptest!` block)
//! and `examples/other_examples/ea8d53a8_RephlexZero-strata__.../proptest_wire.rs.rs`
//! (boundary-weighted integer strategies for a wire codec).

#![forbid(unsafe_code)]

use bytes::Bytes;
use proptest::collection::vec;
use proptest::prelude::*;

use routable::{Ballot, Range, SimpleKey, TableId, Timestamp, TxnId};
use wire_core::FlagWord;

/// A `u64` biased toward the small values and varint-length boundaries a
/// real transaction epoch/hlc would actually hit, plus the occasional huge
/// value to exercise the 10-byte uvarint tail.
pub fn small_or_boundary_u64() -> impl Strategy<Value = u64> {
    prop_oneof![
        3 => 0u64..1_000,
        2 => Just(127u64),
        2 => Just(128u64),
        2 => Just(16_383u64),
        2 => Just(16_384u64),
        1 => any::<u64>(),
    ]
}

pub fn timestamp() -> impl Strategy<Value = Timestamp> {
    (small_or_boundary_u64(), small_or_boundary_u64(), any::<u32>())
        .prop_map(|(epoch, hlc, node)| Timestamp { epoch, hlc, node })
}

pub fn txn_id() -> impl Strategy<Value = TxnId> {
    timestamp().prop_map(TxnId)
}

pub fn ballot() -> impl Strategy<Value = Ballot> {
    timestamp().prop_map(Ballot)
}

/// A single table id, either variable-length or declaring a fixed body
/// length, mirroring the two shapes [`TableId`] actually supports.
pub fn table_id(fixed_len: Option<u16>) -> impl Strategy<Value = TableId> {
    any::<u32>().prop_map(move |id| match fixed_len {
        Some(len) => TableId::fixed(id, len),
        None => TableId::variable(id),
    })
}

/// A variable-length `SimpleKey` under table `table`, with a body of
/// `len_range` bytes.
pub fn simple_key(table: TableId, len_range: std::ops::Range<usize>) -> impl Strategy<Value = SimpleKey> {
    vec(any::<u8>(), len_range).prop_map(move |body| SimpleKey::new(table.clone(), Bytes::from(body)))
}

/// A non-empty run of `SimpleKey`s all sharing one randomly-chosen
/// variable-length table id, useful for exercising the single-group path
/// of the prefix-grouped collection codec.
pub fn simple_key_run(count: std::ops::Range<usize>) -> impl Strategy<Value = Vec<SimpleKey>> {
    any::<u32>().prop_flat_map(move |table_id| {
        let table = TableId::variable(table_id);
        vec(simple_key(table, 0..32), count.clone())
    })
}

pub fn range_of(table: TableId) -> impl Strategy<Value = Range<SimpleKey>> {
    (simple_key(table.clone(), 0..32), simple_key(table, 0..32)).prop_map(|(start, end)| Range::new(start, end))
}

pub fn flag_word() -> impl Strategy<Value = FlagWord> {
    any::<u64>().prop_map(FlagWord)
}
