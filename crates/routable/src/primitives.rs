//! Concrete stand-ins for the domain collaborators spec.md treats as opaque
//! (TxnId, Ballot, executeAt, Deps/PartialDeps/PartialTxn/Writes, and the
//! small closed enums carried in replies).
//!
//! The teacher never owns types like these directly; `crates/topic` is the
//! closest precedent (a small, strongly-typed, wire-aware domain value
//! owned by its own crate and imported everywhere else), so these follow
//! its shape: a plain struct plus inherent `encode`/`decode`/`encoded_len`
//! methods instead of a shared trait, since each has a slightly different
//! wire shape.

use bytes::{Bytes, BytesMut};

use wire_core::varint::{size_of_svarint, size_of_uvarint, size_of_uvarint32};
use wire_core::{CodecError, WireDecode, WireEncode, decode_ordinal, encode_ordinal, ordinal_encoded_len};

/// A Lamport-style hybrid timestamp: `(epoch, hlc, node)`, each independently
/// varint-encoded. TxnId and Ballot are both timestamps in Accord; kept as
/// distinct newtypes below so the message bodies can't accidentally swap one
/// for the other at a call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    pub epoch: u64,
    pub hlc: u64,
    pub node: u32,
}

impl Timestamp {
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.put_uvarint(self.epoch);
        dst.put_uvarint(self.hlc);
        dst.put_uvarint(self.node as u64);
    }

    pub fn decode(src: &mut Bytes) -> Result<Self, CodecError> {
        Ok(Timestamp { epoch: src.read_uvarint()?, hlc: src.read_uvarint()?, node: src.read_uvarint32()? })
    }

    pub fn encoded_len(&self) -> usize {
        size_of_uvarint(self.epoch) + size_of_uvarint(self.hlc) + size_of_uvarint32(self.node)
    }
}

macro_rules! timestamp_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub Timestamp);

        impl $name {
            pub fn encode(&self, dst: &mut BytesMut) {
                self.0.encode(dst);
            }

            pub fn decode(src: &mut Bytes) -> Result<Self, CodecError> {
                Ok($name(Timestamp::decode(src)?))
            }

            pub fn encoded_len(&self) -> usize {
                self.0.encoded_len()
            }
        }
    };
}

timestamp_newtype!(TxnId);
timestamp_newtype!(Ballot);

/// `executeAt`, delta-encoded against the `txnId` it was proposed with
/// (spec.md §4.8's Accept request body). Most transactions execute at or
/// near their proposal timestamp, so the epoch/hlc deltas are almost always
/// small and the zigzag svarint keeps them a single byte.
pub fn encode_execute_at_delta(txn_id: &TxnId, execute_at: &Timestamp, dst: &mut BytesMut) {
    dst.put_svarint(execute_at.epoch as i64 - txn_id.0.epoch as i64);
    dst.put_svarint(execute_at.hlc as i64 - txn_id.0.hlc as i64);
    dst.put_uvarint(execute_at.node as u64);
}

pub fn decode_execute_at_delta(txn_id: &TxnId, src: &mut Bytes) -> Result<Timestamp, CodecError> {
    let epoch_delta = src.read_svarint()?;
    let hlc_delta = src.read_svarint()?;
    let node = src.read_uvarint32()?;
    Ok(Timestamp {
        epoch: (txn_id.0.epoch as i64 + epoch_delta) as u64,
        hlc: (txn_id.0.hlc as i64 + hlc_delta) as u64,
        node,
    })
}

pub fn execute_at_delta_encoded_len(txn_id: &TxnId, execute_at: &Timestamp) -> usize {
    size_of_svarint(execute_at.epoch as i64 - txn_id.0.epoch as i64)
        + size_of_svarint(execute_at.hlc as i64 - txn_id.0.hlc as i64)
        + size_of_uvarint(execute_at.node as u64)
}

/// A length-prefixed byte blob, used for every collaborator payload this
/// codec treats as an opaque, already-serialized black box (Deps,
/// PartialDeps, PartialTxn, Writes — spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaquePayload(pub Bytes);

impl OpaquePayload {
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.put_uvarint(self.0.len() as u64);
        dst.extend_from_slice(&self.0);
    }

    pub fn decode(src: &mut Bytes) -> Result<Self, CodecError> {
        let len = src.read_uvarint()? as usize;
        Ok(OpaquePayload(src.read_exact_bytes(len)?))
    }

    pub fn encoded_len(&self) -> usize {
        size_of_uvarint(self.0.len() as u64) + self.0.len()
    }
}

pub type Deps = OpaquePayload;
pub type PartialDeps = OpaquePayload;
pub type PartialTxn = OpaquePayload;
pub type Writes = OpaquePayload;
pub type Participants = OpaquePayload;

/// Helper for declaring a small closed enum whose wire form is its
/// declaration-order ordinal (component C3), without repeating the
/// `encode`/`decode` boilerplate for each one.
macro_rules! ordinal_enum {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        $vis enum $name { $($variant),+ }

        impl $name {
            const VARIANTS: &'static [$name] = &[$($name::$variant),+];

            pub fn encode(&self, dst: &mut BytesMut) {
                let ordinal = Self::VARIANTS.iter().position(|v| v == self).expect("exhaustive");
                encode_ordinal(dst, ordinal);
            }

            pub fn decode(src: &mut Bytes) -> Result<Self, CodecError> {
                let ordinal = decode_ordinal(src, Self::VARIANTS.len())?;
                Ok(Self::VARIANTS[ordinal])
            }

            pub fn encoded_len(&self) -> usize {
                let ordinal = Self::VARIANTS.iter().position(|v| v == self).expect("exhaustive");
                ordinal_encoded_len(ordinal)
            }
        }
    };
}

ordinal_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Known {
        Nothing,
        Definition,
        ExecuteAt,
        Deps,
        Outcome,
        Apply,
    }
}

ordinal_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum KnownDeps {
        DepsUnknown,
        DepsFromCoordinator,
        DepsCommitted,
        DepsErased,
    }
}

ordinal_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Durability {
        NotDurable,
        Local,
        Majority,
        UniversalOrInvalidated,
    }
}

ordinal_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum SaveStatus {
        NotDefined,
        PreAccepted,
        AcceptedInvalidate,
        Accepted,
        PreCommitted,
        Committed,
        ReadyToExecute,
        PreApplied,
        Applied,
        Invalidated,
    }
}

ordinal_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum InvalidIf {
        NotKnownToBeInvalid,
        NotKnownToBeInvalidThenTruncatedToInvalid,
        NotKnownToBeInvalidThenErased,
    }
}

ordinal_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Status {
        NotWitnessed,
        PreAccepted,
        Accepted,
        Committed,
        PreApplied,
        Applied,
        Truncated,
        Invalidated,
    }
}

ordinal_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum SimpleReply {
        Ok,
        NotCommitted,
    }
}

/// The Accept reply's outcome, packed into two bits of the reply's flag
/// byte rather than its own varint (spec.md §4.8), so it gets hand-written
/// ordinal accessors instead of the [`ordinal_enum`] macro's varint codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptOutcome {
    Accepted,
    Rejected,
    AlreadyCommitted,
    Invalidated,
}

impl AcceptOutcome {
    pub fn ordinal(self) -> u8 {
        match self {
            AcceptOutcome::Accepted => 0,
            AcceptOutcome::Rejected => 1,
            AcceptOutcome::AlreadyCommitted => 2,
            AcceptOutcome::Invalidated => 3,
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Result<Self, CodecError> {
        Ok(match ordinal {
            0 => AcceptOutcome::Accepted,
            1 => AcceptOutcome::Rejected,
            2 => AcceptOutcome::AlreadyCommitted,
            3 => AcceptOutcome::Invalidated,
            other => return Err(CodecError::EnumOutOfRange { ordinal: other as u64, count: 4 }),
        })
    }
}
