//! Request envelope shared by every txn-scoped request, and the `Version`
//! tag threaded through message-level encode/decode calls.
//!
//! Grounded on `crates/protocol/src/header.rs::FixedHeader`: a shared fixed
//! prefix decoded once, then dispatch continues into the body. The
//! `waitForEpoch`/`minEpoch` delta has no teacher precedent; it follows
//! spec.md §4.8 directly.

use bytes::{Bytes, BytesMut};

use routable::{Route, RouteTag, SimpleKey, TxnId};
use wire_core::varint::size_of_uvarint;
use wire_core::{CodecError, WireDecode, WireEncode};

/// Schema-evolution tag threaded through message codecs (spec.md §6).
/// Currently influences only the collaborator-owned encodings of
/// `PartialTxn`/`Writes`; structural layouts are version-independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    V1,
}

impl Version {
    pub fn encode(self, dst: &mut BytesMut) {
        dst.put_u8(match self {
            Version::V1 => 1,
        });
    }

    pub fn decode(src: &mut Bytes) -> Result<Self, CodecError> {
        match src.read_u8()? {
            1 => Ok(Version::V1),
            other => Err(CodecError::EnumOutOfRange { ordinal: other as u64, count: 1 }),
        }
    }

    pub fn encoded_len(self) -> usize {
        1
    }
}

/// Shared prefix of every txn-scoped request (spec.md §4.8).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub txn_id: TxnId,
    pub scope: Route<SimpleKey>,
    pub wait_for_epoch: u64,
    pub min_epoch: u64,
}

impl Envelope {
    pub fn encode(&self, dst: &mut BytesMut) {
        self.txn_id.encode(dst);
        self.scope.encode(dst);
        dst.put_uvarint(self.wait_for_epoch);
        dst.put_uvarint(self.min_epoch - self.wait_for_epoch);
    }

    pub fn decode(src: &mut Bytes, permitted_scope: &[RouteTag]) -> Result<Self, CodecError> {
        let txn_id = TxnId::decode(src)?;
        let scope = Route::decode(src, permitted_scope)?;
        let wait_for_epoch = src.read_uvarint()?;
        let delta = src.read_uvarint()?;
        Ok(Envelope { txn_id, scope, wait_for_epoch, min_epoch: wait_for_epoch + delta })
    }

    pub fn encoded_len(&self) -> usize {
        self.txn_id.encoded_len()
            + self.scope.encoded_len()
            + size_of_uvarint(self.wait_for_epoch)
            + size_of_uvarint(self.min_epoch - self.wait_for_epoch)
    }
}
