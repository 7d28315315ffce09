//! InformDurable request body (spec.md §4.8): a node telling a peer its
//! view of a transaction's durability, with both epoch bounds delta-encoded
//! against the shared envelope's `waitForEpoch`.
//!
//! Grounded on `crates/protocol/src/message/publish.rs`'s delta-against-a-
//! known-quantity framing, generalized here to two independent signed
//! deltas since `minEpoch` may precede `waitForEpoch`.

use bytes::{Bytes, BytesMut};

use routable::{Durability, SimpleReply, Timestamp};
use wire_core::varint::size_of_svarint;
use wire_core::{CodecError, WireDecode, WireEncode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InformDurableRequest {
    pub min_epoch: i64,
    pub max_epoch: i64,
    pub execute_at: Timestamp,
    pub durability: Durability,
}

impl InformDurableRequest {
    #[tracing::instrument(skip_all)]
    pub fn encode(&self, wait_for_epoch: u64, dst: &mut BytesMut) {
        dst.put_svarint(self.min_epoch - wait_for_epoch as i64);
        dst.put_svarint(self.max_epoch - wait_for_epoch as i64);
        self.execute_at.encode(dst);
        self.durability.encode(dst);
    }

    #[tracing::instrument(skip_all)]
    pub fn decode(wait_for_epoch: u64, src: &mut Bytes) -> Result<Self, CodecError> {
        let min_epoch = wait_for_epoch as i64 + src.read_svarint()?;
        let max_epoch = wait_for_epoch as i64 + src.read_svarint()?;
        let execute_at = Timestamp::decode(src)?;
        let durability = Durability::decode(src)?;
        Ok(InformDurableRequest { min_epoch, max_epoch, execute_at, durability })
    }

    pub fn encoded_len(&self, wait_for_epoch: u64) -> usize {
        size_of_svarint(self.min_epoch - wait_for_epoch as i64)
            + size_of_svarint(self.max_epoch - wait_for_epoch as i64)
            + self.execute_at.encoded_len()
            + self.durability.encoded_len()
    }
}

/// InformDurable's reply carries no payload of its own beyond acknowledging
/// whether the coordinator still considers the transaction committed.
pub type InformDurableReply = SimpleReply;
