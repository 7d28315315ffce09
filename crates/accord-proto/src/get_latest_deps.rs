//! GetLatestDeps request/reply bodies (spec.md §4.8 lists this as following
//! the same envelope + segmented-map pattern as the other messages). The
//! request carries no body beyond the shared envelope; the reply is a
//! single `LatestDeps`.

use bytes::{Bytes, BytesMut};

use routable::{LatestDeps, SimpleKey};
use wire_core::CodecError;

/// No payload of its own; the request envelope (TxnId, scope, epoch bounds)
/// is everything GetLatestDeps needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetLatestDepsRequest;

impl GetLatestDepsRequest {
    pub fn encode(&self, _dst: &mut BytesMut) {}

    pub fn decode(_src: &mut Bytes) -> Result<Self, CodecError> {
        Ok(GetLatestDepsRequest)
    }

    pub fn encoded_len(&self) -> usize {
        0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetLatestDepsReply {
    pub latest_deps: LatestDeps<SimpleKey>,
}

impl GetLatestDepsReply {
    #[tracing::instrument(skip_all)]
    pub fn encode(&self, dst: &mut BytesMut) {
        self.latest_deps.encode(dst);
    }

    #[tracing::instrument(skip_all)]
    pub fn decode(src: &mut Bytes) -> Result<Self, CodecError> {
        Ok(GetLatestDepsReply { latest_deps: LatestDeps::decode(src)? })
    }

    pub fn encoded_len(&self) -> usize {
        self.latest_deps.encoded_len()
    }
}
