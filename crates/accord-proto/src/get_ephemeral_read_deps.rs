//! GetEphemeralReadDeps reply body (spec.md §4.8): `latestEpoch` plus an
//! optional `(deps, flags)` pair, gated by a single presence byte rather
//! than a multi-bit flag word since there is only one optional group here.

use bytes::{Bytes, BytesMut};

use routable::Deps;
use wire_core::varint::size_of_uvarint;
use wire_core::{CodecError, FlagWord, WireDecode, WireEncode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetEphemeralReadDepsReply {
    pub latest_epoch: u64,
    pub deps: Option<(Deps, FlagWord)>,
}

impl GetEphemeralReadDepsReply {
    #[tracing::instrument(skip_all)]
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.put_uvarint(self.latest_epoch);
        dst.put_bool(self.deps.is_some());
        if let Some((deps, flags)) = &self.deps {
            deps.encode(dst);
            flags.encode(dst);
        }
    }

    #[tracing::instrument(skip_all)]
    pub fn decode(src: &mut Bytes) -> Result<Self, CodecError> {
        let latest_epoch = src.read_uvarint()?;
        let present = src.read_bool()?;
        let deps = if present { Some((Deps::decode(src)?, FlagWord::decode(src)?)) } else { None };
        Ok(GetEphemeralReadDepsReply { latest_epoch, deps })
    }

    pub fn encoded_len(&self) -> usize {
        let mut len = size_of_uvarint(self.latest_epoch) + 1;
        if let Some((deps, flags)) = &self.deps {
            len += deps.encoded_len() + flags.encoded_len();
        }
        len
    }
}
