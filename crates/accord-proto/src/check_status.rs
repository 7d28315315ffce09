//! CheckStatus reply (spec.md §4.8): a first-byte kind discriminator with
//! no teacher precedent for the three-way OK/FULL/NACK split, modeled as a
//! sum type per spec.md §9 ("tagged unions over inheritance").
//!
//! Grounded on `crates/protocol/src/message/info.rs`'s plain
//! capability-flags-byte style for the shared OK/FULL prefix fields.

use bytes::{BufMut, Bytes, BytesMut};

use routable::{Ballot, Deps, Durability, PartialTxn, SaveStatus, Writes};
use wire_core::{CodecError, WireDecode, WireEncode, decode_optional, encode_optional, optional_encoded_len};

const KIND_OK: u8 = 0x00;
const KIND_FULL: u8 = 0x01;
const KIND_NACK: u8 = 0x02;

/// Fields shared by the `Ok` and `Full` reply kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckStatusCommon {
    pub save_status: SaveStatus,
    pub durability: Durability,
    pub promised: Ballot,
}

impl CheckStatusCommon {
    fn encode(&self, dst: &mut BytesMut) {
        self.save_status.encode(dst);
        self.durability.encode(dst);
        self.promised.encode(dst);
    }

    fn decode(src: &mut Bytes) -> Result<Self, CodecError> {
        Ok(CheckStatusCommon {
            save_status: SaveStatus::decode(src)?,
            durability: Durability::decode(src)?,
            promised: Ballot::decode(src)?,
        })
    }

    fn encoded_len(&self) -> usize {
        self.save_status.encoded_len() + self.durability.encoded_len() + self.promised.encoded_len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckStatusFull {
    pub common: CheckStatusCommon,
    pub partial_txn: Option<PartialTxn>,
    pub deps: Option<Deps>,
    pub writes: Option<Writes>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatusReply {
    Ok(CheckStatusCommon),
    Full(CheckStatusFull),
    Nack,
}

impl CheckStatusReply {
    #[tracing::instrument(skip_all)]
    pub fn encode(&self, dst: &mut BytesMut) {
        match self {
            CheckStatusReply::Ok(common) => {
                dst.put_u8(KIND_OK);
                common.encode(dst);
            }
            CheckStatusReply::Full(full) => {
                dst.put_u8(KIND_FULL);
                full.common.encode(dst);
                encode_optional(dst, &full.partial_txn, |v, d| v.encode(d));
                encode_optional(dst, &full.deps, |v, d| v.encode(d));
                encode_optional(dst, &full.writes, |v, d| v.encode(d));
            }
            CheckStatusReply::Nack => dst.put_u8(KIND_NACK),
        }
    }

    #[tracing::instrument(skip_all)]
    pub fn decode(src: &mut Bytes) -> Result<Self, CodecError> {
        match src.read_u8()? {
            KIND_OK => Ok(CheckStatusReply::Ok(CheckStatusCommon::decode(src)?)),
            KIND_FULL => {
                let common = CheckStatusCommon::decode(src)?;
                let partial_txn = decode_optional(src, |s| PartialTxn::decode(s))?;
                let deps = decode_optional(src, |s| Deps::decode(s))?;
                let writes = decode_optional(src, |s| Writes::decode(s))?;
                Ok(CheckStatusReply::Full(CheckStatusFull { common, partial_txn, deps, writes }))
            }
            KIND_NACK => Ok(CheckStatusReply::Nack),
            _ => Err(CodecError::CorruptInput { reason: "unknown CheckStatus reply kind" }),
        }
    }

    pub fn encoded_len(&self) -> usize {
        1 + match self {
            CheckStatusReply::Ok(common) => common.encoded_len(),
            CheckStatusReply::Full(full) => {
                full.common.encoded_len()
                    + optional_encoded_len(&full.partial_txn, |v| v.encoded_len())
                    + optional_encoded_len(&full.deps, |v| v.encoded_len())
                    + optional_encoded_len(&full.writes, |v| v.encoded_len())
            }
            CheckStatusReply::Nack => 0,
        }
    }
}
