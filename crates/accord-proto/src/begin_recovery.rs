//! BeginRecovery request/reply bodies (spec.md §4.8).
//!
//! Grounded on `crates/protocol/src/message/connect.rs`'s uvarint flag word
//! gating conditional sub-fields, reused here for BeginRecoveryRequest's
//! route/executeAt-epoch fields.

use bytes::{Bytes, BytesMut};

use routable::{
    Ballot, Deps, LatestDeps, PartialTxn, Route, RouteTag, SimpleKey, Status, Timestamp, TxnId, Writes,
    decode_execute_at_delta, encode_execute_at_delta,
};
use wire_core::varint::size_of_uvarint;
use wire_core::{CodecError, WireDecode, WireEncode, decode_optional, encode_optional, optional_encoded_len};

/// BeginRecovery's route field is always one of the two "full" route
/// variants (spec.md §4.8: "route : FullRoute").
const FULL_ROUTE_VARIANTS: &[RouteTag] = &[RouteTag::FullKeyRoute, RouteTag::FullRangeRoute];

const HAS_ROUTE: u64 = 0x1;
const HAS_EXECUTE_AT_EPOCH: u64 = 0x2;
const IS_FAST_PATH_DECIDED: u64 = 0x4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeginRecoveryRequest {
    pub partial_txn: PartialTxn,
    pub ballot: Ballot,
    pub route: Option<Route<SimpleKey>>,
    pub execute_at_or_txn_id_epoch: Option<u64>,
    pub is_fast_path_decided: bool,
}

impl BeginRecoveryRequest {
    #[tracing::instrument(skip_all)]
    pub fn encode(&self, txn_id: &TxnId, dst: &mut BytesMut) {
        self.partial_txn.encode(dst);
        self.ballot.encode(dst);

        let mut flags = 0u64;
        if self.route.is_some() {
            flags |= HAS_ROUTE;
        }
        if self.execute_at_or_txn_id_epoch.is_some() {
            flags |= HAS_EXECUTE_AT_EPOCH;
        }
        if self.is_fast_path_decided {
            flags |= IS_FAST_PATH_DECIDED;
        }
        dst.put_uvarint(flags);

        if let Some(route) = &self.route {
            route.encode(dst);
        }
        if let Some(epoch) = self.execute_at_or_txn_id_epoch {
            dst.put_uvarint(epoch - txn_id.0.epoch);
        }
    }

    #[tracing::instrument(skip_all)]
    pub fn decode(txn_id: &TxnId, src: &mut Bytes) -> Result<Self, CodecError> {
        let partial_txn = PartialTxn::decode(src)?;
        let ballot = Ballot::decode(src)?;
        let flags = src.read_uvarint()?;

        let route = if flags & HAS_ROUTE != 0 { Some(Route::decode(src, FULL_ROUTE_VARIANTS)?) } else { None };
        let execute_at_or_txn_id_epoch = if flags & HAS_EXECUTE_AT_EPOCH != 0 {
            Some(txn_id.0.epoch + src.read_uvarint()?)
        } else {
            None
        };
        let is_fast_path_decided = flags & IS_FAST_PATH_DECIDED != 0;

        Ok(BeginRecoveryRequest { partial_txn, ballot, route, execute_at_or_txn_id_epoch, is_fast_path_decided })
    }

    pub fn encoded_len(&self, txn_id: &TxnId) -> usize {
        let mut flags = 0u64;
        if self.route.is_some() {
            flags |= HAS_ROUTE;
        }
        if self.execute_at_or_txn_id_epoch.is_some() {
            flags |= HAS_EXECUTE_AT_EPOCH;
        }
        if self.is_fast_path_decided {
            flags |= IS_FAST_PATH_DECIDED;
        }
        let mut len =
            self.partial_txn.encoded_len() + self.ballot.encoded_len() + size_of_uvarint(flags);
        if let Some(route) = &self.route {
            len += route.encoded_len();
        }
        if let Some(epoch) = self.execute_at_or_txn_id_epoch {
            len += size_of_uvarint(epoch - txn_id.0.epoch);
        }
        len
    }
}

const KIND_OK: u64 = 0;
const KIND_REJECT: u64 = 1;

/// The dense `Ok` payload (spec.md §4.8). `status` ∈ {PreApplied, Applied,
/// Truncated} synthesizes an implicit "applied" marker on decode with no
/// corresponding wire bytes; [`BeginRecoveryOk::is_applied`] derives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeginRecoveryOk {
    pub txn_id: TxnId,
    pub status: Status,
    pub ballot: Ballot,
    pub execute_at: Option<Timestamp>,
    pub latest_deps: LatestDeps<SimpleKey>,
    pub deps: Deps,
    pub earlier_committed_deps: Deps,
    pub earlier_accepted_deps: Deps,
    pub fast_path_rejected: bool,
    pub fast_path_permitted: bool,
    pub participants: Option<Route<SimpleKey>>,
    pub writes: Option<Writes>,
}

impl BeginRecoveryOk {
    /// Whether this status implies the transaction has already applied,
    /// a fact the wire form never spells out directly (spec.md §4.8).
    pub fn is_applied(&self) -> bool {
        matches!(self.status, Status::PreApplied | Status::Applied | Status::Truncated)
    }

    fn encode(&self, dst: &mut BytesMut) {
        self.txn_id.encode(dst);
        self.status.encode(dst);
        self.ballot.encode(dst);
        encode_optional(dst, &self.execute_at, |v, d| v.encode(d));
        self.latest_deps.encode(dst);
        self.deps.encode(dst);
        self.earlier_committed_deps.encode(dst);
        self.earlier_accepted_deps.encode(dst);
        dst.put_u8(self.fast_path_rejected as u8);
        dst.put_u8(self.fast_path_permitted as u8);
        encode_optional(dst, &self.participants, |v, d| v.encode(d));
        encode_optional(dst, &self.writes, |v, d| v.encode(d));
    }

    fn decode(src: &mut Bytes) -> Result<Self, CodecError> {
        let txn_id = TxnId::decode(src)?;
        let status = Status::decode(src)?;
        let ballot = Ballot::decode(src)?;
        let execute_at = decode_optional(src, |s| Timestamp::decode(s))?;
        let latest_deps = LatestDeps::decode(src)?;
        let deps = Deps::decode(src)?;
        let earlier_committed_deps = Deps::decode(src)?;
        let earlier_accepted_deps = Deps::decode(src)?;
        let fast_path_rejected = src.read_u8()? != 0;
        let fast_path_permitted = src.read_u8()? != 0;
        let participants = decode_optional(src, |s| Route::decode(s, PARTICIPANTS_VARIANTS))?;
        let writes = decode_optional(src, |s| Writes::decode(s))?;
        Ok(BeginRecoveryOk {
            txn_id,
            status,
            ballot,
            execute_at,
            latest_deps,
            deps,
            earlier_committed_deps,
            earlier_accepted_deps,
            fast_path_rejected,
            fast_path_permitted,
            participants,
            writes,
        })
    }

    fn encoded_len(&self) -> usize {
        self.txn_id.encoded_len()
            + self.status.encoded_len()
            + self.ballot.encoded_len()
            + optional_encoded_len(&self.execute_at, |v| v.encoded_len())
            + self.latest_deps.encoded_len()
            + self.deps.encoded_len()
            + self.earlier_committed_deps.encoded_len()
            + self.earlier_accepted_deps.encoded_len()
            + 1
            + 1
            + optional_encoded_len(&self.participants, |v| v.encoded_len())
            + optional_encoded_len(&self.writes, |v| v.encoded_len())
    }
}

const PARTICIPANTS_VARIANTS: &[RouteTag] = &[RouteTag::RoutingKeys, RouteTag::PartialKeyRoute, RouteTag::FullKeyRoute];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeginRecoveryReply {
    Ok(BeginRecoveryOk),
    Reject,
}

impl BeginRecoveryReply {
    #[tracing::instrument(skip_all)]
    pub fn encode(&self, dst: &mut BytesMut) {
        match self {
            BeginRecoveryReply::Ok(ok) => {
                dst.put_uvarint(KIND_OK);
                ok.encode(dst);
            }
            BeginRecoveryReply::Reject => dst.put_uvarint(KIND_REJECT),
        }
    }

    #[tracing::instrument(skip_all)]
    pub fn decode(src: &mut Bytes) -> Result<Self, CodecError> {
        match src.read_uvarint()? {
            KIND_OK => Ok(BeginRecoveryReply::Ok(BeginRecoveryOk::decode(src)?)),
            KIND_REJECT => Ok(BeginRecoveryReply::Reject),
            other => Err(CodecError::EnumOutOfRange { ordinal: other, count: 2 }),
        }
    }

    pub fn encoded_len(&self) -> usize {
        match self {
            BeginRecoveryReply::Ok(ok) => size_of_uvarint(KIND_OK) + ok.encoded_len(),
            BeginRecoveryReply::Reject => size_of_uvarint(KIND_REJECT),
        }
    }
}
