//! Accept request/reply bodies (spec.md §4.8).
//!
//! Grounded on `crates/protocol/src/message/connect.rs`'s `Connect`
//! (flags byte gating conditional sub-fields) for the reply's flag-word
//! shape, and on `crates/protocol/src/message/publish.rs` for the
//! inline-no-flags `NotAccept` payload.

use bytes::{Bytes, BytesMut};

use routable::{
    AcceptOutcome, Ballot, Deps, PartialDeps, Route, RouteTag, SimpleKey, Status, Timestamp, TxnId,
    decode_execute_at_delta, encode_execute_at_delta, execute_at_delta_encoded_len,
};
use wire_core::{CodecError, FlagWord, WireDecode, WireEncode};

/// Participants/successful-replica routes are always key-shaped, never
/// range-shaped (spec.md glossary: "Participants" is a Route restricted to
/// the key-route variants).
const PARTICIPANTS_VARIANTS: &[RouteTag] = &[RouteTag::RoutingKeys, RouteTag::PartialKeyRoute, RouteTag::FullKeyRoute];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptKind {
    Accept,
    AcceptInvalidate,
}

impl AcceptKind {
    fn ordinal(self) -> u8 {
        match self {
            AcceptKind::Accept => 0,
            AcceptKind::AcceptInvalidate => 1,
        }
    }

    fn from_ordinal(ordinal: u8) -> Result<Self, CodecError> {
        match ordinal {
            0 => Ok(AcceptKind::Accept),
            1 => Ok(AcceptKind::AcceptInvalidate),
            other => Err(CodecError::EnumOutOfRange { ordinal: other as u64, count: 2 }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptRequest {
    pub kind: AcceptKind,
    pub is_partial_accept: bool,
    pub ballot: Ballot,
    pub execute_at: Timestamp,
    pub partial_deps: PartialDeps,
}

impl AcceptRequest {
    #[tracing::instrument(skip_all)]
    pub fn encode(&self, txn_id: &TxnId, dst: &mut BytesMut) {
        let flags = (self.kind.ordinal() << 1) | (self.is_partial_accept as u8);
        dst.put_u8(flags);
        self.ballot.encode(dst);
        encode_execute_at_delta(txn_id, &self.execute_at, dst);
        self.partial_deps.encode(dst);
    }

    #[tracing::instrument(skip_all)]
    pub fn decode(txn_id: &TxnId, src: &mut Bytes) -> Result<Self, CodecError> {
        let flags = src.read_u8()?;
        let kind = AcceptKind::from_ordinal((flags >> 1) & 0x01)?;
        let is_partial_accept = flags & 0x01 != 0;
        let ballot = Ballot::decode(src)?;
        let execute_at = decode_execute_at_delta(txn_id, src)?;
        let partial_deps = PartialDeps::decode(src)?;
        Ok(AcceptRequest { kind, is_partial_accept, ballot, execute_at, partial_deps })
    }

    pub fn encoded_len(&self, txn_id: &TxnId) -> usize {
        1 + self.ballot.encoded_len()
            + execute_at_delta_encoded_len(txn_id, &self.execute_at)
            + self.partial_deps.encoded_len()
    }
}

const SUPERSEDED_BY_BIT: u8 = 0x08;
const COMMITTED_EXECUTE_AT_BIT: u8 = 0x10;
const SUCCESSFUL_BIT: u8 = 0x20;
const DEPS_BIT: u8 = 0x40;
const EXECUTE_FLAGS_BIT: u8 = 0x80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptReply {
    pub outcome: AcceptOutcome,
    pub superseded_by: Option<Ballot>,
    pub committed_execute_at: Option<Timestamp>,
    pub successful: Option<Route<SimpleKey>>,
    pub deps: Option<Deps>,
    pub execute_flags: Option<FlagWord>,
}

impl AcceptReply {
    #[tracing::instrument(skip_all)]
    pub fn encode(&self, txn_id: &TxnId, dst: &mut BytesMut) {
        let mut flags = self.outcome.ordinal();
        flags |= (self.superseded_by.is_some() as u8) << 3;
        flags |= (self.committed_execute_at.is_some() as u8) << 4;
        flags |= (self.successful.is_some() as u8) << 5;
        flags |= (self.deps.is_some() as u8) << 6;
        flags |= (self.execute_flags.is_some() as u8) << 7;
        dst.put_u8(flags);

        if let Some(ballot) = &self.superseded_by {
            ballot.encode(dst);
        }
        if let Some(execute_at) = &self.committed_execute_at {
            encode_execute_at_delta(txn_id, execute_at, dst);
        }
        if let Some(route) = &self.successful {
            route.encode(dst);
        }
        if let Some(deps) = &self.deps {
            deps.encode(dst);
        }
        if let Some(execute_flags) = &self.execute_flags {
            execute_flags.encode(dst);
        }
    }

    #[tracing::instrument(skip_all)]
    pub fn decode(txn_id: &TxnId, src: &mut Bytes) -> Result<Self, CodecError> {
        let flags = src.read_u8()?;
        let outcome = AcceptOutcome::from_ordinal(flags & 0x03)?;

        let superseded_by = if flags & SUPERSEDED_BY_BIT != 0 { Some(Ballot::decode(src)?) } else { None };
        let committed_execute_at =
            if flags & COMMITTED_EXECUTE_AT_BIT != 0 { Some(decode_execute_at_delta(txn_id, src)?) } else { None };
        let successful =
            if flags & SUCCESSFUL_BIT != 0 { Some(Route::decode(src, PARTICIPANTS_VARIANTS)?) } else { None };
        let deps = if flags & DEPS_BIT != 0 { Some(Deps::decode(src)?) } else { None };
        let execute_flags = if flags & EXECUTE_FLAGS_BIT != 0 { Some(FlagWord::decode(src)?) } else { None };

        Ok(AcceptReply { outcome, superseded_by, committed_execute_at, successful, deps, execute_flags })
    }

    /// One shared flags byte gates every optional sub-field here, unlike
    /// `encode_optional`'s own per-value presence byte — so each `Some`
    /// contributes only its payload size, not an extra marker byte.
    pub fn encoded_len(&self, txn_id: &TxnId) -> usize {
        let mut len = 1;
        if let Some(ballot) = &self.superseded_by {
            len += ballot.encoded_len();
        }
        if let Some(execute_at) = &self.committed_execute_at {
            len += execute_at_delta_encoded_len(txn_id, execute_at);
        }
        if let Some(route) = &self.successful {
            len += route.encoded_len();
        }
        if let Some(deps) = &self.deps {
            len += deps.encoded_len();
        }
        if let Some(execute_flags) = &self.execute_flags {
            len += execute_flags.encoded_len();
        }
        len
    }
}

/// Inline, no-flag-word payload for a rejected Accept (spec.md §4.8).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotAccept {
    pub status: Status,
    pub ballot: Ballot,
    pub txn_id: TxnId,
    pub participants: Route<SimpleKey>,
}

impl NotAccept {
    #[tracing::instrument(skip_all)]
    pub fn encode(&self, dst: &mut BytesMut) {
        self.status.encode(dst);
        self.ballot.encode(dst);
        self.txn_id.encode(dst);
        self.participants.encode(dst);
    }

    #[tracing::instrument(skip_all)]
    pub fn decode(src: &mut Bytes) -> Result<Self, CodecError> {
        let status = Status::decode(src)?;
        let ballot = Ballot::decode(src)?;
        let txn_id = TxnId::decode(src)?;
        let participants = Route::decode(src, PARTICIPANTS_VARIANTS)?;
        Ok(NotAccept { status, ballot, txn_id, participants })
    }

    pub fn encoded_len(&self) -> usize {
        self.status.encoded_len() + self.ballot.encoded_len() + self.txn_id.encoded_len() + self.participants.encoded_len()
    }
}
