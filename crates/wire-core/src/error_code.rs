//! Forgiving error-code registry (aux component in spec.md S2/S4.3).
//!
//! Unlike the teacher's `DecodeError::UnknownCommand`/`UnsupportedCommand`
//! (which reject any command byte the protocol crate doesn't recognize),
//! this registry is explicitly forward-compatible: an unrecognized
//! non-negative code decodes as [`ErrorCode::Unknown`] so a rolling
//! upgrade can introduce new failure kinds without breaking older peers
//! mid-decode. A negative code is still rejected, since it can never be a
//! legitimate forward-compatible extension.

use bytes::{Bytes, BytesMut};

use crate::error::CodecError;
use crate::varint::{WireDecode, WireEncode};

/// Stable integer identifier for a request-failure kind.
///
/// Each variant carries an explicit numeric code (not its declaration
/// ordinal), so reordering variants in source never changes the wire
/// encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Retryable,
    Invalidated,
    Truncated,
    NotCommitted,
    Bootstrap,
    Unavailable,
    /// Any non-negative code this implementation does not recognize.
    /// Carries the original code so it can still be logged/relayed.
    Unknown(u64),
}

impl ErrorCode {
    fn code(self) -> u64 {
        match self {
            ErrorCode::Retryable => 0,
            ErrorCode::Invalidated => 1,
            ErrorCode::Truncated => 2,
            ErrorCode::NotCommitted => 3,
            ErrorCode::Bootstrap => 4,
            ErrorCode::Unavailable => 5,
            ErrorCode::Unknown(code) => code,
        }
    }

    fn from_code(code: u64) -> Self {
        match code {
            0 => ErrorCode::Retryable,
            1 => ErrorCode::Invalidated,
            2 => ErrorCode::Truncated,
            3 => ErrorCode::NotCommitted,
            4 => ErrorCode::Bootstrap,
            5 => ErrorCode::Unavailable,
            other => ErrorCode::Unknown(other),
        }
    }

    pub fn encode(self, dst: &mut BytesMut) {
        dst.put_svarint(self.code() as i64);
    }

    pub fn encoded_len(self) -> usize {
        crate::varint::size_of_svarint(self.code() as i64)
    }

    /// Decodes a raw signed varint error code. Forgiving for unrecognized
    /// non-negative codes (spec.md invariant 9); fails with
    /// [`CodecError::InvalidErrorCode`] for negative codes.
    pub fn decode(src: &mut Bytes) -> Result<Self, CodecError> {
        let raw = src.read_svarint()?;
        if raw < 0 {
            return Err(CodecError::InvalidErrorCode(raw));
        }
        Ok(Self::from_code(raw as u64))
    }
}
