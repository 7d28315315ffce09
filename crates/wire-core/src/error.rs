//! Error taxonomy shared by every codec in this workspace.
//!
//! Mirrors the teacher's two-layer `WireError` -> `DecodeError` shape, but
//! collapsed into a single enum since this workspace has no analogous
//! transport-facing crate to own a second layer.

/// A single typed error produced by any encode/decode/size call in this
/// workspace. Every variant carries enough context (offset, expected size,
/// observed byte) to diagnose wire-format drift, per spec.md S7.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum CodecError {
    #[error("short input: expected at least {expected} more bytes, got {actual}")]
    ShortInput { expected: usize, actual: usize },

    #[error("varint exceeds its maximum encoded length of {max_bytes} bytes")]
    MalformedVarInt { max_bytes: usize },

    #[error("enum ordinal {ordinal} is out of range (0..{count})")]
    EnumOutOfRange { ordinal: u64, count: usize },

    #[error("tagged-union discriminator {observed} is not a permitted variant")]
    UnexpectedVariant { observed: u8 },

    #[error("corrupt input: {reason}")]
    CorruptInput { reason: &'static str },

    #[error("declared count {count} is implausible for {remaining} remaining bytes (min {min_bytes_per_element} bytes/element)")]
    ImplausibleCount { count: u64, remaining: usize, min_bytes_per_element: usize },

    #[error("packed value {value} exceeds its declared max {max}")]
    PackedOverflow { value: u64, max: u64 },

    #[error("negative error code {0} is not valid")]
    InvalidErrorCode(i64),
}

impl CodecError {
    pub fn short(expected: usize, actual: usize) -> Self {
        CodecError::ShortInput { expected, actual }
    }
}
