//! Leaf wire-format primitives shared by every codec in this workspace:
//! varints and fixed-width fields (C1), bit-packed integer arrays (C2),
//! ordinal enum and flag-word encoding (C3), and the forgiving error-code
//! registry (aux). Pure and stateless, per spec.md S5: every function is a
//! total function of its inputs plus the supplied byte sink/source.

#![forbid(unsafe_code)]

pub mod bitpacked;
pub mod error;
pub mod error_code;
pub mod flags;
pub mod scratch;
pub mod varint;

pub use error::CodecError;
pub use error_code::ErrorCode;
pub use flags::{
    FlagWord, decode_optional, decode_ordinal, encode_optional, encode_ordinal, optional_encoded_len,
    ordinal_encoded_len,
};
pub use varint::{WireDecode, WireEncode};
