//! Ordinal enum codec and flag-word helpers (component C3).
//!
//! Generalizes the teacher's ad hoc per-message flag constants
//! (`VERBOSE_BIT`, `HAS_AUTH_BIT` in `message/connect.rs`;
//! `HAS_REPLY_TO_BIT`, `HAS_HEADER_BIT` in `message/publish.rs`) into a
//! single reusable bitset type, since this protocol's replies pack five to
//! eight independent optional sub-fields into one byte/varint rather than
//! one or two.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::CodecError;
use crate::varint::{WireDecode, WireEncode, size_of_uvarint};

/// Encodes `ordinal` (a finite enum's declaration-order index) as an
/// unsigned varint.
pub fn encode_ordinal(dst: &mut BytesMut, ordinal: usize) {
    dst.put_uvarint(ordinal as u64);
}

/// On-wire byte length of [`encode_ordinal`]'s output for the same `ordinal`.
pub fn ordinal_encoded_len(ordinal: usize) -> usize {
    size_of_uvarint(ordinal as u64)
}

/// Decodes an ordinal and checks it against `count`, the number of declared
/// variants. Fails with [`CodecError::EnumOutOfRange`] on an unknown
/// ordinal, per spec.md S4.3.
pub fn decode_ordinal(src: &mut Bytes, count: usize) -> Result<usize, CodecError> {
    let ordinal = src.read_uvarint()?;
    if ordinal as usize >= count {
        return Err(CodecError::EnumOutOfRange { ordinal, count });
    }
    Ok(ordinal as usize)
}

/// A bitset over a small enum of optional sub-fields, encoded as a single
/// unsigned varint. Message bodies with multiple independently-optional
/// sub-fields (Accept reply, BeginRecovery request) collapse their
/// presence flags into one `FlagWord` to save bytes, per spec.md S9.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagWord(pub u64);

impl FlagWord {
    pub const fn empty() -> Self {
        FlagWord(0)
    }

    pub fn is_set(&self, bit: u32) -> bool {
        self.0 & (1 << bit) != 0
    }

    pub fn set(&mut self, bit: u32, value: bool) {
        if value {
            self.0 |= 1 << bit;
        } else {
            self.0 &= !(1 << bit);
        }
    }

    pub fn with(mut self, bit: u32, value: bool) -> Self {
        self.set(bit, value);
        self
    }

    pub fn encode(&self, dst: &mut BytesMut) {
        dst.put_uvarint(self.0);
    }

    pub fn decode(src: &mut Bytes) -> Result<Self, CodecError> {
        Ok(FlagWord(src.read_uvarint()?))
    }

    pub fn encoded_len(&self) -> usize {
        size_of_uvarint(self.0)
    }
}

/// Writes `0x00` (absent) or `0x01` followed by `encode_some(value)`
/// (present), the bit-exact "optional T" wrapper described in spec.md S9.
pub fn encode_optional<T>(dst: &mut BytesMut, value: &Option<T>, encode_some: impl FnOnce(&T, &mut BytesMut)) {
    match value {
        None => dst.put_u8(0x00),
        Some(v) => {
            dst.put_u8(0x01);
            encode_some(v, dst);
        }
    }
}

/// Reads the `0x00`/`0x01` presence byte and, if present, decodes the
/// payload with `decode_some`.
pub fn decode_optional<T>(
    src: &mut Bytes,
    decode_some: impl FnOnce(&mut Bytes) -> Result<T, CodecError>,
) -> Result<Option<T>, CodecError> {
    match src.read_u8()? {
        0x00 => Ok(None),
        0x01 => Ok(Some(decode_some(src)?)),
        other => Err(CodecError::CorruptInput {
            reason: if other == 0 { "unreachable" } else { "optional presence byte must be 0 or 1" },
        }),
    }
}

/// On-wire byte length of [`encode_optional`]'s output for the same `value`.
pub fn optional_encoded_len<T>(value: &Option<T>, size_some: impl FnOnce(&T) -> usize) -> usize {
    match value {
        None => 1,
        Some(v) => 1 + size_some(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_word_roundtrip() {
        let flags = FlagWord::empty().with(0, true).with(3, true).with(7, false);
        let mut buf = BytesMut::new();
        flags.encode(&mut buf);
        let mut bytes = buf.freeze();
        let decoded = FlagWord::decode(&mut bytes).unwrap();
        assert_eq!(decoded, flags);
        assert!(decoded.is_set(0));
        assert!(decoded.is_set(3));
        assert!(!decoded.is_set(7));
    }

    #[test]
    fn ordinal_roundtrip() {
        let mut buf = BytesMut::new();
        encode_ordinal(&mut buf, 2);
        let mut bytes = buf.freeze();
        assert_eq!(decode_ordinal(&mut bytes, 5).unwrap(), 2);
    }

    #[test]
    fn ordinal_out_of_range_fails() {
        let mut buf = BytesMut::new();
        encode_ordinal(&mut buf, 9);
        let mut bytes = buf.freeze();
        assert_eq!(
            decode_ordinal(&mut bytes, 5),
            Err(CodecError::EnumOutOfRange { ordinal: 9, count: 5 })
        );
    }

    #[test]
    fn flag_word_encoded_len_matches_encode() {
        let flags = FlagWord::empty().with(0, true).with(9, true);
        let mut buf = BytesMut::new();
        flags.encode(&mut buf);
        assert_eq!(buf.len(), flags.encoded_len());
    }

    #[test]
    fn optional_encoded_len_matches_encode() {
        let mut absent_buf = BytesMut::new();
        encode_optional(&mut absent_buf, &None::<u64>, |v, dst| dst.put_uvarint(*v));
        assert_eq!(absent_buf.len(), optional_encoded_len(&None::<u64>, |v: &u64| size_of_uvarint(*v)));

        let mut present_buf = BytesMut::new();
        encode_optional(&mut present_buf, &Some(300u64), |v, dst| dst.put_uvarint(*v));
        assert_eq!(present_buf.len(), optional_encoded_len(&Some(300u64), |v: &u64| size_of_uvarint(*v)));
    }

    #[test]
    fn optional_roundtrip_absent_and_present() {
        let mut buf = BytesMut::new();
        encode_optional(&mut buf, &None::<u8>, |v, dst| dst.put_uvarint(*v as u64));
        encode_optional(&mut buf, &Some(42u8), |v, dst| dst.put_uvarint(*v as u64));
        let mut bytes = buf.freeze();
        let absent = decode_optional(&mut bytes, |src| Ok(src.read_uvarint()? as u8)).unwrap();
        let present = decode_optional(&mut bytes, |src| Ok(src.read_uvarint()? as u8)).unwrap();
        assert_eq!(absent, None);
        assert_eq!(present, Some(42));
    }
}
