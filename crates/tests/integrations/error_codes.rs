//! Property: forgiving error-code forward-compatibility (spec.md §8,
//! invariant 9).

use bytes::BytesMut;
use proptest::prelude::*;

use wire_core::error_code::ErrorCode;
use wire_core::{CodecError, WireEncode};

proptest! {
    #[test]
    fn any_non_negative_unrecognized_code_decodes_as_unknown(code in 6u64..) {
        let mut buf = BytesMut::new();
        buf.put_svarint(code as i64);
        let mut bytes = buf.freeze();
        prop_assert_eq!(ErrorCode::decode(&mut bytes).unwrap(), ErrorCode::Unknown(code));
    }

    #[test]
    fn negative_codes_are_always_rejected(code in i64::MIN..0) {
        let mut buf = BytesMut::new();
        buf.put_svarint(code);
        let mut bytes = buf.freeze();
        prop_assert_eq!(ErrorCode::decode(&mut bytes), Err(CodecError::InvalidErrorCode(code)));
    }
}
