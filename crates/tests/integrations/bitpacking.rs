//! Property: bit-packing bounds (spec.md §8, invariant 10) — encode-then-
//! decode recovers every value exactly, and every decoded element honors
//! the declared max.

use bytes::BytesMut;
use proptest::prelude::*;

use wire_core::bitpacked::{bits_for_max, pack, packed_byte_len, unpack};

proptest! {
    #[test]
    fn packed_array_roundtrips_and_stays_within_declared_max(
        max in 0u64..=1_000_000,
        raw_values in proptest::collection::vec(0u64..=1_000_000, 0..32),
    ) {
        let values: Vec<u64> = raw_values.into_iter().map(|v| v % (max + 1)).collect();
        let bits = bits_for_max(max);
        let mut dst = BytesMut::new();
        pack(&mut dst, &values, bits).unwrap();
        prop_assert_eq!(dst.len(), packed_byte_len(values.len(), bits));

        let mut src = dst.freeze();
        let decoded = unpack(&mut src, values.len(), bits).unwrap();
        prop_assert_eq!(decoded.clone(), values);
        for v in decoded {
            prop_assert!(v <= max);
        }
    }

    #[test]
    fn values_exceeding_the_bit_width_are_rejected(bits in 1u32..16, overflow in 1u64..=64) {
        let max_representable = (1u64 << bits) - 1;
        let value = max_representable + overflow;
        let mut dst = BytesMut::new();
        prop_assert!(pack(&mut dst, &[value], bits).is_err());
    }
}
