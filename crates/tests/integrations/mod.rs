//! Cross-crate black-box integration tests: end-to-end round-trips of
//! `accord-proto` message bodies over `routable` structural codecs and
//! `wire-core` primitives, exercising the testable properties called out
//! in spec.md §8 that no single crate's own unit tests span.

mod bitpacking;
mod collections;
mod error_codes;
mod messages;
mod roundtrip;
mod size_agreement;
