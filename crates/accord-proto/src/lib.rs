//! Message codec (component C8): the request/reply bodies of the Accord
//! consensus protocol's wire messages, built on top of the `wire-core`
//! primitives and `routable` structural codecs.

#![forbid(unsafe_code)]

pub mod accept;
pub mod begin_recovery;
pub mod check_status;
pub mod envelope;
pub mod get_ephemeral_read_deps;
pub mod get_latest_deps;
pub mod inform_durable;

pub use accept::{AcceptKind, AcceptReply, AcceptRequest, NotAccept};
pub use begin_recovery::{BeginRecoveryOk, BeginRecoveryReply, BeginRecoveryRequest};
pub use check_status::{CheckStatusCommon, CheckStatusFull, CheckStatusReply};
pub use envelope::{Envelope, Version};
pub use get_ephemeral_read_deps::GetEphemeralReadDepsReply;
pub use get_latest_deps::{GetLatestDepsReply, GetLatestDepsRequest};
pub use inform_durable::{InformDurableReply, InformDurableRequest};
