//! Request pacing
//!
//! Every outbound Admin API call passes through a [`RequestGate`]. The gate
//! decides how long a call has to wait before it may be sent, and is told about
//! each response so adaptive implementations can react to the remote limits.

pub mod config;
pub mod gate;

pub use config::ThrottleConfig;
pub use gate::{GateStats, RequestGate};
