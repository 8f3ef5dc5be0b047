//! Gate orchestration: token verification, identity policy, one membership
//! lookup, and the binary mapping to a destination URL.
//!
//! The contract inherited from both components below holds here: the gate
//! never fails open. Verification failures are rejections; membership lookup
//! failures silently become "not a member".

pub mod config;
pub mod error;
pub mod gate;

#[cfg(any(test, feature = "harness"))]
pub mod harness;

pub use config::{ConfigError, GateConfig};
pub use error::GateError;
pub use gate::{AccessGate, Decision};
