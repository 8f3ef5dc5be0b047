use thiserror::Error;

use crate::config::ConfigError;
use turnstile_initdata::VerifyError;

/// Errors the gate surfaces to its caller.
///
/// Membership lookup failures never appear here — they are absorbed into a
/// "not a member" decision (fail-soft).
#[derive(Debug, Error)]
pub enum GateError {
    /// The token failed verification or the identity policy. Terminal for
    /// this request; never retried.
    #[error("token rejected: {0}")]
    Rejected(#[from] VerifyError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
