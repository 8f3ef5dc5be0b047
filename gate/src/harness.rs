//! Test harness for injecting pre-verified identities.
//!
//! Compiled only for tests, or behind the `harness` feature for staging
//! rigs. Identities built here enter the gate through the normal
//! [`crate::AccessGate::decide`] seam — there is no bypass inside the
//! verifier and no magic token values.

use turnstile_initdata::VerifiedIdentity;

/// Marker signature so harness-originated identities are recognisable in
/// audit logs.
pub const HARNESS_SIGNATURE: &str = "harness-preverified";

/// Build a pre-verified identity without going through token verification.
pub fn preverified(user_id: i64, display_name: &str) -> VerifiedIdentity {
    VerifiedIdentity {
        user_id,
        display_name: display_name.to_string(),
        username: None,
        chat_instance: None,
        signature: HARNESS_SIGNATURE.to_string(),
    }
}
