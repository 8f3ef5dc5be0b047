//! Verification of platform-issued init data for the turnstile gate.
//!
//! A Mini App embedded in the messaging platform hands its backend an opaque
//! query-string of `key=value` pairs, one of which (`hash`) is an HMAC-SHA256
//! signature over the remaining pairs. This crate checks that signature and
//! extracts the embedded identity:
//!
//! - **Canonicalization**: pairs minus `hash`, sorted byte-wise by key,
//!   joined as `key=value` with `\n` separators.
//! - **Key derivation**: `HMAC-SHA256(key = "WebAppData", message = secret)`
//!   — fixed by the issuing platform, not configurable.
//! - **Comparison**: constant-time, via [`hmac::Mac::verify_slice`].
//!
//! No I/O and no clock access happen here; for a fixed `(token, secret)`
//! pair the result is always the same.

pub mod canonical;
pub mod error;
pub mod types;
pub mod verify;

pub use canonical::{canonical_data_string, parse_pairs, split_signature};
pub use error::VerifyError;
pub use types::{UserProfile, VerifiedIdentity, VerifiedSession};
pub use verify::{compute_signature, derive_signing_key, verify};
