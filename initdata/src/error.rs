use thiserror::Error;

/// Reasons an init-data token is rejected.
///
/// Every variant means "do not trust this identity". `SignatureMismatch` is
/// kept distinct so callers can log forgery attempts separately from
/// malformed input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("token carries no hash entry")]
    MissingSignature,

    #[error("signature does not match the canonical data string")]
    SignatureMismatch,

    #[error("embedded user record is malformed: {0}")]
    MalformedIdentity(String),

    #[error("token is validly signed but carries no user record")]
    MissingIdentity,
}
