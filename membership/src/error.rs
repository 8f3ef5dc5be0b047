use thiserror::Error;

#[derive(Debug, Error)]
pub enum MembershipError {
    #[error("membership authority unreachable: {0}")]
    Unreachable(String),

    #[error("HTTP request to membership authority failed: {0}")]
    RequestFailed(String),

    #[error("authority rejected the query (code {code}): {description}")]
    Api { code: i64, description: String },

    #[error("invalid response from membership authority: {0}")]
    InvalidResponse(String),
}
