//! HTTP request handlers.
//!
//! The JSON surface deliberately reveals nothing past the binary decision:
//! a failed membership lookup and a genuine non-member produce the same
//! `{"member": false}`, and all verification failures collapse to one 400.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use turnstile_gate::{AccessGate, GateError};

#[derive(Deserialize)]
pub struct CheckRequest {
    pub init_data: String,
}

#[derive(Serialize)]
pub struct CheckResponse {
    pub member: bool,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// `POST /check` — verify init data and report the membership decision.
pub async fn check(
    State(gate): State<Arc<AccessGate>>,
    Json(request): Json<CheckRequest>,
) -> Response {
    if request.init_data.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "missing init data");
    }

    match gate.evaluate(&request.init_data).await {
        Ok(decision) => {
            tracing::info!(
                user_id = decision.user_id,
                member = decision.is_member,
                "access decision"
            );
            Json(CheckResponse {
                member: decision.is_member,
            })
            .into_response()
        }
        Err(GateError::Rejected(reason)) => {
            // Forgery vs. malformed input matters for the audit log, not for
            // the response.
            tracing::warn!(%reason, "init data rejected");
            error_response(StatusCode::BAD_REQUEST, "invalid init data")
        }
        Err(GateError::Config(e)) => {
            tracing::error!(error = %e, "gate misconfigured");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "server configuration error")
        }
    }
}

/// `GET /go?member=true|false` — redirect to the configured destination.
///
/// Only the literal `true` routes to the member destination; anything else
/// (absent, `false`, garbage) goes to the non-member one.
pub async fn go(
    State(gate): State<Arc<AccessGate>>,
    Query(params): Query<HashMap<String, String>>,
) -> Redirect {
    let is_member = params.get("member").map(String::as_str) == Some("true");
    Redirect::temporary(gate.config().destination_url(is_member))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_request_deserializes() {
        let request: CheckRequest =
            serde_json::from_str(r#"{"init_data":"a=1&hash=ff"}"#).unwrap();
        assert_eq!(request.init_data, "a=1&hash=ff");
    }

    #[test]
    fn check_response_shape() {
        let body = serde_json::to_string(&CheckResponse { member: true }).unwrap();
        assert_eq!(body, r#"{"member":true}"#);
    }
}
