//! Axum server wiring.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::info;

use turnstile_gate::AccessGate;

use crate::handlers;

/// The turnstile HTTP server: one gate, two routes.
pub struct GateServer {
    pub port: u16,
    gate: Arc<AccessGate>,
}

impl GateServer {
    pub fn new(port: u16, gate: AccessGate) -> Self {
        Self {
            port,
            gate: Arc::new(gate),
        }
    }

    /// Build the router. Separate from [`GateServer::start`] so tests can
    /// drive it without binding a socket.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/check", post(handlers::check))
            .route("/go", get(handlers::go))
            .layer(CorsLayer::permissive())
            .with_state(self.gate.clone())
    }

    /// Bind and serve until shut down.
    pub async fn start(&self) -> anyhow::Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        info!("turnstile server listening on {addr}");
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::util::ServiceExt;

    use turnstile_gate::GateConfig;
    use turnstile_initdata::compute_signature;
    use turnstile_membership::BotApiClient;

    const SECRET: &str = "TEST_SECRET";

    /// A fully-configured server whose membership authority is unreachable;
    /// lookups fail soft into "not a member".
    fn test_server() -> GateServer {
        let config: GateConfig = toml::from_str(
            r#"
            bot_token = "TEST_SECRET"
            chat_id = "-1001234567890"
            member_url = "https://members.example.com"
            non_member_url = "https://join.example.com"
            lookup_timeout_secs = 2
            "#,
        )
        .unwrap();
        let client = BotApiClient::with_timeout(
            config.bot_token.clone(),
            std::time::Duration::from_secs(2),
        )
        .with_base_url("http://127.0.0.1:9");
        let gate = AccessGate::with_client(config, client).unwrap();
        GateServer::new(0, gate)
    }

    fn signed_token(pairs: &[(&str, &str)]) -> String {
        let owned: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let hash = compute_signature(&owned, SECRET);
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in pairs {
            serializer.append_pair(k, v);
        }
        serializer.append_pair("hash", &hash);
        serializer.finish()
    }

    fn check_request(init_data: &str) -> Request<Body> {
        let body = serde_json::json!({ "init_data": init_data }).to_string();
        Request::builder()
            .method("POST")
            .uri("/check")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn check_rejects_forged_token_with_400() {
        let app = test_server().router();
        let mut token = signed_token(&[("user", r#"{"id":1,"first_name":"A"}"#)]);
        token.push('x');
        let response = app.oneshot(check_request(&token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn check_answers_false_when_lookup_fails_soft() {
        let app = test_server().router();
        let token = signed_token(&[("user", r#"{"id":1,"first_name":"A"}"#)]);
        let response = app.oneshot(check_request(&token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, serde_json::json!({ "member": false }));
    }

    #[tokio::test]
    async fn go_redirects_members_and_non_members_to_their_destinations() {
        for (query, expected) in [
            ("/go?member=true", "https://members.example.com"),
            ("/go?member=false", "https://join.example.com"),
            ("/go?member=yes", "https://join.example.com"),
            ("/go", "https://join.example.com"),
        ] {
            let app = test_server().router();
            let response = app
                .oneshot(Request::builder().uri(query).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{query}");
            assert_eq!(
                response.headers().get(header::LOCATION).unwrap(),
                expected,
                "{query}"
            );
        }
    }
}
