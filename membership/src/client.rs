//! HTTP client for the Bot API `getChatMember` endpoint.

use crate::error::MembershipError;
use crate::status::ChatMemberStatus;

use serde::Deserialize;
use std::time::Duration;

/// Default timeout for membership lookups.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Base URL of the hosted Bot API.
const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Client for querying chat membership.
///
/// Sends `GET /bot<token>/getChatMember?chat_id=..&user_id=..` and parses
/// the response envelope. Exactly one request per lookup, never retried.
pub struct BotApiClient {
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
    /// Bot credential. Embedded in the request path, never logged.
    bot_token: String,
    /// API base URL; overridable for tests and self-hosted API servers.
    base_url: String,
}

/// Raw JSON envelope returned by the Bot API.
///
/// `{"ok": true, "result": {"status": ...}}` on success,
/// `{"ok": false, "error_code": .., "description": ..}` on failure.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    #[serde(default)]
    result: Option<ChatMemberWire>,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMemberWire {
    status: String,
}

impl BotApiClient {
    /// Create a client with default timeout settings.
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self::with_timeout(bot_token, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(bot_token: impl Into<String>, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            bot_token: bot_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different API host (tests, self-hosted servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Look up the membership status of `user_id` in `chat_id`.
    ///
    /// Errors are returned as-is here; the fail-soft policy lives in
    /// [`BotApiClient::check_access`].
    pub async fn get_chat_member(
        &self,
        chat_id: &str,
        user_id: i64,
    ) -> Result<ChatMemberStatus, MembershipError> {
        let url = format!(
            "{}/bot{}/getChatMember",
            self.base_url.trim_end_matches('/'),
            self.bot_token
        );

        let response = self
            .http_client
            .get(&url)
            .query(&[("chat_id", chat_id), ("user_id", &user_id.to_string())])
            .send()
            .await
            .map_err(|e| {
                // Strip the URL from the error: the request path embeds the
                // bot credential.
                let e = e.without_url();
                if e.is_timeout() {
                    MembershipError::Unreachable(format!("request timed out: {e}"))
                } else if e.is_connect() {
                    MembershipError::Unreachable(format!("connection failed: {e}"))
                } else {
                    MembershipError::RequestFailed(e.to_string())
                }
            })?;

        let http_status = response.status();
        let envelope: ApiEnvelope = response.json().await.map_err(|_| {
            // The API reports errors inside the envelope; a body that is not
            // even JSON means something other than the API answered.
            MembershipError::InvalidResponse(format!("non-envelope body, HTTP {http_status}"))
        })?;

        if !envelope.ok {
            return Err(MembershipError::Api {
                code: envelope.error_code.unwrap_or_else(|| http_status.as_u16().into()),
                description: envelope
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            });
        }

        let member = envelope.result.ok_or_else(|| {
            MembershipError::InvalidResponse("ok envelope without result".to_string())
        })?;
        Ok(ChatMemberStatus::parse(&member.status))
    }

    /// Decide access for `user_id` in `chat_id`. Fail-soft.
    ///
    /// Any lookup error resolves to `false` — "unable to confirm membership"
    /// and "not a member" are the same restrictive outcome. The error is
    /// logged and never propagated past this boundary.
    pub async fn check_access(&self, chat_id: &str, user_id: i64) -> bool {
        match self.get_chat_member(chat_id, user_id).await {
            Ok(status) => {
                let member = status.is_member();
                tracing::debug!(user_id, %status, member, "membership lookup completed");
                member
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "membership lookup failed, denying access");
                false
            }
        }
    }
}
