//! The access gate: verify, apply identity policy, decide, map.

use std::time::Duration;

use crate::config::{ConfigError, GateConfig};
use crate::error::GateError;
use turnstile_initdata::{verify, VerifiedIdentity};
use turnstile_membership::BotApiClient;

/// Outcome of one gate evaluation.
///
/// Intentionally binary: there is no "pending" or "error" state past this
/// boundary. `destination_url` is the 1:1 mapping of `is_member` onto the
/// two configured targets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    pub is_member: bool,
    /// Identity the decision was made for; `None` only when the identity
    /// policy is relaxed and the token carried no user record.
    pub user_id: Option<i64>,
    pub destination_url: String,
}

/// Gate over one chat's membership.
///
/// Holds the configuration and the membership client; no other state. Safe
/// to share across concurrent requests.
pub struct AccessGate {
    config: GateConfig,
    client: BotApiClient,
}

impl AccessGate {
    /// Build a gate from validated configuration.
    pub fn new(config: GateConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = BotApiClient::with_timeout(
            config.bot_token.clone(),
            Duration::from_secs(config.lookup_timeout_secs),
        );
        Ok(Self { config, client })
    }

    /// Build a gate with a caller-supplied client (tests, self-hosted API).
    pub fn with_client(config: GateConfig, client: BotApiClient) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Evaluate a raw init-data token end to end.
    ///
    /// Verification and identity-policy failures are rejections. A verified
    /// identity gets exactly one membership lookup; lookup failures resolve
    /// to a non-member decision, never an error.
    pub async fn evaluate(&self, init_data: &str) -> Result<Decision, GateError> {
        let session = verify(init_data, &self.config.bot_token)?;

        if self.config.require_identity {
            let identity = session.require_identity()?;
            return Ok(self.decide(&identity).await);
        }

        match session.require_identity() {
            Ok(identity) => Ok(self.decide(&identity).await),
            // Policy relaxed: the session is accepted, but with no identity
            // there is nothing to look up — membership cannot be confirmed.
            Err(_) => {
                tracing::debug!("identity-less session accepted, denying membership");
                Ok(self.non_member_decision(None))
            }
        }
    }

    /// Decide access for an already-verified identity.
    ///
    /// This is the seam test harnesses use to inject a pre-verified
    /// identity (see [`crate::harness`]); the verifier itself is never
    /// bypassed or weakened.
    pub async fn decide(&self, identity: &VerifiedIdentity) -> Decision {
        let is_member = self
            .client
            .check_access(&self.config.chat_id, identity.user_id)
            .await;
        Decision {
            is_member,
            user_id: Some(identity.user_id),
            destination_url: self.config.destination_url(is_member).to_string(),
        }
    }

    fn non_member_decision(&self, user_id: Option<i64>) -> Decision {
        Decision {
            is_member: false,
            user_id,
            destination_url: self.config.destination_url(false).to_string(),
        }
    }
}
