//! Verified init-data types.

use serde::{Deserialize, Serialize};

use crate::error::VerifyError;

/// User record embedded in the `user` field of init data.
///
/// Mirrors the platform's JSON shape; only `id` and `first_name` are
/// guaranteed by the issuer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique identity of the caller.
    pub id: i64,
    /// Display name.
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

/// A token whose signature has been checked.
///
/// Only constructed by [`crate::verify`] after the HMAC comparison has
/// succeeded; immutable once produced. The `user` record is optional at this
/// level — whether an identity-less session is acceptable is the caller's
/// policy, not the verifier's.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedSession {
    /// Embedded user record, if the token carried one.
    pub user: Option<UserProfile>,
    /// Opaque session correlator supplied by the platform.
    pub chat_instance: Option<String>,
    /// The original hex signature, retained for audit and idempotence checks.
    pub signature: String,
}

/// A verified session that is guaranteed to carry an identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub user_id: i64,
    pub display_name: String,
    pub username: Option<String>,
    pub chat_instance: Option<String>,
    /// The original hex signature of the session this identity came from.
    pub signature: String,
}

impl VerifiedSession {
    /// Enforce the "identity required" policy.
    ///
    /// Fails with [`VerifyError::MissingIdentity`] when the token was validly
    /// signed but carried no `user` field.
    pub fn require_identity(self) -> Result<VerifiedIdentity, VerifyError> {
        let user = self.user.ok_or(VerifyError::MissingIdentity)?;
        Ok(VerifiedIdentity {
            user_id: user.id,
            display_name: user.first_name,
            username: user.username,
            chat_instance: self.chat_instance,
            signature: self.signature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(user: Option<UserProfile>) -> VerifiedSession {
        VerifiedSession {
            user,
            chat_instance: Some("-3788475317572404878".to_string()),
            signature: "ab".repeat(32),
        }
    }

    #[test]
    fn require_identity_maps_fields() {
        let identity = session(Some(UserProfile {
            id: 42,
            first_name: "Alice".to_string(),
            last_name: None,
            username: Some("alice".to_string()),
            language_code: None,
        }))
        .require_identity()
        .unwrap();

        assert_eq!(identity.user_id, 42);
        assert_eq!(identity.display_name, "Alice");
        assert_eq!(identity.username.as_deref(), Some("alice"));
        assert_eq!(
            identity.chat_instance.as_deref(),
            Some("-3788475317572404878")
        );
    }

    #[test]
    fn require_identity_rejects_identity_less_session() {
        assert_eq!(
            session(None).require_identity(),
            Err(VerifyError::MissingIdentity)
        );
    }

    #[test]
    fn user_profile_tolerates_extra_fields() {
        let json = r#"{"id":7,"first_name":"Bob","photo_url":"https://x/y.jpg"}"#;
        let user: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.first_name, "Bob");
        assert_eq!(user.last_name, None);
    }
}
