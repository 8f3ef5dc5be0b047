//! HMAC-SHA256 signature verification for init-data tokens.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::canonical::{canonical_data_string, parse_pairs, split_signature};
use crate::error::VerifyError;
use crate::types::{UserProfile, VerifiedSession};

type HmacSha256 = Hmac<Sha256>;

/// Fixed HMAC key used by the platform to derive the signing key from the
/// bot secret. Not configurable.
const KEY_DERIVATION_CONTEXT: &[u8] = b"WebAppData";

fn hmac_sha256(key: &[u8], message: &[u8]) -> HmacSha256 {
    // HMAC accepts keys of any length; new_from_slice cannot fail here.
    let mut mac =
        HmacSha256::new_from_slice(key).expect("HMAC-SHA256 accepts keys of any length");
    mac.update(message);
    mac
}

/// Derive the signing key for a bot secret.
///
/// `HMAC-SHA256(key = "WebAppData", message = secret)` — note the secret is
/// the *message*, not the key.
pub fn derive_signing_key(secret: &str) -> [u8; 32] {
    hmac_sha256(KEY_DERIVATION_CONTEXT, secret.as_bytes())
        .finalize()
        .into_bytes()
        .into()
}

/// Compute the hex signature for a set of pairs (the `hash` entry excluded).
///
/// This is the issuer side of the protocol; the gate itself only verifies.
/// Exposed so fixtures and mock issuers can mint validly-signed tokens.
pub fn compute_signature(pairs: &[(String, String)], secret: &str) -> String {
    let data = canonical_data_string(pairs.to_vec());
    let key = derive_signing_key(secret);
    hex::encode(hmac_sha256(&key, data.as_bytes()).finalize().into_bytes())
}

/// Verify an init-data token against a bot secret.
///
/// Runs the full protocol: query-string decode (duplicate keys: last wins),
/// extract `hash`, canonicalize the rest, recompute the HMAC under the
/// derived signing key and compare in constant time, then decode the
/// embedded `user` record if one is present.
///
/// A validly-signed token without a `user` field is returned as an
/// identity-less [`VerifiedSession`]; callers that need an identity apply
/// [`VerifiedSession::require_identity`].
pub fn verify(token: &str, secret: &str) -> Result<VerifiedSession, VerifyError> {
    let (pairs, signature) = split_signature(parse_pairs(token))?;

    let supplied_tag = hex::decode(&signature).map_err(|_| VerifyError::SignatureMismatch)?;

    let user_json = pairs
        .iter()
        .find(|(k, _)| k == "user")
        .map(|(_, v)| v.clone());
    let chat_instance = pairs
        .iter()
        .find(|(k, _)| k == "chat_instance")
        .map(|(_, v)| v.clone());

    let data = canonical_data_string(pairs);
    let key = derive_signing_key(secret);
    hmac_sha256(&key, data.as_bytes())
        .verify_slice(&supplied_tag)
        .map_err(|_| VerifyError::SignatureMismatch)?;

    // Signature checked; only now is it safe to look inside the payload.
    let user = match user_json {
        Some(json) => Some(decode_user(&json)?),
        None => None,
    };

    Ok(VerifiedSession {
        user,
        chat_instance,
        signature,
    })
}

fn decode_user(json: &str) -> Result<UserProfile, VerifyError> {
    serde_json::from_str(json).map_err(|e| VerifyError::MalformedIdentity(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "TEST_SECRET";

    /// Token signed out-of-band with an independent HMAC-SHA256
    /// implementation; fields: auth_date, chat_instance, chat_type, user.
    const KNOWN_TOKEN: &str = "auth_date=1700000000&chat_instance=-3788475317572404878&chat_type=channel&user=%7B%22id%22%3A123456789%2C%22first_name%22%3A%22Alice%22%2C%22last_name%22%3A%22Liddell%22%2C%22username%22%3A%22alice%22%2C%22language_code%22%3A%22en%22%7D&hash=3c358e73edfd009fcacfcb174ecca06d3abd56f138e6b2d48249e6a24e721b26";

    /// Same secret, validly signed, but no user record.
    const IDENTITY_LESS_TOKEN: &str = "auth_date=1700000000&query_id=AAHdF6IQAAAAAN0XohDhrOrc&hash=e79f97cc2b6f07d392a0e1e30d5111cd3868e1b111e74d008685b3ec5ed3738e";

    fn sign_token(pairs: &[(&str, &str)], secret: &str) -> String {
        let owned: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let hash = compute_signature(&owned, secret);
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in pairs {
            serializer.append_pair(k, v);
        }
        serializer.append_pair("hash", &hash);
        serializer.finish()
    }

    #[test]
    fn known_vector_verifies() {
        let session = verify(KNOWN_TOKEN, SECRET).unwrap();
        let user = session.user.unwrap();
        assert_eq!(user.id, 123456789);
        assert_eq!(user.first_name, "Alice");
        assert_eq!(user.username.as_deref(), Some("alice"));
        assert_eq!(
            session.chat_instance.as_deref(),
            Some("-3788475317572404878")
        );
        assert_eq!(
            session.signature,
            "3c358e73edfd009fcacfcb174ecca06d3abd56f138e6b2d48249e6a24e721b26"
        );
    }

    #[test]
    fn known_vector_is_deterministic() {
        assert_eq!(verify(KNOWN_TOKEN, SECRET), verify(KNOWN_TOKEN, SECRET));
    }

    #[test]
    fn known_vector_with_altered_hash_fails() {
        // Flip the first hex digit of the hash.
        let altered = KNOWN_TOKEN.replace("hash=3c35", "hash=4c35");
        assert_eq!(
            verify(&altered, SECRET).unwrap_err(),
            VerifyError::SignatureMismatch
        );
    }

    #[test]
    fn wrong_secret_fails() {
        assert_eq!(
            verify(KNOWN_TOKEN, "OTHER_SECRET").unwrap_err(),
            VerifyError::SignatureMismatch
        );
    }

    #[test]
    fn tampered_field_fails() {
        let tampered = KNOWN_TOKEN.replace("auth_date=1700000000", "auth_date=1700000001");
        assert_eq!(
            verify(&tampered, SECRET).unwrap_err(),
            VerifyError::SignatureMismatch
        );
    }

    #[test]
    fn missing_hash_fails() {
        assert_eq!(
            verify("auth_date=1700000000", SECRET).unwrap_err(),
            VerifyError::MissingSignature
        );
    }

    #[test]
    fn non_hex_hash_fails_as_mismatch() {
        let token = sign_token(&[("a", "1")], SECRET).replace("hash=", "hash=zz");
        assert_eq!(
            verify(&token, SECRET).unwrap_err(),
            VerifyError::SignatureMismatch
        );
    }

    #[test]
    fn identity_less_token_verifies_without_user() {
        let session = verify(IDENTITY_LESS_TOKEN, SECRET).unwrap();
        assert_eq!(session.user, None);
        assert_eq!(session.chat_instance, None);
    }

    #[test]
    fn malformed_user_json_fails_after_signature_check() {
        let token = sign_token(&[("auth_date", "1700000000"), ("user", "{not json")], SECRET);
        assert!(matches!(
            verify(&token, SECRET).unwrap_err(),
            VerifyError::MalformedIdentity(_)
        ));
    }

    #[test]
    fn user_missing_required_fields_fails() {
        // `first_name` absent.
        let token = sign_token(&[("user", r#"{"id":1}"#)], SECRET);
        assert!(matches!(
            verify(&token, SECRET).unwrap_err(),
            VerifyError::MalformedIdentity(_)
        ));
    }

    #[test]
    fn duplicate_key_signature_covers_last_occurrence() {
        // Signature computed over {a=2, b=1}; the token repeats a=1 first.
        let token = "a=1&a=2&b=1&hash=8343e22dd4af756ad2883fd074a1d0b570b18d0d6b7627e7110714214bf44ae2";
        assert!(verify(token, SECRET).is_ok());
    }

    #[test]
    fn round_trip_with_local_signer() {
        let token = sign_token(
            &[
                ("auth_date", "1724659200"),
                ("chat_instance", "991"),
                ("user", r#"{"id":55,"first_name":"Eve"}"#),
            ],
            SECRET,
        );
        let identity = verify(&token, SECRET)
            .unwrap()
            .require_identity()
            .unwrap();
        assert_eq!(identity.user_id, 55);
        assert_eq!(identity.display_name, "Eve");
        assert_eq!(identity.chat_instance.as_deref(), Some("991"));
    }

    #[test]
    fn signing_key_derivation_uses_secret_as_message() {
        // Distinct secrets must yield distinct keys; same secret, same key.
        assert_eq!(derive_signing_key("a"), derive_signing_key("a"));
        assert_ne!(derive_signing_key("a"), derive_signing_key("b"));
    }
}
