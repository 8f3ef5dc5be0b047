//! Token parsing and canonical data-string construction.
//!
//! The issuing platform signs the pairs in a fixed canonical form: every
//! entry except `hash`, sorted byte-wise by key, rendered as `key=value` and
//! joined with `\n`. Reproducing that form exactly is what makes the
//! signature check interoperable.

use crate::error::VerifyError;

/// Decode a token into key/value pairs.
///
/// Standard query-string rules: `&`-separated entries, `=`-separated
/// key/value, percent-decoding applied to both. Duplicate keys keep the
/// **last** occurrence; earlier ones are dropped before canonicalization so
/// they cannot influence the signature.
pub fn parse_pairs(token: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (key, value) in url::form_urlencoded::parse(token.as_bytes()) {
        let key = key.into_owned();
        let value = value.into_owned();
        if let Some(existing) = pairs.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = value;
        } else {
            pairs.push((key, value));
        }
    }
    pairs
}

/// Remove the `hash` entry from the pair list and return it.
///
/// Fails with [`VerifyError::MissingSignature`] when the token carries no
/// `hash` at all.
pub fn split_signature(
    pairs: Vec<(String, String)>,
) -> Result<(Vec<(String, String)>, String), VerifyError> {
    let mut signature = None;
    let mut rest = Vec::with_capacity(pairs.len());
    for (key, value) in pairs {
        if key == "hash" {
            signature = Some(value);
        } else {
            rest.push((key, value));
        }
    }
    let signature = signature.ok_or(VerifyError::MissingSignature)?;
    Ok((rest, signature))
}

/// Build the canonical data string the signature covers.
///
/// Entries are sorted by key using plain byte-wise comparison (not locale
/// collation), rendered as `key=value`, and joined with a single `\n`. No
/// trailing separator.
pub fn canonical_data_string(mut pairs: Vec<(String, String)>) -> String {
    pairs.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));
    let mut out = String::new();
    for (i, (key, value)) in pairs.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(key);
        out.push('=');
        out.push_str(value);
    }
    out
}
