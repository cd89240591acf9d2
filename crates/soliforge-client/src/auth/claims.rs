/*
[INPUT]:  Bearer access token issued by /auth/token
[OUTPUT]: Subject and expiry claims decoded from the JWT payload
[POS]:    Auth layer - token inspection (no signature verification)
[UPDATE]: When the backend changes its token claims
*/

use base64::{
    Engine as _,
    engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::http::{Result, SoliforgeError};

/// Claims the client cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    exp: Option<i64>,
}

/// Decode the payload segment of a JWT.
///
/// The signature is never checked; the server stays the authority and the
/// claims only tell the client when a stored token is certainly stale.
pub fn decode_claims(token: &str) -> Result<TokenClaims> {
    let payload_b64 = token
        .trim()
        .split('.')
        .nth(1)
        .ok_or_else(|| SoliforgeError::InvalidResponse("access token is not a JWT".to_string()))?;

    let payload_bytes = URL_SAFE_NO_PAD
        .decode(payload_b64)
        .or_else(|_| URL_SAFE.decode(payload_b64))
        .map_err(|e| {
            SoliforgeError::InvalidResponse(format!("Invalid access token payload base64: {e}"))
        })?;

    let raw: RawClaims = serde_json::from_slice(&payload_bytes)?;
    Ok(TokenClaims {
        subject: raw.sub,
        expires_at: raw.exp.and_then(|exp| DateTime::from_timestamp(exp, 0)),
    })
}

#[cfg(test)]
pub(crate) fn make_test_jwt(sub: &str, exp: i64) -> String {
    let header = serde_json::json!({"alg": "HS256", "typ": "JWT"});
    let payload = serde_json::json!({"sub": sub, "exp": exp});

    let header_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header).unwrap());
    let payload_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload).unwrap());

    format!("{header_b64}.{payload_b64}.signature")
}
