//! Session token management
//!
//! Uses HMAC-signed bearer tokens carrying the user id and an expiry.
//! No server-side session storage needed.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Verified session data
///
/// Carried inside the signed token. Binds a request to a user
/// directory id until the expiry passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Id of the authenticated user
    pub user_id: String,
    /// When the token was issued
    pub created_at: DateTime<Utc>,
    /// When the token expires
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Check if the session is expired
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

/// Issue a signed bearer token for a user id
///
/// Token format: base64(payload).base64(hmac_sha256(payload))
///
/// # Arguments
/// * `user_id` - Id to embed in the token
/// * `secret` - HMAC secret key
/// * `ttl_days` - Token lifetime in days
pub fn issue_token(user_id: &str, secret: &str, ttl_days: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let session = Session {
        user_id: user_id.to_string(),
        created_at: now,
        expires_at: now + Duration::days(ttl_days),
    };
    sign_session(&session, secret)
}

/// Create a signed token from session data
pub fn sign_session(session: &Session, secret: &str) -> Result<String, AppError> {
    use base64::{Engine as _, engine::general_purpose};
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    // 1. Serialize session to JSON
    let payload = serde_json::to_string(session).map_err(|e| AppError::Internal(e.into()))?;

    // 2. Base64 encode the payload
    let payload_b64 = general_purpose::URL_SAFE_NO_PAD.encode(payload.as_bytes());

    // 3. Create HMAC-SHA256 signature
    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid HMAC key: {e}")))?;
    mac.update(payload_b64.as_bytes());
    let signature = mac.finalize().into_bytes();
    let signature_b64 = general_purpose::URL_SAFE_NO_PAD.encode(signature);

    // 4. Return "{payload}.{signature}"
    Ok(format!("{}.{}", payload_b64, signature_b64))
}

/// Verify and decode a bearer token
///
/// # Returns
/// The decoded session if the signature is valid and the expiry has
/// not passed
///
/// # Errors
/// Returns `Unauthorized` if the token is malformed, tampered, or expired
pub fn verify_token(token: &str, secret: &str) -> Result<Session, AppError> {
    use base64::{Engine as _, engine::general_purpose};
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    // 1. Split token into payload and signature
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 2 {
        return Err(AppError::Unauthorized);
    }

    let payload_b64 = parts[0];
    let signature_b64 = parts[1];

    // 2. Verify HMAC signature
    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid HMAC key: {e}")))?;
    mac.update(payload_b64.as_bytes());

    let expected_signature = general_purpose::URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| AppError::Unauthorized)?;

    mac.verify_slice(&expected_signature)
        .map_err(|_| AppError::Unauthorized)?;

    // 3. Decode and deserialize payload
    let payload_bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| AppError::Unauthorized)?;

    let payload_str = String::from_utf8(payload_bytes).map_err(|_| AppError::Unauthorized)?;

    let session: Session =
        serde_json::from_str(&payload_str).map_err(|_| AppError::Unauthorized)?;

    // 4. Check if the session is expired
    if session.is_expired() {
        return Err(AppError::Unauthorized);
    }

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-32-bytes-long!!!";

    #[test]
    fn issue_and_verify_roundtrip() {
        let token = issue_token("user-123", SECRET, 10).unwrap();
        let session = verify_token(&token, SECRET).unwrap();

        assert_eq!(session.user_id, "user-123");
        assert!(!session.is_expired());
        // Expiry is ten days out, give or take the test's own runtime.
        let ttl = session.expires_at - session.created_at;
        assert_eq!(ttl, Duration::days(10));
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = issue_token("user-123", SECRET, 10).unwrap();
        let result = verify_token(&token, "another-secret-key-32-bytes-long");
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn verify_rejects_tampered_payload() {
        let token = issue_token("user-123", SECRET, 10).unwrap();
        let signature = token.split('.').nth(1).unwrap();

        let forged = Session {
            user_id: "someone-else".to_string(),
            created_at: Utc::now(),
            expires_at: Utc::now() + Duration::days(10),
        };
        let forged_payload = {
            use base64::{Engine as _, engine::general_purpose};
            general_purpose::URL_SAFE_NO_PAD.encode(serde_json::to_string(&forged).unwrap())
        };

        let tampered = format!("{}.{}", forged_payload, signature);
        assert!(matches!(
            verify_token(&tampered, SECRET),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn verify_rejects_expired_token() {
        let session = Session {
            user_id: "user-123".to_string(),
            created_at: Utc::now() - Duration::days(11),
            expires_at: Utc::now() - Duration::days(1),
        };
        let token = sign_session(&session, SECRET).unwrap();
        assert!(matches!(
            verify_token(&token, SECRET),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn verify_rejects_garbage() {
        assert!(matches!(
            verify_token("not-a-token", SECRET),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            verify_token("a.b.c", SECRET),
            Err(AppError::Unauthorized)
        ));
    }
}
