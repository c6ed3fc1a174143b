use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Tokens handed to the operator client after login or refresh: a short-lived
/// signed access token for the `Authorization` header and an opaque refresh
/// token carried in an HTTP-only cookie.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuedTokens {
    pub access_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_token: String,
}

#[derive(Clone, Debug)]
struct RefreshSession {
    operator: String,
    issued_at: DateTime<Utc>,
}

/// Issues and verifies operator tokens.
///
/// Access tokens are `operator:expiry:hmac` with an HMAC-SHA256 signature
/// over the first two fields. Refresh tokens are 32 random bytes in hex,
/// stored only as SHA-256 hashes; every refresh rotates the token, so a
/// rotated-out value can never be replayed.
pub struct TokenService {
    signing_key: Vec<u8>,
    access_ttl: Duration,
    sessions: Mutex<HashMap<String, RefreshSession>>,
}

impl TokenService {
    pub fn new(signing_secret: &SecretString, access_ttl_secs: u64) -> Self {
        Self {
            signing_key: signing_secret.expose_secret().as_bytes().to_vec(),
            access_ttl: Duration::seconds(access_ttl_secs.min(i64::MAX as u64) as i64),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn issue(&self, operator: &str, now: DateTime<Utc>) -> IssuedTokens {
        let access_expires_at = now + self.access_ttl;
        let access_token = self.sign_access(operator, access_expires_at);

        let refresh_token = random_token();
        self.lock_sessions().insert(
            hash_token(&refresh_token),
            RefreshSession { operator: operator.to_string(), issued_at: now },
        );

        IssuedTokens { access_token, access_expires_at, refresh_token }
    }

    /// Returns the operator identity when the token is well-formed, signed by
    /// us, and not yet expired.
    pub fn verify_access(&self, token: &str, now: DateTime<Utc>) -> Option<String> {
        let (payload, signature) = token.rsplit_once(':')?;
        let (operator, expiry_raw) = payload.rsplit_once(':')?;
        let expiry_ts = expiry_raw.parse::<i64>().ok()?;
        let expires_at = DateTime::<Utc>::from_timestamp(expiry_ts, 0)?;

        if now >= expires_at {
            return None;
        }
        if self.sign_access(operator, expires_at) != format!("{payload}:{signature}") {
            return None;
        }

        Some(operator.to_string())
    }

    /// Rotate: the presented refresh token is consumed and a fresh pair is
    /// issued. A token that was already rotated out (or revoked) fails.
    pub fn refresh(&self, refresh_token: &str, now: DateTime<Utc>) -> Option<IssuedTokens> {
        let operator = {
            let mut sessions = self.lock_sessions();
            sessions.remove(&hash_token(refresh_token))?.operator
        };
        Some(self.issue(&operator, now))
    }

    pub fn revoke(&self, refresh_token: &str) -> bool {
        self.lock_sessions().remove(&hash_token(refresh_token)).is_some()
    }

    /// Drop refresh sessions older than the given horizon; called
    /// opportunistically by the server so abandoned logins don't accumulate.
    pub fn prune_sessions(&self, now: DateTime<Utc>, max_age: Duration) {
        self.lock_sessions().retain(|_, session| now - session.issued_at <= max_age);
    }

    fn sign_access(&self, operator: &str, expires_at: DateTime<Utc>) -> String {
        let payload = format!("{operator}:{}", expires_at.timestamp());
        let signature = hmac_hex(&self.signing_key, payload.as_bytes());
        format!("{payload}:{signature}")
    }

    fn lock_sessions(&self) -> std::sync::MutexGuard<'_, HashMap<String, RefreshSession>> {
        match self.sessions.lock() {
            Ok(sessions) => sessions,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    to_hex(&bytes)
}

fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    to_hex(&hasher.finalize())
}

fn hmac_hex(key: &[u8], message: &[u8]) -> String {
    let mut mac = match HmacSha256::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(message);
    to_hex(&mac.finalize().into_bytes())
}

fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use secrecy::SecretString;

    use super::TokenService;

    fn service() -> TokenService {
        TokenService::new(&SecretString::from("test-signing-secret-0123456789".to_string()), 900)
    }

    #[test]
    fn issued_access_token_verifies_until_expiry() {
        let service = service();
        let now = Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).single().expect("timestamp");
        let tokens = service.issue("operator@rentora.ch", now);

        assert_eq!(
            service.verify_access(&tokens.access_token, now).as_deref(),
            Some("operator@rentora.ch")
        );
        assert!(
            service.verify_access(&tokens.access_token, now + Duration::seconds(901)).is_none(),
            "expired token fails"
        );
    }

    #[test]
    fn tampered_tokens_fail_verification() {
        let service = service();
        let now = Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).single().expect("timestamp");
        let tokens = service.issue("operator@rentora.ch", now);

        let forged = tokens.access_token.replace("operator", "intruder");
        assert!(service.verify_access(&forged, now).is_none());
        assert!(service.verify_access("not-a-token", now).is_none());

        let other_key = TokenService::new(
            &SecretString::from("another-secret-key-9876543210".to_string()),
            900,
        );
        assert!(other_key.verify_access(&tokens.access_token, now).is_none());
    }

    #[test]
    fn refresh_rotates_and_old_token_is_dead() {
        let service = service();
        let now = Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).single().expect("timestamp");
        let first = service.issue("operator@rentora.ch", now);

        let second = service
            .refresh(&first.refresh_token, now + Duration::minutes(10))
            .expect("live refresh token rotates");
        assert_ne!(second.refresh_token, first.refresh_token);

        assert!(
            service.refresh(&first.refresh_token, now + Duration::minutes(11)).is_none(),
            "rotated-out token cannot be replayed"
        );
        assert!(service.refresh(&second.refresh_token, now + Duration::minutes(12)).is_some());
    }

    #[test]
    fn revoke_ends_the_session() {
        let service = service();
        let now = Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).single().expect("timestamp");
        let tokens = service.issue("operator@rentora.ch", now);

        assert!(service.revoke(&tokens.refresh_token));
        assert!(!service.revoke(&tokens.refresh_token), "second revoke finds nothing");
        assert!(service.refresh(&tokens.refresh_token, now).is_none());
    }

    #[test]
    fn prune_drops_only_aged_sessions() {
        let service = service();
        let now = Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).single().expect("timestamp");
        let old = service.issue("operator@rentora.ch", now - Duration::days(30));
        let fresh = service.issue("operator@rentora.ch", now);

        service.prune_sessions(now, Duration::days(7));
        assert!(service.refresh(&old.refresh_token, now).is_none());
        assert!(service.refresh(&fresh.refresh_token, now).is_some());
    }
}
