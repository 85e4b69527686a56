use crate::db::models::User;
use crate::error::AuthError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User email
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
}

/// Issues and verifies HS256-signed bearer tokens. Validity is purely a
/// function of signature and expiry; no token is ever stored server-side, so
/// rotating the signing key invalidates every outstanding token at once.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Sign a token binding the user's email as subject, expiring after the
    /// configured TTL.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.email.clone(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };

        debug!("Issuing token for subject: {}", user.email);
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenMalformed)
    }

    /// True iff the signature verifies, the token is unexpired and the
    /// subject matches the claimed identity's email. Fails closed: anything
    /// unparseable is simply invalid.
    pub fn validate(&self, token: &str, user: &User) -> bool {
        match self.decode_claims(token) {
            Ok(claims) => claims.sub == user.email,
            Err(_) => false,
        }
    }

    /// Verified read of the subject claim. Used by the gate to learn which
    /// identity to load before the final validation step.
    pub fn extract_subject(&self, token: &str) -> Result<String, AuthError> {
        self.decode_claims(token).map(|claims| claims.sub)
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the wall clock at the validation instant,
        // with no clock-skew window.
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenMalformed,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user(email: &str) -> User {
        User::new(email.to_string(), "tester".to_string(), "hash".to_string())
    }

    fn service() -> TokenService {
        TokenService::new("test_secret", 3600)
    }

    #[test]
    fn test_issue_then_validate() {
        let tokens = service();
        let user = test_user("a@x.com");

        let token = tokens.issue(&user).unwrap();
        assert!(tokens.validate(&token, &user));
        assert_eq!(tokens.extract_subject(&token).unwrap(), "a@x.com");
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let tokens = service();
        let user = test_user("a@x.com");
        let token = tokens.issue(&user).unwrap();

        // Flip a character in the signature segment.
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        assert_eq!(parts.len(), 3);
        let sig = parts[2].clone();
        let flipped = if sig.starts_with('A') { "B" } else { "A" };
        parts[2] = format!("{}{}", flipped, &sig[1..]);
        let tampered = parts.join(".");

        assert!(!tokens.validate(&tampered, &user));
        assert!(matches!(
            tokens.extract_subject(&tampered),
            Err(AuthError::TokenMalformed)
        ));
    }

    #[test]
    fn test_cross_subject_rejection() {
        let tokens = service();
        let user_a = test_user("a@x.com");
        let user_b = test_user("b@x.com");

        let token_for_b = tokens.issue(&user_b).unwrap();
        assert!(tokens.validate(&token_for_b, &user_b));
        assert!(!tokens.validate(&token_for_b, &user_a));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Negative TTL places the expiry in the past at issuance.
        let tokens = TokenService::new("test_secret", -60);
        let user = test_user("a@x.com");
        let token = tokens.issue(&user).unwrap();

        assert!(!tokens.validate(&token, &user));
        assert!(matches!(
            tokens.extract_subject(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_token_near_expiry_boundary() {
        // Comfortably inside the TTL: valid.
        let tokens = TokenService::new("test_secret", 3600);
        let user = test_user("a@x.com");
        let token = tokens.issue(&user).unwrap();
        assert!(tokens.validate(&token, &user));

        // Just past the TTL: invalid, with zero leeway.
        let tokens = TokenService::new("test_secret", -1);
        let token = tokens.issue(&user).unwrap();
        assert!(!tokens.validate(&token, &user));
    }

    #[test]
    fn test_other_key_cannot_verify() {
        let issuing = TokenService::new("key_one", 3600);
        let verifying = TokenService::new("key_two", 3600);
        let user = test_user("a@x.com");

        let token = issuing.issue(&user).unwrap();
        assert!(issuing.validate(&token, &user));
        assert!(!verifying.validate(&token, &user));
    }

    #[test]
    fn test_garbage_is_malformed_not_a_panic() {
        let tokens = service();
        let user = test_user("a@x.com");

        for garbage in ["", "not-a-token", "a.b", "a.b.c.d", "🙂.🙂.🙂"] {
            assert!(!tokens.validate(garbage, &user));
            assert!(matches!(
                tokens.extract_subject(garbage),
                Err(AuthError::TokenMalformed)
            ));
        }
    }
}
