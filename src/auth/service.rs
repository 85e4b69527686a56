use crate::auth::token::TokenService;
use crate::db::models::User;
use crate::db::operations::DbOperations;
use crate::error::{AppError, AuthError};
use tracing::{debug, info};

/// Registers identities and exchanges credentials for bearer tokens.
/// Stateless: successful logins leave no session record behind.
#[derive(Clone)]
pub struct AuthService {
    db: DbOperations,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(db: DbOperations, tokens: TokenService) -> Self {
        Self { db, tokens }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Create a new identity. The plaintext password is bcrypt-hashed on the
    /// blocking pool so the slow hash never stalls a request-handling worker.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<User, AppError> {
        if self.db.get_user_by_email(email).await?.is_some() {
            return Err(AuthError::DuplicateIdentity.into());
        }

        let password = password.to_owned();
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let user = User::new(email.to_owned(), username.to_owned(), hash);
        let stored = self.db.create_user(&user).await?;

        info!("Registered new identity: {}", stored.email);
        Ok(stored)
    }

    /// Verify credentials and issue a token. Unknown email and password
    /// mismatch are reported identically.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .db
            .get_user_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password = password.to_owned();
        let hash = user.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        if !verified {
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self.tokens.issue(&user)?;
        debug!("Issued token for {}", user.email);
        Ok(token)
    }

    /// Resolve a bearer token to its identity: peek the verified subject,
    /// load the identity from the store, then validate the token against it.
    /// The store is re-consulted on every request; there is no session cache.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let subject = self.tokens.extract_subject(token)?;

        let user = self
            .db
            .get_user_by_email(&subject)
            .await?
            .ok_or(AuthError::IdentityNotFound)?;

        if !self.tokens.validate(token, &user) {
            return Err(AuthError::TokenExpired.into());
        }

        debug!("Token resolved to identity: {}", user.email);
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    // Cost 4 keeps these fast; the service itself hashes at DEFAULT_COST.

    #[test]
    fn test_password_hashing_is_salted() {
        let first = bcrypt::hash("pw1", 4).unwrap();
        let second = bcrypt::hash("pw1", 4).unwrap();

        // Same plaintext, different registrations, different stored hashes.
        assert_ne!(first, second);

        // Yet both verify against their own plaintext.
        assert!(bcrypt::verify("pw1", &first).unwrap());
        assert!(bcrypt::verify("pw1", &second).unwrap());
    }

    #[test]
    fn test_password_verification_rejects_wrong_plaintext() {
        let hash = bcrypt::hash("pw1", 4).unwrap();
        assert!(!bcrypt::verify("wrong", &hash).unwrap());
    }

    #[test]
    fn test_hash_is_not_the_plaintext() {
        let hash = bcrypt::hash("pw1", 4).unwrap();
        assert!(!hash.contains("pw1"));
    }
}
