use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use chrono::DateTime;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::TokenCodec;
use crate::jwt::TokenSettings;
use crate::keys::SigningKey;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and JWT generation.
///
/// Provides high-level authentication operations by coordinating
/// password hashing and token handling.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    codec: TokenCodec,
    dummy_hash: String,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
    /// Always `bearer`
    pub token_type: String,
    /// Instant the token stops being accepted
    pub expires_at: DateTime<Utc>,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    pub const TOKEN_TYPE: &'static str = "bearer";

    /// Create a new authenticator.
    ///
    /// Hashes one random secret up front so that logins for unknown users
    /// cost the same as logins with a wrong password.
    ///
    /// # Arguments
    /// * `key` - Secret key for token signing
    /// * `settings` - Token algorithm and lifetime
    /// * `password_hasher` - Configured password hasher
    ///
    /// # Errors
    /// * `PasswordError` - Reference hash could not be computed
    pub fn new(
        key: &SigningKey,
        settings: TokenSettings,
        password_hasher: PasswordHasher,
    ) -> Result<Self, AuthenticationError> {
        let mut filler = [0u8; 16];
        OsRng.fill_bytes(&mut filler);
        let dummy_hash = password_hasher.hash(&hex::encode(filler))?;

        Ok(Self {
            password_hasher,
            codec: TokenCodec::new(key, settings),
            dummy_hash,
        })
    }

    /// Authenticator with default token settings and hashing parameters.
    pub fn with_secret(secret: &[u8]) -> Result<Self, AuthenticationError> {
        Self::new(
            &SigningKey::from_secret(secret),
            TokenSettings::default(),
            PasswordHasher::new(),
        )
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a password against a stored hash.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and generate a token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `claims` - Claims to encode in the token (`exp` is set here)
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is unreadable
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        claims: &Claims,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_token(claims)?)
    }

    /// Burn one verification against the reference hash and fail.
    ///
    /// Used when the username does not exist.
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        let _ = self.password_hasher.verify(password, &self.dummy_hash);
        AuthenticationError::InvalidCredentials
    }

    /// Generate a token without password verification.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(&self, claims: &Claims) -> Result<AuthenticationResult, JwtError> {
        let signed = self.codec.issue(claims)?;

        Ok(AuthenticationResult {
            access_token: signed.token,
            token_type: Self::TOKEN_TYPE.to_string(),
            expires_at: signed.expires_at,
        })
    }

    /// Validate and decode a token.
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.codec.decode(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> Authenticator {
        Authenticator::with_secret(b"test_secret_key_at_least_32_bytes!")
            .expect("Failed to build authenticator")
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = authenticator();

        let password = "my_password";
        let hash = authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        let claims = Claims::for_principal("ana", "user");
        let result = authenticator
            .authenticate(password, &hash, &claims)
            .expect("Authentication failed");

        assert!(!result.access_token.is_empty());
        assert_eq!(result.token_type, "bearer");
        assert!(result.expires_at > Utc::now());

        let decoded = authenticator
            .validate_token(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(decoded.sub, Some("ana".to_string()));
        assert_eq!(decoded.role(), Some("user"));
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = authenticator();

        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        let claims = Claims::new().with_subject("ana");

        let result = authenticator.authenticate("wrong_password", &hash, &claims);
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_reject_unknown_is_invalid_credentials() {
        let authenticator = authenticator();

        assert!(matches!(
            authenticator.reject_unknown("anything"),
            AuthenticationError::InvalidCredentials
        ));
    }

    #[test]
    fn test_reference_hash_is_well_formed() {
        let authenticator = authenticator();

        assert!(authenticator.dummy_hash.starts_with("$argon2id$"));
        // A parseable hash means unknown users really pay for a verify
        assert!(!authenticator
            .password_hasher
            .verify("anything", &authenticator.dummy_hash)
            .unwrap());
    }

    #[test]
    fn test_issue_and_validate_token() {
        let authenticator = authenticator();

        let claims = Claims::new()
            .with_subject("ana")
            .with_issuer("test".to_string());

        let result = authenticator
            .issue_token(&claims)
            .expect("Failed to generate token");

        let decoded = authenticator
            .validate_token(&result.access_token)
            .expect("Failed to validate token");

        assert_eq!(decoded.sub, Some("ana".to_string()));
        assert_eq!(decoded.iss, Some("test".to_string()));
    }

    #[test]
    fn test_validate_invalid_token() {
        let authenticator = authenticator();

        let result = authenticator.validate_token("invalid.token.here");
        assert!(result.is_err());
    }
}
