//! Authentication core
//!
//! - Password hashing (Argon2, configurable cost)
//! - Signed, self-expiring bearer tokens (HMAC JWT)
//! - Signing key resolution
//! - Authentication coordination
//!
//! Nothing here performs I/O or keeps per-request state; the only shared
//! value is the signing key, which is read-only after startup.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("other_password", &hash).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{Claims, SigningKey, TokenCodec, TokenSettings};
//!
//! let key = SigningKey::from_secret("secret_key_at_least_32_bytes_long!");
//! let codec = TokenCodec::new(&key, TokenSettings::new("HS256", 30).unwrap());
//! let token = codec.encode(&Claims::new().with_subject("ana")).unwrap();
//! let decoded = codec.decode(&token).unwrap();
//! assert_eq!(decoded.sub.as_deref(), Some("ana"));
//! assert!(decoded.exp.is_some());
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Claims};
//!
//! let auth = Authenticator::with_secret(b"secret_key_at_least_32_bytes_long!").unwrap();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let claims = Claims::for_principal("ana", "user");
//! let result = auth.authenticate("password123", &hash, &claims).unwrap();
//!
//! // Validate token
//! let decoded = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(decoded.sub.as_deref(), Some("ana"));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod keys;
pub mod password;

pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::TokenCodec;
pub use jwt::TokenRejection;
pub use jwt::TokenSettings;
pub use keys::SigningKey;
pub use password::HashingConfig;
pub use password::PasswordError;
pub use password::PasswordHasher;
