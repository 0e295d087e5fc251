use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;

/// Process-wide secret used to sign and verify tokens.
///
/// Resolved once at startup and shared read-only afterwards.
#[derive(Clone)]
pub struct SigningKey {
    secret: Vec<u8>,
    ephemeral: bool,
}

impl SigningKey {
    const GENERATED_LEN: usize = 32;

    /// Use the configured secret, or generate one that lives only as long as the process.
    ///
    /// With a generated key every outstanding token becomes invalid on restart.
    pub fn resolve(configured: Option<&str>) -> Self {
        match configured.map(str::trim).filter(|s| !s.is_empty()) {
            Some(secret) => Self::from_secret(secret),
            None => {
                tracing::warn!(
                    "No JWT secret configured; using a random in-memory key. \
                     Issued tokens will not survive a restart"
                );
                Self::generate()
            }
        }
    }

    pub fn from_secret(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            ephemeral: false,
        }
    }

    pub fn generate() -> Self {
        let mut secret = vec![0u8; Self::GENERATED_LEN];
        OsRng.fill_bytes(&mut secret);

        Self {
            secret,
            ephemeral: true,
        }
    }

    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.secret
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("secret", &"<redacted>")
            .field("ephemeral", &self.ephemeral)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_secret_is_used() {
        let key = SigningKey::resolve(Some("configured-secret"));
        assert_eq!(key.as_bytes(), b"configured-secret");
        assert!(!key.is_ephemeral());
    }

    #[test]
    fn test_missing_secret_generates_key() {
        let first = SigningKey::resolve(None);
        let second = SigningKey::resolve(Some("   "));

        assert!(first.is_ephemeral());
        assert!(second.is_ephemeral());
        assert_eq!(first.as_bytes().len(), 32);
        assert_ne!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let key = SigningKey::from_secret("super-secret");
        assert!(!format!("{:?}", key).contains("super-secret"));
    }
}
