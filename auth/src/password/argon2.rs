use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Cost parameters for password hashing.
///
/// `algorithm` is one of `argon2id`, `argon2i` or `argon2d`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashingConfig {
    pub algorithm: String,
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            algorithm: "argon2id".to_string(),
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashingConfig {
    fn algorithm(&self) -> Result<Algorithm, PasswordError> {
        match self.algorithm.trim().to_ascii_lowercase().as_str() {
            "argon2id" | "argon2" => Ok(Algorithm::Argon2id),
            "argon2i" => Ok(Algorithm::Argon2i),
            "argon2d" => Ok(Algorithm::Argon2d),
            other => Err(PasswordError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// Password hashing implementation.
///
/// Salted, memory-hard one-way hashing (Argon2). Hashes are PHC strings that
/// carry their own algorithm, parameters and salt.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create a new password hasher with the Argon2id defaults.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Create a password hasher with explicit cost parameters.
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Algorithm identifier is not an Argon2 variant
    /// * `InvalidParameters` - Cost parameters are out of range
    pub fn from_config(config: &HashingConfig) -> Result<Self, PasswordError> {
        let algorithm = config.algorithm()?;
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| PasswordError::InvalidParameters(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(algorithm, Version::V0x13, params),
        })
    }

    /// Hash a plaintext password securely.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `EmptyPassword` - Password is empty
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        if password.is_empty() {
            return Err(PasswordError::EmptyPassword);
        }

        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`, never an error. Parameters are read from
    /// the stored hash, not from this hasher's configuration.
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored hash is not a valid PHC string
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_hasher() -> PasswordHasher {
        PasswordHasher::from_config(&HashingConfig {
            algorithm: "argon2id".to_string(),
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to build hasher")
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "my_secure_password";

        let hash = hasher.hash(password).expect("Failed to hash password");
        assert!(hash.starts_with("$argon2id$"));
        assert_ne!(hash, password);

        assert!(hasher
            .verify(password, &hash)
            .expect("Failed to verify password"));
        assert!(!hasher
            .verify("wrong_password", &hash)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_same_password_different_hashes() {
        let hasher = cheap_hasher();

        let first = hasher.hash("hunter2").unwrap();
        let second = hasher.hash("hunter2").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("hunter2", &first).unwrap());
        assert!(hasher.verify("hunter2", &second).unwrap());
    }

    #[test]
    fn test_empty_password_rejected() {
        let hasher = cheap_hasher();
        assert!(matches!(hasher.hash(""), Err(PasswordError::EmptyPassword)));
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = PasswordHasher::new();
        let result = hasher.verify("password", "invalid_hash");
        assert!(result.is_err());
    }

    #[test]
    fn test_verify_uses_parameters_from_hash() {
        let hash = cheap_hasher().hash("password").unwrap();

        // Default-cost hasher still verifies a hash made with other parameters
        assert!(PasswordHasher::new().verify("password", &hash).unwrap());
    }

    #[test]
    fn test_configured_variant() {
        let hasher = PasswordHasher::from_config(&HashingConfig {
            algorithm: "argon2i".to_string(),
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();

        let hash = hasher.hash("password").unwrap();
        assert!(hash.starts_with("$argon2i$"));
        assert!(hasher.verify("password", &hash).unwrap());
    }

    #[test]
    fn test_unsupported_algorithm() {
        let result = PasswordHasher::from_config(&HashingConfig {
            algorithm: "bcrypt".to_string(),
            ..HashingConfig::default()
        });
        assert!(matches!(
            result,
            Err(PasswordError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn test_invalid_parameters() {
        let result = PasswordHasher::from_config(&HashingConfig {
            memory_kib: 1,
            ..HashingConfig::default()
        });
        assert!(matches!(result, Err(PasswordError::InvalidParameters(_))));
    }
}
