use std::fmt;

use thiserror::Error;

/// Why a token was refused.
///
/// Kept for logging only: every variant renders as the same message so
/// callers cannot tell an expired token from a forged one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    Expired,
    InvalidSignature,
    Malformed,
}

impl fmt::Display for TokenRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            TokenRejection::Expired => "expired",
            TokenRejection::InvalidSignature => "invalid signature",
            TokenRejection::Malformed => "malformed",
        };
        f.write_str(reason)
    }
}

/// Error type for JWT operations.
#[derive(Debug, Clone, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Token lifetime must be a positive number of minutes, got {0}")]
    InvalidTtl(i64),

    #[error("Invalid or expired token")]
    Rejected(TokenRejection),
}

impl JwtError {
    /// Internal rejection reason, if this is a decoding failure.
    pub fn rejection(&self) -> Option<TokenRejection> {
        match self {
            JwtError::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }
}
