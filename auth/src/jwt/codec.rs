use std::str::FromStr;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;
use super::errors::TokenRejection;
use crate::keys::SigningKey;

/// Signing algorithm and lifetime for issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSettings {
    pub algorithm: Algorithm,
    pub ttl: Duration,
}

impl TokenSettings {
    pub const DEFAULT_TTL_MINUTES: i64 = 30;

    /// Build settings from configuration values.
    ///
    /// Only HMAC algorithms are accepted since the key is a shared secret.
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Unknown or asymmetric algorithm name
    /// * `InvalidTtl` - Lifetime is not a positive number of minutes
    pub fn new(algorithm: &str, ttl_minutes: i64) -> Result<Self, JwtError> {
        let algorithm = Algorithm::from_str(algorithm.trim())
            .map_err(|_| JwtError::UnsupportedAlgorithm(algorithm.to_string()))?;

        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(JwtError::UnsupportedAlgorithm(format!("{:?}", algorithm)));
        }

        if ttl_minutes <= 0 {
            return Err(JwtError::InvalidTtl(ttl_minutes));
        }

        Ok(Self {
            algorithm,
            ttl: Duration::minutes(ttl_minutes),
        })
    }
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::HS256,
            ttl: Duration::minutes(Self::DEFAULT_TTL_MINUTES),
        }
    }
}

/// A freshly signed token and the instant it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Stateless codec for signed, self-expiring bearer tokens.
///
/// Tokens are signed, not encrypted: anyone holding one can read its claims.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    settings: TokenSettings,
}

impl TokenCodec {
    pub fn new(key: &SigningKey, settings: TokenSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(key.as_bytes()),
            decoding_key: DecodingKey::from_secret(key.as_bytes()),
            settings,
        }
    }

    /// Encode claims into a signed token valid for the configured lifetime.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        self.sign(claims, self.settings.ttl).map(|signed| signed.token)
    }

    /// Encode claims with an explicit lifetime.
    pub fn encode_with_ttl(&self, claims: &Claims, ttl: Duration) -> Result<String, JwtError> {
        self.sign(claims, ttl).map(|signed| signed.token)
    }

    /// Encode claims and report the resulting expiry.
    pub fn issue(&self, claims: &Claims) -> Result<SignedToken, JwtError> {
        self.sign(claims, self.settings.ttl)
    }

    fn sign(&self, claims: &Claims, ttl: Duration) -> Result<SignedToken, JwtError> {
        let now = Utc::now();
        let expires_at = now + ttl;

        // `exp` always comes from the codec; every other claim is the caller's
        let mut claims = claims.clone();
        claims.exp = Some(expires_at.timestamp());
        claims.iat.get_or_insert(now.timestamp());

        let header = Header::new(self.settings.algorithm);
        let token = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))?;

        Ok(SignedToken { token, expires_at })
    }

    /// Decode and validate a token.
    ///
    /// # Returns
    /// The embedded claims, including `exp`
    ///
    /// # Errors
    /// * `Rejected` - Bad signature, expired, wrong algorithm or malformed
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.settings.algorithm);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| JwtError::Rejected(rejection_for(e.kind())))?;

        Ok(token_data.claims)
    }
}

fn rejection_for(kind: &ErrorKind) -> TokenRejection {
    match kind {
        ErrorKind::ExpiredSignature => TokenRejection::Expired,
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
            TokenRejection::InvalidSignature
        }
        _ => TokenRejection::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(&SigningKey::from_secret(secret), TokenSettings::default())
    }

    #[test]
    fn test_encode_and_decode() {
        let codec = codec("my_secret_key_at_least_32_bytes_long!");

        let claims = Claims::for_principal("ana", "admin");
        let token = codec.encode(&claims).expect("Failed to encode token");
        assert_eq!(token.split('.').count(), 3);

        let decoded = codec.decode(&token).expect("Failed to decode token");
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.extra, claims.extra);
        assert!(decoded.exp.is_some());
    }

    #[test]
    fn test_decode_returns_caller_claims_plus_exp() {
        let codec = codec("my_secret_key_at_least_32_bytes_long!");

        let claims = Claims {
            iat: Some(5),
            nbf: Some(5),
            aud: Some("accounts".to_string()),
            jti: Some("token-1".to_string()),
            ..Claims::for_principal("ana", "user").with_issuer("account-service".to_string())
        };

        let token = codec.encode(&claims).unwrap();
        let decoded = codec.decode(&token).unwrap();

        assert!(decoded.exp.is_some());
        assert_eq!(Claims { exp: None, ..decoded }, claims);
    }

    #[test]
    fn test_exp_is_now_plus_ttl() {
        let codec = codec("my_secret_key_at_least_32_bytes_long!");

        let signed = codec.issue(&Claims::new().with_subject("ana")).unwrap();
        let decoded = codec.decode(&signed.token).unwrap();

        assert_eq!(decoded.exp, Some(signed.expires_at.timestamp()));
        assert_eq!(
            decoded.exp.unwrap() - decoded.iat.unwrap(),
            TokenSettings::DEFAULT_TTL_MINUTES * 60
        );
    }

    #[test]
    fn test_caller_exp_is_overwritten() {
        let codec = codec("my_secret_key_at_least_32_bytes_long!");

        let claims = Claims::new().with_subject("ana").with_expiration(1);
        let token = codec.encode(&claims).unwrap();

        let decoded = codec.decode(&token).expect("caller exp must not leak through");
        assert!(decoded.exp.unwrap() > Utc::now().timestamp());
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = codec("my_secret_key_at_least_32_bytes_long!");

        let token = codec
            .encode_with_ttl(&Claims::new().with_subject("ana"), Duration::minutes(-1))
            .unwrap();

        let err = codec.decode(&token).unwrap_err();
        assert_eq!(err.rejection(), Some(TokenRejection::Expired));
        assert_eq!(err.to_string(), "Invalid or expired token");
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let codec1 = codec("secret1_at_least_32_bytes_long_key!");
        let codec2 = codec("secret2_at_least_32_bytes_long_key!");

        let token = codec1.encode(&Claims::new().with_subject("ana")).unwrap();

        let err = codec2.decode(&token).unwrap_err();
        assert_eq!(err.rejection(), Some(TokenRejection::InvalidSignature));
        assert_eq!(err.to_string(), "Invalid or expired token");
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let codec = codec("my_secret_key_at_least_32_bytes_long!");
        let token = codec.encode(&Claims::new().with_subject("ana")).unwrap();

        let forged = codec.encode(&Claims::new().with_subject("root")).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        parts[1] = forged_parts[1];

        assert!(codec.decode(&parts.join(".")).is_err());
    }

    #[test]
    fn test_algorithm_mismatch_rejected() {
        let key = SigningKey::from_secret("my_secret_key_at_least_32_bytes_long!");
        let hs512 = TokenCodec::new(&key, TokenSettings::new("HS512", 30).unwrap());
        let hs256 = TokenCodec::new(&key, TokenSettings::default());

        let token = hs512.encode(&Claims::new().with_subject("ana")).unwrap();
        assert!(hs256.decode(&token).is_err());
        assert!(hs512.decode(&token).is_ok());
    }

    #[test]
    fn test_decode_invalid_token() {
        let codec = codec("my_secret_key_at_least_32_bytes_long!");

        let err = codec.decode("invalid.token.here").unwrap_err();
        assert_eq!(err.rejection(), Some(TokenRejection::Malformed));
    }

    #[test]
    fn test_settings_validation() {
        assert!(TokenSettings::new("HS384", 5).is_ok());
        assert!(matches!(
            TokenSettings::new("RS256", 5),
            Err(JwtError::UnsupportedAlgorithm(_))
        ));
        assert!(matches!(
            TokenSettings::new("nope", 5),
            Err(JwtError::UnsupportedAlgorithm(_))
        ));
        assert!(matches!(
            TokenSettings::new("HS256", 0),
            Err(JwtError::InvalidTtl(0))
        ));
    }
}
