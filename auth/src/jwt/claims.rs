use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

/// Generic JWT claims structure.
///
/// Supports standard RFC 7519 claims plus custom fields via `extra` map.
/// `exp` is always set by the codec when a token is issued; callers only
/// provide the subject and any pass-through data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Claims {
    /// Subject (username of the principal)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Not before (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Audience
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// JWT ID (unique token identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Additional custom fields (flattened into token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims for a logged-in principal: `sub` is the username, `role` rides along.
    pub fn for_principal(username: impl ToString, role: impl ToString) -> Self {
        Self::new()
            .with_subject(username)
            .with_extra("role", role.to_string())
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set issuer.
    pub fn with_issuer(mut self, iss: String) -> Self {
        self.iss = Some(iss);
        self
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Get role from extra fields.
    pub fn role(&self) -> Option<&str> {
        self.extra.get("role").and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claims() {
        let claims = Claims::new().with_subject("ana");
        assert_eq!(claims.sub, Some("ana".to_string()));
        assert!(claims.exp.is_none());
    }

    #[test]
    fn test_for_principal() {
        let claims = Claims::for_principal("ana", "admin");

        assert_eq!(claims.sub, Some("ana".to_string()));
        assert_eq!(claims.role(), Some("admin"));
        assert!(claims.exp.is_none());
    }

    #[test]
    fn test_extra_fields_are_flattened() {
        let claims = Claims::new()
            .with_subject("ana")
            .with_expiration(1234567890)
            .with_extra("tenant", "north");

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], "ana");
        assert_eq!(json["exp"], 1234567890);
        assert_eq!(json["tenant"], "north");
        assert!(json.get("iss").is_none());

        let back: Claims = serde_json::from_value(json).unwrap();
        assert_eq!(back, claims);
    }
}
