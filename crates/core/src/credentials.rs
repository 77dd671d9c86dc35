//! Publishing credentials: four opaque secrets.
//!
//! Values are never printed by `Debug`. They reach a publisher only through
//! an explicit `Credentials` value, never through ambient lookups.

use serde::{Deserialize, Serialize};

use crate::error::CredentialError;

pub const API_KEY_VAR: &str = "TWITTER_API_KEY";
pub const API_SECRET_VAR: &str = "TWITTER_API_SECRET";
pub const ACCESS_TOKEN_VAR: &str = "TWITTER_ACCESS_TOKEN";
pub const ACCESS_TOKEN_SECRET_VAR: &str = "TWITTER_ACCESS_TOKEN_SECRET";

/// Variable names in their canonical order.
pub const CREDENTIAL_VARS: [&str; 4] = [
    API_KEY_VAR,
    API_SECRET_VAR,
    ACCESS_TOKEN_VAR,
    ACCESS_TOKEN_SECRET_VAR,
];

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .field("access_token", &"[REDACTED]")
            .field("access_token_secret", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_token_secret: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            access_token: access_token.into(),
            access_token_secret: access_token_secret.into(),
        }
    }

    /// `(variable name, value)` pairs in canonical order.
    pub fn env_pairs(&self) -> [(&'static str, &str); 4] {
        [
            (API_KEY_VAR, self.api_key.as_str()),
            (API_SECRET_VAR, self.api_secret.as_str()),
            (ACCESS_TOKEN_VAR, self.access_token.as_str()),
            (ACCESS_TOKEN_SECRET_VAR, self.access_token_secret.as_str()),
        ]
    }

    /// Names of the variables whose value is blank.
    pub fn missing(&self) -> Vec<&'static str> {
        self.env_pairs()
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Return `self` if complete, otherwise the list of missing names.
    pub fn require_complete(self) -> Result<Self, CredentialError> {
        let missing = self.missing();
        if missing.is_empty() {
            Ok(self)
        } else {
            Err(CredentialError::Missing(missing))
        }
    }

    /// Shell `export KEY="value"` lines.
    pub fn to_exports(&self) -> String {
        self.env_pairs()
            .iter()
            .map(|(name, value)| format!("export {name}=\"{value}\"\n"))
            .collect()
    }

    /// `.env` file contents, one `KEY="value"` per line.
    pub fn to_dotenv(&self) -> String {
        self.env_pairs()
            .iter()
            .map(|(name, value)| format!("{name}=\"{value}\"\n"))
            .collect()
    }

    /// Pretty JSON object keyed by variable name.
    pub fn to_json(&self) -> String {
        let map: serde_json::Map<String, serde_json::Value> = self
            .env_pairs()
            .iter()
            .map(|(name, value)| (name.to_string(), serde_json::Value::from(*value)))
            .collect();
        serde_json::to_string_pretty(&map).unwrap_or_default()
    }
}

/// Anything that can hand out a set of credentials.
pub trait CredentialSource {
    fn credentials(&self) -> Result<Credentials, CredentialError>;
}

impl CredentialSource for Credentials {
    fn credentials(&self) -> Result<Credentials, CredentialError> {
        self.clone().require_complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> Credentials {
        Credentials::new("key", "secret", "token", "token-secret")
    }

    #[test]
    fn debug_is_redacted() {
        let dbg = format!("{:?}", full());
        assert!(dbg.contains("[REDACTED]"));
        assert!(!dbg.contains("token-secret"));
    }

    #[test]
    fn missing_fields_are_reported_in_order() {
        let creds = Credentials::new("key", "", "token", "  ");
        assert!(!creds.is_complete());
        assert_eq!(
            creds.missing(),
            vec![API_SECRET_VAR, ACCESS_TOKEN_SECRET_VAR]
        );
        assert_eq!(
            creds.credentials(),
            Err(CredentialError::Missing(vec![API_SECRET_VAR, ACCESS_TOKEN_SECRET_VAR]))
        );
    }

    #[test]
    fn complete_credentials_pass_through() {
        assert!(full().is_complete());
        assert_eq!(full().credentials().unwrap(), full());
    }

    #[test]
    fn export_formats() {
        let creds = full();
        assert_eq!(
            creds.to_exports().lines().next().unwrap(),
            "export TWITTER_API_KEY=\"key\""
        );
        assert_eq!(creds.to_dotenv().lines().count(), 4);
        assert!(creds.to_dotenv().contains("TWITTER_ACCESS_TOKEN_SECRET=\"token-secret\""));

        let json: serde_json::Value = serde_json::from_str(&creds.to_json()).unwrap();
        assert_eq!(json["TWITTER_ACCESS_TOKEN"], "token");
    }
}
