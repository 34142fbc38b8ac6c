//! HTTP basic authentication against a single configured admin account.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use postcard_core::ports::{AdminAuthenticator, AdminIdentity, AuthError};

const DEFAULT_REALM: &str = "Worth A Smile";

/// Basic auth configuration.
#[derive(Debug, Clone)]
pub struct BasicAuthConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub realm: String,
}

impl Default for BasicAuthConfig {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            realm: DEFAULT_REALM.to_string(),
        }
    }
}

impl BasicAuthConfig {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        Self {
            username: std::env::var("ADMIN_USERNAME").ok().filter(|v| !v.is_empty()),
            password: std::env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty()),
            realm: std::env::var("ADMIN_REALM").unwrap_or_else(|_| DEFAULT_REALM.to_string()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

/// Admin gate checking `Authorization: Basic <base64(user:pass)>`.
///
/// Comparison is exact and case-sensitive.
pub struct BasicAuthGate {
    config: BasicAuthConfig,
}

impl BasicAuthGate {
    pub fn new(config: BasicAuthConfig) -> Self {
        if !config.is_configured() {
            tracing::error!(
                "ADMIN_USERNAME and ADMIN_PASSWORD must be set as environment variables."
            );
        }
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(BasicAuthConfig::from_env())
    }
}

impl AdminAuthenticator for BasicAuthGate {
    fn authenticate(&self, authorization: Option<&str>) -> Result<AdminIdentity, AuthError> {
        let (Some(expected_user), Some(expected_pass)) =
            (&self.config.username, &self.config.password)
        else {
            tracing::error!("Admin route hit without configured credentials");
            return Err(AuthError::NotConfigured);
        };

        let header = authorization.ok_or(AuthError::MissingAuth)?;
        let encoded = header
            .strip_prefix("Basic ")
            .ok_or(AuthError::InvalidScheme)?;

        let decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|e| AuthError::MalformedCredentials(e.to_string()))?;
        let decoded = String::from_utf8(decoded)
            .map_err(|e| AuthError::MalformedCredentials(e.to_string()))?;

        let (username, password) = decoded
            .split_once(':')
            .ok_or_else(|| AuthError::MalformedCredentials("missing ':'".to_string()))?;

        if username != expected_user.as_str() || password != expected_pass.as_str() {
            tracing::warn!(username = %username, "Rejected admin credentials");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(AdminIdentity {
            username: username.to_string(),
        })
    }

    fn realm(&self) -> &str {
        &self.config.realm
    }
}
