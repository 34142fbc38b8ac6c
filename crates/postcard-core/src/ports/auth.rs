//! Admin authentication port.

/// Identity of a caller that passed the admin gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub username: String,
}

/// Gate in front of admin-only routes.
pub trait AdminAuthenticator: Send + Sync {
    /// Check the raw `Authorization` header value, if any.
    fn authenticate(&self, authorization: Option<&str>) -> Result<AdminIdentity, AuthError>;

    /// Realm named in the challenge sent back with a 401.
    fn realm(&self) -> &str;
}

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Unsupported authorization scheme")]
    InvalidScheme,

    #[error("Malformed credentials: {0}")]
    MalformedCredentials(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Admin credentials are not configured")]
    NotConfigured,
}

impl AuthError {
    /// Whether the caller should be challenged rather than shown a server error.
    pub fn is_unauthorized(&self) -> bool {
        !matches!(self, AuthError::NotConfigured)
    }
}
