use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("token is required")]
    MissingToken,
}

/// API access token. Never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Surrounding whitespace is dropped; an empty token is rejected.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AuthError> {
        let raw = raw.as_ref().trim();
        if raw.is_empty() {
            return Err(AuthError::MissingToken);
        }
        Ok(Self(raw.to_string()))
    }

    /// The raw value, for the `token` query parameter only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("AuthToken(***)")
    }
}
