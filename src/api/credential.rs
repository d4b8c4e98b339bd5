//! Access key wrapper for photo API authentication.

use super::error::ClientError;

/// API access key (the `client_id` query parameter) enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessKey(String);

impl AccessKey {
    /// Validates that the key is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::MissingCredential` when the supplied string is
    /// blank.
    pub fn new(key: impl AsRef<str>) -> Result<Self, ClientError> {
        let trimmed = key.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ClientError::MissingCredential);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the key value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for AccessKey {
    fn as_ref(&self) -> &str {
        self.value()
    }
}
