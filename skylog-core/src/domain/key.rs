//! API key domain type

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Exact number of characters in a valid API key
pub const API_KEY_LEN: usize = 22;

/// Errors raised while validating an API key
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("The API key is empty")]
    Empty,

    #[error("The API key is malformed: expected {API_KEY_LEN} characters, got {0}")]
    WrongLength(usize),
}

/// Credential for the remote tracking service
///
/// Only constructed through [`ApiKey::parse`], so holding one means the
/// length check already passed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiKey(String);

impl ApiKey {
    /// Validate a raw key
    ///
    /// # Errors
    /// Returns [`KeyError`] if the key is empty or not exactly
    /// [`API_KEY_LEN`] characters long.
    pub fn parse(raw: impl Into<String>) -> Result<Self, KeyError> {
        let raw = raw.into();
        let len = raw.chars().count();

        if len == 0 {
            return Err(KeyError::Empty);
        }
        if len != API_KEY_LEN {
            return Err(KeyError::WrongLength(len));
        }

        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep the credential out of debug output and logs.
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tail: String = self.0.chars().skip(API_KEY_LEN - 4).collect();
        write!(f, "ApiKey(****{})", tail)
    }
}

impl TryFrom<String> for ApiKey {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ApiKey> for String {
    fn from(key: ApiKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_key() {
        let key = ApiKey::parse("abcdefghijklmnopqrstuv").unwrap();
        assert_eq!(key.as_str(), "abcdefghijklmnopqrstuv");
    }

    #[test]
    fn test_parse_empty_key() {
        assert_eq!(ApiKey::parse(""), Err(KeyError::Empty));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(ApiKey::parse("short"), Err(KeyError::WrongLength(5)));
        assert_eq!(
            ApiKey::parse("abcdefghijklmnopqrstuvw"),
            Err(KeyError::WrongLength(23))
        );
    }

    #[test]
    fn test_debug_hides_key() {
        let key = ApiKey::parse("abcdefghijklmnopqrstuv").unwrap();
        let debug = format!("{:?}", key);
        assert!(!debug.contains("abcdefgh"));
        assert!(debug.ends_with("stuv)"));
    }

    #[test]
    fn test_deserialize_rejects_malformed_key() {
        let result: Result<ApiKey, _> = serde_json::from_str("\"too-short\"");
        assert!(result.is_err());
    }
}
