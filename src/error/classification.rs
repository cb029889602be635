//! Error classification types
//!
//! This module provides the closed set of categories a failure can be assigned to,
//! and the immutable record produced by classifying one failure.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The category of a failure, determining the user-facing message and retryability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// Connectivity problems between the client and the relay.
    Network,
    /// Missing, malformed or rejected credentials.
    Auth,
    /// Input the caller supplied was rejected.
    Validation,
    /// Key handling, encryption or decryption failures.
    Crypto,
    /// Local persistence failures.
    Storage,
    /// Anything no other category claimed.
    Unknown,
}

impl ErrorCategory {
    /// All categories, in the order they are matched.
    pub const ALL: [ErrorCategory; 6] = [
        ErrorCategory::Network,
        ErrorCategory::Auth,
        ErrorCategory::Crypto,
        ErrorCategory::Validation,
        ErrorCategory::Storage,
        ErrorCategory::Unknown,
    ];

    /// Upper-case category name, e.g. `NETWORK`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "NETWORK",
            ErrorCategory::Auth => "AUTH",
            ErrorCategory::Validation => "VALIDATION",
            ErrorCategory::Crypto => "CRYPTO",
            ErrorCategory::Storage => "STORAGE",
            ErrorCategory::Unknown => "UNKNOWN",
        }
    }

    /// Stable error code, the category name suffixed with `_ERROR`.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "NETWORK_ERROR",
            ErrorCategory::Auth => "AUTH_ERROR",
            ErrorCategory::Validation => "VALIDATION_ERROR",
            ErrorCategory::Crypto => "CRYPTO_ERROR",
            ErrorCategory::Storage => "STORAGE_ERROR",
            ErrorCategory::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Built-in message shown to end users for this category.
    pub fn default_user_message(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Can't reach the server. Check your internet connection.",
            ErrorCategory::Auth => "Invalid token format. Use: Bearer github|username|token",
            ErrorCategory::Validation => "Invalid input. Please check your entry and try again.",
            ErrorCategory::Crypto => {
                "Decryption failed. Your keys might be corrupted. Try logging out and in again."
            }
            ErrorCategory::Storage => "Failed to save data. Please check your device storage.",
            ErrorCategory::Unknown => "Something went wrong. Please try again.",
        }
    }

    /// Whether a caller may reasonably retry an operation that failed this way.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCategory::Network | ErrorCategory::Storage | ErrorCategory::Unknown
        )
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name any category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown error category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for ErrorCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// A classified failure: category, user-facing text, technical text and retry hint.
///
/// Records are produced by the classifier and never mutated afterwards, so the
/// fields are only reachable through accessors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedError {
    category: ErrorCategory,
    user_message: String,
    technical_message: String,
    is_retryable: bool,
    code: String,
}

impl ClassifiedError {
    /// Creates a record for `category` with the given texts.
    ///
    /// `code` and retryability are derived from the category. An empty
    /// `user_message` is replaced by the category's built-in message.
    pub(crate) fn new(
        category: ErrorCategory,
        user_message: impl Into<String>,
        technical_message: impl Into<String>,
    ) -> Self {
        let mut user_message = user_message.into();
        if user_message.trim().is_empty() {
            user_message = category.default_user_message().to_string();
        }
        Self {
            category,
            user_message,
            technical_message: technical_message.into(),
            is_retryable: category.is_retryable(),
            code: category.code().to_string(),
        }
    }

    /// The category the failure was assigned to.
    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    /// Message suitable for showing to end users.
    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    /// The extracted failure text, exactly as it was received.
    pub fn technical_message(&self) -> &str {
        &self.technical_message
    }

    /// Whether the caller may reasonably retry.
    pub fn is_retryable(&self) -> bool {
        self.is_retryable
    }

    /// Category code such as `NETWORK_ERROR`.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns true if this is a network failure.
    pub fn is_network(&self) -> bool {
        self.category == ErrorCategory::Network
    }

    /// Returns true if this is an authentication failure.
    pub fn is_auth(&self) -> bool {
        self.category == ErrorCategory::Auth
    }

    /// Returns true if this is a crypto failure.
    pub fn is_crypto(&self) -> bool {
        self.category == ErrorCategory::Crypto
    }

    /// Returns true if this is a validation failure.
    pub fn is_validation(&self) -> bool {
        self.category == ErrorCategory::Validation
    }

    /// Returns true if this is a storage failure.
    pub fn is_storage(&self) -> bool {
        self.category == ErrorCategory::Storage
    }

    /// Returns true if no category matched.
    pub fn is_unknown(&self) -> bool {
        self.category == ErrorCategory::Unknown
    }
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.technical_message)
    }
}

impl std::error::Error for ClassifiedError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_codes() {
        assert_eq!(ErrorCategory::Network.code(), "NETWORK_ERROR");
        assert_eq!(ErrorCategory::Auth.code(), "AUTH_ERROR");
        assert_eq!(ErrorCategory::Validation.code(), "VALIDATION_ERROR");
        assert_eq!(ErrorCategory::Crypto.code(), "CRYPTO_ERROR");
        assert_eq!(ErrorCategory::Storage.code(), "STORAGE_ERROR");
        assert_eq!(ErrorCategory::Unknown.code(), "UNKNOWN_ERROR");
    }

    #[test]
    fn test_code_is_name_with_suffix() {
        for category in ErrorCategory::ALL {
            assert_eq!(category.code(), format!("{}_ERROR", category.as_str()));
        }
    }

    #[test]
    fn test_category_retryability() {
        assert!(ErrorCategory::Network.is_retryable());
        assert!(ErrorCategory::Storage.is_retryable());
        assert!(ErrorCategory::Unknown.is_retryable());
        assert!(!ErrorCategory::Auth.is_retryable());
        assert!(!ErrorCategory::Crypto.is_retryable());
        assert!(!ErrorCategory::Validation.is_retryable());
    }

    #[test]
    fn test_default_user_messages_not_empty() {
        for category in ErrorCategory::ALL {
            assert!(!category.default_user_message().is_empty());
        }
    }

    #[test]
    fn test_category_match_order() {
        assert_eq!(ErrorCategory::ALL[2], ErrorCategory::Crypto);
        assert_eq!(ErrorCategory::ALL[3], ErrorCategory::Validation);
        assert_eq!(ErrorCategory::ALL[5], ErrorCategory::Unknown);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("NETWORK".parse::<ErrorCategory>(), Ok(ErrorCategory::Network));
        assert_eq!("storage".parse::<ErrorCategory>(), Ok(ErrorCategory::Storage));
        assert_eq!(
            "TIMEOUT".parse::<ErrorCategory>(),
            Err(UnknownCategory("TIMEOUT".to_string()))
        );
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::Crypto.to_string(), "CRYPTO");
    }

    #[test]
    fn test_category_serializes_as_name() {
        let json = serde_json::to_string(&ErrorCategory::Validation).unwrap();
        assert_eq!(json, "\"VALIDATION\"");
    }

    #[test]
    fn test_classified_error_new() {
        let error = ClassifiedError::new(
            ErrorCategory::Network,
            ErrorCategory::Network.default_user_message(),
            "Network request failed",
        );

        assert_eq!(error.category(), ErrorCategory::Network);
        assert_eq!(error.code(), "NETWORK_ERROR");
        assert_eq!(error.technical_message(), "Network request failed");
        assert!(error.is_retryable());
        assert!(error.is_network());
        assert!(!error.is_auth());
    }

    #[test]
    fn test_classified_error_predicates_match_category() {
        for category in ErrorCategory::ALL {
            let error = ClassifiedError::new(category, "", "x");
            assert_eq!(error.category(), category);
            assert_eq!(error.is_retryable(), category.is_retryable());
            assert_eq!(error.is_network(), category == ErrorCategory::Network);
            assert_eq!(error.is_auth(), category == ErrorCategory::Auth);
            assert_eq!(error.is_crypto(), category == ErrorCategory::Crypto);
            assert_eq!(error.is_validation(), category == ErrorCategory::Validation);
            assert_eq!(error.is_storage(), category == ErrorCategory::Storage);
            assert_eq!(error.is_unknown(), category == ErrorCategory::Unknown);
        }
    }

    #[test]
    fn test_classified_error_empty_user_message_falls_back() {
        let error = ClassifiedError::new(ErrorCategory::Auth, "   ", "401");
        assert_eq!(
            error.user_message(),
            ErrorCategory::Auth.default_user_message()
        );
    }

    #[test]
    fn test_classified_error_display_is_technical_message() {
        let error = ClassifiedError::new(ErrorCategory::Storage, "Disk full", "write failed");
        assert_eq!(format!("{}", error), "write failed");
    }

    #[test]
    fn test_classified_error_serializes_camel_case() {
        let error = ClassifiedError::new(
            ErrorCategory::Crypto,
            ErrorCategory::Crypto.default_user_message(),
            "invalid PEM key",
        );
        let value = serde_json::to_value(&error).unwrap();

        assert_eq!(value["category"], "CRYPTO");
        assert_eq!(value["code"], "CRYPTO_ERROR");
        assert_eq!(value["isRetryable"], false);
        assert_eq!(value["technicalMessage"], "invalid PEM key");
        assert!(value.get("userMessage").is_some());
    }

    #[test]
    fn test_classified_error_equality() {
        let error1 = ClassifiedError::new(ErrorCategory::Unknown, "a", "x");
        let error2 = ClassifiedError::new(ErrorCategory::Unknown, "a", "x");
        let error3 = ClassifiedError::new(ErrorCategory::Unknown, "a", "y");

        assert_eq!(error1, error2);
        assert_ne!(error1, error3);
    }
}
