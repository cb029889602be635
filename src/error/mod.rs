//! Failure classification and user-message formatting
//!
//! This module turns an arbitrary failure value into a [`ClassifiedError`]: one
//! of a fixed set of categories, a retryability hint, a user-facing message and
//! the untouched technical text. None of these operations can fail.
//!
//! The free functions below use a shared classifier with the built-in messages.
//! Build an [`ErrorClassifier`] with a [`MessageCatalog`](crate::config::MessageCatalog)
//! to override the user-facing texts.

use std::sync::OnceLock;

pub mod classification;
pub mod classifier;
pub mod failure;
pub mod format;

// Re-export main types for convenient access
pub use classification::{ClassifiedError, ErrorCategory, UnknownCategory};
pub use classifier::{ErrorClassifier, ErrorPattern};
pub use failure::Failure;
pub use format::FormatContext;

fn default_classifier() -> &'static ErrorClassifier {
    static CLASSIFIER: OnceLock<ErrorClassifier> = OnceLock::new();
    CLASSIFIER.get_or_init(ErrorClassifier::new)
}

/// Classifies a failure into a fully populated record.
///
/// # Examples
///
/// ```
/// use relay_errors::error::{classify, ErrorCategory};
///
/// let error = classify("401 unauthorized");
/// assert_eq!(error.category(), ErrorCategory::Auth);
/// assert!(!error.is_retryable());
/// ```
pub fn classify(failure: impl Into<Failure>) -> ClassifiedError {
    default_classifier().classify(failure)
}

/// Classifies a failure and returns its user message with `context` applied.
///
/// # Examples
///
/// ```
/// use relay_errors::error::{format_message, FormatContext};
///
/// let message = format_message(
///     "write failed",
///     &FormatContext::new().with_operation("save file"),
/// );
/// assert_eq!(
///     message,
///     "Failed to save file. Failed to save data. Please check your device storage."
/// );
/// ```
pub fn format_message(failure: impl Into<Failure>, context: &FormatContext) -> String {
    default_classifier().format_message(failure, context)
}

/// Whether the operation that produced `failure` may reasonably be retried.
pub fn is_retryable(failure: impl Into<Failure>) -> bool {
    default_classifier().is_retryable(failure)
}

/// The text extracted from `failure`, unmodified.
pub fn technical_message(failure: impl Into<Failure>) -> String {
    default_classifier().technical_message(failure)
}
