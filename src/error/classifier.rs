//! Ordered substring classifier
//!
//! This module maps the message extracted from a failure onto exactly one
//! [`ErrorCategory`]. Each category owns a list of literal, case-sensitive
//! needles; categories are tested in a fixed order and the first one with a
//! needle contained in the message wins. Messages that match nothing fall
//! through to [`ErrorCategory::Unknown`].

use tracing::trace;

use super::format::{compose_message, FormatContext};
use super::{ClassifiedError, ErrorCategory, Failure};
use crate::config::MessageCatalog;

/// Literal needles for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPattern {
    /// The category assigned when any needle matches.
    category: ErrorCategory,
    /// Literal substrings, tested in order.
    needles: &'static [&'static str],
    /// A human-readable description of what this pattern detects.
    description: &'static str,
}

impl ErrorPattern {
    /// Creates a new error pattern.
    pub const fn new(
        category: ErrorCategory,
        needles: &'static [&'static str],
        description: &'static str,
    ) -> Self {
        Self {
            category,
            needles,
            description,
        }
    }

    /// Returns the error category.
    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    /// Returns the needles in match order.
    pub fn needles(&self) -> &'static [&'static str] {
        self.needles
    }

    /// Returns the description.
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Checks if any needle occurs in the given text.
    pub fn matches(&self, text: &str) -> bool {
        self.find(text).is_some()
    }

    /// Returns the first needle, in declaration order, that occurs in the text.
    pub fn find(&self, text: &str) -> Option<&'static str> {
        self.needles
            .iter()
            .copied()
            .find(|needle| text.contains(needle))
    }
}

/// Built-in patterns in priority order. `Unknown` has no pattern.
const DEFAULT_PATTERNS: [ErrorPattern; 5] = [
    ErrorPattern::new(
        ErrorCategory::Network,
        &[
            "Network",
            "ECONNREFUSED",
            "timeout",
            "ENOTFOUND",
            "offline",
            "Cannot reach",
        ],
        "Relay unreachable or connection dropped",
    ),
    ErrorPattern::new(
        ErrorCategory::Auth,
        &["token", "401", "unauthorized", "Invalid token", "Bearer"],
        "Missing or malformed bearer token",
    ),
    ErrorPattern::new(
        ErrorCategory::Crypto,
        &[
            "decrypt",
            "encrypt",
            "key",
            "PEM",
            "private key",
            "public key",
        ],
        "Key loading or envelope encryption failure",
    ),
    ErrorPattern::new(
        ErrorCategory::Validation,
        &["validation", "required", "empty", "too large", "invalid"],
        "Rejected input",
    ),
    ErrorPattern::new(
        ErrorCategory::Storage,
        &["storage", "write", "read", "file"],
        "Local persistence failure",
    ),
];

/// Classifies failures into categories and builds user-facing messages.
#[derive(Debug, Clone)]
pub struct ErrorClassifier {
    /// The patterns to match against, in priority order.
    patterns: Vec<ErrorPattern>,
    /// User-message overrides.
    messages: MessageCatalog,
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorClassifier {
    /// Creates a classifier with the built-in patterns and messages.
    pub fn new() -> Self {
        Self::with_catalog(MessageCatalog::default())
    }

    /// Creates a classifier that takes user messages from `messages`.
    pub fn with_catalog(messages: MessageCatalog) -> Self {
        Self {
            patterns: DEFAULT_PATTERNS.to_vec(),
            messages,
        }
    }

    /// Returns the patterns in priority order.
    pub fn patterns(&self) -> &[ErrorPattern] {
        &self.patterns
    }

    /// Returns the message catalog in use.
    pub fn catalog(&self) -> &MessageCatalog {
        &self.messages
    }

    /// Returns the category of the first pattern matching `message`, with the
    /// needle that matched. `None` means the message falls through to `Unknown`.
    fn first_match(&self, message: &str) -> Option<(ErrorCategory, &'static str)> {
        self.patterns
            .iter()
            .find_map(|pattern| pattern.find(message).map(|needle| (pattern.category, needle)))
    }

    /// Returns the category an extracted message is assigned to.
    pub fn match_category(&self, message: &str) -> ErrorCategory {
        self.first_match(message)
            .map(|(category, _)| category)
            .unwrap_or(ErrorCategory::Unknown)
    }

    /// Classifies a failure. Never fails: unmatched input is `Unknown`.
    pub fn classify(&self, failure: impl Into<Failure>) -> ClassifiedError {
        let technical = failure.into().message();
        let (category, needle) = match self.first_match(&technical) {
            Some((category, needle)) => (category, Some(needle)),
            None => (ErrorCategory::Unknown, None),
        };
        trace!(category = %category, needle = ?needle, "classified failure");

        ClassifiedError::new(category, self.messages.user_message(category), technical)
    }

    /// Classifies a failure and renders the user message with `context` applied.
    pub fn format_message(&self, failure: impl Into<Failure>, context: &FormatContext) -> String {
        let classified = self.classify(failure);
        compose_message(classified.user_message(), context)
    }

    /// Whether the caller may retry the operation that produced `failure`.
    pub fn is_retryable(&self, failure: impl Into<Failure>) -> bool {
        self.classify(failure).is_retryable()
    }

    /// The untransformed text extracted from `failure`.
    pub fn technical_message(&self, failure: impl Into<Failure>) -> String {
        self.classify(failure).technical_message().to_string()
    }
}
