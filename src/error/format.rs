//! User-facing message formatting.

/// Optional context applied on top of a classified user message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatContext {
    /// What the user was trying to do, e.g. `"send message"`.
    pub operation: Option<String>,
    /// How many retries have already happened. Zero means first attempt.
    pub retry_count: Option<u32>,
}

impl FormatContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the operation name.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Set the retry count.
    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = Some(retry_count);
        self
    }
}

/// Applies `context` to a user message.
///
/// A non-empty operation becomes a `"Failed to {operation}. "` prefix; a retry
/// count above zero appends `" (Attempt {n + 1})"`.
pub(crate) fn compose_message(user_message: &str, context: &FormatContext) -> String {
    let mut message = match context.operation.as_deref() {
        Some(operation) if !operation.is_empty() => {
            format!("Failed to {}. {}", operation, user_message)
        }
        _ => user_message.to_string(),
    };

    if let Some(retry_count) = context.retry_count.filter(|count| *count > 0) {
        message.push_str(&format!(" (Attempt {})", u64::from(retry_count) + 1));
    }

    message
}
