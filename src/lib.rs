//! relay-errors - failure classification for the relay client
//!
//! Turns failures of any shape into a category, a retry hint and a message fit
//! for end users, keeping the original text for logs.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{
    classify, format_message, is_retryable, technical_message, ClassifiedError, ErrorCategory,
    Failure, FormatContext,
};
