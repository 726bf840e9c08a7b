//! Error classification shared by every fallible subsystem.
//!
//! Errors never reach the end user as raw text. They are logged with a
//! stable code so diagnostics can be grepped without parsing messages.

/// Trait for errors that carry a machine-readable code.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
