//! Crate-wide error type.
//!
//! Every fallible operation returns `AppError`, which carries the process exit
//! code `main` should use:
//!
//! - `2`: bad input (unreadable CSV, malformed dates, invalid flags)
//! - `4`: runtime failures (terminal, export IO, serialization)

/// Exit code for input and usage errors.
pub const EXIT_INPUT: u8 = 2;
/// Exit code for runtime failures.
pub const EXIT_RUNTIME: u8 = 4;

#[derive(Clone, PartialEq, Eq)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(EXIT_INPUT, message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(EXIT_RUNTIME, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<crate::io::ingest::IngestError> for AppError {
    fn from(err: crate::io::ingest::IngestError) -> Self {
        AppError::input(err.to_string())
    }
}
