use thiserror::Error;

/// Process-level error carried back to `main`, which prints it and exits with
/// `exit_code` (2 = bad input/usage, 4 = runtime/terminal failure).
///
/// Code 3 is not an error: `tdash fetch --strict` returns it when the fetch
/// fell back to the default dataset (see `app::STRICT_FALLBACK_EXIT`).
#[derive(Clone)]
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

    pub fn exit_code(&self) -> u8 {
        self.exit_code
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

/// Failure while obtaining or normalizing dashboard data.
///
/// None of these are fatal: the fetcher turns them into a message and serves
/// the default dataset instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid data structure received: {0}")]
    Schema(String),

    #[error("{0}")]
    Validation(String),
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        let code = match err {
            IngestError::Validation(_) => 2,
            _ => 4,
        };
        AppError::new(code, err.to_string())
    }
}
