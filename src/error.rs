use thiserror::Error;

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

/// Malformed payloads caught while reshaping API data into chart inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("year {year}: expected {expected} value rows (one per division), got {actual}")]
    MatrixRows {
        year: i32,
        expected: usize,
        actual: usize,
    },

    #[error("year {year}: division '{division}' has {actual} quarter values, expected {expected}")]
    MatrixShape {
        year: i32,
        division: String,
        expected: usize,
        actual: usize,
    },

    #[error("year {year} uses divisions {actual:?}, but year {base_year} uses {expected:?}")]
    DivisionMismatch {
        year: i32,
        base_year: i32,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("'{field}' has {actual} values but there are {expected} periods")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("color palette must contain at least one color")]
    EmptyPalette,
}

impl From<DataError> for AppError {
    fn from(err: DataError) -> Self {
        AppError::new(4, format!("Malformed dashboard data: {err}"))
    }
}
