use std::fmt;

#[derive(Debug)]
pub enum AppError {
    /// A semester string that is not of the form `yyyy-n`.
    Format(String),
    /// A semester range whose start lies after its end.
    Range(String),
    InvalidArgument(String),
    Storage(std::io::Error),
    Json(serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// True for errors caused by what the user typed into the filter form.
    pub fn is_user_input(&self) -> bool {
        matches!(self, AppError::Format(_) | AppError::Range(_))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Format(msg) => write!(f, "{msg}"),
            AppError::Range(msg) => write!(f, "{msg}"),
            AppError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            AppError::Storage(e) => write!(f, "Storage error: {e}"),
            AppError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Storage(e) => Some(e),
            AppError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Storage(e)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Json(e)
    }
}
