use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] minreq::Error),

    #[error("Poetry source error: {0}")]
    Poetry(String),

    #[error("Palette error: {0}")]
    Palette(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Operation cancelled")]
    Cancelled,
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "prefs missing");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("prefs missing"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let app_err: AppError = json_err.into();
        assert!(matches!(app_err, AppError::Json(_)));
    }

    #[test]
    fn test_error_display() {
        let err = AppError::Poetry("token endpoint returned 503".to_string());
        assert_eq!(err.to_string(), "Poetry source error: token endpoint returned 503");

        let err = AppError::Palette("bad colour".to_string());
        assert_eq!(err.to_string(), "Palette error: bad colour");

        let err = AppError::Settings("unknown key".to_string());
        assert_eq!(err.to_string(), "Settings error: unknown key");

        assert_eq!(AppError::Cancelled.to_string(), "Operation cancelled");
    }
}
