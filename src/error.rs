/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Missing required environment variable: {0}")]
    MissingSecret(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Notification error: {0}")]
    Notification(String),
}

impl AppError {
    /// Process exit status for a run that ends with this error
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::MissingSecret(_) | AppError::Config(_) => 2,
            AppError::HttpClient(_) | AppError::ExternalApi(_) | AppError::Notification(_) => 1,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
