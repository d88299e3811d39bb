use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Io(#[from] tokio::io::Error),

    #[error(transparent)]
    Diesel(#[from] diesel::result::Error),

    #[error(transparent)]
    DbPool(#[from] diesel_async::pooled_connection::deadpool::PoolError),

    #[error(transparent)]
    RedisError(#[from] redis::RedisError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Template(#[from] minijinja::Error),

    #[error(transparent)]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("{0}")]
    Auth(String),

    #[error("Unexpected Error: {0}")]
    Custom(String),
}

/// Error messages for the API and page responses
pub enum ErrorMessages {
    Unexpected,
    DB,
    SearchFailed,
    MissingTypeOrPayload,
    SubmitFailed,
    SignInRequired,
}

impl fmt::Display for ErrorMessages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ErrorMessages::Unexpected => "Something went wrong. Please try again.",
            ErrorMessages::DB => "We could not load this page right now. Please try again in a moment.",
            ErrorMessages::SearchFailed => "Search failed",
            ErrorMessages::MissingTypeOrPayload => "Missing type/payload",
            ErrorMessages::SubmitFailed => "Submit failed",
            ErrorMessages::SignInRequired => "Please sign in to continue.",
        };
        write!(f, "{message}")
    }
}
