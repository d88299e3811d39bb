use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportErrors {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("Failed to get a database connection: {0}")]
    Pool(#[from] diesel_async::pooled_connection::deadpool::PoolError),
    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] serde_json::Error),
    #[error("Unknown event kind {0:?}")]
    UnknownEventKind(String),
    #[error("Failed to read import file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Import file must contain a JSON array")]
    NotAnArray,
}
