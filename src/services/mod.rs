pub mod auth;
pub mod session;
pub mod slug;
pub mod storage;
pub mod submission;

pub use auth::AuthClient;
pub use storage::StorageClient;
