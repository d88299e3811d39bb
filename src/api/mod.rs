//! HTTP surface of the directory: HTML pages plus the small JSON API.

/// Route handlers, one module per page family
pub mod handlers;

/// JSON documentation served at `GET /api`
pub mod index;

/// Router and middleware
pub mod init;

/// Shared application state
pub mod state;

pub use init::initialize_router;
pub use state::AppState;
