use crate::db::DbClient;
use crate::services::session::SessionSettings;
use crate::services::{AuthClient, StorageClient};
use axum::extract::FromRef;

/// Everything a handler may need, cloned into each request
#[derive(Clone, FromRef)]
pub struct AppState {
    pub db: DbClient,
    pub auth: AuthClient,
    pub storage: StorageClient,
    pub sessions: SessionSettings,
}

impl AppState {
    pub fn new(
        db: DbClient,
        auth: AuthClient,
        storage: StorageClient,
        sessions: SessionSettings,
    ) -> Self {
        AppState {
            db,
            auth,
            storage,
            sessions,
        }
    }
}
