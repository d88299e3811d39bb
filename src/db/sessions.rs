use super::DbClient;
use crate::services::auth::AuthSession;
use crate::{errors::ApiError, Result};
use redis::AsyncCommands;
use tracing::{error, info};

fn session_key(id: &str) -> String {
    format!("session:{id}")
}

/// Redis backed store of signed-in sessions, keyed by the cookie's session id
impl DbClient {
    pub async fn save_session(&self, id: &str, session: &AuthSession, ttl_secs: u64) -> Result<()> {
        let mut conn = self.get_async_redis_conn().await.map_err(|err| {
            error!("Redis connection error: {}", err);
            ApiError::from(err)
        })?;

        let value = serde_json::to_string(session)?;
        conn.set_ex::<_, _, ()>(session_key(id), value, ttl_secs)
            .await
            .map_err(|err| {
                error!("Redis SET failed: {}", err);
                ApiError::from(err)
            })?;
        info!("Session stored for user {}", session.user.id);
        Ok(())
    }

    pub async fn load_session(&self, id: &str) -> Result<Option<AuthSession>> {
        let mut conn = self.get_async_redis_conn().await.map_err(|err| {
            error!("Redis connection error: {}", err);
            ApiError::from(err)
        })?;

        let value: Option<String> = conn.get(session_key(id)).await.map_err(|err| {
            error!("Redis GET failed: {}", err);
            ApiError::from(err)
        })?;

        match value {
            Some(raw) => match serde_json::from_str::<AuthSession>(&raw) {
                Ok(session) => Ok(Some(session)),
                Err(err) => {
                    // Unreadable entries are treated as signed out
                    error!("Discarding malformed session {}: {}", id, err);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    pub async fn delete_session(&self, id: &str) -> Result<()> {
        let mut conn = self.get_async_redis_conn().await.map_err(|err| {
            error!("Redis connection error: {}", err);
            ApiError::from(err)
        })?;

        conn.del::<_, ()>(session_key(id)).await.map_err(|err| {
            error!("Redis DEL failed: {}", err);
            ApiError::from(err)
        })?;
        Ok(())
    }
}
