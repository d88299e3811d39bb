use crate::db::DbClient;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

/// Health check reporting the database and session store connections
pub async fn health_check(State(db): State<DbClient>) -> (StatusCode, Json<Value>) {
    let database_status = match db.get_db_conn().await {
        Ok(_) => json!("connected"),
        Err(e) => json!({
            "status": "error",
            "message": e.to_string()
        }),
    };

    let redis_status = match db.get_async_redis_conn().await {
        Ok(_) => json!("connected"),
        Err(e) => json!({
            "status": "error",
            "message": e.to_string()
        }),
    };

    let healthy = database_status == "connected" && redis_status == "connected";
    let health_status = json!({
        "status": if healthy { "ok" } else { "degraded" },
        "database": database_status,
        "redis": redis_status,
        "timestamp": chrono::Utc::now()
    });

    let code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(health_status))
}
