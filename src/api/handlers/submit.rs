use crate::db::models::{NewSubmission, SubmitRequest, SubmitResponse};
use crate::db::DbClient;
use crate::errors::ErrorMessages;
use crate::logging::log_to_file;
use crate::services::session::MaybeUser;
use crate::services::submission::payload_is_honeypot;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use tracing::{error, info, warn};

/// Handler for queueing a submission
///
/// # Endpoint: POST /api/submit
///
/// # Arguments
/// * `type` - Submission type, e.g. `league` or `event`
/// * `payload` - Free-form JSON object describing the program
/// * `source` - Optional origin tag, `api` when absent
///
/// # Returns
/// * `(StatusCode, Json<SubmitResponse>)` - `ok: true`, or `ok: false` with the error
pub(crate) async fn submit(
    State(db): State<DbClient>,
    user: MaybeUser,
    body: Result<Json<SubmitRequest>, JsonRejection>,
) -> (StatusCode, Json<SubmitResponse>) {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected submit body: {}", rejection);
            SubmitRequest::default()
        }
    };

    let Some((kind, payload)) = request.parts() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(SubmitResponse::error(ErrorMessages::MissingTypeOrPayload.to_string())),
        );
    };

    log_to_file(
        "POST",
        "/api/submit",
        Some(&json!({ "type": kind, "payload": payload, "source": request.source })),
    );

    if payload_is_honeypot(payload) {
        info!("Dropping {} submission that filled the honeypot", kind);
        return (StatusCode::OK, Json(SubmitResponse::ok()));
    }

    let submission = NewSubmission::new(kind, payload.clone(), request.source.as_deref())
        .submitted_by(user.0.map(|signed_in| signed_in.session.user.id));

    match db.insert_submission(&submission).await {
        Ok(_) => {
            info!("Queued {} submission from {}", submission.kind, submission.source);
            (StatusCode::OK, Json(SubmitResponse::ok()))
        }
        Err(err) => {
            error!("Failed to insert submission: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SubmitResponse::error(err.to_string())),
            )
        }
    }
}
