//! Public forms feeding the moderation queue.

use super::{filter_options, layout, not_found, page};
use crate::db::models::{NewSubmission, ProgramKind, ADULT_AGE_GROUP};
use crate::db::DbClient;
use crate::errors::ErrorMessages;
use crate::logging::log_to_file;
use crate::services::session::{MaybeUser, RequireUser};
use crate::services::submission::{
    FreeAgentForm, ProgramForm, SubmitForm, Upload, FORM_SOURCE, SUBMIT_TYPES,
};
use crate::services::StorageClient;
use crate::views::Breadcrumbs;
use axum::extract::{Multipart, Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use minijinja::context;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};

const SUBMIT_THANKS: &str = "Thanks! We'll verify within 48 hours.";
const ADD_PROGRAM_SUCCESS: &str = "/add-program?success=1";

/// Queues a submission made through one of the site's forms
async fn queue(db: &DbClient, kind: &str, payload: Value, user: Option<String>) -> Result<(), String> {
    log_to_file("POST", &format!("/forms/{kind}"), Some(&payload));
    let submission = NewSubmission::new(kind, payload, Some(FORM_SOURCE)).submitted_by(user);
    db.insert_submission(&submission)
        .await
        .map(|_| info!("Queued {} submission from a form", kind))
        .map_err(|err| {
            error!("Failed to queue {} submission: {}", kind, err);
            ErrorMessages::SubmitFailed.to_string()
        })
}

fn user_id(user: &MaybeUser) -> Option<String> {
    user.0.as_ref().map(|signed_in| signed_in.user().id.clone())
}

fn submit_page_with(user: &MaybeUser, values: &SubmitForm, error: Option<String>, success: Option<&str>) -> Response {
    let crumbs = Breadcrumbs::new(&[("Submit a program", None)]);
    page(
        "submit.html",
        context! {
            types => SUBMIT_TYPES,
            values => values,
            error => error,
            success => success,
            ..layout(user, "Submit a Program", crumbs)
        },
    )
}

/// # Endpoint: GET /submit
pub(crate) async fn submit_page(user: MaybeUser) -> Response {
    submit_page_with(&user, &SubmitForm::default(), None, None)
}

/// Handler for the generic submission form
///
/// # Endpoint: POST /submit
///
/// Invalid input re-renders the form with the entered values. Success
/// re-renders an empty form with a thank-you note.
pub(crate) async fn submit_program(
    State(db): State<DbClient>,
    user: MaybeUser,
    Form(form): Form<SubmitForm>,
) -> Response {
    if form.is_honeypot() {
        info!("Dropping /submit post that filled the honeypot");
        return submit_page_with(&user, &SubmitForm::default(), None, Some(SUBMIT_THANKS));
    }

    let payload = match form.payload() {
        Ok(payload) => payload,
        Err(message) => return submit_page_with(&user, &form, Some(message), None),
    };

    match queue(&db, form.kind(), payload, user_id(&user)).await {
        Ok(()) => submit_page_with(&user, &SubmitForm::default(), None, Some(SUBMIT_THANKS)),
        Err(message) => submit_page_with(&user, &form, Some(message), None),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AddProgramQuery {
    pub success: Option<String>,
}

/// Handler for the add-program chooser
///
/// # Endpoint: GET /add-program
pub(crate) async fn add_program(user: MaybeUser, Query(query): Query<AddProgramQuery>) -> Response {
    let success = query.success.as_deref().map(str::trim) == Some("1");
    page(
        "add_program.html",
        context! {
            success => success,
            ..layout(&user, "Add a Program", Breadcrumbs::new(&[("Add a program", None)]))
        },
    )
}

fn program_page(
    user: &MaybeUser,
    kind: ProgramKind,
    adult: bool,
    values: &ProgramForm,
    error: Option<String>,
) -> Response {
    let action = if adult {
        format!("/add-program/adult/{}", kind.as_str())
    } else {
        format!("/add-program/{}", kind.as_str())
    };
    let title = format!(
        "Add {}{}",
        if adult { "an Adult " } else { "a " },
        kind.label()
    );
    let crumbs = Breadcrumbs::new(&[
        ("Add a program", Some("/add-program")),
        (kind.label(), None),
    ]);
    page(
        "program_form.html",
        context! {
            action => action,
            kind => kind,
            kind_label => kind.label(),
            is_event => kind.is_event(),
            adult => adult,
            values => values,
            error => error,
            options => filter_options(),
            ..layout(user, &title, crumbs)
        },
    )
}

fn program_form_for(user: MaybeUser, segment: &str, adult: bool) -> Response {
    match segment.parse::<ProgramKind>() {
        Ok(kind) => program_page(&user, kind, adult, &ProgramForm::default(), None),
        Err(_) => not_found(&user, "form"),
    }
}

/// # Endpoint: GET /add-program/:type
pub(crate) async fn program_form(user: MaybeUser, Path(segment): Path<String>) -> Response {
    program_form_for(user, &segment, false)
}

/// # Endpoint: GET /add-program/adult/:type
pub(crate) async fn adult_program_form(user: MaybeUser, Path(segment): Path<String>) -> Response {
    program_form_for(user, &segment, true)
}

async fn queue_program(db: DbClient, user: MaybeUser, segment: &str, adult: bool, mut form: ProgramForm) -> Response {
    let Ok(kind) = segment.parse::<ProgramKind>() else {
        return not_found(&user, "form");
    };
    if form.is_honeypot() {
        info!("Dropping {} form post that filled the honeypot", kind);
        return Redirect::to(ADD_PROGRAM_SUCCESS).into_response();
    }
    if adult && !form.age_groups.iter().any(|age| age == ADULT_AGE_GROUP) {
        form.age_groups.push(ADULT_AGE_GROUP.to_string());
    }

    let payload = match form.payload(kind) {
        Ok(payload) => payload,
        Err(message) => return program_page(&user, kind, adult, &form, Some(message)),
    };

    match queue(&db, kind.as_str(), payload, user_id(&user)).await {
        Ok(()) => Redirect::to(ADD_PROGRAM_SUCCESS).into_response(),
        Err(message) => program_page(&user, kind, adult, &form, Some(message)),
    }
}

/// Handler for the typed program forms
///
/// # Endpoint: POST /add-program/:type
pub(crate) async fn submit_program_form(
    State(db): State<DbClient>,
    user: MaybeUser,
    Path(segment): Path<String>,
    axum_extra::extract::Form(form): axum_extra::extract::Form<ProgramForm>,
) -> Response {
    queue_program(db, user, &segment, false, form).await
}

/// # Endpoint: POST /add-program/adult/:type
pub(crate) async fn submit_adult_program_form(
    State(db): State<DbClient>,
    user: MaybeUser,
    Path(segment): Path<String>,
    axum_extra::extract::Form(form): axum_extra::extract::Form<ProgramForm>,
) -> Response {
    queue_program(db, user, &segment, true, form).await
}

fn free_agent_page(signed_in: &RequireUser, values: Value, error: Option<String>) -> Response {
    let user = MaybeUser(Some(signed_in.0.clone()));
    let crumbs = Breadcrumbs::new(&[
        ("Add a program", Some("/add-program")),
        ("Free agent", None),
    ]);
    page(
        "free_agent_form.html",
        context! {
            values => values,
            error => error,
            email => signed_in.0.user().email.clone(),
            options => filter_options(),
            ..layout(&user, "Create a Free Agent Profile", crumbs)
        },
    )
}

/// Handler for the free agent form; signed-in users only
///
/// # Endpoint: GET /add-program/free-agent
pub(crate) async fn free_agent_form(user: RequireUser) -> Response {
    free_agent_page(&user, Value::Object(Default::default()), None)
}

/// Uploads every file, returning their public URLs in order
async fn upload_all(
    storage: &StorageClient,
    user_id: &str,
    kind: &str,
    uploads: Vec<Upload>,
) -> crate::Result<Vec<String>> {
    let mut urls = Vec::with_capacity(uploads.len());
    for (index, upload) in uploads.into_iter().enumerate() {
        let path = upload.storage_path(user_id, kind, index);
        urls.push(storage.upload(&path, upload.bytes, &upload.content_type).await?);
    }
    Ok(urls)
}

/// Handler for the multipart free agent form
///
/// # Endpoint: POST /add-program/free-agent
///
/// Photos and videos are stored first; the queued payload carries their public URLs.
pub(crate) async fn submit_free_agent(
    State(db): State<DbClient>,
    State(storage): State<StorageClient>,
    user: RequireUser,
    multipart: Multipart,
) -> Response {
    let mut form = match FreeAgentForm::from_multipart(multipart).await {
        Ok(form) => form,
        Err(err) => {
            error!("Failed to read free agent form: {}", err);
            return free_agent_page(
                &user,
                Value::Object(Default::default()),
                Some("We could not read your upload. Please try smaller files.".to_string()),
            );
        }
    };

    if form.is_honeypot() {
        info!("Dropping free agent post that filled the honeypot");
        return Redirect::to(ADD_PROGRAM_SUCCESS).into_response();
    }
    if let Err(message) = form.validate() {
        return free_agent_page(&user, form.values(), Some(message));
    }

    let owner = user.0.user().id.clone();
    let photos = std::mem::take(&mut form.photos);
    let videos = std::mem::take(&mut form.videos);
    let media = async {
        let photo_urls = upload_all(&storage, &owner, "photo", photos).await?;
        let video_urls = upload_all(&storage, &owner, "video", videos).await?;
        crate::Result::Ok((photo_urls, video_urls))
    };
    let (photo_urls, video_urls) = match media.await {
        Ok(urls) => urls,
        Err(err) => {
            error!("Free agent media upload failed: {}", err);
            return free_agent_page(
                &user,
                form.values(),
                Some("Uploading your media failed. Please try again.".to_string()),
            );
        }
    };

    let payload = form.payload(photo_urls, video_urls);
    match queue(&db, "free-agent", payload, Some(owner)).await {
        Ok(()) => Redirect::to(ADD_PROGRAM_SUCCESS).into_response(),
        Err(message) => free_agent_page(&user, form.values(), Some(message)),
    }
}
