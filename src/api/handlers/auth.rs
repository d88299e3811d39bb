//! Sign-in, sign-up, password reset and sign-out pages.

use super::{layout, page};
use crate::db::DbClient;
use crate::errors::ErrorMessages;
use crate::services::auth::SignUpOutcome;
use crate::services::session::{end_session, start_session, MaybeUser, SessionSettings, SignedIn};
use crate::services::AuthClient;
use crate::validation::{require_fields, validate_email, validate_new_password};
use crate::views::Breadcrumbs;
use crate::CONFIG;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::CookieJar;
use minijinja::context;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

const RESET_SENT: &str = "If an account exists for that email, a reset link is on its way.";
const CONFIRM_EMAIL: &str = "Check your email to confirm your account, then sign in.";
const INVALID_RESET_LINK: &str = "This reset link is invalid or has expired. Request a new one.";

/// Where to go after signing in; only local paths are honoured
fn safe_next(next: Option<&str>) -> String {
    match next.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path.to_string()
        }
        _ => "/dashboard".to_string(),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LoginQuery {
    pub next: Option<String>,
    pub mode: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub(crate) struct LoginForm {
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub next: String,
}

impl LoginForm {
    fn is_signup(&self) -> bool {
        self.mode.trim() == "signup"
    }
}

fn login_page_with(user: &MaybeUser, values: &LoginForm, error: Option<String>, message: Option<&str>) -> Response {
    let title = if values.is_signup() {
        "Create an Account"
    } else {
        "Sign In"
    };
    page(
        "login.html",
        context! {
            values => values,
            signup => values.is_signup(),
            error => error,
            message => message,
            ..layout(user, title, Breadcrumbs::new(&[(title, None)]))
        },
    )
}

/// # Endpoint: GET /login
pub(crate) async fn login_page(user: MaybeUser, Query(query): Query<LoginQuery>) -> Response {
    let values = LoginForm {
        mode: query.mode.unwrap_or_default(),
        next: query.next.unwrap_or_default(),
        ..LoginForm::default()
    };
    // Sent here by a signed-in-only page
    let notice = (!values.next.trim().is_empty() && !values.is_signup())
        .then(|| ErrorMessages::SignInRequired.to_string());
    login_page_with(&user, &values, None, notice.as_deref())
}

/// Handler for the sign-in and sign-up form
///
/// # Endpoint: POST /login
///
/// `mode=signup` creates an account; otherwise the credentials are checked.
/// On success the session cookie is set and the user goes to `next`.
pub(crate) async fn login(
    State(db): State<DbClient>,
    State(auth): State<AuthClient>,
    State(settings): State<SessionSettings>,
    user: MaybeUser,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let mut required = vec![
        ("Email", Some(form.email.as_str())),
        ("Password", Some(form.password.as_str())),
    ];
    if form.is_signup() {
        required.push(("First name", Some(form.first_name.as_str())));
        required.push(("Last name", Some(form.last_name.as_str())));
    }
    if let Err(message) = require_fields(&required).and_then(|_| validate_email(&form.email)) {
        return login_page_with(&user, &form, Some(message), None);
    }

    let email = form.email.trim();
    let session = if form.is_signup() {
        match auth
            .sign_up(email, &form.password, form.first_name.trim(), form.last_name.trim())
            .await
        {
            Ok(SignUpOutcome::SignedIn(session)) => session,
            Ok(SignUpOutcome::ConfirmEmail) => {
                let values = LoginForm {
                    mode: String::new(),
                    ..form.clone()
                };
                return login_page_with(&user, &values, None, Some(CONFIRM_EMAIL));
            }
            Err(err) => return login_page_with(&user, &form, Some(err.to_string()), None),
        }
    } else {
        match auth.sign_in_with_password(email, &form.password).await {
            Ok(session) => session,
            Err(err) => return login_page_with(&user, &form, Some(err.to_string()), None),
        }
    };

    match start_session(&db, settings, jar, &session).await {
        Ok(jar) => (jar, Redirect::to(&safe_next(Some(&form.next)))).into_response(),
        Err(err) => {
            error!("Failed to start session: {}", err);
            login_page_with(&user, &form, Some(err.to_string()), None)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ForgotForm {
    #[serde(default)]
    pub email: String,
}

/// Handler for password reset requests
///
/// # Endpoint: POST /login/forgot
///
/// Always answers with the same notice so the form does not reveal accounts.
pub(crate) async fn forgot_password(
    State(auth): State<AuthClient>,
    user: MaybeUser,
    Form(form): Form<ForgotForm>,
) -> Response {
    let values = LoginForm {
        email: form.email.trim().to_string(),
        ..LoginForm::default()
    };
    if let Err(message) = validate_email(&form.email) {
        return login_page_with(&user, &values, Some(message), None);
    }

    let redirect_to = format!("{}/reset-password", CONFIG.site_url.trim_end_matches('/'));
    if let Err(err) = auth.send_password_reset(form.email.trim(), &redirect_to).await {
        warn!("Password reset request failed: {}", err);
    }
    login_page_with(&user, &values, None, Some(RESET_SENT))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResetQuery {
    pub token_hash: Option<String>,
}

fn reset_page_with(user: &MaybeUser, can_reset: bool, error: Option<&str>, message: Option<&str>) -> Response {
    page(
        "reset_password.html",
        context! {
            can_reset => can_reset,
            error => error,
            message => message,
            ..layout(user, "Reset Password", Breadcrumbs::new(&[("Reset password", None)]))
        },
    )
}

/// Handler for the recovery link landing page
///
/// # Endpoint: GET /reset-password
///
/// A `token_hash` from the recovery email is exchanged for a session first.
pub(crate) async fn reset_password_page(
    State(db): State<DbClient>,
    State(auth): State<AuthClient>,
    State(settings): State<SessionSettings>,
    user: MaybeUser,
    jar: CookieJar,
    Query(query): Query<ResetQuery>,
) -> Response {
    let token_hash = query
        .token_hash
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let Some(token_hash) = token_hash else {
        let can_reset = user.0.is_some();
        let error = (!can_reset).then_some(INVALID_RESET_LINK);
        return reset_page_with(&user, can_reset, error, None);
    };

    let session = match auth.verify_recovery(token_hash).await {
        Ok(session) => session,
        Err(err) => {
            info!("Recovery link rejected: {}", err);
            return reset_page_with(&user, false, Some(INVALID_RESET_LINK), None);
        }
    };

    match start_session(&db, settings, jar, &session).await {
        Ok(jar) => {
            let user = MaybeUser(Some(SignedIn { session }));
            (jar, reset_page_with(&user, true, None, None)).into_response()
        }
        Err(err) => {
            error!("Failed to start recovery session: {}", err);
            reset_page_with(&user, false, Some(INVALID_RESET_LINK), None)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResetForm {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm: String,
}

/// Handler for setting a new password
///
/// # Endpoint: POST /reset-password
///
/// The password needs at least 8 characters and must match its confirmation.
pub(crate) async fn reset_password(
    State(auth): State<AuthClient>,
    user: MaybeUser,
    Form(form): Form<ResetForm>,
) -> Response {
    let Some(signed_in) = user.0.as_ref() else {
        return reset_page_with(&user, false, Some(INVALID_RESET_LINK), None);
    };
    if let Err(message) = validate_new_password(&form.password, &form.confirm) {
        return reset_page_with(&user, true, Some(message.as_str()), None);
    }

    match auth
        .update_password(&signed_in.session.access_token, &form.password)
        .await
    {
        Ok(_) => {
            info!("Password updated for user {}", signed_in.user().id);
            reset_page_with(&user, false, None, Some("Your password has been updated."))
        }
        Err(err) => reset_page_with(&user, true, Some(err.to_string().as_str()), None),
    }
}

/// Handler for signing out
///
/// # Endpoint: POST /logout
pub(crate) async fn logout(
    State(db): State<DbClient>,
    State(auth): State<AuthClient>,
    user: MaybeUser,
    jar: CookieJar,
) -> Response {
    if let Some(signed_in) = &user.0 {
        if let Err(err) = auth.sign_out(&signed_in.session.access_token).await {
            warn!("Sign out request failed: {}", err);
        }
    }
    let jar = end_session(&db, jar).await;
    (jar, Redirect::to("/")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next_only_allows_local_paths() {
        assert_eq!(safe_next(Some("/add-program/free-agent")), "/add-program/free-agent");
        assert_eq!(safe_next(Some("https://evil.example")), "/dashboard");
        assert_eq!(safe_next(Some("//evil.example")), "/dashboard");
        assert_eq!(safe_next(Some("")), "/dashboard");
        assert_eq!(safe_next(None), "/dashboard");
        assert_eq!(safe_next(Some("/\t/evil.example")), "/dashboard");
        assert_eq!(safe_next(Some("/a\nb")), "/dashboard");
        assert_eq!(safe_next(Some("/a\r\nSet-Cookie: x=1")), "/dashboard");
    }

    #[test]
    fn test_password_is_not_echoed() {
        let form = LoginForm {
            email: "sam@example.com".to_string(),
            password: "hunter22".to_string(),
            ..LoginForm::default()
        };
        let value = serde_json::to_value(&form).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["email"], "sam@example.com");
    }
}
