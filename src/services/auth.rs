//! Client for the hosted backend's auth REST API (`/auth/v1`).
//!
//! Every call sends the project's public key in the `apikey` header. Calls made
//! on behalf of a signed-in user also send their access token as a bearer token.

use crate::{errors::ApiError, Result};
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

/// A signed-in user as returned by the auth service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Value,
}

impl AuthUser {
    pub fn first_name(&self) -> Option<&str> {
        self.user_metadata
            .get("first_name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    /// Name used in greetings: first name, else the email's local part
    pub fn display_name(&self) -> String {
        if let Some(name) = self.first_name() {
            return name.to_string();
        }
        self.email
            .as_deref()
            .and_then(|e| e.split('@').next())
            .filter(|local| !local.is_empty())
            .unwrap_or("there")
            .to_string()
    }
}

/// Tokens of a signed-in user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds) after which the access token is rejected
    pub expires_at: i64,
    pub user: AuthUser,
}

impl AuthSession {
    /// True when the access token expires within `leeway_secs`
    pub fn is_expired(&self, leeway_secs: i64) -> bool {
        self.expires_at - leeway_secs <= Utc::now().timestamp()
    }
}

/// Result of a sign up request
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    /// The project auto-confirms accounts and returned a session
    SignedIn(AuthSession),
    /// The user must follow the confirmation email first
    ConfirmEmail,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

impl From<TokenResponse> for AuthSession {
    fn from(token: TokenResponse) -> Self {
        let expires_at = token
            .expires_at
            .unwrap_or_else(|| Utc::now().timestamp() + token.expires_in.unwrap_or(3600));
        AuthSession {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at,
            user: token.user,
        }
    }
}

/// Pulls a human readable message out of an auth error body
fn error_message(body: &Value) -> Option<String> {
    ["msg", "error_description", "message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

#[derive(Clone)]
pub struct AuthClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl AuthClient {
    pub fn new(backend_url: &str, api_key: &str) -> Self {
        AuthClient {
            http: Client::new(),
            base_url: format!("{}/auth/v1", backend_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
        }
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.http
            .post(format!("{}{}", self.base_url, path))
            .header("apikey", &self.api_key)
    }

    /// Turns non-2xx responses into `ApiError::Auth` carrying the service's message
    async fn check(response: Response, action: &str) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        let message = error_message(&body).unwrap_or_else(|| format!("{action} failed ({status})"));
        error!("Auth {} failed with {}: {}", action, status, message);
        Err(ApiError::Auth(message))
    }

    async fn session_from(response: Response, action: &str) -> Result<AuthSession> {
        let response = Self::check(response, action).await?;
        let token = response.json::<TokenResponse>().await?;
        Ok(token.into())
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<SignUpOutcome> {
        info!("Signing up {}", email);
        let response = self
            .post("/signup")
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "first_name": first_name, "last_name": last_name },
            }))
            .send()
            .await?;
        let body = Self::check(response, "sign up").await?.json::<Value>().await?;

        // Without auto-confirm the service answers with the bare user
        if body.get("access_token").is_some() {
            let token = serde_json::from_value::<TokenResponse>(body)?;
            Ok(SignUpOutcome::SignedIn(token.into()))
        } else {
            Ok(SignUpOutcome::ConfirmEmail)
        }
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
        info!("Signing in {}", email);
        let response = self
            .post("/token")
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        Self::session_from(response, "sign in").await
    }

    /// Emails a recovery link that lands on `redirect_to`
    pub async fn send_password_reset(&self, email: &str, redirect_to: &str) -> Result<()> {
        info!("Requesting password reset for {}", email);
        let response = self
            .post("/recover")
            .query(&[("redirect_to", redirect_to)])
            .json(&json!({ "email": email }))
            .send()
            .await?;
        Self::check(response, "password reset").await?;
        Ok(())
    }

    /// Exchanges the `token_hash` of a recovery link for a session
    pub async fn verify_recovery(&self, token_hash: &str) -> Result<AuthSession> {
        let response = self
            .post("/verify")
            .json(&json!({ "type": "recovery", "token_hash": token_hash }))
            .send()
            .await?;
        Self::session_from(response, "recovery").await
    }

    pub async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession> {
        let response = self
            .post("/token")
            .query(&[("grant_type", "refresh_token")])
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;
        Self::session_from(response, "refresh").await
    }

    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser> {
        let response = self
            .http
            .get(format!("{}/user", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        let response = Self::check(response, "get user").await?;
        Ok(response.json::<AuthUser>().await?)
    }

    pub async fn update_password(&self, access_token: &str, password: &str) -> Result<AuthUser> {
        let response = self
            .http
            .put(format!("{}/user", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .json(&json!({ "password": password }))
            .send()
            .await?;
        let response = Self::check(response, "update password").await?;
        Ok(response.json::<AuthUser>().await?)
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        let response = self
            .post("/logout")
            .bearer_auth(access_token)
            .send()
            .await?;
        Self::check(response, "sign out").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn token_body() -> Value {
        json!({
            "access_token": "access-1",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh-1",
            "user": {
                "id": "user-1",
                "email": "sam@example.com",
                "user_metadata": { "first_name": "Sam" }
            }
        })
    }

    #[tokio::test]
    async fn test_sign_in_with_password() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/auth/v1/token")
                    .query_param("grant_type", "password")
                    .header("apikey", "anon")
                    .json_body(json!({"email": "sam@example.com", "password": "hunter22"}));
                then.status(200).json_body(token_body());
            })
            .await;

        let client = AuthClient::new(&server.base_url(), "anon");
        let session = client
            .sign_in_with_password("sam@example.com", "hunter22")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(session.access_token, "access-1");
        assert_eq!(session.refresh_token, "refresh-1");
        assert_eq!(session.user.id, "user-1");
        assert_eq!(session.user.display_name(), "Sam");
        assert!(!session.is_expired(60));
    }

    #[tokio::test]
    async fn test_sign_in_error_message_is_surfaced() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/v1/token");
                then.status(400).json_body(json!({
                    "error": "invalid_grant",
                    "error_description": "Invalid login credentials"
                }));
            })
            .await;

        let client = AuthClient::new(&server.base_url(), "anon");
        let err = client
            .sign_in_with_password("sam@example.com", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Auth(ref msg) if msg == "Invalid login credentials"));
    }

    #[tokio::test]
    async fn test_sign_up_requires_confirmation() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/v1/signup");
                then.status(200).json_body(json!({
                    "id": "user-2",
                    "email": "new@example.com",
                    "user_metadata": { "first_name": "Ana", "last_name": "Diaz" }
                }));
            })
            .await;

        let client = AuthClient::new(&server.base_url(), "anon");
        let outcome = client
            .sign_up("new@example.com", "password1", "Ana", "Diaz")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(outcome, SignUpOutcome::ConfirmEmail);
    }

    #[tokio::test]
    async fn test_sign_up_auto_confirmed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/v1/signup");
                then.status(200).json_body(token_body());
            })
            .await;

        let client = AuthClient::new(&format!("{}/", server.base_url()), "anon");
        let outcome = client
            .sign_up("sam@example.com", "password1", "Sam", "Lee")
            .await
            .unwrap();
        assert!(matches!(outcome, SignUpOutcome::SignedIn(s) if s.user.id == "user-1"));
    }

    #[tokio::test]
    async fn test_verify_recovery_and_update_password() {
        let server = MockServer::start_async().await;
        let verify = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/auth/v1/verify")
                    .json_body(json!({"type": "recovery", "token_hash": "hash-1"}));
                then.status(200).json_body(token_body());
            })
            .await;
        let update = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/auth/v1/user")
                    .header("authorization", "Bearer access-1");
                then.status(200)
                    .json_body(json!({"id": "user-1", "email": "sam@example.com"}));
            })
            .await;

        let client = AuthClient::new(&server.base_url(), "anon");
        let session = client.verify_recovery("hash-1").await.unwrap();
        let user = client
            .update_password(&session.access_token, "new-password")
            .await
            .unwrap();

        verify.assert_async().await;
        update.assert_async().await;
        assert_eq!(user.id, "user-1");
        assert_eq!(user.display_name(), "sam");
    }

    #[tokio::test]
    async fn test_send_password_reset_passes_redirect() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/auth/v1/recover")
                    .query_param("redirect_to", "http://localhost:3000/reset-password");
                then.status(200).json_body(json!({}));
            })
            .await;

        let client = AuthClient::new(&server.base_url(), "anon");
        client
            .send_password_reset("sam@example.com", "http://localhost:3000/reset-password")
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[test]
    fn test_error_message_keys() {
        assert_eq!(
            error_message(&json!({"msg": "User already registered"})).as_deref(),
            Some("User already registered")
        );
        assert_eq!(
            error_message(&json!({"message": "Rate limited"})).as_deref(),
            Some("Rate limited")
        );
        assert!(error_message(&json!({"code": 500})).is_none());
    }
}
