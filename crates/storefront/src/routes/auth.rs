//! Account registration, login, and logout.
//!
//! Login stores a [`CurrentUser`] in the session and cycles the session id.
//! The guest cart in the same session is left untouched.

use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{
    ApiJson, AppError, Result, add_breadcrumb, clear_sentry_user, set_sentry_user,
};
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::routes::MessageResponse;
use crate::services::{AuthError, AuthService, auth::Registration};
use crate::state::AppState;

/// Registration body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Login body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Put a freshly authenticated user into the session.
async fn start_session(session: &Session, user: &User) -> Result<()> {
    let current = CurrentUser {
        id: user.id,
        email: user.email.clone(),
    };
    set_current_user(session, &current).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(())
}

/// Create an account and log it in.
#[instrument(skip(state, session, body))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, ApiJson<User>)> {
    let user = AuthService::new(state.pool())
        .register(&Registration {
            email: &body.email,
            password: &body.password,
            first_name: body.first_name.as_deref(),
            last_name: body.last_name.as_deref(),
        })
        .await?;

    start_session(&session, &user).await?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, ApiJson(user)))
}

/// Log in with email and password.
#[instrument(skip(state, session, body))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<ApiJson<User>> {
    let user = AuthService::new(state.pool())
        .login(&body.email, &body.password)
        .await
        .inspect_err(|e| {
            if matches!(e, AuthError::InvalidCredentials) {
                tracing::warn!("Failed login attempt");
            }
        })?;

    start_session(&session, &user).await?;
    add_breadcrumb("auth", "Logged in", None);

    Ok(ApiJson(user))
}

/// Log out. Succeeds whether or not anyone was logged in.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<ApiJson<MessageResponse>> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(ApiJson(MessageResponse {
        message: "Logged out",
    }))
}

/// The logged-in user's account.
///
/// A session pointing at a deleted account is logged out and treated as
/// unauthenticated.
#[instrument(skip(state, session, current), fields(user_id = %current.id))]
pub async fn user(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
) -> Result<ApiJson<User>> {
    match AuthService::new(state.pool()).get_user(current.id).await {
        Ok(user) => Ok(ApiJson(user)),
        Err(AuthError::UserNotFound) => {
            clear_current_user(&session).await?;
            Err(AppError::Unauthorized(
                "Authentication required".to_string(),
            ))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::routes::test_support::{app, send};

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let app = app();
        let body = serde_json::json!({ "email": "ana@example.com", "password": "short" });
        let res = send(&app, "POST", "/api/auth/register", Some(body)).await;

        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body["message"], "Password must be at least 8 characters");
    }

    #[tokio::test]
    async fn test_register_rejects_bad_email() {
        let app = app();
        let body = serde_json::json!({ "email": "ana", "password": "long enough" });
        let res = send(&app, "POST", "/api/auth/register", Some(body)).await;

        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body["message"], "Invalid email address");
    }

    #[tokio::test]
    async fn test_logout_without_session() {
        let app = app();
        let res = send(&app, "POST", "/api/auth/logout", None).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body["message"], "Logged out");
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let app = app();
        let body = serde_json::json!({ "email": "ana@example.com" });
        let res = send(&app, "POST", "/api/auth/login", Some(body)).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
    }
}
