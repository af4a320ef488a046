use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde::Deserialize;

use super::{insert_header_safe, log_api_issue, ErrorResponse};
use crate::auth::{clear_session_cookie, session_cookie, session_token, AuthError, User};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterBody {
    name: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
pub struct LoginBody {
    email: String,
    password: String,
}

fn auth_error_response(
    target: &'static str,
    error: AuthError,
) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &error {
        AuthError::EmailInUse => StatusCode::CONFLICT,
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
    };
    log_api_issue(status, target, error.to_string());
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, HeaderMap, Json<User>), (StatusCode, Json<ErrorResponse>)> {
    if body.name.trim().is_empty() || body.email.trim().is_empty() || body.password.is_empty() {
        let status = StatusCode::BAD_REQUEST;
        log_api_issue(status, "taskdeck.api.register", "missing registration field");
        return Err((
            status,
            Json(ErrorResponse {
                error: "Name, email and password are required".to_string(),
            }),
        ));
    }

    let (user, token) = state
        .auth
        .lock()
        .unwrap()
        .register(&body.name, &body.email, &body.password)
        .map_err(|e| auth_error_response("taskdeck.api.register", e))?;

    let mut headers = HeaderMap::new();
    insert_header_safe(&mut headers, "set-cookie", &session_cookie(&token));
    Ok((StatusCode::CREATED, headers, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<(HeaderMap, Json<User>), (StatusCode, Json<ErrorResponse>)> {
    let (user, token) = state
        .auth
        .lock()
        .unwrap()
        .login(&body.email, &body.password)
        .map_err(|e| auth_error_response("taskdeck.api.login", e))?;

    let mut headers = HeaderMap::new();
    insert_header_safe(&mut headers, "set-cookie", &session_cookie(&token));
    Ok((headers, Json(user)))
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> (StatusCode, HeaderMap) {
    if let Some(token) = session_token(&headers) {
        state.auth.lock().unwrap().logout(&token);
    }
    let mut resp_headers = HeaderMap::new();
    insert_header_safe(&mut resp_headers, "set-cookie", &clear_session_cookie());
    (StatusCode::NO_CONTENT, resp_headers)
}

/// Current user, or null when the session is missing or stale — signed-out
/// is a normal state, not an error.
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Json<Option<User>> {
    let user = session_token(&headers)
        .and_then(|token| state.auth.lock().unwrap().user_for_token(&token));
    Json(user)
}
