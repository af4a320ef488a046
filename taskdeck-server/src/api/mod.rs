use axum::{
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

mod auth;
mod boards;
mod lists;
mod tasks;

use crate::state::AppState;
use crate::store::StoreError;

/// Axum REST API routes.
///
///   POST   /auth/register             -> create account + session cookie
///   POST   /auth/login                -> open session
///   POST   /auth/logout               -> close session
///   GET    /auth/me                   -> current user (null if signed out)
///   GET    /boards                    -> list own boards
///   POST   /boards                    -> create board (seeds default lists)
///   GET    /boards/{board_id}         -> { board, lists, tasks } (reconciled)
///   PATCH  /boards/{board_id}         -> update title / listOrder
///   DELETE /boards/{board_id}         -> delete board (cascade)
///   POST   /boards/{board_id}/lists   -> create list (appends to listOrder)
///   PATCH  /lists/{list_id}           -> update title / taskOrder
///   DELETE /lists/{list_id}           -> delete list (cascade)
///   POST   /lists/{list_id}/tasks     -> create task (appends to taskOrder)
///   PATCH  /tasks/{task_id}           -> update fields / reassign list
///   DELETE /tasks/{task_id}           -> delete task (pulls from taskOrder)
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route(
            "/boards",
            get(boards::list_boards).post(boards::create_board),
        )
        .route(
            "/boards/{board_id}",
            get(boards::get_board)
                .patch(boards::update_board)
                .delete(boards::delete_board),
        )
        .route("/boards/{board_id}/lists", post(boards::create_list))
        .route(
            "/lists/{list_id}",
            axum::routing::patch(lists::update_list).delete(lists::delete_list),
        )
        .route("/lists/{list_id}/tasks", post(tasks::create_task))
        .route(
            "/tasks/{task_id}",
            axum::routing::patch(tasks::update_task).delete(tasks::delete_task),
        )
}

// ── Shared types and helpers used across sub-modules ────────────────────

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn log_api_issue(status: StatusCode, target: &'static str, message: impl AsRef<str>) {
    let message = message.as_ref();
    if status.is_server_error() {
        log::error!(target: target, "{}", message);
    } else {
        log::warn!(target: target, "{}", message);
    }
}

fn insert_header_safe(headers: &mut HeaderMap, name: &'static str, value: &str) {
    match value.parse() {
        Ok(parsed) => {
            headers.insert(name, parsed);
        }
        Err(e) => {
            log::warn!("Failed to set header {}={} ({})", name, value, e);
        }
    }
}

/// Resolve the request's session cookie to a user id, or 401.
fn require_user(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<String, (StatusCode, Json<ErrorResponse>)> {
    let token = crate::auth::session_token(headers).ok_or_else(not_authenticated)?;
    let auth = state.auth.lock().unwrap();
    auth.user_for_token(&token)
        .map(|user| user.id)
        .ok_or_else(not_authenticated)
}

fn not_authenticated() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: "Not authenticated".to_string(),
        }),
    )
}

fn store_error_response(
    target: &'static str,
    error: StoreError,
) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &error {
        StoreError::MissingTitle => StatusCode::BAD_REQUEST,
        StoreError::BoardNotFound(_)
        | StoreError::ListNotFound(_)
        | StoreError::TaskNotFound(_) => StatusCode::NOT_FOUND,
    };
    log_api_issue(status, target, error.to_string());
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}
