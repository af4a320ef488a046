use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde::Deserialize;

use taskdeck_core::types::TaskList;

use super::{require_user, store_error_response, ErrorResponse};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListBody {
    title: Option<String>,
    /// Full replacement task order, as pushed by the client after a move
    /// or an orphan repair.
    task_order: Option<Vec<String>>,
}

pub async fn update_list(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<UpdateListBody>,
) -> Result<Json<TaskList>, (StatusCode, Json<ErrorResponse>)> {
    let user_id = require_user(&state, &headers)?;
    let list = state
        .store
        .update_list(&user_id, &list_id, body.title, body.task_order)
        .map_err(|e| store_error_response("taskdeck.api.update_list", e))?;
    Ok(Json(list))
}

pub async fn delete_list(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let user_id = require_user(&state, &headers)?;
    state
        .store
        .delete_list(&user_id, &list_id)
        .map_err(|e| store_error_response("taskdeck.api.delete_list", e))?;
    Ok(StatusCode::NO_CONTENT)
}
