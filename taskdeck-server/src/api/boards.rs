use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde::Deserialize;

use taskdeck_core::types::{Board, BoardData, TaskList};

use super::{require_user, store_error_response, ErrorResponse};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateBoardBody {
    title: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBoardBody {
    title: Option<String>,
    list_order: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct CreateListBody {
    title: String,
}

pub async fn list_boards(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Board>>, (StatusCode, Json<ErrorResponse>)> {
    let user_id = require_user(&state, &headers)?;
    Ok(Json(state.store.list_boards(&user_id)))
}

pub async fn create_board(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateBoardBody>,
) -> Result<(StatusCode, Json<BoardData>), (StatusCode, Json<ErrorResponse>)> {
    let user_id = require_user(&state, &headers)?;
    let data = state
        .store
        .create_board(&user_id, &body.title)
        .map_err(|e| store_error_response("taskdeck.api.create_board", e))?;
    Ok((StatusCode::CREATED, Json(data)))
}

/// Full board fetch. Order arrays come back reconciled against the live
/// member sets.
pub async fn get_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<BoardData>, (StatusCode, Json<ErrorResponse>)> {
    let user_id = require_user(&state, &headers)?;
    let data = state
        .store
        .board_data(&user_id, &board_id)
        .map_err(|e| store_error_response("taskdeck.api.get_board", e))?;
    Ok(Json(data))
}

pub async fn update_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<UpdateBoardBody>,
) -> Result<Json<Board>, (StatusCode, Json<ErrorResponse>)> {
    let user_id = require_user(&state, &headers)?;
    let board = state
        .store
        .update_board(&user_id, &board_id, body.title, body.list_order)
        .map_err(|e| store_error_response("taskdeck.api.update_board", e))?;
    Ok(Json(board))
}

pub async fn delete_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let user_id = require_user(&state, &headers)?;
    state
        .store
        .delete_board(&user_id, &board_id)
        .map_err(|e| store_error_response("taskdeck.api.delete_board", e))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_list(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<CreateListBody>,
) -> Result<(StatusCode, Json<TaskList>), (StatusCode, Json<ErrorResponse>)> {
    let user_id = require_user(&state, &headers)?;
    let list = state
        .store
        .create_list(&user_id, &board_id, &body.title)
        .map_err(|e| store_error_response("taskdeck.api.create_list", e))?;
    Ok((StatusCode::CREATED, Json(list)))
}
