use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use taskdeck_core::types::{Priority, Task};

use super::{require_user, store_error_response, ErrorResponse};
use crate::state::AppState;
use crate::store::{NewTask, TaskUpdate};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskBody {
    title: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    priority: Option<Priority>,
    #[serde(default)]
    labels: Vec<String>,
}

/// PATCH body. A field that is absent stays unchanged; `description` and
/// `dueDate` sent as explicit null are cleared.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskBody {
    title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    due_date: Option<Option<DateTime<Utc>>>,
    priority: Option<Priority>,
    labels: Option<Vec<String>>,
    list: Option<String>,
}

/// Distinguish an absent field (outer None, via `default`) from an explicit
/// null (Some(None)).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub async fn create_task(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<CreateTaskBody>,
) -> Result<(StatusCode, Json<Task>), (StatusCode, Json<ErrorResponse>)> {
    let user_id = require_user(&state, &headers)?;
    let task = state
        .store
        .create_task(
            &user_id,
            &list_id,
            NewTask {
                title: body.title,
                description: body.description,
                due_date: body.due_date,
                priority: body.priority,
                labels: body.labels,
            },
        )
        .map_err(|e| store_error_response("taskdeck.api.create_task", e))?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<UpdateTaskBody>,
) -> Result<Json<Task>, (StatusCode, Json<ErrorResponse>)> {
    let user_id = require_user(&state, &headers)?;
    let task = state
        .store
        .update_task(
            &user_id,
            &task_id,
            TaskUpdate {
                title: body.title,
                description: body.description,
                due_date: body.due_date,
                priority: body.priority,
                labels: body.labels,
                list: body.list,
            },
        )
        .map_err(|e| store_error_response("taskdeck.api.update_task", e))?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let user_id = require_user(&state, &headers)?;
    state
        .store
        .delete_task(&user_id, &task_id)
        .map_err(|e| store_error_response("taskdeck.api.delete_task", e))?;
    Ok(StatusCode::NO_CONTENT)
}
