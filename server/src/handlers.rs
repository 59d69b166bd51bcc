//! One handler per route: read input, validate, call the repository, shape
//! the response.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::error::ApiError;
use crate::model::{Todo, TodoInput};
use crate::repository::TodoRepository;

type Body = Result<Json<TodoInput>, JsonRejection>;

/// Ids are integers; anything else cannot name a row.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

/// A body sent without a JSON content type reads as `{}`.
fn read_body(body: Body) -> Result<TodoInput, ApiError> {
    match body {
        Ok(Json(input)) => Ok(input),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(TodoInput::default()),
        Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
    }
}

pub async fn list_todos(State(repo): State<TodoRepository>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(repo.list().await?))
}

pub async fn create_todo(
    State(repo): State<TodoRepository>,
    body: Body,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let todo = read_body(body)?.into_new_todo()?;
    let created = repo.create(todo).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_todo(
    State(repo): State<TodoRepository>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(repo.get(id).await?))
}

pub async fn replace_todo(
    State(repo): State<TodoRepository>,
    Path(id): Path<String>,
    body: Body,
) -> Result<Json<Todo>, ApiError> {
    let todo = read_body(body)?.into_new_todo()?;
    let id = parse_id(&id)?;
    Ok(Json(repo.replace(id, todo).await?))
}

pub async fn patch_todo(
    State(repo): State<TodoRepository>,
    Path(id): Path<String>,
    body: Body,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;
    let patch = read_body(body)?.into_patch();
    Ok(Json(repo.patch(id, patch).await?))
}

pub async fn delete_todo(
    State(repo): State<TodoRepository>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
