//! CRUD HTTP service for todo items backed by an in-memory SQLite table.
//!
//! # Overview
//! `app` wires the six `/todos` routes plus the API docs onto an axum
//! `Router` whose state is a `TodoRepository`. The repository is built by
//! the caller and injected, so tests and the binary each get their own
//! volatile database.

pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod model;
pub mod repository;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::{ApiError, RepoError};
pub use model::{NewTodo, Todo, TodoInput, TodoPatch};
pub use repository::TodoRepository;

pub fn app(repo: TodoRepository) -> Router {
    Router::new()
        .route(
            "/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/todos/{id}",
            get(handlers::get_todo)
                .put(handlers::replace_todo)
                .patch(handlers::patch_todo)
                .delete(handlers::delete_todo),
        )
        .route(docs::OPENAPI_PATH, get(docs::openapi))
        .route(docs::DOCS_PATH, get(docs::swagger_ui))
        .layer(TraceLayer::new_for_http())
        .with_state(repo)
}

pub async fn run(listener: TcpListener, repo: TodoRepository) -> Result<(), std::io::Error> {
    axum::serve(listener, app(repo)).await
}
