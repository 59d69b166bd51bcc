//! Parameterized SQL over the `todos` table.
//!
//! # Design
//! `TodoRepository` wraps an injected `SqlitePool` and issues one statement
//! per operation, except `patch`, which reads the row before writing the
//! merged result. `replace` and `delete` detect a missing row from the
//! affected-row count instead of a pre-read.

use sqlx::SqlitePool;

use crate::error::RepoError;
use crate::model::{NewTodo, Todo, TodoPatch};

const SELECT_ALL: &str = "SELECT id, title, description, completed FROM todos ORDER BY id";
const SELECT_ONE: &str = "SELECT id, title, description, completed FROM todos WHERE id = ?";

/// Data access for todos. Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct TodoRepository {
    pool: SqlitePool,
}

impl TodoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Build a repository over a fresh in-memory database.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        Ok(Self::new(crate::db::connect().await?))
    }

    pub async fn list(&self) -> Result<Vec<Todo>, RepoError> {
        let todos = sqlx::query_as::<_, Todo>(SELECT_ALL)
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }

    pub async fn create(&self, todo: NewTodo) -> Result<Todo, RepoError> {
        let created = sqlx::query_as::<_, Todo>(
            "INSERT INTO todos (title, description, completed) VALUES (?, ?, ?) \
             RETURNING id, title, description, completed",
        )
        .bind(todo.title)
        .bind(todo.description)
        .bind(todo.completed)
        .fetch_one(&self.pool)
        .await?;
        tracing::debug!(id = created.id, "created todo");
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> Result<Todo, RepoError> {
        sqlx::query_as::<_, Todo>(SELECT_ONE)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepoError::NotFound)
    }

    /// Overwrite every mutable field. Defaults were already applied to
    /// `todo`, so omitted fields reset rather than carry over.
    pub async fn replace(&self, id: i64, todo: NewTodo) -> Result<Todo, RepoError> {
        let result =
            sqlx::query("UPDATE todos SET title = ?, description = ?, completed = ? WHERE id = ?")
                .bind(todo.title)
                .bind(todo.description)
                .bind(todo.completed)
                .bind(id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        self.get(id).await
    }

    pub async fn patch(&self, id: i64, patch: TodoPatch) -> Result<Todo, RepoError> {
        let merged = patch.apply(self.get(id).await?)?;
        sqlx::query_as::<_, Todo>(
            "UPDATE todos SET title = ?, description = ?, completed = ? WHERE id = ? \
             RETURNING id, title, description, completed",
        )
        .bind(merged.title)
        .bind(merged.description)
        .bind(merged.completed)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepoError::NotFound)
    }

    pub async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        tracing::debug!(id, "deleted todo");
        Ok(())
    }
}
