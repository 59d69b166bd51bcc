//! Todo entity and request payloads.
//!
//! # Design
//! Every request body is read into the same `TodoInput` schema, with all
//! fields optional. Handlers then turn it into either a `NewTodo` (create and
//! replace, where `title` is required and omitted fields reset to defaults)
//! or a `TodoPatch` (where omitted fields keep their stored values).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{ApiError, RepoError};

/// A stored todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
}

/// Request body for `POST`, `PUT` and `PATCH` on todos.
#[derive(Debug, Default, Deserialize)]
pub struct TodoInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Any JSON value is accepted and coerced by truthiness. A present
    /// `null` yields `Some(false)`, an absent field yields `None`.
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub completed: Option<bool>,
}

/// Fully specified todo fields, as written by create and replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

/// Fields to overwrite on patch. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl TodoInput {
    /// Validate for create/replace: `title` must be present and non-empty.
    pub fn into_new_todo(self) -> Result<NewTodo, ApiError> {
        let title = match self.title {
            Some(title) if !title.is_empty() => title,
            _ => return Err(ApiError::Validation("title is required")),
        };
        Ok(NewTodo {
            title,
            description: self.description.unwrap_or_default(),
            completed: self.completed.unwrap_or(false),
        })
    }

    /// Nothing is required for patch. A supplied empty `title` is only
    /// rejected once the target row is known to exist, see `TodoPatch::apply`.
    pub fn into_patch(self) -> TodoPatch {
        TodoPatch {
            title: self.title,
            description: self.description,
            completed: self.completed,
        }
    }
}

impl TodoPatch {
    /// Merge onto the currently stored row. Fails if the merge would store
    /// an empty title.
    pub fn apply(self, current: Todo) -> Result<Todo, RepoError> {
        if self.title.as_deref() == Some("") {
            return Err(RepoError::Invalid("title must not be empty"));
        }
        Ok(Todo {
            id: current.id,
            title: self.title.unwrap_or(current.title),
            description: self.description.unwrap_or(current.description),
            completed: self.completed.unwrap_or(current.completed),
        })
    }
}

fn deserialize_truthy<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Some(is_truthy(&value)))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
