//! OpenAPI document and a Swagger UI page that renders it.

use axum::{response::Html, Json};
use serde_json::{json, Value};

pub const OPENAPI_PATH: &str = "/openapi.json";
pub const DOCS_PATH: &str = "/docs";

const SWAGGER_UI: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Todo API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({ url: "/openapi.json", dom_id: "#swagger-ui" });
  </script>
</body>
</html>
"##;

pub async fn openapi() -> Json<Value> {
    Json(openapi_document())
}

pub async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI)
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": { "schema": { "$ref": "#/components/schemas/Error" } }
        }
    })
}

fn todo_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": { "schema": { "$ref": "#/components/schemas/Todo" } }
        }
    })
}

fn input_body() -> Value {
    json!({
        "required": true,
        "content": {
            "application/json": { "schema": { "$ref": "#/components/schemas/TodoInput" } }
        }
    })
}

/// The machine-readable description of every route served by `crate::app`.
pub fn openapi_document() -> Value {
    let id_param = json!({
        "name": "todoId",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    });

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Todo API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "CRUD service for todo items backed by an in-memory SQLite table."
        },
        "paths": {
            "/todos": {
                "get": {
                    "summary": "List all todos",
                    "responses": {
                        "200": {
                            "description": "All todos",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/Todo" }
                                    }
                                }
                            }
                        },
                        "500": error_response("Storage fault")
                    }
                },
                "post": {
                    "summary": "Create a todo",
                    "requestBody": input_body(),
                    "responses": {
                        "201": todo_response("Created todo"),
                        "400": error_response("Invalid input: title is required"),
                        "500": error_response("Storage fault")
                    }
                }
            },
            "/todos/{todoId}": {
                "parameters": [id_param],
                "get": {
                    "summary": "Get a todo by id",
                    "responses": {
                        "200": todo_response("The todo"),
                        "404": error_response("Task not found"),
                        "500": error_response("Storage fault")
                    }
                },
                "put": {
                    "summary": "Replace a todo; omitted optional fields reset to defaults",
                    "requestBody": input_body(),
                    "responses": {
                        "200": todo_response("Updated todo"),
                        "400": error_response("Invalid input: title is required"),
                        "404": error_response("Task not found"),
                        "500": error_response("Storage fault")
                    }
                },
                "patch": {
                    "summary": "Update only the supplied fields of a todo",
                    "requestBody": input_body(),
                    "responses": {
                        "200": todo_response("Updated todo"),
                        "400": error_response("Malformed body or empty title"),
                        "404": error_response("Task not found"),
                        "500": error_response("Storage fault")
                    }
                },
                "delete": {
                    "summary": "Delete a todo",
                    "responses": {
                        "204": { "description": "Deleted" },
                        "404": error_response("Task not found"),
                        "500": error_response("Storage fault")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Todo": {
                    "type": "object",
                    "required": ["id", "title", "description", "completed"],
                    "properties": {
                        "id": { "type": "integer", "format": "int64" },
                        "title": { "type": "string" },
                        "description": { "type": "string" },
                        "completed": { "type": "boolean" }
                    }
                },
                "TodoInput": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string", "minLength": 1 },
                        "description": { "type": "string", "default": "" },
                        "completed": { "type": "boolean", "default": false }
                    }
                },
                "Error": {
                    "type": "object",
                    "required": ["error"],
                    "properties": { "error": { "type": "string" } }
                }
            }
        }
    })
}
