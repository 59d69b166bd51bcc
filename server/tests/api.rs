use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use todo_server::{app, Todo, TodoRepository};
use tower::ServiceExt;

async fn test_app() -> Router {
    app(TodoRepository::in_memory().await.unwrap())
}

async fn send(app: &Router, request: Request<String>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn text_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "text/plain")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

async fn create(app: &Router, body: &str) -> Todo {
    let resp = send(app, json_request("POST", "/todos", body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

async fn list(app: &Router) -> Vec<Todo> {
    let resp = send(app, empty_request("GET", "/todos")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

fn not_found() -> Value {
    json!({"error": "Task not found"})
}

// --- list ---

#[tokio::test]
async fn list_todos_empty() {
    let app = test_app().await;
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn list_returns_todos_in_creation_order() {
    let app = test_app().await;
    let a = create(&app, r#"{"title":"a"}"#).await;
    let b = create(&app, r#"{"title":"b"}"#).await;
    assert_eq!(list(&app).await, vec![a, b]);
}

// --- create ---

#[tokio::test]
async fn create_todo_returns_201_with_defaults() {
    let app = test_app().await;
    let resp = send(&app, json_request("POST", "/todos", r#"{"title":"Buy milk"}"#)).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = body_json(resp).await;
    assert_eq!(
        body,
        json!({"id": 1, "title": "Buy milk", "description": "", "completed": false})
    );
}

#[tokio::test]
async fn create_todo_with_all_fields() {
    let app = test_app().await;
    let todo = create(
        &app,
        r#"{"title":"Already done","description":"yesterday","completed":true}"#,
    )
    .await;
    assert_eq!(todo.description, "yesterday");
    assert!(todo.completed);
}

#[tokio::test]
async fn create_coerces_truthy_completed() {
    let app = test_app().await;
    let todo = create(&app, r#"{"title":"t","completed":1}"#).await;
    assert!(todo.completed);
    let todo = create(&app, r#"{"title":"t","completed":""}"#).await;
    assert!(!todo.completed);
}

#[tokio::test]
async fn create_assigns_unique_ids() {
    let app = test_app().await;
    let mut ids = Vec::new();
    for n in 0..5 {
        ids.push(create(&app, &format!(r#"{{"title":"item {n}"}}"#)).await.id);
    }
    let mut deduped = ids.clone();
    deduped.sort_unstable();
    deduped.dedup();
    assert_eq!(deduped.len(), ids.len());
}

#[tokio::test]
async fn create_without_title_returns_400_and_inserts_nothing() {
    let app = test_app().await;
    for body in [r#"{}"#, r#"{"title":""}"#, r#"{"description":"no title"}"#] {
        let resp = send(&app, json_request("POST", "/todos", body)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
        let error: Value = body_json(resp).await;
        assert_eq!(error, json!({"error": "Invalid input: title is required"}));
    }
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn create_malformed_json_returns_400() {
    let app = test_app().await;
    let resp = send(&app, json_request("POST", "/todos", "{not json")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: Value = body_json(resp).await;
    assert!(error["error"].is_string());
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn create_without_json_content_type_reads_as_empty_body() {
    let app = test_app().await;
    for request in [
        empty_request("POST", "/todos"),
        text_request("POST", "/todos", r#"{"title":"ignored"}"#),
    ] {
        let resp = send(&app, request).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let error: Value = body_json(resp).await;
        assert_eq!(error, json!({"error": "Invalid input: title is required"}));
    }
    assert!(list(&app).await.is_empty());
}

// --- get ---

#[tokio::test]
async fn get_todo_returns_created() {
    let app = test_app().await;
    let created = create(&app, r#"{"title":"Read","description":"a book"}"#).await;

    let resp = send(&app, empty_request("GET", &format!("/todos/{}", created.id))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Todo = body_json(resp).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn get_todo_not_found() {
    let app = test_app().await;
    let resp = send(&app, empty_request("GET", "/todos/999")).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let error: Value = body_json(resp).await;
    assert_eq!(error, not_found());
}

#[tokio::test]
async fn get_todo_non_numeric_id_returns_404() {
    let app = test_app().await;
    let resp = send(&app, empty_request("GET", "/todos/not-a-number")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- replace ---

#[tokio::test]
async fn replace_resets_omitted_fields() {
    let app = test_app().await;
    let created = create(
        &app,
        r#"{"title":"Walk dog","description":"twice","completed":true}"#,
    )
    .await;

    let resp = send(
        &app,
        json_request("PUT", &format!("/todos/{}", created.id), r#"{"title":"Walk cat"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let replaced: Todo = body_json(resp).await;
    assert_eq!(
        replaced,
        Todo {
            id: created.id,
            title: "Walk cat".to_string(),
            description: String::new(),
            completed: false,
        }
    );
}

#[tokio::test]
async fn replace_without_title_returns_400_and_keeps_row() {
    let app = test_app().await;
    let created = create(&app, r#"{"title":"keep"}"#).await;

    let resp = send(
        &app,
        json_request("PUT", &format!("/todos/{}", created.id), r#"{"completed":true}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(list(&app).await, vec![created]);
}

#[tokio::test]
async fn replace_validates_before_lookup() {
    let app = test_app().await;
    let resp = send(&app, json_request("PUT", "/todos/999", r#"{}"#)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn replace_todo_not_found() {
    let app = test_app().await;
    let resp = send(&app, json_request("PUT", "/todos/999", r#"{"title":"Nope"}"#)).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let error: Value = body_json(resp).await;
    assert_eq!(error, not_found());
}

// --- patch ---

#[tokio::test]
async fn patch_title_keeps_other_fields() {
    let app = test_app().await;
    let created = create(
        &app,
        r#"{"title":"t","description":"details","completed":true}"#,
    )
    .await;

    let resp = send(
        &app,
        json_request("PATCH", &format!("/todos/{}", created.id), r#"{"title":"x"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let patched: Todo = body_json(resp).await;
    assert_eq!(patched.title, "x");
    assert_eq!(patched.description, "details");
    assert!(patched.completed);
}

#[tokio::test]
async fn patch_empty_body_changes_nothing() {
    let app = test_app().await;
    let created = create(&app, r#"{"title":"same"}"#).await;

    let resp = send(
        &app,
        json_request("PATCH", &format!("/todos/{}", created.id), "{}"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let patched: Todo = body_json(resp).await;
    assert_eq!(patched, created);
}

#[tokio::test]
async fn patch_empty_title_returns_400() {
    let app = test_app().await;
    let created = create(&app, r#"{"title":"keep"}"#).await;

    let resp = send(
        &app,
        json_request("PATCH", &format!("/todos/{}", created.id), r#"{"title":""}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(list(&app).await, vec![created]);
}

#[tokio::test]
async fn patch_without_json_content_type_changes_nothing() {
    let app = test_app().await;
    let created = create(&app, r#"{"title":"same","completed":true}"#).await;

    let resp = send(
        &app,
        empty_request("PATCH", &format!("/todos/{}", created.id)),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let patched: Todo = body_json(resp).await;
    assert_eq!(patched, created);
}

#[tokio::test]
async fn patch_missing_id_wins_over_invalid_body() {
    let app = test_app().await;
    let requests = [
        json_request("PATCH", "/todos/999", r#"{"title":""}"#),
        json_request("PATCH", "/todos/abc", r#"{"title":""}"#),
        empty_request("PATCH", "/todos/999"),
    ];
    for request in requests {
        let uri = request.uri().to_string();
        let resp = send(&app, request).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        let error: Value = body_json(resp).await;
        assert_eq!(error, not_found());
    }
}

#[tokio::test]
async fn patch_todo_not_found() {
    let app = test_app().await;
    let resp = send(&app, json_request("PATCH", "/todos/999", r#"{"completed":true}"#)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let error: Value = body_json(resp).await;
    assert_eq!(error, not_found());
}

// --- delete ---

#[tokio::test]
async fn delete_todo_not_found() {
    let app = test_app().await;
    let resp = send(&app, empty_request("DELETE", "/todos/999")).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let error: Value = body_json(resp).await;
    assert_eq!(error, not_found());
}

// --- storage faults ---

#[tokio::test]
async fn storage_fault_returns_500_with_message() {
    let pool = todo_server::db::connect().await.unwrap();
    let app = app(TodoRepository::new(pool.clone()));
    pool.close().await;

    let resp = send(&app, empty_request("GET", "/todos")).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error: Value = body_json(resp).await;
    assert_eq!(error["error"], sqlx::Error::PoolClosed.to_string());
}

// --- docs ---

#[tokio::test]
async fn openapi_document_is_served() {
    let app = test_app().await;
    let resp = send(&app, empty_request("GET", "/openapi.json")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let doc: Value = body_json(resp).await;
    assert_eq!(doc["openapi"], "3.0.3");
    assert!(doc["paths"]["/todos/{todoId}"]["patch"].is_object());
}

#[tokio::test]
async fn docs_page_is_html() {
    let app = test_app().await;
    let resp = send(&app, empty_request("GET", "/docs")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers()[http::header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
}

// --- full lifecycle ---

#[tokio::test]
async fn buy_milk_lifecycle() {
    let app = test_app().await;

    // create
    let resp = send(&app, json_request("POST", "/todos", r#"{"title":"Buy milk"}"#)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = body_json(resp).await;
    assert_eq!(
        created,
        json!({"id": 1, "title": "Buy milk", "description": "", "completed": false})
    );

    // patch completed only
    let resp = send(&app, json_request("PATCH", "/todos/1", r#"{"completed":true}"#)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let patched: Value = body_json(resp).await;
    assert_eq!(
        patched,
        json!({"id": 1, "title": "Buy milk", "description": "", "completed": true})
    );

    // delete
    let resp = send(&app, empty_request("DELETE", "/todos/1")).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get after delete: 404
    let resp = send(&app, empty_request("GET", "/todos/1")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let error: Value = body_json(resp).await;
    assert_eq!(error, not_found());

    // list after delete: empty
    assert!(list(&app).await.is_empty());
}
