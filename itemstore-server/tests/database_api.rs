//! End-to-end API tests against a real Postgres
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p itemstore-server -- --ignored

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

use itemstore_server::storage::DatabaseFileStore;
use itemstore_server::{build_router, AppState, ConnectionPolicy, Connector};

fn app(policy: ConnectionPolicy) -> Router {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let connector = Arc::new(Connector::new(Some(url), policy));
    let files = Arc::new(DatabaseFileStore::new(connector.clone()));
    build_router(Arc::new(AppState::new(connector, files)), false)
}

async fn body_json(response: Response) -> JsonValue {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
#[ignore = "requires database"]
async fn item_lifecycle() {
    let app = app(ConnectionPolicy::Shared);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/items",
            r#"{"name":"Test","value":"Some data"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["name"], "Test");
    assert_eq!(created["value"], "Some data");
    let id = created["id"].as_str().unwrap().to_string();

    let response = app.clone().oneshot(get(&format!("/items/{}", id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);

    let response = app.clone().oneshot(get("/items")).await.unwrap();
    let all = body_json(response).await;
    assert!(all.as_array().unwrap().iter().any(|item| item["id"] == id.as_str()));

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/items/{}", id),
            r#"{"name":"Updated"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["name"], "Updated");
    assert_eq!(updated["value"], "Some data");

    let response = app
        .clone()
        .oneshot(json_request("PUT", &format!("/items/{}", id), r#"{"value":"New"}"#))
        .await
        .unwrap();
    let updated = body_json(response).await;
    assert_eq!(updated["name"], "Updated");
    assert_eq!(updated["value"], "New");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/items/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"ok": true}));

    let response = app.oneshot(get(&format!("/items/{}", id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({"error": "Not found"}));
}

#[tokio::test]
#[ignore = "requires database"]
async fn empty_body_creates_untitled_item() {
    let app = app(ConnectionPolicy::PerRequest);

    let response = app
        .oneshot(json_request("POST", "/items", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["name"], "Untitled");
    assert_eq!(created["value"], "{}");
}

#[tokio::test]
#[ignore = "requires database"]
async fn non_object_body_is_accepted() {
    let app = app(ConnectionPolicy::Shared);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/items", "[1,2]"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["name"], "Untitled");
    assert_eq!(created["value"], "[1,2]");
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request("PUT", &format!("/items/{}", id), r#""text""#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);

    let response = app
        .oneshot(json_request("POST", "/items", "{not json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "Invalid JSON body"}));
}

#[tokio::test]
#[ignore = "requires database"]
async fn null_columns_come_back_as_null() {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = itemstore_server::db::create_pool(&url).await.unwrap();
    itemstore_server::db::ensure_schema(&pool).await.unwrap();
    let id = uuid::Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO items (id, name, value) VALUES ($1, NULL, 'v')")
        .bind(&id)
        .execute(&pool)
        .await
        .unwrap();

    let app = app(ConnectionPolicy::Shared);
    let response = app.clone().oneshot(get(&format!("/items/{}", id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"id": id, "name": null, "value": "v"})
    );

    let response = app.oneshot(get("/items")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    sqlx::query("DELETE FROM items WHERE id = $1")
        .bind(&id)
        .execute(&pool)
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn unknown_item_is_404_and_delete_still_ok() {
    let app = app(ConnectionPolicy::Shared);
    let id = uuid::Uuid::new_v4();

    let response = app.clone().oneshot(get(&format!("/items/{}", id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(json_request("PUT", &format!("/items/{}", id), r#"{"name":"x"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/items/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"ok": true}));
}

#[tokio::test]
#[ignore = "requires database"]
async fn file_round_trip_through_database() {
    let app = app(ConnectionPolicy::Shared);
    let boundary = "db-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"test.txt\"\r\nContent-Type: text/plain\r\n\r\ntest file content\r\n--{b}--\r\n",
        b = boundary
    );

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/files/upload")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let file_id = body_json(response).await["fileId"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app.oneshot(get(&format!("/files/{}", file_id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        r#"inline; filename="test.txt""#
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"test file content");
}
