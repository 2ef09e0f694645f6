use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use person_store::{
    db,
    routes::{api_router, AppState},
};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt; // oneshot

async fn app() -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory store");
    db::migrate(&pool).await.expect("apply migrations");
    api_router(AppState::new(pool))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let app = app().await;

    let (status, created) = send(
        &app,
        "POST",
        "/people",
        Some(json!({ "name": "Juan", "age": 20, "favoriteFoods": ["completo"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Juan");
    assert_eq!(created["favoriteFoods"], json!(["completo"]));

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/people/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn missing_and_malformed_ids() {
    let app = app().await;

    let missing = uuid::Uuid::now_v7();
    let (status, body) = send(&app, "GET", &format!("/people/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");

    let (status, body) = send(&app, "GET", "/people/not-an-id", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_id");
}

#[tokio::test]
async fn empty_name_is_bad_request() {
    let app = app().await;
    let (status, body) = send(&app, "POST", "/people", Some(json!({ "name": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn batch_create_and_find_by_name() {
    let app = app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/people/batch",
        Some(json!([
            { "name": "Mary", "favoriteFoods": ["burrito"] },
            { "name": "Mary" },
            { "name": "Tom", "age": 9 }
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["people"].as_array().unwrap().len(), 3);

    let (status, body) = send(&app, "GET", "/people?name=Mary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["people"].as_array().unwrap().len(), 2);

    let (status, _) = send(&app, "GET", "/people", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn food_update_and_delete_endpoints() {
    let app = app().await;
    let (_, created) = send(
        &app,
        "POST",
        "/people",
        Some(json!({ "name": "Mary", "age": 5, "favoriteFoods": ["burrito"] })),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, found) = send(&app, "GET", "/people/by-food/burrito", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["id"], id.as_str());

    let (status, _) = send(&app, "GET", "/people/by-food/sushi", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, updated) = send(&app, "POST", &format!("/people/{id}/foods"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["favoriteFoods"], json!(["burrito", "hamburger"]));

    let (status, updated) = send(&app, "PATCH", "/people/by-name/Mary/age", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["age"], 20);

    let (status, chained) = send(&app, "GET", "/people/query-chain", None).await;
    assert_eq!(status, StatusCode::OK);
    let chained = chained["people"].as_array().unwrap();
    assert_eq!(chained.len(), 1);
    assert!(chained[0].get("age").is_none());

    // name을 생략하면 "Mary"를 삭제합니다.
    let (status, summary) = send(&app, "DELETE", "/people", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary, json!({ "deletedCount": 1 }));

    let (status, _) = send(&app, "DELETE", &format!("/people/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_by_id_returns_removed_person() {
    let app = app().await;
    let (_, created) = send(&app, "POST", "/people", Some(json!({ "name": "Leo" }))).await;
    let id = created["id"].as_str().unwrap();

    let (status, removed) = send(&app, "DELETE", &format!("/people/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed, created);
}

#[tokio::test]
async fn health_reports_store_status() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "store": "up" }));
}

#[tokio::test]
async fn shutdown_signal_does_not_fail_requests() {
    // main과 같은 구성: 종료 토큰은 서버만 관찰하고 AppState는 따로 만듭니다.
    let shutdown = CancellationToken::new();
    let app = app().await;

    shutdown.cancel();

    let (status, created) = send(
        &app,
        "POST",
        "/people",
        Some(json!({ "name": "Ana", "favoriteFoods": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let id = created["id"].as_str().unwrap();
    let (status, _) = send(&app, "GET", &format!("/people/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
}
