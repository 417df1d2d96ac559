use axum::http::{Method, StatusCode};
use tower::ServiceExt;

use crate::test_support;

// Storage is disabled in the test context, so these cover the request
// validation that runs before any object is written.

#[tokio::test]
async fn upload_without_title_is_rejected() {
    let ctx = test_support::setup_test_context().await;

    let teacher = test_support::insert_teacher(ctx.state.db(), "ada@classhub.test", "Ada").await;
    let token = test_support::bearer_token(teacher.id, ctx.state.settings());
    let class = test_support::insert_class(ctx.state.db(), "Algorithms", "CS-201", teacher.id).await;

    let response = ctx
        .app
        .oneshot(test_support::multipart_request(
            Method::POST,
            &format!("/api/v1/classes/{}/materials", class.id),
            Some(&token),
            &[("file", Some("syllabus.pdf"), Some("application/pdf"), b"%PDF-1.4")],
        ))
        .await
        .expect("upload");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_rejects_disallowed_extension() {
    let ctx = test_support::setup_test_context().await;

    let teacher = test_support::insert_teacher(ctx.state.db(), "ada@classhub.test", "Ada").await;
    let token = test_support::bearer_token(teacher.id, ctx.state.settings());
    let class = test_support::insert_class(ctx.state.db(), "Algorithms", "CS-201", teacher.id).await;

    let response = ctx
        .app
        .oneshot(test_support::multipart_request(
            Method::POST,
            &format!("/api/v1/classes/{}/materials", class.id),
            Some(&token),
            &[
                ("title", None, None, b"Week 1"),
                ("file", Some("setup.exe"), Some("application/octet-stream"), b"MZ"),
            ],
        ))
        .await
        .expect("upload");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
}

#[tokio::test]
async fn upload_without_storage_is_unavailable() {
    let ctx = test_support::setup_test_context().await;

    let teacher = test_support::insert_teacher(ctx.state.db(), "ada@classhub.test", "Ada").await;
    let token = test_support::bearer_token(teacher.id, ctx.state.settings());
    let class = test_support::insert_class(ctx.state.db(), "Algorithms", "CS-201", teacher.id).await;

    let response = ctx
        .app
        .oneshot(test_support::multipart_request(
            Method::POST,
            &format!("/api/v1/classes/{}/materials", class.id),
            Some(&token),
            &[
                ("title", None, None, b"Week 1"),
                ("file", Some("notes.pdf"), Some("application/pdf"), b"%PDF-1.4"),
            ],
        ))
        .await
        .expect("upload");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn listing_an_empty_class_returns_no_materials() {
    let ctx = test_support::setup_test_context().await;

    let teacher = test_support::insert_teacher(ctx.state.db(), "ada@classhub.test", "Ada").await;
    let token = test_support::bearer_token(teacher.id, ctx.state.settings());
    let class = test_support::insert_class(ctx.state.db(), "Algorithms", "CS-201", teacher.id).await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/classes/{}/materials", class.id),
            Some(&token),
            None,
        ))
        .await
        .expect("list materials");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn download_url_for_missing_material_is_not_found() {
    let ctx = test_support::setup_test_context().await;

    let teacher = test_support::insert_teacher(ctx.state.db(), "ada@classhub.test", "Ada").await;
    let token = test_support::bearer_token(teacher.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/materials/424242/download-url",
            Some(&token),
            None,
        ))
        .await
        .expect("download url");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
