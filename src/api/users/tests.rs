use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::test_support;

#[tokio::test]
async fn admin_can_create_user() {
    let ctx = test_support::setup_test_context().await;

    let admin = test_support::insert_admin(ctx.state.db(), "admin@classhub.test").await;
    let token = test_support::bearer_token(admin.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/users",
            Some(&token),
            Some(json!({
                "email": "grace@classhub.test",
                "full_name": "Grace",
                "password": "grace-password",
                "role": "teacher"
            })),
        ))
        .await
        .expect("create user");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["email"], "grace@classhub.test");
    assert_eq!(body["role"], "teacher");
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let ctx = test_support::setup_test_context().await;

    let admin = test_support::insert_admin(ctx.state.db(), "admin@classhub.test").await;
    let token = test_support::bearer_token(admin.id, ctx.state.settings());
    test_support::insert_teacher(ctx.state.db(), "grace@classhub.test", "Grace").await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/users",
            Some(&token),
            Some(json!({
                "email": "grace@classhub.test",
                "full_name": "Grace Again",
                "password": "grace-password",
                "role": "student"
            })),
        ))
        .await
        .expect("create user");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_payloads_are_rejected() {
    let ctx = test_support::setup_test_context().await;

    let admin = test_support::insert_admin(ctx.state.db(), "admin@classhub.test").await;
    let token = test_support::bearer_token(admin.id, ctx.state.settings());

    let cases = [
        json!({"email": "grace@classhub.test", "full_name": "Grace", "password": "short", "role": "student"}),
        json!({"email": "not-an-email", "full_name": "Grace", "password": "grace-password", "role": "student"}),
        json!({"email": "grace@classhub.test", "full_name": "", "password": "grace-password", "role": "student"}),
    ];

    for payload in cases {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/users",
                Some(&token),
                Some(payload.clone()),
            ))
            .await
            .expect("create user");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "payload: {payload}");
    }
}

#[tokio::test]
async fn teacher_cannot_create_users() {
    let ctx = test_support::setup_test_context().await;

    let teacher = test_support::insert_teacher(ctx.state.db(), "ada@classhub.test", "Ada").await;
    let token = test_support::bearer_token(teacher.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/users",
            Some(&token),
            Some(json!({
                "email": "new@classhub.test",
                "full_name": "New",
                "password": "some-password",
                "role": "student"
            })),
        ))
        .await
        .expect("create user");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
