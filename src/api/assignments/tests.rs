use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::core::time::format_primitive;
use crate::db::types::EnrollmentStatus;
use crate::repositories;
use crate::test_support;

#[tokio::test]
async fn teacher_creates_and_lists_assignments() {
    let ctx = test_support::setup_test_context().await;

    let teacher = test_support::insert_teacher(ctx.state.db(), "ada@classhub.test", "Ada").await;
    let token = test_support::bearer_token(teacher.id, ctx.state.settings());
    let class = test_support::insert_class(ctx.state.db(), "Algorithms", "CS-201", teacher.id).await;

    let due_date = format_primitive(test_support::future_due_date());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/classes/{}/assignments", class.id),
            Some(&token),
            Some(json!({
                "title": "Homework 1",
                "due_date": due_date,
                "max_score": 100.0,
                "assignment_type": "quiz",
                "allow_late_submission": true
            })),
        ))
        .await
        .expect("create assignment");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["title"], "Homework 1");
    assert_eq!(body["assignment_type"], "quiz");
    assert_eq!(body["is_published"], true);
    assert_eq!(body["allow_late_submission"], true);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/classes/{}/assignments", class.id),
            Some(&token),
            None,
        ))
        .await
        .expect("list assignments");

    let status = response.status();
    let list = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {list}");
    assert_eq!(list.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn create_rejects_invalid_payloads() {
    let ctx = test_support::setup_test_context().await;

    let teacher = test_support::insert_teacher(ctx.state.db(), "ada@classhub.test", "Ada").await;
    let token = test_support::bearer_token(teacher.id, ctx.state.settings());
    let class = test_support::insert_class(ctx.state.db(), "Algorithms", "CS-201", teacher.id).await;
    let due_date = format_primitive(test_support::future_due_date());

    let cases = [
        json!({"title": "  ", "due_date": due_date, "max_score": 100.0}),
        json!({"title": "Homework 1", "due_date": due_date, "max_score": 1001.0}),
        json!({"title": "Homework 1", "due_date": "next friday", "max_score": 100.0}),
    ];

    for payload in cases {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/classes/{}/assignments", class.id),
                Some(&token),
                Some(payload.clone()),
            ))
            .await
            .expect("create assignment");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "payload: {payload}");
    }
}

#[tokio::test]
async fn details_include_enrollment_and_submission_counts() {
    let ctx = test_support::setup_test_context().await;

    let teacher = test_support::insert_teacher(ctx.state.db(), "ada@classhub.test", "Ada").await;
    let token = test_support::bearer_token(teacher.id, ctx.state.settings());
    let class = test_support::insert_class(ctx.state.db(), "Algorithms", "CS-201", teacher.id).await;

    let sam = test_support::insert_student(ctx.state.db(), "sam@classhub.test", "Sam").await;
    let zoe = test_support::insert_student(ctx.state.db(), "zoe@classhub.test", "Zoe").await;
    test_support::insert_enrollment(ctx.state.db(), class.id, sam.id, EnrollmentStatus::Approved)
        .await;
    test_support::insert_enrollment(ctx.state.db(), class.id, zoe.id, EnrollmentStatus::Approved)
        .await;

    let assignment = test_support::insert_assignment(
        ctx.state.db(),
        class.id,
        "Homework 1",
        test_support::future_due_date(),
        100.0,
        false,
    )
    .await;
    test_support::insert_submission(ctx.state.db(), assignment.id, sam.id).await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/assignments/{}", assignment.id),
            Some(&token),
            None,
        ))
        .await
        .expect("assignment details");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["id"], assignment.id);
    assert_eq!(body["enrolled_count"], 2);
    assert_eq!(body["submitted_count"], 1);
}

#[tokio::test]
async fn update_applies_partial_changes() {
    let ctx = test_support::setup_test_context().await;

    let teacher = test_support::insert_teacher(ctx.state.db(), "ada@classhub.test", "Ada").await;
    let token = test_support::bearer_token(teacher.id, ctx.state.settings());
    let class = test_support::insert_class(ctx.state.db(), "Algorithms", "CS-201", teacher.id).await;
    let assignment = test_support::insert_assignment(
        ctx.state.db(),
        class.id,
        "Homework 1",
        test_support::future_due_date(),
        100.0,
        false,
    )
    .await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::PATCH,
            &format!("/api/v1/assignments/{}", assignment.id),
            Some(&token),
            Some(json!({"max_score": 50.0, "is_published": false})),
        ))
        .await
        .expect("update assignment");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["title"], "Homework 1");
    assert_eq!(body["max_score"], 50.0);
    assert_eq!(body["is_published"], false);
}

#[tokio::test]
async fn delete_without_submissions_succeeds() {
    let ctx = test_support::setup_test_context().await;

    let teacher = test_support::insert_teacher(ctx.state.db(), "ada@classhub.test", "Ada").await;
    let token = test_support::bearer_token(teacher.id, ctx.state.settings());
    let class = test_support::insert_class(ctx.state.db(), "Algorithms", "CS-201", teacher.id).await;
    let assignment = test_support::insert_assignment(
        ctx.state.db(),
        class.id,
        "Homework 1",
        test_support::future_due_date(),
        100.0,
        false,
    )
    .await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/assignments/{}", assignment.id),
            Some(&token),
            None,
        ))
        .await
        .expect("delete assignment");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let gone =
        repositories::assignments::find_by_id(ctx.state.db(), assignment.id).await.expect("query");
    assert!(gone.is_none());
}

#[tokio::test]
async fn delete_with_submissions_conflicts() {
    let ctx = test_support::setup_test_context().await;

    let teacher = test_support::insert_teacher(ctx.state.db(), "ada@classhub.test", "Ada").await;
    let student = test_support::insert_student(ctx.state.db(), "sam@classhub.test", "Sam").await;
    let token = test_support::bearer_token(teacher.id, ctx.state.settings());
    let class = test_support::insert_class(ctx.state.db(), "Algorithms", "CS-201", teacher.id).await;
    test_support::insert_enrollment(
        ctx.state.db(),
        class.id,
        student.id,
        EnrollmentStatus::Approved,
    )
    .await;
    let assignment = test_support::insert_assignment(
        ctx.state.db(),
        class.id,
        "Homework 1",
        test_support::future_due_date(),
        100.0,
        false,
    )
    .await;
    test_support::insert_submission(ctx.state.db(), assignment.id, student.id).await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/assignments/{}", assignment.id),
            Some(&token),
            None,
        ))
        .await
        .expect("delete assignment");

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let still_there =
        repositories::assignments::find_by_id(ctx.state.db(), assignment.id).await.expect("query");
    assert!(still_there.is_some());
}

#[tokio::test]
async fn foreign_assignment_is_forbidden_and_missing_is_not_found() {
    let ctx = test_support::setup_test_context().await;

    let owner = test_support::insert_teacher(ctx.state.db(), "ada@classhub.test", "Ada").await;
    let other = test_support::insert_teacher(ctx.state.db(), "bob@classhub.test", "Bob").await;
    let class = test_support::insert_class(ctx.state.db(), "Algorithms", "CS-201", owner.id).await;
    let assignment = test_support::insert_assignment(
        ctx.state.db(),
        class.id,
        "Homework 1",
        test_support::future_due_date(),
        100.0,
        false,
    )
    .await;
    let other_token = test_support::bearer_token(other.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/assignments/{}", assignment.id),
            Some(&other_token),
            None,
        ))
        .await
        .expect("get assignment");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/assignments/424242",
            Some(&other_token),
            None,
        ))
        .await
        .expect("get assignment");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
