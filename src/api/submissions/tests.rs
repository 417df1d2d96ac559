use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::types::{EnrollmentStatus, SubmissionStatus};
use crate::repositories;
use crate::test_support;

struct Fixture {
    teacher_token: String,
    student_token: String,
    student_id: i64,
    class_id: i64,
}

async fn fixture(ctx: &test_support::TestContext) -> Fixture {
    let teacher = test_support::insert_teacher(ctx.state.db(), "ada@classhub.test", "Ada").await;
    let student = test_support::insert_student(ctx.state.db(), "sam@classhub.test", "Sam").await;
    let class = test_support::insert_class(ctx.state.db(), "Algorithms", "CS-201", teacher.id).await;
    test_support::insert_enrollment(
        ctx.state.db(),
        class.id,
        student.id,
        EnrollmentStatus::Approved,
    )
    .await;

    Fixture {
        teacher_token: test_support::bearer_token(teacher.id, ctx.state.settings()),
        student_token: test_support::bearer_token(student.id, ctx.state.settings()),
        student_id: student.id,
        class_id: class.id,
    }
}

#[tokio::test]
async fn student_submits_text_content() {
    let ctx = test_support::setup_test_context().await;
    let fx = fixture(&ctx).await;
    let assignment = test_support::insert_assignment(
        ctx.state.db(),
        fx.class_id,
        "Homework 1",
        test_support::future_due_date(),
        100.0,
        false,
    )
    .await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::multipart_request(
            Method::POST,
            &format!("/api/v1/assignments/{}/submissions", assignment.id),
            Some(&fx.student_token),
            &[("content", None, None, b"dijkstra with a binary heap")],
        ))
        .await
        .expect("submit");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["content"], "dijkstra with a binary heap");
    assert_eq!(body["status"], "submitted");
    assert_eq!(body["is_late"], false);

    // Resubmitting the same assignment conflicts.
    let response = ctx
        .app
        .oneshot(test_support::multipart_request(
            Method::POST,
            &format!("/api/v1/assignments/{}/submissions", assignment.id),
            Some(&fx.student_token),
            &[("content", None, None, b"second attempt")],
        ))
        .await
        .expect("submit again");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn empty_submission_is_rejected() {
    let ctx = test_support::setup_test_context().await;
    let fx = fixture(&ctx).await;
    let assignment = test_support::insert_assignment(
        ctx.state.db(),
        fx.class_id,
        "Homework 1",
        test_support::future_due_date(),
        100.0,
        false,
    )
    .await;

    let response = ctx
        .app
        .oneshot(test_support::multipart_request(
            Method::POST,
            &format!("/api/v1/assignments/{}/submissions", assignment.id),
            Some(&fx.student_token),
            &[("content", None, None, b"   ")],
        ))
        .await
        .expect("submit");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn past_deadline_submission_is_rejected_without_late_allowance() {
    let ctx = test_support::setup_test_context().await;
    let fx = fixture(&ctx).await;
    let assignment = test_support::insert_assignment(
        ctx.state.db(),
        fx.class_id,
        "Homework 1",
        test_support::past_due_date(),
        100.0,
        false,
    )
    .await;

    let response = ctx
        .app
        .oneshot(test_support::multipart_request(
            Method::POST,
            &format!("/api/v1/assignments/{}/submissions", assignment.id),
            Some(&fx.student_token),
            &[("content", None, None, b"too late")],
        ))
        .await
        .expect("submit");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let count = repositories::submissions::count_by_assignment(ctx.state.db(), assignment.id)
        .await
        .expect("count");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn late_submission_is_flagged_when_allowed() {
    let ctx = test_support::setup_test_context().await;
    let fx = fixture(&ctx).await;
    let assignment = test_support::insert_assignment(
        ctx.state.db(),
        fx.class_id,
        "Homework 1",
        test_support::past_due_date(),
        100.0,
        true,
    )
    .await;

    let response = ctx
        .app
        .oneshot(test_support::multipart_request(
            Method::POST,
            &format!("/api/v1/assignments/{}/submissions", assignment.id),
            Some(&fx.student_token),
            &[("content", None, None, b"late but allowed")],
        ))
        .await
        .expect("submit");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["is_late"], true);
}

#[tokio::test]
async fn unpublished_assignment_is_invisible_to_students() {
    let ctx = test_support::setup_test_context().await;
    let fx = fixture(&ctx).await;
    let now = crate::core::time::primitive_now_utc();
    let assignment = repositories::assignments::create(
        ctx.state.db(),
        repositories::assignments::CreateAssignment {
            class_id: fx.class_id,
            title: "Draft homework",
            description: None,
            instructions: None,
            due_date: test_support::future_due_date(),
            max_score: 100.0,
            assignment_type: crate::db::types::AssignmentType::Homework,
            is_published: false,
            allow_late_submission: false,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .expect("insert draft assignment");

    let response = ctx
        .app
        .oneshot(test_support::multipart_request(
            Method::POST,
            &format!("/api/v1/assignments/{}/submissions", assignment.id),
            Some(&fx.student_token),
            &[("content", None, None, b"answer")],
        ))
        .await
        .expect("submit");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unenrolled_student_cannot_submit() {
    let ctx = test_support::setup_test_context().await;
    let fx = fixture(&ctx).await;
    let outsider = test_support::insert_student(ctx.state.db(), "zoe@classhub.test", "Zoe").await;
    let outsider_token = test_support::bearer_token(outsider.id, ctx.state.settings());
    let assignment = test_support::insert_assignment(
        ctx.state.db(),
        fx.class_id,
        "Homework 1",
        test_support::future_due_date(),
        100.0,
        false,
    )
    .await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::multipart_request(
            Method::POST,
            &format!("/api/v1/assignments/{}/submissions", assignment.id),
            Some(&outsider_token),
            &[("content", None, None, b"answer")],
        ))
        .await
        .expect("submit");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Teachers cannot submit at all.
    let response = ctx
        .app
        .oneshot(test_support::multipart_request(
            Method::POST,
            &format!("/api/v1/assignments/{}/submissions", assignment.id),
            Some(&fx.teacher_token),
            &[("content", None, None, b"answer")],
        ))
        .await
        .expect("submit");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn grading_validates_score_bounds() {
    let ctx = test_support::setup_test_context().await;
    let fx = fixture(&ctx).await;
    let assignment = test_support::insert_assignment(
        ctx.state.db(),
        fx.class_id,
        "Homework 1",
        test_support::future_due_date(),
        100.0,
        false,
    )
    .await;
    let submission =
        test_support::insert_submission(ctx.state.db(), assignment.id, fx.student_id).await;

    for score in [-0.5, 100.01] {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/submissions/{}/grade", submission.id),
                Some(&fx.teacher_token),
                Some(json!({"score": score})),
            ))
            .await
            .expect("grade");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "score: {score}");
    }

    let unchanged = repositories::submissions::find_by_id(ctx.state.db(), submission.id)
        .await
        .expect("query")
        .expect("submission");
    assert_eq!(unchanged.status, SubmissionStatus::Submitted);
    assert_eq!(unchanged.score, None);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/submissions/{}/grade", submission.id),
            Some(&fx.teacher_token),
            Some(json!({"score": 100.0, "feedback": "Full marks"})),
        ))
        .await
        .expect("grade");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["score"], 100.0);
    assert_eq!(body["feedback"], "Full marks");
    assert_eq!(body["status"], "graded");
    assert!(body["graded_at"].is_string());
}

#[tokio::test]
async fn regrading_overwrites_the_previous_score() {
    let ctx = test_support::setup_test_context().await;
    let fx = fixture(&ctx).await;
    let assignment = test_support::insert_assignment(
        ctx.state.db(),
        fx.class_id,
        "Homework 1",
        test_support::future_due_date(),
        100.0,
        false,
    )
    .await;
    let submission =
        test_support::insert_submission(ctx.state.db(), assignment.id, fx.student_id).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/submissions/{}/grade", submission.id),
            Some(&fx.teacher_token),
            Some(json!({"score": 70.0, "feedback": "First pass"})),
        ))
        .await
        .expect("first grade");
    assert_eq!(response.status(), StatusCode::OK);

    let first = repositories::submissions::find_by_id(ctx.state.db(), submission.id)
        .await
        .expect("query")
        .expect("submission");
    let first_graded_at = first.graded_at.expect("graded_at after first grade");

    // Postgres stores microseconds; step the clock past them before regrading.
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/submissions/{}/grade", submission.id),
            Some(&fx.teacher_token),
            Some(json!({"score": 85.0, "feedback": "After appeal"})),
        ))
        .await
        .expect("regrade");
    assert_eq!(response.status(), StatusCode::OK);

    let graded = repositories::submissions::find_by_id(ctx.state.db(), submission.id)
        .await
        .expect("query")
        .expect("submission");
    assert_eq!(graded.score, Some(85.0));
    assert_eq!(graded.feedback.as_deref(), Some("After appeal"));
    assert_eq!(graded.status, SubmissionStatus::Graded);
    let second_graded_at = graded.graded_at.expect("graded_at after regrade");
    assert!(second_graded_at > first_graded_at, "{second_graded_at} vs {first_graded_at}");
}

#[tokio::test]
async fn only_graded_submissions_can_be_returned() {
    let ctx = test_support::setup_test_context().await;
    let fx = fixture(&ctx).await;
    let assignment = test_support::insert_assignment(
        ctx.state.db(),
        fx.class_id,
        "Homework 1",
        test_support::future_due_date(),
        100.0,
        false,
    )
    .await;
    let submission =
        test_support::insert_submission(ctx.state.db(), assignment.id, fx.student_id).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/submissions/{}/return", submission.id),
            Some(&fx.teacher_token),
            None,
        ))
        .await
        .expect("return ungraded");

    assert_eq!(response.status(), StatusCode::CONFLICT);

    repositories::submissions::grade(
        ctx.state.db(),
        submission.id,
        90.0,
        None,
        crate::core::time::primitive_now_utc(),
    )
    .await
    .expect("grade");

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/submissions/{}/return", submission.id),
            Some(&fx.teacher_token),
            None,
        ))
        .await
        .expect("return graded");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["status"], "returned");
}

#[tokio::test]
async fn grade_is_guarded_by_ownership() {
    let ctx = test_support::setup_test_context().await;
    let fx = fixture(&ctx).await;
    let other = test_support::insert_teacher(ctx.state.db(), "bob@classhub.test", "Bob").await;
    let other_token = test_support::bearer_token(other.id, ctx.state.settings());
    let assignment = test_support::insert_assignment(
        ctx.state.db(),
        fx.class_id,
        "Homework 1",
        test_support::future_due_date(),
        100.0,
        false,
    )
    .await;
    let submission =
        test_support::insert_submission(ctx.state.db(), assignment.id, fx.student_id).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/submissions/{}/grade", submission.id),
            Some(&other_token),
            Some(json!({"score": 50.0})),
        ))
        .await
        .expect("grade");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/submissions/424242/grade",
            Some(&other_token),
            Some(json!({"score": 50.0})),
        ))
        .await
        .expect("grade");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn grading_board_lists_approved_students_without_submissions() {
    let ctx = test_support::setup_test_context().await;
    let fx = fixture(&ctx).await;
    let zoe = test_support::insert_student(ctx.state.db(), "zoe@classhub.test", "Zoe").await;
    test_support::insert_enrollment(
        ctx.state.db(),
        fx.class_id,
        zoe.id,
        EnrollmentStatus::Approved,
    )
    .await;
    let assignment = test_support::insert_assignment(
        ctx.state.db(),
        fx.class_id,
        "Homework 1",
        test_support::future_due_date(),
        100.0,
        false,
    )
    .await;
    test_support::insert_submission(ctx.state.db(), assignment.id, fx.student_id).await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/assignments/{}/submissions", assignment.id),
            Some(&fx.teacher_token),
            None,
        ))
        .await
        .expect("grading board");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let sam = body
        .as_array()
        .and_then(|rows| rows.iter().find(|row| row["full_name"] == "Sam"))
        .expect("sam row");
    assert_eq!(sam["status"], "submitted");
    assert!(sam["submission_id"].is_i64());

    let zoe_row = body
        .as_array()
        .and_then(|rows| rows.iter().find(|row| row["full_name"] == "Zoe"))
        .expect("zoe row");
    assert!(zoe_row["submission_id"].is_null());
    assert!(zoe_row["status"].is_null());
}
