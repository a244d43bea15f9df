//! Integration tests for the worker assignment endpoints.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use common::{body_json, build_test_app, post_json, post_json_auth, token_for};

struct Seeded {
    job_id: i64,
    assignment_id: i64,
}

async fn seed_member(pool: &PgPool, business_id: i64, user_id: Uuid) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO team_members (business_id, user_id, name) VALUES ($1, $2, 'Sam') RETURNING id",
    )
    .bind(business_id)
    .bind(user_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn assign(pool: &PgPool, job_id: i64, member_id: i64) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO job_assignments (job_id, team_member_id) VALUES ($1, $2) RETURNING id",
    )
    .bind(job_id)
    .bind(member_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// A business with one job assigned to a member linked to `user_id`.
async fn seed(pool: &PgPool, user_id: Uuid) -> Seeded {
    let business_id: i64 = sqlx::query_scalar(
        "INSERT INTO businesses (owner_user_id, name, subdomain, plan, billing_period) \
         VALUES (gen_random_uuid(), 'Shine Co', 'shine', 'pro', 'monthly') RETURNING id",
    )
    .fetch_one(pool)
    .await
    .unwrap();
    let member_id = seed_member(pool, business_id, user_id).await;
    let job_id: i64 = sqlx::query_scalar("INSERT INTO jobs (business_id) VALUES ($1) RETURNING id")
        .bind(business_id)
        .fetch_one(pool)
        .await
        .unwrap();
    let assignment_id = assign(pool, job_id, member_id).await;
    Seeded {
        job_id,
        assignment_id,
    }
}

async fn assignment_row(pool: &PgPool, id: i64) -> (String, bool, bool, Option<String>) {
    sqlx::query_as(
        "SELECT status, clocked_in_at IS NOT NULL, clocked_out_at IS NOT NULL, notes \
         FROM job_assignments WHERE id = $1",
    )
    .bind(id)
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn job_status(pool: &PgPool, id: i64) -> String {
    sqlx::query_scalar("SELECT status FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn requests_without_a_token_are_unauthorized(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(
        app.router(),
        "/api/worker/clock-in",
        json!({ "assignmentId": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_token_is_unauthorized(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json_auth(
        app.router(),
        "/api/worker/clock-in",
        json!({ "assignmentId": 1 }),
        "not-a-jwt",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn another_users_assignment_is_not_found(pool: PgPool) {
    let seeded = seed(&pool, Uuid::new_v4()).await;
    let app = build_test_app(pool);

    let response = post_json_auth(
        app.router(),
        "/api/worker/clock-in",
        json!({ "assignmentId": seeded.assignment_id }),
        &token_for(Uuid::new_v4()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn clock_in_then_out(pool: PgPool) {
    let user = Uuid::new_v4();
    let seeded = seed(&pool, user).await;
    let app = build_test_app(pool.clone());
    let token = token_for(user);
    let body = json!({ "assignmentId": seeded.assignment_id });

    let response = post_json_auth(app.router(), "/api/worker/clock-in", body.clone(), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true }));

    let (status, clocked_in, clocked_out, _) = assignment_row(&pool, seeded.assignment_id).await;
    assert_eq!(status, "in_progress");
    assert!(clocked_in);
    assert!(!clocked_out);

    let response = post_json_auth(app.router(), "/api/worker/clock-in", body.clone(), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_json_auth(app.router(), "/api/worker/clock-out", body.clone(), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let (_, _, clocked_out, _) = assignment_row(&pool, seeded.assignment_id).await;
    assert!(clocked_out);

    let response = post_json_auth(app.router(), "/api/worker/clock-out", body, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn clock_out_before_clock_in_conflicts(pool: PgPool) {
    let user = Uuid::new_v4();
    let seeded = seed(&pool, user).await;
    let app = build_test_app(pool);

    let response = post_json_auth(
        app.router(),
        "/api/worker/clock-out",
        json!({ "assignmentId": seeded.assignment_id }),
        &token_for(user),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn status_update_is_stored(pool: PgPool) {
    let user = Uuid::new_v4();
    let seeded = seed(&pool, user).await;
    let app = build_test_app(pool.clone());

    let response = post_json_auth(
        app.router(),
        "/api/worker/status",
        json!({ "assignmentId": seeded.assignment_id, "status": "en_route" }),
        &token_for(user),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let (status, ..) = assignment_row(&pool, seeded.assignment_id).await;
    assert_eq!(status, "en_route");

    let response = post_json_auth(
        app.router(),
        "/api/worker/status",
        json!({ "assignmentId": seeded.assignment_id, "status": "lunch" }),
        &token_for(user),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn completing_the_only_assignment_completes_the_job(pool: PgPool) {
    let user = Uuid::new_v4();
    let seeded = seed(&pool, user).await;
    let app = build_test_app(pool.clone());
    let token = token_for(user);

    let response = post_json_auth(
        app.router(),
        "/api/worker/complete",
        json!({ "assignmentId": seeded.assignment_id, "notes": "  Wax applied  " }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _, _, notes) = assignment_row(&pool, seeded.assignment_id).await;
    assert_eq!(status, "completed");
    assert_eq!(notes.as_deref(), Some("Wax applied"));
    assert_eq!(job_status(&pool, seeded.job_id).await, "completed");

    let response = post_json_auth(
        app.router(),
        "/api/worker/complete",
        json!({ "assignmentId": seeded.assignment_id }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn job_stays_open_while_another_assignment_is_open(pool: PgPool) {
    let user = Uuid::new_v4();
    let seeded = seed(&pool, user).await;
    let business_id: i64 = sqlx::query_scalar("SELECT business_id FROM jobs WHERE id = $1")
        .bind(seeded.job_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    let teammate = Uuid::new_v4();
    let teammate_member = seed_member(&pool, business_id, teammate).await;
    let teammate_assignment = assign(&pool, seeded.job_id, teammate_member).await;
    let app = build_test_app(pool.clone());

    post_json_auth(
        app.router(),
        "/api/worker/status",
        json!({ "assignmentId": seeded.assignment_id, "status": "completed" }),
        &token_for(user),
    )
    .await;
    assert_eq!(job_status(&pool, seeded.job_id).await, "scheduled");

    post_json_auth(
        app.router(),
        "/api/worker/complete",
        json!({ "assignmentId": teammate_assignment }),
        &token_for(teammate),
    )
    .await;
    assert_eq!(job_status(&pool, seeded.job_id).await, "completed");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn completed_assignment_rejects_later_status_changes(pool: PgPool) {
    let user = Uuid::new_v4();
    let seeded = seed(&pool, user).await;
    let app = build_test_app(pool.clone());
    let token = token_for(user);

    post_json_auth(
        app.router(),
        "/api/worker/complete",
        json!({ "assignmentId": seeded.assignment_id }),
        &token,
    )
    .await;

    for status in ["scheduled", "in_progress", "cancelled"] {
        let response = post_json_auth(
            app.router(),
            "/api/worker/status",
            json!({ "assignmentId": seeded.assignment_id, "status": status }),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT, "status {status}");
    }

    let (status, ..) = assignment_row(&pool, seeded.assignment_id).await;
    assert_eq!(status, "completed");
    assert_eq!(job_status(&pool, seeded.job_id).await, "completed");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cancelling_the_last_open_assignment_completes_the_job(pool: PgPool) {
    let user = Uuid::new_v4();
    let seeded = seed(&pool, user).await;
    let business_id: i64 = sqlx::query_scalar("SELECT business_id FROM jobs WHERE id = $1")
        .bind(seeded.job_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    let teammate = Uuid::new_v4();
    let teammate_member = seed_member(&pool, business_id, teammate).await;
    let teammate_assignment = assign(&pool, seeded.job_id, teammate_member).await;
    let app = build_test_app(pool.clone());

    post_json_auth(
        app.router(),
        "/api/worker/complete",
        json!({ "assignmentId": seeded.assignment_id }),
        &token_for(user),
    )
    .await;
    assert_eq!(job_status(&pool, seeded.job_id).await, "scheduled");

    let response = post_json_auth(
        app.router(),
        "/api/worker/status",
        json!({ "assignmentId": teammate_assignment, "status": "cancelled" }),
        &token_for(teammate),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(job_status(&pool, seeded.job_id).await, "completed");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cancelling_the_only_assignment_leaves_the_job_open(pool: PgPool) {
    let user = Uuid::new_v4();
    let seeded = seed(&pool, user).await;
    let app = build_test_app(pool.clone());

    let response = post_json_auth(
        app.router(),
        "/api/worker/status",
        json!({ "assignmentId": seeded.assignment_id, "status": "cancelled" }),
        &token_for(user),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(job_status(&pool, seeded.job_id).await, "scheduled");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_body_is_a_json_bad_request(pool: PgPool) {
    let user = Uuid::new_v4();
    seed(&pool, user).await;
    let app = build_test_app(pool);

    let response = post_json_auth(
        app.router(),
        "/api/worker/clock-in",
        json!({ "assignmentId": "not-a-number" }),
        &token_for(user),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["error"].is_string());
}
