// SPDX-License-Identifier: MIT

//! End-to-end ledger and attendance scenarios against the Firestore
//! emulator. Each test uses fresh identities so runs do not interfere.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use jelloverse_api::catalog::TaskId;
use jelloverse_api::models::{Event, User};
use jelloverse_api::services::toggle_attendance;
use jelloverse_api::time_utils::{format_utc_rfc3339, now_rfc3339};
use tower::ServiceExt;

mod common;

fn fresh_subject() -> String {
    format!("did:jello:{}", uuid::Uuid::new_v4())
}

fn test_event(creator: &str) -> Event {
    let now = now_rfc3339();
    let start = Utc::now() + Duration::days(1);
    Event {
        id: uuid::Uuid::new_v4().to_string(),
        title: "Sunset beach jam".to_string(),
        description: None,
        vibe: Some("\u{1f3d6}\u{fe0f}".to_string()),
        location_name: Some("Hiriketiya".to_string()),
        location_url: None,
        start_time: format_utc_rfc3339(start),
        end_time: format_utc_rfc3339(start + Duration::hours(3)),
        is_core: false,
        creator: creator.to_string(),
        attendees: vec![creator.to_string()],
        created_at: now.clone(),
        updated_at: now,
    }
}

#[tokio::test]
async fn test_attendance_toggle_awards_then_restores() {
    require_emulator!();

    let state = common::build_state(common::test_db().await);
    let subject = fresh_subject();
    let host = fresh_subject();

    state
        .db
        .upsert_user(&User::new(subject.clone(), now_rfc3339()))
        .await
        .unwrap();

    let event = test_event(&host);
    state.db.upsert_event(&event).await.unwrap();

    // Join: attendee added, ATTEND_JAM awarded
    let outcome = toggle_attendance(&state.db, &state.ledger, &event.id, &subject)
        .await
        .unwrap();
    assert!(outcome.attending);

    let stored = state.db.get_event(&event.id).await.unwrap().unwrap();
    assert!(stored.is_attending(&subject));

    let user = state.db.get_user(&subject).await.unwrap().unwrap();
    assert_eq!(user.num_points, TaskId::AttendJam.task().points);
    assert_eq!(
        user.completed_tasks.last().map(String::as_str),
        Some("ATTEND_JAM")
    );

    // Leave: attendee removed, points deducted, log entry removed
    let outcome = toggle_attendance(&state.db, &state.ledger, &event.id, &subject)
        .await
        .unwrap();
    assert!(!outcome.attending);

    let stored = state.db.get_event(&event.id).await.unwrap().unwrap();
    assert!(!stored.is_attending(&subject));
    assert!(stored.is_attending(&host));

    let user = state.db.get_user(&subject).await.unwrap().unwrap();
    assert_eq!(user.num_points, 0);
    assert!(!user.completed_tasks.iter().any(|t| t == "ATTEND_JAM"));
}

#[tokio::test]
async fn test_toggle_on_missing_event_is_not_found() {
    require_emulator!();

    let state = common::build_state(common::test_db().await);
    let subject = fresh_subject();

    let err = toggle_attendance(&state.db, &state.ledger, "no-such-event", &subject)
        .await
        .unwrap_err();
    assert!(matches!(err, jelloverse_api::error::AppError::NotFound(_)));
}

#[tokio::test]
async fn test_non_repeatable_award_is_idempotent() {
    require_emulator!();

    let state = common::build_state(common::test_db().await);
    let subject = fresh_subject();
    state
        .db
        .upsert_user(&User::new(subject.clone(), now_rfc3339()))
        .await
        .unwrap();

    let first = state
        .ledger
        .award(&subject, TaskId::SignUp, true)
        .await
        .unwrap();
    assert!(first.is_some());

    let second = state
        .ledger
        .award(&subject, TaskId::SignUp, true)
        .await
        .unwrap();
    assert!(second.is_none());

    let user = state.db.get_user(&subject).await.unwrap().unwrap();
    assert_eq!(user.num_points, TaskId::SignUp.task().points);
    assert_eq!(user.completed_tasks, vec!["SIGN_UP"]);
}

#[tokio::test]
async fn test_deduction_clamps_at_zero() {
    require_emulator!();

    let state = common::build_state(common::test_db().await);
    let subject = fresh_subject();

    let mut user = User::new(subject.clone(), now_rfc3339());
    user.num_points = 5;
    user.completed_tasks = vec!["ATTEND_JAM".to_string()];
    state.db.upsert_user(&user).await.unwrap();

    let outcome = state
        .ledger
        .deduct(&subject, TaskId::AttendJam)
        .await
        .unwrap();
    assert_eq!(outcome.new_total, 0);

    let stored = state.db.get_user(&subject).await.unwrap().unwrap();
    assert_eq!(stored.num_points, 0);
}

#[tokio::test]
async fn test_event_creation_awards_every_time() {
    require_emulator!();

    let state = common::build_state(common::test_db().await);
    let app = jelloverse_api::routes::create_router(state.clone());

    let subject = fresh_subject();
    state
        .db
        .upsert_user(&User::new(subject.clone(), now_rfc3339()))
        .await
        .unwrap();

    let token = common::create_test_jwt(&subject, &state.config.jwt_signing_key);
    let body = r#"{
        "title": "Morning surf jam",
        "start_time": "2025-06-01T06:00:00Z",
        "end_time": "2025-06-01T08:00:00Z"
    }"#;

    // Creation is non-idempotent: every call pays out
    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/events")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let user = state.db.get_user(&subject).await.unwrap().unwrap();
    assert_eq!(user.num_points, TaskId::CreateJam.task().points * 3);
    assert_eq!(
        user.completed_tasks,
        vec!["CREATE_JAM", "CREATE_JAM", "CREATE_JAM"]
    );
}

#[tokio::test]
async fn test_overnight_policy_on_create() {
    require_emulator!();

    let state = common::build_state(common::test_db().await);
    let app = jelloverse_api::routes::create_router(state.clone());

    let subject = fresh_subject();
    state
        .db
        .upsert_user(&User::new(subject.clone(), now_rfc3339()))
        .await
        .unwrap();
    let token = common::create_test_jwt(&subject, &state.config.jwt_signing_key);

    let create = |body: &'static str| {
        let app = app.clone();
        let token = token.clone();
        async move {
            let response = app
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/api/events")
                        .header(header::AUTHORIZATION, format!("Bearer {}", token))
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from(body))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            serde_json::from_slice::<Event>(&bytes).unwrap()
        }
    };

    // End before start spans into the next day
    let event = create(
        r#"{"title": "Night jam", "start_time": "2025-06-01T22:00:00Z",
            "end_time": "2025-06-01T02:00:00Z"}"#,
    )
    .await;
    assert_eq!(event.end_time, "2025-06-02T02:00:00Z");

    // A zero-length event is stored as submitted
    let event = create(
        r#"{"title": "Flash jam", "start_time": "2025-06-01T22:00:00Z",
            "end_time": "2025-06-01T22:00:00Z"}"#,
    )
    .await;
    assert_eq!(event.end_time, "2025-06-01T22:00:00Z");
    let stored = state.db.get_event(&event.id).await.unwrap().unwrap();
    assert_eq!(stored.end_time, stored.start_time);
}

#[tokio::test]
async fn test_event_crud_ownership() {
    require_emulator!();

    let state = common::build_state(common::test_db().await);
    let app = jelloverse_api::routes::create_router(state.clone());

    let owner = fresh_subject();
    let stranger = fresh_subject();
    let event = test_event(&owner);
    state.db.upsert_event(&event).await.unwrap();

    let stranger_token = common::create_test_jwt(&stranger, &state.config.jwt_signing_key);

    // Ownership-scoped read: a stranger sees 404
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/events/{}", event.id))
                .header(header::AUTHORIZATION, format!("Bearer {}", stranger_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Mutations by a stranger are forbidden
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/events/{}", event.id))
                .header(header::AUTHORIZATION, format!("Bearer {}", stranger_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The owner can delete
    let owner_token = common::create_test_jwt(&owner, &state.config.jwt_signing_key);
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/events/{}", event.id))
                .header(header::AUTHORIZATION, format!("Bearer {}", owner_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(state.db.get_event(&event.id).await.unwrap().is_none());
}
