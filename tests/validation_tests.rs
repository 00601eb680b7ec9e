use actix_web::{http::StatusCode, test};
use fellowship::database::models::Department;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use serial_test::serial;
use uuid::Uuid;

#[macro_use]
mod common;

use common::{AuthHelper, TestAssertions};

async fn post_json(uri: &str, token: Option<String>, body: Value) -> (StatusCode, String) {
    let app = test_app!();

    let mut req = test::TestRequest::post().uri(uri).set_json(body);
    if let Some(token) = token {
        req = req.insert_header(AuthHelper::auth_header(&token));
    }
    let resp = test::call_service(&app, req.to_request()).await;

    let status = resp.status();
    (status, TestAssertions::assert_error_response(resp).await)
}

#[actix_web::test]
#[serial]
async fn test_register_rejects_malformed_email() {
    common::setup_test_env();

    let (status, message) = post_json(
        "/api/v1/auth/register",
        None,
        json!({
            "name": "Lydia",
            "email": "lydia-at-example.com",
            "password": "purple-cloth",
            "department": "FAMILY"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(message.contains("Invalid email"));
}

#[actix_web::test]
#[serial]
async fn test_register_rejects_short_password() {
    common::setup_test_env();

    let (status, message) = post_json(
        "/api/v1/auth/register",
        None,
        json!({
            "name": "Lydia",
            "email": "lydia@example.com",
            "password": "short",
            "department": "FAMILY"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(message.contains("at least 8"));
}

#[actix_web::test]
#[serial]
async fn test_generate_rejects_weeks_out_of_range() {
    common::setup_test_env();

    for weeks in [0, 53] {
        let (status, message) = post_json(
            "/api/v1/moderator-schedules/generate",
            Some(AuthHelper::admin(Department::Worship)),
            json!({ "weeksToGenerate": weeks }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(message.contains("weeksToGenerate"), "got {}", message);
    }
}

#[actix_web::test]
#[serial]
async fn test_manual_schedule_rejects_inverted_times() {
    common::setup_test_env();

    let (status, message) = post_json(
        "/api/v1/moderator-schedules",
        Some(AuthHelper::admin(Department::Prayer)),
        json!({
            "userId": Uuid::new_v4(),
            "scheduleDate": "2024-03-04",
            "slotType": "MONDAY",
            "startTime": "19:00",
            "endTime": "18:00"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(message.contains("must be before"));
}

#[actix_web::test]
#[serial]
async fn test_prayer_team_rejects_self_pairing() {
    common::setup_test_env();
    let member = Uuid::new_v4();

    let (status, message) = post_json(
        "/api/v1/prayer-teams",
        Some(AuthHelper::admin(Department::Prayer)),
        json!({ "member1Id": member, "member2Id": member }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(message.contains("themselves"));
}

#[actix_web::test]
#[serial]
async fn test_prayer_team_rejects_inverted_week() {
    common::setup_test_env();

    let (status, _) = post_json(
        "/api/v1/prayer-teams",
        Some(AuthHelper::admin(Department::Prayer)),
        json!({
            "member1Id": Uuid::new_v4(),
            "member2Id": Uuid::new_v4(),
            "weekStart": "2024-03-10",
            "weekEnd": "2024-03-04"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
#[serial]
async fn test_event_without_date_is_rejected() {
    common::setup_test_env();

    let (status, message) = post_json(
        "/api/v1/news",
        Some(AuthHelper::admin(Department::Youth)),
        json!({
            "title": "Retreat",
            "content": "Details soon",
            "isEvent": true,
            "department": "YOUTH"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(message.contains("eventDate"));
}

#[actix_web::test]
#[serial]
async fn test_board_post_requires_title() {
    common::setup_test_env();

    let (status, _) = post_json(
        "/api/v1/board",
        Some(AuthHelper::member(Department::Family)),
        json!({ "title": "   ", "content": "Body" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
#[serial]
async fn test_anonymous_prayer_request_requires_content() {
    common::setup_test_env();

    let (status, _) = post_json(
        "/api/v1/prayer-requests",
        None,
        json!({ "title": "Healing", "content": "" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
#[serial]
async fn test_generate_schedules_rejects_malformed_body() {
    common::setup_test_env();

    let (status, message) = post_json(
        "/api/v1/moderator-schedules/generate",
        Some(AuthHelper::admin(Department::Worship)),
        json!({ "weeksToGenerate": "sixty" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(message.contains("Invalid request body"), "got {}", message);
}

#[actix_web::test]
#[serial]
async fn test_generate_teams_rejects_malformed_week_start() {
    common::setup_test_env();

    let (status, message) = post_json(
        "/api/v1/prayer-teams/generate",
        Some(AuthHelper::admin(Department::Prayer)),
        json!({ "replaceExisting": true, "weekStart": "03/04/2024" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(message.contains("Invalid request body"), "got {}", message);
}

#[actix_web::test]
#[serial]
async fn test_generate_teams_rejects_non_json_body() {
    common::setup_test_env();
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/prayer-teams/generate")
        .insert_header(AuthHelper::auth_header(&AuthHelper::admin(Department::Prayer)))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("replaceExisting=true")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
