//! Integration tests for the VK wall client against a mock API host.

use std::time::Duration;

use chrono::{Local, TimeZone};
use horoscope_bot::config::VkConfig;
use horoscope_bot::horoscope::{HoroscopeLookup, LookupOutcome, Recency, Sign};
use horoscope_bot::vk::{RateLimiter, VkClient, VkError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_client(mock_server: &MockServer) -> VkClient {
    let config = VkConfig::new("test-token".to_string()).with_api_url(mock_server.uri());
    VkClient::new(config)
        .expect("Failed to create test client")
        .with_rate_limiter(RateLimiter::new(Duration::from_millis(1)))
}

fn local_noon_timestamp() -> i64 {
    let today = Local::now().date_naive();
    Local
        .from_local_datetime(&today.and_hms_opt(12, 0, 0).unwrap())
        .earliest()
        .unwrap()
        .timestamp()
}

#[tokio::test]
async fn test_wall_get_parses_posts_and_sends_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/method/wall.get"))
        .and(query_param("owner_id", "-193489972"))
        .and(query_param("count", "100"))
        .and(query_param("access_token", "test-token"))
        .and(query_param("v", "5.199"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "count": 2,
                "items": [
                    {"id": 10, "date": 1_700_000_000, "text": "pinned", "is_pinned": 1},
                    {"id": 9, "date": 1_699_990_000, "text": "regular"}
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let posts = client.wall_get(-193_489_972, 250).await.unwrap();

    assert_eq!(posts.len(), 2);
    assert!(posts[0].pinned);
    assert_eq!(posts[0].id, 10);
    assert!(!posts[1].pinned);
    assert_eq!(posts[1].text, "regular");
}

#[tokio::test]
async fn test_api_error_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"error_code": 5, "error_msg": "User authorization failed"}
        })))
        .mount(&server)
        .await;

    let err = create_test_client(&server).wall_get(-1, 10).await.unwrap_err();
    match err {
        VkError::Api { code, message } => {
            assert_eq!(code, 5);
            assert_eq!(message, "User authorization failed");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_too_many_requests_maps_to_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"error_code": 6, "error_msg": "Too many requests per second"}
        })))
        .mount(&server)
        .await;

    let err = create_test_client(&server).wall_get(-1, 10).await.unwrap_err();
    assert!(matches!(err, VkError::RateLimited(_)));
}

#[tokio::test]
async fn test_http_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = create_test_client(&server).wall_get(-1, 10).await.unwrap_err();
    assert!(matches!(err, VkError::Http(_)));
}

#[tokio::test]
async fn test_lookup_through_client_skips_pinned_post() {
    let server = MockServer::start().await;
    let noon = local_noon_timestamp();
    let aries = Sign::Aries.label();
    Mock::given(method("GET"))
        .and(path("/method/wall.get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "items": [
                    {"id": 3, "date": noon, "text": format!("{aries}: закреп"), "is_pinned": 1},
                    {"id": 2, "date": noon, "text": format!("Гороскоп\n{aries}: день удачи")}
                ]
            }
        })))
        .mount(&server)
        .await;

    let lookup = HoroscopeLookup::new(create_test_client(&server), -193_489_972, 100);
    let today = Local::now().date_naive();
    let result = lookup.lookup(Sign::Aries, today, today).await;

    match result.outcome {
        LookupOutcome::Found {
            excerpt, recency, ..
        } => {
            assert_eq!(excerpt, format!("{aries}: день удачи"));
            assert_eq!(recency, Recency::Today);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_lookup_failure_is_captured_in_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let lookup = HoroscopeLookup::new(create_test_client(&server), -1, 100);
    let today = Local::now().date_naive();
    let result = lookup.lookup(Sign::Leo, today, today).await;

    assert!(matches!(result.outcome, LookupOutcome::Failed(_)));
    assert!(result.render_text().starts_with("❌ Ошибка: "));
}
