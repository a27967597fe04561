use std::time::Duration;

use chrono::NaiveDate;
use httpmock::prelude::*;
use serde_json::json;

use ott_digest::services::{
    notifier::{Notifier, TelegramNotifier},
    providers::{CatalogProvider, OmdbProvider, RatingsProvider, StreamingAvailabilityProvider},
};
use ott_digest::AppError;

fn catalog_provider(server: &MockServer) -> StreamingAvailabilityProvider {
    StreamingAvailabilityProvider::new(
        "rapid_key".to_string(),
        server.base_url(),
        "in".to_string(),
        vec!["netflix".to_string(), "prime".to_string()],
        Duration::from_secs(5),
    )
}

#[tokio::test]
async fn test_catalog_page_request_and_normalization() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/search/basic")
                .header("x-rapidapi-key", "rapid_key")
                .query_param("country", "in")
                .query_param("services", "netflix,prime")
                .query_param("order_by", "date")
                .query_param("page", "1");
            then.status(200).json_body(json!({
                "result": [
                    {
                        "title": "Bhakshak",
                        "year": 2024,
                        "releaseDate": "2024-01-09",
                        "streamingInfo": { "in": { "netflix": [] } }
                    },
                    {
                        "name": "Karmma Calling",
                        "firstAirDate": "2024-01-08",
                        "streamingInfo": { "in": { "hotstar": [] } }
                    }
                ],
                "hasMore": false
            }));
        })
        .await;

    let records = catalog_provider(&server).fetch_page(1).await.unwrap();

    mock.assert_async().await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title, "Bhakshak");
    assert_eq!(records[0].year, Some(2024));
    assert_eq!(records[1].title, "Karmma Calling");
    assert_eq!(records[1].release_date, NaiveDate::from_ymd_opt(2024, 1, 8));
    assert!(records[1].platforms.contains("hotstar"));
}

#[tokio::test]
async fn test_catalog_non_success_status_is_error() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/search/basic");
            then.status(429).body("Too many requests");
        })
        .await;

    let err = catalog_provider(&server).fetch_page(1).await.unwrap_err();
    match err {
        AppError::ExternalApi(msg) => assert!(msg.contains("429")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_catalog_missing_result_is_empty_page() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/search/basic");
            then.status(200).json_body(json!({ "message": "no results" }));
        })
        .await;

    let records = catalog_provider(&server).fetch_page(3).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_omdb_lookup_found() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/")
                .query_param("apikey", "omdb_key")
                .query_param("t", "Bhakshak")
                .query_param("y", "2024");
            then.status(200).json_body(json!({
                "Title": "Bhakshak",
                "Year": "2024",
                "Genre": "Crime, Drama",
                "Plot": "A journalist exposes a shelter home scandal.",
                "imdbRating": "7.3",
                "Response": "True"
            }));
        })
        .await;

    let provider = OmdbProvider::new(
        "omdb_key".to_string(),
        server.base_url(),
        Duration::from_secs(5),
    );
    let enrichment = provider
        .lookup("Bhakshak", Some(2024))
        .await
        .unwrap()
        .unwrap();

    mock.assert_async().await;
    assert_eq!(enrichment.rating, Some(7.3));
    assert_eq!(enrichment.genre.as_deref(), Some("Crime, Drama"));
}

#[tokio::test]
async fn test_omdb_response_false_is_not_found() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/").query_param("t", "Nobody Knows");
            then.status(200).json_body(json!({
                "Response": "False",
                "Error": "Movie not found!"
            }));
        })
        .await;

    let provider = OmdbProvider::new(
        "omdb_key".to_string(),
        server.base_url(),
        Duration::from_secs(5),
    );
    assert!(provider.lookup("Nobody Knows", None).await.unwrap().is_none());
}

#[tokio::test]
async fn test_omdb_unauthorized_is_error() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(401)
                .json_body(json!({ "Response": "False", "Error": "Invalid API key!" }));
        })
        .await;

    let provider = OmdbProvider::new(
        "bad_key".to_string(),
        server.base_url(),
        Duration::from_secs(5),
    );
    assert!(matches!(
        provider.lookup("Anything", None).await,
        Err(AppError::ExternalApi(_))
    ));
}

#[tokio::test]
async fn test_telegram_send_message() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/botTEST_TOKEN/sendMessage")
                .body_contains("chat_id=42")
                .body_contains("parse_mode=Markdown");
            then.status(200)
                .json_body(json!({ "ok": true, "result": { "message_id": 7 } }));
        })
        .await;

    let notifier = TelegramNotifier::new(
        "TEST_TOKEN".to_string(),
        "42".to_string(),
        server.base_url(),
        Duration::from_secs(5),
    );
    notifier.send("🎬 *OTT Releases in India*").await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_telegram_long_digest_sent_in_parts() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/botTEST_TOKEN/sendMessage");
            then.status(200).json_body(json!({ "ok": true }));
        })
        .await;

    let notifier = TelegramNotifier::new(
        "TEST_TOKEN".to_string(),
        "42".to_string(),
        server.base_url(),
        Duration::from_secs(5),
    );
    let text = "📝 A plot line that keeps going.\n".repeat(300);
    notifier.send(&text).await.unwrap();

    mock.assert_hits_async(3).await;
}

#[tokio::test]
async fn test_telegram_rejection_is_notification_error() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/botTEST_TOKEN/sendMessage");
            then.status(400).json_body(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            }));
        })
        .await;

    let notifier = TelegramNotifier::new(
        "TEST_TOKEN".to_string(),
        "42".to_string(),
        server.base_url(),
        Duration::from_secs(5),
    );
    let err = notifier.send("hello").await.unwrap_err();

    assert!(matches!(err, AppError::Notification(_)));
    assert!(err.to_string().contains("chat not found"));
    assert!(!err.to_string().contains("TEST_TOKEN"));
}

#[tokio::test]
async fn test_telegram_ok_false_is_notification_error() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/botTEST_TOKEN/sendMessage");
            then.status(200)
                .json_body(json!({ "ok": false, "description": "Forbidden: bot was blocked" }));
        })
        .await;

    let notifier = TelegramNotifier::new(
        "TEST_TOKEN".to_string(),
        "42".to_string(),
        server.base_url(),
        Duration::from_secs(5),
    );
    let err = notifier.send("hello").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Notification error: Forbidden: bot was blocked"
    );
}

#[tokio::test]
async fn test_omdb_transport_error_hides_api_key() {
    // Nothing listens on the discard port
    let provider = OmdbProvider::new(
        "SUPER_SECRET_KEY".to_string(),
        "http://127.0.0.1:9".to_string(),
        Duration::from_secs(2),
    );

    let err = provider.lookup("Jawan", None).await.unwrap_err();
    assert!(matches!(err, AppError::HttpClient(_)));
    assert!(!err.to_string().contains("SUPER_SECRET_KEY"));
}

#[tokio::test]
async fn test_omdb_unreadable_body_hides_api_key() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(200).body("<html>maintenance</html>");
        })
        .await;

    let provider = OmdbProvider::new(
        "SUPER_SECRET_KEY".to_string(),
        server.base_url(),
        Duration::from_secs(5),
    );

    let err = provider.lookup("Jawan", Some(2023)).await.unwrap_err();
    assert!(matches!(err, AppError::HttpClient(_)));
    assert!(!err.to_string().contains("SUPER_SECRET_KEY"));
}

#[tokio::test]
async fn test_telegram_failure_after_first_part_reports_progress() {
    let server = MockServer::start_async().await;

    let first = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/botTEST_TOKEN/sendMessage")
                .body_contains("first");
            then.status(200).json_body(json!({ "ok": true }));
        })
        .await;

    let second = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/botTEST_TOKEN/sendMessage")
                .body_contains("second");
            then.status(429).json_body(json!({
                "ok": false,
                "description": "Too Many Requests: retry after 5"
            }));
        })
        .await;

    let notifier = TelegramNotifier::new(
        "TEST_TOKEN".to_string(),
        "42".to_string(),
        server.base_url(),
        Duration::from_secs(5),
    );
    // 341 lines of 12 characters fill the first part, the rest spill into a second
    let text = format!(
        "{}{}",
        "first line.\n".repeat(341),
        "second line.\n".repeat(20)
    );
    let err = notifier.send(&text).await.unwrap_err();

    first.assert_async().await;
    second.assert_async().await;
    assert!(matches!(err, AppError::Notification(_)));
    assert!(err.to_string().contains("sent 1 of 2 parts"));
    assert!(err.to_string().contains("Too Many Requests"));
}
