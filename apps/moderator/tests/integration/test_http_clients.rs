use moderator::{
    domain::errors::{AuthError, ClassifierError, HostingError},
    infrastructure::{
        classifiers::{
            SentimentClassifier, SentimentOutcome, ToxicityClassifier,
            perspective::PerspectiveClient, sentiment_api::SentimentApiClient,
        },
        youtube::{
            AccessTokenProvider, CommentRemover, CommentSource, RefreshTokenProvider,
            RemovalMode, StaticTokenProvider, VideoSource, YouTubeClient,
        },
    },
};
use serde_json::json;
use std::{sync::Arc, time::Duration};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, body_string_contains, header, method, path, query_param, query_param_is_missing},
};

fn youtube(server: &MockServer, mode: RemovalMode) -> YouTubeClient {
    YouTubeClient::new(
        reqwest::Client::new(),
        server.uri(),
        Arc::new(StaticTokenProvider::new("ya29.test")),
        mode,
    )
}

#[tokio::test]
async fn video_listing_follows_pages_and_keeps_only_videos() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("channelId", "UC1"))
        .and(query_param("order", "date"))
        .and(query_param_is_missing("pageToken"))
        .and(header("authorization", "Bearer ya29.test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "id": { "kind": "youtube#video", "videoId": "v3" } },
                { "id": { "kind": "youtube#playlist", "playlistId": "PL1" } },
                { "id": { "kind": "youtube#video", "videoId": "v2" } }
            ],
            "nextPageToken": "T2"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("pageToken", "T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "id": { "kind": "youtube#video", "videoId": "v1" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ids = youtube(&server, RemovalMode::Delete)
        .list_video_ids("UC1")
        .await
        .unwrap();
    assert_eq!(ids, ["v3", "v2", "v1"]);
}

#[tokio::test]
async fn comment_page_is_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("videoId", "v1"))
        .and(query_param("textFormat", "plainText"))
        .and(query_param("pageToken", "NEXT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "snippet": { "topLevelComment": { "id": "Ugw1", "snippet": { "textDisplay": "first!" } } } },
                { "snippet": { "topLevelComment": { "id": "Ugw2", "snippet": { "textDisplay": "nice" } } } }
            ],
            "nextPageToken": "AFTER"
        })))
        .mount(&server)
        .await;

    let page = youtube(&server, RemovalMode::Delete)
        .list_comment_page("v1", Some("NEXT"))
        .await
        .unwrap();
    assert_eq!(page.comments.len(), 2);
    assert_eq!(page.comments[0].id, "Ugw1");
    assert_eq!(page.comments[0].text, "first!");
    assert_eq!(page.comments[1].video_id, "v1");
    assert_eq!(page.next_page_token.as_deref(), Some("AFTER"));
}

#[tokio::test]
async fn disabled_comments_yield_an_empty_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {
                "code": 403,
                "message": "The video has disabled comments.",
                "errors": [{ "reason": "commentsDisabled" }]
            }
        })))
        .mount(&server)
        .await;

    let page = youtube(&server, RemovalMode::Delete)
        .list_comment_page("v1", None)
        .await
        .unwrap();
    assert!(page.comments.is_empty());
    assert!(page.next_page_token.is_none());
}

#[tokio::test]
async fn unauthorized_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "code": 401, "message": "Invalid Credentials", "errors": [{ "reason": "authError" }] }
        })))
        .mount(&server)
        .await;

    let err = youtube(&server, RemovalMode::Delete)
        .list_comment_page("v1", None)
        .await
        .unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(err, HostingError::Authentication(ref m) if m == "Invalid Credentials"));
}

#[tokio::test]
async fn other_api_errors_are_not_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": 404, "message": "Video not found", "errors": [{ "reason": "videoNotFound" }] }
        })))
        .mount(&server)
        .await;

    let err = youtube(&server, RemovalMode::Delete)
        .list_comment_page("gone", None)
        .await
        .unwrap_err();
    assert!(!err.is_fatal());
    assert!(matches!(err, HostingError::Api { status: 404, .. }));
}

#[tokio::test]
async fn delete_mode_deletes_and_tolerates_missing_comments() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/comments"))
        .and(query_param("id", "Ugw1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/comments"))
        .and(query_param("id", "Ugw-gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = youtube(&server, RemovalMode::Delete);
    client.remove_comment("Ugw1").await.unwrap();
    client.remove_comment("Ugw-gone").await.unwrap();
}

#[tokio::test]
async fn reject_mode_sets_moderation_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/comments/setModerationStatus"))
        .and(query_param("id", "Ugw1"))
        .and(query_param("moderationStatus", "rejected"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    youtube(&server, RemovalMode::Reject)
        .remove_comment("Ugw1")
        .await
        .unwrap();
}

#[tokio::test]
async fn removal_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/comments"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "Insufficient permissions", "errors": [{ "reason": "forbidden" }] }
        })))
        .mount(&server)
        .await;

    let err = youtube(&server, RemovalMode::Delete)
        .remove_comment("Ugw1")
        .await
        .unwrap_err();
    assert!(matches!(err, HostingError::Api { status: 403, .. }));
}

fn perspective(server: &MockServer, client: reqwest::Client) -> PerspectiveClient {
    PerspectiveClient::new(client, server.uri(), "pk-test", vec!["en".to_string()])
}

#[tokio::test]
async fn perspective_returns_toxicity_summary_score() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1alpha1/comments:analyze"))
        .and(query_param("key", "pk-test"))
        .and(body_json(json!({
            "comment": { "text": "you people" },
            "requestedAttributes": { "TOXICITY": {} },
            "doNotStore": true,
            "languages": ["en"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "attributeScores": { "TOXICITY": { "summaryScore": { "value": 0.83, "type": "PROBABILITY" } } },
            "languages": ["en"]
        })))
        .mount(&server)
        .await;

    let score = perspective(&server, reqwest::Client::new())
        .score("you people")
        .await
        .unwrap();
    assert!((score - 0.83).abs() < f64::EPSILON);
}

#[tokio::test]
async fn perspective_failures_are_typed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("empty body"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "languages": ["en"] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("server down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = perspective(&server, reqwest::Client::new());
    assert!(matches!(
        client.score("empty body").await,
        Err(ClassifierError::Malformed(_))
    ));
    assert!(matches!(
        client.score("server down").await,
        Err(ClassifierError::Api { status: 503, .. })
    ));
}

#[tokio::test]
async fn slow_classifier_times_out_as_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(2))
                .set_body_json(json!({})),
        )
        .mount(&server)
        .await;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let err = perspective(&server, client).score("hello").await.unwrap_err();
    assert!(matches!(err, ClassifierError::Http(_)));
}

fn sentiment(server: &MockServer) -> SentimentApiClient {
    SentimentApiClient::new(
        reqwest::Client::new(),
        format!("{}/analyze", server.uri()),
        Some("sk-test".to_string()),
        vec!["en".to_string()],
    )
}

#[tokio::test]
async fn sentiment_supported_language_is_scored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_json(json!({ "text": "I love this video" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "language": "en-US", "sentiment_score": 0.9 })),
        )
        .mount(&server)
        .await;

    let outcome = sentiment(&server).analyze("I love this video").await.unwrap();
    assert_eq!(
        outcome,
        SentimentOutcome::Supported {
            language: "en-US".to_string(),
            score: 0.9
        }
    );
}

#[tokio::test]
async fn sentiment_unsupported_language_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("bonjour"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "language": "fr", "sentiment_score": -0.9 })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("???"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sentiment_score": 0.0 })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("xyzzy"))
        .respond_with(ResponseTemplate::new(422).set_body_string("language not supported"))
        .mount(&server)
        .await;

    let client = sentiment(&server);
    assert_eq!(
        client.analyze("bonjour tout le monde").await.unwrap(),
        SentimentOutcome::Unsupported {
            language: Some("fr".to_string())
        }
    );
    assert_eq!(
        client.analyze("???").await.unwrap(),
        SentimentOutcome::Unsupported { language: None }
    );
    assert_eq!(
        client.analyze("xyzzy").await.unwrap(),
        SentimentOutcome::Unsupported { language: None }
    );
}

#[tokio::test]
async fn sentiment_transport_failures_are_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("boom"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("noscore"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "language": "en" })))
        .mount(&server)
        .await;

    let client = sentiment(&server);
    assert!(matches!(
        client.analyze("boom").await,
        Err(ClassifierError::Api { status: 500, .. })
    ));
    assert!(matches!(
        client.analyze("noscore").await,
        Err(ClassifierError::Malformed(_))
    ));
}

#[tokio::test]
async fn refresh_token_is_exchanged_once_and_cached() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=1%2F%2Frefresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.fresh",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = RefreshTokenProvider::new(
        reqwest::Client::new(),
        format!("{}/token", server.uri()),
        "client-id",
        "client-secret",
        "1//refresh",
    );
    assert_eq!(provider.access_token().await.unwrap(), "ya29.fresh");
    assert_eq!(provider.access_token().await.unwrap(), "ya29.fresh");
}

#[tokio::test]
async fn revoked_refresh_token_is_an_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Token has been expired or revoked."
        })))
        .mount(&server)
        .await;

    let provider = RefreshTokenProvider::new(
        reqwest::Client::new(),
        format!("{}/token", server.uri()),
        "client-id",
        "client-secret",
        "1//refresh",
    );
    let err = provider.access_token().await.unwrap_err();
    match err {
        AuthError::Rejected { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Token has been expired or revoked.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn youtube_calls_fail_fatally_when_token_cannot_be_obtained() {
    let server = MockServer::start().await;
    let client = YouTubeClient::new(
        reqwest::Client::new(),
        server.uri(),
        Arc::new(StaticTokenProvider::new("")),
        RemovalMode::Delete,
    );

    let err = client.list_video_ids("UC1").await.unwrap_err();
    assert!(err.is_fatal());
}
