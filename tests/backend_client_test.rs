mod common;

use antirecommender::{
    AccountClient, AccountRegistry, BackendClient, BackendErrorKind, Config, RecommendationClient,
    RecommendationSource, RecommenderError, Session,
};
use common::{as_http_client, valid_token, FakeHttpClient, BACKEND_URL};

fn account_client(fake: &std::sync::Arc<FakeHttpClient>, session: &Session) -> AccountClient {
    let backend = BackendClient::new(as_http_client(fake), Some(BACKEND_URL.to_string()));
    AccountClient::new(backend, session.clone())
}

fn recommendation_client(fake: &std::sync::Arc<FakeHttpClient>) -> RecommendationClient {
    RecommendationClient::new(BackendClient::new(
        as_http_client(fake),
        Some(format!("{BACKEND_URL}/")),
    ))
}

#[test_log::test(tokio::test)]
async fn test_register_records_account() {
    let fake = FakeHttpClient::new();
    fake.reply("/user", 200, "{}");
    let session = Session::in_memory();

    account_client(&fake, &session)
        .register("listener@example.com")
        .await
        .unwrap();

    assert!(session.has_backend_account());
    assert_eq!(
        session.backend_account().as_deref(),
        Some("listener@example.com")
    );

    let requests = fake.requests_to("/user");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].url, format!("{BACKEND_URL}/user"));
    assert_eq!(requests[0].content_type.as_deref(), Some("application/json"));
    assert_eq!(
        requests[0].json(),
        serde_json::json!({ "mail": "listener@example.com" })
    );
}

#[tokio::test]
async fn test_register_rejected_keeps_session_empty() {
    let fake = FakeHttpClient::new();
    fake.reply("/user", 422, r#"{"detail": "That doesn't look like a mail"}"#);
    let session = Session::in_memory();

    let err = account_client(&fake, &session)
        .register("not-a-mail")
        .await
        .unwrap_err();

    match &err {
        RecommenderError::Backend {
            status,
            kind,
            detail,
        } => {
            assert_eq!(*status, 422);
            assert_eq!(*kind, BackendErrorKind::Validation);
            assert_eq!(detail, "That doesn't look like a mail");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("That doesn't look like a mail"));
    assert!(!session.has_backend_account());
}

#[tokio::test]
async fn test_register_without_backend_url_sends_nothing() {
    let fake = FakeHttpClient::new();
    let session = Session::in_memory();
    let backend = BackendClient::from_config(as_http_client(&fake), &Config::default());
    let accounts = AccountClient::new(backend, session.clone());

    let err = accounts.register("listener@example.com").await.unwrap_err();

    assert!(matches!(err, RecommenderError::Config(_)));
    assert!(err.to_string().contains("Please contact them"));
    assert!(fake.requests().is_empty());
    assert!(!session.has_backend_account());
}

#[tokio::test]
async fn test_register_unreachable_backend() {
    let fake = FakeHttpClient::new();
    fake.fail("/user", "dns lookup failed");
    let session = Session::in_memory();

    let err = account_client(&fake, &session)
        .register("listener@example.com")
        .await
        .unwrap_err();

    assert!(matches!(err, RecommenderError::Transport(_)));
    assert!(err.to_string().contains("dns lookup failed"));
}

#[tokio::test]
async fn test_register_unstructured_failure_is_unknown() {
    let fake = FakeHttpClient::new();
    fake.reply("/user", 500, "<html>Internal Server Error</html>");
    let session = Session::in_memory();

    let err = account_client(&fake, &session)
        .register("listener@example.com")
        .await
        .unwrap_err();

    assert!(matches!(err, RecommenderError::Unknown(_)));
    assert!(err.to_string().starts_with("We don't know what went bad"));
}

#[test_log::test(tokio::test)]
async fn test_recommendation_forwards_token_and_keeps_order() {
    let fake = FakeHttpClient::new();
    fake.reply("/recommend", 200, &common::personalized_body(7));
    let token = valid_token();

    let recommender = recommendation_client(&fake)
        .fetch_recommendation(&token)
        .await
        .unwrap();

    assert!(!recommender.is_random);
    assert_eq!(recommender.recommended.name, "Obscure Polka");
    let names: Vec<_> = recommender
        .from_songs
        .iter()
        .map(|song| song.name.as_str())
        .collect();
    assert_eq!(
        names,
        ["Song 1", "Song 2", "Song 3", "Song 4", "Song 5", "Song 6", "Song 7"]
    );

    let requests = fake.requests_to("/recommend");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, format!("{BACKEND_URL}/recommend"));
    let body = requests[0].json();
    assert_eq!(body["access_token"], "BQD-access");
    assert_eq!(body["refresh_token"], "AQB-refresh");
    assert_eq!(body["expires"], token.expires);
}

#[tokio::test]
async fn test_recommendation_random_flag_is_passed_through() {
    let fake = FakeHttpClient::new();
    fake.reply("/recommend", 200, common::RANDOM_BODY);

    let recommender = recommendation_client(&fake)
        .fetch_recommendation(&valid_token())
        .await
        .unwrap();

    assert!(recommender.is_random);
    assert_eq!(recommender.recommended.name, "Random Noise");
    assert_eq!(recommender.recommended.id, "");
}

#[tokio::test]
async fn test_recommendation_structured_error_any_status() {
    let fake = FakeHttpClient::new();
    fake.reply("/recommend", 502, r#"{"detail": "Spotify is down"}"#);
    fake.reply("/recommend", 404, r#"{"detail": "No such user"}"#);
    let client = recommendation_client(&fake);

    let err = client.fetch_recommendation(&valid_token()).await.unwrap_err();
    match err {
        RecommenderError::Backend { kind, detail, .. } => {
            assert_eq!(kind, BackendErrorKind::UpstreamIntegration);
            assert_eq!(detail, "Spotify is down");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = client.fetch_recommendation(&valid_token()).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "The API says we did something bad :(. She says: No such user"
    );
}

#[tokio::test]
async fn test_recommendation_unexpected_shapes() {
    let fake = FakeHttpClient::new();
    fake.reply("/recommend", 200, r#"{"songs": []}"#);
    fake.reply("/recommend", 200, r#"{"isRandom": false, "fromSongs": []}"#);
    fake.reply("/recommend", 200, "not json at all");
    let client = recommendation_client(&fake);

    for _ in 0..3 {
        let err = client.fetch_recommendation(&valid_token()).await.unwrap_err();
        assert!(
            matches!(err, RecommenderError::UnexpectedShape),
            "unexpected error: {err:?}"
        );
    }
}

#[tokio::test]
async fn test_recommendation_null_history_is_empty() {
    let fake = FakeHttpClient::new();
    fake.reply(
        "/recommend",
        200,
        r#"{"isRandom": true, "fromSongs": null, "recommended": {"name": "Anything"}}"#,
    );

    let recommender = recommendation_client(&fake)
        .fetch_recommendation(&valid_token())
        .await
        .unwrap();

    assert!(recommender.from_songs.is_empty());
}

#[tokio::test]
async fn test_recommendation_without_backend_url_sends_nothing() {
    let fake = FakeHttpClient::new();
    let backend = BackendClient::from_config(as_http_client(&fake), &Config::default());
    let client = RecommendationClient::new(backend);

    let err = client.fetch_recommendation(&valid_token()).await.unwrap_err();

    assert!(matches!(err, RecommenderError::Config(_)));
    assert!(err.to_string().contains("Please contact them"));
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn test_recommendation_unreachable_backend() {
    let fake = FakeHttpClient::new();
    fake.fail("/recommend", "connection reset by peer");

    let err = recommendation_client(&fake)
        .fetch_recommendation(&valid_token())
        .await
        .unwrap_err();

    assert!(matches!(err, RecommenderError::Transport(_)));
    assert!(err.to_string().contains("connection reset by peer"));
    assert_eq!(fake.requests_to("/recommend").len(), 1);
}
