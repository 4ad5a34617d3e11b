/*!
 * Tests for the web service client against a mock HTTP server
 */

use std::sync::Arc;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wordbridge::errors::{ProviderError, TranslationError};
use wordbridge::providers::http::ServiceClient;
use wordbridge::providers::{AlignmentSource, TranslationRequest, Translator};
use wordbridge::session::{ReaderSession, SessionSettings};
use wordbridge::session::models::LookupSource;

use crate::common;

fn cat_request() -> TranslationRequest {
    TranslationRequest::new("cat", "en", "ru").with_context("the cat sat")
}

#[tokio::test]
async fn test_translate_withValidResponse_shouldSendTokenAndContext() {
    common::init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/translate"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({
            "text": "cat",
            "source_lang": "en",
            "target_lang": "ru",
            "context": "the cat sat"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"translated_text": "кот"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ServiceClient::new(server.uri(), "test-token");
    let result = client.translate(&cat_request()).await.unwrap();

    assert_eq!(result.text, "кот");
}

#[tokio::test]
async fn test_translate_withoutContext_shouldOmitField() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/translate"))
        .and(body_json(json!({"text": "cat", "source_lang": "en", "target_lang": "ru"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"translated_text": "кот"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ServiceClient::new(server.uri(), "");
    let result = client.translate(&TranslationRequest::new("cat", "en", "ru")).await.unwrap();
    assert_eq!(result.text, "кот");

    let received = server.received_requests().await.unwrap();
    assert!(received[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_translate_withLegacyField_shouldAcceptTranslation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/translate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"translation": "кот"})))
        .mount(&server)
        .await;

    let client = ServiceClient::new(server.uri(), "token");
    assert_eq!(client.translate(&cat_request()).await.unwrap().text, "кот");
}

#[tokio::test]
async fn test_translate_withUnauthorized_shouldReturnAuthenticationError() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/translate"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&server)
        .await;

    let client = ServiceClient::new(server.uri(), "stale");
    let result = client.translate(&cat_request()).await;

    assert_eq!(result, Err(ProviderError::AuthenticationError("token expired".to_string())));
}

#[tokio::test]
async fn test_translate_withServerError_shouldReturnApiError() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/translate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = ServiceClient::new(server.uri(), "token");
    match client.translate(&cat_request()).await {
        Err(ProviderError::ApiError { status_code, message }) => {
            assert_eq!(status_code, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("Expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_translate_withUnusableBodies_shouldReturnParseError() {
    let bodies = [
        ResponseTemplate::new(200).set_body_string("not json"),
        ResponseTemplate::new(200).set_body_json(json!({})),
        ResponseTemplate::new(200).set_body_json(json!({"translated_text": "   "})),
    ];

    for body in bodies {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/translate"))
            .respond_with(body)
            .mount(&server)
            .await;

        let client = ServiceClient::new(server.uri(), "token");
        let result = client.translate(&cat_request()).await;
        assert!(matches!(result, Err(ProviderError::ParseError(_))), "got {:?}", result);
    }
}

#[tokio::test]
async fn test_translate_withUnreachableServer_shouldReturnConnectionError() {
    let client = ServiceClient::new("http://127.0.0.1:1", "token");
    let result = client.translate(&cat_request()).await;
    assert!(matches!(result, Err(ProviderError::ConnectionError(_))), "got {:?}", result);
}

#[tokio::test]
async fn test_setCredentials_shouldUseNewTokenForNextRequest() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/translate"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"translated_text": "кот"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ServiceClient::new(server.uri(), "stale");
    client.set_credentials("fresh");
    assert!(client.translate(&cat_request()).await.is_ok());
}

#[tokio::test]
async fn test_loadAlignmentTable_withListShape_shouldKeepOrder() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/book-mapping/my%20book.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"source": "The cat sat on the mat.", "target": "Кот сидел на коврике."},
            {"source": "It was warm.", "target": "Было тепло."}
        ])))
        .mount(&server)
        .await;

    let client = ServiceClient::new(server.uri(), "token");
    let table = client.load_alignment_table("my book.pdf").await.unwrap().unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.entries()[1].target, "Было тепло.");
}

#[tokio::test]
async fn test_loadAlignmentTable_withIndexedShape_shouldOrderByKey() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/book-mapping/book"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "10": {"english": "Last.", "russian": "Последний."},
            "2": {"english": "Second.", "russian": "Второй."},
            "0": {"english": "First.", "russian": "Первый."}
        })))
        .mount(&server)
        .await;

    let client = ServiceClient::new(server.uri(), "token");
    let table = client.load_alignment_table("book").await.unwrap().unwrap();

    let sources: Vec<&str> = table.entries().iter().map(|entry| entry.source.as_str()).collect();
    assert_eq!(sources, vec!["First.", "Second.", "Last."]);
}

#[tokio::test]
async fn test_loadAlignmentTable_withNotFound_shouldReturnNone() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/book-mapping/unknown"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = ServiceClient::new(server.uri(), "token");
    assert_eq!(client.load_alignment_table("unknown").await, Ok(None));
}

#[tokio::test]
async fn test_loadAlignmentTable_withMalformedBody_shouldReturnParseError() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/book-mapping/book"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"intro": {"english": "a", "russian": "б"}})))
        .mount(&server)
        .await;

    let client = ServiceClient::new(server.uri(), "token");
    let result = client.load_alignment_table("book").await;
    assert!(matches!(result, Err(ProviderError::ParseError(_))), "got {:?}", result);
}

#[tokio::test]
async fn test_session_withServiceClient_shouldUseOracleThenTranslator() {
    common::init_logging();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/book-mapping/book"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"source": "The cat sat on the mat.", "target": "Кот сидел на коврике."}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/translate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"translated_text": "собака"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = Arc::new(ServiceClient::new(server.uri(), "token"));
    let session = ReaderSession::new(SessionSettings::default(), client.clone())
        .with_alignment_source(client);

    assert!(session.load_alignment("book").await);
    assert!(session.load_alignment("book").await);

    let oracle = session.lookup_word("cat", "The cat sat on the mat.").await.unwrap().unwrap();
    assert_eq!(oracle.source, LookupSource::Oracle);
    assert_eq!(oracle.translation, "Кот сидел на коврике.");

    let fresh = session.lookup_word("dog", "A dog barked loudly outside the house").await.unwrap().unwrap();
    assert_eq!(fresh.source, LookupSource::Translator);
    assert_eq!(fresh.translation, "собака");
}

#[tokio::test]
async fn test_session_withRejectedToken_shouldBlockUntilReset() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/translate"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/translate"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"translated_text": "кот"})))
        .expect(1)
        .mount(&server)
        .await;

    let session = ReaderSession::new(SessionSettings::default(), Arc::new(ServiceClient::new(server.uri(), "stale")));

    let first = session.lookup_word("cat", "the cat sat").await;
    assert!(matches!(first, Err(TranslationError::Auth(_))));
    assert!(session.credential_rejected());

    let blocked = session.lookup_word("cat", "the cat sat").await;
    assert_eq!(blocked, Err(TranslationError::CredentialRejected));

    session.reset_credentials("fresh");
    let lookup = session.lookup_word("cat", "the cat sat").await.unwrap().unwrap();
    assert_eq!(lookup.translation, "кот");
}
