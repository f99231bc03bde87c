//! Conversation views driven through `ApiClient` against a mock backend

mod common;

use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use synapse::client::ConversationBackend;
use synapse::models::MessageKind;
use synapse::session::MemoryTokenStore;
use synapse::views::{
    ChatSession, DashboardView, ExchangeOutcome, ExchangeState, HistoryView,
};

use common::{clients_for, conversation_json, CONVERSATION_ID, TOKEN};

async fn mount_conversation(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/api/ai/conversations/{}", CONVERSATION_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversation": conversation_json(CONVERSATION_ID, json!([]))
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_analyze_sends_url_and_javascript_flag() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/ai/analyze"))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .and(body_json(json!({
            "url": "https://blog.example.com",
            "useJavaScript": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary": "A blog about examples.",
            "conversationId": CONVERSATION_ID,
            "websiteTitle": "Example Blog",
            "url": "https://blog.example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (clients, _tokens) = clients_for(&server.uri(), MemoryTokenStore::with_token(TOKEN));
    let mut view = DashboardView::new();

    let analysis = view
        .analyze(&clients.api, "blog.example.com", true)
        .await
        .unwrap();
    assert_eq!(analysis.conversation_id, CONVERSATION_ID);
    assert_eq!(view.chat_target(), Some(CONVERSATION_ID));
}

#[tokio::test]
async fn test_chat_exchange_appends_question_and_answer() {
    let server = MockServer::start().await;
    mount_conversation(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("/api/ai/chat/{}", CONVERSATION_ID)))
        .and(body_json(json!({ "question": "What is this blog about?" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "It is about examples.",
            "question": "What is this blog about?",
            "conversationId": CONVERSATION_ID
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (clients, _tokens) = clients_for(&server.uri(), MemoryTokenStore::with_token(TOKEN));
    let conversation = clients.api.get_conversation(CONVERSATION_ID).await.unwrap();
    let mut session = ChatSession::new(conversation);

    let outcome = session
        .submit(&clients.api, "  What is this blog about?  ")
        .await;

    assert!(matches!(outcome, ExchangeOutcome::Answered(_)));
    let transcript = session.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].kind, MessageKind::Question);
    assert_eq!(transcript[0].content, "What is this blog about?");
    assert_eq!(transcript[1].kind, MessageKind::Answer);
    assert_eq!(transcript[1].content, "It is about examples.");
    assert_eq!(session.state(), &ExchangeState::Settled);
}

#[tokio::test]
async fn test_chat_failure_rolls_back_optimistic_question() {
    let server = MockServer::start().await;
    mount_conversation(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("/api/ai/chat/{}", CONVERSATION_ID)))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let (clients, _tokens) = clients_for(&server.uri(), MemoryTokenStore::with_token(TOKEN));
    let conversation = clients.api.get_conversation(CONVERSATION_ID).await.unwrap();
    let mut session = ChatSession::new(conversation);

    let outcome = session.submit(&clients.api, "Anything new?").await;

    assert_eq!(
        outcome,
        ExchangeOutcome::Failed("Failed to get answer".to_string())
    );
    assert!(session.transcript().is_empty());
    assert_eq!(session.last_error(), Some("Failed to get answer"));
    assert!(session.accepts_input());
}

#[tokio::test]
async fn test_whitespace_question_is_not_sent() {
    let server = MockServer::start().await;
    mount_conversation(&server).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (clients, _tokens) = clients_for(&server.uri(), MemoryTokenStore::with_token(TOKEN));
    let conversation = clients.api.get_conversation(CONVERSATION_ID).await.unwrap();
    let mut session = ChatSession::new(conversation);

    let outcome = session.submit(&clients.api, "   \t ").await;

    assert!(matches!(outcome, ExchangeOutcome::Rejected(_)));
    assert!(session.transcript().is_empty());
}

#[tokio::test]
async fn test_history_lists_in_server_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/ai/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversations": [
                conversation_json("b-second", json!([])),
                conversation_json("a-first", json!([]))
            ]
        })))
        .mount(&server)
        .await;

    let (clients, _tokens) = clients_for(&server.uri(), MemoryTokenStore::with_token(TOKEN));

    let view = HistoryView::fetch(&clients.api).await.unwrap();
    let ids: Vec<&str> = view.conversations().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["b-second", "a-first"]);
}

#[tokio::test]
async fn test_history_delete_removes_only_after_success() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/ai/conversations/keep-me"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Conversation not found" })),
        )
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/ai/conversations/drop-me"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Conversation deleted" })),
        )
        .mount(&server)
        .await;

    let (clients, _tokens) = clients_for(&server.uri(), MemoryTokenStore::with_token(TOKEN));
    let mut view = HistoryView::new(vec![
        serde_json::from_value(conversation_json("keep-me", json!([]))).unwrap(),
        serde_json::from_value(conversation_json("drop-me", json!([]))).unwrap(),
    ]);

    let err = assert_err!(view.delete(&clients.api, "keep-me").await);
    assert_eq!(err.to_string(), "Conversation not found");
    assert_eq!(view.len(), 2);
    assert_eq!(view.error(), Some("Conversation not found"));

    let message = assert_ok!(view.delete(&clients.api, "drop-me").await);
    assert_eq!(message, "Conversation deleted");
    assert_eq!(view.len(), 1);
    assert!(view.find("drop-me").is_none());
}

#[tokio::test]
async fn test_failure_without_message_uses_operation_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/ai/conversations"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let (clients, _tokens) = clients_for(&server.uri(), MemoryTokenStore::with_token(TOKEN));

    let err = clients.api.list_conversations().await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to load conversations");
}

#[tokio::test]
async fn test_conversation_id_is_percent_encoded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/ai/conversations/a%2Fb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversation": conversation_json("a/b", json!([]))
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (clients, _tokens) = clients_for(&server.uri(), MemoryTokenStore::with_token(TOKEN));

    let conversation = clients.api.get_conversation("a/b").await.unwrap();
    assert_eq!(conversation.id, "a/b");
}

#[tokio::test]
async fn test_health_check_reports_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "OK" })))
        .mount(&server)
        .await;

    let (clients, _tokens) = clients_for(&server.uri(), MemoryTokenStore::new());

    assert_eq!(clients.api.health_check().await.unwrap(), "OK");
}
