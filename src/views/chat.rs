//! Chat exchange state machine
//!
//! A [`ChatSession`] owns the local copy of a conversation and runs one
//! question/answer exchange at a time:
//!
//! ```text
//! Idle ──begin──▶ Pending ──settle(Ok)──▶ Settled
//!                    │
//!                    └────settle(Err)──▶ RolledBack
//! ```
//!
//! The question is appended to the transcript as soon as the exchange
//! starts. If the backend call fails, exactly that entry is removed again,
//! so the transcript only ever grows by whole (question, answer) pairs.

use crate::client::ConversationBackend;
use crate::error::{user_message, Result};
use crate::models::{ChatResponse, Conversation, Message};

/// Message surfaced when an exchange fails for a non-business reason
pub const ANSWER_FAILED_MESSAGE: &str = "Failed to get answer";

/// State of the current (or last) exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeState {
    /// Nothing has been asked yet
    Idle,
    /// A question is in flight; its optimistic entry sits at `index`
    Pending {
        /// The trimmed question text
        question: String,
        /// Transcript position of the optimistic question
        index: usize,
    },
    /// The last exchange was answered
    Settled,
    /// The last exchange failed and its question was removed
    RolledBack {
        /// Message shown to the user
        error: String,
    },
}

/// Why a submission did not start an exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The input was empty or whitespace only
    Empty,
    /// Another exchange is still pending
    Busy,
}

/// An exchange that has been started and awaits the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingExchange {
    /// Conversation the question belongs to
    pub conversation_id: String,
    /// The trimmed question text
    pub question: String,
}

/// Result of [`ChatSession::begin`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Nothing changed
    Rejected(RejectReason),
    /// The question was appended; send it to the backend
    Started(PendingExchange),
}

/// Result of a complete exchange
#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeOutcome {
    /// The submission was rejected before any network call
    Rejected(RejectReason),
    /// The answer was appended to the transcript
    Answered(Message),
    /// The exchange was rolled back; the message is shown to the user
    Failed(String),
}

/// Local view of one conversation with a single-flight exchange
#[derive(Debug, Clone)]
pub struct ChatSession {
    conversation: Conversation,
    state: ExchangeState,
}

impl ChatSession {
    /// Start a session on a conversation fetched from the backend
    pub fn new(conversation: Conversation) -> Self {
        Self {
            conversation,
            state: ExchangeState::Idle,
        }
    }

    /// The conversation as currently displayed
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// The transcript, including an optimistic question while pending
    pub fn transcript(&self) -> &[Message] {
        &self.conversation.messages
    }

    /// Current exchange state
    pub fn state(&self) -> &ExchangeState {
        &self.state
    }

    /// Whether an exchange is in flight
    pub fn is_pending(&self) -> bool {
        matches!(self.state, ExchangeState::Pending { .. })
    }

    /// Whether new input would be accepted
    pub fn accepts_input(&self) -> bool {
        !self.is_pending()
    }

    /// Error from the last failed exchange, until the next one starts
    pub fn last_error(&self) -> Option<&str> {
        match &self.state {
            ExchangeState::RolledBack { error } => Some(error),
            _ => None,
        }
    }

    /// Start an exchange
    ///
    /// Whitespace-only input and input while pending are rejected without
    /// touching the transcript. Otherwise the trimmed question is appended
    /// and the session enters `Pending`.
    pub fn begin(&mut self, input: &str) -> Submission {
        if self.is_pending() {
            tracing::debug!("Ignoring submission while an exchange is pending");
            return Submission::Rejected(RejectReason::Busy);
        }

        let question = input.trim();
        if question.is_empty() {
            return Submission::Rejected(RejectReason::Empty);
        }

        self.conversation.messages.push(Message::question(question));
        self.state = ExchangeState::Pending {
            question: question.to_string(),
            index: self.conversation.messages.len() - 1,
        };

        Submission::Started(PendingExchange {
            conversation_id: self.conversation.id.clone(),
            question: question.to_string(),
        })
    }

    /// Resolve the pending exchange with the backend's result
    ///
    /// Returns `None` (and changes nothing) when no exchange is pending.
    pub fn settle(&mut self, result: Result<ChatResponse>) -> Option<ExchangeOutcome> {
        let index = match &self.state {
            ExchangeState::Pending { index, .. } => *index,
            _ => return None,
        };
        Some(self.resolve(index, result))
    }

    /// Run a whole exchange against `backend`
    pub async fn submit(
        &mut self,
        backend: &dyn ConversationBackend,
        input: &str,
    ) -> ExchangeOutcome {
        let pending = match self.begin(input) {
            Submission::Rejected(reason) => return ExchangeOutcome::Rejected(reason),
            Submission::Started(pending) => pending,
        };

        let index = self.conversation.messages.len() - 1;
        let result = backend
            .ask_question(&pending.conversation_id, &pending.question)
            .await;
        self.resolve(index, result)
    }

    fn resolve(&mut self, index: usize, result: Result<ChatResponse>) -> ExchangeOutcome {
        match result {
            Ok(response) => {
                let answer = Message::answer(response.answer);
                self.conversation.messages.push(answer.clone());
                self.state = ExchangeState::Settled;
                ExchangeOutcome::Answered(answer)
            }
            Err(e) => {
                tracing::warn!(
                    "Question in conversation {} failed: {}",
                    self.conversation.id,
                    e
                );
                self.conversation.messages.truncate(index);
                let error = user_message(&e, ANSWER_FAILED_MESSAGE);
                self.state = ExchangeState::RolledBack {
                    error: error.clone(),
                };
                ExchangeOutcome::Failed(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SynapseError, SESSION_EXPIRED_MESSAGE};
    use crate::models::{AnalysisResponse, MessageKind};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Backend answering `ask_question` from a script
    struct ScriptedBackend {
        replies: Mutex<Vec<std::result::Result<String, SynapseError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<std::result::Result<String, SynapseError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ConversationBackend for ScriptedBackend {
        async fn analyze_website(&self, _: &str, _: bool) -> Result<AnalysisResponse> {
            unimplemented!()
        }

        async fn ask_question(&self, conversation_id: &str, question: &str) -> Result<ChatResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let reply = self.replies.lock().unwrap().remove(0);
            reply
                .map(|answer| ChatResponse {
                    answer,
                    question: question.to_string(),
                    conversation_id: conversation_id.to_string(),
                })
                .map_err(Into::into)
        }

        async fn list_conversations(&self) -> Result<Vec<Conversation>> {
            unimplemented!()
        }

        async fn get_conversation(&self, _: &str) -> Result<Conversation> {
            unimplemented!()
        }

        async fn delete_conversation(&self, _: &str) -> Result<String> {
            unimplemented!()
        }
    }

    fn conversation() -> Conversation {
        Conversation {
            id: "conv-1".to_string(),
            url: "https://blog.example.com".to_string(),
            website_title: "Example Blog".to_string(),
            summary: "A personal blog.".to_string(),
            created_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    fn server_error() -> SynapseError {
        SynapseError::Api {
            status: 500,
            message: "Internal server error".to_string(),
        }
    }

    #[tokio::test]
    async fn test_successful_exchange_appends_question_then_answer() {
        let backend = ScriptedBackend::new(vec![Ok("It's a blog.".to_string())]);
        let mut session = ChatSession::new(conversation());

        let outcome = session.submit(&backend, "What is this site about?").await;

        assert!(matches!(outcome, ExchangeOutcome::Answered(_)));
        let t = session.transcript();
        assert_eq!(t.len(), 2);
        assert_eq!(t[0].kind, MessageKind::Question);
        assert_eq!(t[0].content, "What is this site about?");
        assert_eq!(t[1].kind, MessageKind::Answer);
        assert_eq!(t[1].content, "It's a blog.");
        assert_eq!(session.state(), &ExchangeState::Settled);
        assert!(session.last_error().is_none());
    }

    #[tokio::test]
    async fn test_failed_exchange_rolls_back() {
        let backend = ScriptedBackend::new(vec![Err(server_error())]);
        let mut session = ChatSession::new(conversation());

        let outcome = session.submit(&backend, "What is this site about?").await;

        assert_eq!(
            outcome,
            ExchangeOutcome::Failed("Internal server error".to_string())
        );
        assert!(session.transcript().is_empty());
        assert_eq!(session.last_error(), Some("Internal server error"));
        assert!(session.accepts_input());
    }

    #[tokio::test]
    async fn test_failure_keeps_earlier_exchanges() {
        let backend = ScriptedBackend::new(vec![Ok("First".to_string()), Err(server_error())]);
        let mut session = ChatSession::new(conversation());

        session.submit(&backend, "one").await;
        let before = session.transcript().to_vec();
        session.submit(&backend, "two").await;

        assert_eq!(session.transcript(), before.as_slice());
    }

    #[tokio::test]
    async fn test_network_failure_uses_generic_message() {
        let backend = ScriptedBackend::new(vec![Err(SynapseError::Network(
            "connection refused".to_string(),
        ))]);
        let mut session = ChatSession::new(conversation());

        let outcome = session.submit(&backend, "hello").await;

        assert_eq!(
            outcome,
            ExchangeOutcome::Failed(ANSWER_FAILED_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_unauthorized_failure_rolls_back_with_session_message() {
        let backend = ScriptedBackend::new(vec![Err(SynapseError::Unauthorized(
            SESSION_EXPIRED_MESSAGE.to_string(),
        ))]);
        let mut session = ChatSession::new(conversation());

        session.submit(&backend, "hello").await;

        assert!(session.transcript().is_empty());
        assert_eq!(session.last_error(), Some(SESSION_EXPIRED_MESSAGE));
    }

    #[tokio::test]
    async fn test_whitespace_input_never_calls_backend() {
        let backend = ScriptedBackend::new(vec![]);
        let mut session = ChatSession::new(conversation());

        for input in ["", "   ", "\n\t "] {
            let outcome = session.submit(&backend, input).await;
            assert_eq!(outcome, ExchangeOutcome::Rejected(RejectReason::Empty));
        }

        assert_eq!(backend.calls(), 0);
        assert!(session.transcript().is_empty());
        assert_eq!(session.state(), &ExchangeState::Idle);
    }

    #[test]
    fn test_input_is_trimmed() {
        let mut session = ChatSession::new(conversation());
        let submission = session.begin("  why?  ");
        assert_eq!(
            submission,
            Submission::Started(PendingExchange {
                conversation_id: "conv-1".to_string(),
                question: "why?".to_string(),
            })
        );
        assert_eq!(session.transcript()[0].content, "why?");
    }

    #[test]
    fn test_submit_while_pending_is_noop() {
        let mut session = ChatSession::new(conversation());
        assert!(matches!(session.begin("first"), Submission::Started(_)));
        let state_before = session.state().clone();

        assert_eq!(
            session.begin("second"),
            Submission::Rejected(RejectReason::Busy)
        );
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.state(), &state_before);
        assert!(!session.accepts_input());
    }

    #[test]
    fn test_settle_without_pending_is_noop() {
        let mut session = ChatSession::new(conversation());
        let outcome = session.settle(Ok(ChatResponse {
            answer: "stray".to_string(),
            question: String::new(),
            conversation_id: String::new(),
        }));
        assert!(outcome.is_none());
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn test_begin_then_settle_error_nets_to_zero() {
        let mut conv = conversation();
        conv.messages.push(Message::question("old"));
        conv.messages.push(Message::answer("older answer"));
        let mut session = ChatSession::new(conv);

        session.begin("new");
        assert_eq!(session.transcript().len(), 3);
        session.settle(Err(server_error().into()));

        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.transcript()[1].content, "older answer");
    }

    #[test]
    fn test_new_exchange_clears_previous_error() {
        let mut session = ChatSession::new(conversation());
        session.begin("a");
        session.settle(Err(server_error().into()));
        assert!(session.last_error().is_some());

        session.begin("b");
        assert!(session.last_error().is_none());
        assert!(session.is_pending());
    }
}
