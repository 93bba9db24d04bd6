//! Conversation engine: the transcript and the ask-request lifecycle.

use std::sync::Arc;

use crate::client::{AgentBackend, AskReply};
use crate::endpoint::Endpoint;
use crate::error::BackendError;
use crate::input::InputBuffer;
use crate::notice::{Notice, Notifier};
use crate::pending::PendingRequest;
use crate::state::Message;

const ASK_FAILED: &str = "Failed to get AI response. Check your backend connection.";

pub struct Conversation {
    messages: Vec<Message>,
    pub input: InputBuffer,
    backend: Arc<dyn AgentBackend>,
    request: PendingRequest<AskReply>,
}

impl Conversation {
    pub fn new(backend: Arc<dyn AgentBackend>) -> Self {
        Self {
            messages: Vec::new(),
            input: InputBuffer::new(),
            backend,
            request: PendingRequest::new(),
        }
    }

    /// The transcript, in conversation order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn is_pending(&self) -> bool {
        self.request.is_pending()
    }

    /// Submit whatever is in the input buffer.
    pub fn submit(&mut self, endpoint: &Endpoint) -> bool {
        let text = self.input.text().to_string();
        self.submit_question(endpoint, &text)
    }

    /// Append the question to the transcript and dispatch an ask-request.
    ///
    /// Blank text, or a call while another ask is outstanding, does nothing and
    /// returns false. Otherwise the user message is committed before the
    /// request is spawned and stays in the transcript whatever the outcome.
    pub fn submit_question(&mut self, endpoint: &Endpoint, text: &str) -> bool {
        if text.trim().is_empty() {
            tracing::debug!("blank question, ignoring submission");
            return false;
        }
        if self.is_pending() {
            tracing::debug!("ask already in flight, ignoring submission");
            return false;
        }

        self.messages.push(Message::user(text));
        self.input.clear();

        let backend = Arc::clone(&self.backend);
        let base_url = endpoint.url().to_string();
        let question = text.to_string();
        tracing::info!(endpoint = %base_url, "dispatching question");

        self.request
            .start(async move { backend.ask(&base_url, &question).await })
    }

    /// Apply the reply if the outstanding ask has finished. Returns true if the
    /// request resolved.
    pub async fn poll(&mut self, notifier: &mut dyn Notifier) -> bool {
        match self.request.poll().await {
            Some(outcome) => {
                self.resolve(outcome, notifier);
                true
            }
            None => false,
        }
    }

    /// Wait for the outstanding ask, if any, and apply its reply.
    pub async fn settle(&mut self, notifier: &mut dyn Notifier) -> bool {
        match self.request.settle().await {
            Some(outcome) => {
                self.resolve(outcome, notifier);
                true
            }
            None => false,
        }
    }

    fn resolve(&mut self, outcome: Result<AskReply, BackendError>, notifier: &mut dyn Notifier) {
        match outcome {
            Ok(reply) => {
                // An empty response is kept as-is
                tracing::info!(has_context = reply.context.is_some(), "answer received");
                self.messages
                    .push(Message::assistant(reply.response, reply.context));
            }
            Err(err) => {
                tracing::warn!(%err, "ask request failed");
                notifier.notify(Notice::connection(ASK_FAILED));
            }
        }
    }
}
