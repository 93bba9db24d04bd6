//! The top-level session: one endpoint shared by the conversation and the
//! memory form, passed explicitly into every request.

use std::sync::Arc;

use crate::client::AgentBackend;
use crate::conversation::Conversation;
use crate::endpoint::Endpoint;
use crate::memory::MemoryForm;
use crate::notice::Notifier;

pub struct Session {
    endpoint: Endpoint,
    pub conversation: Conversation,
    pub memory: MemoryForm,
}

impl Session {
    pub fn new(backend: Arc<dyn AgentBackend>, endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            conversation: Conversation::new(Arc::clone(&backend)),
            memory: MemoryForm::new(backend),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Applies to every request dispatched from now on, from both flows.
    pub fn set_endpoint(&mut self, base_url: impl Into<String>) {
        self.endpoint.set(base_url);
    }

    pub fn submit_question(&mut self, text: &str) -> bool {
        self.conversation.submit_question(&self.endpoint, text)
    }

    /// Submit the conversation's input buffer
    pub fn submit_input(&mut self) -> bool {
        self.conversation.submit(&self.endpoint)
    }

    /// Submit the memory form's current fields
    pub fn submit_memory_form(&mut self, notifier: &mut dyn Notifier) -> bool {
        self.memory.submit(&self.endpoint, notifier)
    }

    pub fn submit_memory(
        &mut self,
        issue: &str,
        solution: &str,
        notifier: &mut dyn Notifier,
    ) -> bool {
        self.memory
            .submit_memory(&self.endpoint, issue, solution, notifier)
    }

    pub fn is_busy(&self) -> bool {
        self.conversation.is_pending() || self.memory.is_pending()
    }

    /// Apply whichever requests have completed. Returns true if the
    /// transcript grew.
    pub async fn poll(&mut self, notifier: &mut dyn Notifier) -> bool {
        let before = self.conversation.len();
        self.conversation.poll(notifier).await;
        self.memory.poll(notifier).await;
        self.conversation.len() != before
    }

    /// Wait for every outstanding request and apply the results.
    pub async fn settle(&mut self, notifier: &mut dyn Notifier) {
        self.conversation.settle(notifier).await;
        self.memory.settle(notifier).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::{Notice, NoticeKind};
    use crate::testing::{FakeBackend, FakeOutcome};

    #[tokio::test]
    async fn test_new_endpoint_used_after_failed_ask() {
        let backend = FakeBackend::failing();
        let mut session = Session::new(backend.clone(), Endpoint::default());
        let mut notices: Vec<Notice> = Vec::new();

        session.submit_question("first try");
        session.settle(&mut notices).await;
        assert_eq!(notices[0].kind, NoticeKind::Connection);

        session.set_endpoint("http://example:9000");
        backend.set_outcome(FakeOutcome::Answer("R".into(), None));
        session.submit_question("second try");
        session.settle(&mut notices).await;

        let asks = backend.asks();
        assert_eq!(asks[0].0, "http://127.0.0.1:8000");
        assert_eq!(asks[1].0, "http://example:9000");
        assert_eq!(session.conversation.len(), 3);
    }

    #[tokio::test]
    async fn test_memory_uses_session_endpoint() {
        let backend = FakeBackend::answering("", None);
        let mut session = Session::new(backend.clone(), Endpoint::new("http://kb:1234"));
        let mut notices: Vec<Notice> = Vec::new();

        assert!(session.submit_memory("disk full", "restart service X", &mut notices));
        session.settle(&mut notices).await;

        assert_eq!(backend.memories()[0].0, "http://kb:1234");
        assert!(session.conversation.is_empty());
    }

    #[tokio::test]
    async fn test_flows_run_independently() {
        let (backend, gate) = FakeBackend::gated(FakeOutcome::Answer("R".into(), None));
        let mut session = Session::new(backend.clone(), Endpoint::default());
        let mut notices: Vec<Notice> = Vec::new();

        assert!(session.submit_question("question"));
        assert!(session.submit_memory("issue", "solution", &mut notices));
        assert!(session.is_busy());

        gate.add_permits(1);
        gate.add_permits(1);
        session.settle(&mut notices).await;

        assert!(!session.is_busy());
        assert_eq!(session.conversation.len(), 2);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Success);
    }

    #[tokio::test]
    async fn test_poll_reports_transcript_growth() {
        let backend = FakeBackend::answering("R", None);
        let mut session = Session::new(backend, Endpoint::default());
        let mut notices: Vec<Notice> = Vec::new();

        session.submit_question("question");
        // Let the spawned request finish
        while session.is_busy() {
            if session.poll(&mut notices).await {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(session.conversation.len(), 2);
    }
}
