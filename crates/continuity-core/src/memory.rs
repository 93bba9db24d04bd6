//! Memory submission: teach the backend a new issue/solution pair.
//!
//! Independent of the transcript. The form keeps its own pending request and
//! its own open/closed state.

use std::sync::Arc;

use crate::client::AgentBackend;
use crate::endpoint::Endpoint;
use crate::error::{BackendError, ValidationError};
use crate::input::InputBuffer;
use crate::notice::{Notice, Notifier};
use crate::pending::PendingRequest;

const ADD_FAILED: &str = "Failed to add memory. Check your backend connection.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemoryField {
    #[default]
    Issue,
    Solution,
}

pub struct MemoryForm {
    pub issue: InputBuffer,
    pub solution: InputBuffer,
    pub focus: MemoryField,
    open: bool,
    backend: Arc<dyn AgentBackend>,
    request: PendingRequest<()>,
}

impl MemoryForm {
    pub fn new(backend: Arc<dyn AgentBackend>) -> Self {
        Self {
            issue: InputBuffer::new(),
            solution: InputBuffer::new(),
            focus: MemoryField::default(),
            open: false,
            backend,
            request: PendingRequest::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
        self.focus = MemoryField::Issue;
    }

    /// Hide the form. Entered text and any outstanding request are kept.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_pending(&self) -> bool {
        self.request.is_pending()
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            MemoryField::Issue => MemoryField::Solution,
            MemoryField::Solution => MemoryField::Issue,
        };
    }

    pub fn focused_input(&mut self) -> &mut InputBuffer {
        match self.focus {
            MemoryField::Issue => &mut self.issue,
            MemoryField::Solution => &mut self.solution,
        }
    }

    /// Fill both fields and submit them.
    pub fn submit_memory(
        &mut self,
        endpoint: &Endpoint,
        issue: &str,
        solution: &str,
        notifier: &mut dyn Notifier,
    ) -> bool {
        if self.is_pending() {
            return false;
        }
        self.issue.set(issue);
        self.solution.set(solution);
        self.submit(endpoint, notifier)
    }

    /// Validate the fields and dispatch an add-memory request.
    ///
    /// Returns true if a request was dispatched. Empty fields are rejected
    /// locally with a validation notice; nothing is sent.
    pub fn submit(&mut self, endpoint: &Endpoint, notifier: &mut dyn Notifier) -> bool {
        if self.is_pending() {
            tracing::debug!("memory submission already in flight");
            return false;
        }
        if let Err(err) = validate(self.issue.text(), self.solution.text()) {
            tracing::debug!(%err, "memory rejected");
            notifier.notify(Notice::validation(&err));
            return false;
        }

        let backend = Arc::clone(&self.backend);
        let base_url = endpoint.url().to_string();
        let issue = self.issue.text().to_string();
        let solution = self.solution.text().to_string();
        tracing::info!(endpoint = %base_url, "submitting memory");

        self.request.start(async move {
            backend.add_memory(&base_url, &issue, &solution).await
        })
    }

    pub async fn poll(&mut self, notifier: &mut dyn Notifier) -> bool {
        match self.request.poll().await {
            Some(outcome) => {
                self.resolve(outcome, notifier);
                true
            }
            None => false,
        }
    }

    pub async fn settle(&mut self, notifier: &mut dyn Notifier) -> bool {
        match self.request.settle().await {
            Some(outcome) => {
                self.resolve(outcome, notifier);
                true
            }
            None => false,
        }
    }

    fn resolve(&mut self, outcome: Result<(), BackendError>, notifier: &mut dyn Notifier) {
        match outcome {
            Ok(()) => {
                tracing::info!("memory stored");
                notifier.notify(Notice::success(
                    "Memory added successfully",
                    "The AI will now use this knowledge",
                ));
                self.issue.clear();
                self.solution.clear();
                self.close();
            }
            Err(err) => {
                // Fields stay as entered so the user can retry
                tracing::warn!(%err, "add-memory request failed");
                notifier.notify(Notice::connection(ADD_FAILED));
            }
        }
    }
}

pub fn validate(issue: &str, solution: &str) -> Result<(), ValidationError> {
    if issue.trim().is_empty() || solution.trim().is_empty() {
        return Err(ValidationError::MissingFields);
    }
    Ok(())
}
