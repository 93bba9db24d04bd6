//! In-memory backend for engine tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::client::{AgentBackend, AskReply};
use crate::error::BackendError;

#[derive(Debug, Clone)]
pub(crate) enum FakeOutcome {
    Answer(String, Option<String>),
    Fail,
}

pub(crate) struct FakeBackend {
    asks: Mutex<Vec<(String, String)>>,
    memories: Mutex<Vec<(String, String, String)>>,
    outcome: Mutex<FakeOutcome>,
    gate: Option<Arc<Semaphore>>,
}

impl FakeBackend {
    fn with(outcome: FakeOutcome, gate: Option<Arc<Semaphore>>) -> Self {
        Self {
            asks: Mutex::new(Vec::new()),
            memories: Mutex::new(Vec::new()),
            outcome: Mutex::new(outcome),
            gate,
        }
    }

    pub(crate) fn answering(response: &str, context: Option<&str>) -> Arc<Self> {
        Arc::new(Self::with(
            FakeOutcome::Answer(response.to_string(), context.map(str::to_string)),
            None,
        ))
    }

    pub(crate) fn failing() -> Arc<Self> {
        Arc::new(Self::with(FakeOutcome::Fail, None))
    }

    /// Requests block until a permit is added to the returned gate, one per request.
    pub(crate) fn gated(outcome: FakeOutcome) -> (Arc<Self>, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        (Arc::new(Self::with(outcome, Some(gate.clone()))), gate)
    }

    pub(crate) fn set_outcome(&self, outcome: FakeOutcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    /// (base_url, question) per ask-request received
    pub(crate) fn asks(&self) -> Vec<(String, String)> {
        self.asks.lock().unwrap().clone()
    }

    /// (base_url, issue, solution) per add-memory request received
    pub(crate) fn memories(&self) -> Vec<(String, String, String)> {
        self.memories.lock().unwrap().clone()
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
    }

    fn current_outcome(&self) -> FakeOutcome {
        self.outcome.lock().unwrap().clone()
    }
}

fn unavailable() -> BackendError {
    BackendError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE)
}

#[async_trait]
impl AgentBackend for FakeBackend {
    async fn ask(&self, base_url: &str, question: &str) -> Result<AskReply, BackendError> {
        self.asks
            .lock()
            .unwrap()
            .push((base_url.to_string(), question.to_string()));
        self.wait_for_gate().await;

        match self.current_outcome() {
            FakeOutcome::Answer(response, context) => Ok(AskReply { response, context }),
            FakeOutcome::Fail => Err(unavailable()),
        }
    }

    async fn add_memory(
        &self,
        base_url: &str,
        issue: &str,
        solution: &str,
    ) -> Result<(), BackendError> {
        self.memories.lock().unwrap().push((
            base_url.to_string(),
            issue.to_string(),
            solution.to_string(),
        ));
        self.wait_for_gate().await;

        match self.current_outcome() {
            FakeOutcome::Answer(..) => Ok(()),
            FakeOutcome::Fail => Err(unavailable()),
        }
    }
}
