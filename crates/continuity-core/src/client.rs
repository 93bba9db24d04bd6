use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::endpoint::route;
use crate::error::BackendError;

#[derive(Serialize)]
struct QueryRequest<'a> {
    question: &'a str,
}

/// Successful reply to an ask-request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AskReply {
    pub response: String,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Serialize)]
struct MemoryRequest<'a> {
    issue: &'a str,
    solution: &'a str,
}

#[derive(Deserialize)]
struct StatusReply {
    message: String,
}

/// The two operations the agent backend offers.
///
/// The base address is passed on every call so a request always targets the
/// endpoint that was current when it was dispatched.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    async fn ask(&self, base_url: &str, question: &str) -> Result<AskReply, BackendError>;

    async fn add_memory(
        &self,
        base_url: &str,
        issue: &str,
        solution: &str,
    ) -> Result<(), BackendError>;
}

/// JSON-over-HTTP client for the agent backend.
#[derive(Clone, Default)]
pub struct AgentClient {
    client: Client,
}

impl AgentClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Liveness check against the backend root route.
    pub async fn status(&self, base_url: &str) -> Result<String, BackendError> {
        let url = route(base_url, "/");
        let response = self.client.get(&url).send().await?;
        let body = success_body(response).await?;
        let reply: StatusReply = serde_json::from_str(&body)?;
        Ok(reply.message)
    }
}

#[async_trait]
impl AgentBackend for AgentClient {
    async fn ask(&self, base_url: &str, question: &str) -> Result<AskReply, BackendError> {
        let url = route(base_url, "/query");
        tracing::debug!(%url, "sending ask request");

        let response = self
            .client
            .post(&url)
            .json(&QueryRequest { question })
            .send()
            .await?;

        let body = success_body(response).await?;
        let reply: AskReply = serde_json::from_str(&body)?;
        Ok(reply)
    }

    async fn add_memory(
        &self,
        base_url: &str,
        issue: &str,
        solution: &str,
    ) -> Result<(), BackendError> {
        let url = route(base_url, "/add_memory");
        tracing::debug!(%url, "sending add-memory request");

        let response = self
            .client
            .post(&url)
            .json(&MemoryRequest { issue, solution })
            .send()
            .await?;

        // Body is not interpreted on success
        success_body(response).await?;
        Ok(())
    }
}

async fn success_body(response: Response) -> Result<String, BackendError> {
    let status = response.status();
    if !status.is_success() {
        return Err(BackendError::Status(status));
    }
    Ok(response.text().await?)
}
