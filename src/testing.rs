use async_trait::async_trait;
use continuity_core::{AgentBackend, AskReply, BackendError};

/// Answers every question with the same reply and accepts every memory
pub struct CannedBackend {
    reply: AskReply,
}

impl CannedBackend {
    pub fn new(response: &str, context: Option<&str>) -> Self {
        Self {
            reply: AskReply {
                response: response.to_string(),
                context: context.map(str::to_string),
            },
        }
    }
}

#[async_trait]
impl AgentBackend for CannedBackend {
    async fn ask(&self, _base_url: &str, _question: &str) -> Result<AskReply, BackendError> {
        Ok(self.reply.clone())
    }

    async fn add_memory(&self, _base_url: &str, _issue: &str, _solution: &str) -> Result<(), BackendError> {
        Ok(())
    }
}
