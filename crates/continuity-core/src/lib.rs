pub mod client;
pub mod conversation;
pub mod endpoint;
pub mod error;
pub mod input;
pub mod memory;
pub mod notice;
pub mod pending;
pub mod render;
pub mod session;
pub mod state;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use client::{AgentBackend, AgentClient, AskReply};
pub use conversation::Conversation;
pub use endpoint::{Endpoint, DEFAULT_ENDPOINT};
pub use error::{BackendError, ValidationError};
pub use input::InputBuffer;
pub use memory::{MemoryField, MemoryForm};
pub use notice::{Notice, NoticeKind, Notifier};
pub use pending::PendingRequest;
pub use render::{render_message, RenderedMessage, ASSISTANT_LABEL, KNOWLEDGE_LABEL, USER_LABEL};
pub use session::Session;
pub use state::{Message, Role};
