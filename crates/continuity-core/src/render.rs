//! Presentation of a single transcript entry, independent of any UI toolkit.

use crate::state::{Message, Role};

pub const USER_LABEL: &str = "You";
pub const ASSISTANT_LABEL: &str = "AI Assistant";
pub const KNOWLEDGE_LABEL: &str = "Knowledge Used";

/// What a front end needs to draw one message.
///
/// Text is split into lines on `\n` only; every other character, including
/// leading and trailing spaces, is kept verbatim and never interpreted as
/// markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage<'a> {
    pub role: Role,
    pub label: &'static str,
    pub body: Vec<&'a str>,
    /// Present iff the message carries a non-empty context
    pub knowledge: Option<Vec<&'a str>>,
}

pub fn render_message(message: &Message) -> RenderedMessage<'_> {
    let label = match message.role {
        Role::User => USER_LABEL,
        Role::Assistant => ASSISTANT_LABEL,
    };

    let knowledge = message
        .context
        .as_deref()
        .filter(|context| !context.is_empty())
        .map(split_lines);

    RenderedMessage {
        role: message.role,
        label,
        body: split_lines(&message.content),
        knowledge,
    }
}

fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}
