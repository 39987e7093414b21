//! Events that can occur in a conversation

use crate::keyboard::Selection;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The `/start` command: begin a fresh form, discarding any previous one
    Start,
    /// Free-text message
    Text { text: String },
    /// Inline keyboard button press, already acknowledged to the platform
    Select(Selection),
}

impl Event {
    #[cfg(test)]
    pub fn text(text: impl Into<String>) -> Self {
        Event::Text { text: text.into() }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Event::Start => "start",
            Event::Text { .. } => "text",
            Event::Select(_) => "selection",
        }
    }
}
