//! Effects produced by state transitions

use crate::keyboard::Keyboard;

/// Effects to be executed, in order, after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Create (or overwrite) the session in its initial state
    StartSession,

    /// Persist the new session
    PersistSession,

    /// Remove the session from the store
    EndSession,

    /// Send a plain text message
    SendText { text: String },

    /// Send a message with an inline keyboard attached
    SendKeyboard { text: String, keyboard: Keyboard },
}

impl Effect {
    pub fn send_text(text: impl Into<String>) -> Self {
        Effect::SendText { text: text.into() }
    }

    pub fn send_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Effect::SendKeyboard {
            text: text.into(),
            keyboard,
        }
    }

    /// Text carried by a send effect
    #[cfg(test)]
    pub fn text(&self) -> Option<&str> {
        match self {
            Effect::SendText { text } | Effect::SendKeyboard { text, .. } => Some(text),
            _ => None,
        }
    }
}
