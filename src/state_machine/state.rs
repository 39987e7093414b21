//! Conversation state types

use std::fmt;

/// Telegram chat identifier; one conversation per chat
pub type ChatId = i64;

/// Maximum number of sub-emotions a single form may hold
pub const MAX_SUB_EMOTIONS: usize = 15;

// ============================================================================
// Step
// ============================================================================

/// Position in the form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Step {
    /// Waiting for the situation description
    #[default]
    AwaitingSituation,

    /// Base emotion picker is open
    SelectingBaseEmotions,

    /// Sub-emotion picker is open for one base emotion
    SelectingSubEmotions { base: String },

    /// Waiting for the thoughts text
    AwaitingThoughts,

    /// Waiting for the actions text
    AwaitingActions,

    /// Form complete, only the send control is live
    ReadyToSend,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::AwaitingSituation => "awaiting_situation",
            Step::SelectingBaseEmotions => "selecting_base_emotions",
            Step::SelectingSubEmotions { .. } => "selecting_sub_emotions",
            Step::AwaitingThoughts => "awaiting_thoughts",
            Step::AwaitingActions => "awaiting_actions",
            Step::ReadyToSend => "ready_to_send",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::SelectingSubEmotions { base } => write!(f, "{}({base})", self.name()),
            _ => f.write_str(self.name()),
        }
    }
}

// ============================================================================
// Form data
// ============================================================================

/// Outcome of toggling a sub-emotion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubToggle {
    Added,
    Removed,
    /// Adding would exceed [`MAX_SUB_EMOTIONS`]; nothing changed
    LimitReached,
}

/// Answers collected so far
///
/// Sub-emotions are a flat list of labels shared across all base emotions:
/// identical labels under two different bases are the same selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormData {
    pub situation: String,
    /// Base emotions in order of first selection
    pub selected_base_emotions: Vec<String>,
    /// Sub-emotion labels in order of selection
    pub selected_sub_emotions: Vec<String>,
    pub thoughts: String,
    pub actions: String,
}

impl FormData {
    pub fn has_base(&self, name: &str) -> bool {
        self.selected_base_emotions.iter().any(|b| b == name)
    }

    pub fn has_sub(&self, label: &str) -> bool {
        self.selected_sub_emotions.iter().any(|s| s == label)
    }

    /// Record a base emotion; returns false if it was already selected
    pub fn select_base(&mut self, name: &str) -> bool {
        if self.has_base(name) {
            return false;
        }
        self.selected_base_emotions.push(name.to_string());
        true
    }

    /// Flip membership of a sub-emotion, respecting the selection cap
    pub fn toggle_sub(&mut self, label: &str) -> SubToggle {
        if let Some(pos) = self.selected_sub_emotions.iter().position(|s| s == label) {
            self.selected_sub_emotions.remove(pos);
            return SubToggle::Removed;
        }
        if self.selected_sub_emotions.len() >= MAX_SUB_EMOTIONS {
            return SubToggle::LimitReached;
        }
        self.selected_sub_emotions.push(label.to_string());
        SubToggle::Added
    }
}

// ============================================================================
// Session
// ============================================================================

/// Per-chat record of form answers and position
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub step: Step,
    pub form: FormData,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }
}
