//! Conversation state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! `transition` maps the current session and an inbound event to the next
//! session plus the effects the runtime must carry out.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{ChatId, FormData, Session, Step, SubToggle, MAX_SUB_EMOTIONS};
pub use transition::transition;
