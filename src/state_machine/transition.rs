//! Pure state transition function
//!
//! Given the current session (if any), the catalog and an inbound event,
//! computes the next session and the effects to execute. No I/O happens here.

use super::{Effect, Event, Session, Step, SubToggle};
use crate::keyboard::{self, Selection};
use crate::prompts;
use crate::taxonomy::EmotionCatalog;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    /// The session after the transition; `None` once it has ended
    pub new_session: Option<Session>,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: Option<Session>) -> Self {
        Self {
            new_session: session,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Reasons an event is dropped without any change
///
/// None of these are shown to the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("No active session")]
    NoSession,
    #[error("{event} not accepted in step {step}")]
    NotAccepted {
        step: &'static str,
        event: &'static str,
    },
    #[error("Unknown base emotion index {0}")]
    UnknownBase(usize),
    #[error("Unknown sub-emotion {sub} of base emotion index {base}")]
    UnknownSub { base: usize, sub: usize },
    #[error("Selection for {selected:?} while picking sub-emotions of {current:?}")]
    ScopeMismatch { selected: String, current: String },
}

/// Pure transition function
pub fn transition(
    session: Option<&Session>,
    catalog: &EmotionCatalog,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (session, event) {
        // /start is valid from anywhere and discards whatever was there
        (_, Event::Start) => Ok(TransitionResult::new(Some(Session::new()))
            .with_effect(Effect::StartSession)
            .with_effect(Effect::send_text(prompts::WELCOME))),
        (None, _) => Err(TransitionError::NoSession),
        (Some(session), Event::Text { text }) => handle_text(session, catalog, &text),
        (Some(session), Event::Select(selection)) => {
            handle_selection(session, catalog, selection)
        }
    }
}

// ============================================================
// Free text
// ============================================================

fn handle_text(
    session: &Session,
    catalog: &EmotionCatalog,
    text: &str,
) -> Result<TransitionResult, TransitionError> {
    let prompt = match session.step {
        Step::AwaitingSituation => prompts::SITUATION_PROMPT,
        Step::AwaitingThoughts => prompts::THOUGHTS_PROMPT,
        Step::AwaitingActions => prompts::ACTIONS_PROMPT,
        _ => {
            return Err(TransitionError::NotAccepted {
                step: session.step.name(),
                event: "text",
            })
        }
    };

    let text = text.trim();
    if text.is_empty() {
        // Re-issue the same prompt, stay put
        return Ok(TransitionResult::new(Some(session.clone()))
            .with_effect(Effect::send_text(prompt)));
    }

    let mut next = session.clone();
    let render = match session.step {
        Step::AwaitingSituation => {
            next.form.situation = text.to_string();
            next.step = Step::SelectingBaseEmotions;
            Effect::send_keyboard(
                prompts::BASE_PROMPT,
                keyboard::base_picker(catalog, &next.form),
            )
        }
        Step::AwaitingThoughts => {
            next.form.thoughts = text.to_string();
            next.step = Step::AwaitingActions;
            Effect::send_text(prompts::ACTIONS_PROMPT)
        }
        // Only AwaitingActions remains after the prompt match above
        _ => {
            next.form.actions = text.to_string();
            next.step = Step::ReadyToSend;
            Effect::send_keyboard(prompts::SEND_PROMPT, keyboard::send_control())
        }
    };

    Ok(TransitionResult::new(Some(next))
        .with_effect(Effect::PersistSession)
        .with_effect(render))
}

// ============================================================
// Selections
// ============================================================

fn handle_selection(
    session: &Session,
    catalog: &EmotionCatalog,
    selection: Selection,
) -> Result<TransitionResult, TransitionError> {
    match (&session.step, selection) {
        // Base picker: open the sub-emotion picker for the chosen base
        (Step::SelectingBaseEmotions, Selection::Base(index)) => {
            let base = catalog
                .base(index)
                .ok_or(TransitionError::UnknownBase(index))?;

            let mut next = session.clone();
            next.form.select_base(&base.name);
            next.step = Step::SelectingSubEmotions {
                base: base.name.clone(),
            };
            let render = sub_picker_effect(catalog, index, &next)?;

            Ok(TransitionResult::new(Some(next))
                .with_effect(Effect::PersistSession)
                .with_effect(render))
        }

        (Step::SelectingBaseEmotions, Selection::Done) => {
            let mut next = session.clone();
            next.step = Step::AwaitingThoughts;
            Ok(TransitionResult::new(Some(next))
                .with_effect(Effect::PersistSession)
                .with_effect(Effect::send_text(prompts::THOUGHTS_PROMPT)))
        }

        // Sub picker: toggle, re-render with fresh checkmarks
        (Step::SelectingSubEmotions { base: current }, Selection::Sub { base, sub }) => {
            let (base_name, label) = catalog
                .sub(base, sub)
                .ok_or(TransitionError::UnknownSub { base, sub })?;
            check_scope(current, base_name)?;

            let mut next = session.clone();
            match next.form.toggle_sub(label) {
                SubToggle::LimitReached => Ok(TransitionResult::new(Some(session.clone()))
                    .with_effect(Effect::send_text(prompts::limit_notice()))),
                SubToggle::Added | SubToggle::Removed => {
                    let render = sub_picker_effect(catalog, base, &next)?;
                    Ok(TransitionResult::new(Some(next))
                        .with_effect(Effect::PersistSession)
                        .with_effect(render))
                }
            }
        }

        (Step::SelectingSubEmotions { .. }, Selection::Back) => {
            Ok(back_to_base(session, catalog))
        }

        (Step::SelectingSubEmotions { base: current }, Selection::DoneSub(index)) => {
            let base = catalog
                .base(index)
                .ok_or(TransitionError::UnknownBase(index))?;
            check_scope(current, &base.name)?;
            Ok(back_to_base(session, catalog))
        }

        // Final confirmation: summary, end session, closing note
        (Step::ReadyToSend, Selection::Send) => {
            let summary = prompts::summary(&session.form);
            let result = prompts::split_message(&summary, prompts::MAX_MESSAGE_LEN)
                .into_iter()
                .fold(TransitionResult::new(None), |result, part| {
                    result.with_effect(Effect::send_text(part))
                });
            Ok(result
                .with_effect(Effect::EndSession)
                .with_effect(Effect::send_text(prompts::CLOSING)))
        }

        (step, _) => Err(TransitionError::NotAccepted {
            step: step.name(),
            event: "selection",
        }),
    }
}

fn back_to_base(session: &Session, catalog: &EmotionCatalog) -> TransitionResult {
    let mut next = session.clone();
    next.step = Step::SelectingBaseEmotions;
    let render = Effect::send_keyboard(
        prompts::BASE_PROMPT,
        keyboard::base_picker(catalog, &next.form),
    );
    TransitionResult::new(Some(next))
        .with_effect(Effect::PersistSession)
        .with_effect(render)
}

fn sub_picker_effect(
    catalog: &EmotionCatalog,
    base: usize,
    session: &Session,
) -> Result<Effect, TransitionError> {
    let emotion = catalog.base(base).ok_or(TransitionError::UnknownBase(base))?;
    let keyboard = keyboard::sub_picker(catalog, base, &session.form)
        .ok_or(TransitionError::UnknownBase(base))?;
    Ok(Effect::send_keyboard(prompts::sub_prompt(&emotion.name), keyboard))
}

fn check_scope(current: &str, selected: &str) -> Result<(), TransitionError> {
    if current == selected {
        Ok(())
    } else {
        Err(TransitionError::ScopeMismatch {
            selected: selected.to_string(),
            current: current.to_string(),
        })
    }
}
