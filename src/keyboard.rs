//! Inline keyboards and the selection payload codec
//!
//! Callback data is capped at 64 bytes by Telegram, so buttons carry catalog
//! indices (`base:2`, `sub:2:5`) rather than emotion names.

use crate::prompts;
use crate::state_machine::FormData;
use crate::taxonomy::EmotionCatalog;
use serde::Serialize;
use std::fmt;

/// Sub-emotion buttons per keyboard row
pub const SUB_ROW_SIZE: usize = 3;

/// A discrete choice made through an inline button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Open the sub-emotion picker for a base emotion
    Base(usize),
    /// Toggle a sub-emotion
    Sub { base: usize, sub: usize },
    /// Close the sub-emotion picker for this base
    DoneSub(usize),
    /// Leave the sub-emotion picker without a scope
    Back,
    /// Finish picking emotions
    Done,
    /// Deliver the summary
    Send,
}

impl Selection {
    /// Decode callback data; `None` for anything that is not a known payload
    pub fn parse(payload: &str) -> Option<Self> {
        let mut parts = payload.split(':');
        let tag = parts.next()?;
        let mut index = || parts.next()?.parse::<usize>().ok();

        let selection = match tag {
            "base" => Selection::Base(index()?),
            "sub" => {
                let base = index()?;
                let sub = index()?;
                Selection::Sub { base, sub }
            }
            "done_sub" => Selection::DoneSub(index()?),
            "back" => Selection::Back,
            "done" => Selection::Done,
            "send" => Selection::Send,
            _ => return None,
        };

        // Trailing segments mean the payload was not produced by us
        if parts.next().is_some() {
            return None;
        }
        Some(selection)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Base(i) => write!(f, "base:{i}"),
            Selection::Sub { base, sub } => write!(f, "sub:{base}:{sub}"),
            Selection::DoneSub(i) => write!(f, "done_sub:{i}"),
            Selection::Back => f.write_str("back"),
            Selection::Done => f.write_str("done"),
            Selection::Send => f.write_str("send"),
        }
    }
}

/// One inline button
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    #[serde(rename = "text")]
    pub label: String,
    #[serde(rename = "callback_data")]
    pub payload: String,
}

impl Button {
    pub fn new(label: impl Into<String>, selection: Selection) -> Self {
        Self {
            label: label.into(),
            payload: selection.to_string(),
        }
    }
}

/// Rows of inline buttons
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

#[cfg(test)]
impl Keyboard {
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }

    pub fn find(&self, selection: Selection) -> Option<&Button> {
        let payload = selection.to_string();
        self.buttons().find(|b| b.payload == payload)
    }
}

/// One row per base emotion, checked if selected, then a "Done" row
pub fn base_picker(catalog: &EmotionCatalog, form: &FormData) -> Keyboard {
    let mut rows: Vec<Vec<Button>> = catalog
        .bases()
        .iter()
        .enumerate()
        .map(|(i, base)| {
            vec![Button::new(
                prompts::base_label(&base.name, form.has_base(&base.name)),
                Selection::Base(i),
            )]
        })
        .collect();
    rows.push(vec![Button::new(prompts::DONE_LABEL, Selection::Done)]);
    Keyboard { rows }
}

/// Sub-emotions of one base, three per row, then "Back" and "Done"
pub fn sub_picker(catalog: &EmotionCatalog, base: usize, form: &FormData) -> Option<Keyboard> {
    let emotion = catalog.base(base)?;

    let buttons: Vec<Button> = emotion
        .subemotions
        .iter()
        .enumerate()
        .map(|(j, sub)| {
            Button::new(
                prompts::sub_label(sub, form.has_sub(sub)),
                Selection::Sub { base, sub: j },
            )
        })
        .collect();

    let mut rows: Vec<Vec<Button>> = buttons
        .chunks(SUB_ROW_SIZE)
        .map(<[Button]>::to_vec)
        .collect();
    rows.push(vec![
        Button::new(prompts::BACK_LABEL, Selection::Back),
        Button::new(prompts::SUB_DONE_LABEL, Selection::DoneSub(base)),
    ]);
    Some(Keyboard { rows })
}

pub fn send_control() -> Keyboard {
    Keyboard {
        rows: vec![vec![Button::new(prompts::SEND_LABEL, Selection::Send)]],
    }
}
