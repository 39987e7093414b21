//! User-visible text: prompts, button labels and the final summary

use crate::state_machine::{FormData, MAX_SUB_EMOTIONS};

pub const WELCOME: &str = "Welcome! Describe the current situation:";
pub const SITUATION_PROMPT: &str = "Describe the current situation:";
pub const BASE_PROMPT: &str = "Choose your base feelings (you can pick several):";
pub const THOUGHTS_PROMPT: &str = "Now write down your thoughts about the situation:";
pub const ACTIONS_PROMPT: &str = "Now write down what you did:";
pub const SEND_PROMPT: &str = "Press \u{ab}Send to myself\u{bb} to receive the summary:";
pub const CLOSING: &str = "Summary sent! ✔️ To start over, send /start.";

pub const DONE_LABEL: &str = "Done 👌";
pub const SUB_DONE_LABEL: &str = "Done ✅";
pub const BACK_LABEL: &str = "Back to base feelings ↩️";
pub const SEND_LABEL: &str = "Send to myself 📩";

/// Telegram rejects messages longer than this, counted in UTF-16 units
pub const MAX_MESSAGE_LEN: usize = 4096;

const CHECK: &str = "✔️";

pub fn sub_prompt(base: &str) -> String {
    format!("Choose the finer feelings for \"{base}\":")
}

pub fn limit_notice() -> String {
    format!("You can select at most {MAX_SUB_EMOTIONS} sub-emotions. 🙈")
}

pub fn base_label(name: &str, checked: bool) -> String {
    if checked {
        format!("{name} {CHECK}")
    } else {
        name.to_string()
    }
}

pub fn sub_label(name: &str, checked: bool) -> String {
    if checked {
        format!("{CHECK} {name}")
    } else {
        name.to_string()
    }
}

/// Compose the final summary, one field per line
pub fn summary(form: &FormData) -> String {
    format!(
        "🟡 Situation: {}\n\
         🟣 Base emotions: {}\n\
         🟠 Sub-emotions: {}\n\
         🟢 Thoughts: {}\n\
         🔴 Actions: {}",
        form.situation,
        form.selected_base_emotions.join(", "),
        form.selected_sub_emotions.join(", "),
        form.thoughts,
        form.actions,
    )
}

/// Split text into messages of at most `limit` UTF-16 units
///
/// Breaks after the last newline that fits; a single line longer than the
/// limit is cut mid-line.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut units = 0;
    // Byte offset and unit count just past the last newline in `current`
    let mut last_break: Option<(usize, usize)> = None;

    for ch in text.chars() {
        let width = ch.len_utf16();
        while units + width > limit && !current.is_empty() {
            if let Some((at, before)) = last_break.take() {
                let rest = current.split_off(at);
                parts.push(std::mem::replace(&mut current, rest));
                units -= before;
            } else {
                parts.push(std::mem::take(&mut current));
                units = 0;
            }
        }
        current.push(ch);
        units += width;
        if ch == '\n' {
            last_break = Some((current.len(), units));
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }
    parts
}
