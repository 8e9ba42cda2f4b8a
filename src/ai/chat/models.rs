//! The core models for managing a stateful chat with Gemini.
use serde::{Deserialize, Serialize};

use crate::gemini::{Content, Role};

/// One recorded exchange unit in the conversation.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn new(role: Role, text: &str) -> Self {
        Self {
            role,
            text: text.to_string(),
        }
    }
}

impl From<&Turn> for Content {
    fn from(turn: &Turn) -> Self {
        Content::new(turn.role, &turn.text)
    }
}

/// How much of the transcript gets sent with each request. The
/// transcript itself is never trimmed, only the payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HistoryWindow {
    /// Resend every turn on every call
    #[default]
    Unbounded,
    /// Send the first turn (the personality) plus the most recent `n`
    /// turns after it
    MaxTurns(usize),
}

/// Ordered, append-only record of the conversation.
///
/// Turns are only ever removed by `clear`. When the transcript is
/// empty, `set_personality` is remembered and used to seed the first
/// turn on the next call.
#[derive(Default, Debug)]
pub struct Transcript {
    turns: Vec<Turn>,
    pending_personality: Option<String>,
}

impl Transcript {
    pub fn new_with_turns(turns: Vec<Turn>) -> Self {
        Self {
            turns,
            pending_personality: None,
        }
    }

    pub fn append(&mut self, role: Role, text: &str) {
        self.turns.push(Turn::new(role, text))
    }

    pub fn clear(&mut self) {
        self.turns.clear()
    }

    /// Overwrites the text of the first turn in place, whatever its
    /// role. On an empty transcript the value is held until the next
    /// `seed`.
    pub fn set_personality(&mut self, text: &str) {
        match self.turns.first_mut() {
            Some(first) => first.text = text.to_string(),
            None => self.pending_personality = Some(text.to_string()),
        }
    }

    pub fn pending_personality(&self) -> Option<&str> {
        self.pending_personality.as_deref()
    }

    /// Seeds the personality turn if the transcript is empty. Returns
    /// true when a turn was added.
    pub fn seed(&mut self, personality: &str) -> bool {
        if !self.is_empty() {
            return false;
        }
        self.append(Role::Model, personality);
        true
    }

    pub fn snapshot(&self) -> &[Turn] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub(crate) fn pop(&mut self) -> Option<Turn> {
        self.turns.pop()
    }

    /// The turns to send for the given window, in order.
    pub fn window(&self, window: HistoryWindow) -> Vec<&Turn> {
        match window {
            HistoryWindow::Unbounded => self.turns.iter().collect(),
            HistoryWindow::MaxTurns(n) => {
                let Some((first, rest)) = self.turns.split_first() else {
                    return Vec::new();
                };
                let skip = rest.len().saturating_sub(n);
                std::iter::once(first).chain(rest.iter().skip(skip)).collect()
            }
        }
    }
}
