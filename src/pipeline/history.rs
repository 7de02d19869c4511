//! Append-only conversation log.

use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

/// One message in the conversation.  Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    role: Role,
    text: String,
    timestamp: DateTime<Local>,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Local::now(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// `HH:MM:SS` wall-clock time.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Ordered turns.  Entries are only ever appended; [`clear`](Self::clear)
/// is the sole way to remove them.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    turns: Vec<Turn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn get(&self, index: usize) -> Option<&Turn> {
        self.turns.get(index)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turns_keep_insertion_order() {
        let mut log = ConversationLog::new();
        log.push(Turn::new(Role::User, "गेहूं कब बोएं?"));
        log.push(Turn::new(Role::Assistant, "नवंबर में"));
        assert_eq!(log.len(), 2);
        assert_eq!(log.turns()[0].role(), Role::User);
        assert_eq!(log.get(1).map(Turn::text), Some("नवंबर में"));
        assert!(log.turns()[0].timestamp() <= log.turns()[1].timestamp());
    }

    #[test]
    fn time_label_is_hh_mm_ss() {
        let label = Turn::new(Role::User, "x").time_label();
        assert_eq!(label.len(), 8);
        assert_eq!(label.matches(':').count(), 2);
    }

    #[test]
    fn clear_empties_log() {
        let mut log = ConversationLog::new();
        log.push(Turn::new(Role::User, "x"));
        log.clear();
        log.clear();
        assert!(log.is_empty());
    }
}
