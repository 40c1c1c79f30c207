use crate::domain::{ChatId, MemberId, MessageRef};

/// Who triggered an inbound event, as reported by the platform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub id: MemberId,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub language_code: Option<String>,
}

impl Actor {
    /// Minimal actor with only an id; handy for admin-driven flows and tests.
    pub fn new(id: MemberId) -> Self {
        Self {
            id,
            username: None,
            first_name: String::new(),
            last_name: None,
            language_code: None,
        }
    }

    pub fn chat(&self) -> ChatId {
        self.id.chat()
    }

    /// Name from the platform profile (used by the admin to cross-check registrations).
    pub fn display_name(&self) -> String {
        let last = self.last_name.as_deref().unwrap_or("");
        format!("{} {}", self.first_name, last).trim().to_string()
    }
}

/// Cross-messenger incoming update model.
///
/// Telegram-specific fields live in the Telegram adapter.
#[derive(Clone, Debug)]
pub enum IncomingUpdate {
    Command(Command),
    Text(TextMessage),
    Callback(CallbackQuery),
}

#[derive(Clone, Debug)]
pub struct Command {
    pub actor: Actor,
    /// Lowercased name without the leading `/` or `@botname` suffix.
    pub name: String,
    pub args: String,
}

#[derive(Clone, Debug)]
pub struct TextMessage {
    pub actor: Actor,
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct CallbackQuery {
    pub actor: Actor,
    pub callback_id: String,
    pub data: String,
    /// The message carrying the pressed button, when the platform still has it.
    pub message: Option<MessageRef>,
}

/// Inline keyboard (rows of buttons).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub callback_data: String,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            callback_data: callback_data.into(),
        }
    }
}

impl InlineKeyboard {
    pub fn single(button: InlineButton) -> Self {
        Self {
            rows: vec![vec![button]],
        }
    }

    /// All buttons side by side.
    pub fn row(buttons: Vec<InlineButton>) -> Self {
        Self {
            rows: vec![buttons],
        }
    }

    /// Convenience for "one button per row" layouts.
    pub fn one_per_row(buttons: Vec<InlineButton>) -> Self {
        Self {
            rows: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }

    pub fn buttons(&self) -> impl Iterator<Item = &InlineButton> {
        self.rows.iter().flatten()
    }
}

/// Limits of a messenger implementation.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    /// Longest outbound text, in characters.
    pub max_message_len: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_skips_missing_last_name() {
        let mut a = Actor::new(MemberId(1));
        a.first_name = "Olena".to_string();
        assert_eq!(a.display_name(), "Olena");
        a.last_name = Some("Petrenko".to_string());
        assert_eq!(a.display_name(), "Olena Petrenko");
    }

    #[test]
    fn one_per_row_layout() {
        let kb = InlineKeyboard::one_per_row(vec![
            InlineButton::new("a", "select:1"),
            InlineButton::new("b", "select:2"),
        ]);
        assert_eq!(kb.rows.len(), 2);
        assert_eq!(kb.buttons().count(), 2);
    }
}
