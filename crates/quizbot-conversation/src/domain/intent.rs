//! Classification of inbound message text.

pub use quizbot_catalog::normalize_whitespace;

use super::reply::Button;

/// Start command aliases: Telegram's bot command (optionally addressed to a
/// bot in group chats), the bare word, and VK's default "Start" button.
const START_COMMANDS: [&str; 3] = ["/start", "start", "Начать"];

/// Ends the conversation from any active state.
const DONE_COMMAND: &str = "Done";

/// What the user asked for, as far as the state machine is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Begin (or restart) the conversation.
    Start,
    /// Leave the conversation.
    Done,
    /// The "Новый вопрос" button.
    NewQuestion,
    /// The "Сдаться" button.
    Surrender,
    /// The "Мой счёт" button.
    MyScore,
    /// Free text; a solution attempt while a question is outstanding.
    Reply(String),
    /// Nothing left after normalisation.
    Empty,
}

impl Intent {
    /// Classifies raw message text. Button labels and commands must match
    /// exactly after whitespace normalisation.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let normalized = normalize_whitespace(text);
        if normalized.is_empty() {
            return Self::Empty;
        }
        if is_start_command(&normalized) {
            return Self::Start;
        }
        if normalized == DONE_COMMAND {
            return Self::Done;
        }
        match Button::from_label(&normalized) {
            Some(Button::NewQuestion) => Self::NewQuestion,
            Some(Button::Surrender) => Self::Surrender,
            Some(Button::MyScore) => Self::MyScore,
            None => Self::Reply(normalized),
        }
    }

    /// Short name for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Done => "done",
            Self::NewQuestion => "new_question",
            Self::Surrender => "surrender",
            Self::MyScore => "my_score",
            Self::Reply(_) => "reply",
            Self::Empty => "empty",
        }
    }
}

fn is_start_command(text: &str) -> bool {
    START_COMMANDS.contains(&text)
        || text
            .strip_prefix("/start@")
            .is_some_and(|bot| !bot.is_empty() && !bot.contains(' '))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recognises_start_aliases() {
        assert_eq!(Intent::parse("/start"), Intent::Start);
        assert_eq!(Intent::parse("/start@quiz_bot"), Intent::Start);
        assert_eq!(Intent::parse("start"), Intent::Start);
        assert_eq!(Intent::parse("Начать"), Intent::Start);
    }

    #[test]
    fn test_parse_recognises_buttons_with_stray_whitespace() {
        assert_eq!(Intent::parse(" Новый  вопрос\n"), Intent::NewQuestion);
        assert_eq!(Intent::parse("Сдаться"), Intent::Surrender);
        assert_eq!(Intent::parse("Мой счёт"), Intent::MyScore);
        assert_eq!(Intent::parse("Done"), Intent::Done);
    }

    #[test]
    fn test_parse_does_not_match_buttons_by_substring() {
        assert_eq!(
            Intent::parse("Новый вопрос, пожалуйста"),
            Intent::Reply("Новый вопрос, пожалуйста".to_owned())
        );
        assert_eq!(Intent::parse("/start now"), Intent::Reply("/start now".to_owned()));
    }

    #[test]
    fn test_parse_returns_normalized_reply_text() {
        assert_eq!(Intent::parse("  Пушкин \n"), Intent::Reply("Пушкин".to_owned()));
    }

    #[test]
    fn test_parse_whitespace_only_is_empty() {
        assert_eq!(Intent::parse("   "), Intent::Empty);
    }
}
