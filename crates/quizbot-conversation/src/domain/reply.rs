//! Outbound messages and the platform-neutral keyboard model.

/// A reply keyboard button. Labels double as the inbound text the button
/// sends back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Request a new question.
    NewQuestion,
    /// Report the current score.
    MyScore,
    /// Give up on the outstanding question.
    Surrender,
}

impl Button {
    /// The button caption.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::NewQuestion => "Новый вопрос",
            Self::MyScore => "Мой счёт",
            Self::Surrender => "Сдаться",
        }
    }

    /// Resolves a caption back to its button.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        [Self::NewQuestion, Self::MyScore, Self::Surrender]
            .into_iter()
            .find(|button| button.label() == label)
    }
}

/// Keyboard attached to an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Show these buttons.
    Buttons(Vec<Button>),
    /// Hide whatever keyboard is shown.
    Remove,
    /// Send no keyboard markup at all.
    Unchanged,
}

impl Keyboard {
    /// Shorthand for a button keyboard.
    #[must_use]
    pub fn buttons(buttons: &[Button]) -> Self {
        Self::Buttons(buttons.to_vec())
    }
}

/// A message for the adapter to render and deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Message body.
    pub text: String,
    /// Keyboard to attach.
    pub keyboard: Keyboard,
}

impl OutboundMessage {
    /// Creates a message.
    #[must_use]
    pub fn new(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }

    /// A message that leaves the keyboard alone.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Keyboard::Unchanged)
    }
}

/// Fixed user-facing texts.
pub mod texts {
    /// Sent in reply to the start command.
    pub const GREETING: &str = "Здравствуйте! Я бот для проверки викторин";
    /// Sent when the user ends the conversation.
    pub const FAREWELL: &str = "Работа завершена";
    /// Sent after a wrong solution attempt.
    pub const WRONG_ANSWER: &str = "Ответ не верен. Попробуете ещё раз?";
    /// Sent when the user has no correct answers yet.
    pub const NO_SCORE: &str = "Пока что правильных ответов нет";
    /// Sent when the outstanding question cannot be found.
    pub const QUESTION_LOST: &str =
        "Не удалось найти текущий вопрос. Нажмите «Новый вопрос», чтобы продолжить.";
    /// Sent by adapters when the bot cannot serve the request right now.
    pub const SERVICE_UNAVAILABLE: &str = "Сервис временно недоступен. Попробуйте позже.";

    /// Reply to a correct solution attempt.
    #[must_use]
    pub fn correct_answer(answer: &str) -> String {
        format!("Правильно! {answer} Поздравляю! Для следующего вопроса нажмите «Новый вопрос»")
    }

    /// Reply to a surrender.
    #[must_use]
    pub fn revealed_answer(answer: &str) -> String {
        format!("Правильный ответ: {answer}")
    }

    /// Reply to a score request with at least one correct answer.
    #[must_use]
    pub fn current_score(score: u64) -> String {
        format!("Ваш текущий счёт: {score}")
    }
}
