//! Conversation states and their store representation.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Where a user is in the quiz flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConversationState {
    /// No conversation in progress: never started, or ended with `Done`.
    /// Only the start command is recognised here.
    #[default]
    Idle,
    /// Greeted, or just surrendered; waiting for a button press.
    Start,
    /// A question is outstanding.
    QuestionIssued,
    /// The last reply answered the outstanding question.
    AnswerAccepted,
    /// The score was just reported.
    ScoreIssued,
}

/// Raised when a stored state tag is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown conversation state tag: {0:?}")]
pub struct UnknownStateTag(pub String);

impl ConversationState {
    /// Every state, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Idle,
        Self::Start,
        Self::QuestionIssued,
        Self::AnswerAccepted,
        Self::ScoreIssued,
    ];

    /// The tag written to the session store.
    #[must_use]
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Start => "start",
            Self::QuestionIssued => "question_issued",
            Self::AnswerAccepted => "answer_accepted",
            Self::ScoreIssued => "score_issued",
        }
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for ConversationState {
    type Err = UnknownStateTag;

    /// Parses a stored tag. Tags written by the previous generation of the
    /// bots (`State.PROCESSED_START` and friends) are accepted as well.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim() {
            "idle" => Ok(Self::Idle),
            "start" | "State.PROCESSED_START" | "State.SURRENDER_HANDLED" => Ok(Self::Start),
            "question_issued" | "State.ISSUED_QUESTION" => Ok(Self::QuestionIssued),
            "answer_accepted" | "State.ANSWER_ACCEPTED" => Ok(Self::AnswerAccepted),
            "score_issued" | "State.ISSUED_SCORE" => Ok(Self::ScoreIssued),
            other => Err(UnknownStateTag(other.to_owned())),
        }
    }
}
