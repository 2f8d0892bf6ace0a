//! Pure state transition function.
//!
//! Given the same session, intent, catalog and RNG output, `transition`
//! always produces the same reply and session update. It performs no I/O.

use quizbot_catalog::Catalog;
use quizbot_core::rng::DeterministicRng;

use super::intent::{Intent, normalize_whitespace};
use super::reply::{Button, Keyboard, OutboundMessage, texts};
use super::session::{SessionUpdate, UserSession};
use super::state::ConversationState;

/// What a transition did, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Greeted the user.
    Greeted,
    /// Issued a new question.
    QuestionIssued,
    /// Accepted a correct answer.
    AnswerAccepted,
    /// Rejected a wrong answer.
    AnswerRejected,
    /// Revealed the answer after a surrender.
    Surrendered,
    /// Reported the score.
    ScoreReported,
    /// Ended the conversation.
    Finished,
    /// Reset to `Start` because the outstanding question was missing.
    QuestionLost,
}

impl Outcome {
    /// Short name for logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greeted => "greeted",
            Self::QuestionIssued => "question_issued",
            Self::AnswerAccepted => "answer_accepted",
            Self::AnswerRejected => "answer_rejected",
            Self::Surrendered => "surrendered",
            Self::ScoreReported => "score_reported",
            Self::Finished => "finished",
            Self::QuestionLost => "question_lost",
        }
    }
}

/// Result of a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The message to send back.
    pub reply: OutboundMessage,
    /// The session mutation to persist.
    pub update: SessionUpdate,
    /// What happened.
    pub outcome: Outcome,
}

impl Transition {
    fn new(outcome: Outcome, reply: OutboundMessage, update: SessionUpdate) -> Self {
        Self {
            reply,
            update,
            outcome,
        }
    }
}

const MAIN_MENU: [Button; 2] = [Button::NewQuestion, Button::MyScore];
const RETRY_MENU: [Button; 2] = [Button::MyScore, Button::Surrender];
const SCORE_MENU: [Button; 1] = [Button::NewQuestion];

/// Maps a session and an intent to the next step.
///
/// Returns `None` when the intent is not recognised in the current state;
/// the caller must then neither write nor reply.
#[must_use]
pub fn transition(
    session: &UserSession,
    intent: &Intent,
    catalog: &Catalog,
    rng: &mut dyn DeterministicRng,
) -> Option<Transition> {
    use ConversationState as S;

    match (session.state, intent) {
        (_, Intent::Start) => Some(greet()),
        (S::Idle, _) | (_, Intent::Empty) => None,
        (_, Intent::Done) => Some(finish()),
        (S::Start | S::QuestionIssued | S::AnswerAccepted | S::ScoreIssued, Intent::NewQuestion) => {
            Some(issue_question(catalog, rng))
        }
        (S::QuestionIssued, Intent::Surrender) => Some(surrender(session, catalog)),
        (S::Start | S::QuestionIssued | S::AnswerAccepted, Intent::MyScore) => {
            Some(report_score(session))
        }
        (S::QuestionIssued, Intent::Reply(text)) => Some(check_answer(session, text, catalog)),
        _ => None,
    }
}

/// A reply is correct when it is a substring of the canonical answer, both
/// whitespace-normalised. Matching is case-sensitive and an empty reply is
/// never correct.
#[must_use]
pub fn is_correct_answer(reply: &str, answer: &str) -> bool {
    let reply = normalize_whitespace(reply);
    !reply.is_empty() && normalize_whitespace(answer).contains(&reply)
}

fn greet() -> Transition {
    Transition::new(
        Outcome::Greeted,
        OutboundMessage::new(texts::GREETING, Keyboard::buttons(&MAIN_MENU)),
        SessionUpdate::state_only(ConversationState::Start),
    )
}

fn finish() -> Transition {
    Transition::new(
        Outcome::Finished,
        OutboundMessage::new(texts::FAREWELL, Keyboard::Remove),
        SessionUpdate::state_only(ConversationState::Idle),
    )
}

fn issue_question(catalog: &Catalog, rng: &mut dyn DeterministicRng) -> Transition {
    let question = catalog.pick(rng).question().to_owned();
    Transition::new(
        Outcome::QuestionIssued,
        OutboundMessage::new(question.clone(), Keyboard::Remove),
        SessionUpdate {
            state: ConversationState::QuestionIssued,
            current_question: Some(question),
            score: None,
        },
    )
}

fn question_lost() -> Transition {
    Transition::new(
        Outcome::QuestionLost,
        OutboundMessage::new(texts::QUESTION_LOST, Keyboard::buttons(&MAIN_MENU)),
        SessionUpdate::state_only(ConversationState::Start),
    )
}

fn current_answer<'a>(session: &UserSession, catalog: &'a Catalog) -> Option<&'a str> {
    session
        .current_question
        .as_deref()
        .and_then(|question| catalog.get(question))
}

fn surrender(session: &UserSession, catalog: &Catalog) -> Transition {
    let Some(answer) = current_answer(session, catalog) else {
        return question_lost();
    };
    Transition::new(
        Outcome::Surrendered,
        OutboundMessage::new(texts::revealed_answer(answer), Keyboard::buttons(&MAIN_MENU)),
        SessionUpdate::state_only(ConversationState::Start),
    )
}

fn report_score(session: &UserSession) -> Transition {
    let text = if session.score == 0 {
        texts::NO_SCORE.to_owned()
    } else {
        texts::current_score(session.score)
    };
    Transition::new(
        Outcome::ScoreReported,
        OutboundMessage::new(text, Keyboard::buttons(&SCORE_MENU)),
        SessionUpdate::state_only(ConversationState::ScoreIssued),
    )
}

fn check_answer(session: &UserSession, reply: &str, catalog: &Catalog) -> Transition {
    let Some(answer) = current_answer(session, catalog) else {
        return question_lost();
    };
    if is_correct_answer(reply, answer) {
        Transition::new(
            Outcome::AnswerAccepted,
            OutboundMessage::new(texts::correct_answer(answer), Keyboard::buttons(&MAIN_MENU)),
            SessionUpdate {
                state: ConversationState::AnswerAccepted,
                current_question: None,
                score: Some(session.score.saturating_add(1)),
            },
        )
    } else {
        Transition::new(
            Outcome::AnswerRejected,
            OutboundMessage::new(texts::WRONG_ANSWER, Keyboard::buttons(&RETRY_MENU)),
            SessionUpdate::state_only(ConversationState::QuestionIssued),
        )
    }
}
