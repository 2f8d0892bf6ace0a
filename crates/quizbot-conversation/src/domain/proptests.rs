//! Property-based tests for the transition function.
//!
//! These tests verify that the table invariants hold across arbitrary
//! sessions, catalogs and inputs.

use proptest::prelude::*;
use quizbot_catalog::{Catalog, QuizEntry};
use quizbot_test_support::SequenceRng;

use super::intent::{Intent, normalize_whitespace};
use super::reply::texts;
use super::session::UserSession;
use super::state::ConversationState;
use super::transition::{Outcome, transition};

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_state() -> impl Strategy<Value = ConversationState> {
    prop_oneof![
        Just(ConversationState::Idle),
        Just(ConversationState::Start),
        Just(ConversationState::QuestionIssued),
        Just(ConversationState::AnswerAccepted),
        Just(ConversationState::ScoreIssued),
    ]
}

fn arb_catalog() -> impl Strategy<Value = Catalog> {
    proptest::collection::btree_map("[a-z?]{1,10}", "[a-z0-9 ]{1,12}", 1..8).prop_map(
        |pairs| {
            Catalog::from_entries(pairs.into_iter().map(|(q, a)| QuizEntry::new(q, a)))
                .expect("generator yields at least one pair")
        },
    )
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("/start".to_owned()),
        Just("Done".to_owned()),
        Just("Новый вопрос".to_owned()),
        Just("Сдаться".to_owned()),
        Just("Мой счёт".to_owned()),
        Just("   ".to_owned()),
        "[a-z0-9 ]{0,12}",
    ]
}

fn arb_session(questions: Vec<String>) -> impl Strategy<Value = UserSession> {
    (
        arb_state(),
        proptest::option::of(proptest::sample::select(questions)),
        0u64..1000,
    )
        .prop_map(|(state, current_question, score)| UserSession {
            state,
            current_question,
            score,
        })
}

fn arb_case() -> impl Strategy<Value = (Catalog, UserSession, String, Vec<u32>)> {
    arb_catalog().prop_flat_map(|catalog| {
        let questions = catalog
            .entries()
            .iter()
            .map(|e| e.question().to_owned())
            .collect();
        let session = arb_session(questions);
        (
            Just(catalog),
            session,
            arb_text(),
            proptest::collection::vec(any::<u32>(), 1..4),
        )
    })
}

/// Whether the table defines a transition for this pair.
fn is_recognised(state: ConversationState, intent: &Intent) -> bool {
    use ConversationState as S;
    match intent {
        Intent::Start => true,
        Intent::Empty => false,
        _ if state == S::Idle => false,
        Intent::Done | Intent::NewQuestion => true,
        Intent::Surrender | Intent::Reply(_) => state == S::QuestionIssued,
        Intent::MyScore => matches!(state, S::Start | S::QuestionIssued | S::AnswerAccepted),
    }
}

proptest! {
    #[test]
    fn prop_table_is_total((catalog, session, text, draws) in arb_case()) {
        let intent = Intent::parse(&text);
        let result = transition(&session, &intent, &catalog, &mut SequenceRng::new(draws));

        prop_assert_eq!(result.is_some(), is_recognised(session.state, &intent));
    }

    #[test]
    fn prop_new_question_comes_from_catalog((catalog, session, _text, draws) in arb_case()) {
        prop_assume!(session.state != ConversationState::Idle);

        let result = transition(&session, &Intent::NewQuestion, &catalog, &mut SequenceRng::new(draws))
            .expect("new question is recognised in every active state");

        let issued = result.update.current_question.expect("question is stored");
        prop_assert!(catalog.contains(&issued));
        prop_assert_eq!(result.reply.text, issued);
    }

    #[test]
    fn prop_score_only_grows_on_substring_match((catalog, session, text, draws) in arb_case()) {
        let intent = Intent::parse(&text);
        let answer = session
            .current_question
            .as_deref()
            .and_then(|q| catalog.get(q))
            .map(str::to_owned);

        if let Some(step) = transition(&session, &intent, &catalog, &mut SequenceRng::new(draws)) {
            match step.update.score {
                Some(score) => {
                    prop_assert_eq!(score, session.score + 1);
                    prop_assert_eq!(step.outcome, Outcome::AnswerAccepted);
                    let Intent::Reply(reply) = &intent else {
                        return Err(TestCaseError::fail("score changed without a reply"));
                    };
                    let answer = answer.expect("accepted answers have a catalog entry");
                    prop_assert!(normalize_whitespace(&answer).contains(reply.as_str()));
                }
                None => prop_assert_ne!(step.outcome, Outcome::AnswerAccepted),
            }
        }
    }

    #[test]
    fn prop_score_report_is_idempotent((catalog, session, _text, draws) in arb_case()) {
        prop_assume!(matches!(
            session.state,
            ConversationState::Start | ConversationState::QuestionIssued | ConversationState::AnswerAccepted
        ));
        let mut rng = SequenceRng::new(draws);

        let first = transition(&session, &Intent::MyScore, &catalog, &mut rng)
            .expect("score is recognised here");
        let after = UserSession { state: first.update.state, ..session.clone() };
        let second = transition(&after, &Intent::MyScore, &catalog, &mut rng);

        // ScoreIssued does not accept another request, so re-enter from Start.
        prop_assert!(second.is_none());
        let again = UserSession { state: ConversationState::Start, ..session.clone() };
        let third = transition(&again, &Intent::MyScore, &catalog, &mut rng)
            .expect("score is recognised from start");
        prop_assert_eq!(first.reply, third.reply);
    }

    #[test]
    fn prop_zero_score_renders_like_absent(state in arb_state()) {
        prop_assume!(matches!(
            state,
            ConversationState::Start | ConversationState::QuestionIssued | ConversationState::AnswerAccepted
        ));
        let catalog = Catalog::from_entries([QuizEntry::new("q", "a")]).unwrap();
        let stored_zero = UserSession::from_stored(Some(state.as_tag()), None, Some("0"));
        let absent = UserSession::from_stored(Some(state.as_tag()), None, None);
        let mut rng = SequenceRng::new(vec![0]);

        let zero_reply = transition(&stored_zero, &Intent::MyScore, &catalog, &mut rng).unwrap().reply;
        let absent_reply = transition(&absent, &Intent::MyScore, &catalog, &mut rng).unwrap().reply;

        prop_assert_eq!(&zero_reply.text, texts::NO_SCORE);
        prop_assert_eq!(zero_reply, absent_reply);
    }
}
