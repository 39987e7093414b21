//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across arbitrary event sequences.

use super::*;
use crate::keyboard::Selection;
use crate::prompts;
use crate::taxonomy::{BaseEmotion, EmotionCatalog};
use proptest::prelude::*;
use std::collections::HashSet;

// ============================================================================
// Test Helpers
// ============================================================================

/// Catalog with enough sub-emotions to hit the cap, plus a label shared by
/// two bases
fn test_catalog() -> EmotionCatalog {
    EmotionCatalog::new(vec![
        BaseEmotion::new(
            "Joy",
            &["Delight", "Pride", "Relief", "Hope", "Calm", "Gratitude"],
        ),
        BaseEmotion::new(
            "Sadness",
            &[
                "Disappointment",
                "Grief",
                "Loneliness",
                "Regret",
                "Hurt",
                "Calm",
            ],
        ),
        BaseEmotion::new(
            "Anger",
            &["Irritation", "Rage", "Envy", "Spite", "Bitterness", "Contempt"],
        ),
    ])
    .unwrap()
}

/// Apply an event, keeping the old session on a dropped event
fn step(session: Option<Session>, catalog: &EmotionCatalog, event: Event) -> Option<Session> {
    match transition(session.as_ref(), catalog, event) {
        Ok(result) => result.new_session,
        Err(_) => session,
    }
}

fn session_picking(base: &str) -> Session {
    Session {
        step: Step::SelectingSubEmotions {
            base: base.to_string(),
        },
        form: FormData::default(),
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_selection() -> impl Strategy<Value = Selection> {
    prop_oneof![
        (0usize..4).prop_map(Selection::Base),
        (0usize..4, 0usize..7).prop_map(|(base, sub)| Selection::Sub { base, sub }),
        (0usize..4).prop_map(Selection::DoneSub),
        Just(Selection::Back),
        Just(Selection::Done),
        Just(Selection::Send),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        1 => Just(Event::Start),
        3 => "[a-z ]{0,12}".prop_map(Event::text),
        8 => arb_selection().prop_map(Event::Select),
    ]
}

fn arb_sub_index() -> impl Strategy<Value = usize> {
    0usize..6
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Whatever happens, the form stays within bounds and resolves against the catalog
    #[test]
    fn form_invariants_hold(events in proptest::collection::vec(arb_event(), 0..60)) {
        let catalog = test_catalog();
        let labels: HashSet<&str> = catalog
            .bases()
            .iter()
            .flat_map(|b| b.subemotions.iter().map(String::as_str))
            .collect();

        let mut session = None;
        for event in events {
            session = step(session, &catalog, event);
            if let Some(s) = &session {
                let subs = &s.form.selected_sub_emotions;
                prop_assert!(subs.len() <= MAX_SUB_EMOTIONS);
                prop_assert_eq!(subs.iter().collect::<HashSet<_>>().len(), subs.len());
                prop_assert!(subs.iter().all(|sub| labels.contains(sub.as_str())));

                let bases = &s.form.selected_base_emotions;
                prop_assert_eq!(bases.iter().collect::<HashSet<_>>().len(), bases.len());
                prop_assert!(bases.iter().all(|b| catalog.base_by_name(b).is_some()));

                if let Step::SelectingSubEmotions { base } = &s.step {
                    prop_assert!(s.form.has_base(base));
                }
            }
        }
    }

    /// Toggling the same sub-emotion twice restores membership
    #[test]
    fn toggle_pairs_are_idempotent(
        pre in proptest::collection::vec(arb_sub_index(), 0..10),
        target in arb_sub_index(),
    ) {
        let catalog = test_catalog();
        let mut session = Some(session_picking("Sadness"));
        for sub in pre {
            session = step(session, &catalog, Event::Select(Selection::Sub { base: 1, sub }));
        }
        let before = session.clone().unwrap().form.selected_sub_emotions;

        let toggle = Event::Select(Selection::Sub { base: 1, sub: target });
        session = step(session, &catalog, toggle.clone());
        session = step(session, &catalog, toggle);

        let mut after = session.unwrap().form.selected_sub_emotions;
        let mut before_sorted = before;
        after.sort();
        before_sorted.sort();
        prop_assert_eq!(after, before_sorted);
    }

    /// Leaving the sub picker and coming back shows the same checkmarks
    #[test]
    fn selection_survives_back_navigation(
        picks in proptest::collection::vec(arb_sub_index(), 0..8),
        leave_with_back in any::<bool>(),
    ) {
        let catalog = test_catalog();
        let mut session = Some(Session {
            step: Step::SelectingBaseEmotions,
            form: FormData::default(),
        });
        session = step(session, &catalog, Event::Select(Selection::Base(0)));
        for sub in picks {
            session = step(session, &catalog, Event::Select(Selection::Sub { base: 0, sub }));
        }
        let before = session.clone().unwrap().form;

        let leave = if leave_with_back { Selection::Back } else { Selection::DoneSub(0) };
        session = step(session, &catalog, Event::Select(leave));
        prop_assert_eq!(&session.as_ref().unwrap().step, &Step::SelectingBaseEmotions);

        let reopen = Event::Select(Selection::Base(0));
        let result = transition(session.as_ref(), &catalog, reopen).unwrap();
        let reopened = result.new_session.unwrap();
        prop_assert_eq!(&reopened.form.selected_sub_emotions, &before.selected_sub_emotions);

        let expected = crate::keyboard::sub_picker(&catalog, 0, &before).unwrap();
        prop_assert_eq!(
            &result.effects[1],
            &Effect::send_keyboard(prompts::sub_prompt("Joy"), expected)
        );
    }

    /// /start mid-flow wipes everything typed before
    #[test]
    fn restart_discards_previous_answers(
        situation in "[a-z]{6,12}",
        thoughts in "[a-z]{6,12}",
    ) {
        let catalog = test_catalog();
        let mut session = step(None, &catalog, Event::Start);
        session = step(session, &catalog, Event::text(format!("old {situation}")));
        session = step(session, &catalog, Event::Select(Selection::Base(1)));
        session = step(session, &catalog, Event::Select(Selection::Sub { base: 1, sub: 1 }));
        session = step(session, &catalog, Event::Select(Selection::Back));
        session = step(session, &catalog, Event::Select(Selection::Done));
        session = step(session, &catalog, Event::text(format!("old {thoughts}")));
        prop_assert_eq!(&session.as_ref().unwrap().step, &Step::AwaitingActions);

        session = step(session, &catalog, Event::Start);
        prop_assert_eq!(session.as_ref(), Some(&Session::new()));

        session = step(session, &catalog, Event::text("new situation"));
        session = step(session, &catalog, Event::Select(Selection::Done));
        session = step(session, &catalog, Event::text("new thoughts"));
        session = step(session, &catalog, Event::text("new actions"));
        let send = Event::Select(Selection::Send);
        let result = transition(session.as_ref(), &catalog, send).unwrap();
        let summary = result.effects[0].text().unwrap().to_string();

        prop_assert!(!summary.contains(&situation));
        prop_assert!(!summary.contains(&thoughts));
        prop_assert!(!summary.contains("Grief"));
        prop_assert!(!summary.contains("Sadness"));
        prop_assert!(summary.contains("new situation"));
    }

    /// Blank input at a free-text prompt never moves the step
    #[test]
    fn blank_text_never_advances(blank in "[ \t]{0,5}", which in 0usize..3) {
        let catalog = test_catalog();
        let step_under_test = [
            Step::AwaitingSituation,
            Step::AwaitingThoughts,
            Step::AwaitingActions,
        ][which].clone();
        let session = Session { step: step_under_test, form: FormData::default() };

        let result = transition(Some(&session), &catalog, Event::text(blank)).unwrap();
        prop_assert_eq!(result.new_session.as_ref(), Some(&session));
        prop_assert_eq!(result.effects.len(), 1);
    }
}

// ============================================================================
// Deterministic scenarios
// ============================================================================

#[test]
fn sixteenth_pick_is_refused_with_notice() {
    let catalog = test_catalog();
    let mut session = Some(Session {
        step: Step::SelectingBaseEmotions,
        form: FormData::default(),
    });

    // 6 from Joy, 6 from Anger, 3 from Sadness (skipping its shared "Calm")
    for (base, subs) in [(0, 0..6), (2, 0..6), (1, 0..3)] {
        session = step(session, &catalog, Event::Select(Selection::Base(base)));
        for sub in subs {
            session = step(session, &catalog, Event::Select(Selection::Sub { base, sub }));
        }
        session = step(session, &catalog, Event::Select(Selection::DoneSub(base)));
    }
    let full = session.unwrap();
    assert_eq!(full.form.selected_sub_emotions.len(), MAX_SUB_EMOTIONS);

    let picking = step(Some(full.clone()), &catalog, Event::Select(Selection::Base(1))).unwrap();
    let result = transition(
        Some(&picking),
        &catalog,
        Event::Select(Selection::Sub { base: 1, sub: 3 }),
    )
    .unwrap();

    assert_eq!(result.new_session.as_ref(), Some(&picking));
    assert_eq!(result.effects, vec![Effect::send_text(prompts::limit_notice())]);
    assert_eq!(
        result.new_session.unwrap().form.selected_sub_emotions,
        full.form.selected_sub_emotions
    );
}

#[test]
fn shared_label_is_one_selection_across_bases() {
    let catalog = test_catalog();
    // "Calm" is Joy[4] and Sadness[5]
    let mut session = Some(session_picking("Joy"));
    session = step(session, &catalog, Event::Select(Selection::Sub { base: 0, sub: 4 }));
    session = step(session, &catalog, Event::Select(Selection::Back));
    session = step(session, &catalog, Event::Select(Selection::Base(1)));
    session = step(session, &catalog, Event::Select(Selection::Sub { base: 1, sub: 5 }));

    assert!(session.unwrap().form.selected_sub_emotions.is_empty());
}
