//! Action reduction integration tests.
//!
//! These tests verify that reduced action lists keep exactly one
//! representative per equivalence class, in first-seen order.

use std::collections::HashSet;

use proptest::prelude::*;
use rust_eqclass::core::{Action, CardId, PlayerId, TemplateId};
use rust_eqclass::equivalence::{
    EquivalenceChecker, EquivalenceError, EquivalenceSet, PlayContext, SetId, StandingFn,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn cards(raw: &[u32]) -> Vec<CardId> {
    raw.iter().copied().map(CardId).collect()
}

/// `{2,3,4}`=A, `{5}`=B, `{7,8}`=C.
fn scenario() -> EquivalenceChecker {
    let p0 = PlayerId::new(0);
    EquivalenceChecker::from_sets([
        EquivalenceSet::new(SetId(0), p0, cards(&[2, 3, 4])).unwrap(),
        EquivalenceSet::singleton(SetId(1), p0, CardId(5)),
        EquivalenceSet::new(SetId(2), p0, cards(&[7, 8])).unwrap(),
    ])
    .unwrap()
}

/// Build a linked chain of runs `(owner, length)` over consecutive cards.
fn chain(runs: &[(u8, usize)]) -> EquivalenceChecker {
    let mut sets = Vec::with_capacity(runs.len());
    let mut next_card = 0u32;

    for (i, &(owner, len)) in runs.iter().enumerate() {
        let id = i as u32;
        let members: Vec<CardId> = (next_card..next_card + len as u32).map(CardId).collect();
        next_card += len as u32;

        let mut set = EquivalenceSet::new(SetId(id), PlayerId(owner), members).unwrap();
        if i > 0 {
            set = set.with_prev(SetId(id - 1));
        }
        if i + 1 < runs.len() {
            set = set.with_next(SetId(id + 1));
        }
        sets.push(set);
    }

    EquivalenceChecker::from_sets(sets).unwrap()
}

fn class_ids(checker: &EquivalenceChecker, actions: &[CardId]) -> Vec<SetId> {
    actions
        .iter()
        .map(|card| checker.set_id_of(card).unwrap())
        .collect()
}

// =============================================================================
// Scenarios
// =============================================================================

/// Standing classes are represented by their highest card.
#[test]
fn test_scenario_standing() {
    init_logging();
    let reduced = scenario()
        .reduce_legal_actions(&cards(&[2, 3, 5, 7]), &true)
        .unwrap();
    assert_eq!(reduced, cards(&[4, 5, 8]));
}

/// Non-standing classes are represented by their lowest card.
#[test]
fn test_scenario_not_standing() {
    init_logging();
    let reduced = scenario()
        .reduce_legal_actions(&cards(&[3, 5, 8]), &false)
        .unwrap();
    assert_eq!(reduced, cards(&[2, 5, 7]));
}

/// An unmapped action fails the whole reduction.
#[test]
fn test_scenario_unknown_action() {
    init_logging();
    let result = scenario().reduce_legal_actions(&cards(&[2, 3, 6]), &true);
    assert_eq!(
        result,
        Err(EquivalenceError::UnknownAction("CardId(6)".into()))
    );
}

/// Leading below a higher class held by someone else plays low.
#[test]
fn test_opening_under_higher_class() {
    // North {0,1}, East {2} above it.
    let checker = chain(&[(0, 2), (1, 1)]);
    let opening = checker.in_context(PlayContext::Opening);

    let reduced = checker.reduce_legal_actions(&cards(&[0, 1]), &opening).unwrap();
    assert_eq!(reduced, cards(&[0]));
}

/// Leading from the top of the chain plays high.
#[test]
fn test_opening_at_top_of_chain() {
    // North {0,1}, East {2,3}.
    let checker = chain(&[(0, 2), (1, 2)]);
    let opening = checker.in_context(PlayContext::Opening);

    let reduced = checker.reduce_legal_actions(&cards(&[1, 3]), &opening).unwrap();
    assert_eq!(reduced, cards(&[0, 3]));
}

/// Following only stands when the class beats the trick and nothing above
/// it is left.
#[test]
fn test_beating_context() {
    // North {0,1}, East {2,3}, North {4}.
    let checker = chain(&[(0, 2), (1, 2), (0, 1)]);
    let beating = checker.in_context(PlayContext::Beating(CardId(1)));

    let reduced = checker.reduce_legal_actions(&cards(&[3]), &beating).unwrap();
    assert_eq!(reduced, cards(&[2]));

    let mut played = checker.clone();
    played.remove_card(&CardId(4)).unwrap();
    let beating = played.in_context(PlayContext::Beating(CardId(1)));
    let reduced = played.reduce_legal_actions(&cards(&[3]), &beating).unwrap();
    assert_eq!(reduced, cards(&[3]));
}

/// Game-specific rules plug in through a closure.
#[test]
fn test_closure_standing() {
    // Pretend 7.. are trumps: trumps stand, everything else ducks.
    let trumps = StandingFn::new(|card: &CardId| Ok(card.raw() >= 7));
    let reduced = scenario()
        .reduce_legal_actions(&cards(&[3, 8, 5]), &trumps)
        .unwrap();
    assert_eq!(reduced, cards(&[2, 8, 5]));
}

/// Non-card actions survive reduction in place.
#[test]
fn test_mixed_actions_keep_non_card_plays() {
    let play = TemplateId::new(1);
    let question = Action::new(TemplateId::new(2));
    let actions = vec![
        question.clone(),
        Action::play(play, CardId(4)),
        Action::play(play, CardId(3)),
        Action::play(play, CardId(5)),
    ];

    let reduced = scenario().reduce_actions(&actions, &true).unwrap();
    assert_eq!(
        reduced,
        vec![
            question,
            Action::play(play, CardId(4)),
            Action::play(play, CardId(5)),
        ]
    );
}

/// Mixed lists fail on unmapped card plays too.
#[test]
fn test_mixed_actions_unknown_card() {
    let actions = vec![
        Action::new(TemplateId::new(0)),
        Action::play(TemplateId::new(1), CardId(99)),
    ];
    let result = scenario().reduce_actions(&actions, &true);
    assert!(matches!(result, Err(EquivalenceError::UnknownAction(_))));
}

/// One checker serves several threads at once.
#[test]
fn test_shared_across_threads() {
    let checker = scenario();
    let legal = cards(&[2, 3, 5, 7, 8]);

    std::thread::scope(|scope| {
        let handles: Vec<_> = [true, false]
            .into_iter()
            .map(|standing| {
                let checker = &checker;
                let legal = &legal;
                scope.spawn(move || checker.reduce_legal_actions(legal, &standing).unwrap())
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results[0], cards(&[4, 5, 8]));
        assert_eq!(results[1], cards(&[2, 5, 7]));
    });
}

// =============================================================================
// Properties
// =============================================================================

fn runs() -> impl Strategy<Value = Vec<(u8, usize)>> {
    prop::collection::vec((0u8..4, 1usize..5), 1..12)
}

/// A chain plus a shuffled subset of its cards as legal actions.
fn partition_and_actions() -> impl Strategy<Value = (Vec<(u8, usize)>, Vec<CardId>)> {
    runs().prop_flat_map(|runs| {
        let total: u32 = runs.iter().map(|&(_, len)| len as u32).sum();
        let all: Vec<CardId> = (0..total).map(CardId).collect();
        let size = all.len();
        (
            Just(runs),
            prop::sample::subsequence(all, 0..=size).prop_shuffle(),
        )
    })
}

proptest! {
    #[test]
    fn prop_one_output_per_class((runs, legal) in partition_and_actions(), standing in any::<bool>()) {
        let checker = chain(&runs);
        let reduced = checker.reduce_legal_actions(&legal, &standing).unwrap();

        let out_ids = class_ids(&checker, &reduced);
        let unique: HashSet<_> = out_ids.iter().copied().collect();
        prop_assert_eq!(unique.len(), out_ids.len());

        let in_ids: HashSet<_> = class_ids(&checker, &legal).into_iter().collect();
        prop_assert_eq!(unique, in_ids);
    }

    #[test]
    fn prop_first_occurrence_order((runs, legal) in partition_and_actions(), standing in any::<bool>()) {
        let checker = chain(&runs);
        let reduced = checker.reduce_legal_actions(&legal, &standing).unwrap();

        let mut seen = HashSet::new();
        let expected: Vec<SetId> = class_ids(&checker, &legal)
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect();
        prop_assert_eq!(class_ids(&checker, &reduced), expected);
    }

    #[test]
    fn prop_representative_is_class_extreme((runs, legal) in partition_and_actions(), standing in any::<bool>()) {
        let checker = chain(&runs);
        let reduced = checker.reduce_legal_actions(&legal, &standing).unwrap();

        for card in &reduced {
            let set = checker.set_of(card).unwrap();
            let expected = if set.is_singleton() || !standing {
                set.lowest()
            } else {
                set.highest()
            };
            prop_assert_eq!(card, expected);
        }
    }

    #[test]
    fn prop_singletons_ignore_context(runs in prop::collection::vec(0u8..4, 1..10)) {
        let singles: Vec<(u8, usize)> = runs.into_iter().map(|owner| (owner, 1)).collect();
        let checker = chain(&singles);
        let legal: Vec<CardId> = (0..singles.len() as u32).map(CardId).collect();

        // Undefined context errors if consulted; singletons never consult it.
        let reduced = checker
            .reduce_legal_actions(&legal, &checker.in_context(PlayContext::Undefined))
            .unwrap();
        prop_assert_eq!(reduced, legal);
    }

    #[test]
    fn prop_reduction_is_idempotent(
        (runs, legal) in partition_and_actions(),
        to_beat in 0u32..40,
    ) {
        let checker = chain(&runs);
        let context = checker.in_context(PlayContext::Beating(CardId(to_beat)));

        let once = checker.reduce_legal_actions(&legal, &context).unwrap();
        let twice = checker.reduce_legal_actions(&once, &context).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_opening_plays_high_only_at_top((runs, legal) in partition_and_actions()) {
        let checker = chain(&runs);
        let opening = checker.in_context(PlayContext::Opening);
        let reduced = checker.reduce_legal_actions(&legal, &opening).unwrap();

        for card in &reduced {
            let set = checker.set_of(card).unwrap();
            let expected = if checker.next_set(set.id()).is_none() {
                set.highest()
            } else {
                set.lowest()
            };
            prop_assert_eq!(card, expected);
        }
    }

    #[test]
    fn prop_unknown_action_rejects_everything(
        (runs, mut legal) in partition_and_actions(),
        position in any::<prop::sample::Index>(),
    ) {
        let checker = chain(&runs);
        let stranger = CardId(10_000);
        let at = position.index(legal.len() + 1);
        legal.insert(at, stranger);

        let result = checker.reduce_legal_actions(&legal, &true);
        prop_assert_eq!(result, Err(EquivalenceError::UnknownAction("CardId(10000)".into())));
    }
}
