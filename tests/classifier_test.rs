//! Classification with context suppression

use comms_analysis::classifier::MessageClassifier;
use comms_analysis::context::ContextWindow;
use comms_analysis::models::{Direction, Message, Severity};
use proptest::prelude::*;

use Direction::{Received, Sent};

const RADIUS: usize = 8;

const BODIES: &[&str] = &[
    "whatever",
    "That never happened",
    "You're crazy",
    "I'm sorry, I was wrong",
    "lol",
    "haha you're so dumb",
    "my boss is an idiot",
    "thank you, I appreciate you",
    "you always do this",
    "ok",
    "",
    "calm down, let's not fight",
    "you are so full of shit",
];

fn classifier() -> MessageClassifier {
    MessageClassifier::standard().expect("Failed to build classifier")
}

fn convo(lines: &[(Direction, &str)]) -> Vec<Message> {
    lines
        .iter()
        .zip(1..)
        .map(|((direction, body), id)| Message::text(id, *direction, body))
        .collect()
}

fn window(arena: &[Message], center: usize) -> ContextWindow<'_> {
    ContextWindow::around(arena, center, RADIUS).expect("center in range")
}

#[test]
fn test_apology_suppresses_mild_neighbor() {
    let classifier = classifier();
    let arena = convo(&[(Received, "whatever"), (Sent, "I'm sorry, I was wrong")]);

    let alone = convo(&[(Received, "whatever")]);
    let baseline = classifier.classify(&window(&alone, 0));
    assert!(baseline.is_hurtful);
    assert_eq!(baseline.severity, Some(Severity::Mild));

    let dismissal = classifier.classify(&window(&arena, 0));
    assert!(!dismissal.is_hurtful);
    assert!(dismissal.patterns.is_empty());
    assert!(!dismissal.is_apology);

    let apology = classifier.classify(&window(&arena, 1));
    assert!(apology.is_apology);
    assert!(!apology.is_hurtful);
}

#[test]
fn test_severe_match_survives_any_context() {
    let classifier = classifier();
    let arena = convo(&[
        (Sent, "lol"),
        (Received, "haha"),
        (Received, "You're crazy"),
        (Sent, "I'm sorry"),
        (Received, "let's not fight"),
    ]);

    let analysis = classifier.classify(&window(&arena, 2));
    assert!(analysis.is_hurtful);
    assert_eq!(analysis.severity, Some(Severity::Severe));
    assert!(analysis.patterns.iter().any(|p| p == "gaslighting"));
}

#[test]
fn test_only_suppressible_matches_are_dropped() {
    let classifier = classifier();
    let lines: Vec<(Direction, &str)> = BODIES
        .iter()
        .enumerate()
        .map(|(i, b)| (if i % 2 == 0 { Sent } else { Received }, *b))
        .collect();
    let arena = convo(&lines);

    for i in 0..arena.len() {
        let detailed = classifier
            .classify_detailed(&window(&arena, i))
            .expect("Failed to classify");
        for (m, _) in &detailed.suppressed {
            assert!(!m.category.never_suppressed(), "{} was suppressed", m.category.name());
        }
        assert_eq!(detailed.analysis.is_hurtful, !detailed.surviving.is_empty());
        assert_eq!(
            detailed.analysis.severity,
            detailed.surviving.iter().filter_map(|m| m.category.severity()).max()
        );
    }
}

#[test]
fn test_plural_address_is_not_venting() {
    let classifier = classifier();
    let arena = convo(&[(Received, "you never listen, you guys are all the same")]);

    let detailed = classifier
        .classify_detailed(&window(&arena, 0))
        .expect("Failed to classify");
    assert!(detailed.suppressed.is_empty());
    assert!(detailed.analysis.is_hurtful);
    assert!(detailed.analysis.patterns.iter().any(|p| p == "attack"));
}

#[test]
fn test_keywords_are_matched_text() {
    let classifier = classifier();
    let arena = convo(&[(Received, "That never happened")]);
    let analysis = classifier.classify(&window(&arena, 0));
    assert_eq!(analysis.patterns, vec!["deny".to_string()]);
    assert!(!analysis.keywords.is_empty());
    for keyword in &analysis.keywords {
        assert!(
            "that never happened".contains(&keyword.to_lowercase()),
            "unexpected keyword {keyword}"
        );
    }
}

#[test]
fn test_media_message_gets_empty_analysis() {
    let classifier = classifier();
    let mut arena = convo(&[(Sent, "look")]);
    arena[0].body = None;
    arena[0].media_type = comms_analysis::models::MediaType::Image;

    let analysis = classifier.classify(&window(&arena, 0));
    assert!(!analysis.is_hurtful);
    assert!(analysis.patterns.is_empty());
    assert!(analysis.supportive.is_empty());
}

#[test]
fn test_classification_is_idempotent() {
    let classifier = classifier();
    let lines: Vec<(Direction, &str)> = BODIES.iter().map(|b| (Received, *b)).collect();
    let arena = convo(&lines);

    let first = classifier.classify_all(&arena, RADIUS);
    let second = classifier.classify_all(&arena, RADIUS);
    assert_eq!(first, second);
    assert_eq!(first.len(), arena.len());
}

fn arb_convo() -> impl Strategy<Value = Vec<(bool, usize)>> {
    prop::collection::vec((any::<bool>(), 0..BODIES.len()), 1..40)
}

fn build(lines: &[(bool, usize)]) -> Vec<Message> {
    lines
        .iter()
        .zip(1..)
        .map(|(&(sent, body), id)| {
            let direction = if sent { Sent } else { Received };
            Message::text(id, direction, BODIES[body])
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_party_labels_do_not_change_results(lines in arb_convo()) {
        let classifier = classifier();
        let arena = build(&lines);
        let flipped: Vec<Message> = arena
            .iter()
            .cloned()
            .map(|mut m| {
                m.direction = m.direction.flipped();
                m
            })
            .collect();

        prop_assert_eq!(
            classifier.classify_all(&arena, RADIUS),
            classifier.classify_all(&flipped, RADIUS)
        );
    }

    #[test]
    fn prop_severe_bodies_always_hurtful(lines in arb_convo(), at in any::<prop::sample::Index>()) {
        let classifier = classifier();
        let mut arena = build(&lines);
        let center = at.index(arena.len());
        arena[center].body = Some("You're crazy".to_string());

        let analysis = classifier.classify(&window(&arena, center));
        prop_assert!(analysis.is_hurtful);
        prop_assert_eq!(analysis.severity, Some(Severity::Severe));
    }
}
