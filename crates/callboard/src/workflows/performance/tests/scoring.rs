use std::sync::Arc;

use crate::workflows::performance::scoring::{
    FixedPhrasePicker, PhraseBook, PhraseBookError, PhrasePicker, RandomPhrasePicker,
    ScoreEngine, ScoreThresholds, Tier,
};

fn engine() -> ScoreEngine {
    ScoreEngine::with_picker(Arc::new(FixedPhrasePicker(0)))
}

#[test]
fn tiers_follow_inclusive_lower_bounds() {
    let engine = engine();
    assert_eq!(engine.classify(140.0, 140.0).1, Tier::Green);
    assert_eq!(engine.classify(200.0, 140.0).1, Tier::Green);
    assert_eq!(engine.classify(0.70, 1.0).1, Tier::Yellow);
    assert_eq!(engine.classify(0.699999, 1.0).1, Tier::Red);
    assert_eq!(engine.classify(0.0, 140.0).1, Tier::Red);
    assert_eq!(engine.classify(-3.0, 140.0).1, Tier::Red);
}

#[test]
fn zero_or_undefined_target_is_no_target() {
    let engine = engine();
    for target in [0.0, f64::NAN, f64::INFINITY] {
        let status = engine.score(50.0, target);
        assert_eq!(status.tier, Tier::NoTarget);
        assert_eq!(status.ratio, 0.0);
        assert_eq!(status.label, "No Target");
        assert_eq!(status.color_class, "text-gray-500 bg-gray-100");
        assert_eq!(status.phrase, "Waiting for targets to be defined.");
    }
}

#[test]
fn score_reports_percentage_label_and_color() {
    let status = engine().score(105.0, 140.0);
    assert_eq!(status.tier, Tier::Yellow);
    assert!((status.ratio - 0.75).abs() < 1e-12);
    assert!((status.percentage - 75.0).abs() < 1e-9);
    assert_eq!(status.label, "Average");
    assert_eq!(status.color_class, "text-yellow-500 bg-yellow-100");
}

#[test]
fn fixed_picker_pins_the_phrase() {
    let first = ScoreEngine::with_picker(Arc::new(FixedPhrasePicker(0)));
    let second = ScoreEngine::with_picker(Arc::new(FixedPhrasePicker(1)));
    let book = PhraseBook::standard();

    assert_eq!(first.score(150.0, 140.0).phrase, book.candidates(Tier::Green)[0]);
    assert_eq!(second.score(150.0, 140.0).phrase, book.candidates(Tier::Green)[1]);
    assert_eq!(second.score(10.0, 140.0).phrase, book.candidates(Tier::Red)[1]);
}

#[test]
fn out_of_range_picks_are_clamped() {
    struct Overshoot;
    impl PhrasePicker for Overshoot {
        fn pick(&self, candidates: usize) -> usize {
            candidates + 5
        }
    }

    let engine = ScoreEngine::with_picker(Arc::new(Overshoot));
    let book = PhraseBook::standard();
    let reds = book.candidates(Tier::Red);
    assert_eq!(engine.score(0.0, 140.0).phrase, reds[reds.len() - 1]);
}

#[test]
fn random_phrases_stay_within_the_tier() {
    let engine = ScoreEngine::with_picker(Arc::new(RandomPhrasePicker));
    let book = PhraseBook::standard();
    for _ in 0..50 {
        let status = engine.score(100.0, 140.0);
        assert!(book
            .candidates(Tier::Yellow)
            .iter()
            .any(|phrase| *phrase == status.phrase));
    }
}

#[test]
fn phrase_book_requires_every_scored_tier() {
    let err = PhraseBook::new(
        vec!["Nice".to_string()],
        Vec::new(),
        vec!["Push".to_string()],
        "Pending",
    )
    .expect_err("empty yellow tier rejected");
    assert_eq!(err, PhraseBookError::EmptyTier("Average"));
}

#[test]
fn custom_thresholds_shift_the_bands() {
    let engine = ScoreEngine::new(
        ScoreThresholds {
            green: 0.9,
            yellow: 0.5,
        },
        PhraseBook::standard(),
        Arc::new(FixedPhrasePicker(0)),
    );
    assert_eq!(engine.classify(0.9, 1.0).1, Tier::Green);
    assert_eq!(engine.classify(0.5, 1.0).1, Tier::Yellow);
    assert_eq!(engine.thresholds().yellow, 0.5);
}
