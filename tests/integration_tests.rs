//! Integration tests for the ambitus notation engine
//!
//! Tests the full pipeline from tune text to assembled range exercises.

use ambitus::{build_exercise, check_tune, ExerciseSession, RangeSpec};

#[test]
fn test_check_tune_round_trips_the_default_tune() {
    let tune = "X:1\nK:C\nT:Aisja\nL:1/4\nM:4/4\n|[ceg]z2cdcd|";
    assert_eq!(check_tune(tune).unwrap(), tune);
}

#[test]
fn test_check_tune_round_trips_mixed_bodies() {
    for body in [
        "|cdef|",
        "| [ceg]2 z/2 |",
        "|(3ceg c2|",
        "|^c_d=ef'G,|",
        "|c3/2d/2|",
    ] {
        let tune = format!("X:1\nK:C\n{}", body);
        assert_eq!(check_tune(&tune).unwrap(), tune, "body {:?} changed", body);
    }
}

#[test]
fn test_check_tune_canonicalizes() {
    // A missing closing bar line is added and durations reduce.
    assert_eq!(check_tune("X:1\nK:C\n|c").unwrap(), "X:1\nK:C\n|c|");
    assert_eq!(check_tune("X:1\nK:C\n|c2/4|").unwrap(), "X:1\nK:C\n|c/2|");
}

#[test]
fn test_check_tune_reports_body_errors() {
    assert!(check_tune("X:1\nK:C\n|[ce").is_err());
    assert!(check_tune("X:1\nK:C\n|(ceg|").is_err());
}

#[test]
fn test_build_exercise_climbs_and_descends() {
    let yaml = r#"start: {pitch-class: 0, octave: 5}
ceiling: {pitch-class: 2, octave: 5}
floor: {pitch-class: 0, octave: 5}
"#;
    let spec = RangeSpec::from_yaml(yaml).unwrap();
    let exercise = build_exercise("X:1\nK:C\nT:March\n|c|", &spec).unwrap();
    assert_eq!(exercise, "X:1\nK:C\nT:March\n|c|^c|d|^c|c|");
}

#[test]
fn test_build_exercise_respells_in_a_flat_key() {
    let yaml = r#"start: {pitch-class: 10, octave: 5}
ceiling: {pitch-class: 0, octave: 6}
floor: {pitch-class: 10, octave: 5}
"#;
    let spec = RangeSpec::from_yaml(yaml).unwrap();
    let exercise = build_exercise("X:1\nK:F\n|b|", &spec).unwrap();
    assert_eq!(exercise, "X:1\nK:F\n|b|=b|c'|=b|b|");
}

#[test]
fn test_build_exercise_without_notes_returns_the_tune() {
    let spec = RangeSpec::default();
    let tune = "X:1\nK:C\n|z4|";
    assert_eq!(build_exercise(tune, &spec).unwrap(), tune);
}

#[test]
fn test_build_exercise_reports_parse_errors() {
    let spec = RangeSpec::default();
    assert!(build_exercise("X:1\nK:C\n|[ce", &spec).is_err());
}

#[test]
fn test_range_spec_rejects_malformed_yaml() {
    assert!(RangeSpec::from_yaml(":").is_err());
    assert!(RangeSpec::from_yaml("ascending-step: [1").is_err());
}

#[test]
fn test_session_extends_and_retracts() {
    let mut session = ExerciseSession::new("X:1\nK:C\n|ceg|");

    session.extend_ascending().unwrap();
    assert_eq!(session.text(), "X:1\nK:C\n|ceg|^cf^g|");
    assert_eq!(session.ascending_offset(), 1);

    session.retract_ascending().unwrap();
    assert_eq!(session.text(), "X:1\nK:C\n|ceg|");
    assert_eq!(session.ascending_offset(), 0);

    session.extend_descending().unwrap();
    assert_eq!(session.text(), "X:1\nK:C\n|ceg|B^d^f|");

    session.retract_descending().unwrap();
    assert_eq!(session.text(), "X:1\nK:C\n|ceg|");
}

#[test]
fn test_session_retract_stops_at_the_base() {
    let mut session = ExerciseSession::new("X:1\nK:C\n|ceg|");
    session.retract_ascending().unwrap();
    assert_eq!(session.text(), "X:1\nK:C\n|ceg|");
    assert_eq!(session.ascending_offset(), 0);
}

#[test]
fn test_session_commit_widens_the_group() {
    let mut session = ExerciseSession::new("X:1\nK:C\n|ceg|");
    session.extend_ascending().unwrap();
    session.commit();

    // The committed base is now two bars, so extensions and
    // retractions move in two-bar copies.
    session.extend_ascending().unwrap();
    assert_eq!(session.text(), "X:1\nK:C\n|ceg|^cf^g|^cf^g|d^fa|");

    session.retract_ascending().unwrap();
    assert_eq!(session.text(), "X:1\nK:C\n|ceg|^cf^g|");
}

#[test]
fn test_session_moves_the_start() {
    let mut session = ExerciseSession::new("X:1\nK:C\n|c|");

    session.raise_start().unwrap();
    assert_eq!(session.text(), "X:1\nK:C\n|^c|");
    session.raise_start().unwrap();
    assert_eq!(session.text(), "X:1\nK:C\n|d|");
    assert_eq!(session.start_offset(), 2);

    session.lower_start().unwrap();
    assert_eq!(session.text(), "X:1\nK:C\n|^c|");
    assert_eq!(session.start_offset(), 1);
}

#[test]
fn test_session_reset_restores_the_base() {
    let mut session = ExerciseSession::new("X:1\nK:C\n|c|");
    session.raise_start().unwrap();
    session.extend_ascending().unwrap();
    session.reset_to_base();
    assert_eq!(session.text(), "X:1\nK:C\n|c|");
    assert_eq!(session.start_offset(), 0);
    assert_eq!(session.ascending_offset(), 0);
}

#[test]
fn test_session_applies_a_range_spec() {
    let yaml = r#"start: {pitch-class: 0, octave: 5}
ceiling: {pitch-class: 2, octave: 5}
floor: {pitch-class: 10, octave: 4}
"#;
    let spec = RangeSpec::from_yaml(yaml).unwrap();
    let mut session = ExerciseSession::new("X:1\nK:C\n|c|");
    session.apply_range(&spec).unwrap();
    assert_eq!(session.text(), "X:1\nK:C\n|c|^c|d|^c|c|B|^A|");
}
