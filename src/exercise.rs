//! Building range exercises from a notation fragment.
//!
//! An exercise stacks transposed copies of a fragment so a player can
//! walk it through their register: the fragment is moved so its first
//! note lands on a chosen starting pitch, copies climb step by step
//! until the fragment's highest note meets the ceiling, and the line
//! then walks back down until the lowest note reaches the floor.
//!
//! [`build_exercise`] runs that pipeline over a whole tune in one
//! call. [`ExerciseSession`] covers the incremental workflow instead:
//! nudge the starting pitch a semitone at a time, push single
//! transposed copies of the committed fragment onto the end, and take
//! them back, with the committed base deciding how many bars form one
//! copy.

use serde::Deserialize;

use crate::ast::{Chord, Element, Score};
use crate::error::AmbitusError;
use crate::header::{sheet_key, split_tune};
use crate::parser::parse_in_key;

/// A register position: a pitch class (0 is c, 11 is b) and an
/// octave, with octave 5 holding middle c (tone 60).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RegisterPitch {
    pub pitch_class: i32,
    pub octave: i32,
}

impl RegisterPitch {
    pub fn new(pitch_class: i32, octave: i32) -> Self {
        RegisterPitch {
            pitch_class,
            octave,
        }
    }

    pub fn tone(&self) -> i32 {
        self.octave * 12 + self.pitch_class
    }

    pub fn from_tone(tone: i32) -> Self {
        RegisterPitch {
            pitch_class: tone.rem_euclid(12),
            octave: tone.div_euclid(12),
        }
    }
}

/// Where an exercise starts, how far it reaches in both directions,
/// and the step sizes on the way up and down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSpec {
    pub start: RegisterPitch,
    pub ceiling: RegisterPitch,
    pub floor: RegisterPitch,
    pub ascending_step: i32,
    pub descending_step: i32,
}

impl Default for RangeSpec {
    fn default() -> Self {
        RangeSpec {
            start: RegisterPitch::new(0, 4),
            ceiling: RegisterPitch::new(0, 5),
            floor: RegisterPitch::new(0, 3),
            ascending_step: 1,
            descending_step: 1,
        }
    }
}

/// Raw range spec for YAML deserialization.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
struct RawRangeSpec {
    start: Option<RegisterPitch>,
    ceiling: Option<RegisterPitch>,
    floor: Option<RegisterPitch>,
    ascending_step: Option<i32>,
    descending_step: Option<i32>,
}

impl RangeSpec {
    /// Reads a range spec from YAML. Missing fields fall back to the
    /// defaults; steps below one are rejected.
    pub fn from_yaml(content: &str) -> Result<Self, AmbitusError> {
        let raw: RawRangeSpec = serde_yaml::from_str(content)
            .map_err(|e| AmbitusError::InvalidSpec(e.to_string()))?;
        let defaults = RangeSpec::default();
        let spec = RangeSpec {
            start: raw.start.unwrap_or(defaults.start),
            ceiling: raw.ceiling.unwrap_or(defaults.ceiling),
            floor: raw.floor.unwrap_or(defaults.floor),
            ascending_step: raw.ascending_step.unwrap_or(defaults.ascending_step),
            descending_step: raw.descending_step.unwrap_or(defaults.descending_step),
        };
        spec.validate_steps()?;
        Ok(spec)
    }

    fn validate_steps(&self) -> Result<(), AmbitusError> {
        if self.ascending_step < 1 || self.descending_step < 1 {
            return Err(AmbitusError::InvalidSpec(
                "transposition steps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// First, highest and lowest sounding tones of a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneRange {
    pub first: i32,
    pub highest: i32,
    pub lowest: i32,
}

/// Scans a score for its first, highest and lowest sounding tones.
/// A chord counts once, at its lowest note; rests and whitespace do
/// not count at all. `None` means nothing in the score sounds.
pub fn scan_range(score: &Score) -> Option<ToneRange> {
    let mut range: Option<ToneRange> = None;
    for bar in &score.bars {
        for element in &bar.elements {
            match element {
                Element::Note(note) => observe(&mut range, note.tone()),
                Element::Chord(chord) => {
                    if let Some(tone) = chord_tone(chord) {
                        observe(&mut range, tone);
                    }
                }
                Element::Tuplet(tuplet) => {
                    for inner in &tuplet.elements {
                        match inner {
                            Element::Note(note) => observe(&mut range, note.tone()),
                            Element::Chord(chord) => {
                                if let Some(tone) = chord_tone(chord) {
                                    observe(&mut range, tone);
                                }
                            }
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }
    }
    range
}

fn observe(range: &mut Option<ToneRange>, tone: i32) {
    match range {
        None => {
            *range = Some(ToneRange {
                first: tone,
                highest: tone,
                lowest: tone,
            })
        }
        Some(range) => {
            range.highest = range.highest.max(tone);
            range.lowest = range.lowest.min(tone);
        }
    }
}

fn chord_tone(chord: &Chord) -> Option<i32> {
    chord
        .elements
        .iter()
        .filter_map(|element| match element {
            Element::Note(note) => Some(note.tone()),
            _ => None,
        })
        .min()
}

/// Stacks transposed copies of a fragment across a range.
///
/// The fragment is first moved so its opening note lands on the
/// start pitch. Ascending copies follow, one per step, while the
/// climb stays within the room between the fragment's highest note
/// and the ceiling; the descent then walks from one semitone below
/// that climb down until the fragment's lowest note reaches the
/// floor.
pub fn assemble(
    score: &Score,
    range: &ToneRange,
    spec: &RangeSpec,
) -> Result<Score, AmbitusError> {
    spec.validate_steps()?;

    let starting_interval = spec.start.tone() - range.first;
    let mut base = score.clone();
    base.transpose(starting_interval);

    let highest_interval = spec.ceiling.tone() - (range.highest + starting_interval);
    let mut exercise = base.clone();
    let mut amount = spec.ascending_step;
    let mut counter = 1;
    while counter <= highest_interval {
        let mut copy = base.clone();
        copy.transpose(amount);
        exercise.extend(copy)?;
        amount += spec.ascending_step;
        counter += spec.ascending_step;
    }

    let lowest_interval = spec.floor.tone() - (range.lowest + starting_interval);
    let mut amount = highest_interval - 1;
    while amount >= lowest_interval {
        let mut copy = base.clone();
        copy.transpose(amount);
        exercise.extend(copy)?;
        amount -= spec.descending_step;
    }

    Ok(exercise)
}

/// Builds a complete exercise from a tune: splits off the header,
/// parses the body under the header's key, and stacks transposed
/// copies across the requested range. A tune whose body has nothing
/// sounding comes back unchanged.
pub fn build_exercise(tune: &str, spec: &RangeSpec) -> Result<String, AmbitusError> {
    let parts = split_tune(tune);
    let score = parse_in_key(&parts.body, sheet_key(&parts.header))?;
    let range = match scan_range(&score) {
        Some(range) => range,
        None => return Ok(tune.to_string()),
    };
    let exercise = assemble(&score, &range, spec)?;
    Ok(format!("{}\n{}", parts.header, exercise.generate()))
}

/// An editing session over a tune: the working text plus the last
/// committed base, with counters tracking how far the manual
/// operations have drifted from it.
///
/// Every operation re-reads the working text, so edits made through
/// [`set_text`](ExerciseSession::set_text) between operations are
/// picked up. Counters only move when the operation itself succeeds.
#[derive(Debug, Clone)]
pub struct ExerciseSession {
    text: String,
    base_header: String,
    base_body: String,
    start_offset: i32,
    ascending_offset: i32,
    descending_offset: i32,
}

impl ExerciseSession {
    /// Opens a session on a tune; the tune as given becomes the
    /// committed base.
    pub fn new(tune: &str) -> Self {
        let parts = split_tune(tune);
        ExerciseSession {
            text: tune.to_string(),
            base_header: parts.header,
            base_body: parts.body,
            start_offset: 0,
            ascending_offset: 0,
            descending_offset: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the working text without touching the committed base.
    pub fn set_text(&mut self, tune: &str) {
        self.text = tune.to_string();
    }

    pub fn start_offset(&self) -> i32 {
        self.start_offset
    }

    pub fn ascending_offset(&self) -> i32 {
        self.ascending_offset
    }

    pub fn descending_offset(&self) -> i32 {
        self.descending_offset
    }

    /// Makes the working text the new committed base and zeroes the
    /// counters.
    pub fn commit(&mut self) {
        let parts = split_tune(&self.text);
        self.base_header = parts.header;
        self.base_body = parts.body;
        self.start_offset = 0;
        self.ascending_offset = 0;
        self.descending_offset = 0;
    }

    /// Discards the working text in favor of the committed base.
    pub fn reset_to_base(&mut self) {
        self.text = format!("{}\n{}", self.base_header, self.base_body);
        self.start_offset = 0;
        self.ascending_offset = 0;
        self.descending_offset = 0;
    }

    /// Replaces the working text with a full exercise built from it.
    pub fn apply_range(&mut self, spec: &RangeSpec) -> Result<(), AmbitusError> {
        self.text = build_exercise(&self.text, spec)?;
        Ok(())
    }

    /// Moves the whole body up a semitone.
    pub fn raise_start(&mut self) -> Result<(), AmbitusError> {
        self.shift_body(1)?;
        self.start_offset += 1;
        Ok(())
    }

    /// Moves the whole body down a semitone.
    pub fn lower_start(&mut self) -> Result<(), AmbitusError> {
        self.shift_body(-1)?;
        self.start_offset -= 1;
        Ok(())
    }

    /// Appends a copy of the last committed group, one semitone up.
    pub fn extend_ascending(&mut self) -> Result<(), AmbitusError> {
        self.append_group(1)?;
        self.ascending_offset += 1;
        Ok(())
    }

    /// Appends a copy of the last committed group, one semitone down.
    pub fn extend_descending(&mut self) -> Result<(), AmbitusError> {
        self.append_group(-1)?;
        self.descending_offset += 1;
        Ok(())
    }

    /// Takes back the most recent ascending extension. Removal stops
    /// at the committed base; the counter never drops below zero.
    pub fn retract_ascending(&mut self) -> Result<(), AmbitusError> {
        self.remove_group()?;
        self.ascending_offset = (self.ascending_offset - 1).max(0);
        Ok(())
    }

    /// Takes back the most recent descending extension.
    pub fn retract_descending(&mut self) -> Result<(), AmbitusError> {
        self.remove_group()?;
        self.descending_offset = (self.descending_offset - 1).max(0);
        Ok(())
    }

    fn shift_body(&mut self, semitones: i32) -> Result<(), AmbitusError> {
        let body = split_tune(&self.text).body;
        let mut score = parse_in_key(&body, sheet_key(&self.base_header))?;
        score.transpose(semitones);
        self.text = format!("{}\n{}", self.base_header, score.generate());
        Ok(())
    }

    fn append_group(&mut self, semitones: i32) -> Result<(), AmbitusError> {
        let body = split_tune(&self.text).body;
        let mut score = parse_in_key(&body, sheet_key(&self.base_header))?;
        let group_len = self.committed_bar_count()?.min(score.bars.len());
        let mut addition = Score {
            prefix: Vec::new(),
            bars: score.bars[score.bars.len() - group_len..].to_vec(),
            suffix: Vec::new(),
            alterations: score.alterations,
        };
        addition.transpose(semitones);
        score.extend(addition)?;
        self.text = format!("{}\n{}", self.base_header, score.generate());
        Ok(())
    }

    fn remove_group(&mut self) -> Result<(), AmbitusError> {
        let parts = split_tune(&self.text);
        let mut score = parse_in_key(&parts.body, sheet_key(&parts.header))?;
        let base_count = self.committed_bar_count()?;
        if score.bars.len() <= base_count {
            return Ok(());
        }
        let excess = score.bars.len() - base_count;
        score.bars.truncate(score.bars.len() - excess.min(base_count));
        self.text = format!("{}\n{}", parts.header, score.generate());
        Ok(())
    }

    fn committed_bar_count(&self) -> Result<usize, AmbitusError> {
        let score = parse_in_key(&self.base_body, sheet_key(&self.base_header))?;
        Ok(score.bars.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn spec(
        start: (i32, i32),
        ceiling: (i32, i32),
        floor: (i32, i32),
        up: i32,
        down: i32,
    ) -> RangeSpec {
        RangeSpec {
            start: RegisterPitch::new(start.0, start.1),
            ceiling: RegisterPitch::new(ceiling.0, ceiling.1),
            floor: RegisterPitch::new(floor.0, floor.1),
            ascending_step: up,
            descending_step: down,
        }
    }

    #[test]
    fn test_register_pitch_tones() {
        assert_eq!(RegisterPitch::new(0, 5).tone(), 60);
        assert_eq!(RegisterPitch::new(7, 4).tone(), 55);
        assert_eq!(RegisterPitch::from_tone(59), RegisterPitch::new(11, 4));
        assert_eq!(RegisterPitch::from_tone(-1), RegisterPitch::new(11, -1));
    }

    #[test]
    fn test_scan_range_tracks_first_highest_lowest() {
        let score = parse("|ceg|C|").unwrap();
        let range = scan_range(&score).unwrap();
        assert_eq!(range.first, 60);
        assert_eq!(range.highest, 67);
        assert_eq!(range.lowest, 48);
    }

    #[test]
    fn test_scan_range_ranks_chords_by_lowest_note() {
        let score = parse("|[ceg]a|").unwrap();
        let range = scan_range(&score).unwrap();
        assert_eq!(range.first, 60);
        assert_eq!(range.highest, 69);
    }

    #[test]
    fn test_scan_range_descends_into_tuplets() {
        let score = parse("|(3ce'C,|").unwrap();
        let range = scan_range(&score).unwrap();
        assert_eq!(range.first, 60);
        assert_eq!(range.highest, 76);
        assert_eq!(range.lowest, 36);
    }

    #[test]
    fn test_scan_range_ignores_rests_and_silence() {
        assert!(scan_range(&parse("|z2 z|").unwrap()).is_none());
        assert!(scan_range(&parse("| |").unwrap()).is_none());
    }

    #[test]
    fn test_assemble_climbs_then_descends() {
        let score = parse("|c|").unwrap();
        let range = scan_range(&score).unwrap();
        let exercise = assemble(&score, &range, &spec((0, 5), (2, 5), (0, 5), 1, 1)).unwrap();
        assert_eq!(exercise.generate(), "|c|^c|d|^c|c|");
    }

    #[test]
    fn test_assemble_ceiling_binds_the_highest_note() {
        let score = parse("|ceg|").unwrap();
        let range = scan_range(&score).unwrap();
        let exercise = assemble(&score, &range, &spec((0, 5), (0, 6), (5, 5), 1, 1)).unwrap();
        assert_eq!(
            exercise.generate(),
            "|ceg|^cf^g|d^fa|^dg^a|e^gb|fac'|"
        );
    }

    #[test]
    fn test_assemble_descending_only() {
        let score = parse("|c|").unwrap();
        let range = scan_range(&score).unwrap();
        let exercise = assemble(&score, &range, &spec((0, 5), (7, 4), (0, 4), 1, 1)).unwrap();
        assert_eq!(exercise.generate(), "|c|^F|F|E|^D|D|^C|C|");
    }

    #[test]
    fn test_assemble_with_wider_steps() {
        let score = parse("|c|").unwrap();
        let range = scan_range(&score).unwrap();
        let exercise = assemble(&score, &range, &spec((0, 5), (3, 5), (0, 5), 2, 2)).unwrap();
        assert_eq!(exercise.generate(), "|c|d|e|d|c|");
    }

    #[test]
    fn test_assemble_rejects_non_positive_steps() {
        let score = parse("|c|").unwrap();
        let range = scan_range(&score).unwrap();
        let err = assemble(&score, &range, &spec((0, 5), (2, 5), (0, 5), 0, 1)).unwrap_err();
        assert!(matches!(err, AmbitusError::InvalidSpec(_)));
    }

    #[test]
    fn test_from_yaml_fills_in_defaults() {
        let spec = RangeSpec::from_yaml("{}").unwrap();
        assert_eq!(spec, RangeSpec::default());

        let spec =
            RangeSpec::from_yaml("start: {pitch-class: 2, octave: 5}\nascending-step: 3").unwrap();
        assert_eq!(spec.start, RegisterPitch::new(2, 5));
        assert_eq!(spec.ceiling, RegisterPitch::new(0, 5));
        assert_eq!(spec.ascending_step, 3);
        assert_eq!(spec.descending_step, 1);
    }

    #[test]
    fn test_from_yaml_ignores_unknown_keys() {
        // "::::" reads as a mapping with the single key ":::".
        assert_eq!(RangeSpec::from_yaml("::::").unwrap(), RangeSpec::default());

        let spec = RangeSpec::from_yaml("tempo: 120\ndescending-step: 2").unwrap();
        assert_eq!(spec.descending_step, 2);
        assert_eq!(spec.ascending_step, 1);
    }

    #[test]
    fn test_from_yaml_rejects_bad_steps() {
        assert!(RangeSpec::from_yaml("ascending-step: 0").is_err());
        assert!(RangeSpec::from_yaml("descending-step: -2").is_err());
    }

    #[test]
    fn test_session_counters_move_only_on_success() {
        let mut session = ExerciseSession::new("X:1\nK:C\n|c|");
        session.set_text("X:1\nK:C\n|[c|");
        assert!(session.raise_start().is_err());
        assert_eq!(session.start_offset(), 0);
        assert!(session.extend_ascending().is_err());
        assert_eq!(session.ascending_offset(), 0);
    }
}
