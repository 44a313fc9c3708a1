use crate::ast::{Bar, Chord, Element, Note, Score, Tuplet};
use crate::keys::AlterationTable;
use crate::token::{Accidental, Letter, Octave, PartialAccidental, Pitch};

/// Spelling candidates for each pitch class. An entry is a letter,
/// the accidental to write (or none, deferring to the alteration
/// table), and an octave correction for spellings that reach across
/// the octave boundary. Plain letters come first so the key and the
/// bar's earlier accidentals decide the spelling whenever they can;
/// the last entry of every row writes an explicit accidental and
/// always matches.
const RESPELL: [&[(Letter, PartialAccidental, i32)]; 12] = [
    // 0: c
    &[
        (Letter::C, PartialAccidental::None, 0),
        (Letter::B, PartialAccidental::None, -1),
        (Letter::D, PartialAccidental::None, 0),
        (Letter::C, PartialAccidental::Natural, 0),
    ],
    // 1: c sharp / d flat
    &[
        (Letter::C, PartialAccidental::None, 0),
        (Letter::D, PartialAccidental::None, 0),
        (Letter::B, PartialAccidental::None, -1),
        (Letter::C, PartialAccidental::Sharp, 0),
    ],
    // 2: d
    &[
        (Letter::D, PartialAccidental::None, 0),
        (Letter::C, PartialAccidental::None, 0),
        (Letter::E, PartialAccidental::None, 0),
        (Letter::D, PartialAccidental::Natural, 0),
    ],
    // 3: d sharp / e flat
    &[
        (Letter::D, PartialAccidental::None, 0),
        (Letter::E, PartialAccidental::None, 0),
        (Letter::F, PartialAccidental::None, 0),
        (Letter::D, PartialAccidental::Sharp, 0),
    ],
    // 4: e
    &[
        (Letter::E, PartialAccidental::None, 0),
        (Letter::F, PartialAccidental::None, 0),
        (Letter::D, PartialAccidental::None, 0),
        (Letter::E, PartialAccidental::Natural, 0),
    ],
    // 5: f
    &[
        (Letter::F, PartialAccidental::None, 0),
        (Letter::E, PartialAccidental::None, 0),
        (Letter::G, PartialAccidental::None, 0),
        (Letter::F, PartialAccidental::Natural, 0),
    ],
    // 6: f sharp / g flat
    &[
        (Letter::F, PartialAccidental::None, 0),
        (Letter::G, PartialAccidental::None, 0),
        (Letter::E, PartialAccidental::None, 0),
        (Letter::F, PartialAccidental::Sharp, 0),
    ],
    // 7: g
    &[
        (Letter::G, PartialAccidental::None, 0),
        (Letter::F, PartialAccidental::None, 0),
        (Letter::A, PartialAccidental::None, 0),
        (Letter::G, PartialAccidental::Natural, 0),
    ],
    // 8: g sharp / a flat
    &[
        (Letter::G, PartialAccidental::None, 0),
        (Letter::A, PartialAccidental::None, 0),
        (Letter::G, PartialAccidental::Sharp, 0),
    ],
    // 9: a
    &[
        (Letter::A, PartialAccidental::None, 0),
        (Letter::G, PartialAccidental::None, 0),
        (Letter::B, PartialAccidental::None, 0),
        (Letter::A, PartialAccidental::Natural, 0),
    ],
    // 10: a sharp / b flat
    &[
        (Letter::A, PartialAccidental::None, 0),
        (Letter::B, PartialAccidental::None, 0),
        (Letter::C, PartialAccidental::None, 1),
        (Letter::A, PartialAccidental::Sharp, 0),
    ],
    // 11: b
    &[
        (Letter::B, PartialAccidental::None, 0),
        (Letter::C, PartialAccidental::None, 1),
        (Letter::A, PartialAccidental::None, 0),
        (Letter::B, PartialAccidental::Natural, 0),
    ],
];

impl Note {
    /// Moves the note by `semitones` and picks a spelling for the new
    /// tone. Plain-letter candidates resolve against the bar's
    /// alteration table, so the key signature and accidentals already
    /// written in the bar shape the result; when none of them lands
    /// on the tone, the closing candidate writes an accidental into
    /// the table, visible to the rest of the bar.
    pub fn transpose(&mut self, semitones: i32, alterations: &mut AlterationTable) {
        self.tone += semitones;
        let pitch_class = self.tone.rem_euclid(12);
        let octave = self.tone.div_euclid(12);
        for &(letter, partial, correction) in RESPELL[pitch_class as usize] {
            let mut pitch = Pitch::new(letter, 0);
            // Plain c is tone 60, five octaves up from zero.
            let mut marks = Octave::new(octave + correction - 5);
            let accidental = Accidental::resolve(partial, letter, alterations);
            if marks.modifier == -1 {
                pitch.case_shift = -1;
                marks.modifier = 0;
            }
            let candidate_tone = pitch.to_tone() + marks.to_tone() + accidental.to_tone();
            if candidate_tone == self.tone {
                self.pitch = pitch;
                self.octave = marks;
                self.accidental = accidental;
                break;
            }
        }
    }
}

impl Chord {
    pub fn transpose(&mut self, semitones: i32, alterations: &mut AlterationTable) {
        for element in &mut self.elements {
            if let Element::Note(note) = element {
                note.transpose(semitones, alterations);
            }
        }
    }
}

impl Tuplet {
    pub fn transpose(&mut self, semitones: i32, alterations: &mut AlterationTable) {
        for element in &mut self.elements {
            match element {
                Element::Note(note) => note.transpose(semitones, alterations),
                Element::Chord(chord) => chord.transpose(semitones, alterations),
                _ => {}
            }
        }
    }
}

impl Bar {
    /// Transposes the bar against its own copy of the alteration
    /// table, mirroring how the bar was parsed.
    pub fn transpose(&mut self, semitones: i32, mut alterations: AlterationTable) {
        for element in &mut self.elements {
            match element {
                Element::Note(note) => note.transpose(semitones, &mut alterations),
                Element::Chord(chord) => chord.transpose(semitones, &mut alterations),
                Element::Tuplet(tuplet) => tuplet.transpose(semitones, &mut alterations),
                _ => {}
            }
        }
    }
}

impl Score {
    /// Transposes every bar by `semitones`, respelling notes as it
    /// goes. Each bar starts from a fresh copy of the score's key
    /// table; accidentals resolved during parsing are not carried
    /// over.
    pub fn transpose(&mut self, semitones: i32) {
        let alterations = self.alterations;
        for bar in &mut self.bars {
            bar.transpose(semitones, alterations);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, parse_in_key};

    #[test]
    fn test_semitone_up_writes_a_sharp() {
        let mut score = parse("|c|").unwrap();
        score.transpose(1);
        assert_eq!(score.generate(), "|^c|");
    }

    #[test]
    fn test_tones_move_exactly_by_the_interval() {
        let mut score = parse("|c^d_ez|").unwrap();
        let before: Vec<i32> = score.bars[0]
            .elements
            .iter()
            .filter_map(|element| match element {
                Element::Note(note) => Some(note.tone()),
                _ => None,
            })
            .collect();
        score.transpose(5);
        let after: Vec<i32> = score.bars[0]
            .elements
            .iter()
            .filter_map(|element| match element {
                Element::Note(note) => Some(note.tone()),
                _ => None,
            })
            .collect();
        assert_eq!(before.len(), 3);
        for (b, a) in before.iter().zip(&after) {
            assert_eq!(a - b, 5);
        }
    }

    #[test]
    fn test_octave_up_adds_marks() {
        let mut score = parse("|[ceg]z2cdcd|").unwrap();
        score.transpose(12);
        assert_eq!(score.generate(), "|[c'e'g']z2c'd'c'd'|");
    }

    #[test]
    fn test_octave_down_folds_into_upper_case() {
        let mut score = parse("|c|").unwrap();
        score.transpose(-12);
        assert_eq!(score.generate(), "|C|");
    }

    #[test]
    fn test_transposition_round_trips() {
        let mut score = parse("|cdef|").unwrap();
        score.transpose(7);
        assert_eq!(score.generate(), "|gabc'|");
        score.transpose(-7);
        assert_eq!(score.generate(), "|cdef|");
    }

    #[test]
    fn test_flat_key_spells_through_the_table() {
        let mut score = parse_in_key("|a|", "F").unwrap();
        score.transpose(1);
        assert_eq!(score.generate(), "|b|");

        let mut score = parse("|a|").unwrap();
        score.transpose(1);
        assert_eq!(score.generate(), "|^a|");
    }

    #[test]
    fn test_sharp_key_absorbs_the_leading_tone() {
        let mut score = parse_in_key("|f|", "G").unwrap();
        score.transpose(1);
        assert_eq!(score.generate(), "|g|");
    }

    #[test]
    fn test_written_accidental_reaches_later_notes() {
        let mut score = parse("|cc|").unwrap();
        score.transpose(8);
        assert_eq!(score.generate(), "|^gg|");
    }

    #[test]
    fn test_respelling_resets_at_the_bar_line() {
        let mut score = parse("|c|c|").unwrap();
        score.transpose(8);
        assert_eq!(score.generate(), "|^g|^g|");
    }

    #[test]
    fn test_zero_shift_keeps_written_accidentals() {
        let mut score = parse("|^cc|").unwrap();
        score.transpose(0);
        assert_eq!(score.generate(), "|^cc|");
    }

    #[test]
    fn test_tuplets_and_chords_move_together() {
        let mut score = parse("|(3c[eg]c|").unwrap();
        score.transpose(2);
        assert_eq!(score.generate(), "|(3d[^fa]d|");
    }
}
