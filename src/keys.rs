//! Key signatures as per-letter alteration tables, and the registry
//! that resolves key names (`D`, `f#min`, `AM`, `CDORIAN`, ...) to
//! tables.

use crate::token::Letter;

/// Per-letter semitone shifts, indexed a through g.
///
/// A score carries the table of its key signature. Each bar works on
/// its own value copy of that table, so accidental writes made while
/// resolving notes stay local to the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlterationTable {
    shifts: [i32; 7],
}

impl AlterationTable {
    /// Builds a table from shifts in letter order a through g.
    pub fn new(shifts: [i32; 7]) -> Self {
        AlterationTable { shifts }
    }

    pub fn shift(&self, letter: Letter) -> i32 {
        self.shifts[letter.index()]
    }

    pub fn set_shift(&mut self, letter: Letter, shift: i32) {
        self.shifts[letter.index()] = shift;
    }

    /// First letter, scanning a through g, on which the two tables
    /// disagree.
    pub fn first_mismatch(&self, other: &AlterationTable) -> Option<Letter> {
        Letter::ALL
            .iter()
            .copied()
            .find(|&letter| self.shift(letter) != other.shift(letter))
    }
}

/// Resolves a key name to its alteration table.
///
/// Names are case-insensitive. Accepted forms are major keys (`D`,
/// `DMAJ`), minor keys (`BMIN`, `BM`), and modal names built from a
/// root and at least three characters of the mode name (`CDOR`,
/// `ADORIAN`, `F#MIXOLYD`), which resolve to the table of the mode's
/// relative major.
pub fn alterations_for(name: &str) -> Option<AlterationTable> {
    let name = name.to_ascii_uppercase();
    named_table(&name).or_else(|| modal_table(&name))
}

/// Like [`alterations_for`], but unresolved names fall back to the
/// all-zero table.
pub fn alterations_or_default(name: &str) -> AlterationTable {
    alterations_for(name).unwrap_or_default()
}

fn named_table(name: &str) -> Option<AlterationTable> {
    //                                                        a   b   c   d   e   f   g
    let shifts: [i32; 7] = match name {
        "C" | "CMAJ" | "AMIN" | "AM" =>                     [ 0,  0,  0,  0,  0,  0,  0],
        "G" | "GMAJ" | "EMIN" | "EM" =>                     [ 0,  0,  0,  0,  0,  1,  0],
        "D" | "DMAJ" | "BMIN" | "BM" =>                     [ 0,  0,  1,  0,  0,  1,  0],
        "A" | "AMAJ" | "F#MIN" | "F#M" =>                   [ 0,  0,  1,  0,  0,  1,  1],
        "E" | "EMAJ" | "C#MIN" | "C#M" =>                   [ 0,  0,  1,  1,  0,  1,  1],
        "B" | "BMAJ" | "G#MIN" | "G#M" =>                   [ 1,  0,  1,  1,  0,  1,  1],
        "F#" | "F#MAJ" | "D#MIN" | "D#M" =>                 [ 1,  0,  1,  1,  1,  1,  1],
        "C#" | "C#MAJ" | "A#MIN" | "A#M" =>                 [ 1,  1,  1,  1,  1,  1,  1],
        "F" | "FMAJ" | "DMIN" | "DM" =>                     [ 0, -1,  0,  0,  0,  0,  0],
        "BB" | "BBMAJ" | "GMIN" | "GM" =>                   [ 0, -1,  0,  0, -1,  0,  0],
        "EB" | "EBMAJ" | "CMIN" | "CM" =>                   [-1, -1,  0,  0, -1,  0,  0],
        "AB" | "ABMAJ" | "FMIN" | "FM" =>                   [-1, -1,  0, -1, -1,  0,  0],
        "DB" | "DBMAJ" | "BBMIN" | "BBM" =>                 [-1, -1,  0, -1, -1,  0, -1],
        "GB" | "GBMAJ" | "EBMIN" | "EBM" =>                 [-1, -1, -1, -1, -1,  0, -1],
        "CB" | "CBMAJ" | "ABMIN" | "ABM" =>                 [-1, -1, -1, -1, -1, -1, -1],
        _ => return None,
    };
    Some(AlterationTable::new(shifts))
}

const MODES: [&str; 7] = [
    "IONIAN",
    "DORIAN",
    "PHRYGIAN",
    "LYDIAN",
    "MIXOLYDIAN",
    "AEOLIAN",
    "LOCRIAN",
];

// Two-character roots listed first so "EB..." is never read as E.
const MODAL_ROOTS: [&str; 12] = [
    "C#", "EB", "F#", "AB", "A#", "C", "D", "E", "F", "G", "A", "B",
];

fn modal_table(name: &str) -> Option<AlterationTable> {
    let root = MODAL_ROOTS.iter().find(|root| name.starts_with(*root))?;
    let rest = &name[root.len()..];
    if rest.len() < 3 {
        return None;
    }
    let mode = MODES.iter().find(|mode| mode.starts_with(rest))?;
    named_table(modal_origin(root, mode)?)
}

// Modal names resolve to the relative major of (root, mode).
// Combinations whose relative major has no table of its own (the
// sharp-side spellings G#, D# and A# major) resolve to none.
fn modal_origin(root: &str, mode: &str) -> Option<&'static str> {
    Some(match (root, mode) {
        ("C", "IONIAN") => "C",
        ("C", "DORIAN") => "BB",
        ("C", "PHRYGIAN") => "AB",
        ("C", "LYDIAN") => "G",
        ("C", "MIXOLYDIAN") => "F",
        ("C", "AEOLIAN") => "EB",
        ("C", "LOCRIAN") => "DB",

        ("C#", "IONIAN") => "C#",
        ("C#", "DORIAN") => "B",
        ("C#", "PHRYGIAN") => "A",
        ("C#", "MIXOLYDIAN") => "F#",
        ("C#", "AEOLIAN") => "E",
        ("C#", "LOCRIAN") => "D",

        ("D", "IONIAN") => "D",
        ("D", "DORIAN") => "C",
        ("D", "PHRYGIAN") => "BB",
        ("D", "LYDIAN") => "A",
        ("D", "MIXOLYDIAN") => "G",
        ("D", "AEOLIAN") => "F",
        ("D", "LOCRIAN") => "EB",

        ("EB", "IONIAN") => "EB",
        ("EB", "DORIAN") => "DB",
        ("EB", "PHRYGIAN") => "B",
        ("EB", "LYDIAN") => "BB",
        ("EB", "MIXOLYDIAN") => "AB",
        ("EB", "AEOLIAN") => "GB",
        ("EB", "LOCRIAN") => "E",

        ("E", "IONIAN") => "E",
        ("E", "DORIAN") => "D",
        ("E", "PHRYGIAN") => "C",
        ("E", "LYDIAN") => "B",
        ("E", "MIXOLYDIAN") => "A",
        ("E", "AEOLIAN") => "G",
        ("E", "LOCRIAN") => "F",

        ("F", "IONIAN") => "F",
        ("F", "DORIAN") => "EB",
        ("F", "PHRYGIAN") => "DB",
        ("F", "LYDIAN") => "C",
        ("F", "MIXOLYDIAN") => "BB",
        ("F", "AEOLIAN") => "AB",
        ("F", "LOCRIAN") => "GB",

        ("F#", "IONIAN") => "F#",
        ("F#", "DORIAN") => "E",
        ("F#", "PHRYGIAN") => "D",
        ("F#", "LYDIAN") => "C#",
        ("F#", "MIXOLYDIAN") => "B",
        ("F#", "AEOLIAN") => "A",
        ("F#", "LOCRIAN") => "G",

        ("G", "IONIAN") => "G",
        ("G", "DORIAN") => "F",
        ("G", "PHRYGIAN") => "EB",
        ("G", "LYDIAN") => "D",
        ("G", "MIXOLYDIAN") => "C",
        ("G", "AEOLIAN") => "BB",
        ("G", "LOCRIAN") => "AB",

        ("AB", "IONIAN") => "AB",
        ("AB", "DORIAN") => "GB",
        ("AB", "PHRYGIAN") => "E",
        ("AB", "LYDIAN") => "EB",
        ("AB", "MIXOLYDIAN") => "DB",
        ("AB", "AEOLIAN") => "B",
        ("AB", "LOCRIAN") => "A",

        ("A", "IONIAN") => "A",
        ("A", "DORIAN") => "G",
        ("A", "PHRYGIAN") => "F",
        ("A", "LYDIAN") => "E",
        ("A", "MIXOLYDIAN") => "D",
        ("A", "AEOLIAN") => "C",
        ("A", "LOCRIAN") => "BB",

        ("A#", "PHRYGIAN") => "F#",
        ("A#", "LYDIAN") => "F",
        ("A#", "AEOLIAN") => "C#",
        ("A#", "LOCRIAN") => "B",

        ("B", "IONIAN") => "B",
        ("B", "DORIAN") => "A",
        ("B", "PHRYGIAN") => "G",
        ("B", "LYDIAN") => "F#",
        ("B", "MIXOLYDIAN") => "E",
        ("B", "AEOLIAN") => "D",
        ("B", "LOCRIAN") => "C",

        _ => return None,
    })
}
