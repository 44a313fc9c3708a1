//! The notation tree produced by parsing.
//!
//! ```text
//! Score
//! ├── prefix: leading whitespace
//! ├── bars
//! │   └── elements: Whitespace | Note | Rest | Chord | Tuplet
//! └── suffix: trailing whitespace
//! ```
//!
//! All nodes are owned and clone deeply. `generate` renders a node
//! back to text; parsing a text and generating it again is a fixed
//! point once the input has been canonicalized (durations in lowest
//! terms, a closing bar line present).

use crate::error::AmbitusError;
use crate::keys::AlterationTable;
use crate::token::{Accidental, Duration, Octave, Pitch, Whitespace};

/// One element inside a bar, chord or tuplet.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Whitespace(Whitespace),
    Note(Note),
    Rest(Rest),
    Chord(Chord),
    Tuplet(Tuplet),
}

impl Element {
    pub fn generate(&self) -> String {
        match self {
            Element::Whitespace(whitespace) => whitespace.generate(),
            Element::Note(note) => note.generate(),
            Element::Rest(rest) => rest.generate(),
            Element::Chord(chord) => chord.generate(),
            Element::Tuplet(tuplet) => tuplet.generate(),
        }
    }
}

/// A single sounding note.
///
/// `tone` is derived from the pitch, octave marks and resolved
/// accidental at construction time and kept in step by every
/// transformation, so scans and transpositions never re-derive it.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub pitch: Pitch,
    pub octave: Octave,
    pub duration: Duration,
    pub accidental: Accidental,
    pub(crate) tone: i32,
}

impl Note {
    pub fn new(pitch: Pitch, octave: Octave, duration: Duration, accidental: Accidental) -> Self {
        let tone = pitch.to_tone() + octave.to_tone() + accidental.to_tone();
        Note {
            pitch,
            octave,
            duration,
            accidental,
            tone,
        }
    }

    /// Absolute semitone value; lower-case `c` with no marks is 60.
    pub fn tone(&self) -> i32 {
        self.tone
    }

    pub fn generate(&self) -> String {
        format!(
            "{}{}{}{}",
            self.accidental.generate(),
            self.pitch.generate(),
            self.octave.generate(),
            self.duration.generate()
        )
    }
}

/// A rest (`z`) with a duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Rest {
    pub duration: Duration,
}

impl Rest {
    pub fn generate(&self) -> String {
        format!("z{}", self.duration.generate())
    }
}

/// Simultaneous notes in brackets, with one chord-level duration.
/// Inner notes keep whatever duration they were written with.
#[derive(Debug, Clone, PartialEq)]
pub struct Chord {
    pub elements: Vec<Element>,
    pub duration: Duration,
}

impl Chord {
    pub fn generate(&self) -> String {
        let mut output = String::from("[");
        for element in &self.elements {
            output.push_str(&element.generate());
        }
        output.push(']');
        output.push_str(&self.duration.generate());
        output
    }
}

/// A tuplet: `(` followed by the declared note count, then exactly
/// that many sounding elements (whitespace between them is kept but
/// does not count).
#[derive(Debug, Clone, PartialEq)]
pub struct Tuplet {
    pub count: u32,
    pub elements: Vec<Element>,
}

impl Tuplet {
    pub fn generate(&self) -> String {
        let mut output = format!("({}", self.count);
        for element in &self.elements {
            output.push_str(&element.generate());
        }
        output
    }
}

/// The elements between one `|` and the next.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub elements: Vec<Element>,
}

impl Bar {
    pub fn generate(&self) -> String {
        let mut output = String::from("|");
        for element in &self.elements {
            output.push_str(&element.generate());
        }
        output
    }
}

/// A parsed notation body: leading whitespace, bars, trailing
/// whitespace, and the alteration table of the key signature the
/// body was parsed under.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub prefix: Vec<Whitespace>,
    pub bars: Vec<Bar>,
    pub suffix: Vec<Whitespace>,
    pub alterations: AlterationTable,
}

impl Score {
    pub fn generate(&self) -> String {
        let mut output = String::new();
        for whitespace in &self.prefix {
            output.push_str(&whitespace.generate());
        }
        for bar in &self.bars {
            output.push_str(&bar.generate());
        }
        output.push('|');
        for whitespace in &self.suffix {
            output.push_str(&whitespace.generate());
        }
        output
    }

    /// Appends another score's bars to this one and adopts its
    /// trailing whitespace. Both scores must carry the same
    /// alteration table.
    pub fn extend(&mut self, other: Score) -> Result<(), AmbitusError> {
        if let Some(letter) = self.alterations.first_mismatch(&other.alterations) {
            return Err(AmbitusError::KeySignatureMismatch {
                letter: letter.as_char(),
            });
        }
        self.bars.extend(other.bars);
        self.suffix = other.suffix;
        Ok(())
    }
}
