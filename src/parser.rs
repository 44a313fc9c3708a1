//! Recursive-descent parsing of the notation grammar.
//!
//! ```text
//! score    = whitespace* bar* "|" whitespace*
//! bar      = "|" element*
//! element  = whitespace | tuplet | chord | rest | note
//! tuplet   = "(" count element*      ; until count sounding elements
//! chord    = "[" (whitespace | note)* "]" duration
//! rest     = "z" duration
//! note     = accidental? pitch octave* duration
//! ```
//!
//! Each node carries its own `parse`; dispatch inside a bar is by
//! first character. Written accidentals are resolved as they are
//! parsed: every bar starts from a fresh copy of the score's key
//! table, so an accidental holds for the rest of its bar and no
//! further.
//!
//! The closing `|` of the last bar is recognized by lookahead: a bar
//! line followed by nothing but whitespace closes the score instead
//! of opening another bar.

use crate::ast::{Bar, Chord, Element, Note, Rest, Score, Tuplet};
use crate::cursor::Cursor;
use crate::error::AmbitusError;
use crate::keys::{alterations_or_default, AlterationTable};
use crate::token::{Accidental, Duration, Octave, PartialAccidental, Pitch, Whitespace};

/// Parses a notation body with no key signature applied.
pub fn parse(body: &str) -> Result<Score, AmbitusError> {
    let mut cursor = Cursor::new(body);
    Score::parse(&mut cursor, AlterationTable::default())
}

/// Parses a notation body under the named key signature.
pub fn parse_in_key(body: &str, key: &str) -> Result<Score, AmbitusError> {
    let mut cursor = Cursor::new(body);
    Score::parse(&mut cursor, alterations_or_default(key))
}

impl Note {
    pub fn parse(
        cursor: &mut Cursor,
        alterations: &mut AlterationTable,
    ) -> Result<Self, AmbitusError> {
        let partial = PartialAccidental::parse(cursor)?;
        let pitch = Pitch::parse(cursor)?;
        let octave = Octave::parse(cursor);
        let duration = Duration::parse(cursor)?;
        let accidental = Accidental::resolve(partial, pitch.letter, alterations);
        Ok(Note::new(pitch, octave, duration, accidental))
    }
}

impl Rest {
    pub fn has_first(c: char) -> bool {
        c == 'z'
    }

    pub fn parse(cursor: &mut Cursor) -> Result<Self, AmbitusError> {
        let position = cursor.position();
        match cursor.peek() {
            Some('z') => {
                cursor.advance();
            }
            _ => {
                return Err(AmbitusError::ParseError {
                    position,
                    message: "Expected 'z'".to_string(),
                })
            }
        }
        let duration = Duration::parse(cursor)?;
        Ok(Rest { duration })
    }
}

impl Chord {
    pub fn has_first(c: char) -> bool {
        c == '['
    }

    pub fn parse(
        cursor: &mut Cursor,
        alterations: &mut AlterationTable,
    ) -> Result<Self, AmbitusError> {
        let position = cursor.position();
        match cursor.peek() {
            Some('[') => {
                cursor.advance();
            }
            _ => {
                return Err(AmbitusError::ParseError {
                    position,
                    message: "Expected '[' at the start of a chord".to_string(),
                })
            }
        }
        let mut elements = Vec::new();
        loop {
            match cursor.peek() {
                None => {
                    // Report the bracket that was never closed.
                    return Err(AmbitusError::ParseError {
                        position,
                        message: "Unclosed chord: expected ']'".to_string(),
                    });
                }
                Some(']') => {
                    cursor.advance();
                    break;
                }
                Some(c) if Whitespace::has_first(c) => {
                    elements.push(Element::Whitespace(Whitespace::parse(cursor)?));
                }
                Some(_) => {
                    elements.push(Element::Note(Note::parse(cursor, alterations)?));
                }
            }
        }
        let duration = Duration::parse(cursor)?;
        Ok(Chord { elements, duration })
    }
}

impl Tuplet {
    pub fn has_first(c: char) -> bool {
        c == '('
    }

    pub fn parse(
        cursor: &mut Cursor,
        alterations: &mut AlterationTable,
    ) -> Result<Self, AmbitusError> {
        match cursor.peek() {
            Some('(') => {
                cursor.advance();
            }
            _ => {
                return Err(AmbitusError::ParseError {
                    position: cursor.position(),
                    message: "Expected '(' at the start of a tuplet".to_string(),
                })
            }
        }
        let position = cursor.position();
        if !matches!(cursor.peek(), Some(c) if c.is_ascii_digit()) {
            return Err(AmbitusError::ParseError {
                position,
                message: "Expected a note count after '('".to_string(),
            });
        }
        let count = Duration::read_number(cursor)?;
        let mut elements = Vec::new();
        let mut sounding = 0;
        while sounding < count {
            match cursor.peek() {
                None => {
                    return Err(AmbitusError::ParseError {
                        position: cursor.position(),
                        message: "Unexpected end of input inside a tuplet".to_string(),
                    });
                }
                Some(c) if Whitespace::has_first(c) => {
                    elements.push(Element::Whitespace(Whitespace::parse(cursor)?));
                }
                Some(c) if Chord::has_first(c) => {
                    elements.push(Element::Chord(Chord::parse(cursor, alterations)?));
                    sounding += 1;
                }
                Some(c) if Rest::has_first(c) => {
                    elements.push(Element::Rest(Rest::parse(cursor)?));
                    sounding += 1;
                }
                Some(_) => {
                    elements.push(Element::Note(Note::parse(cursor, alterations)?));
                    sounding += 1;
                }
            }
        }
        Ok(Tuplet { count, elements })
    }
}

impl Bar {
    pub fn has_first(c: char) -> bool {
        c == '|'
    }

    /// Parses one bar. The alteration table is taken by value: the
    /// bar works on its own copy, so accidentals written here never
    /// leak into the bars that follow.
    pub fn parse(
        cursor: &mut Cursor,
        mut alterations: AlterationTable,
    ) -> Result<Self, AmbitusError> {
        let position = cursor.position();
        match cursor.peek() {
            Some('|') => {
                cursor.advance();
            }
            _ => {
                return Err(AmbitusError::ParseError {
                    position,
                    message: "Expected '|' at the start of a bar".to_string(),
                })
            }
        }
        let mut elements = Vec::new();
        while let Some(c) = cursor.peek() {
            if Bar::has_first(c) {
                break;
            }
            let element = if Whitespace::has_first(c) {
                Element::Whitespace(Whitespace::parse(cursor)?)
            } else if Tuplet::has_first(c) {
                Element::Tuplet(Tuplet::parse(cursor, &mut alterations)?)
            } else if Chord::has_first(c) {
                Element::Chord(Chord::parse(cursor, &mut alterations)?)
            } else if Rest::has_first(c) {
                Element::Rest(Rest::parse(cursor)?)
            } else {
                Element::Note(Note::parse(cursor, &mut alterations)?)
            };
            elements.push(element);
        }
        Ok(Bar { elements })
    }
}

impl Score {
    pub fn parse(cursor: &mut Cursor, alterations: AlterationTable) -> Result<Self, AmbitusError> {
        let mut prefix = Vec::new();
        while matches!(cursor.peek(), Some(c) if Whitespace::has_first(c)) {
            prefix.push(Whitespace::parse(cursor)?);
        }
        let mut bars = Vec::new();
        let mut suffix = Vec::new();
        loop {
            match cursor.peek() {
                None => break,
                Some('|') if cursor.all_remaining_after_peek(Whitespace::has_first) => {
                    cursor.advance();
                    while matches!(cursor.peek(), Some(c) if Whitespace::has_first(c)) {
                        suffix.push(Whitespace::parse(cursor)?);
                    }
                    break;
                }
                Some('|') => bars.push(Bar::parse(cursor, alterations)?),
                Some(c) => {
                    return Err(AmbitusError::ParseError {
                        position: cursor.position(),
                        message: format!(
                            "Unexpected '{}': expected a bar or trailing whitespace",
                            c
                        ),
                    })
                }
            }
        }
        Ok(Score {
            prefix,
            bars,
            suffix,
            alterations,
        })
    }
}
