//! Lexical building blocks of the notation grammar.
//!
//! Each token type exposes `has_first` (can a token start with this
//! character?), a `parse` that consumes one token from a [`Cursor`]
//! and fails if `has_first` does not hold, and `generate`, which
//! renders the token back to text.

use std::fmt;

use crate::cursor::Cursor;
use crate::error::AmbitusError;
use crate::keys::AlterationTable;

/// A note letter, the seven-per-octave diatonic names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Letter {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Letter {
    /// All letters in alteration-table order.
    pub const ALL: [Letter; 7] = [
        Letter::A,
        Letter::B,
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
    ];

    pub fn from_char(c: char) -> Option<Letter> {
        match c {
            'a' => Some(Letter::A),
            'b' => Some(Letter::B),
            'c' => Some(Letter::C),
            'd' => Some(Letter::D),
            'e' => Some(Letter::E),
            'f' => Some(Letter::F),
            'g' => Some(Letter::G),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::A => 'a',
            Letter::B => 'b',
            Letter::C => 'c',
            Letter::D => 'd',
            Letter::E => 'e',
            Letter::F => 'f',
            Letter::G => 'g',
        }
    }

    /// Semitone offset of this letter within the octave anchored at c.
    pub fn base_tone(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One whitespace character (space or newline) inside a notation body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Whitespace {
    pub symbol: char,
}

impl Whitespace {
    pub fn has_first(c: char) -> bool {
        c == ' ' || c == '\n'
    }

    pub fn parse(cursor: &mut Cursor) -> Result<Self, AmbitusError> {
        let position = cursor.position();
        match cursor.peek() {
            Some(c) if Self::has_first(c) => {
                cursor.advance();
                Ok(Whitespace { symbol: c })
            }
            _ => Err(AmbitusError::ParseError {
                position,
                message: "Expected whitespace".to_string(),
            }),
        }
    }

    pub fn generate(&self) -> String {
        self.symbol.to_string()
    }
}

/// A note letter with its register flag.
///
/// Lower case letters sit in the octave anchored at tone 60 (`c`);
/// upper case letters sound one octave lower (`case_shift` of −1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pitch {
    pub letter: Letter,
    pub case_shift: i32,
}

impl Pitch {
    pub fn new(letter: Letter, case_shift: i32) -> Self {
        Pitch { letter, case_shift }
    }

    pub fn has_first(c: char) -> bool {
        Letter::from_char(c.to_ascii_lowercase()).is_some()
    }

    pub fn parse(cursor: &mut Cursor) -> Result<Self, AmbitusError> {
        let position = cursor.position();
        let parsed = cursor
            .peek()
            .and_then(|c| Letter::from_char(c.to_ascii_lowercase()).map(|letter| (c, letter)));
        match parsed {
            Some((c, letter)) => {
                cursor.advance();
                let case_shift = if c.is_ascii_uppercase() { -1 } else { 0 };
                Ok(Pitch { letter, case_shift })
            }
            None => Err(AmbitusError::ParseError {
                position,
                message: "Expected a pitch letter".to_string(),
            }),
        }
    }

    pub fn to_tone(&self) -> i32 {
        self.letter.base_tone() + self.case_shift * 12 + 60
    }

    pub fn generate(&self) -> String {
        let c = self.letter.as_char();
        if self.case_shift == -1 {
            c.to_ascii_uppercase().to_string()
        } else {
            c.to_string()
        }
    }
}

/// A run of octave marks: each `'` raises and each `,` lowers the
/// note by one octave. An empty run is valid and generates nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Octave {
    pub modifier: i32,
}

impl Octave {
    pub fn new(modifier: i32) -> Self {
        Octave { modifier }
    }

    pub fn has_first(c: char) -> bool {
        c == ',' || c == '\''
    }

    pub fn parse(cursor: &mut Cursor) -> Self {
        let mut modifier = 0;
        while let Some(c) = cursor.peek() {
            match c {
                ',' => modifier -= 1,
                '\'' => modifier += 1,
                _ => break,
            }
            cursor.advance();
        }
        Octave { modifier }
    }

    pub fn to_tone(&self) -> i32 {
        self.modifier * 12
    }

    pub fn generate(&self) -> String {
        if self.modifier >= 0 {
            "'".repeat(self.modifier as usize)
        } else {
            ",".repeat(self.modifier.unsigned_abs() as usize)
        }
    }
}

/// A length as a reduced fraction of eighth-note units.
///
/// A bare note or rest lasts one unit (1/1). `2` doubles it, `/2`
/// halves it, `3/2` is three halves of a unit. The fraction is kept in
/// lowest terms; generation picks the shortest spelling, so a parse
/// and generate pass canonicalizes inputs such as `2/4` to `/2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration {
    numerator: u32,
    denominator: u32,
}

impl Default for Duration {
    fn default() -> Self {
        Duration {
            numerator: 1,
            denominator: 1,
        }
    }
}

impl Duration {
    /// Builds a duration, rejecting fractions that are not in lowest
    /// terms.
    pub fn new(numerator: u32, denominator: u32) -> Result<Self, AmbitusError> {
        if gcd(numerator, denominator) != 1 {
            return Err(AmbitusError::InvalidDuration {
                numerator,
                denominator,
            });
        }
        Ok(Duration {
            numerator,
            denominator,
        })
    }

    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    pub fn has_first(c: char) -> bool {
        c == '/' || c.is_ascii_digit()
    }

    pub fn parse(cursor: &mut Cursor) -> Result<Self, AmbitusError> {
        let mut numerator: u32 = 1;
        let mut denominator: u32 = 1;
        if cursor.peek() == Some('/') {
            cursor.advance();
            denominator = Self::read_number(cursor)?;
        } else if matches!(cursor.peek(), Some(c) if c.is_ascii_digit()) {
            numerator = Self::read_number(cursor)?;
            if cursor.peek() == Some('/') {
                cursor.advance();
                denominator = Self::read_number(cursor)?;
            }
        }
        let divisor = gcd(numerator, denominator);
        if divisor > 1 {
            numerator /= divisor;
            denominator /= divisor;
        }
        Duration::new(numerator, denominator)
    }

    /// Reads a bare decimal number; an empty digit run reads as 0.
    pub(crate) fn read_number(cursor: &mut Cursor) -> Result<u32, AmbitusError> {
        let mut number: u32 = 0;
        while let Some(c) = cursor.peek() {
            match c.to_digit(10) {
                Some(digit) => {
                    cursor.advance();
                    number = number
                        .checked_mul(10)
                        .and_then(|n| n.checked_add(digit))
                        .ok_or_else(|| AmbitusError::ParseError {
                            position: cursor.position(),
                            message: "Number too large".to_string(),
                        })?;
                }
                None => break,
            }
        }
        Ok(number)
    }

    pub fn generate(&self) -> String {
        if self.numerator == 1 && self.denominator == 1 {
            String::new()
        } else if self.numerator == 1 {
            format!("/{}", self.denominator)
        } else if self.denominator == 1 {
            self.numerator.to_string()
        } else {
            format!("{}/{}", self.numerator, self.denominator)
        }
    }
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// A written accidental glyph, before resolution against the bar's
/// alteration table. `None` is the absent glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialAccidental {
    None,
    Natural,
    Sharp,
    DoubleSharp,
    Flat,
    DoubleFlat,
}

impl PartialAccidental {
    pub fn has_first(c: char) -> bool {
        c == '^' || c == '_' || c == '='
    }

    pub fn parse(cursor: &mut Cursor) -> Result<Self, AmbitusError> {
        let position = cursor.position();
        let first = match cursor.peek() {
            Some(c) if Self::has_first(c) => c,
            _ => return Ok(PartialAccidental::None),
        };
        cursor.advance();
        let second = match cursor.peek() {
            Some(c) if Self::has_first(c) => {
                cursor.advance();
                Some(c)
            }
            _ => None,
        };
        match (first, second) {
            ('^', None) => Ok(PartialAccidental::Sharp),
            ('^', Some('^')) => Ok(PartialAccidental::DoubleSharp),
            ('_', None) => Ok(PartialAccidental::Flat),
            ('_', Some('_')) => Ok(PartialAccidental::DoubleFlat),
            ('=', None) => Ok(PartialAccidental::Natural),
            _ => {
                let mut glyph = String::from(first);
                if let Some(c) = second {
                    glyph.push(c);
                }
                Err(AmbitusError::ParseError {
                    position,
                    message: format!("Invalid accidental '{}'", glyph),
                })
            }
        }
    }

    /// A written glyph pins the letter's shift; an absent one defers
    /// to the alteration table. An explicit natural is determining.
    pub fn is_determining(&self) -> bool {
        *self != PartialAccidental::None
    }

    pub fn implied_shift(&self) -> i32 {
        match self {
            PartialAccidental::None | PartialAccidental::Natural => 0,
            PartialAccidental::Sharp => 1,
            PartialAccidental::DoubleSharp => 2,
            PartialAccidental::Flat => -1,
            PartialAccidental::DoubleFlat => -2,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            PartialAccidental::None => "",
            PartialAccidental::Natural => "=",
            PartialAccidental::Sharp => "^",
            PartialAccidental::DoubleSharp => "^^",
            PartialAccidental::Flat => "_",
            PartialAccidental::DoubleFlat => "__",
        }
    }
}

/// An accidental resolved to a concrete semitone shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accidental {
    pub partial: PartialAccidental,
    shift: i32,
}

impl Accidental {
    /// Resolves a written (or absent) accidental against the bar's
    /// alteration table. A determining glyph writes its implied shift
    /// into the table for the letter; an absent glyph reads the
    /// letter's current shift instead.
    pub fn resolve(
        partial: PartialAccidental,
        letter: Letter,
        alterations: &mut AlterationTable,
    ) -> Self {
        let shift = if partial.is_determining() {
            let shift = partial.implied_shift();
            alterations.set_shift(letter, shift);
            shift
        } else {
            alterations.shift(letter)
        };
        Accidental { partial, shift }
    }

    pub fn to_tone(&self) -> i32 {
        self.shift
    }

    pub fn generate(&self) -> String {
        if self.partial.is_determining() {
            self.partial.glyph().to_string()
        } else {
            String::new()
        }
    }
}
