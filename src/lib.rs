pub mod ast;
pub mod cursor;
pub mod error;
pub mod exercise;
pub mod header;
pub mod keys;
pub mod parser;
pub mod token;
pub mod transpose;

pub use ast::*;
pub use cursor::Cursor;
pub use error::*;
pub use exercise::{
    assemble, build_exercise, scan_range, ExerciseSession, RangeSpec, RegisterPitch, ToneRange,
};
pub use header::{sheet_key, split_tune, TuneText};
pub use keys::{alterations_for, alterations_or_default, AlterationTable};
pub use parser::{parse, parse_in_key};
pub use token::*;

/// Parse a tune (header plus body) and give back its canonical text.
/// This is the cheap way to check a tune before building on it.
pub fn check_tune(tune: &str) -> Result<String, AmbitusError> {
    let parts = split_tune(tune);
    let score = parse_in_key(&parts.body, sheet_key(&parts.header))?;
    Ok(format!("{}\n{}", parts.header, score.generate()))
}
