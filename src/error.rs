use thiserror::Error;

/// Errors produced while parsing, transforming or assembling notation.
///
/// # Example
///
/// ```
/// use ambitus::AmbitusError;
///
/// let err = AmbitusError::ParseError {
///     position: 4,
///     message: "Expected a pitch letter".to_string(),
/// };
/// assert_eq!(err.to_string(), "Parse error at position 4: Expected a pitch letter");
/// ```
#[derive(Error, Debug)]
pub enum AmbitusError {
    /// The input did not match the notation grammar. `position` is the
    /// character offset into the parsed body.
    #[error("Parse error at position {position}: {message}")]
    ParseError { position: usize, message: String },

    /// A duration fraction that is not in lowest terms.
    #[error("Invalid duration: {numerator}/{denominator} is not reduced")]
    InvalidDuration { numerator: u32, denominator: u32 },

    /// Two scores with different alteration tables were joined.
    /// `letter` is the first note letter (scanning a through g) on
    /// which the tables disagree.
    #[error("Key signature mismatch: scores disagree on '{letter}'")]
    KeySignatureMismatch { letter: char },

    /// A range specification that could not be read or validated.
    #[error("Invalid range spec: {0}")]
    InvalidSpec(String),
}
