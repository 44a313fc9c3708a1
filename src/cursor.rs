//! Character cursor with single-token lookahead over a notation body.

/// A read position over the characters of one notation body.
///
/// The cursor never rewinds; parsing consumes the input left to right
/// and [`position`](Cursor::position) is reported in parse errors.
#[derive(Debug, Clone)]
pub struct Cursor {
    chars: Vec<char>,
    index: usize,
}

impl Cursor {
    pub fn new(input: &str) -> Self {
        Cursor {
            chars: input.chars().collect(),
            index: 0,
        }
    }

    /// The current character, without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    /// Consumes and returns the current character.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.index += 1;
        Some(c)
    }

    pub fn has_next(&self) -> bool {
        self.index < self.chars.len()
    }

    /// Character offset of the current read position.
    pub fn position(&self) -> usize {
        self.index
    }

    /// True when every character strictly after the current one
    /// satisfies `predicate`. Vacuously true at or past the end.
    pub fn all_remaining_after_peek(&self, predicate: fn(char) -> bool) -> bool {
        self.chars
            .get(self.index + 1..)
            .map_or(true, |rest| rest.iter().all(|&c| predicate(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_does_not_consume() {
        let cursor = Cursor::new("ab");
        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_advance_consumes_in_order() {
        let mut cursor = Cursor::new("ab");
        assert_eq!(cursor.advance(), Some('a'));
        assert_eq!(cursor.advance(), Some('b'));
        assert_eq!(cursor.advance(), None);
        assert!(!cursor.has_next());
    }

    #[test]
    fn test_all_remaining_after_peek() {
        let cursor = Cursor::new("| \n");
        assert!(cursor.all_remaining_after_peek(|c| c == ' ' || c == '\n'));

        let cursor = Cursor::new("|a|");
        assert!(!cursor.all_remaining_after_peek(|c| c == ' ' || c == '\n'));
    }

    #[test]
    fn test_all_remaining_after_peek_at_end() {
        let mut cursor = Cursor::new("|");
        assert!(cursor.all_remaining_after_peek(|c| c == ' '));
        cursor.advance();
        assert!(cursor.all_remaining_after_peek(|c| c == ' '));
    }
}
