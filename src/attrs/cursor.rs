//! Forward-only attribute cursor with guarded removal.
//!
//! The cursor advances one attribute at a time through an
//! [`AttributeCollection`] and supports removing the attribute returned by
//! the most recent [`advance`](AttributeCursor::advance) — and only that
//! one. Removal compensates the index shift it causes, so iteration
//! continues with the attribute that followed the removed one.
//!
//! A cursor is created per iteration pass and discarded afterwards. It
//! exclusively borrows the collection, so structural mutation that is not
//! funneled through the cursor cannot happen mid-pass. Position drift from
//! multiple interleaved removal passes is therefore ruled out at compile
//! time rather than guarded at run time.
//!
//! # Examples
//!
//! ```
//! use staxide::{Attribute, AttributeCollection, CursorError};
//!
//! # fn main() -> Result<(), CursorError> {
//! let mut attrs = AttributeCollection::new();
//! attrs.set(Attribute::new("a", "1"));
//! attrs.set(Attribute::new("b", "2"));
//! attrs.set(Attribute::new("c", "3"));
//!
//! let mut cursor = attrs.cursor();
//! assert_eq!(cursor.advance()?.qname, "a");
//! assert_eq!(cursor.advance()?.qname, "b");
//! cursor.remove_last_returned()?; // removes "b"
//! assert_eq!(cursor.advance()?.qname, "c");
//! assert!(!cursor.has_next());
//!
//! assert_eq!(attrs.len(), 2);
//! # Ok(())
//! # }
//! ```

use crate::attrs::{Attribute, AttributeCollection};
use crate::error::CursorError;

/// A positional iteration view over an [`AttributeCollection`], supporting
/// guarded removal of the just-visited attribute.
///
/// The position `p` always points just past the last surviving,
/// already-visited attribute (`0 <= p <= len`). The last-returned marker is
/// a stored index token; only the attribute from the most recent
/// [`advance`](Self::advance) may be removed, and the token is consumed by
/// the removal.
#[derive(Debug)]
pub struct AttributeCursor<'a> {
    attrs: &'a mut AttributeCollection,
    /// Next index to visit.
    position: usize,
    /// Index token of the attribute returned by the most recent advance,
    /// or `None` if no advance happened or a removal consumed it.
    last_returned: Option<usize>,
}

impl<'a> AttributeCursor<'a> {
    pub(crate) fn new(attrs: &'a mut AttributeCollection) -> Self {
        Self {
            attrs,
            position: 0,
            last_returned: None,
        }
    }

    /// Whether another attribute remains to visit. No side effects.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.position < self.attrs.len()
    }

    /// Returns the attribute at the cursor position and advances past it.
    ///
    /// # Errors
    ///
    /// [`CursorError::NoMoreElements`] when the cursor is exhausted.
    pub fn advance(&mut self) -> Result<&Attribute, CursorError> {
        if !self.has_next() {
            return Err(CursorError::NoMoreElements);
        }
        let index = self.position;
        self.position += 1;
        self.last_returned = Some(index);
        self.attrs.get(index).ok_or(CursorError::NoMoreElements)
    }

    /// Removes the attribute returned by the most recent
    /// [`advance`](Self::advance) from the underlying collection.
    ///
    /// The position is lowered by one to compensate the shift caused by the
    /// removal, so a subsequent `advance` yields the attribute that followed
    /// the removed one. The last-returned marker is consumed: a second
    /// removal without an intervening `advance` fails.
    ///
    /// # Errors
    ///
    /// [`CursorError::InvalidState`] when `advance` has not been called
    /// since the cursor was created or since the previous removal.
    pub fn remove_last_returned(&mut self) -> Result<(), CursorError> {
        match self.last_returned {
            Some(index) if index + 1 == self.position => {
                self.attrs.remove_at(index);
                self.position = index;
                self.last_returned = None;
                Ok(())
            }
            _ => Err(CursorError::InvalidState),
        }
    }

    /// Reinitializes the cursor: position back to the start, last-returned
    /// marker cleared. The collection is untouched.
    pub fn reset(&mut self) {
        self.position = 0;
        self.last_returned = None;
    }

    /// Removes every attribute from the collection and resets the cursor.
    pub fn reset_all(&mut self) {
        self.attrs.clear();
        self.reset();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn collection(names: &[&str]) -> AttributeCollection {
        let mut attrs = AttributeCollection::new();
        for (i, name) in names.iter().enumerate() {
            attrs.set(Attribute::new(*name, i.to_string()));
        }
        attrs
    }

    #[test]
    fn test_advance_drains_in_insertion_order() {
        let mut attrs = collection(&["a", "b", "c"]);
        let len = attrs.len();
        let mut cursor = attrs.cursor();
        let mut visited = Vec::new();
        for _ in 0..len {
            visited.push(cursor.advance().unwrap().qname.clone());
        }
        assert_eq!(visited, vec!["a", "b", "c"]);
        assert!(!cursor.has_next());
        assert_eq!(cursor.advance().unwrap_err(), CursorError::NoMoreElements);
    }

    #[test]
    fn test_has_next_has_no_side_effects() {
        let mut attrs = collection(&["a"]);
        let mut cursor = attrs.cursor();
        assert!(cursor.has_next());
        assert!(cursor.has_next());
        assert_eq!(cursor.advance().unwrap().qname, "a");
        assert!(!cursor.has_next());
    }

    #[test]
    fn test_remove_before_any_advance_fails() {
        let mut attrs = collection(&["a"]);
        let mut cursor = attrs.cursor();
        assert_eq!(
            cursor.remove_last_returned().unwrap_err(),
            CursorError::InvalidState
        );
    }

    #[test]
    fn test_double_remove_fails() {
        let mut attrs = collection(&["a", "b"]);
        let mut cursor = attrs.cursor();
        cursor.advance().unwrap();
        cursor.remove_last_returned().unwrap();
        assert_eq!(
            cursor.remove_last_returned().unwrap_err(),
            CursorError::InvalidState
        );
    }

    #[test]
    fn test_remove_second_visited_keeps_first() {
        let mut attrs = collection(&["a", "b", "c"]);
        {
            let mut cursor = attrs.cursor();
            cursor.advance().unwrap();
            cursor.advance().unwrap();
            cursor.remove_last_returned().unwrap(); // removes "b"
            assert_eq!(cursor.advance().unwrap().qname, "c");
            assert!(!cursor.has_next());
        }
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.index_of("a"), Some(0));
        assert_eq!(attrs.index_of("c"), Some(1));
        assert_eq!(attrs.index_of("b"), None);
    }

    #[test]
    fn test_remove_last_attribute_exhausts() {
        let mut attrs = collection(&["a", "b"]);
        let mut cursor = attrs.cursor();
        cursor.advance().unwrap();
        cursor.advance().unwrap();
        cursor.remove_last_returned().unwrap(); // removes "b", nothing follows
        assert!(!cursor.has_next());
        assert_eq!(cursor.advance().unwrap_err(), CursorError::NoMoreElements);
    }

    #[test]
    fn test_remove_first_visited() {
        let mut attrs = collection(&["a", "b", "c"]);
        {
            let mut cursor = attrs.cursor();
            cursor.advance().unwrap();
            cursor.remove_last_returned().unwrap(); // removes "a"
            assert_eq!(cursor.advance().unwrap().qname, "b");
            assert_eq!(cursor.advance().unwrap().qname, "c");
        }
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_example_walk_from_contract() {
        // collection = [A, B, C]: advance -> A, advance -> B, remove B,
        // collection = [A, C], advance -> C, exhausted.
        let mut attrs = collection(&["A", "B", "C"]);
        {
            let mut cursor = attrs.cursor();
            assert_eq!(cursor.advance().unwrap().qname, "A");
            assert_eq!(cursor.advance().unwrap().qname, "B");
            cursor.remove_last_returned().unwrap();
            assert_eq!(cursor.advance().unwrap().qname, "C");
            assert!(!cursor.has_next());
        }
        let names: Vec<&str> = attrs.iter().map(|a| a.qname.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn test_reset_restarts_pass() {
        let mut attrs = collection(&["a", "b"]);
        let mut cursor = attrs.cursor();
        cursor.advance().unwrap();
        cursor.reset();
        assert_eq!(cursor.advance().unwrap().qname, "a");
        // the marker was cleared by reset, then re-armed by advance
        cursor.remove_last_returned().unwrap();
        assert_eq!(cursor.advance().unwrap().qname, "b");
    }

    #[test]
    fn test_reset_clears_last_returned_marker() {
        let mut attrs = collection(&["a", "b"]);
        let mut cursor = attrs.cursor();
        cursor.advance().unwrap();
        cursor.reset();
        assert_eq!(
            cursor.remove_last_returned().unwrap_err(),
            CursorError::InvalidState
        );
    }

    #[test]
    fn test_reset_all_empties_collection() {
        let mut attrs = collection(&["a", "b", "c"]);
        {
            let mut cursor = attrs.cursor();
            cursor.advance().unwrap();
            cursor.reset_all();
            assert!(!cursor.has_next());
            assert_eq!(cursor.advance().unwrap_err(), CursorError::NoMoreElements);
        }
        assert_eq!(attrs.len(), 0);
    }
}
