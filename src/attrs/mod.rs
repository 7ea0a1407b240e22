//! Element attributes: the ordered collection and its removal cursor.
//!
//! An element under construction carries an [`AttributeCollection`] — an
//! ordered sequence of [`Attribute`] records in which insertion order is
//! semantic order (it determines serialized output) and no two attributes
//! ever share the same qualified name. The collection is mutated only
//! through explicit operations ([`AttributeCollection::set`],
//! [`AttributeCollection::remove_at`], [`AttributeCollection::clear`]) or
//! through a cursor-initiated removal.
//!
//! [`AttributeCursor`] is the forward-only iteration view with guarded
//! removal of the just-visited attribute. See the [`cursor`] module.
//!
//! # Examples
//!
//! ```
//! use staxide::{Attribute, AttributeCollection};
//!
//! let mut attrs = AttributeCollection::new();
//! attrs.set(Attribute::new("id", "main"));
//! attrs.set(Attribute::new("class", "big"));
//! attrs.set(Attribute::new("id", "other")); // replaces in place
//!
//! assert_eq!(attrs.len(), 2);
//! assert_eq!(attrs.value_of("id"), Some("other"));
//! ```

use std::fmt;

pub mod cursor;

pub use cursor::AttributeCursor;

/// The declared type of an attribute, from its DTD attribute-list
/// declaration. Attributes with no declaration are `CDATA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AttrType {
    /// Character data — the default when no declaration applies.
    #[default]
    Cdata,
    /// A unique element identifier.
    Id,
    /// A reference to an `ID` elsewhere in the document.
    Idref,
    /// Whitespace-separated `IDREF` values.
    Idrefs,
    /// The name of an unparsed entity.
    Entity,
    /// Whitespace-separated `ENTITY` values.
    Entities,
    /// A name token.
    Nmtoken,
    /// Whitespace-separated `NMTOKEN` values.
    Nmtokens,
    /// The name of a declared notation.
    Notation,
    /// One value from a declared enumeration.
    Enumeration,
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cdata => write!(f, "CDATA"),
            Self::Id => write!(f, "ID"),
            Self::Idref => write!(f, "IDREF"),
            Self::Idrefs => write!(f, "IDREFS"),
            Self::Entity => write!(f, "ENTITY"),
            Self::Entities => write!(f, "ENTITIES"),
            Self::Nmtoken => write!(f, "NMTOKEN"),
            Self::Nmtokens => write!(f, "NMTOKENS"),
            Self::Notation => write!(f, "NOTATION"),
            Self::Enumeration => write!(f, "ENUMERATION"),
        }
    }
}

/// Source position of an attribute in the document it was read from.
///
/// Attributes synthesized in memory carry the default (all-zero) location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// 1-based line number, or 0 when unknown.
    pub line: u32,
    /// 1-based column number, or 0 when unknown.
    pub column: u32,
    /// 0-based byte offset from the start of the input.
    pub byte_offset: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A single attribute: qualified name, value, declared type, and source
/// position. Immutable by replacement — updating an attribute means storing
/// a new record under the same qualified name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The qualified name, e.g. `"xml:lang"` or `"id"`.
    pub qname: String,
    /// The attribute value, fully expanded.
    pub value: String,
    /// The declared attribute type.
    pub attr_type: AttrType,
    /// Where the attribute appeared in the source, if it was read from one.
    pub location: SourceLocation,
}

impl Attribute {
    /// Creates a `CDATA` attribute with no source location.
    pub fn new(qname: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            qname: qname.into(),
            value: value.into(),
            attr_type: AttrType::default(),
            location: SourceLocation::default(),
        }
    }

    /// The namespace prefix of the qualified name, if it has one.
    ///
    /// ```
    /// use staxide::Attribute;
    ///
    /// assert_eq!(Attribute::new("xml:lang", "en").prefix(), Some("xml"));
    /// assert_eq!(Attribute::new("id", "a").prefix(), None);
    /// ```
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.qname.find(':').map(|pos| &self.qname[..pos])
    }

    /// The local part of the qualified name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.qname
            .find(':')
            .map_or(self.qname.as_str(), |pos| &self.qname[pos + 1..])
    }
}

/// An ordered, mutable collection of attributes.
///
/// Insertion order is preserved and is the order attributes serialize in.
/// Qualified names are unique at all times: [`set`](Self::set) replaces an
/// existing attribute in place rather than appending a duplicate.
#[derive(Debug, Clone, Default)]
pub struct AttributeCollection {
    attrs: Vec<Attribute>,
}

impl AttributeCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of attributes in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Whether the collection has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// The attribute at `index`, if in bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Attribute> {
        self.attrs.get(index)
    }

    /// The index of the attribute with the given qualified name.
    #[must_use]
    pub fn index_of(&self, qname: &str) -> Option<usize> {
        self.attrs.iter().position(|a| a.qname == qname)
    }

    /// The value of the attribute with the given qualified name.
    #[must_use]
    pub fn value_of(&self, qname: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.qname == qname)
            .map(|a| a.value.as_str())
    }

    /// Adds an attribute, replacing any existing attribute with the same
    /// qualified name in place (the slot keeps its position). Returns the
    /// index the attribute occupies.
    pub fn set(&mut self, attr: Attribute) -> usize {
        match self.index_of(&attr.qname) {
            Some(index) => {
                self.attrs[index] = attr;
                index
            }
            None => {
                self.attrs.push(attr);
                self.attrs.len() - 1
            }
        }
    }

    /// Removes and returns the attribute at `index`, shifting everything
    /// after it one position left.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> Attribute {
        self.attrs.remove(index)
    }

    /// Removes every attribute.
    pub fn clear(&mut self) {
        self.attrs.clear();
    }

    /// Iterates the attributes in insertion order without mutating.
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.attrs.iter()
    }

    /// Creates a removal cursor over this collection.
    ///
    /// The cursor exclusively borrows the collection for its whole pass, so
    /// no other mutation can interleave with it.
    pub fn cursor(&mut self) -> AttributeCursor<'_> {
        AttributeCursor::new(self)
    }
}

impl<'a> IntoIterator for &'a AttributeCollection {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
