//! Output configuration: the recognized property set.
//!
//! The configuration is a fixed set of recognized property names mapped to
//! tagged [`PropertyValue`]s, validated at insertion — not an open string
//! map. It carries a dirty flag set by every successful property write so
//! the factory can tell whether anything changed since the last writer was
//! produced (a changed configuration disqualifies the cached writer from
//! reuse).
//!
//! Recognized properties:
//!
//! | name | type | default |
//! |------|------|---------|
//! | `javax.xml.stream.isRepairingNamespaces` | bool | `false` |
//! | `escapeCharacters` | bool | `true` |
//! | `reuse-instance` | bool | `false` (enabling is always rejected) |

use std::collections::HashMap;
use std::fmt;

use crate::error::OutputError;

/// Property name: whether the writer repairs namespace declarations.
/// Recognized for configuration parity; namespace resolution itself is not
/// performed by this crate.
pub const IS_REPAIRING_NAMESPACES: &str = "javax.xml.stream.isRepairingNamespaces";

/// Property name: whether text and attribute values are escaped on output.
pub const ESCAPE_CHARACTERS: &str = "escapeCharacters";

/// Property name: whether the factory may rebind a previously produced
/// writer instead of constructing a fresh one. Enabling this is always
/// rejected — stream writers are not safe for reuse across threads.
pub const REUSE_INSTANCE: &str = "reuse-instance";

const RECOGNIZED: [&str; 3] = [IS_REPAIRING_NAMESPACES, ESCAPE_CHARACTERS, REUSE_INSTANCE];

/// A tagged property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// A boolean value. Every property in the recognized set is boolean.
    Bool(bool),
    /// A text value.
    Text(String),
}

impl PropertyValue {
    /// The boolean payload, if this is a [`PropertyValue::Bool`].
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(_) => None,
        }
    }

    /// The text payload, if this is a [`PropertyValue::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Bool(_) => None,
            Self::Text(s) => Some(s),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// The writer-context configuration snapshot.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    values: HashMap<&'static str, PropertyValue>,
    dirty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputConfig {
    /// Creates a configuration seeded with the defaults: namespace repair
    /// off, escaping on, reuse off.
    #[must_use]
    pub fn new() -> Self {
        let mut values = HashMap::new();
        values.insert(IS_REPAIRING_NAMESPACES, PropertyValue::Bool(false));
        values.insert(ESCAPE_CHARACTERS, PropertyValue::Bool(true));
        values.insert(REUSE_INSTANCE, PropertyValue::Bool(false));
        Self {
            values,
            dirty: false,
        }
    }

    fn canonical(name: &str) -> Option<&'static str> {
        RECOGNIZED.iter().copied().find(|key| *key == name)
    }

    /// Whether `name` is in the recognized property set.
    #[must_use]
    pub fn is_property_supported(&self, name: &str) -> bool {
        Self::canonical(name).is_some()
    }

    /// Returns the value of a recognized property.
    ///
    /// # Errors
    ///
    /// [`OutputError::UnsupportedProperty`] when `name` is not recognized.
    pub fn get_property(&self, name: &str) -> Result<&PropertyValue, OutputError> {
        Self::canonical(name)
            .and_then(|key| self.values.get(key))
            .ok_or_else(|| OutputError::UnsupportedProperty(name.to_string()))
    }

    /// Sets a recognized property and marks the configuration dirty.
    ///
    /// Setting `reuse-instance` to `false` is accepted but does not mark
    /// the configuration dirty — it does not change how a writer would be
    /// constructed.
    ///
    /// # Errors
    ///
    /// [`OutputError::UnsupportedProperty`] when `name` is not recognized;
    /// [`OutputError::InvalidPropertyValue`] for a non-boolean value or for
    /// any attempt to set `reuse-instance` to `true`.
    pub fn set_property(
        &mut self,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<(), OutputError> {
        let key = Self::canonical(name)
            .ok_or_else(|| OutputError::UnsupportedProperty(name.to_string()))?;
        let PropertyValue::Bool(flag) = value.into() else {
            return Err(OutputError::InvalidPropertyValue {
                name: name.to_string(),
                reason: "expected a boolean value".to_string(),
            });
        };
        if key == REUSE_INSTANCE && flag {
            return Err(OutputError::InvalidPropertyValue {
                name: name.to_string(),
                reason: "stream writers are not safe for reuse across threads".to_string(),
            });
        }
        self.values.insert(key, PropertyValue::Bool(flag));
        if key != REUSE_INSTANCE {
            self.dirty = true;
        }
        Ok(())
    }

    /// Whether any property changed since the last writer was produced.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// The current `escapeCharacters` value.
    #[must_use]
    pub fn escape_characters(&self) -> bool {
        self.bool_of(ESCAPE_CHARACTERS, true)
    }

    /// The current `javax.xml.stream.isRepairingNamespaces` value.
    #[must_use]
    pub fn is_repairing_namespaces(&self) -> bool {
        self.bool_of(IS_REPAIRING_NAMESPACES, false)
    }

    pub(crate) fn reuse_instance(&self) -> bool {
        self.bool_of(REUSE_INSTANCE, false)
    }

    fn bool_of(&self, key: &'static str, default: bool) -> bool {
        self.values
            .get(key)
            .and_then(PropertyValue::as_bool)
            .unwrap_or(default)
    }
}
