//! Streaming XML output with managed writer lifecycles.
//!
//! `staxide` serializes XML documents through a small push API: a
//! [`WriterFactory`] resolves an [`OutputTarget`] (byte sink, character
//! sink, file by system identifier, tree builder, or a prebuilt writer)
//! into a [`WriterHandle`], and the handle exposes the write surface —
//! start/end document, elements, attributes, character data, CDATA,
//! comments, processing instructions. An [`EventWriter`] adapts the same
//! surface to an event-sequence form.
//!
//! The factory owns the configuration (a fixed recognized property set)
//! and a writer-reuse policy: a relinquished stream writer can be reset
//! and rebound to a new sink instead of reconstructed, gated on the
//! writer's lifecycle and on the configuration being unchanged. Enabling
//! reuse through the public property surface is deliberately rejected;
//! see [`output::factory`] for the policy details.
//!
//! Alongside the writers, the [`attrs`] module carries the attribute model:
//! an ordered, name-unique [`AttributeCollection`] and a forward-only
//! [`AttributeCursor`] with guarded removal of the just-visited attribute.
//!
//! # Quick start
//!
//! ```
//! use staxide::{Attribute, AttributeCollection, OutputTarget, WriterFactory};
//!
//! # fn main() -> Result<(), staxide::OutputError> {
//! let mut buf = String::new();
//! let mut factory = WriterFactory::new();
//!
//! let mut writer = factory.create_writer(OutputTarget::chars(&mut buf), None)?;
//! writer.write_start_document(None, None)?;
//! writer.write_start_element("recipe")?;
//!
//! let mut attrs = AttributeCollection::new();
//! attrs.set(Attribute::new("name", "flatbread"));
//! attrs.set(Attribute::new("serves", "4"));
//! writer.write_attributes(&attrs)?;
//!
//! writer.write_characters("flour & water")?;
//! writer.write_end_document()?;
//!
//! drop(writer);
//! drop(factory);
//! assert_eq!(
//!     buf,
//!     "<?xml version=\"1.0\"?>\n\
//!      <recipe name=\"flatbread\" serves=\"4\">flour &amp; water</recipe>"
//! );
//! # Ok(())
//! # }
//! ```

pub mod attrs;
pub mod error;
pub mod output;

pub use attrs::{AttrType, Attribute, AttributeCollection, AttributeCursor, SourceLocation};
pub use error::{CursorError, OutputError};
pub use output::{
    EventWriter, OutputConfig, OutputTarget, PrebuiltWriter, PropertyValue, ResultTarget, Sink,
    StreamResult, StreamWriter, TreeBuilder, TreeWriter, WriterFactory, WriterHandle, XmlEvent,
};
