//! The streaming output side: writers, targets, configuration, and the
//! factory that ties them together.
//!
//! Entry point is [`WriterFactory`]: describe a destination as an
//! [`OutputTarget`], ask the factory for a [`WriterHandle`] or
//! [`EventWriter`], and serialize through it. Configuration lives in
//! [`OutputConfig`] behind the factory's property surface.

pub mod config;
pub mod event;
pub mod factory;
pub mod target;
pub mod writer;

pub use config::{OutputConfig, PropertyValue};
pub use event::{EventWriter, XmlEvent};
pub use factory::WriterFactory;
pub use target::{OutputTarget, PrebuiltWriter, ResultTarget, Sink, StreamResult, TreeBuilder};
pub use writer::{StreamWriter, TreeWriter, WriterHandle};
