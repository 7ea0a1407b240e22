//! Event-sequence adapter over a writer handle.
//!
//! [`EventWriter`] wraps any [`WriterHandle`] into a form that consumes a
//! sequence of [`XmlEvent`]s instead of individual write calls. It adds no
//! semantics of its own — each event dispatches to the corresponding writer
//! operation.

use std::fmt;

use crate::attrs::AttributeCollection;
use crate::error::OutputError;
use crate::output::writer::WriterHandle;

/// One event in a serialized document's event sequence.
#[derive(Debug, Clone)]
pub enum XmlEvent {
    /// The XML declaration.
    StartDocument {
        /// The XML version; defaults to `1.0` when absent.
        version: Option<String>,
        /// The `standalone` flag; omitted from the declaration when absent.
        standalone: Option<bool>,
    },
    /// An element start tag with its attributes.
    StartElement {
        /// The qualified element name.
        qname: String,
        /// The element's attributes, written in insertion order.
        attributes: AttributeCollection,
    },
    /// Character data.
    Characters(String),
    /// A CDATA section.
    CData(String),
    /// A comment.
    Comment(String),
    /// A processing instruction.
    ProcessingInstruction {
        /// The PI target.
        target: String,
        /// The PI data, if any.
        data: Option<String>,
    },
    /// The end of the most recently opened element.
    EndElement,
    /// The end of the document.
    EndDocument,
}

impl fmt::Display for XmlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartDocument { .. } => write!(f, "StartDocument"),
            Self::StartElement { qname, .. } => write!(f, "StartElement({qname})"),
            Self::Characters(_) => write!(f, "Characters"),
            Self::CData(_) => write!(f, "CData"),
            Self::Comment(_) => write!(f, "Comment"),
            Self::ProcessingInstruction { target, .. } => {
                write!(f, "ProcessingInstruction({target})")
            }
            Self::EndElement => write!(f, "EndElement"),
            Self::EndDocument => write!(f, "EndDocument"),
        }
    }
}

/// Feeds an event sequence into a wrapped writer handle.
pub struct EventWriter<'a> {
    inner: WriterHandle<'a>,
}

impl fmt::Debug for EventWriter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventWriter").finish_non_exhaustive()
    }
}

impl<'a> EventWriter<'a> {
    /// Wraps a writer handle.
    #[must_use]
    pub fn new(inner: WriterHandle<'a>) -> Self {
        Self { inner }
    }

    /// Dispatches one event to the wrapped writer.
    ///
    /// # Errors
    ///
    /// Whatever the corresponding writer operation returns.
    pub fn add_event(&mut self, event: XmlEvent) -> Result<(), OutputError> {
        match event {
            XmlEvent::StartDocument {
                version,
                standalone,
            } => self
                .inner
                .write_start_document(version.as_deref(), standalone),
            XmlEvent::StartElement { qname, attributes } => {
                self.inner.write_start_element(&qname)?;
                self.inner.write_attributes(&attributes)
            }
            XmlEvent::Characters(text) => self.inner.write_characters(&text),
            XmlEvent::CData(content) => self.inner.write_cdata(&content),
            XmlEvent::Comment(content) => self.inner.write_comment(&content),
            XmlEvent::ProcessingInstruction { target, data } => self
                .inner
                .write_processing_instruction(&target, data.as_deref()),
            XmlEvent::EndElement => self.inner.write_end_element(),
            XmlEvent::EndDocument => self.inner.write_end_document(),
        }
    }

    /// Flushes the wrapped writer's sink.
    ///
    /// # Errors
    ///
    /// As [`WriterHandle::flush`].
    pub fn flush(&mut self) -> Result<(), OutputError> {
        self.inner.flush()
    }

    /// Unwraps the underlying writer handle.
    #[must_use]
    pub fn into_inner(self) -> WriterHandle<'a> {
        self.inner
    }
}
