//! Output targets and their normalization into sinks.
//!
//! An [`OutputTarget`] describes where serialized output should go. The
//! writer factory normalizes a target into a [`Sink`] — a live byte or
//! character destination — by unwrapping a [`ResultTarget`] one level:
//! stream results resolve to their sink (opening the system identifier as a
//! file when that is all they carry), tree results go straight to a tree
//! writer, and prebuilt results pass the embedded writer through unchanged.
//!
//! Targets form a closed union resolved by exhaustive matching; there is no
//! open-ended target kind.

use std::fmt;
use std::fs::File;
use std::io;

use crate::error::OutputError;
use crate::output::event::EventWriter;
use crate::output::writer::WriterHandle;

/// A live destination for serialized output.
pub enum Sink<'a> {
    /// A raw byte destination. Characters are encoded on the way in.
    Bytes(Box<dyn io::Write + 'a>),
    /// A character destination. Characters pass through unencoded.
    Chars(Box<dyn fmt::Write + 'a>),
}

impl fmt::Debug for Sink<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(_) => write!(f, "Sink::Bytes"),
            Self::Chars(_) => write!(f, "Sink::Chars"),
        }
    }
}

/// A destination that receives tree-construction callbacks instead of
/// serialized text.
///
/// The tree itself stays with the caller — this crate only dispatches the
/// writer surface into it. Implementations decide what "building a tree"
/// means (a DOM, a test recording, anything).
pub trait TreeBuilder {
    /// Opens an element with the given qualified name.
    fn start_element(&mut self, qname: &str);
    /// Attaches an attribute to the most recently opened element.
    fn attribute(&mut self, qname: &str, value: &str);
    /// Appends character data to the current element.
    fn text(&mut self, content: &str);
    /// Appends a comment node.
    fn comment(&mut self, content: &str);
    /// Appends a processing instruction node.
    fn processing_instruction(&mut self, target: &str, data: Option<&str>);
    /// Closes the most recently opened element.
    fn end_element(&mut self);
}

/// A logical output target for [`create_writer`].
///
/// [`create_writer`]: crate::output::WriterFactory::create_writer
pub enum OutputTarget<'a> {
    /// A raw byte destination with an optional encoding label.
    Bytes {
        /// The byte sink.
        sink: Box<dyn io::Write + 'a>,
        /// Encoding label for the bytes, e.g. `"UTF-8"`. Takes precedence
        /// over the factory's encoding hint. `None` means unencoded UTF-8.
        encoding: Option<String>,
    },
    /// A character destination.
    Chars {
        /// The character sink.
        sink: Box<dyn fmt::Write + 'a>,
    },
    /// A result-style adapter target.
    Result(ResultTarget<'a>),
}

impl<'a> OutputTarget<'a> {
    /// A byte target with no declared encoding.
    pub fn bytes(sink: impl io::Write + 'a) -> Self {
        Self::Bytes {
            sink: Box::new(sink),
            encoding: None,
        }
    }

    /// A byte target with a declared encoding label.
    pub fn bytes_with_encoding(sink: impl io::Write + 'a, encoding: impl Into<String>) -> Self {
        Self::Bytes {
            sink: Box::new(sink),
            encoding: Some(encoding.into()),
        }
    }

    /// A character target.
    pub fn chars(sink: impl fmt::Write + 'a) -> Self {
        Self::Chars {
            sink: Box::new(sink),
        }
    }
}

/// The result-adapter union: one case per adapter kind, matched
/// exhaustively by the factory.
pub enum ResultTarget<'a> {
    /// A stream result wrapping a byte sink, character sink, or system
    /// identifier.
    Stream(StreamResult<'a>),
    /// A tree-building destination. Tree writers bypass the reuse policy
    /// entirely — they are never cached.
    Tree(Box<dyn TreeBuilder + 'a>),
    /// A finished writer supplied by the caller, passed through unchanged.
    Prebuilt(PrebuiltWriter<'a>),
}

/// A stream result: at most one sink description plus an optional system
/// identifier. Resolution precedence is byte sink, then character sink,
/// then system identifier.
#[derive(Default)]
pub struct StreamResult<'a> {
    /// A byte sink, if supplied.
    pub bytes: Option<Box<dyn io::Write + 'a>>,
    /// A character sink, if supplied.
    pub chars: Option<Box<dyn fmt::Write + 'a>>,
    /// A system identifier naming a file to create, if supplied.
    pub system_id: Option<String>,
}

impl<'a> StreamResult<'a> {
    /// A stream result around a byte sink.
    pub fn from_bytes(sink: impl io::Write + 'a) -> Self {
        Self {
            bytes: Some(Box::new(sink)),
            ..Self::default()
        }
    }

    /// A stream result around a character sink.
    pub fn from_chars(sink: impl fmt::Write + 'a) -> Self {
        Self {
            chars: Some(Box::new(sink)),
            ..Self::default()
        }
    }

    /// A stream result naming a file by system identifier.
    pub fn from_system_id(system_id: impl Into<String>) -> Self {
        Self {
            system_id: Some(system_id.into()),
            ..Self::default()
        }
    }

    /// Resolves this result into a live sink, opening the system identifier
    /// as a file when no in-memory sink was supplied.
    pub(crate) fn into_sink(self) -> Result<Sink<'a>, OutputError> {
        if let Some(bytes) = self.bytes {
            return Ok(Sink::Bytes(bytes));
        }
        if let Some(chars) = self.chars {
            return Ok(Sink::Chars(chars));
        }
        if let Some(system_id) = self.system_id {
            let file = File::create(&system_id).map_err(OutputError::WriterConstruction)?;
            return Ok(Sink::Bytes(Box::new(file)));
        }
        Err(OutputError::UnsupportedTarget(
            "stream result carries no sink and no system identifier",
        ))
    }
}

impl fmt::Debug for StreamResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamResult")
            .field("bytes", &self.bytes.is_some())
            .field("chars", &self.chars.is_some())
            .field("system_id", &self.system_id)
            .finish()
    }
}

/// A caller-supplied finished writer, carried inside a
/// [`ResultTarget::Prebuilt`]. At least one of the two kinds must be
/// present for the target to be realizable.
#[derive(Default)]
pub struct PrebuiltWriter<'a> {
    /// A prebuilt writer handle, returned verbatim by `create_writer`.
    pub stream: Option<WriterHandle<'a>>,
    /// A prebuilt event writer, returned verbatim by `create_event_writer`.
    pub event: Option<EventWriter<'a>>,
}

impl<'a> PrebuiltWriter<'a> {
    /// Wraps an existing writer handle.
    #[must_use]
    pub fn from_stream(handle: WriterHandle<'a>) -> Self {
        Self {
            stream: Some(handle),
            event: None,
        }
    }

    /// Wraps an existing event writer.
    #[must_use]
    pub fn from_event(event: EventWriter<'a>) -> Self {
        Self {
            stream: None,
            event: Some(event),
        }
    }
}
