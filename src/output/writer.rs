//! Concrete writers: the stream writer, the tree-writer shim, and the
//! handle that dispatches over them.
//!
//! [`StreamWriter`] emits serialized XML tokens to a [`Sink`], escaping
//! text and attribute values, and tracks a three-state document lifecycle
//! (idle, in-document, complete) that backs its
//! [`can_reuse`](StreamWriter::can_reuse) capability flag. A writer can be
//! [`reset`](StreamWriter::reset) and rebound to a new sink with
//! [`set_output`](StreamWriter::set_output); the factory's reuse policy is
//! built on those two operations.
//!
//! [`TreeWriter`] forwards the same surface into a caller-supplied
//! [`TreeBuilder`] without serializing anything.
//!
//! Writers assume single-threaded, synchronous use. Nothing here validates
//! well-formedness beyond the minimal state checks (an attribute needs an
//! open start tag, an end tag needs an open element).

use std::io;

use encoding_rs::Encoding;

use crate::attrs::AttributeCollection;
use crate::error::OutputError;
use crate::output::config::OutputConfig;
use crate::output::target::{Sink, TreeBuilder};

/// Document lifecycle of a stream writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    /// Nothing written since construction or the last reset.
    Idle,
    /// A document (or fragment) is being written.
    InDocument,
    /// The document was ended; the writer must be reset before rebinding.
    Complete,
}

/// Resolves an optional encoding label through the encoding registry.
fn resolve_encoding(label: Option<&str>) -> Result<Option<&'static Encoding>, OutputError> {
    match label {
        Some(label) => Encoding::for_label(label.as_bytes())
            .map(Some)
            .ok_or_else(|| OutputError::Encoding(label.to_string())),
        None => Ok(None),
    }
}

/// A streaming XML writer bound to exactly one sink at a time.
pub struct StreamWriter<'a> {
    sink: Sink<'a>,
    /// Declared output encoding for byte sinks; `None` writes raw UTF-8.
    encoding: Option<&'static Encoding>,
    escape_characters: bool,
    /// Hex-escape non-ASCII characters: byte sink with no declared encoding.
    reencode_non_ascii: bool,
    state: WriterState,
    /// Qualified names of the currently open elements.
    open_elements: Vec<String>,
    /// A start tag has been emitted but not yet closed with `>`.
    tag_open: bool,
    /// Times this writer has been rebound to a new sink.
    rebinds: u32,
}

impl std::fmt::Debug for StreamWriter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamWriter")
            .field("sink", &self.sink)
            .field("encoding", &self.encoding.map(Encoding::name))
            .field("state", &self.state)
            .field("depth", &self.open_elements.len())
            .finish()
    }
}

impl<'a> StreamWriter<'a> {
    /// Creates a writer over `sink`.
    ///
    /// The encoding label applies only to byte sinks; character sinks take
    /// characters as-is. `config` supplies the writer-context properties —
    /// pass `None` for the defaults.
    ///
    /// # Errors
    ///
    /// [`OutputError::Encoding`] when the label is not a known encoding.
    pub fn new(
        sink: Sink<'a>,
        encoding: Option<&str>,
        config: Option<&OutputConfig>,
    ) -> Result<Self, OutputError> {
        let encoding = resolve_encoding(encoding)?;
        let reencode_non_ascii = matches!(sink, Sink::Bytes(_)) && encoding.is_none();
        Ok(Self {
            sink,
            encoding,
            escape_characters: config.map_or(true, OutputConfig::escape_characters),
            reencode_non_ascii,
            state: WriterState::Idle,
            open_elements: Vec::new(),
            tag_open: false,
            rebinds: 0,
        })
    }

    /// Whether this writer may be rebound to a new sink right now.
    ///
    /// False while a document is open — an in-progress write must not be
    /// hijacked by rebinding.
    #[must_use]
    pub fn can_reuse(&self) -> bool {
        self.state != WriterState::InDocument
    }

    /// Reinitializes the per-document state: lifecycle back to idle, open
    /// elements discarded. The sink binding and configuration are kept.
    pub fn reset(&mut self) {
        self.state = WriterState::Idle;
        self.open_elements.clear();
        self.tag_open = false;
    }

    /// Rebinds the writer to a new sink.
    ///
    /// # Errors
    ///
    /// [`OutputError::Encoding`] when the label is not a known encoding.
    pub fn set_output(&mut self, sink: Sink<'a>, encoding: Option<&str>) -> Result<(), OutputError> {
        self.encoding = resolve_encoding(encoding)?;
        self.reencode_non_ascii = matches!(sink, Sink::Bytes(_)) && self.encoding.is_none();
        self.sink = sink;
        self.rebinds += 1;
        Ok(())
    }

    /// Times this writer has been rebound; used by the factory's reuse
    /// bookkeeping.
    pub(crate) fn rebinds(&self) -> u32 {
        self.rebinds
    }

    /// Writes the XML declaration.
    ///
    /// Defaults the version to `1.0`; declares the encoding when the sink
    /// has one; declares `standalone` only when given.
    ///
    /// # Errors
    ///
    /// [`OutputError::InvalidWriterState`] unless the writer is idle;
    /// [`OutputError::Io`] when the sink rejects the write.
    pub fn write_start_document(
        &mut self,
        version: Option<&str>,
        standalone: Option<bool>,
    ) -> Result<(), OutputError> {
        if self.state != WriterState::Idle {
            return Err(OutputError::InvalidWriterState("document already started"));
        }
        let mut decl = String::from("<?xml version=\"");
        decl.push_str(version.unwrap_or("1.0"));
        decl.push('"');
        if let Some(encoding) = self.encoding {
            decl.push_str(" encoding=\"");
            decl.push_str(encoding.name());
            decl.push('"');
        }
        if let Some(standalone) = standalone {
            decl.push_str(" standalone=\"");
            decl.push_str(if standalone { "yes" } else { "no" });
            decl.push('"');
        }
        decl.push_str("?>\n");
        self.state = WriterState::InDocument;
        self.emit(&decl)
    }

    /// Opens an element. The start tag stays open for attributes until the
    /// next content or end call.
    ///
    /// # Errors
    ///
    /// [`OutputError::InvalidWriterState`] after the document is complete;
    /// [`OutputError::Io`] when the sink rejects the write.
    pub fn write_start_element(&mut self, qname: &str) -> Result<(), OutputError> {
        self.ensure_writable()?;
        self.close_start_tag()?;
        self.state = WriterState::InDocument;
        let mut token = String::with_capacity(qname.len() + 1);
        token.push('<');
        token.push_str(qname);
        self.open_elements.push(qname.to_string());
        self.tag_open = true;
        self.emit(&token)
    }

    /// Writes one attribute into the open start tag.
    ///
    /// # Errors
    ///
    /// [`OutputError::InvalidWriterState`] when no start tag is open;
    /// [`OutputError::Io`] when the sink rejects the write.
    pub fn write_attribute(&mut self, qname: &str, value: &str) -> Result<(), OutputError> {
        if !self.tag_open {
            return Err(OutputError::InvalidWriterState(
                "no start tag open for attribute",
            ));
        }
        let mut token = String::with_capacity(qname.len() + value.len() + 4);
        token.push(' ');
        token.push_str(qname);
        token.push_str("=\"");
        if self.escape_characters {
            write_escaped_attr(&mut token, value, self.reencode_non_ascii);
        } else {
            token.push_str(value);
        }
        token.push('"');
        self.emit(&token)
    }

    /// Writes every attribute of a collection, in insertion order.
    ///
    /// # Errors
    ///
    /// As [`write_attribute`](Self::write_attribute).
    pub fn write_attributes(&mut self, attrs: &AttributeCollection) -> Result<(), OutputError> {
        for attr in attrs {
            self.write_attribute(&attr.qname, &attr.value)?;
        }
        Ok(())
    }

    /// Writes character data, escaped unless `escapeCharacters` is off.
    ///
    /// # Errors
    ///
    /// [`OutputError::InvalidWriterState`] after the document is complete;
    /// [`OutputError::Io`] when the sink rejects the write.
    pub fn write_characters(&mut self, text: &str) -> Result<(), OutputError> {
        self.ensure_writable()?;
        self.close_start_tag()?;
        self.state = WriterState::InDocument;
        if self.escape_characters {
            let mut token = String::with_capacity(text.len());
            write_escaped_text(&mut token, text, self.reencode_non_ascii);
            self.emit(&token)
        } else {
            self.emit(text)
        }
    }

    /// Writes a CDATA section. The content is never escaped.
    ///
    /// # Errors
    ///
    /// As [`write_characters`](Self::write_characters).
    pub fn write_cdata(&mut self, content: &str) -> Result<(), OutputError> {
        self.ensure_writable()?;
        self.close_start_tag()?;
        self.state = WriterState::InDocument;
        let mut token = String::with_capacity(content.len() + 12);
        token.push_str("<![CDATA[");
        token.push_str(content);
        token.push_str("]]>");
        self.emit(&token)
    }

    /// Writes a comment.
    ///
    /// # Errors
    ///
    /// As [`write_characters`](Self::write_characters).
    pub fn write_comment(&mut self, content: &str) -> Result<(), OutputError> {
        self.ensure_writable()?;
        self.close_start_tag()?;
        self.state = WriterState::InDocument;
        let mut token = String::with_capacity(content.len() + 7);
        token.push_str("<!--");
        token.push_str(content);
        token.push_str("-->");
        self.emit(&token)
    }

    /// Writes a processing instruction.
    ///
    /// # Errors
    ///
    /// As [`write_characters`](Self::write_characters).
    pub fn write_processing_instruction(
        &mut self,
        target: &str,
        data: Option<&str>,
    ) -> Result<(), OutputError> {
        self.ensure_writable()?;
        self.close_start_tag()?;
        self.state = WriterState::InDocument;
        let mut token = String::with_capacity(target.len() + 4);
        token.push_str("<?");
        token.push_str(target);
        if let Some(data) = data {
            token.push(' ');
            token.push_str(data);
        }
        token.push_str("?>");
        self.emit(&token)
    }

    /// Closes the most recently opened element. An element with no content
    /// closes as an empty-element tag (`<name/>`).
    ///
    /// # Errors
    ///
    /// [`OutputError::InvalidWriterState`] when no element is open or the
    /// document is complete; [`OutputError::Io`] when the sink rejects the
    /// write.
    pub fn write_end_element(&mut self) -> Result<(), OutputError> {
        self.ensure_writable()?;
        let Some(qname) = self.open_elements.pop() else {
            return Err(OutputError::InvalidWriterState("no open element to end"));
        };
        if self.tag_open {
            self.tag_open = false;
            self.emit("/>")
        } else {
            let mut token = String::with_capacity(qname.len() + 3);
            token.push_str("</");
            token.push_str(&qname);
            token.push('>');
            self.emit(&token)
        }
    }

    /// Ends the document: closes any elements still open, marks the writer
    /// complete, and flushes the sink.
    ///
    /// # Errors
    ///
    /// [`OutputError::InvalidWriterState`] when the document is already
    /// complete; [`OutputError::Io`] when the sink rejects a write.
    pub fn write_end_document(&mut self) -> Result<(), OutputError> {
        self.ensure_writable()?;
        while !self.open_elements.is_empty() {
            self.write_end_element()?;
        }
        self.state = WriterState::Complete;
        self.flush()
    }

    /// Flushes the underlying sink.
    ///
    /// # Errors
    ///
    /// [`OutputError::Io`] when the flush fails.
    pub fn flush(&mut self) -> Result<(), OutputError> {
        if let Sink::Bytes(sink) = &mut self.sink {
            sink.flush()?;
        }
        Ok(())
    }

    fn ensure_writable(&self) -> Result<(), OutputError> {
        if self.state == WriterState::Complete {
            return Err(OutputError::InvalidWriterState("document already complete"));
        }
        Ok(())
    }

    fn close_start_tag(&mut self) -> Result<(), OutputError> {
        if self.tag_open {
            self.tag_open = false;
            self.emit(">")?;
        }
        Ok(())
    }

    fn emit(&mut self, text: &str) -> Result<(), OutputError> {
        match &mut self.sink {
            Sink::Bytes(sink) => {
                if let Some(encoding) = self.encoding {
                    let (bytes, _, _) = encoding.encode(text);
                    sink.write_all(&bytes)?;
                } else {
                    sink.write_all(text.as_bytes())?;
                }
            }
            Sink::Chars(sink) => {
                sink.write_str(text)
                    .map_err(|_| io::Error::other("character sink rejected output"))?;
            }
        }
        Ok(())
    }
}

/// Writes a hexadecimal character reference (`&#xHH;`) for a code point.
fn write_hex_char_ref(out: &mut String, ch: char) {
    use std::fmt::Write;
    let _ = write!(out, "&#x{:X};", ch as u32);
}

/// Escapes text content:
/// - `<`, `>`, `&` become named entity references
/// - `\r` becomes `&#13;`; `\t` and `\n` pass through
/// - other controls below 0x20 are hex-encoded
/// - non-ASCII characters are hex-encoded when no encoding is declared
fn write_escaped_text(out: &mut String, text: &str, reencode_non_ascii: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            '\t' | '\n' => out.push(ch),
            c if (c as u32) < 0x20 => write_hex_char_ref(out, c),
            c if reencode_non_ascii && (c as u32) >= 0x80 => write_hex_char_ref(out, c),
            _ => out.push(ch),
        }
    }
}

/// Escapes an attribute value: like text escaping but `"` becomes
/// `&quot;` and the whitespace characters `\t`, `\n`, `\r` are written as
/// decimal character references so they survive attribute-value
/// normalization.
fn write_escaped_attr(out: &mut String, text: &str, reencode_non_ascii: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            c if (c as u32) < 0x20 => write_hex_char_ref(out, c),
            c if reencode_non_ascii && (c as u32) >= 0x80 => write_hex_char_ref(out, c),
            _ => out.push(ch),
        }
    }
}

/// A thin dispatch shim from the writer surface into a [`TreeBuilder`].
///
/// Tree writers never serialize and are never cached by the factory.
pub struct TreeWriter<'a> {
    builder: Box<dyn TreeBuilder + 'a>,
    depth: usize,
}

impl std::fmt::Debug for TreeWriter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeWriter")
            .field("depth", &self.depth)
            .finish()
    }
}

impl<'a> TreeWriter<'a> {
    /// Creates a tree writer dispatching into `builder`.
    #[must_use]
    pub fn new(builder: Box<dyn TreeBuilder + 'a>) -> Self {
        Self { builder, depth: 0 }
    }

    /// Opens an element in the tree.
    pub fn write_start_element(&mut self, qname: &str) {
        self.builder.start_element(qname);
        self.depth += 1;
    }

    /// Attaches an attribute to the most recently opened element.
    pub fn write_attribute(&mut self, qname: &str, value: &str) {
        self.builder.attribute(qname, value);
    }

    /// Appends character data.
    pub fn write_characters(&mut self, text: &str) {
        self.builder.text(text);
    }

    /// Appends a comment node.
    pub fn write_comment(&mut self, content: &str) {
        self.builder.comment(content);
    }

    /// Appends a processing instruction node.
    pub fn write_processing_instruction(&mut self, target: &str, data: Option<&str>) {
        self.builder.processing_instruction(target, data);
    }

    /// Closes the most recently opened element.
    ///
    /// # Errors
    ///
    /// [`OutputError::InvalidWriterState`] when no element is open.
    pub fn write_end_element(&mut self) -> Result<(), OutputError> {
        if self.depth == 0 {
            return Err(OutputError::InvalidWriterState("no open element to end"));
        }
        self.depth -= 1;
        self.builder.end_element();
        Ok(())
    }

    /// Closes any elements still open.
    ///
    /// # Errors
    ///
    /// None in practice; kept fallible for surface parity.
    pub fn write_end_document(&mut self) -> Result<(), OutputError> {
        while self.depth > 0 {
            self.write_end_element()?;
        }
        Ok(())
    }
}

/// The writer produced by the factory: a stream writer or a tree writer,
/// dispatched over exhaustively.
#[derive(Debug)]
pub enum WriterHandle<'a> {
    /// A serializing stream writer.
    Stream(StreamWriter<'a>),
    /// A tree-building dispatch shim.
    Tree(TreeWriter<'a>),
}

impl<'a> WriterHandle<'a> {
    /// Whether the writer may be rebound right now. Tree writers are never
    /// reusable.
    #[must_use]
    pub fn can_reuse(&self) -> bool {
        match self {
            Self::Stream(writer) => writer.can_reuse(),
            Self::Tree(_) => false,
        }
    }

    /// Writes the XML declaration. A no-op for tree writers.
    ///
    /// # Errors
    ///
    /// As [`StreamWriter::write_start_document`].
    pub fn write_start_document(
        &mut self,
        version: Option<&str>,
        standalone: Option<bool>,
    ) -> Result<(), OutputError> {
        match self {
            Self::Stream(writer) => writer.write_start_document(version, standalone),
            Self::Tree(_) => Ok(()),
        }
    }

    /// Opens an element.
    ///
    /// # Errors
    ///
    /// As [`StreamWriter::write_start_element`].
    pub fn write_start_element(&mut self, qname: &str) -> Result<(), OutputError> {
        match self {
            Self::Stream(writer) => writer.write_start_element(qname),
            Self::Tree(writer) => {
                writer.write_start_element(qname);
                Ok(())
            }
        }
    }

    /// Writes one attribute.
    ///
    /// # Errors
    ///
    /// As [`StreamWriter::write_attribute`].
    pub fn write_attribute(&mut self, qname: &str, value: &str) -> Result<(), OutputError> {
        match self {
            Self::Stream(writer) => writer.write_attribute(qname, value),
            Self::Tree(writer) => {
                writer.write_attribute(qname, value);
                Ok(())
            }
        }
    }

    /// Writes every attribute of a collection, in insertion order.
    ///
    /// # Errors
    ///
    /// As [`StreamWriter::write_attribute`].
    pub fn write_attributes(&mut self, attrs: &AttributeCollection) -> Result<(), OutputError> {
        match self {
            Self::Stream(writer) => writer.write_attributes(attrs),
            Self::Tree(writer) => {
                for attr in attrs {
                    writer.write_attribute(&attr.qname, &attr.value);
                }
                Ok(())
            }
        }
    }

    /// Writes character data.
    ///
    /// # Errors
    ///
    /// As [`StreamWriter::write_characters`].
    pub fn write_characters(&mut self, text: &str) -> Result<(), OutputError> {
        match self {
            Self::Stream(writer) => writer.write_characters(text),
            Self::Tree(writer) => {
                writer.write_characters(text);
                Ok(())
            }
        }
    }

    /// Writes a CDATA section; tree writers receive it as text.
    ///
    /// # Errors
    ///
    /// As [`StreamWriter::write_cdata`].
    pub fn write_cdata(&mut self, content: &str) -> Result<(), OutputError> {
        match self {
            Self::Stream(writer) => writer.write_cdata(content),
            Self::Tree(writer) => {
                writer.write_characters(content);
                Ok(())
            }
        }
    }

    /// Writes a comment.
    ///
    /// # Errors
    ///
    /// As [`StreamWriter::write_comment`].
    pub fn write_comment(&mut self, content: &str) -> Result<(), OutputError> {
        match self {
            Self::Stream(writer) => writer.write_comment(content),
            Self::Tree(writer) => {
                writer.write_comment(content);
                Ok(())
            }
        }
    }

    /// Writes a processing instruction.
    ///
    /// # Errors
    ///
    /// As [`StreamWriter::write_processing_instruction`].
    pub fn write_processing_instruction(
        &mut self,
        target: &str,
        data: Option<&str>,
    ) -> Result<(), OutputError> {
        match self {
            Self::Stream(writer) => writer.write_processing_instruction(target, data),
            Self::Tree(writer) => {
                writer.write_processing_instruction(target, data);
                Ok(())
            }
        }
    }

    /// Closes the most recently opened element.
    ///
    /// # Errors
    ///
    /// As [`StreamWriter::write_end_element`].
    pub fn write_end_element(&mut self) -> Result<(), OutputError> {
        match self {
            Self::Stream(writer) => writer.write_end_element(),
            Self::Tree(writer) => writer.write_end_element(),
        }
    }

    /// Ends the document.
    ///
    /// # Errors
    ///
    /// As [`StreamWriter::write_end_document`].
    pub fn write_end_document(&mut self) -> Result<(), OutputError> {
        match self {
            Self::Stream(writer) => writer.write_end_document(),
            Self::Tree(writer) => writer.write_end_document(),
        }
    }

    /// Flushes the underlying sink. A no-op for tree writers.
    ///
    /// # Errors
    ///
    /// As [`StreamWriter::flush`].
    pub fn flush(&mut self) -> Result<(), OutputError> {
        match self {
            Self::Stream(writer) => writer.flush(),
            Self::Tree(_) => Ok(()),
        }
    }
}
