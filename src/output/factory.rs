//! The writer factory: target resolution, reuse policy, configuration.
//!
//! [`WriterFactory`] turns an [`OutputTarget`] into a [`WriterHandle`]. A
//! target is normalized by unwrapping its result adapter one level: stream
//! results resolve to a sink, tree results go straight to a tree writer
//! (bypassing the reuse policy), and prebuilt results return the embedded
//! writer verbatim, short-circuiting everything else.
//!
//! # Reuse policy
//!
//! A previously produced stream writer may be reset and rebound to a new
//! sink instead of constructing a fresh one, but only when all of these
//! hold:
//!
//! 1. the factory's reuse-instance setting is enabled,
//! 2. a relinquished handle sits in the cache slot,
//! 3. that handle reports itself reusable (not mid-document),
//! 4. no configuration property changed since the last writer was produced.
//!
//! Enabling the reuse-instance setting through [`set_property`] is itself
//! always rejected: stream writers are not safe for reuse across threads,
//! and the factory refuses to let callers believe otherwise. The policy
//! machinery stays in place behind that refusal.
//!
//! The factory owns the cached handle between calls. A handle returned by
//! [`create_writer`] is checked out — the factory holds nothing and will
//! not rebind it. Callers hand a handle back with [`recycle`], after which
//! a later `create_writer` call may rebind it.
//!
//! [`create_writer`]: WriterFactory::create_writer
//! [`set_property`]: WriterFactory::set_property
//! [`recycle`]: WriterFactory::recycle
//!
//! # Examples
//!
//! ```
//! use staxide::{OutputTarget, WriterFactory};
//!
//! # fn main() -> Result<(), staxide::OutputError> {
//! let mut buf = Vec::new();
//! let mut factory = WriterFactory::new();
//! let mut writer = factory.create_writer(OutputTarget::bytes(&mut buf), None)?;
//! writer.write_start_element("note")?;
//! writer.write_characters("remember")?;
//! writer.write_end_document()?;
//! drop(writer);
//! drop(factory);
//! assert_eq!(buf, b"<note>remember</note>");
//! # Ok(())
//! # }
//! ```

use log::debug;

use crate::error::OutputError;
use crate::output::config::{OutputConfig, PropertyValue};
use crate::output::event::EventWriter;
use crate::output::target::{OutputTarget, ResultTarget, Sink};
use crate::output::writer::{StreamWriter, TreeWriter, WriterHandle};

/// Produces writers for output targets, optionally reusing a relinquished
/// one. Single-threaded; one factory per producing component.
#[derive(Debug, Default)]
pub struct WriterFactory<'a> {
    config: OutputConfig,
    /// The relinquished writer available for rebinding, if any.
    cached: Option<StreamWriter<'a>>,
    /// Mirrors the `reuse-instance` property. Always false through the
    /// public surface — enabling it is rejected by `set_property`.
    reuse_instance: bool,
}

impl<'a> WriterFactory<'a> {
    /// Creates a factory with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Produces a writer bound to `target`.
    ///
    /// `encoding_hint` applies to byte sinks that do not declare their own
    /// encoding; character sinks ignore it.
    ///
    /// # Errors
    ///
    /// [`OutputError::UnsupportedTarget`] when the target cannot be
    /// realized (a prebuilt result without a stream writer, or a stream
    /// result with neither sink nor system identifier);
    /// [`OutputError::WriterConstruction`] when the sink cannot be opened;
    /// [`OutputError::Encoding`] for an unknown encoding label.
    pub fn create_writer(
        &mut self,
        target: OutputTarget<'a>,
        encoding_hint: Option<&str>,
    ) -> Result<WriterHandle<'a>, OutputError> {
        match target {
            OutputTarget::Bytes { sink, encoding } => {
                let label = encoding.or_else(|| encoding_hint.map(str::to_string));
                self.stream_writer(Sink::Bytes(sink), label.as_deref())
            }
            OutputTarget::Chars { sink } => self.stream_writer(Sink::Chars(sink), None),
            OutputTarget::Result(ResultTarget::Stream(result)) => {
                let sink = result.into_sink()?;
                self.stream_writer(sink, encoding_hint)
            }
            // tree writers bypass the reuse policy entirely
            OutputTarget::Result(ResultTarget::Tree(builder)) => {
                Ok(WriterHandle::Tree(TreeWriter::new(builder)))
            }
            OutputTarget::Result(ResultTarget::Prebuilt(prebuilt)) => match prebuilt.stream {
                Some(handle) => Ok(handle),
                None => Err(OutputError::UnsupportedTarget(
                    "prebuilt result carries no stream writer",
                )),
            },
        }
    }

    /// Produces an event writer bound to `target`.
    ///
    /// A prebuilt result carrying an event writer returns it verbatim;
    /// anything else wraps the writer [`create_writer`](Self::create_writer)
    /// would produce.
    ///
    /// # Errors
    ///
    /// As [`create_writer`](Self::create_writer).
    pub fn create_event_writer(
        &mut self,
        target: OutputTarget<'a>,
        encoding_hint: Option<&str>,
    ) -> Result<EventWriter<'a>, OutputError> {
        if let OutputTarget::Result(ResultTarget::Prebuilt(prebuilt)) = target {
            if let Some(event) = prebuilt.event {
                return Ok(event);
            }
            match prebuilt.stream {
                Some(handle) => return Ok(EventWriter::new(handle)),
                None => {
                    return Err(OutputError::UnsupportedTarget(
                        "prebuilt result carries neither writer kind",
                    ))
                }
            }
        }
        Ok(EventWriter::new(self.create_writer(target, encoding_hint)?))
    }

    /// Hands a checked-out writer back to the factory.
    ///
    /// The handle becomes the cached instance the reuse policy may rebind.
    /// Tree writers are never cached and are dropped here.
    pub fn recycle(&mut self, handle: WriterHandle<'a>) {
        if let WriterHandle::Stream(writer) = handle {
            self.cached = Some(writer);
        }
    }

    /// Returns the value of a recognized property.
    ///
    /// # Errors
    ///
    /// [`OutputError::UnsupportedProperty`] when `name` is not recognized.
    pub fn get_property(&self, name: &str) -> Result<&PropertyValue, OutputError> {
        self.config.get_property(name)
    }

    /// Sets a recognized property.
    ///
    /// Any successful set other than `reuse-instance` marks the
    /// configuration changed, which disqualifies the cached writer from
    /// reuse on the next [`create_writer`](Self::create_writer) call.
    ///
    /// # Errors
    ///
    /// [`OutputError::UnsupportedProperty`] for unrecognized names;
    /// [`OutputError::InvalidPropertyValue`] for non-boolean values and for
    /// any attempt to enable `reuse-instance`.
    pub fn set_property(
        &mut self,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<(), OutputError> {
        self.config.set_property(name, value)?;
        self.reuse_instance = self.config.reuse_instance();
        Ok(())
    }

    /// Whether `name` is in the recognized property set.
    #[must_use]
    pub fn is_property_supported(&self, name: &str) -> bool {
        self.config.is_property_supported(name)
    }

    /// The stream-writer path: consult the reuse policy, then rebind the
    /// cached writer or construct a fresh one.
    fn stream_writer(
        &mut self,
        sink: Sink<'a>,
        encoding: Option<&str>,
    ) -> Result<WriterHandle<'a>, OutputError> {
        // character sinks take characters as-is; no encoding applies
        let encoding = match sink {
            Sink::Chars(_) => None,
            Sink::Bytes(_) => encoding,
        };

        let reusable = self.reuse_instance
            && !self.config.is_dirty()
            && self.cached.as_ref().is_some_and(StreamWriter::can_reuse);
        if reusable {
            if let Some(mut writer) = self.cached.take() {
                writer.reset();
                writer.set_output(sink, encoding)?;
                debug!("reusing stream writer (rebind #{})", writer.rebinds());
                return Ok(WriterHandle::Stream(writer));
            }
        }

        // a stale cached instance is replaced, never kept alongside
        self.cached = None;
        let writer = StreamWriter::new(sink, encoding, Some(&self.config))?;
        self.config.mark_clean();
        debug!("constructed a fresh stream writer");
        Ok(WriterHandle::Stream(writer))
    }
}
