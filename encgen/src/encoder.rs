//! Streaming JSON writer with sticky-error semantics.
//!
//! Generated phase types route every byte they produce through an [`Encoder`].
//! Individual writes do not return errors: the first failure is stored on the
//! encoder and turns every later write into a no-op. Callers check once, at the
//! end of the session, through [`Encoder::error`] or [`Encoder::into_result`].

use std::io::Write;

use serde::Serialize;

use crate::error::EncodeError;

/// Streaming writer consumed by generated encoders.
///
/// An encoder owns its sink for the duration of one encoding session. Output is
/// written as it is produced; nothing is buffered beyond the single value being
/// marshaled.
#[derive(Debug)]
pub struct Encoder<W> {
    /// Destination of all output.
    writer: W,

    /// First error observed during the session.
    error: Option<EncodeError>,
}

impl<W: Write> Encoder<W> {
    /// Create a new encoder writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    /// Get the stored error, if any write has failed.
    pub fn error(&self) -> Option<&EncodeError> {
        self.error.as_ref()
    }

    /// Get a reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Consume the encoder and return the sink regardless of the error state.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Consume the encoder, returning the sink if no write failed.
    pub fn into_result(self) -> Result<W, EncodeError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.writer),
        }
    }

    /// Write raw bytes to the sink.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        if self.error.is_some() {
            return;
        }

        if let Err(err) = self.writer.write_all(bytes) {
            self.error = Some(EncodeError::Io(err));
        }
    }

    /// Write text to the sink as-is, without quoting or escaping.
    pub fn write_str(&mut self, text: &str) {
        self.write_raw(text.as_bytes());
    }

    /// Write `"key":value`, marshaling `value` as JSON.
    ///
    /// The value is marshaled before anything is written, so a marshal failure
    /// leaves no partial field in the sink.
    pub fn write_field<T>(&mut self, key: &str, value: &T)
    where
        T: Serialize + ?Sized,
    {
        let Some(value) = self.marshal(value) else {
            return;
        };

        self.write_key(key);
        self.write_raw(&value);
    }

    /// Write `"key":` ahead of a value the caller writes itself.
    pub fn write_key(&mut self, key: &str) {
        let Some(key) = self.marshal(key) else {
            return;
        };

        self.write_raw(&key);
        self.write_raw(b":");
    }

    /// Marshal `value` as JSON and write it.
    pub fn write_marshaled<T>(&mut self, value: &T)
    where
        T: Serialize + ?Sized,
    {
        if let Some(bytes) = self.marshal(value) {
            self.write_raw(&bytes);
        }
    }

    /// Write `{`.
    pub fn open_object(&mut self) {
        self.write_raw(b"{");
    }

    /// Write `}`.
    pub fn close_object(&mut self) {
        self.write_raw(b"}");
    }

    /// Write `[`.
    pub fn open_array(&mut self) {
        self.write_raw(b"[");
    }

    /// Write `]`.
    pub fn close_array(&mut self) {
        self.write_raw(b"]");
    }

    /// Write `,`.
    pub fn comma(&mut self) {
        self.write_raw(b",");
    }

    fn marshal<T>(&mut self, value: &T) -> Option<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        if self.error.is_some() {
            return None;
        }

        match serde_json::to_vec(value) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                self.error = Some(EncodeError::Marshal(err));
                None
            }
        }
    }
}
