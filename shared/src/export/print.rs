//! Writes the exposition to a writer, standard output by default.

use super::{ExportError, Exporter};
use crate::exposition;
use crate::registry::MetricRegistry;
use std::io::{self, Write};
use std::sync::Mutex;

/// Prints the text exposition.
#[derive(Debug)]
pub struct PrintExporter<W> {
    writer: Mutex<W>,
}

impl PrintExporter<io::Stdout> {
    /// Creates an exporter printing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> PrintExporter<W> {
    /// Creates an exporter writing to `writer`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Returns the writer.
    ///
    /// # Errors
    ///
    /// Returns an error if a previous write panicked while holding the writer.
    pub fn into_inner(self) -> Result<W, ExportError> {
        self.writer
            .into_inner()
            .map_err(|_| ExportError::Io(io::Error::other("writer lock poisoned")))
    }

    fn write_all(&self, text: &str) -> Result<(), ExportError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| ExportError::Io(io::Error::other("writer lock poisoned")))?;
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> Exporter for PrintExporter<W> {
    async fn export(&self, registry: &MetricRegistry) -> Result<(), ExportError> {
        let text = exposition::render(registry)?;
        self.write_all(&text)
    }
}
