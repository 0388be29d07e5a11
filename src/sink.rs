use std::io::Write;
use std::sync::Mutex;

/// Append-only, line-buffered sink for run progress text.
///
/// The engine reports every significant event here as one human-readable
/// entry: folders entered, files searched, each substitution with its
/// before/after line text, copy and skip notices, failures, and the final
/// summary. The text is advisory, meant for a scrolling log view; a write
/// error on the sink never fails the run.
pub struct LogSink {
    inner: Mutex<Box<dyn Write + Send>>,
}

impl LogSink {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Mutex::new(Box::new(writer)),
        }
    }

    /// A sink writing to standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// A sink that discards everything.
    pub fn discard() -> Self {
        Self::new(std::io::sink())
    }

    /// Writes one entry followed by a newline and flushes it.
    pub fn line(&self, message: impl AsRef<str>) {
        if let Ok(mut writer) = self.inner.lock() {
            let _ = writeln!(writer, "{}", message.as_ref());
            let _ = writer.flush();
        }
    }
}
