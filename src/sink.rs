use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Output stream the formatters write to.
///
/// Cloning shares the underlying writer. Each call to [`DiagnosticSink::write_block`]
/// holds the lock for the whole block, so one message's lines are never split
/// by another thread's message.
#[derive(Clone)]
pub struct DiagnosticSink {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
    flush_each: bool,
}

impl DiagnosticSink {
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
            flush_each: true,
        }
    }

    #[must_use]
    pub fn stderr() -> Self {
        Self::from_writer(io::stderr())
    }

    #[must_use]
    pub fn stdout() -> Self {
        Self::from_writer(io::stdout())
    }

    /// A sink that drops everything written to it.
    #[must_use]
    pub fn discard() -> Self {
        Self::from_writer(io::sink())
    }

    /// Create (or truncate) `path` and write to it.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be created.
    pub fn file(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::from_writer(File::create(path)?))
    }

    /// An in-memory sink plus a handle to read back what was written.
    #[must_use]
    pub fn buffer() -> (Self, SharedBuffer) {
        let buffer = SharedBuffer::default();
        (Self::from_writer(buffer.clone()), buffer)
    }

    #[must_use]
    pub fn with_flush_each(mut self, flush_each: bool) -> Self {
        self.flush_each = flush_each;
        self
    }

    /// Write a complete message block under the sink lock.
    ///
    /// # Errors
    ///
    /// Returns the underlying writer's error.
    pub fn write_block(&self, block: &str) -> io::Result<()> {
        let mut writer = self.lock();
        writer.write_all(block.as_bytes())?;
        if self.flush_each {
            writer.flush()?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the underlying writer's error.
    pub fn flush(&self) -> io::Result<()> {
        self.lock().flush()
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for DiagnosticSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticSink")
            .field("writer", &"<dyn Write>")
            .field("flush_each", &self.flush_each)
            .finish()
    }
}

/// Shared in-memory writer, mostly for tests and for capturing diagnostics.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    #[must_use]
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    pub fn clear(&self) {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
