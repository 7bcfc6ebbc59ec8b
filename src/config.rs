use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{DiagnosticsError, Result};
use crate::format::Formatter;
use crate::sink::DiagnosticSink;

/// Where formatted diagnostics go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputTarget {
    #[default]
    Stderr,
    Stdout,
    /// Write to `DiagnosticsOptions::path`.
    File,
    Discard,
}

/// Options for building the formatter's sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsOptions {
    pub output: OutputTarget,
    pub path: Option<PathBuf>,
    pub flush_each_message: bool,
}

impl Default for DiagnosticsOptions {
    fn default() -> Self {
        Self {
            output: OutputTarget::Stderr,
            path: None,
            flush_each_message: true,
        }
    }
}

impl DiagnosticsOptions {
    #[must_use]
    pub fn new(output: OutputTarget) -> Self {
        Self {
            output,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn builder() -> DiagnosticsOptionsBuilder {
        DiagnosticsOptionsBuilder::default()
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Parse options from a JSON object; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `DiagnosticsError::Json` if the text is not valid options JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Open the configured sink.
    ///
    /// # Errors
    ///
    /// Returns `DiagnosticsError::ConfigError` for `File` output without a
    /// path, and `DiagnosticsError::Io` if the file cannot be created.
    pub fn into_sink(self) -> Result<DiagnosticSink> {
        let sink = match self.output {
            OutputTarget::Stderr => DiagnosticSink::stderr(),
            OutputTarget::Stdout => DiagnosticSink::stdout(),
            OutputTarget::Discard => DiagnosticSink::discard(),
            OutputTarget::File => {
                let path = self.path.ok_or_else(|| {
                    DiagnosticsError::ConfigError("file output requires a path".into())
                })?;
                DiagnosticSink::file(path)?
            }
        };
        Ok(sink.with_flush_each(self.flush_each_message))
    }

    /// # Errors
    ///
    /// Same as [`DiagnosticsOptions::into_sink`].
    pub fn into_formatter(self) -> Result<Formatter> {
        Ok(Formatter::new(self.into_sink()?))
    }
}

/// Fluent builder for diagnostics options.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsOptionsBuilder {
    opts: DiagnosticsOptions,
}

impl DiagnosticsOptionsBuilder {
    #[must_use]
    pub fn output(mut self, output: OutputTarget) -> Self {
        self.opts.output = output;
        self
    }

    #[must_use]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.opts.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn flush_each_message(mut self, flush: bool) -> Self {
        self.opts.flush_each_message = flush;
        self
    }

    #[must_use]
    pub fn finish(self) -> DiagnosticsOptions {
        self.opts
    }

    /// # Errors
    ///
    /// Same as [`DiagnosticsOptions::into_formatter`].
    pub fn build(self) -> Result<Formatter> {
        self.finish().into_formatter()
    }
}
