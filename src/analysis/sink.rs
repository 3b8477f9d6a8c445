use super::report::TrendReport;
use crate::error::FeedError;
use std::io::{self, Write};
use std::sync::mpsc;

/// Destination for analysis reports.
pub trait ReportSink: Send + 'static {
    /// Delivers one report.
    fn emit(&mut self, report: &TrendReport) -> Result<(), FeedError>;
}

/// How a [`WriterSink`] renders a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// The human-readable summary line.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Writes one line per report to any [`Write`] implementation.
pub struct WriterSink<W> {
    writer: W,
    format: ReportFormat,
}

impl<W: Write> WriterSink<W> {
    /// Wraps `writer`.
    pub fn new(writer: W, format: ReportFormat) -> Self {
        Self { writer, format }
    }

    /// Returns the wrapped writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Unwraps the sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<io::Stdout> {
    /// A sink printing to standard output.
    pub fn stdout(format: ReportFormat) -> Self {
        Self::new(io::stdout(), format)
    }
}

impl<W: Write + Send + 'static> ReportSink for WriterSink<W> {
    fn emit(&mut self, report: &TrendReport) -> Result<(), FeedError> {
        match self.format {
            ReportFormat::Text => writeln!(self.writer, "{report}")?,
            ReportFormat::Json => {
                serde_json::to_writer(&mut self.writer, report)?;
                self.writer.write_all(b"\n")?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Forwards reports to a channel; a disconnected receiver is an I/O error.
impl ReportSink for mpsc::Sender<TrendReport> {
    fn emit(&mut self, report: &TrendReport) -> Result<(), FeedError> {
        self.send(report.clone()).map_err(|_| {
            FeedError::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "report receiver dropped",
            ))
        })
    }
}
