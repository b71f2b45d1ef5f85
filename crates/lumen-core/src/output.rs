//! Status reporting in text, JSON and JSON Lines.
//!
//! Text output prints one `Success: <path>` or `Failed: <path>` line per
//! status. JSON writes objects (or an array for a batch) and JSON Lines
//! writes one object per line.

use serde::Serialize;
use std::io::{self, Write};

use crate::types::Status;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable status lines
    Text,
    /// Single JSON object or array
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Some(Self::Text),
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// A writer that reports statuses in the chosen format.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    items_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer.
    ///
    /// `pretty` only affects the JSON format.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            items_written: 0,
        }
    }

    /// Write a single status.
    pub fn write(&mut self, status: &Status) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                let label = if status.succeeded { "Success" } else { "Failed" };
                writeln!(self.writer, "{}: {}", label, status.source_path.display())?;
            }
            OutputFormat::Json => self.write_json(status)?,
            OutputFormat::JsonLines => {
                // JSONL is never pretty-printed (one object per line)
                serde_json::to_writer(&mut self.writer, status).map_err(io::Error::other)?;
                writeln!(self.writer)?;
            }
        }
        self.items_written += 1;
        Ok(())
    }

    /// Write a batch of statuses.
    ///
    /// For JSON format, writes a single array. Other formats write one entry
    /// per status.
    pub fn write_all(&mut self, statuses: &[Status]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                self.write_json(statuses)?;
                self.items_written += statuses.len();
            }
            OutputFormat::Text | OutputFormat::JsonLines => {
                for status in statuses {
                    self.write(status)?;
                }
            }
        }
        Ok(())
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, value: &T) -> io::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, value).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, value).map_err(io::Error::other)?;
        }
        writeln!(self.writer)
    }

    /// Get the number of statuses written.
    pub fn items_written(&self) -> usize {
        self.items_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn statuses() -> Vec<Status> {
        vec![
            Status::success(PathBuf::from("images/a.png"), PathBuf::from("out/a_final.png")),
            Status::failure(
                PathBuf::from("images/b.png"),
                PathBuf::from("out/b_final.png"),
                "File not found: images/b.png",
            ),
        ]
    }

    #[test]
    fn test_write_text() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Text, false);
        writer.write_all(&statuses()).unwrap();
        assert_eq!(writer.items_written(), 2);

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output, "Success: images/a.png\nFailed: images/b.png\n");
    }

    #[test]
    fn test_write_jsonl() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::JsonLines, true);
        for status in &statuses() {
            writer.write(status).unwrap();
        }

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);
        let parsed: Status = serde_json::from_str(lines[1]).unwrap();
        assert!(!parsed.succeeded);
        assert_eq!(parsed.source_path, PathBuf::from("images/b.png"));
    }

    #[test]
    fn test_write_all_json_array() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Json, false);
        writer.write_all(&statuses()).unwrap();
        assert_eq!(writer.items_written(), 2);

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.starts_with('['));
        assert!(output.trim().ends_with(']'));
        let parsed: Vec<Status> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, statuses());
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(OutputFormat::parse("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("JSONL"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("invalid"), None);
    }
}
