//! CSV sink: one flattened file over the merged schema.
//!
//! The header row is written with the first batch; later batches only
//! append rows. Inapplicable fields are empty.

use super::{BatchSink, SinkReport};
use crate::error::{Result, SsimError};
use crate::processor::batch::SsimBatch;
use crate::schema::merged_schema;
use polars::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug)]
pub struct CsvSink {
    path: PathBuf,
    file: Option<File>,
    header_written: bool,
    rows: usize,
}

impl CsvSink {
    /// Create (or truncate) the target file, creating parent directories
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                SsimError::sink(
                    "csv",
                    format!("cannot create directory {}", parent.display()),
                    e,
                )
            })?;
        }
        let file = File::create(&path).map_err(|e| {
            SsimError::sink("csv", format!("cannot create {}", path.display()), e)
        })?;
        debug!("Created CSV output {}", path.display());

        Ok(Self {
            path,
            file: Some(file),
            header_written: false,
            rows: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_frame(&mut self, frame: &mut DataFrame) -> Result<()> {
        let Some(file) = self.file.as_mut() else {
            return Err(SsimError::sink(
                "csv",
                format!("{} is already closed", self.path.display()),
                std::io::Error::other("write after finish"),
            ));
        };
        CsvWriter::new(file)
            .include_header(!self.header_written)
            .finish(frame)?;
        self.header_written = true;
        Ok(())
    }
}

impl BatchSink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn write_batch(&mut self, batch: &SsimBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut merged = batch.merged()?;
        self.write_frame(&mut merged)?;
        self.rows += merged.height();
        Ok(())
    }

    fn finish(&mut self) -> Result<SinkReport> {
        if !self.header_written {
            let mut empty = DataFrame::empty_with_schema(merged_schema());
            self.write_frame(&mut empty)?;
        }
        if let Some(mut file) = self.file.take() {
            file.flush().map_err(|e| {
                SsimError::sink("csv", format!("cannot flush {}", self.path.display()), e)
            })?;
        }
        info!("Wrote {} rows to {}", self.rows, self.path.display());

        Ok(SinkReport {
            sink: self.name(),
            rows_written: self.rows,
            files: vec![self.path.clone()],
        })
    }

    fn abort(&mut self) {
        self.file = None;
        if let Err(e) = fs::remove_file(&self.path) {
            debug!("Could not remove {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tests::SsimFixture;
    use crate::processor::SsimReader;
    use crate::config::SsimConfig;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_header_written_once_across_batches() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("out.csv");
        let fixture = SsimFixture::new(&["XX"], 4, 1, 1);

        let mut sink = CsvSink::create(&path).unwrap();
        let config = SsimConfig::default().with_batch_size(2);
        let mut reader =
            SsimReader::from_reader(Cursor::new(fixture.render()), "fixture", config).unwrap();
        let mut sinks: [&mut dyn BatchSink; 1] = [&mut sink];
        let report = reader.run(&mut sinks).unwrap();
        assert!(report.summary.batches_flushed > 1);

        let content = fs::read_to_string(&path).unwrap();
        let headers = content
            .lines()
            .filter(|line| line.starts_with("record_type,"))
            .count();
        assert_eq!(headers, 1);
        // 1 carrier + 4 legs + 4 elements, plus the header row
        assert_eq!(content.lines().count(), 10);
        assert_eq!(report.rows_written(), 9);
    }

    #[test]
    fn test_empty_input_still_writes_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.csv");
        let mut sink = CsvSink::create(&path).unwrap();
        let report = sink.finish().unwrap();
        assert_eq!(report.rows_written, 0);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("record_type,airline_designator"));
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_abort_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("partial.csv");
        let mut sink = CsvSink::create(&path).unwrap();
        assert!(path.exists());
        sink.abort();
        assert!(!path.exists());
    }
}
