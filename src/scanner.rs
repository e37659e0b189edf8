//! Forward-only line scanner over SSIM sources.
//!
//! Lines are read as bytes into a reused buffer so that a multi-million line
//! file is scanned without a per-line allocation, then decoded one line at a
//! time. Fixed-width padding is preserved; only the `\n` or `\r\n` terminator
//! is removed.

use crate::error::{Result, SsimError};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Sequential reader producing numbered raw lines
#[derive(Debug)]
pub struct LineScanner<R> {
    reader: R,
    source: String,
    line_number: usize,
    buffer: Vec<u8>,
}

impl LineScanner<BufReader<File>> {
    /// Open a file source; a missing or unreadable file is `SourceUnavailable`
    pub fn open(path: impl AsRef<Path>, buffer_size: usize) -> Result<Self> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let file = File::open(path).map_err(|e| SsimError::SourceUnavailable {
            path: source.clone(),
            source: e,
        })?;
        debug!("Opened SSIM source {} ({} byte buffer)", source, buffer_size);
        Ok(Self::new(BufReader::with_capacity(buffer_size, file), source))
    }
}

impl<R: Read> LineScanner<BufReader<R>> {
    /// Wrap an arbitrary stream; `source` names it in errors
    pub fn from_reader(reader: R, source: impl Into<String>, buffer_size: usize) -> Self {
        Self::new(BufReader::with_capacity(buffer_size, reader), source.into())
    }
}

impl<R: BufRead> LineScanner<R> {
    pub fn new(reader: R, source: String) -> Self {
        Self {
            reader,
            source,
            line_number: 0,
            buffer: Vec::with_capacity(256),
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source
    }

    /// Number of lines yielded so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Next line and its 1-based number, borrowing the internal buffer
    ///
    /// A line that is not valid UTF-8 fails as `UnrecognizedRecord` at that
    /// line; only I/O failures are `SourceUnavailable`.
    pub fn next_line(&mut self) -> Result<Option<(usize, &str)>> {
        self.buffer.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.buffer)
            .map_err(|e| SsimError::SourceUnavailable {
                path: self.source.clone(),
                source: e,
            })?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        let mut bytes = self.buffer.as_slice();
        if let Some(stripped) = bytes.strip_suffix(b"\n") {
            bytes = stripped.strip_suffix(b"\r").unwrap_or(stripped);
        }
        let line = std::str::from_utf8(bytes).map_err(|e| {
            let column = e.valid_up_to();
            SsimError::UnrecognizedRecord {
                line_number: self.line_number,
                leading: bytes.first().map(|b| char::from(*b)).unwrap_or(' '),
                reason: format!("invalid UTF-8 at column {}", column + 1),
            }
        })?;
        Ok(Some((self.line_number, line)))
    }
}

impl<R: BufRead> Iterator for LineScanner<R> {
    type Item = Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_line() {
            Ok(Some((number, line))) => Some(Ok((number, line.to_string()))),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_preserves_padding_and_strips_terminators() {
        let input = "3 XX   12  \r\n4 XX\n\n5 XX   ";
        let lines: Vec<(usize, String)> = LineScanner::from_reader(Cursor::new(input), "mem", 64)
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(
            lines,
            vec![
                (1, "3 XX   12  ".to_string()),
                (2, "4 XX".to_string()),
                (3, String::new()),
                (4, "5 XX   ".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let err = LineScanner::open("/definitely/not/here.ssim", 1024).unwrap_err();
        match err {
            SsimError::SourceUnavailable { path, .. } => assert!(path.contains("here.ssim")),
            other => panic!("unexpected error: {other}"),
        }
    }

    /// Test a bad byte is reported at its line, not as an unreadable source
    #[test]
    fn test_non_utf8_line_reports_line_number() {
        let bytes: &[u8] = &[b'1', b'\n', b'3', b' ', 0xff, 0xfe, b'\n', b'5', b'\n'];
        let mut scanner = LineScanner::from_reader(bytes, "bytes", 16);
        assert_eq!(scanner.next_line().unwrap(), Some((1, "1")));

        match scanner.next_line() {
            Err(SsimError::UnrecognizedRecord {
                line_number,
                leading,
                reason,
            }) => {
                assert_eq!(line_number, 2);
                assert_eq!(leading, '3');
                assert!(reason.contains("column 3"), "{reason}");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    /// Test read failures on the stream stay `SourceUnavailable`
    #[test]
    fn test_io_error_is_source_unavailable() {
        struct FailingReader;
        impl Read for FailingReader {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk went away"))
            }
        }

        let mut scanner = LineScanner::from_reader(FailingReader, "failing", 16);
        match scanner.next_line() {
            Err(SsimError::SourceUnavailable { path, .. }) => assert_eq!(path, "failing"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_reads_file_with_small_buffer() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", "1".repeat(200)).unwrap();
        writeln!(file, "{}", "2".repeat(200)).unwrap();

        let mut scanner = LineScanner::open(file.path(), 16).unwrap();
        let (number, line) = scanner.next_line().unwrap().unwrap();
        assert_eq!(number, 1);
        assert_eq!(line.len(), 200);
        let (number, _) = scanner.next_line().unwrap().unwrap();
        assert_eq!(number, 2);
        assert!(scanner.next_line().unwrap().is_none());
        assert_eq!(scanner.line_number(), 2);
    }
}
