//! DXF ASCII text reader

use super::stream_reader::{DxfCodePair, DxfStreamReader};
use crate::error::{DxfError, Result};
use encoding_rs::Encoding;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};

/// DXF ASCII text file reader
pub struct DxfTextReader<R: Read + Seek> {
    reader: BufReader<R>,
    line_number: usize,
    pushed_back: Vec<DxfCodePair>,
    line: Vec<u8>,
    /// Non-UTF8 fallback encoding.  `None` means use Latin-1 (byte-to-char).
    encoding: Option<&'static Encoding>,
}

impl<R: Read + Seek> DxfTextReader<R> {
    /// Create a new DXF text reader
    pub fn new(reader: BufReader<R>) -> Self {
        Self {
            reader,
            line_number: 0,
            pushed_back: Vec::new(),
            line: Vec::with_capacity(128),
            encoding: None,
        }
    }

    /// Read a single trimmed line, handling non-UTF8 bytes gracefully
    fn read_line(&mut self) -> Result<Option<String>> {
        self.line.clear();
        if self.reader.read_until(b'\n', &mut self.line)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        let line = match std::str::from_utf8(&self.line) {
            Ok(s) => s.to_string(),
            Err(_) => match self.encoding {
                Some(enc) => enc.decode(&self.line).0.into_owned(),
                // Latin-1 is a 1:1 mapping of bytes 0-255 to Unicode code points
                None => self.line.iter().map(|&b| b as char).collect(),
            },
        };

        Ok(Some(line.trim().to_string()))
    }

    fn read_pair_internal(&mut self) -> Result<Option<DxfCodePair>> {
        // Blank lines between pairs are tolerated, blank values are not skipped
        let code_line = loop {
            match self.read_line()? {
                Some(line) if line.is_empty() => continue,
                Some(line) => break line,
                None => return Ok(None),
            }
        };

        let code = code_line.parse::<i32>().map_err(|_| {
            DxfError::Parse(format!(
                "Invalid DXF code at line {}: '{}'",
                self.line_number, code_line
            ))
        })?;

        let value_line = self.read_line()?.ok_or_else(|| {
            DxfError::Parse(format!(
                "Unexpected EOF after code {} at line {}",
                code, self.line_number
            ))
        })?;

        Ok(Some(DxfCodePair::new(code, unescape(&value_line))))
    }
}

/// Expand the caret escapes used in DXF strings
fn unescape(value: &str) -> String {
    if !value.contains('^') {
        return value.to_string();
    }
    value
        .replace("^J", "\n")
        .replace("^M", "\r")
        .replace("^I", "\t")
        .replace("^ ", "^")
}

impl<R: Read + Seek> DxfStreamReader for DxfTextReader<R> {
    fn read_pair(&mut self) -> Result<Option<DxfCodePair>> {
        if let Some(pair) = self.pushed_back.pop() {
            return Ok(Some(pair));
        }
        self.read_pair_internal()
    }

    fn push_back(&mut self, pair: DxfCodePair) {
        self.pushed_back.push(pair);
    }

    fn reset(&mut self) -> Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        self.line_number = 0;
        self.pushed_back.clear();
        Ok(())
    }

    fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = Some(encoding);
    }
}
