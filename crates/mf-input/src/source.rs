//! Sequential line reader with position tracking.
//!
//! Legacy input is consumed strictly in order, one record per line.  A
//! `LineSource` hands out lines with trailing `\r\n` removed and remembers
//! the 1-based number of the line last returned so errors can point at it.
//! Bytes that are not valid UTF-8 (old headings often carry Latin-1 text)
//! are replaced rather than rejected.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use crate::{InputError, InputResult, Location};

pub struct LineSource {
    name:    String,
    reader:  Box<dyn BufRead>,
    line_no: usize,
    buf:     Vec<u8>,
}

impl LineSource {
    /// Open a file for sequential reading.
    pub fn open(path: &Path) -> InputResult<Self> {
        let file = File::open(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_reader(path.display().to_string(), BufReader::new(file)))
    }

    /// Wrap any buffered reader.  `name` is used in error locations.
    pub fn from_reader<R: BufRead + 'static>(name: impl Into<String>, reader: R) -> Self {
        Self {
            name:    name.into(),
            reader:  Box::new(reader),
            line_no: 0,
            buf:     Vec::with_capacity(128),
        }
    }

    /// Read from an in-memory string.  Handy for tests and embedded fixtures.
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self::from_reader(name, Cursor::new(text.to_owned()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of the line most recently returned (0 before the first read).
    pub fn line_number(&self) -> usize {
        self.line_no
    }

    /// Location of the line most recently returned.
    pub fn location(&self) -> Location {
        Location { file: self.name.clone(), line: self.line_no }
    }

    /// Next line, or `None` at end of file.
    pub fn try_next_line(&mut self) -> InputResult<Option<String>> {
        self.buf.clear();
        let n = self.reader.read_until(b'\n', &mut self.buf).map_err(|source| InputError::Io {
            path: self.name.clone().into(),
            source,
        })?;
        if n == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        while matches!(self.buf.last(), Some(b'\n' | b'\r')) {
            self.buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }

    /// Next line; end of file is an error naming `what` was being read.
    pub fn next_line(&mut self, what: &str) -> InputResult<String> {
        match self.try_next_line()? {
            Some(line) => Ok(line),
            None => Err(InputError::UnexpectedEof {
                at:   Location { file: self.name.clone(), line: self.line_no + 1 },
                what: what.to_owned(),
            }),
        }
    }
}

impl std::fmt::Debug for LineSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineSource")
            .field("name", &self.name)
            .field("line_no", &self.line_no)
            .finish_non_exhaustive()
    }
}
