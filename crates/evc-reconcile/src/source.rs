use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

use crate::{Event, RECORD_SEPARATOR};

/// Outcome of a single `readline` against a stream.
pub(crate) enum Line {
    Eof,
    Blank,
    Event(Event),
}

/// One observer's captured events, read front to back exactly once.
pub struct CandidateStream {
    name: String,
    reader: Box<dyn BufRead>,
}

impl CandidateStream {
    pub fn new(name: impl Into<String>, reader: impl BufRead + 'static) -> Self {
        Self {
            name: name.into(),
            reader: Box::new(reader),
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(name, Cursor::new(bytes.into()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn next_line(&mut self, buf: &mut Vec<u8>) -> io::Result<Line> {
        buf.clear();
        if self.reader.read_until(RECORD_SEPARATOR, buf)? == 0 {
            return Ok(Line::Eof);
        }
        Ok(match Event::from_line(std::mem::take(buf)) {
            Some(ev) => Line::Event(ev),
            None => Line::Blank,
        })
    }
}

impl std::fmt::Debug for CandidateStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandidateStream")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Anything that can hand out a fresh [`CandidateStream`] positioned at its
/// start. Opening twice yields two independent streams over the same data.
pub trait CandidateSource {
    fn name(&self) -> String;

    fn open(&self) -> io::Result<CandidateStream>;
}

/// Capture file on disk.
#[derive(Clone, Debug)]
pub struct FileSource {
    name: String,
    path: PathBuf,
}

impl FileSource {
    /// Source named after its path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            path,
        }
    }

    pub fn named(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CandidateSource for FileSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn open(&self) -> io::Result<CandidateStream> {
        let file = File::open(&self.path)?;
        Ok(CandidateStream::new(self.name.clone(), BufReader::new(file)))
    }
}

/// Capture already held in memory.
#[derive(Clone, Debug)]
pub struct BytesSource {
    name: String,
    bytes: Vec<u8>,
}

impl BytesSource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl CandidateSource for BytesSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn open(&self) -> io::Result<CandidateStream> {
        Ok(CandidateStream::from_bytes(self.name.clone(), self.bytes.clone()))
    }
}
