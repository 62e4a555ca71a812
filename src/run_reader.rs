use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::line_record::LineRecord;

/// Sequential reader over one run file, holding the smallest record not yet consumed.
#[derive(Debug)]
pub(crate) struct RunReader {
    path: PathBuf,
    reader: BufReader<File>,
    head: Option<LineRecord>,
    buf: String,
}

impl RunReader {
    pub(crate) fn open(path: &Path) -> Result<RunReader, anyhow::Error> {
        let file = File::open(path).with_context(|| format!("path: {}", path.to_string_lossy()))?;
        let mut run_reader = RunReader {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            head: None,
            buf: String::new(),
        };
        run_reader.head = run_reader.read_record()?;
        Ok(run_reader)
    }

    fn read_record(&mut self) -> Result<Option<LineRecord>, anyhow::Error> {
        self.buf.clear();
        let bytes = self.reader.read_line(&mut self.buf)
            .with_context(|| format!("path: {}", self.path.to_string_lossy()))?;
        if bytes == 0 {
            return Ok(None);
        }
        let encoded = self.buf.strip_suffix('\n').unwrap_or(self.buf.as_str());
        let record = LineRecord::decode(encoded)
            .with_context(|| format!("path: {}", self.path.to_string_lossy()))?;
        Ok(Some(record))
    }

    /// Take the head record and advance to the next one.
    pub(crate) fn line_record(&mut self) -> Result<Option<LineRecord>, anyhow::Error> {
        let next = self.read_record()?;
        Ok(std::mem::replace(&mut self.head, next))
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.head.is_none()
    }
}

impl Eq for RunReader {}

impl PartialEq<Self> for RunReader {
    fn eq(&self, other: &Self) -> bool {
        self.head.eq(&other.head)
    }
}

impl PartialOrd<Self> for RunReader {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RunReader {
    fn cmp(&self, other: &Self) -> Ordering {
        // flipped to work with BinaryHeap (Max Heap), exhausted readers pop first
        other.head.cmp(&self.head)
    }
}
