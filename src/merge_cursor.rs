use std::collections::BinaryHeap;

use crate::line_record::LineRecord;
use crate::run_reader::RunReader;
use crate::sorted_run::SortedRun;

/// K-way merge over the run files of a store, yielding records in natural order.
///
/// One file handle and one record per non exhausted run are held at a time.
pub(crate) struct MergeCursor {
    readers: BinaryHeap<RunReader>,
    position: usize,
}

impl MergeCursor {
    pub(crate) fn new(runs: &[SortedRun]) -> Result<MergeCursor, anyhow::Error> {
        let mut readers = BinaryHeap::with_capacity(runs.len());
        for run in runs {
            let reader = RunReader::open(run.path())?;
            if !reader.is_exhausted() {
                readers.push(reader);
            }
        }
        Ok(
            MergeCursor {
                readers,
                position: 0,
            }
        )
    }

    /// Number of records consumed so far.
    pub(crate) fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn next_record(&mut self) -> Result<Option<LineRecord>, anyhow::Error> {
        match self.readers.pop() {
            None => Ok(None),
            Some(mut current_min) => {
                let line_record = current_min.line_record()?;
                if !current_min.is_exhausted() {
                    self.readers.push(current_min);
                }
                if line_record.is_some() {
                    self.position += 1;
                }
                Ok(line_record)
            }
        }
    }

    /// Skip up to `n` records, returns the number actually skipped.
    pub(crate) fn skip(&mut self, n: usize) -> Result<usize, anyhow::Error> {
        let mut skipped = 0;
        while skipped < n && self.next_record()?.is_some() {
            skipped += 1;
        }
        Ok(skipped)
    }
}
