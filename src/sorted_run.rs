use std::cmp::Ordering;
use std::path::PathBuf;

/// A run file of the staging store. Records in a run are in natural order.
#[derive(Debug)]
pub(crate) struct SortedRun {
    path: PathBuf,
    records: usize,
}

impl SortedRun {
    pub(crate) fn new(path: PathBuf, records: usize) -> SortedRun {
        SortedRun {
            path,
            records,
        }
    }

    pub(crate) fn path(&self) -> &PathBuf {
        &self.path
    }

    pub(crate) fn records(&self) -> usize {
        self.records
    }
}

impl Eq for SortedRun {}

impl PartialEq<Self> for SortedRun {
    fn eq(&self, other: &Self) -> bool {
        self.records.eq(&other.records)
    }
}

impl PartialOrd<Self> for SortedRun {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortedRun {
    fn cmp(&self, other: &Self) -> Ordering {
        self.records.cmp(&other.records)
    }
}
