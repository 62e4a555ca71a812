use std::cmp::max;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use tempfile::{Builder, NamedTempFile};

use crate::line_record::LineRecord;
use crate::merge_cursor::MergeCursor;
use crate::sorted_run::SortedRun;

/// Lifecycle phase of a [StagingStore].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StorePhase {
    /// Accepting appends
    Loading,
    /// Sealed, serving pages
    Extracting,
    /// No operation is valid
    Closed,
}

/// Disk backed staging area for the lines of a single sort run.
///
/// The store is a directory of run files. Every appended batch is sorted in memory and written as
/// one run, reading pages is a k-way merge over the runs. Nothing is synced to disk, the store is
/// not meant to survive a crash or to be shared with another process.
///
/// The store moves through [StorePhase::Loading], [StorePhase::Extracting] and
/// [StorePhase::Closed]. Appends are accepted only while loading, the first page seals the store
/// and any operation after close fails.
///
/// # Examples
/// ```
/// use natural_file_sort::staging_store::StagingStore;
///
/// fn sorted_lines(store_dir: std::path::PathBuf) -> Result<Vec<String>, anyhow::Error> {
///     let mut store = StagingStore::initialize(store_dir)?;
///     store.append(vec!["2 b".to_string(), "b".to_string()])?;
///     store.append(vec!["10 a".to_string()])?;
///     let lines = store.page(10, 0)?;
///     store.close()?;
///     Ok(lines)
/// }
/// ```
pub struct StagingStore {
    path: PathBuf,
    max_runs: usize,
    phase: StorePhase,
    runs: Vec<SortedRun>,
    next_id: u64,
    records: usize,
    cursor: Option<MergeCursor>,
}

impl StagingStore {
    /// Maximal number of run files kept before the smallest of them are compacted
    pub const DEFAULT_MAX_RUNS: usize = 1024;

    /// File that marks a directory as a staging store
    pub const MARKER: &'static str = ".natural-file-sort-store";

    /// Create a fresh, empty store at `path`.
    ///
    /// A missing or empty directory becomes a new store. A directory holding a previous store, as
    /// identified by its [StagingStore::MARKER] file, is emptied of its run files. Anything else at
    /// `path` is refused and left untouched.
    pub fn initialize(path: impl Into<PathBuf>) -> Result<StagingStore, anyhow::Error> {
        Self::initialize_with_max_runs(path, Self::DEFAULT_MAX_RUNS)
    }

    /// Create a fresh store that compacts its runs whenever there are more than `max_runs`.
    pub fn initialize_with_max_runs(path: impl Into<PathBuf>, max_runs: usize) -> Result<StagingStore, anyhow::Error> {
        let path = path.into();
        if max_runs == 0 {
            return Err(anyhow!("Staging store max runs must be positive"));
        }

        let marker = path.join(Self::MARKER);
        if path.is_dir() {
            if marker.is_file() {
                Self::remove_run_files(&path)?;
            } else if fs::read_dir(&path)
                .with_context(|| format!("Read staging store: {}", path.to_string_lossy()))?
                .next()
                .is_some() {
                return Err(
                    anyhow!("Refusing to use {} as staging store, it is not empty and not a staging store", path.to_string_lossy())
                );
            }
        } else if path.exists() {
            return Err(anyhow!("Refusing to use {} as staging store, it is not a directory", path.to_string_lossy()));
        } else {
            fs::create_dir_all(&path)
                .with_context(|| format!("Create staging store: {}", path.to_string_lossy()))?;
        }
        fs::write(&marker, "")
            .with_context(|| format!("Create staging store marker: {}", marker.to_string_lossy()))?;
        log::info!("Initialized staging store at {}", path.to_string_lossy());

        Ok(
            StagingStore {
                path,
                max_runs,
                phase: StorePhase::Loading,
                runs: Vec::new(),
                next_id: 1,
                records: 0,
                cursor: None,
            }
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn phase(&self) -> StorePhase {
        self.phase
    }

    /// Number of records in the store
    pub fn len(&self) -> usize {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    /// Number of run files currently backing the store
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Append a batch of lines, each becoming a record with the next id.
    ///
    /// The batch becomes visible as a whole once its run file is persisted. On error no record
    /// of the batch is visible.
    pub fn append(&mut self, lines: Vec<String>) -> Result<(), anyhow::Error> {
        self.require_phase(StorePhase::Loading, "append")?;
        if lines.is_empty() {
            return Ok(());
        }

        let first_id = self.next_id;
        let mut batch: Vec<LineRecord> = lines.into_iter()
            .zip(first_id..)
            .map(|(line, id)| LineRecord::new(id, line))
            .collect();
        batch.sort_unstable();

        let count = batch.len();
        let mut tmp_file = self.create_run_file()?;
        {
            let mut writer = BufWriter::new(tmp_file.as_file_mut());
            for line_record in &batch {
                line_record.encode(&mut writer)?;
            }
            writer.flush()?;
        }
        let run = Self::persist_run(tmp_file, count)?;
        log::debug!("Appended {} records, ids {}..={}, run: {}", count, first_id, first_id + count as u64 - 1, run.path().to_string_lossy());

        self.runs.push(run);
        self.next_id += count as u64;
        self.records += count;

        if self.runs.len() > self.max_runs {
            self.compact()?;
        }
        Ok(())
    }

    /// Return up to `limit` lines in natural order, skipping the first `offset`.
    ///
    /// The first call seals the store. Consecutive pages continue the running merge, any other
    /// offset restarts or skips ahead so the result only depends on `limit` and `offset`.
    pub fn page(&mut self, limit: usize, offset: usize) -> Result<Vec<String>, anyhow::Error> {
        match self.phase {
            StorePhase::Closed => {
                return Err(anyhow!("Cannot page staging store {} in {:?} phase", self.path.to_string_lossy(), self.phase));
            }
            StorePhase::Loading => {
                log::info!("Sealing staging store with {} records in {} runs", self.records, self.runs.len());
                self.phase = StorePhase::Extracting;
            }
            StorePhase::Extracting => {}
        }

        let mut cursor = match self.cursor.take() {
            Some(cursor) if cursor.position() <= offset => cursor,
            _ => MergeCursor::new(&self.runs)?,
        };
        let position = cursor.position();
        cursor.skip(offset - position)?;

        let mut page = Vec::with_capacity(limit.min(self.records));
        while page.len() < limit {
            match cursor.next_record()? {
                Some(line_record) => page.push(line_record.line()),
                None => break,
            }
        }
        self.cursor = Some(cursor);
        log::debug!("Page offset: {}, limit: {}, lines: {}", offset, limit, page.len());
        Ok(page)
    }

    /// Release open run files. Any further operation on the store fails.
    pub fn close(&mut self) -> Result<(), anyhow::Error> {
        if self.phase == StorePhase::Closed {
            return Err(anyhow!("Staging store {} is already closed", self.path.to_string_lossy()));
        }
        self.cursor = None;
        self.phase = StorePhase::Closed;
        log::info!("Closed staging store at {}", self.path.to_string_lossy());
        Ok(())
    }

    fn require_phase(&self, phase: StorePhase, operation: &str) -> Result<(), anyhow::Error> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(anyhow!("Cannot {} staging store {} in {:?} phase", operation, self.path.to_string_lossy(), self.phase))
        }
    }

    fn create_run_file(&self) -> Result<NamedTempFile, anyhow::Error> {
        Builder::new()
            .prefix("run-")
            .suffix(".staged")
            .tempfile_in(&self.path)
            .with_context(|| format!("Failed to create run file in {}", self.path.to_string_lossy()))
    }

    fn persist_run(tmp_file: NamedTempFile, records: usize) -> Result<SortedRun, anyhow::Error> {
        let (_file, path) = tmp_file
            .keep()
            .map_err(|e| anyhow!("Failed to persist run file: {}", e))?;
        Ok(SortedRun::new(path, records))
    }

    fn is_run_file(name: &str) -> bool {
        name.starts_with("run-") && name.ends_with(".staged")
    }

    fn remove_run_files(path: &Path) -> Result<(), anyhow::Error> {
        let entries = fs::read_dir(path)
            .with_context(|| format!("Read staging store: {}", path.to_string_lossy()))?;
        for entry in entries {
            let entry = entry?;
            if entry.file_name().to_str().is_some_and(Self::is_run_file) {
                fs::remove_file(entry.path())
                    .with_context(|| format!("Remove previous run: {}", entry.path().to_string_lossy()))?;
            }
        }
        Ok(())
    }

    /// Remove run files already merged into another run. A file that cannot be removed is only
    /// reported, its records are served by the merged run.
    fn remove_compacted_runs(runs: Vec<SortedRun>) {
        for run in runs {
            if let Err(e) = fs::remove_file(run.path()) {
                log::warn!("Failed to remove compacted run {}: {}", run.path().to_string_lossy(), e);
            }
        }
    }

    /// Merge the smaller half of the runs into one run.
    fn compact(&mut self) -> Result<(), anyhow::Error> {
        self.runs.sort();
        let count = max(2, (self.runs.len() + 1) / 2);
        let larger = self.runs.split_off(count);
        let smaller = std::mem::replace(&mut self.runs, larger);
        log::info!("Compacting {} of {} runs of staging store {}", smaller.len(), smaller.len() + self.runs.len(), self.path.to_string_lossy());

        let merged = match self.merge_runs(&smaller) {
            Ok(merged) => merged,
            Err(e) => {
                self.runs.extend(smaller);
                return Err(e);
            }
        };
        log::info!("Compacted {} runs into one run of {} records", smaller.len(), merged.records());
        self.runs.push(merged);
        Self::remove_compacted_runs(smaller);
        Ok(())
    }

    fn merge_runs(&self, runs: &[SortedRun]) -> Result<SortedRun, anyhow::Error> {
        let mut cursor = MergeCursor::new(runs)?;
        let mut tmp_file = self.create_run_file()?;
        let mut count = 0;
        {
            let mut writer = BufWriter::new(tmp_file.as_file_mut());
            while let Some(line_record) = cursor.next_record()? {
                line_record.encode(&mut writer)?;
                count += 1;
            }
            writer.flush()?;
        }
        drop(cursor);
        Self::persist_run(tmp_file, count)
    }
}
