use std::cmp::{max, min, Ordering};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use rlimit::{getrlimit, Resource, setrlimit};
use tempfile::TempDir;

use crate::batch_loader::BatchLoader;
use crate::config::Config;
use crate::natural_key::natural_cmp;
use crate::ordered_extractor::OrderedExtractor;
use crate::staging_store::StagingStore;

/// Sort a text file in natural order
///
/// # Examples
/// ```
/// use std::path::PathBuf;
/// use natural_file_sort::sort::NaturalSort;
///
/// fn sort_lines(input: PathBuf, output: PathBuf, store: PathBuf) -> Result<(), anyhow::Error> {
///     let mut natural_sort = NaturalSort::new(input, output);
///     // the staging store is recreated on every run, use a dedicated location
///     natural_sort.with_store_dir(store);
///     // lines read and committed together, also the number of lines fetched per page
///     natural_sort.with_batch_size(50_000);
///     natural_sort.sort()
/// }
/// ```
pub struct NaturalSort {
    input: PathBuf,
    output: PathBuf,
    store_dir: Option<PathBuf>,
    batch_size: usize,
    page_size: Option<usize>,
    max_runs: usize,
}

impl NaturalSort {
    /// Create a default NaturalSort definition.
    ///
    /// * the staging store is a fresh directory in the system temporary directory as defined by
    ///   std::env::temp_dir(), removed when the sort ends
    /// * batch size is 10000 lines
    /// * page size is equal to the batch size
    /// * max runs of the staging store is [StagingStore::DEFAULT_MAX_RUNS]
    ///
    /// The sort will increase the file descriptor rlimit to accommodate the staging store runs
    /// and restore it when done.
    pub fn new(input: PathBuf, output: PathBuf) -> NaturalSort {
        NaturalSort {
            input,
            output,
            store_dir: None,
            batch_size: 10_000,
            page_size: None,
            max_runs: StagingStore::DEFAULT_MAX_RUNS,
        }
    }

    /// Set the staging store location. The path must be missing, an empty directory or a staging
    /// store left by an earlier sort, whose runs are removed when the sort starts.
    pub fn with_store_dir(&mut self, store_dir: PathBuf) {
        self.store_dir = Some(store_dir);
    }

    /// Set the number of lines loaded into the staging store at once. The default is 10000
    pub fn with_batch_size(&mut self, batch_size: usize) {
        self.batch_size = batch_size;
    }

    /// Set the number of lines fetched from the staging store at once. Defaults to the batch size
    pub fn with_page_size(&mut self, page_size: usize) {
        self.page_size = Some(page_size);
    }

    /// Set the number of run files the staging store keeps before compacting them
    pub fn with_max_runs(&mut self, max_runs: usize) {
        self.max_runs = max_runs;
    }

    /// Sort the input file into the output file
    pub fn sort(&self) -> Result<(), anyhow::Error> {
        let (store_dir, temp_store) = self.store_location()?;
        let config = self.create_config(store_dir)?;
        let (current_soft, current_hard) = Self::get_rlimits()?;
        log::info!("Current rlimit NOFILE, soft: {}, hard: {}", current_soft, current_hard);
        let max_runs = Self::fit_max_runs(config.max_runs(), current_hard);
        if max_runs < config.max_runs() {
            log::warn!(
                "Hard rlimit NOFILE {} is too low for {} runs, limit the staging store to {} runs",
                current_hard, config.max_runs(), max_runs,
            );
        }
        let config = config.with_max_runs(max_runs);
        let new_soft = min(max((max_runs as u64).saturating_add(Self::RESERVED_FILES), current_soft), current_hard);
        log::info!("Set new rlimit NOFILE, soft: {}, hard: {}", new_soft, current_hard);
        Self::set_rlimits(new_soft, current_hard)?;
        let result = Self::internal_sort(&config);
        log::info!("Restore rlimit NOFILE, soft: {}, hard: {}", current_soft, current_hard);
        let restored = Self::set_rlimits(current_soft, current_hard);
        drop(temp_store);
        result?;
        restored
    }

    /// Check whether the input file is in natural order
    pub fn check(&self) -> Result<bool, anyhow::Error> {
        Self::internal_check(&self.input)
    }

    /// The store directory and, when none was set, the temporary directory holding it
    pub(crate) fn store_location(&self) -> Result<(PathBuf, Option<TempDir>), anyhow::Error> {
        match &self.store_dir {
            Some(store_dir) => Ok((store_dir.clone(), None)),
            None => {
                let temp_store = tempfile::Builder::new()
                    .prefix("natural-file-sort-")
                    .tempdir()
                    .with_context(|| "Failed to create a temporary staging store")?;
                Ok((temp_store.path().to_path_buf(), Some(temp_store)))
            }
        }
    }

    /// File descriptors kept free of the staging store runs
    const RESERVED_FILES: u64 = 256;

    pub(crate) fn fit_max_runs(max_runs: usize, hard: u64) -> usize {
        let available = usize::try_from(hard.saturating_sub(Self::RESERVED_FILES)).unwrap_or(usize::MAX);
        max(min(max_runs, available), 1)
    }

    fn get_rlimits() -> Result<(u64, u64), anyhow::Error> {
        getrlimit(Resource::NOFILE).with_context(|| "getrlimit")
    }

    fn set_rlimits(soft: u64, hard: u64) -> Result<(), anyhow::Error> {
        setrlimit(Resource::NOFILE, soft, hard)
            .with_context(|| format!("set rlimit NOFILE, soft: {}, hard: {}", soft, hard))?;
        Ok(())
    }

    fn create_config(&self, store_dir: PathBuf) -> Result<Config, anyhow::Error> {
        Config::new(
            self.input.clone(),
            self.output.clone(),
            store_dir,
            self.batch_size,
            self.page_size.unwrap_or(self.batch_size),
            self.max_runs,
        )
    }

    pub(crate) fn internal_check(path: &PathBuf) -> Result<bool, anyhow::Error> {
        let reader = BufReader::new(
            File::open(path).with_context(|| format!("path: {}", path.to_string_lossy()))?
        );
        let mut previous: Option<String> = None;
        for line in reader.lines() {
            let line = line.with_context(|| format!("path: {}", path.to_string_lossy()))?;
            if let Some(previous_line) = &previous {
                if natural_cmp(previous_line, &line) == Ordering::Greater {
                    return Ok(false);
                }
            }
            previous = Some(line);
        }
        Ok(true)
    }

    fn internal_sort(config: &Config) -> Result<(), anyhow::Error> {
        log::info!("Start natural sort of {}", config.input().to_string_lossy());
        let mut store = StagingStore::initialize_with_max_runs(config.store_dir(), config.max_runs())
            .with_context(|| anyhow!("Failed to initialize staging store: {}", config.store_dir().to_string_lossy()))?;
        let result = Self::load_and_extract(config, &mut store);
        let closed = store.close();
        result?;
        closed?;
        log::info!("Finish natural sort, output: {}", config.output().to_string_lossy());
        Ok(())
    }

    fn load_and_extract(config: &Config, store: &mut StagingStore) -> Result<(), anyhow::Error> {
        let input = File::open(config.input())
            .with_context(|| anyhow!("Load phase failed, cannot open input: {}", config.input().to_string_lossy()))?;
        let mut reader = BufReader::new(input);
        let summary = BatchLoader::new(config.batch_size())?
            .load(&mut reader, store)
            .with_context(|| anyhow!("Load phase failed, input: {}", config.input().to_string_lossy()))?;
        drop(reader);

        let output = File::create(config.output())
            .with_context(|| anyhow!("Extract phase failed, cannot create output: {}", config.output().to_string_lossy()))?;
        let mut writer = BufWriter::new(output);
        let written = OrderedExtractor::new(config.page_size())?
            .extract(store, &mut writer)
            .and_then(|written| {
                writer.flush()?;
                Ok(written)
            })
            .with_context(|| anyhow!("Extract phase failed, output: {}", config.output().to_string_lossy()))?;

        if written != summary.lines {
            return Err(
                anyhow!("Extract phase failed, loaded {} lines but wrote {}", summary.lines, written)
            );
        }
        Ok(())
    }
}
