use std::path::PathBuf;

use anyhow::anyhow;

#[derive(Clone, Debug)]
pub(crate) struct Config {
    input: PathBuf,
    output: PathBuf,
    store_dir: PathBuf,
    batch_size: usize,
    page_size: usize,
    max_runs: usize,
}

impl Config {
    pub(crate) fn new(
        input: PathBuf,
        output: PathBuf,
        store_dir: PathBuf,
        batch_size: usize,
        page_size: usize,
        max_runs: usize,
    ) -> Result<Config, anyhow::Error> {
        if batch_size == 0 {
            return Err(anyhow!("Batch size must be positive"));
        }
        if page_size == 0 {
            return Err(anyhow!("Page size must be positive"));
        }
        if max_runs == 0 {
            return Err(anyhow!("Max runs must be positive"));
        }
        Ok(
            Config {
                input,
                output,
                store_dir,
                batch_size,
                page_size,
                max_runs,
            }
        )
    }

    pub(crate) fn input(&self) -> &PathBuf {
        &self.input
    }

    pub(crate) fn output(&self) -> &PathBuf {
        &self.output
    }

    pub(crate) fn store_dir(&self) -> &PathBuf {
        &self.store_dir
    }

    pub(crate) fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub(crate) fn page_size(&self) -> usize {
        self.page_size
    }

    pub(crate) fn max_runs(&self) -> usize {
        self.max_runs
    }

    pub(crate) fn with_max_runs(self, max_runs: usize) -> Config {
        Config {
            max_runs,
            ..self
        }
    }
}
