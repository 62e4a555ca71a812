use std::io::BufRead;

use anyhow::{anyhow, Context};

use crate::staging_store::StagingStore;

/// Counts of a finished load.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LoadSummary {
    /// Lines read from the source and appended to the store
    pub lines: usize,
    /// Batches appended to the store
    pub batches: usize,
}

/// Reads a line source in batches and appends each batch to a [StagingStore].
pub struct BatchLoader {
    batch_size: usize,
}

impl BatchLoader {
    pub fn new(batch_size: usize) -> Result<BatchLoader, anyhow::Error> {
        if batch_size == 0 {
            return Err(anyhow!("Batch size must be positive"));
        }
        Ok(
            BatchLoader {
                batch_size,
            }
        )
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Load every line of `reader` into `store`.
    ///
    /// Every line is trimmed of surrounding whitespace, line terminator included, so a line is
    /// ordered by the same text that is written out. A read error, including invalid UTF-8,
    /// fails the load. Batches appended before the error stay in the store.
    pub fn load<R: BufRead>(&self, reader: &mut R, store: &mut StagingStore) -> Result<LoadSummary, anyhow::Error> {
        let mut summary = LoadSummary::default();
        loop {
            let batch = self.read_batch(reader)
                .with_context(|| format!("Failed to read batch {} after line {}", summary.batches + 1, summary.lines))?;
            if batch.is_empty() {
                break;
            }
            let size = batch.len();
            store.append(batch)
                .with_context(|| format!("Failed to append batch {}", summary.batches + 1))?;
            summary.lines += size;
            summary.batches += 1;
            log::debug!("Loaded batch {}, {} lines", summary.batches, size);
        }
        log::info!("Loaded {} lines in {} batches", summary.lines, summary.batches);
        Ok(summary)
    }

    fn read_batch<R: BufRead>(&self, reader: &mut R) -> Result<Vec<String>, anyhow::Error> {
        let mut batch = Vec::with_capacity(self.batch_size);
        while batch.len() < self.batch_size {
            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            let trimmed = line.trim();
            if trimmed.len() == line.len() {
                batch.push(line);
            } else {
                batch.push(trimmed.to_string());
            }
        }
        Ok(batch)
    }
}
