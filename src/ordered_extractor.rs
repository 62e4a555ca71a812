use std::io::Write;

use anyhow::{anyhow, Context};

use crate::staging_store::StagingStore;

/// Writes the content of a [StagingStore] in natural order, one page at a time.
pub struct OrderedExtractor {
    page_size: usize,
}

impl OrderedExtractor {
    pub fn new(page_size: usize) -> Result<OrderedExtractor, anyhow::Error> {
        if page_size == 0 {
            return Err(anyhow!("Page size must be positive"));
        }
        Ok(
            OrderedExtractor {
                page_size,
            }
        )
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Write every record of `store` to `writer` and return the number of lines written.
    ///
    /// Each line is trimmed and terminated with a single "\n". The writer is not flushed.
    pub fn extract<W: Write>(&self, store: &mut StagingStore, writer: &mut W) -> Result<usize, anyhow::Error> {
        let mut written = 0;
        let mut page_index = 0;
        loop {
            let offset = page_index * self.page_size;
            let page = store.page(self.page_size, offset)
                .with_context(|| format!("Failed to read page {}, offset: {}", page_index, offset))?;
            if page.is_empty() {
                break;
            }
            for line in &page {
                writeln!(writer, "{}", line.trim())
                    .with_context(|| format!("Failed to write line {}", written + 1))?;
                written += 1;
            }
            log::debug!("Extracted page {}, {} lines", page_index, page.len());
            page_index += 1;
        }
        log::info!("Extracted {} lines in {} pages", written, page_index);
        Ok(written)
    }
}
