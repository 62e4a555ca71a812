//! This crate sorts large text files in natural order without holding the file in memory.
//!
//! Natural order places every line that starts with an ASCII digit before all other lines. Digit
//! leading lines are ordered by the integer value of their leading digits, so "2 apple" comes
//! before "10 banana". Ties, and all lines that do not start with a digit, are ordered by the
//! complete line.
//!
//! The sort runs in two strictly separated phases. The [batch_loader::BatchLoader] reads the input
//! in batches of lines and appends each batch to a [staging_store::StagingStore], a disk backed
//! set of sorted run files. The [ordered_extractor::OrderedExtractor] then reads the store back in
//! pages, in natural order, and writes the trimmed lines to the output. Peak memory is bounded by
//! one batch during loading and by one page plus one line per run during extraction.
//!
//! # Examples
//! ```
//! use std::path::PathBuf;
//! use natural_file_sort::sort::NaturalSort;
//!
//! fn sort_lines(input: PathBuf, output: PathBuf, store: PathBuf) -> Result<(), anyhow::Error> {
//!     let mut natural_sort = NaturalSort::new(input, output);
//!
//!     // location of the staging store. The default is a directory in std::env::temp_dir(),
//!     // for large files it is recommended to use a dedicated location with enough free space.
//!     natural_sort.with_store_dir(store);
//!
//!     // lines loaded per batch and fetched per page
//!     natural_sort.with_batch_size(100_000);
//!     natural_sort.with_page_size(10_000);
//!
//!     natural_sort.sort()
//! }
//! ```
//!

pub(crate) mod config;
pub(crate) mod line_record;
pub(crate) mod merge_cursor;
pub(crate) mod run_reader;
pub(crate) mod sorted_run;

pub mod batch_loader;
pub mod natural_key;
pub mod ordered_extractor;
pub mod settings;
pub mod sort;
pub mod staging_store;
