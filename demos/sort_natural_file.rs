use std::path::{Path, PathBuf};
use anyhow::Error;
use simple_logger::SimpleLogger;
use natural_file_sort::settings::Settings;
use natural_file_sort::sort::NaturalSort;

use tikv_jemallocator::Jemalloc;
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn sort_with_defaults(input_path: &Path, output_path: &Path) -> Result<(), Error> {
    // staging store in the system temp dir, batches and pages of 10000 lines
    let natural_sort = NaturalSort::new(input_path.to_path_buf(), output_path.to_path_buf());
    natural_sort.sort()?;
    Ok(())
}

fn sort_in_small_batches(input_path: &Path, output_path: &Path, store_path: &Path) -> Result<(), Error> {
    let mut natural_sort = NaturalSort::new(input_path.to_path_buf(), output_path.to_path_buf());
    natural_sort.with_store_dir(store_path.to_path_buf());
    natural_sort.with_batch_size(2);
    natural_sort.with_page_size(3);
    natural_sort.with_max_runs(4);
    natural_sort.sort()?;
    Ok(())
}

fn sort_from_settings(input_path: &Path, output_path: &Path, store_path: &Path) -> Result<(), Error> {
    let settings = Settings {
        input_file_path: input_path.to_path_buf(),
        output_file_path: output_path.to_path_buf(),
        store_path: Some(store_path.to_path_buf()),
        database_path: None,
        batch_size: 5,
        page_size: None,
        max_runs: None,
        log_level: "info".to_string(),
    };
    settings.natural_sort().sort()?;
    Ok(())
}

// cargo run -r --example sort_natural_file
pub fn main() -> Result<(), Error> {
    SimpleLogger::new().init().unwrap();
    let input_path = PathBuf::from("./tests/fixtures/mixed.txt");
    let defaults_path = PathBuf::from("./target/mixed-defaults.txt");
    let small_batches_path = PathBuf::from("./target/mixed-small-batches.txt");
    let settings_path = PathBuf::from("./target/mixed-settings.txt");
    let store_path = PathBuf::from("./target/staging");

    sort_with_defaults(&input_path, &defaults_path)?;
    sort_in_small_batches(&input_path, &small_batches_path, &store_path)?;
    sort_from_settings(&input_path, &settings_path, &store_path)?;

    Ok(())
}
