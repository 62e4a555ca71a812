use std::fs;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

use data_encoding::HEXLOWER;
use rand::Rng;
use natural_file_sort::sort::NaturalSort;

pub fn setup() {
    let results_dir_path = PathBuf::from_str("./target/results/").unwrap();

    if !results_dir_path.exists() {
        fs::create_dir_all(&results_dir_path).unwrap_or_else(|_|
            panic!("Failed to create results directory: {:?}", results_dir_path)
        );
    } else {
        println!("Results directory exists at {:?}", results_dir_path);
    }
}

#[allow(dead_code)]
pub fn read_lines(path: PathBuf) -> Result<Vec<String>, anyhow::Error> {
    let reader = BufReader::new(File::open(path)?);
    let lines = reader.lines().map(|x| x.unwrap()).collect();
    Ok(lines)
}

#[allow(dead_code)]
pub fn write_lines(path: &PathBuf, lines: &[String]) -> Result<(), anyhow::Error> {
    let mut writer = BufWriter::new(File::create(path)?);
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}

#[allow(dead_code)]
pub fn temp_file_name(dir: &str) -> PathBuf {
    let mut result = PathBuf::from(dir);
    let name = HEXLOWER.encode(&rand::random::<[u8; 16]>());
    result.push(name);
    result
}

/// Sort `input` into a fresh file under ./target/results/ and return its path
#[allow(dead_code)]
pub fn natural_sort(input: &PathBuf, batch_size: usize, page_size: usize) -> Result<PathBuf, anyhow::Error> {
    let output = temp_file_name("./target/results/");
    let store = temp_file_name("./target/results/");
    let mut natural_sort = NaturalSort::new(input.clone(), output.clone());
    natural_sort.with_store_dir(store.clone());
    natural_sort.with_batch_size(batch_size);
    natural_sort.with_page_size(page_size);
    natural_sort.sort()?;
    fs::remove_dir_all(store)?;
    Ok(output)
}

/// Random lines, about half of them digit leading once trimmed, with duplicates and some padded
/// with blanks
#[allow(dead_code)]
pub fn random_lines(count: usize) -> Vec<String> {
    let words = ["apple", "banana", "cherry", "fig", "grape", "pear", "Zebra", "x"];
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let word = words[rng.gen_range(0..words.len())];
            match rng.gen_range(0..6) {
                0 => format!("{} {}", rng.gen_range(0..50), word),
                1 => format!("{}{} {}", rng.gen_range(0..1000), word, word),
                2 => format!("{} {}", word, rng.gen_range(0..50)),
                3 => format!("  {} {} ", rng.gen_range(0..50), word),
                4 => format!("  {}\t", word),
                _ => word.to_string(),
            }
        })
        .collect()
}
