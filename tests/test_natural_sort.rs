use std::cmp::Ordering;
use std::fs;
use std::path::PathBuf;

use natural_file_sort::natural_key::{natural_cmp, NaturalKey, SortClass};
use natural_file_sort::sort::NaturalSort;

mod common;

#[test]
fn test_scenario() -> Result<(), anyhow::Error> {
    common::setup();
    let input_path = PathBuf::from("./tests/fixtures/scenario.txt");
    let output_path = common::natural_sort(&input_path, 2, 2)?;

    let output = fs::read_to_string(&output_path)?;
    let expected = fs::read_to_string("./tests/fixtures/scenario-sorted.txt")?;
    assert_eq!(output, expected);
    fs::remove_file(output_path)?;
    Ok(())
}

#[test]
fn test_mixed_lines() -> Result<(), anyhow::Error> {
    common::setup();
    let input_path = PathBuf::from("./tests/fixtures/mixed.txt");
    let output_path = common::natural_sort(&input_path, 4, 3)?;

    let output = fs::read_to_string(&output_path)?;
    let expected = fs::read_to_string("./tests/fixtures/mixed-sorted.txt")?;
    assert_eq!(output, expected);
    fs::remove_file(output_path)?;
    Ok(())
}

#[test]
fn test_numeric_ordering() -> Result<(), anyhow::Error> {
    common::setup();
    let input_path = common::temp_file_name("./target/results/");
    fs::write(&input_path, "2 apple\n10 banana\n1 cherry\n")?;
    let output_path = common::natural_sort(&input_path, 10, 10)?;

    let lines = common::read_lines(output_path.clone())?;
    assert_eq!(lines, vec!["1 cherry", "2 apple", "10 banana"]);
    fs::remove_file(input_path)?;
    fs::remove_file(output_path)?;
    Ok(())
}

#[test]
fn test_empty_input() -> Result<(), anyhow::Error> {
    common::setup();
    let input_path = common::temp_file_name("./target/results/");
    fs::write(&input_path, "")?;
    let output_path = common::natural_sort(&input_path, 3, 3)?;

    assert!(output_path.exists());
    assert_eq!(fs::read_to_string(&output_path)?, "");
    fs::remove_file(input_path)?;
    fs::remove_file(output_path)?;
    Ok(())
}

#[test]
fn test_trimming() -> Result<(), anyhow::Error> {
    common::setup();
    let input_path = common::temp_file_name("./target/results/");
    fs::write(&input_path, "2 b  \r\n1 a\t\n3 c \n")?;
    let output_path = common::natural_sort(&input_path, 2, 2)?;

    assert_eq!(fs::read_to_string(&output_path)?, "1 a\n2 b\n3 c\n");
    fs::remove_file(input_path)?;
    fs::remove_file(output_path)?;
    Ok(())
}

#[test]
fn test_output_truncated() -> Result<(), anyhow::Error> {
    common::setup();
    let input_path = PathBuf::from("./tests/fixtures/scenario.txt");
    let output_path = common::temp_file_name("./target/results/");
    let store_path = common::temp_file_name("./target/results/");
    fs::write(&output_path, "previous content\n".repeat(100))?;

    let mut natural_sort = NaturalSort::new(input_path, output_path.clone());
    natural_sort.with_store_dir(store_path.clone());
    natural_sort.sort()?;

    assert_eq!(common::read_lines(output_path.clone())?.len(), 5);
    fs::remove_file(output_path)?;
    fs::remove_dir_all(store_path)?;
    Ok(())
}

#[test]
fn test_batching_transparency() -> Result<(), anyhow::Error> {
    common::setup();
    let lines = common::random_lines(500);
    let input_path = common::temp_file_name("./target/results/");
    common::write_lines(&input_path, &lines)?;

    let mut outputs = Vec::new();
    for size in [1, 3, lines.len() + 5] {
        let output_path = common::natural_sort(&input_path, size, size)?;
        outputs.push(fs::read_to_string(&output_path)?);
        fs::remove_file(output_path)?;
    }
    let output_path = common::natural_sort(&input_path, 7, 64)?;
    outputs.push(fs::read_to_string(&output_path)?);
    fs::remove_file(output_path)?;

    assert!(outputs.iter().all(|output| output == &outputs[0]));
    fs::remove_file(input_path)?;
    Ok(())
}

#[test]
fn test_completeness_and_order() -> Result<(), anyhow::Error> {
    common::setup();
    let lines = common::random_lines(3_000);
    let input_path = common::temp_file_name("./target/results/");
    common::write_lines(&input_path, &lines)?;
    let output_path = common::natural_sort(&input_path, 100, 250)?;
    let output = common::read_lines(output_path.clone())?;
    let lines: Vec<String> = lines.iter().map(|line| line.trim().to_string()).collect();

    // a permutation of the trimmed input
    assert_eq!(output.len(), lines.len());
    let mut expected = lines.clone();
    expected.sort();
    let mut actual = output.clone();
    actual.sort();
    assert_eq!(actual, expected);

    // non decreasing in natural order
    for pair in output.windows(2) {
        assert_ne!(natural_cmp(&pair[0], &pair[1]), Ordering::Greater, "{:?}", pair);
    }

    // digit leading lines first
    let first_text = output.iter()
        .position(|line| NaturalKey::new(line).class() == SortClass::Text)
        .unwrap_or(output.len());
    assert!(output[first_text..].iter().all(|line| NaturalKey::new(line).class() == SortClass::Text));

    // same as an in memory sort
    let mut in_memory = lines;
    in_memory.sort_by(|a, b| natural_cmp(a, b));
    assert_eq!(output, in_memory);

    fs::remove_file(input_path)?;
    fs::remove_file(output_path)?;
    Ok(())
}

#[test]
fn test_many_runs_compacted() -> Result<(), anyhow::Error> {
    common::setup();
    let lines = common::random_lines(300);
    let input_path = common::temp_file_name("./target/results/");
    let output_path = common::temp_file_name("./target/results/");
    let store_path = common::temp_file_name("./target/results/");
    common::write_lines(&input_path, &lines)?;

    let mut natural_sort = NaturalSort::new(input_path.clone(), output_path.clone());
    natural_sort.with_store_dir(store_path.clone());
    natural_sort.with_batch_size(2);
    natural_sort.with_page_size(50);
    natural_sort.with_max_runs(8);
    natural_sort.sort()?;

    let mut expected: Vec<String> = lines.iter().map(|line| line.trim().to_string()).collect();
    expected.sort_by(|a, b| natural_cmp(a, b));
    assert_eq!(common::read_lines(output_path.clone())?, expected);
    // runs plus the store marker
    assert!(fs::read_dir(&store_path)?.count() <= 9);

    fs::remove_file(input_path)?;
    fs::remove_file(output_path)?;
    fs::remove_dir_all(store_path)?;
    Ok(())
}

#[test]
fn test_invalid_utf8_fails() -> Result<(), anyhow::Error> {
    common::setup();
    let input_path = common::temp_file_name("./target/results/");
    let store_path = common::temp_file_name("./target/results/");
    fs::write(&input_path, b"1 ok\n\xff\xfe\n")?;

    let mut natural_sort = NaturalSort::new(input_path.clone(), common::temp_file_name("./target/results/"));
    natural_sort.with_store_dir(store_path.clone());
    let error = natural_sort.sort().err().ok_or_else(|| anyhow::anyhow!("sort should fail"))?;
    assert!(format!("{error}").starts_with("Load phase failed"));

    fs::remove_file(input_path)?;
    fs::remove_dir_all(store_path)?;
    Ok(())
}
