/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use crate::common;
use prepapyri::file_utils::{normalize_line_endings, FileManager};

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "page.txt", "ⲁⲛⲟⲕ")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::dir_exists(&test_file));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that generate_output_path keeps the full file name and appends the suffix
#[test]
fn test_generate_output_path_withExtension_shouldAppendSuffixAfterIt() {
    let output_path = FileManager::generate_output_path(
        Path::new("/tmp/in/page_12.txt"),
        Path::new("/tmp/out"),
        "_out",
    );

    assert_eq!(output_path, Path::new("/tmp/out/page_12.txt_out"));
}

#[test]
fn test_daily_log_path_withDate_shouldUseIsoDate() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
    let path = FileManager::daily_log_path("/tmp/log", date);
    assert_eq!(path, Path::new("/tmp/log/log_2024-03-07.txt"));
}

/// Test that find_files lists only visible regular files at the top level, sorted
#[test]
fn test_find_files_withMixedEntries_shouldReturnSortedVisibleFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "b.txt", "ⲃ")?;
    common::create_test_file(dir, "a.txt", "ⲁ")?;
    common::create_test_file(dir, ".hidden", "x")?;
    fs::create_dir(dir.join("nested"))?;
    common::create_test_file(&dir.join("nested"), "c.txt", "ⲅ")?;

    let files = FileManager::find_files(dir)?;
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(names, vec!["a.txt", "b.txt"]);
    Ok(())
}

#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("out").join("page.txt_out");

    FileManager::write_to_file(&target, "1. ⲁ\n")?;

    assert_eq!(FileManager::read_to_string(&target)?, "1. ⲁ\n");
    Ok(())
}

#[test]
fn test_move_file_withExistingSource_shouldRelocateContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "page.txt", "ⲁⲛⲟⲕ")?;
    let target = temp_dir.path().join("archive").join("page.txt");

    FileManager::move_file(&source, &target)?;

    assert!(!source.exists());
    assert_eq!(fs::read_to_string(&target)?, "ⲁⲛⲟⲕ");
    Ok(())
}

#[test]
fn test_move_file_withMissingSource_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let result = FileManager::move_file(
        temp_dir.path().join("missing.txt"),
        temp_dir.path().join("archive").join("missing.txt"),
    );
    assert!(result.is_err());
    Ok(())
}

/// Test that append_to_log_file keeps earlier records and timestamps each one
#[test]
fn test_append_to_log_file_withTwoRecords_shouldKeepBoth() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let log_file = temp_dir.path().join("log").join("log_2024-01-01.txt");

    FileManager::append_to_log_file(&log_file, "first")?;
    FileManager::append_to_log_file(&log_file, "second")?;

    let content = fs::read_to_string(&log_file)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('[') && lines[0].ends_with("] first"));
    assert!(lines[1].ends_with("] second"));
    Ok(())
}

#[test]
fn test_read_text_withMixedLineEndings_shouldUseNewlinesOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "page.txt", "ⲁ\r\nⲃ\rⲅ\n")?;

    assert_eq!(FileManager::read_text(&path)?, "ⲁ\nⲃ\nⲅ\n");
    assert_eq!(normalize_line_endings("ⲁ\nⲃ"), "ⲁ\nⲃ");
    Ok(())
}
