use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;

use crate::types::CorpusError;

lazy_static! {
    static ref RE_WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Collapse every run of whitespace, newlines and tabs included, to one space.
///
/// Leading and trailing whitespace is collapsed, not removed.
pub fn normalize_whitespace(text: &str) -> String {
    RE_WHITESPACE_RUN.replace_all(text, " ").into_owned()
}

pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {:?}", path))?;
    let value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file: {:?}", path))?;
    Ok(value)
}

pub fn read_text_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {:?}", path))
}

pub fn write_text_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)
        .with_context(|| format!("Failed to write file: {:?}", path))
}

/// Data rows of a tab-separated table, header skipped, with their 1-based line numbers.
pub fn tsv_data_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .skip(1)
        .map(|(idx, line)| (idx + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.is_empty())
}

/// Split a tab-separated row into exactly `expected` fields.
pub fn split_tsv_row<'a>(
    table: &str,
    line_num: usize,
    line: &'a str,
    expected: usize,
) -> Result<Vec<&'a str>, CorpusError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != expected {
        return Err(CorpusError::MalformedRow {
            table: table.to_string(),
            line: line_num,
            found: fields.len(),
            expected,
        });
    }
    Ok(fields)
}
