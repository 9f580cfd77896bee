//! Extraction of (question, query, db_id) examples from the Spider, SParC and
//! CoSQL dataset files.
//!
//! Each dataset keeps the three strings under a different JSON path. A
//! [`PairSource`] names the file, how its records are laid out, and where the
//! three fields live inside a record.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::Value;

use crate::helpers::{normalize_whitespace, read_json_file, read_text_file, split_tsv_row, tsv_data_lines, write_text_file};
use crate::logger;
use crate::types::{CorpusError, Example};

pub const PAIRS_HEADER: &str = "question\tquery\tdb_id";

/// How records are arranged at the top level of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLayout {
    /// A JSON array of records.
    RecordList,
    /// A JSON object whose values are records, visited in file order.
    KeyedRecords,
}

/// A sequence of object keys leading to a string field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn new(keys: &[&str]) -> Self {
        FieldPath(keys.iter().map(|k| k.to_string()).collect())
    }

    /// Parse a dotted path such as `final.utterance`.
    pub fn dotted(path: &str) -> Self {
        FieldPath(path.split('.').map(|k| k.to_string()).collect())
    }

    pub fn lookup<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        self.0.iter().try_fold(record, |value, key| value.get(key))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSource {
    pub label: String,
    pub path: PathBuf,
    pub layout: SourceLayout,
    pub question: FieldPath,
    pub query: FieldPath,
    pub db_id: FieldPath,
}

impl PairSource {
    /// Spider style: flat records with `question`, `query` and `db_id`.
    pub fn spider(path: &Path) -> Self {
        PairSource {
            label: path.display().to_string(),
            path: path.to_path_buf(),
            layout: SourceLayout::RecordList,
            question: FieldPath::new(&["question"]),
            query: FieldPath::new(&["query"]),
            db_id: FieldPath::new(&["db_id"]),
        }
    }

    /// SParC style: the interaction goal is kept under `final`.
    pub fn sparc(path: &Path) -> Self {
        PairSource {
            label: path.display().to_string(),
            path: path.to_path_buf(),
            layout: SourceLayout::RecordList,
            question: FieldPath::dotted("final.utterance"),
            query: FieldPath::dotted("final.query"),
            db_id: FieldPath::new(&["database_id"]),
        }
    }

    /// CoSQL style: dialogs keyed by dialog id.
    pub fn cosql(path: &Path) -> Self {
        PairSource {
            label: path.display().to_string(),
            path: path.to_path_buf(),
            layout: SourceLayout::KeyedRecords,
            question: FieldPath::new(&["query_goal"]),
            query: FieldPath::new(&["sql"]),
            db_id: FieldPath::new(&["db_id"]),
        }
    }

    /// Read the source file and extract one normalized example per record.
    pub fn extract(&self) -> Result<Vec<Example>> {
        let root: Value = read_json_file(&self.path)?;
        let examples = self.extract_from_value(&root)?;
        logger::debug(&format!("{}: {} examples", self.label, examples.len()));
        Ok(examples)
    }

    pub fn extract_from_value(&self, root: &Value) -> Result<Vec<Example>, CorpusError> {
        let records: Vec<(String, &Value)> = match (self.layout, root) {
            (SourceLayout::RecordList, Value::Array(items)) => {
                items.iter().enumerate().map(|(i, v)| (format!("#{}", i), v)).collect()
            }
            (SourceLayout::KeyedRecords, Value::Object(map)) => {
                map.iter().map(|(k, v)| (format!("'{}'", k), v)).collect()
            }
            (SourceLayout::RecordList, _) => {
                return Err(CorpusError::UnexpectedLayout {
                    source_label: self.label.clone(),
                    expected: "an array of records",
                });
            }
            (SourceLayout::KeyedRecords, _) => {
                return Err(CorpusError::UnexpectedLayout {
                    source_label: self.label.clone(),
                    expected: "an object of keyed records",
                });
            }
        };

        records
            .into_iter()
            .map(|(record_id, record)| {
                Ok(Example {
                    question: normalize_whitespace(self.string_field(&record_id, record, &self.question)?),
                    query: normalize_whitespace(self.string_field(&record_id, record, &self.query)?),
                    db_id: normalize_whitespace(self.string_field(&record_id, record, &self.db_id)?),
                })
            })
            .collect()
    }

    fn string_field<'a>(&self, record_id: &str, record: &'a Value, path: &FieldPath) -> Result<&'a str, CorpusError> {
        let value = path.lookup(record).ok_or_else(|| CorpusError::MissingField {
            source_label: self.label.clone(),
            record: record_id.to_string(),
            field: path.to_string(),
        })?;

        value.as_str().ok_or_else(|| CorpusError::FieldNotString {
            source_label: self.label.clone(),
            record: record_id.to_string(),
            field: path.to_string(),
        })
    }
}

/// Extract all sources in order: source file order, then record order.
pub fn extract_pairs(sources: &[PairSource]) -> Result<Vec<Example>> {
    let mut examples = Vec::new();
    for source in sources {
        examples.extend(source.extract()?);
    }
    Ok(examples)
}

pub fn render_pairs_table(examples: &[Example]) -> String {
    let mut s = String::from(PAIRS_HEADER);
    s.push('\n');
    for ex in examples {
        s.push_str(&ex.question);
        s.push('\t');
        s.push_str(&ex.query);
        s.push('\t');
        s.push_str(&ex.db_id);
        s.push('\n');
    }
    s
}

pub fn write_pairs_table(path: &Path, examples: &[Example]) -> Result<()> {
    write_text_file(path, &render_pairs_table(examples))
}

pub fn parse_pairs_table(table: &str, content: &str) -> Result<Vec<Example>, CorpusError> {
    tsv_data_lines(content)
        .map(|(line_num, line)| {
            let fields = split_tsv_row(table, line_num, line, 3)?;
            Ok(Example {
                question: fields[0].to_string(),
                query: fields[1].to_string(),
                db_id: fields[2].to_string(),
            })
        })
        .collect()
}

pub fn read_pairs_table(path: &Path) -> Result<Vec<Example>> {
    let content = read_text_file(path)?;
    Ok(parse_pairs_table(&path.display().to_string(), &content)?)
}
