use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;

use crate::helpers::write_text_file;
use crate::types::{CorpusError, Example, SchemaRow};

pub const QUESTION_TAG: &str = "[question]";
pub const QUERY_TAG: &str = "[query]";

/// Schema strings keyed by database id.
#[derive(Debug, Clone, Default)]
pub struct SchemaLookup {
    by_db_id: HashMap<String, String>,
}

impl SchemaLookup {
    /// Later rows replace earlier rows with the same db_id.
    pub fn from_rows(rows: &[SchemaRow]) -> Self {
        let by_db_id = rows.iter()
            .map(|r| (r.db_id.clone(), r.schema_string.clone()))
            .collect();
        SchemaLookup { by_db_id }
    }

    pub fn get(&self, db_id: &str) -> Result<&str, CorpusError> {
        self.by_db_id
            .get(db_id)
            .map(|s| s.as_str())
            .ok_or_else(|| CorpusError::UnknownDatabase(db_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.by_db_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_db_id.is_empty()
    }
}

pub fn corpus_line(schema_string: &str, ex: &Example) -> String {
    format!("{} {} {} {} {}", schema_string, QUESTION_TAG, ex.question, QUERY_TAG, ex.query)
}

/// One corpus line per example, in example order.
pub fn join_corpus(examples: &[Example], lookup: &SchemaLookup) -> Result<Vec<String>, CorpusError> {
    examples.iter()
        .map(|ex| Ok(corpus_line(lookup.get(&ex.db_id)?, ex)))
        .collect()
}

pub fn write_lm_corpus(path: &Path, lines: &[String]) -> Result<()> {
    write_text_file(path, &lines.join("\n"))
}
