use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Errors raised while reading sources, flattening schemas or joining the corpus.
///
/// None of these are recovered from. They propagate up to the CLI, which
/// reports them and exits non-zero.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CorpusError {
    #[error("{source_label}: record {record} is missing field '{field}'")]
    MissingField {
        source_label: String,
        record: String,
        field: String,
    },

    #[error("{source_label}: record {record} field '{field}' is not a string")]
    FieldNotString {
        source_label: String,
        record: String,
        field: String,
    },

    #[error("{source_label}: expected {expected} at the top level")]
    UnexpectedLayout {
        source_label: String,
        expected: &'static str,
    },

    #[error("database '{db_id}': {columns} columns but {types} column types")]
    ColumnTypeCountMismatch {
        db_id: String,
        columns: usize,
        types: usize,
    },

    #[error("database '{db_id}': {key_kind} references column {index}, but there are only {columns} columns")]
    ColumnIndexOutOfRange {
        db_id: String,
        key_kind: &'static str,
        index: usize,
        columns: usize,
    },

    #[error("{table}: line {line} has {found} fields, expected {expected}")]
    MalformedRow {
        table: String,
        line: usize,
        found: usize,
        expected: usize,
    },

    #[error("database '{0}' not found in the schema table")]
    UnknownDatabase(String),

    #[error("vocabulary trainer '{program}' exited with status {status}")]
    TrainerFailed {
        program: String,
        status: String,
    },
}

/// One (question, query, database id) training unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub question: String,
    pub query: String,
    pub db_id: String,
}

/// Column type tag as it appears in `column_types`.
///
/// Unknown tags are carried through verbatim so the rendered schema string
/// never loses information.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    Text,
    Number,
    Time,
    Boolean,
    Others,
    Other(String),
}

impl ColumnType {
    pub fn as_str(&self) -> &str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Number => "number",
            ColumnType::Time => "time",
            ColumnType::Boolean => "boolean",
            ColumnType::Others => "others",
            ColumnType::Other(s) => s.as_str(),
        }
    }
}

impl FromStr for ColumnType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "text" => ColumnType::Text,
            "number" => ColumnType::Number,
            "time" => ColumnType::Time,
            "boolean" => ColumnType::Boolean,
            "others" => ColumnType::Others,
            _ => ColumnType::Other(s.to_string()),
        })
    }
}

impl From<String> for ColumnType {
    fn from(s: String) -> Self {
        match s.parse::<ColumnType>() {
            Ok(t) => t,
            Err(never) => match never {},
        }
    }
}

impl From<ColumnType> for String {
    fn from(t: ColumnType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A column after key annotations were resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Index into the database's table list. Catalogs use -1 for the `*` column.
    pub table_index: i64,
    pub name: String,
    pub column_type: ColumnType,
    pub is_primary_key: bool,
    /// Global column indices paired with this one by a foreign key, in the
    /// order the pairs appear in the catalog.
    pub foreign_key_partners: Vec<usize>,
}

/// Columns sharing one `table_index`, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBlock {
    pub table_index: i64,
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSchema {
    pub db_id: String,
    pub tables: Vec<TableBlock>,
}

/// One database record of a `tables.json` catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCatalogEntry {
    pub db_id: String,
    pub column_names_original: Vec<(i64, String)>,
    pub column_types: Vec<ColumnType>,
    pub foreign_keys: Vec<(usize, usize)>,
    pub primary_keys: Vec<usize>,
    #[serde(default)]
    pub table_names_original: Vec<String>,
}

/// One row of the tables table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRow {
    pub index: usize,
    pub db_id: String,
    pub schema_string: String,
}
