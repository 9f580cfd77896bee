//! Flattening of relational schemas into one line of markup tokens.
//!
//! A catalog entry lists columns as a flat sequence of `(table_index, name)`
//! pairs, with primary keys and foreign keys given as indices into that
//! sequence. The flattened form groups the columns by table and annotates each
//! one with its key information:
//!
//! ```text
//! [table] [col] id number 1 3 [table] [col] name text 0 1
//! ```
//!
//! Every column renders as `[col] <name> <type> <pk> <partner>...`, where
//! `<pk>` is `1` for primary key columns and `0` otherwise, and the partners
//! are the global indices of the columns it shares a foreign key with.
//!
//! Tables appear in the order their `table_index` is first seen in the column
//! list, not in numeric order.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::helpers::{read_json_file, read_text_file, split_tsv_row, tsv_data_lines, write_text_file};
use crate::logger;
use crate::types::{Column, CorpusError, DatabaseSchema, SchemaRow, TableBlock, TableCatalogEntry};

pub const TABLES_HEADER: &str = "id\ttable_name\tstring";
pub const TABLE_TAG: &str = "[table]";
pub const COLUMN_TAG: &str = "[col]";
pub const WILDCARD_COLUMN: &str = "*";

/// Which columns of a table group are left out of the schema string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WildcardPolicy {
    /// Drop every `*` column. Tables left without columns are not rendered.
    #[default]
    #[serde(rename = "drop-wildcard")]
    DropWildcard,
    /// Drop the last column of every table group, whatever its name.
    #[serde(rename = "drop-last")]
    DropLast,
    #[serde(rename = "keep-all")]
    KeepAll,
}

impl WildcardPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            WildcardPolicy::DropWildcard => "drop-wildcard",
            WildcardPolicy::DropLast => "drop-last",
            WildcardPolicy::KeepAll => "keep-all",
        }
    }

    /// The columns of `table` to render, or `None` if the table is skipped.
    fn visible_columns<'a>(&self, table: &'a TableBlock) -> Option<Vec<&'a Column>> {
        match self {
            WildcardPolicy::DropWildcard => {
                let cols: Vec<&Column> = table.columns.iter()
                    .filter(|c| c.name != WILDCARD_COLUMN)
                    .collect();
                if cols.is_empty() { None } else { Some(cols) }
            }
            WildcardPolicy::DropLast => {
                let keep = table.columns.len().saturating_sub(1);
                Some(table.columns[..keep].iter().collect())
            }
            WildcardPolicy::KeepAll => Some(table.columns.iter().collect()),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid wildcard policy: {0}")]
pub struct ParseWildcardPolicyError(String);

impl FromStr for WildcardPolicy {
    type Err = ParseWildcardPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drop-wildcard" => Ok(WildcardPolicy::DropWildcard),
            "drop-last" => Ok(WildcardPolicy::DropLast),
            "keep-all" => Ok(WildcardPolicy::KeepAll),
            _ => Err(ParseWildcardPolicyError(s.to_string())),
        }
    }
}

fn check_index(entry: &TableCatalogEntry, key_kind: &'static str, index: usize) -> Result<usize, CorpusError> {
    let columns = entry.column_names_original.len();
    if index >= columns {
        return Err(CorpusError::ColumnIndexOutOfRange {
            db_id: entry.db_id.clone(),
            key_kind,
            index,
            columns,
        });
    }
    Ok(index)
}

/// Resolve key annotations and group the columns of one catalog entry by table.
pub fn build_schema(entry: &TableCatalogEntry) -> Result<DatabaseSchema, CorpusError> {
    let n = entry.column_names_original.len();
    if entry.column_types.len() != n {
        return Err(CorpusError::ColumnTypeCountMismatch {
            db_id: entry.db_id.clone(),
            columns: n,
            types: entry.column_types.len(),
        });
    }

    // Symmetric adjacency list. Pushing both ends while walking the pair list
    // keeps each column's partners in pair-list order.
    let mut partners: Vec<Vec<usize>> = vec![Vec::new(); n];
    for &(a, b) in entry.foreign_keys.iter() {
        let a = check_index(entry, "foreign key", a)?;
        let b = check_index(entry, "foreign key", b)?;
        if a == b {
            partners[a].push(a);
        } else {
            partners[a].push(b);
            partners[b].push(a);
        }
    }

    let mut is_primary = vec![false; n];
    for &i in entry.primary_keys.iter() {
        is_primary[check_index(entry, "primary key", i)?] = true;
    }

    let mut groups: IndexMap<i64, Vec<Column>> = IndexMap::new();
    for (i, ((table_index, name), column_type)) in entry.column_names_original.iter()
        .zip(entry.column_types.iter())
        .enumerate()
    {
        groups.entry(*table_index).or_default().push(Column {
            table_index: *table_index,
            name: name.clone(),
            column_type: column_type.clone(),
            is_primary_key: is_primary[i],
            foreign_key_partners: std::mem::take(&mut partners[i]),
        });
    }

    Ok(DatabaseSchema {
        db_id: entry.db_id.clone(),
        tables: groups.into_iter()
            .map(|(table_index, columns)| TableBlock { table_index, columns })
            .collect(),
    })
}

pub fn render_column(col: &Column) -> String {
    let mut parts: Vec<String> = vec![
        COLUMN_TAG.to_string(),
        col.name.clone(),
        col.column_type.to_string(),
        if col.is_primary_key { "1" } else { "0" }.to_string(),
    ];
    parts.extend(col.foreign_key_partners.iter().map(|p| p.to_string()));
    parts.join(" ")
}

pub fn render_schema(schema: &DatabaseSchema, policy: WildcardPolicy) -> String {
    let tables: Vec<String> = schema.tables.iter()
        .filter_map(|table| policy.visible_columns(table))
        .map(|cols| {
            if cols.is_empty() {
                TABLE_TAG.to_string()
            } else {
                let rendered: Vec<String> = cols.into_iter().map(render_column).collect();
                format!("{} {}", TABLE_TAG, rendered.join(" "))
            }
        })
        .collect();

    tables.join(" ").trim().to_string()
}

pub fn flatten_schema(entry: &TableCatalogEntry, policy: WildcardPolicy) -> Result<String, CorpusError> {
    Ok(render_schema(&build_schema(entry)?, policy))
}

/// One row per database, indexed sequentially across all entries.
pub fn flatten_catalogs(entries: &[TableCatalogEntry], policy: WildcardPolicy) -> Result<Vec<SchemaRow>, CorpusError> {
    entries.iter()
        .enumerate()
        .map(|(index, entry)| {
            Ok(SchemaRow {
                index,
                db_id: entry.db_id.clone(),
                schema_string: flatten_schema(entry, policy)?,
            })
        })
        .collect()
}

/// Read and concatenate catalog files in the given order.
pub fn load_catalogs(paths: &[PathBuf]) -> Result<Vec<TableCatalogEntry>> {
    let mut entries = Vec::new();
    for path in paths {
        let catalog: Vec<TableCatalogEntry> = read_json_file(path)?;
        logger::debug(&format!("{:?}: {} databases", path, catalog.len()));
        entries.extend(catalog);
    }
    Ok(entries)
}

pub fn render_tables_table(rows: &[SchemaRow]) -> String {
    let lines: Vec<String> = rows.iter()
        .map(|r| format!("{}\t{}\t{}", r.index, r.db_id, r.schema_string))
        .collect();
    format!("{}\n{}", TABLES_HEADER, lines.join("\n"))
}

pub fn write_tables_table(path: &Path, rows: &[SchemaRow]) -> Result<()> {
    write_text_file(path, &render_tables_table(rows))
}

pub fn parse_tables_table(table: &str, content: &str) -> Result<Vec<SchemaRow>, CorpusError> {
    tsv_data_lines(content)
        .map(|(line_num, line)| {
            let fields = split_tsv_row(table, line_num, line, 3)?;
            let index = fields[0].parse::<usize>().map_err(|_| CorpusError::MalformedRow {
                table: table.to_string(),
                line: line_num,
                found: 3,
                expected: 3,
            })?;
            Ok(SchemaRow {
                index,
                db_id: fields[1].to_string(),
                schema_string: fields[2].to_string(),
            })
        })
        .collect()
}

pub fn read_tables_table(path: &Path) -> Result<Vec<SchemaRow>> {
    let content = read_text_file(path)?;
    Ok(parse_tables_table(&path.display().to_string(), &content)?)
}
