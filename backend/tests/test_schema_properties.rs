//! Invariants of the flattened schema string, checked on a catalog with
//! interleaved tables and overlapping foreign keys.

use std::collections::HashMap;

use t2sql_backend::schema_flatten::{build_schema, flatten_schema, render_schema};
use t2sql_backend::types::{ColumnType, TableCatalogEntry};
use t2sql_backend::WildcardPolicy;

/// Column name encodes its table, e.g. `t2_c1`.
fn interleaved_entry() -> TableCatalogEntry {
    let layout: Vec<i64> = vec![-1, 3, 0, 3, 1, 0, 2, 3, 1, 2, 0, 3];
    let mut per_table: HashMap<i64, usize> = HashMap::new();

    let column_names_original: Vec<(i64, String)> = layout.iter()
        .map(|&t| {
            if t < 0 {
                return (t, "*".to_string());
            }
            let n = per_table.entry(t).or_insert(0);
            *n += 1;
            (t, format!("t{}_c{}", t, n))
        })
        .collect();

    let column_types = (0..layout.len())
        .map(|i| if i % 3 == 0 { ColumnType::Text } else if i % 3 == 1 { ColumnType::Number } else { ColumnType::Time })
        .collect();

    TableCatalogEntry {
        db_id: "interleaved".to_string(),
        column_names_original,
        column_types,
        foreign_keys: vec![(2, 1), (4, 1), (7, 9), (10, 5), (1, 11), (6, 8)],
        primary_keys: vec![1, 2, 4, 6],
        table_names_original: vec![],
    }
}

/// Splits a schema string into `[table]` blocks of `[col]` token lists.
fn parse_blocks(s: &str) -> Vec<Vec<Vec<String>>> {
    s.split("[table]")
        .skip(1)
        .map(|block| {
            block.split("[col]")
                .skip(1)
                .map(|col| col.split_whitespace().map(|t| t.to_string()).collect())
                .collect()
        })
        .collect()
}

fn column_index(entry: &TableCatalogEntry, name: &str) -> usize {
    entry.column_names_original.iter().position(|(_, n)| n == name).unwrap()
}

#[test]
fn test_every_column_in_its_table_block() {
    let entry = interleaved_entry();
    let s = flatten_schema(&entry, WildcardPolicy::DropWildcard).unwrap();
    let blocks = parse_blocks(&s);

    // Table enumeration order follows first occurrence: 3, 0, 1, 2.
    let block_tables: Vec<String> = blocks.iter()
        .map(|b| b[0][0].split('_').next().unwrap().to_string())
        .collect();
    assert_eq!(block_tables, vec!["t3", "t0", "t1", "t2"]);

    let mut seen: HashMap<String, usize> = HashMap::new();
    for block in &blocks {
        let prefix = block[0][0].split('_').next().unwrap().to_string();
        for col in block {
            assert!(col[0].starts_with(&format!("{}_", prefix)), "{} rendered under {}", col[0], prefix);
            *seen.entry(col[0].clone()).or_insert(0) += 1;
        }
    }

    let named = entry.column_names_original.iter().filter(|(_, n)| n != "*").count();
    assert_eq!(seen.len(), named);
    assert!(seen.values().all(|&n| n == 1));
}

#[test]
fn test_primary_key_flags() {
    let entry = interleaved_entry();
    let s = flatten_schema(&entry, WildcardPolicy::DropWildcard).unwrap();

    for col in parse_blocks(&s).into_iter().flatten() {
        let idx = column_index(&entry, &col[0]);
        let expected = if entry.primary_keys.contains(&idx) { "1" } else { "0" };
        assert_eq!(col[2], expected, "primary flag of {}", col[0]);
    }
}

#[test]
fn test_foreign_key_symmetry() {
    let entry = interleaved_entry();
    let s = flatten_schema(&entry, WildcardPolicy::KeepAll).unwrap();

    let partners: HashMap<usize, Vec<usize>> = parse_blocks(&s)
        .into_iter()
        .flatten()
        .filter(|col| col[0] != "*")
        .map(|col| {
            let idx = column_index(&entry, &col[0]);
            let p = col[3..].iter().map(|t| t.parse::<usize>().unwrap()).collect();
            (idx, p)
        })
        .collect();

    for &(i, j) in &entry.foreign_keys {
        assert!(partners[&i].contains(&j), "{} missing partner {}", i, j);
        assert!(partners[&j].contains(&i), "{} missing partner {}", j, i);
    }

    // Column 1 takes part in three pairs, listed in catalog order.
    assert_eq!(partners[&1], vec![2, 4, 11]);
}

#[test]
fn test_type_follows_name() {
    let entry = interleaved_entry();
    let s = flatten_schema(&entry, WildcardPolicy::DropWildcard).unwrap();

    for col in parse_blocks(&s).into_iter().flatten() {
        let idx = column_index(&entry, &col[0]);
        assert_eq!(col[1], entry.column_types[idx].to_string());
    }
}

#[test]
fn test_deterministic() {
    let entry = interleaved_entry();
    let schema = build_schema(&entry).unwrap();
    let first = render_schema(&schema, WildcardPolicy::DropWildcard);
    for _ in 0..5 {
        assert_eq!(flatten_schema(&entry, WildcardPolicy::DropWildcard).unwrap(), first);
    }
}
