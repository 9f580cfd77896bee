use std::fs;
use std::path::Path;

use serde_json::{json, Value};
use tempfile::TempDir;

use t2sql_backend::{InputPaths, OutputPaths, PipelineConfig};

fn write_json(dir: &Path, rel: &str, value: &Value) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

#[allow(dead_code)]
pub fn concert_singer_catalog() -> Value {
    json!({
        "db_id": "concert_singer",
        "table_names_original": ["stadium", "singer"],
        "column_names_original": [[-1, "*"], [0, "Stadium_ID"], [0, "Name"],
                                  [1, "Singer_ID"], [1, "Stadium_ID"]],
        "column_types": ["text", "number", "text", "number", "number"],
        "foreign_keys": [[4, 1]],
        "primary_keys": [1, 3]
    })
}

#[allow(dead_code)]
pub fn car_catalog() -> Value {
    json!({
        "db_id": "car_1",
        "table_names_original": ["cars", "makers"],
        "column_names_original": [[-1, "*"], [1, "Id"], [1, "Maker"], [0, "MakeId"], [0, "Maker"]],
        "column_types": ["text", "number", "text", "number", "number"],
        "foreign_keys": [[4, 1], [3, 1]],
        "primary_keys": [1, 3]
    })
}

#[allow(dead_code)]
pub fn dialogs_catalog() -> Value {
    json!({
        "db_id": "dialogs_db",
        "table_names_original": ["users"],
        "column_names_original": [[-1, "*"], [0, "user_id"], [0, "signup"]],
        "column_types": ["text", "number", "time"],
        "foreign_keys": [],
        "primary_keys": [1]
    })
}

/// Writes a small copy of every dataset file under a temporary data dir.
#[allow(dead_code)]
pub fn write_dataset_fixture(dir: &Path) {
    write_json(dir, "spider/train_others.json", &json!([
        {"question": "How many stadiums\nare there?", "query": "SELECT count(*) FROM stadium", "db_id": "concert_singer"},
    ]));
    write_json(dir, "spider/train_spider.json", &json!([
        {"question": "List  all\tsingers", "query": "SELECT Name  FROM singer", "db_id": "concert_singer"},
        {"question": "List  all\tsingers", "query": "SELECT Name  FROM singer", "db_id": "concert_singer"},
    ]));
    write_json(dir, "sparc/train.json", &json!([
        {
            "database_id": "car_1",
            "interaction": [{"utterance": "cars?", "query": "SELECT * FROM cars"}],
            "final": {"utterance": "Which makers\r\nbuild cars?", "query": "SELECT Maker FROM makers"}
        },
    ]));
    write_json(dir, "cosql_dataset/cosql_all_info_dialogs.json", &json!({
        "d2": {"query_goal": "Who signed up last?", "sql": "SELECT user_id FROM users ORDER BY signup DESC LIMIT 1", "db_id": "dialogs_db"},
        "d1": {"query_goal": "How many users?", "sql": "SELECT count(*) FROM users", "db_id": "dialogs_db"}
    }));

    write_json(dir, "spider/dev.json", &json!([
        {"question": "Stadium names?", "query": "SELECT Name FROM stadium", "db_id": "concert_singer"},
    ]));
    write_json(dir, "sparc/dev.json", &json!([
        {"database_id": "car_1", "final": {"utterance": "All makers", "query": "SELECT * FROM makers"}},
    ]));

    write_json(dir, "spider/tables.json", &json!([concert_singer_catalog()]));
    write_json(dir, "sparc/tables.json", &json!([car_catalog()]));
    write_json(dir, "cosql_dataset/tables.json", &json!([dialogs_catalog()]));
}

#[allow(dead_code)]
pub struct Fixture {
    pub data_dir: TempDir,
    pub out_dir: TempDir,
    pub config: PipelineConfig,
}

#[allow(dead_code)]
pub fn fixture() -> Fixture {
    let data_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    write_dataset_fixture(data_dir.path());

    let out = out_dir.path();
    let config = PipelineConfig {
        inputs: InputPaths::rooted_at(data_dir.path()),
        outputs: OutputPaths {
            pairs: out.join("t2sql_pairs.tsv"),
            dev_pairs: out.join("t2sql_pairs_dev.tsv"),
            tables: out.join("t2sql_tables.tsv"),
            lm_corpus: out.join("t2sql_lm.txt"),
            vocab_corpus: out.join("tokenizer_corpus.txt"),
        },
        ..Default::default()
    };

    Fixture { data_dir, out_dir, config }
}

#[allow(dead_code)]
pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}
