//! Plain-text corpus for training a sub-word vocabulary, and the hook that
//! hands it to an external trainer.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};

use crate::helpers::write_text_file;
use crate::logger;
use crate::types::{CorpusError, Example, SchemaRow};

/// Schema strings first, then train question/query lines, then dev ones.
pub fn build_vocab_corpus(schema_rows: &[SchemaRow], train: &[Example], dev: &[Example]) -> Vec<String> {
    let mut lines: Vec<String> = schema_rows.iter()
        .map(|r| r.schema_string.trim().to_string())
        .collect();

    for ex in train.iter().chain(dev.iter()) {
        lines.push(ex.question.trim().to_string());
        lines.push(ex.query.trim().to_string());
    }

    lines
}

pub fn write_vocab_corpus(path: &Path, lines: &[String]) -> Result<()> {
    write_text_file(path, &lines.join("\n"))
}

pub trait VocabTrainer {
    fn train(&self, corpus_path: &Path) -> Result<()>;
}

/// Runs a SentencePiece-compatible `spm_train` executable.
#[derive(Debug, Clone)]
pub struct SentencePieceTrainer {
    pub program: PathBuf,
    pub model_prefix: String,
    pub vocab_size: usize,
}

impl SentencePieceTrainer {
    pub fn args(&self, corpus_path: &Path) -> Vec<String> {
        vec![
            format!("--input={}", corpus_path.display()),
            format!("--model_prefix={}", self.model_prefix),
            format!("--vocab_size={}", self.vocab_size),
        ]
    }
}

impl VocabTrainer for SentencePieceTrainer {
    fn train(&self, corpus_path: &Path) -> Result<()> {
        let program = self.program.display().to_string();
        logger::info(&format!("Training vocabulary with {} on {:?}", program, corpus_path));

        let status = Command::new(&self.program)
            .args(self.args(corpus_path))
            .status()
            .with_context(|| format!("Failed to start vocabulary trainer: {}", program))?;

        if !status.success() {
            return Err(CorpusError::TrainerFailed {
                program,
                status: status.to_string(),
            }.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocab_corpus_order() {
        let rows = vec![
            SchemaRow { index: 0, db_id: "a".to_string(), schema_string: "[table] [col] x text 0".to_string() },
            SchemaRow { index: 1, db_id: "b".to_string(), schema_string: "[table] [col] y text 0".to_string() },
        ];
        let train = vec![Example { question: "tq".to_string(), query: "ts".to_string(), db_id: "a".to_string() }];
        let dev = vec![Example { question: " dq".to_string(), query: "ds ".to_string(), db_id: "b".to_string() }];

        assert_eq!(build_vocab_corpus(&rows, &train, &dev), vec![
            "[table] [col] x text 0",
            "[table] [col] y text 0",
            "tq",
            "ts",
            "dq",
            "ds",
        ]);
    }

    #[test]
    fn test_trainer_args() {
        let trainer = SentencePieceTrainer {
            program: PathBuf::from("spm_train"),
            model_prefix: "t2sql".to_string(),
            vocab_size: 8000,
        };
        assert_eq!(trainer.args(Path::new("tokenizer_corpus.txt")), vec![
            "--input=tokenizer_corpus.txt",
            "--model_prefix=t2sql",
            "--vocab_size=8000",
        ]);
    }

    #[test]
    fn test_missing_trainer_program() {
        let trainer = SentencePieceTrainer {
            program: PathBuf::from("/nonexistent/spm_train"),
            model_prefix: "m".to_string(),
            vocab_size: 10,
        };
        assert!(trainer.train(Path::new("corpus.txt")).is_err());
    }
}
