//! The four corpus stages, run in order.
//!
//! Each stage writes its output file completely before the next stage reads
//! it back from disk.

use anyhow::{Context, Result};

use crate::config::PipelineConfig;
use crate::corpus_join::{join_corpus, write_lm_corpus, SchemaLookup};
use crate::logger;
use crate::pair_extract::{extract_pairs, read_pairs_table, write_pairs_table};
use crate::schema_flatten::{flatten_catalogs, load_catalogs, read_tables_table, write_tables_table};
use crate::vocab_corpus::{build_vocab_corpus, write_vocab_corpus, SentencePieceTrainer, VocabTrainer};

/// Row counts of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub train_pairs: usize,
    pub dev_pairs: usize,
    pub databases: usize,
    pub lm_lines: usize,
    pub vocab_lines: Option<usize>,
}

pub fn write_train_pairs(config: &PipelineConfig) -> Result<usize> {
    let examples = extract_pairs(&config.inputs.train_sources())
        .context("Failed to extract training pairs")?;
    logger::info(&format!("Saving Training pairs dataset at: {:?}", config.outputs.pairs));
    write_pairs_table(&config.outputs.pairs, &examples)?;
    Ok(examples.len())
}

pub fn write_dev_pairs(config: &PipelineConfig) -> Result<usize> {
    let examples = extract_pairs(&config.inputs.dev_sources())
        .context("Failed to extract dev pairs")?;
    logger::info(&format!("Saving Dev. pairs dataset at: {:?}", config.outputs.dev_pairs));
    write_pairs_table(&config.outputs.dev_pairs, &examples)?;
    Ok(examples.len())
}

pub fn write_schema_table(config: &PipelineConfig) -> Result<usize> {
    let entries = load_catalogs(&config.inputs.catalogs())?;
    let rows = flatten_catalogs(&entries, config.wildcard_policy)
        .context("Failed to flatten table catalogs")?;
    logger::info(&format!(
        "Saving tables at: {:?} (wildcard policy: {})",
        config.outputs.tables,
        config.wildcard_policy.as_str(),
    ));
    write_tables_table(&config.outputs.tables, &rows)?;
    Ok(rows.len())
}

pub fn write_lm_corpus_file(config: &PipelineConfig) -> Result<usize> {
    let lookup = SchemaLookup::from_rows(&read_tables_table(&config.outputs.tables)?);
    let examples = read_pairs_table(&config.outputs.pairs)?;
    let lines = join_corpus(&examples, &lookup)
        .context("Failed to join pairs with schema strings")?;
    logger::info(&format!("Saving LM Corpus at {:?}", config.outputs.lm_corpus));
    write_lm_corpus(&config.outputs.lm_corpus, &lines)?;
    Ok(lines.len())
}

pub fn write_vocab_corpus_file(config: &PipelineConfig) -> Result<usize> {
    let rows = read_tables_table(&config.outputs.tables)?;
    let train = read_pairs_table(&config.outputs.pairs)?;
    let dev = read_pairs_table(&config.outputs.dev_pairs)?;
    let lines = build_vocab_corpus(&rows, &train, &dev);
    logger::info(&format!("Saving Tokenizer Corpus at {:?}", config.outputs.vocab_corpus));
    write_vocab_corpus(&config.outputs.vocab_corpus, &lines)?;
    Ok(lines.len())
}

pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineReport> {
    let mut report = PipelineReport {
        train_pairs: write_train_pairs(config)?,
        dev_pairs: write_dev_pairs(config)?,
        databases: write_schema_table(config)?,
        ..Default::default()
    };
    report.lm_lines = write_lm_corpus_file(config)?;

    if config.fresh_tokenizer {
        report.vocab_lines = Some(write_vocab_corpus_file(config)?);

        match &config.trainer {
            Some(settings) => {
                let trainer = SentencePieceTrainer {
                    program: settings.program.clone(),
                    model_prefix: settings.model_prefix.clone(),
                    vocab_size: settings.vocab_size,
                };
                trainer.train(&config.outputs.vocab_corpus)?;
            }
            None => logger::warn("No vocabulary trainer configured, only the corpus was written"),
        }
    }

    logger::info(&format!(
        "Done: {} train pairs, {} dev pairs, {} databases, {} corpus lines",
        report.train_pairs, report.dev_pairs, report.databases, report.lm_lines,
    ));

    Ok(report)
}
