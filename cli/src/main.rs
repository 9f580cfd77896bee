use std::path::PathBuf;
use std::process::exit;

use clap::{Parser, ValueEnum};
use dotenvy::dotenv;

use t2sql_backend::{logger, run_pipeline, InputPaths, OutputPaths, PipelineConfig, TrainerSettings, WildcardPolicy};

/// Converts Spider, SParC and CoSQL into a flat text-to-SQL corpus for
/// language modelling.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to pairs dump
    #[arg(long, default_value = "t2sql_pairs.tsv")]
    pairs: PathBuf,

    /// Path to tables lm dump
    #[arg(long, default_value = "t2sql_tables.tsv")]
    tables: PathBuf,

    /// Path to dev pairs dump
    #[arg(long, default_value = "t2sql_pairs_dev.tsv")]
    dev_pairs: PathBuf,

    /// Also write the corpus for training a new sub-word tokenizer
    #[arg(long, default_value_t = false)]
    fresh_tokenizer: bool,

    /// Filepath to train tokenizer
    #[arg(long, default_value = "tokenizer_corpus.txt")]
    corpus: PathBuf,

    /// Filepath for LM text dump
    #[arg(long = "lm_corpus", visible_alias = "lm-corpus", default_value = "t2sql_lm.txt")]
    lm_corpus: PathBuf,

    /// Directory containing the spider/, sparc/ and cosql_dataset/ folders
    #[arg(long, value_name = "DIRECTORY_PATH", env = "T2SQL_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    /// Which columns of each table are left out of the schema strings
    #[arg(long, value_enum, default_value_t = PolicyArg::DropWildcard)]
    wildcard_policy: PolicyArg,

    /// sentencepiece `spm_train` executable, run on the tokenizer corpus
    /// when --fresh-tokenizer is given
    #[arg(long, value_name = "PROGRAM")]
    spm_train: Option<PathBuf>,

    /// Model prefix passed to the tokenizer trainer
    #[arg(long, default_value = "t2sql")]
    model_prefix: String,

    /// Vocabulary size passed to the tokenizer trainer
    #[arg(long, default_value_t = 8000)]
    vocab_size: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum PolicyArg {
    /// Drop the `*` column of every table
    DropWildcard,
    /// Drop the last column of every table
    DropLast,
    /// Keep every column
    KeepAll,
}

impl From<PolicyArg> for WildcardPolicy {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::DropWildcard => WildcardPolicy::DropWildcard,
            PolicyArg::DropLast => WildcardPolicy::DropLast,
            PolicyArg::KeepAll => WildcardPolicy::KeepAll,
        }
    }
}

impl Cli {
    fn into_config(self) -> PipelineConfig {
        let trainer = self.spm_train.map(|program| TrainerSettings {
            program,
            model_prefix: self.model_prefix,
            vocab_size: self.vocab_size,
        });

        PipelineConfig {
            inputs: InputPaths::rooted_at(&self.data_dir),
            outputs: OutputPaths {
                pairs: self.pairs,
                dev_pairs: self.dev_pairs,
                tables: self.tables,
                lm_corpus: self.lm_corpus,
                vocab_corpus: self.corpus,
            },
            wildcard_policy: self.wildcard_policy.into(),
            fresh_tokenizer: self.fresh_tokenizer,
            trainer,
        }
    }
}

fn main() {
    // A .env file may define T2SQL_DATA_DIR, LOG_LEVEL or T2SQL_LOG_FILE.
    let _ = dotenv();

    let cli = Cli::parse();

    if !cli.data_dir.is_dir() {
        eprintln!("Error: Directory does not exist or is not a directory: {:?}", cli.data_dir);
        exit(1);
    }

    let config = cli.into_config();

    if let Err(e) = run_pipeline(&config) {
        logger::error(&format!("{:#}", e));
        eprintln!("Error executing command: {:#}", e);
        exit(1);
    }
}
