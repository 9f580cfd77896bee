use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};

use crate::pair_extract::PairSource;
use crate::schema_flatten::WildcardPolicy;

/// Conventional dataset locations, relative to the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPaths {
    pub spider_train_others: PathBuf,
    pub spider_train: PathBuf,
    pub sparc_train: PathBuf,
    pub cosql_dialogs: PathBuf,

    pub spider_dev: PathBuf,
    pub sparc_dev: PathBuf,

    pub spider_tables: PathBuf,
    pub sparc_tables: PathBuf,
    pub cosql_tables: PathBuf,
}

impl Default for InputPaths {
    fn default() -> Self {
        InputPaths {
            spider_train_others: PathBuf::from("spider/train_others.json"),
            spider_train: PathBuf::from("spider/train_spider.json"),
            sparc_train: PathBuf::from("sparc/train.json"),
            cosql_dialogs: PathBuf::from("cosql_dataset/cosql_all_info_dialogs.json"),
            spider_dev: PathBuf::from("spider/dev.json"),
            sparc_dev: PathBuf::from("sparc/dev.json"),
            spider_tables: PathBuf::from("spider/tables.json"),
            sparc_tables: PathBuf::from("sparc/tables.json"),
            cosql_tables: PathBuf::from("cosql_dataset/tables.json"),
        }
    }
}

impl InputPaths {
    /// The default layout resolved against `data_dir`.
    pub fn rooted_at(data_dir: &Path) -> Self {
        let d = InputPaths::default();
        InputPaths {
            spider_train_others: data_dir.join(d.spider_train_others),
            spider_train: data_dir.join(d.spider_train),
            sparc_train: data_dir.join(d.sparc_train),
            cosql_dialogs: data_dir.join(d.cosql_dialogs),
            spider_dev: data_dir.join(d.spider_dev),
            sparc_dev: data_dir.join(d.sparc_dev),
            spider_tables: data_dir.join(d.spider_tables),
            sparc_tables: data_dir.join(d.sparc_tables),
            cosql_tables: data_dir.join(d.cosql_tables),
        }
    }

    /// Training sources, in emission order.
    pub fn train_sources(&self) -> Vec<PairSource> {
        vec![
            PairSource::spider(&self.spider_train_others),
            PairSource::spider(&self.spider_train),
            PairSource::sparc(&self.sparc_train),
            PairSource::cosql(&self.cosql_dialogs),
        ]
    }

    pub fn dev_sources(&self) -> Vec<PairSource> {
        vec![
            PairSource::spider(&self.spider_dev),
            PairSource::sparc(&self.sparc_dev),
        ]
    }

    pub fn catalogs(&self) -> Vec<PathBuf> {
        vec![
            self.spider_tables.clone(),
            self.sparc_tables.clone(),
            self.cosql_tables.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPaths {
    pub pairs: PathBuf,
    pub dev_pairs: PathBuf,
    pub tables: PathBuf,
    pub lm_corpus: PathBuf,
    pub vocab_corpus: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        OutputPaths {
            pairs: PathBuf::from("t2sql_pairs.tsv"),
            dev_pairs: PathBuf::from("t2sql_pairs_dev.tsv"),
            tables: PathBuf::from("t2sql_tables.tsv"),
            lm_corpus: PathBuf::from("t2sql_lm.txt"),
            vocab_corpus: PathBuf::from("tokenizer_corpus.txt"),
        }
    }
}

/// Settings for the external sub-word vocabulary trainer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerSettings {
    pub program: PathBuf,
    pub model_prefix: String,
    pub vocab_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub inputs: InputPaths,
    pub outputs: OutputPaths,
    pub wildcard_policy: WildcardPolicy,
    /// Build the vocabulary corpus, and run the trainer if one is configured.
    pub fresh_tokenizer: bool,
    pub trainer: Option<TrainerSettings>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            inputs: InputPaths::default(),
            outputs: OutputPaths::default(),
            wildcard_policy: WildcardPolicy::default(),
            fresh_tokenizer: false,
            trainer: None,
        }
    }
}
