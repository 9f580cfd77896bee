pub mod types;
pub mod helpers;
pub mod logger;
pub mod config;
pub mod pair_extract;
pub mod schema_flatten;
pub mod corpus_join;
pub mod vocab_corpus;
pub mod pipeline;

pub use config::{InputPaths, OutputPaths, PipelineConfig, TrainerSettings};
pub use pipeline::{run_pipeline, PipelineReport};
pub use schema_flatten::WildcardPolicy;
pub use types::CorpusError;
