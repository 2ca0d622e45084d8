//! Output module for the assembled corpus
//!
//! This module handles:
//! - Building harvested documents and their metadata
//! - Assembling the priority-ordered corpus
//! - Handing the corpus to a sink (JSON files by default)
//! - Summarizing harvest statistics

mod corpus;
mod json;
pub mod stats;
mod traits;

pub use corpus::{assemble_corpus, Corpus, DocumentMetadata, HarvestedDocument, DEFAULT_CATEGORY};
pub use json::{
    CorpusManifest, JsonCorpusWriter, ManifestTarget, DOCS_FILE, MANIFEST_FILE, METAS_FILE,
};
pub use stats::{print_harvest_summary, HarvestStats, TargetSummary};
pub use traits::{CorpusSink, MemorySink, OutputError, OutputResult};
