//! Output sink traits and types
//!
//! A corpus sink is the boundary between the crawler and whatever builds
//! the retrieval index. The crawler only promises that `documents[i]` and
//! `metadata[i]` describe the same page.

use crate::output::corpus::Corpus;
use crate::output::json::CorpusManifest;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for corpus sinks
///
/// Sinks receive the assembled corpus exactly once per run, and only when it
/// holds at least one document.
pub trait CorpusSink {
    /// Persists or forwards the corpus
    ///
    /// # Arguments
    ///
    /// * `corpus` - The ordered documents and their metadata
    /// * `manifest` - Run-level information about how the corpus was built
    fn write(&mut self, corpus: &Corpus, manifest: &CorpusManifest) -> OutputResult<()>;
}

/// In-memory sink that keeps what it was given
///
/// Handy for running a harvest without touching disk.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub documents: Vec<String>,
    pub manifests: Vec<CorpusManifest>,
}

impl CorpusSink for MemorySink {
    fn write(&mut self, corpus: &Corpus, manifest: &CorpusManifest) -> OutputResult<()> {
        self.documents
            .extend(corpus.texts().into_iter().map(str::to_string));
        self.manifests.push(manifest.clone());
        Ok(())
    }
}
