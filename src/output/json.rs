//! JSON corpus writer
//!
//! Writes the three files the indexing step reads:
//! - `docs.json`: array of document texts
//! - `metas.json`: array of metadata objects, aligned with `docs.json`
//! - `manifest.json`: when and from what the corpus was built

use crate::output::corpus::Corpus;
use crate::output::stats::HarvestStats;
use crate::output::traits::{CorpusSink, OutputResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DOCS_FILE: &str = "docs.json";
pub const METAS_FILE: &str = "metas.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Per-target line in the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestTarget {
    pub label: String,
    pub priority: Option<i64>,
    pub documents: u64,
    pub fetched: u64,
    pub failed: u64,
}

/// Run-level information written next to the corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusManifest {
    pub built_at: DateTime<Utc>,
    /// SHA-256 of the seed configuration file
    pub config_hash: String,
    pub documents: usize,
    pub targets: Vec<ManifestTarget>,
}

impl CorpusManifest {
    pub fn new(config_hash: impl Into<String>, corpus: &Corpus, stats: &HarvestStats) -> Self {
        Self {
            built_at: Utc::now(),
            config_hash: config_hash.into(),
            documents: corpus.len(),
            targets: stats
                .targets
                .iter()
                .map(|t| ManifestTarget {
                    label: t.label.clone(),
                    priority: t.priority,
                    documents: t.stats.harvested,
                    fetched: t.stats.fetched,
                    failed: t.stats.failed,
                })
                .collect(),
        }
    }
}

/// Corpus sink that writes pretty-printed JSON files into a directory
#[derive(Debug, Clone)]
pub struct JsonCorpusWriter {
    output_dir: PathBuf,
}

impl JsonCorpusWriter {
    /// Creates a writer targeting `output_dir`, which is created on first write
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn docs_path(&self) -> PathBuf {
        self.output_dir.join(DOCS_FILE)
    }

    pub fn metas_path(&self) -> PathBuf {
        self.output_dir.join(METAS_FILE)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(MANIFEST_FILE)
    }
}

impl CorpusSink for JsonCorpusWriter {
    fn write(&mut self, corpus: &Corpus, manifest: &CorpusManifest) -> OutputResult<()> {
        fs::create_dir_all(&self.output_dir)?;

        fs::write(self.docs_path(), serde_json::to_string_pretty(&corpus.texts())?)?;
        fs::write(
            self.metas_path(),
            serde_json::to_string_pretty(&corpus.metadata())?,
        )?;
        fs::write(self.manifest_path(), serde_json::to_string_pretty(manifest)?)?;

        tracing::info!(
            "Wrote {} documents to {}",
            corpus.len(),
            self.output_dir.display()
        );
        Ok(())
    }
}
