//! Harvested documents and corpus assembly

use crate::config::CrawlTarget;
use crate::crawler::{ExtractedContent, TargetReport};
use crate::HarvestError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use url::Url;

/// Category used when a target does not name one
pub const DEFAULT_CATEGORY: &str = "uncategorized";

/// Metadata record stored next to each document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Canonical URL the document came from
    pub source: String,
    pub label: String,
    pub category: String,
    pub title: String,
    pub fetched_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
}

/// One harvested page: the text to index and what it describes
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestedDocument {
    /// Title, a blank line, then the body
    pub text: String,
    pub metadata: DocumentMetadata,
}

impl HarvestedDocument {
    /// Builds the document for a page harvested from `target`
    pub fn new(
        target: &CrawlTarget,
        source: &Url,
        content: ExtractedContent,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let ExtractedContent {
            title,
            body,
            published,
        } = content;

        Self {
            text: format!("{}\n\n{}", title, body),
            metadata: DocumentMetadata {
                source: source.to_string(),
                label: target.label.clone(),
                category: target
                    .category
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
                title,
                fetched_at,
                published,
            },
        }
    }
}

/// Ordered documents across all targets
///
/// Order is priority first, then seed order, then harvest order within a
/// target. Row `i` of any index built from this corpus corresponds to
/// `documents()[i]`.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<HarvestedDocument>,
}

impl Corpus {
    pub fn documents(&self) -> &[HarvestedDocument] {
        &self.documents
    }

    /// Document texts in corpus order
    pub fn texts(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.text.as_str()).collect()
    }

    /// Metadata records in corpus order
    pub fn metadata(&self) -> Vec<&DocumentMetadata> {
        self.documents.iter().map(|d| &d.metadata).collect()
    }

    /// Splits into the two parallel sequences handed to the indexer
    pub fn into_parallel(self) -> (Vec<String>, Vec<DocumentMetadata>) {
        self.documents
            .into_iter()
            .map(|d| (d.text, d.metadata))
            .unzip()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Concatenates target reports into the final corpus
///
/// Reports are ordered by descending priority (missing priority counts as 0)
/// with ties kept in the order given. An empty result is an error, since an
/// index cannot be built from nothing.
///
/// # Example
///
/// ```
/// use seed_harvest::{assemble_corpus, HarvestError};
///
/// let result = assemble_corpus(Vec::new());
/// assert!(matches!(result, Err(HarvestError::EmptyCorpus)));
/// ```
pub fn assemble_corpus(mut reports: Vec<TargetReport>) -> Result<Corpus, HarvestError> {
    reports.sort_by_key(|report| Reverse(report.priority.unwrap_or(0)));

    let documents: Vec<HarvestedDocument> = reports
        .into_iter()
        .flat_map(|report| report.documents)
        .collect();

    if documents.is_empty() {
        return Err(HarvestError::EmptyCorpus);
    }

    Ok(Corpus { documents })
}
