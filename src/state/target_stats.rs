use crate::state::{PageState, SkipReason};

/// Per-target counters accumulated over one crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetStats {
    /// Successful fetches (harvested or thin)
    pub fetched: u64,

    /// Pages kept as documents
    pub harvested: u64,

    /// Frontier entries dropped as already visited
    pub skipped_visited: u64,

    /// URLs outside the allowed domains
    pub skipped_domain: u64,

    /// URLs matching an exclude pattern
    pub skipped_excluded: u64,

    /// Pages below the minimum word count
    pub skipped_thin: u64,

    /// Fetches that failed after retries
    pub failed: u64,

    /// Links pushed onto the frontier
    pub links_enqueued: u64,
}

impl TargetStats {
    /// Creates an empty counter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the terminal state of one frontier entry
    pub fn record(&mut self, state: PageState) {
        if state.was_fetched() {
            self.fetched += 1;
        }

        match state {
            PageState::Harvested => self.harvested += 1,
            PageState::Failed => self.failed += 1,
            PageState::Skipped(SkipReason::AlreadyVisited) => self.skipped_visited += 1,
            PageState::Skipped(SkipReason::NotAdmitted) => self.skipped_domain += 1,
            PageState::Skipped(SkipReason::Excluded) => self.skipped_excluded += 1,
            PageState::Skipped(SkipReason::ThinContent { .. }) => self.skipped_thin += 1,
            PageState::Pending | PageState::Fetching => {}
        }
    }

    /// Total skipped entries across all reasons
    pub fn skipped(&self) -> u64 {
        self.skipped_visited + self.skipped_domain + self.skipped_excluded + self.skipped_thin
    }

    /// Total frontier entries that reached a terminal state
    pub fn processed(&self) -> u64 {
        self.harvested + self.skipped() + self.failed
    }

    /// Adds another target's counters to this one
    pub fn merge(&mut self, other: &TargetStats) {
        self.fetched += other.fetched;
        self.harvested += other.harvested;
        self.skipped_visited += other.skipped_visited;
        self.skipped_domain += other.skipped_domain;
        self.skipped_excluded += other.skipped_excluded;
        self.skipped_thin += other.skipped_thin;
        self.failed += other.failed;
        self.links_enqueued += other.links_enqueued;
    }
}
