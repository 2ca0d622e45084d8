/// Page state definitions for tracking crawl progress
///
/// Every URL pulled from a target's frontier moves through these states once.
use std::fmt;

/// Represents the current state of a URL in a target's crawl
///
/// `Pending` and `Fetching` are transient and only appear in trace and debug
/// logs. `TargetStats` records terminal states alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// URL is queued in the frontier
    Pending,

    /// URL is being fetched
    Fetching,

    // ===== Terminal States =====
    /// Page was fetched, extracted, and kept as a document
    Harvested,

    /// URL was dropped without producing a document
    Skipped(SkipReason),

    /// Fetch failed after the retry budget was spent
    Failed,
}

/// Why a URL was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// URL was already taken from the frontier earlier in this run
    AlreadyVisited,

    /// Host is outside the target's allowed domains
    NotAdmitted,

    /// URL matches an exclude pattern
    Excluded,

    /// Extracted body is shorter than the minimum word count
    ThinContent { words: usize },
}

impl PageState {
    /// Returns true if this is a terminal state (the URL never re-enters the frontier)
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Returns true if this is an active state
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Fetching)
    }

    /// Returns true if the page became a document
    pub fn is_harvested(&self) -> bool {
        matches!(self, Self::Harvested)
    }

    /// Returns true if a fetch succeeded for this URL
    ///
    /// Thin pages were fetched even though they were then skipped.
    pub fn was_fetched(&self) -> bool {
        matches!(
            self,
            Self::Harvested | Self::Skipped(SkipReason::ThinContent { .. })
        )
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Harvested => "harvested",
            Self::Skipped(_) => "skipped",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped(reason) => write!(f, "skipped ({})", reason),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyVisited => write!(f, "already visited"),
            Self::NotAdmitted => write!(f, "domain not allowed"),
            Self::Excluded => write!(f, "excluded by pattern"),
            Self::ThinContent { words } => write!(f, "thin content, {} words", words),
        }
    }
}
