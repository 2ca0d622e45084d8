//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: Tracks the state of each frontier entry (pending, fetching, harvested, skipped, failed)
//! - `SkipReason`: Why an entry was dropped without producing a document
//! - `TargetStats`: Per-target counters reported at the end of a crawl

mod page_state;
mod target_stats;

pub use page_state::{PageState, SkipReason};
pub use target_stats::TargetStats;
