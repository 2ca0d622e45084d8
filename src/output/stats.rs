//! Harvest statistics and summary printing

use crate::crawler::TargetReport;
use crate::state::TargetStats;

/// Counters for one crawled target
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSummary {
    pub label: String,
    pub priority: Option<i64>,
    pub stats: TargetStats,
}

/// Statistics for a whole harvest run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarvestStats {
    /// Targets in crawl order
    pub targets: Vec<TargetSummary>,

    /// Sum over all targets
    pub totals: TargetStats,
}

impl HarvestStats {
    pub fn from_reports(reports: &[TargetReport]) -> Self {
        let mut totals = TargetStats::new();
        let targets = reports
            .iter()
            .map(|report| {
                totals.merge(&report.stats);
                TargetSummary {
                    label: report.label.clone(),
                    priority: report.priority,
                    stats: report.stats,
                }
            })
            .collect();

        Self { targets, totals }
    }

    /// Share of fetched pages that became documents, as a percentage
    pub fn harvest_rate(&self) -> f64 {
        if self.totals.fetched == 0 {
            return 0.0;
        }
        (self.totals.harvested as f64 / self.totals.fetched as f64) * 100.0
    }
}

/// Prints a harvest summary to stdout
pub fn print_harvest_summary(stats: &HarvestStats) {
    println!("=== Harvest Summary ===\n");

    println!("Targets:");
    for target in &stats.targets {
        let priority = target
            .priority
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {} (priority {}): {} harvested, {} skipped, {} failed",
            target.label,
            priority,
            target.stats.harvested,
            target.stats.skipped(),
            target.stats.failed
        );
    }
    println!();

    let totals = &stats.totals;
    println!("Pages:");
    println!("  Fetched: {}", totals.fetched);
    println!("  Harvested: {}", totals.harvested);
    println!("  Failed: {}", totals.failed);
    println!("  Links enqueued: {}", totals.links_enqueued);
    println!();

    if totals.skipped() > 0 {
        println!("Skipped:");
        println!("  Already visited: {}", totals.skipped_visited);
        println!("  Domain not allowed: {}", totals.skipped_domain);
        println!("  Excluded by pattern: {}", totals.skipped_excluded);
        println!("  Thin content: {}", totals.skipped_thin);
        println!();
    }

    println!(
        "Harvest Rate: {:.1}% ({} / {} fetched pages kept)",
        stats.harvest_rate(),
        totals.harvested,
        totals.fetched
    );
}
