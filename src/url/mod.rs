//! URL handling module for Seed-Harvest
//!
//! This module provides the URL rules a crawl target is checked against:
//! regex pattern matching, domain allow-listing, canonicalization and link
//! resolution.

mod domain;
mod matcher;
mod normalize;

pub use domain::{extract_host, is_allowed};
pub use matcher::{PatternSet, RejectedPattern};
pub use normalize::{canonicalize_url, resolve_link};

/// Outcome of checking a URL against a target's admission rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Admission {
    /// The URL may be fetched
    Admitted,
    /// The host is outside the target's allowed domains
    DomainNotAllowed,
    /// The URL matches one of the target's exclude patterns
    Excluded,
}

impl Admission {
    /// Returns true if the URL may be fetched
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted)
    }
}

/// Applies the domain allow-list first, then the exclude patterns
///
/// # Examples
///
/// ```
/// use seed_harvest::url::{admit, Admission, PatternSet};
///
/// let domains = vec!["example.com".to_string()];
/// let exclude = PatternSet::compile(&[r"\.pdf$"]);
///
/// assert_eq!(admit("https://example.com/a", &domains, &exclude), Admission::Admitted);
/// assert_eq!(admit("https://example.com/a.pdf", &domains, &exclude), Admission::Excluded);
/// assert_eq!(admit("https://other.org/a", &domains, &exclude), Admission::DomainNotAllowed);
/// ```
pub fn admit<S: AsRef<str>>(url: &str, allowed_domains: &[S], exclude: &PatternSet) -> Admission {
    if !is_allowed(url, allowed_domains) {
        return Admission::DomainNotAllowed;
    }

    if exclude.matches_any(url) {
        return Admission::Excluded;
    }

    Admission::Admitted
}
