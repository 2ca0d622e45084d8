//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for a crawl target, including:
//! - One pooled client per target with the target's user agent
//! - GET requests with connect/request timeouts
//! - Transparent retry with exponential backoff for transient failures
//! - Error classification into final status or network failures

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};

/// Maximum time to establish a TCP/TLS connection
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum time for a whole request including the body read
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Idle connections kept per host in a target's pool
const POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Statuses that are worth another attempt
pub const RETRY_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Retry budget and backoff curve for a fetch client
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Multiplier for the exponential backoff, in seconds
    pub backoff_factor: f64,
    /// Upper bound on any single wait, including `Retry-After`
    pub backoff_max: Duration,
    /// HTTP statuses that trigger a retry
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            backoff_factor: 1.5,
            backoff_max: Duration::from_secs(120),
            retry_statuses: RETRY_STATUSES.to_vec(),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn no_retries() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_backoff_factor(mut self, backoff_factor: f64) -> Self {
        self.backoff_factor = backoff_factor;
        self
    }

    pub fn with_backoff_max(mut self, backoff_max: Duration) -> Self {
        self.backoff_max = backoff_max;
        self
    }

    /// Returns true if a response with this status should be retried
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Wait before the next attempt, given how many attempts have failed so far
    ///
    /// The first failure is retried immediately. After that the wait is
    /// `backoff_factor * 2^(failures - 1)` seconds, capped at `backoff_max`.
    ///
    /// # Example
    ///
    /// ```
    /// use seed_harvest::crawler::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::default();
    /// assert_eq!(policy.delay_before_retry(1), Duration::ZERO);
    /// assert_eq!(policy.delay_before_retry(2), Duration::from_secs(3));
    /// assert_eq!(policy.delay_before_retry(3), Duration::from_secs(6));
    /// ```
    pub fn delay_before_retry(&self, failures: u32) -> Duration {
        if failures <= 1 {
            return Duration::ZERO;
        }

        let exponent = (failures - 1).min(32) as i32;
        let seconds = self.backoff_factor * 2f64.powi(exponent);
        let capped = seconds.min(self.backoff_max.as_secs_f64());

        if capped.is_finite() && capped > 0.0 {
            Duration::from_secs_f64(capped)
        } else {
            Duration::ZERO
        }
    }

    /// Caps a server-provided `Retry-After` wait
    fn cap(&self, delay: Duration) -> Duration {
        delay.min(self.backoff_max)
    }
}

/// A page retrieved with a 2xx status
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Decoded body text
    pub body: String,
}

/// Final outcome of a fetch that did not succeed
#[derive(Debug, Error)]
pub enum FetchError {
    /// The last response carried a non-2xx status
    #[error("HTTP status {status} for {url} after {attempts} attempt(s)")]
    Status {
        url: String,
        status: u16,
        attempts: u32,
    },

    /// The request could not be completed (connect, timeout, body read)
    #[error("Request to {url} failed after {attempts} attempt(s): {source}")]
    Network {
        url: String,
        source: reqwest::Error,
        attempts: u32,
    },
}

impl FetchError {
    /// Number of attempts spent before giving up
    pub fn attempts(&self) -> u32 {
        match self {
            FetchError::Status { attempts, .. } | FetchError::Network { attempts, .. } => *attempts,
        }
    }

    /// The status code of the final response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Network { .. } => None,
        }
    }
}

/// Outcome of a single request
enum Attempt {
    Done(FetchedPage),
    Status {
        status: u16,
        retry_after: Option<Duration>,
    },
    Transport(reqwest::Error),
}

/// HTTP client bound to one crawl target
///
/// The underlying connection pool is shared by every request the target
/// makes and is dropped with the client at the end of the target's crawl.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
    policy: RetryPolicy,
}

impl FetchClient {
    /// Builds a client that identifies itself with `user_agent`
    ///
    /// # Example
    ///
    /// ```
    /// use seed_harvest::crawler::FetchClient;
    ///
    /// let client = FetchClient::new("seed-harvest/1.0").unwrap();
    /// assert_eq!(client.retry_policy().max_attempts, 4);
    /// ```
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            policy: RetryPolicy::default(),
        })
    }

    /// Replaces the retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches a URL, retrying transient failures
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 2xx | Return the body |
    /// | HTTP 429, 500, 502, 503, 504 | Retry with backoff, honouring `Retry-After` |
    /// | Other non-2xx | Fail immediately |
    /// | Timeout, connect or body read error | Retry with backoff |
    /// | Malformed request | Fail immediately |
    ///
    /// The caller only sees the final outcome.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempts = 0;

        loop {
            attempts += 1;

            let retry_after = match self.send_once(url).await {
                Attempt::Done(page) => return Ok(page),
                Attempt::Status {
                    status,
                    retry_after,
                } => {
                    if attempts >= max_attempts || !self.policy.should_retry_status(status) {
                        return Err(FetchError::Status {
                            url: url.to_string(),
                            status,
                            attempts,
                        });
                    }
                    debug!("HTTP {} for {} (attempt {}), retrying", status, url, attempts);
                    retry_after
                }
                Attempt::Transport(source) => {
                    if attempts >= max_attempts || source.is_builder() {
                        return Err(FetchError::Network {
                            url: url.to_string(),
                            source,
                            attempts,
                        });
                    }
                    debug!("Request to {} failed (attempt {}): {}", url, attempts, source);
                    None
                }
            };

            let delay = match retry_after {
                Some(wait) => self.policy.cap(wait),
                None => self.policy.delay_before_retry(attempts),
            };

            if !delay.is_zero() {
                trace!("Backing off {:?} before retrying {}", delay, url);
                tokio::time::sleep(delay).await;
            }
        }
    }

    async fn send_once(&self, url: &str) -> Attempt {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return Attempt::Transport(e),
        };

        let status = response.status();
        if !status.is_success() {
            return Attempt::Status {
                status: status.as_u16(),
                retry_after: parse_retry_after(response.headers()),
            };
        }

        let final_url = response.url().to_string();
        match response.text().await {
            Ok(body) => Attempt::Done(FetchedPage {
                final_url,
                status_code: status.as_u16(),
                body,
            }),
            Err(e) => Attempt::Transport(e),
        }
    }
}

/// Reads a `Retry-After` header given in whole seconds
///
/// HTTP-date values are ignored and fall back to the regular backoff.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
