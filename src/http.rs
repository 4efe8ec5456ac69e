//! HTTP GET with exponential backoff retry logic.
//!
//! Every scraper fetches through the [`GetAsync`] trait so that transient
//! failures (timeouts, 5xx, rate limiting) are retried uniformly.
//!
//! # Architecture
//!
//! - [`GetAsync`]: Core trait defining an async GET returning the body text
//! - [`HttpGet`]: `reqwest` client with the browser user agent and a timeout
//! - [`RetryGet`]: Decorator that adds retry logic to any `GetAsync` implementation
//!
//! # Retry Strategy
//!
//! - Only transient failures are retried (timeouts, connection errors, 5xx, 429)
//! - Bounded retry attempts (3 by default)
//! - Exponential backoff starting at the base delay
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd

use rand::{Rng, rng};
use reqwest::{Client, StatusCode};
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// Browser-like user agent; several feeds refuse the default one.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Per-request timeout.
pub const REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(30);

/// Trait for async HTTP GET.
///
/// Implementors fetch a URL and return the response body as text. Non-2xx
/// responses are errors.
pub trait GetAsync {
    /// Fetch `url` and return the body.
    async fn get(&self, url: &str) -> Result<String, Box<dyn Error>>;
}

/// Wrapper that adds exponential backoff retry logic to any [`GetAsync`] implementation.
///
/// # Backoff Strategy
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryGet<T> {
    /// The underlying client to wrap.
    inner: T,
    /// Maximum number of retry attempts before giving up.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: StdDuration,
    /// Maximum delay cap to prevent excessive waiting.
    max_delay: StdDuration,
}

impl<T> RetryGet<T>
where
    T: GetAsync,
{
    /// Create a new retry wrapper around an existing [`GetAsync`] implementation.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = HttpGet::new()?;
    /// let fetcher = RetryGet::new(client, 3, Duration::from_secs(1));
    /// ```
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryGet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryGet")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> RetryGet<T> {
    /// Backoff before retry number `attempt` (1-based), without jitter.
    ///
    /// The exponent stops growing at 16; by then the cap has long applied.
    fn backoff_delay(&self, attempt: usize) -> StdDuration {
        let exponent = attempt.saturating_sub(1).min(16) as u32;
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }
}

/// Whether a failed GET is worth repeating.
///
/// Timeouts, connection failures, 5xx and 429 are retried. Other HTTP
/// statuses (404, 403, ...) will not change on a second try. Errors that are
/// not from `reqwest` are treated as transient.
pub fn is_transient(e: &(dyn Error + 'static)) -> bool {
    let Some(err) = e.downcast_ref::<reqwest::Error>() else {
        return true;
    };
    match err.status() {
        Some(status) => status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS,
        None => err.is_timeout() || err.is_connect() || err.is_request() || err.is_body(),
    }
}

impl<T> GetAsync for RetryGet<T>
where
    T: GetAsync + fmt::Debug,
{
    #[instrument(level = "debug", skip(self))]
    async fn get(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let started = Instant::now();
        let mut attempt = 0usize;

        loop {
            attempt += 1;
            let e = match self.inner.get(url).await {
                Ok(body) => return Ok(body),
                Err(e) => e,
            };

            if !is_transient(e.as_ref()) {
                warn!(attempt, error = %e, %url, "get() failed permanently; not retrying");
                return Err(e);
            }
            if attempt > self.max_retries {
                error!(
                    attempt,
                    max = self.max_retries,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %e,
                    %url,
                    "get() exhausted retries"
                );
                return Err(e);
            }

            let jitter = StdDuration::from_millis(rng().random_range(0..=250));
            let delay = self.backoff_delay(attempt) + jitter;
            warn!(attempt, ?delay, error = %e, %url, "get() attempt failed; backing off");
            sleep(delay).await;
        }
    }
}

/// `reqwest` client implementing [`GetAsync`].
#[derive(Debug, Clone)]
pub struct HttpGet {
    client: Client,
}

impl HttpGet {
    /// Build a client with [`USER_AGENT`] and [`REQUEST_TIMEOUT`].
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl GetAsync for HttpGet {
    #[instrument(level = "debug", skip(self))]
    async fn get(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let res = self.client.get(url).send().await;
        let dt = t0.elapsed();

        let response = match res {
            Ok(response) => response.error_for_status()?,
            Err(e) => {
                warn!(elapsed_ms = dt.as_millis() as u64, error = %e, "HTTP request failed");
                return Err(e.into());
            }
        };
        let body = response.text().await?;
        debug!(elapsed_ms = dt.as_millis() as u64, bytes = body.len(), "HTTP request succeeded");
        Ok(body)
    }
}

/// The fetcher the pipeline uses: a retrying `reqwest` client.
pub type Fetcher = RetryGet<HttpGet>;

/// Build a [`Fetcher`] with a one second base delay.
pub fn default_fetcher(max_retries: usize) -> Result<Fetcher, Box<dyn Error>> {
    Ok(RetryGet::new(HttpGet::new()?, max_retries, StdDuration::from_secs(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Fails a fixed number of times, then answers.
    #[derive(Debug)]
    struct Flaky {
        failures: usize,
        calls: Cell<usize>,
    }

    impl GetAsync for Flaky {
        async fn get(&self, url: &str) -> Result<String, Box<dyn Error>> {
            let n = self.calls.get();
            self.calls.set(n + 1);
            if n < self.failures {
                Err(format!("transient failure {n}").into())
            } else {
                Ok(format!("body of {url}"))
            }
        }
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient_failures() {
        let flaky = Flaky { failures: 2, calls: Cell::new(0) };
        let fetcher = RetryGet::new(flaky, 3, StdDuration::from_millis(1));
        let body = fetcher.get("https://example.com").await.unwrap();
        assert_eq!(body, "body of https://example.com");
        assert_eq!(fetcher.inner.calls.get(), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_retries() {
        let flaky = Flaky { failures: 10, calls: Cell::new(0) };
        let fetcher = RetryGet::new(flaky, 2, StdDuration::from_millis(1));
        assert!(fetcher.get("https://example.com").await.is_err());
        assert_eq!(fetcher.inner.calls.get(), 3);
    }

    #[tokio::test]
    async fn test_http_get_errors_on_server_error() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string("fine"))
            .mount(&server)
            .await;

        let client = HttpGet::new().unwrap();
        assert!(client.get(&format!("{}/broken", server.uri())).await.is_err());
        assert_eq!(client.get(&format!("{}/ok", server.uri())).await.unwrap(), "fine");
    }

    #[test]
    fn test_backoff_delay_doubles_then_caps() {
        let fetcher = RetryGet::new(
            Flaky { failures: 0, calls: Cell::new(0) },
            3,
            StdDuration::from_secs(1),
        );
        assert_eq!(fetcher.backoff_delay(1), StdDuration::from_secs(1));
        assert_eq!(fetcher.backoff_delay(2), StdDuration::from_secs(2));
        assert_eq!(fetcher.backoff_delay(5), StdDuration::from_secs(16));
        assert_eq!(fetcher.backoff_delay(6), StdDuration::from_secs(30));
    }

    #[test]
    fn test_backoff_delay_survives_large_attempt_counts() {
        let fetcher = RetryGet::new(
            Flaky { failures: 0, calls: Cell::new(0) },
            255,
            StdDuration::from_secs(1),
        );
        for attempt in [33, 40, 64, 255, usize::MAX] {
            assert_eq!(fetcher.backoff_delay(attempt), StdDuration::from_secs(30));
        }
        let zero = RetryGet::new(Flaky { failures: 0, calls: Cell::new(0) }, 40, StdDuration::ZERO);
        assert_eq!(zero.backoff_delay(40), StdDuration::ZERO);
    }

    #[tokio::test]
    async fn test_retry_skips_permanent_http_errors() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/busy"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&server)
            .await;

        let fetcher = RetryGet::new(HttpGet::new().unwrap(), 1, StdDuration::from_millis(1));
        assert!(fetcher.get(&format!("{}/gone", server.uri())).await.is_err());
        assert!(fetcher.get(&format!("{}/busy", server.uri())).await.is_err());
    }

    #[test]
    fn test_non_http_errors_are_transient() {
        let e: Box<dyn Error> = "socket hiccup".into();
        assert!(is_transient(e.as_ref()));
    }

    #[test]
    fn test_debug_hides_inner() {
        let fetcher = RetryGet::new(
            Flaky { failures: 0, calls: Cell::new(0) },
            3,
            StdDuration::from_secs(1),
        );
        let rendered = format!("{fetcher:?}");
        assert!(rendered.contains("max_retries: 3"));
    }
}
