//! Server-requested pauses for the Zotero API.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Holds requests while the server's `Backoff` or `Retry-After` window is open.
///
/// Zotero sends these headers when it is under load. No request is released
/// before they expire; nothing is retried.
#[derive(Debug, Clone, Default)]
pub struct Backoff {
    inner: Arc<Mutex<BackoffInner>>,
}

#[derive(Debug, Default)]
struct BackoffInner {
    /// Server-requested pause end.
    until: Option<Instant>,
}

impl Backoff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until any pause the server asked for has passed.
    pub async fn wait(&self) {
        let mut inner = self.inner.lock().await;

        if let Some(until) = inner.until {
            let now = Instant::now();
            if now < until {
                drop(inner);
                tokio::time::sleep(until - now).await;
                inner = self.inner.lock().await;
            }
            if inner.until.map_or(false, |current| current <= Instant::now()) {
                inner.until = None;
            }
        }
    }

    /// Record any pause the server asked for in a response.
    pub async fn update_from_headers(&self, headers: &reqwest::header::HeaderMap) {
        let pause = ["backoff", "retry-after"]
            .iter()
            .filter_map(|name| header_seconds(headers, name))
            .max();

        if let Some(secs) = pause {
            tracing::warn!(seconds = secs, "Zotero API asked clients to back off");
            self.pause_for(Duration::from_secs(secs)).await;
        }
    }

    /// Hold all requests for at least `duration` from now.
    pub async fn pause_for(&self, duration: Duration) {
        let mut inner = self.inner.lock().await;
        let until = Instant::now() + duration;
        if inner.until.map_or(true, |current| current < until) {
            inner.until = Some(until);
        }
    }
}

fn header_seconds(headers: &reqwest::header::HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};

    #[tokio::test]
    async fn test_no_pause_is_immediate() {
        let backoff = Backoff::new();
        let start = Instant::now();
        backoff.wait().await;
        backoff.wait().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_pause_delays_next_request() {
        let backoff = Backoff::new();
        backoff.pause_for(Duration::from_millis(60)).await;
        let start = Instant::now();
        backoff.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(50));

        let start = Instant::now();
        backoff.wait().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_shorter_pause_does_not_shorten_window() {
        let backoff = Backoff::new();
        backoff.pause_for(Duration::from_millis(80)).await;
        backoff.pause_for(Duration::from_millis(1)).await;
        let start = Instant::now();
        backoff.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[tokio::test]
    async fn test_update_from_headers_uses_longest() {
        let backoff = Backoff::new();
        let mut headers = HeaderMap::new();
        headers.insert("backoff", HeaderValue::from_static("1"));
        headers.insert("retry-after", HeaderValue::from_static("30"));
        backoff.update_from_headers(&headers).await;

        let until = backoff.inner.lock().await.until.unwrap();
        assert!(until > Instant::now() + Duration::from_secs(20));
    }

    #[tokio::test]
    async fn test_update_without_headers_keeps_open() {
        let backoff = Backoff::new();
        backoff.update_from_headers(&HeaderMap::new()).await;
        assert!(backoff.inner.lock().await.until.is_none());
    }

    #[test]
    fn test_header_seconds() {
        let mut headers = HeaderMap::new();
        headers.insert("backoff", HeaderValue::from_static(" 5 "));
        headers.insert("retry-after", HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(header_seconds(&headers, "backoff"), Some(5));
        assert_eq!(header_seconds(&headers, "retry-after"), None);
        assert_eq!(header_seconds(&headers, "missing"), None);
    }
}
