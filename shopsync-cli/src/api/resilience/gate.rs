//! Gate implementations
//!
//! [`IntervalGate`] enforces a minimum spacing between consecutive calls.
//! [`CallLimitGate`] wraps it and stretches the spacing while Shopify reports
//! that the leaky bucket is close to full.

use async_trait::async_trait;
use log::debug;
use reqwest::header::HeaderMap;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Response header carrying the REST bucket state, e.g. `32/40`
pub const CALL_LIMIT_HEADER: &str = "x-shopify-shop-api-call-limit";

/// Pacing seam between callers and the HTTP client
#[async_trait]
pub trait RequestGate: Send + Sync + std::fmt::Debug {
    /// Wait until the next call may be sent
    async fn wait(&self);

    /// Inspect the headers of a completed call
    fn observe(&self, _headers: &HeaderMap) {}

    /// Current statistics
    fn stats(&self) -> GateStats;
}

/// Statistics for a gate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateStats {
    /// Calls that went through the gate
    pub calls: u64,
    /// Calls that had to wait before being sent
    pub throttled: u64,
}

impl GateStats {
    /// Fraction of calls that had to wait
    pub fn throttle_rate(&self) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            self.throttled as f64 / self.calls as f64
        }
    }
}

/// Minimum-interval gate: consecutive calls start at least `min_interval` apart
#[derive(Debug)]
pub struct IntervalGate {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
    calls: AtomicU64,
    throttled: AtomicU64,
}

impl IntervalGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
            calls: AtomicU64::new(0),
            throttled: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl RequestGate for IntervalGate {
    async fn wait(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.min_interval.is_zero() {
            return;
        }

        // Held across the sleep so that calls are released one at a time
        let mut last_call = self.last_call.lock().await;
        if let Some(previous) = *last_call {
            let ready_at = previous + self.min_interval;
            if ready_at > Instant::now() {
                self.throttled.fetch_add(1, Ordering::Relaxed);
                debug!(
                    "Interval gate: waiting {:?} before next call",
                    ready_at - Instant::now()
                );
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last_call = Some(Instant::now());
    }

    fn stats(&self) -> GateStats {
        GateStats {
            calls: self.calls.load(Ordering::Relaxed),
            throttled: self.throttled.load(Ordering::Relaxed),
        }
    }
}

/// Parsed `X-Shopify-Shop-Api-Call-Limit` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallLimit {
    pub used: u32,
    pub max: u32,
}

impl CallLimit {
    /// Parse a `used/max` header value
    pub fn parse(value: &str) -> Option<Self> {
        let (used, max) = value.trim().split_once('/')?;
        let used = used.trim().parse().ok()?;
        let max = max.trim().parse().ok()?;
        if max == 0 {
            return None;
        }
        Some(Self { used, max })
    }

    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get(CALL_LIMIT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(Self::parse)
    }

    pub fn fill_ratio(&self) -> f64 {
        self.used as f64 / self.max as f64
    }
}

/// Adaptive gate driven by the call-limit response header
#[derive(Debug)]
pub struct CallLimitGate {
    inner: IntervalGate,
    high_water_ratio: f64,
    leak_interval: Duration,
    last_limit: StdMutex<Option<CallLimit>>,
}

impl CallLimitGate {
    pub fn new(inner: IntervalGate, high_water_ratio: f64, leak_interval: Duration) -> Self {
        Self {
            inner,
            high_water_ratio,
            leak_interval,
            last_limit: StdMutex::new(None),
        }
    }

    /// Last bucket state reported by the server
    pub fn last_limit(&self) -> Option<CallLimit> {
        *self.last_limit.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Extra delay owed on top of the fixed interval, given the last bucket state
    ///
    /// One leak interval per slot at or above the high-water mark.
    pub fn pending_delay(&self) -> Option<Duration> {
        let limit = self.last_limit()?;
        if limit.fill_ratio() < self.high_water_ratio {
            return None;
        }
        let high_water_slots = (limit.max as f64 * self.high_water_ratio).floor() as u32;
        let slots_over = limit.used.saturating_sub(high_water_slots) + 1;
        Some(self.leak_interval * slots_over)
    }
}

#[async_trait]
impl RequestGate for CallLimitGate {
    async fn wait(&self) {
        self.inner.wait().await;

        if let Some(delay) = self.pending_delay() {
            if !delay.is_zero() {
                self.inner.throttled.fetch_add(1, Ordering::Relaxed);
                debug!(
                    "Call limit gate: bucket at {:?}, backing off {:?}",
                    self.last_limit(),
                    delay
                );
                tokio::time::sleep(delay).await;
            }
        }
    }

    fn observe(&self, headers: &HeaderMap) {
        if let Some(limit) = CallLimit::from_headers(headers) {
            *self.last_limit.lock().unwrap_or_else(|e| e.into_inner()) = Some(limit);
        }
    }

    fn stats(&self) -> GateStats {
        self.inner.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[tokio::test]
    async fn test_interval_gate_spaces_calls() {
        let gate = IntervalGate::new(Duration::from_millis(40));

        let start = std::time::Instant::now();
        gate.wait().await;
        gate.wait().await;
        gate.wait().await;

        assert!(start.elapsed() >= Duration::from_millis(80));
        let stats = gate.stats();
        assert_eq!(stats.calls, 3);
        assert_eq!(stats.throttled, 2);
    }

    #[tokio::test]
    async fn test_interval_gate_first_call_is_immediate() {
        let gate = IntervalGate::new(Duration::from_secs(5));

        let result = tokio::time::timeout(Duration::from_millis(100), gate.wait()).await;

        assert!(result.is_ok());
        assert_eq!(gate.stats().throttled, 0);
    }

    #[tokio::test]
    async fn test_zero_interval_never_waits() {
        let gate = IntervalGate::new(Duration::ZERO);

        let result = tokio::time::timeout(Duration::from_millis(100), async {
            for _ in 0..50 {
                gate.wait().await;
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(gate.stats().calls, 50);
        assert_eq!(gate.stats().throttle_rate(), 0.0);
    }

    #[test]
    fn test_call_limit_parse() {
        assert_eq!(CallLimit::parse("32/40"), Some(CallLimit { used: 32, max: 40 }));
        assert_eq!(CallLimit::parse(" 1 / 80 "), Some(CallLimit { used: 1, max: 80 }));
        assert_eq!(CallLimit::parse("40"), None);
        assert_eq!(CallLimit::parse("a/40"), None);
        assert_eq!(CallLimit::parse("3/0"), None);
    }

    #[test]
    fn test_call_limit_gate_pending_delay() {
        let gate = CallLimitGate::new(
            IntervalGate::new(Duration::ZERO),
            0.8,
            Duration::from_millis(10),
        );
        assert_eq!(gate.pending_delay(), None);

        let mut headers = HeaderMap::new();
        headers.insert(CALL_LIMIT_HEADER, HeaderValue::from_static("10/40"));
        gate.observe(&headers);
        assert_eq!(gate.pending_delay(), None);

        headers.insert(CALL_LIMIT_HEADER, HeaderValue::from_static("32/40"));
        gate.observe(&headers);
        assert_eq!(gate.pending_delay(), Some(Duration::from_millis(10)));

        headers.insert(CALL_LIMIT_HEADER, HeaderValue::from_static("39/40"));
        gate.observe(&headers);
        assert_eq!(gate.pending_delay(), Some(Duration::from_millis(80)));
    }

    #[test]
    fn test_call_limit_gate_ignores_missing_header() {
        let gate = CallLimitGate::new(
            IntervalGate::new(Duration::ZERO),
            0.8,
            Duration::from_millis(10),
        );

        gate.observe(&HeaderMap::new());

        assert_eq!(gate.last_limit(), None);
    }

    #[tokio::test]
    async fn test_call_limit_gate_backs_off_when_full() {
        let gate = CallLimitGate::new(
            IntervalGate::new(Duration::ZERO),
            0.5,
            Duration::from_millis(15),
        );
        let mut headers = HeaderMap::new();
        headers.insert(CALL_LIMIT_HEADER, HeaderValue::from_static("2/4"));
        gate.observe(&headers);

        let start = std::time::Instant::now();
        gate.wait().await;

        assert!(start.elapsed() >= Duration::from_millis(15));
        assert_eq!(gate.stats().throttled, 1);
    }
}
