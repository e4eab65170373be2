//! Throttle configuration with builder pattern
//!
//! Controls how outbound Admin API calls are paced. The default is a fixed
//! minimum interval between calls; the adaptive mode additionally reads the
//! `X-Shopify-Shop-Api-Call-Limit` header and slows down as the bucket fills.

use std::sync::Arc;
use std::time::Duration;

use super::gate::{CallLimitGate, IntervalGate, RequestGate};

/// Default minimum spacing between two outbound calls
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 300;

/// Shopify leaks two calls per second from the REST bucket
const DEFAULT_LEAK_INTERVAL_MS: u64 = 500;

/// Fraction of the bucket above which the adaptive gate starts stretching
const DEFAULT_HIGH_WATER_RATIO: f64 = 0.8;

/// Pacing configuration for API calls
#[derive(Debug, Clone)]
pub struct ThrottleConfig {
    /// Minimum time between the start of two consecutive calls
    pub min_interval: Duration,
    /// Whether to react to the call-limit header
    pub adaptive: bool,
    /// Bucket fill ratio at which the adaptive gate kicks in
    pub high_water_ratio: f64,
    /// Extra delay per call while the bucket is above the high-water mark
    pub leak_interval: Duration,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(DEFAULT_MIN_INTERVAL_MS),
            adaptive: false,
            high_water_ratio: DEFAULT_HIGH_WATER_RATIO,
            leak_interval: Duration::from_millis(DEFAULT_LEAK_INTERVAL_MS),
        }
    }
}

impl ThrottleConfig {
    /// Create a new builder for ThrottleConfig
    pub fn builder() -> ThrottleConfigBuilder {
        ThrottleConfigBuilder::new()
    }

    /// Build the gate this configuration describes
    pub fn build_gate(&self) -> Arc<dyn RequestGate> {
        let interval = IntervalGate::new(self.min_interval);
        if self.adaptive {
            Arc::new(CallLimitGate::new(
                interval,
                self.high_water_ratio,
                self.leak_interval,
            ))
        } else {
            Arc::new(interval)
        }
    }
}

/// Builder for ThrottleConfig
#[derive(Debug)]
pub struct ThrottleConfigBuilder {
    config: ThrottleConfig,
}

impl ThrottleConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ThrottleConfig::default(),
        }
    }

    /// Set the minimum interval in milliseconds
    pub fn min_interval_ms(mut self, millis: u64) -> Self {
        self.config.min_interval = Duration::from_millis(millis);
        self
    }

    /// Enable/disable the call-limit header driven slowdown
    pub fn adaptive(mut self, enabled: bool) -> Self {
        self.config.adaptive = enabled;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> ThrottleConfig {
        self.config
    }
}

impl Default for ThrottleConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ThrottleConfig::default();

        assert_eq!(config.min_interval, Duration::from_millis(300));
        assert!(!config.adaptive);
        assert_eq!(config.high_water_ratio, 0.8);
        assert_eq!(config.leak_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_builder_pattern() {
        let config = ThrottleConfig::builder()
            .min_interval_ms(50)
            .adaptive(true)
            .build();

        assert_eq!(config.min_interval, Duration::from_millis(50));
        assert!(config.adaptive);
        assert_eq!(config.leak_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_zero_interval() {
        let config = ThrottleConfig::builder().min_interval_ms(0).build();

        assert!(config.min_interval.is_zero());
    }

    #[tokio::test]
    async fn test_build_gate_starts_empty() {
        let gate = ThrottleConfig::builder()
            .min_interval_ms(0)
            .adaptive(true)
            .build()
            .build_gate();

        gate.wait().await;

        assert_eq!(gate.stats().calls, 1);
        assert_eq!(gate.stats().throttled, 0);
    }
}
