//! Configuration for an OpenLot auction.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{OpenlotError, Result, constants};

/// Timing and batch-size configuration, fixed at auction construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionConfig {
    /// Shortest allowed bidding window at initialization.
    pub min_auction_period: Duration,
    /// Longest allowed bidding window; also caps the total duration a
    /// deadline extension may reach from creation.
    pub max_auction_period: Duration,
    /// Grace period after bidding end. If no price has been validated by
    /// then, all bids become withdrawable and pricing is disabled.
    pub safety_timeout: Duration,
    /// Validation batch size: registry entries scanned per call.
    pub max_validation_iterations: u32,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            min_auction_period: Duration::from_secs(constants::MIN_AUCTION_PERIOD_SECS),
            max_auction_period: Duration::from_secs(constants::MAX_AUCTION_PERIOD_SECS),
            safety_timeout: Duration::from_secs(constants::SAFETY_TIMEOUT_SECS),
            max_validation_iterations: constants::DEFAULT_MAX_VALIDATION_ITERATIONS,
        }
    }
}

impl AuctionConfig {
    /// Check the configuration for internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.min_auction_period.is_zero() {
            return Err(OpenlotError::Configuration(
                "min_auction_period must be positive".into(),
            ));
        }
        if self.max_auction_period < self.min_auction_period {
            return Err(OpenlotError::Configuration(
                "max_auction_period must be >= min_auction_period".into(),
            ));
        }
        if self.safety_timeout.is_zero() {
            return Err(OpenlotError::Configuration(
                "safety_timeout must be positive".into(),
            ));
        }
        if self.max_validation_iterations == 0 {
            return Err(OpenlotError::Configuration(
                "max_validation_iterations must be positive".into(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn min_period_chrono(&self) -> chrono::Duration {
        to_chrono(self.min_auction_period)
    }

    #[must_use]
    pub fn max_period_chrono(&self) -> chrono::Duration {
        to_chrono(self.max_auction_period)
    }

    #[must_use]
    pub fn safety_timeout_chrono(&self) -> chrono::Duration {
        to_chrono(self.safety_timeout)
    }
}

// Saturating conversion; only pathological configs exceed i64 millis.
fn to_chrono(d: Duration) -> chrono::Duration {
    chrono::Duration::milliseconds(i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_constants() {
        let cfg = AuctionConfig::default();
        assert_eq!(cfg.min_auction_period.as_secs(), 3_600);
        assert_eq!(cfg.max_auction_period.as_secs(), 2_592_000);
        assert_eq!(cfg.safety_timeout.as_secs(), 2_592_000);
        assert_eq!(cfg.max_validation_iterations, 500);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_inverted_periods() {
        let cfg = AuctionConfig {
            min_auction_period: Duration::from_secs(100),
            max_auction_period: Duration::from_secs(10),
            ..AuctionConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(OpenlotError::Configuration(_))
        ));
    }

    #[test]
    fn rejects_zero_iterations() {
        let cfg = AuctionConfig {
            max_validation_iterations: 0,
            ..AuctionConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn chrono_conversion() {
        let cfg = AuctionConfig::default();
        assert_eq!(cfg.min_period_chrono(), chrono::Duration::hours(1));
        assert_eq!(cfg.safety_timeout_chrono(), chrono::Duration::days(30));
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = AuctionConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: AuctionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
