//! System-wide constants for the OpenLot auction engine.

/// Shortest allowed bidding window (1 hour), in seconds.
pub const MIN_AUCTION_PERIOD_SECS: u64 = 3_600;

/// Longest allowed bidding window (30 days), in seconds. Also the cap on
/// total duration reachable by deadline extensions, measured from creation.
pub const MAX_AUCTION_PERIOD_SECS: u64 = 30 * 24 * 3_600;

/// Grace period after bidding end before the safety timeout fires (30 days),
/// in seconds.
pub const SAFETY_TIMEOUT_SECS: u64 = 30 * 24 * 3_600;

/// Default number of registry entries scanned per validation call.
pub const DEFAULT_MAX_VALIDATION_ITERATIONS: u32 = 500;

/// Tolerated deviation when asserting per-call validation work in tests,
/// in percent.
pub const COMPUTE_TOLERANCE_PERCENT: u32 = 5;

/// Maximum number of items a single lot may carry.
pub const MAX_ITEMS_PER_LOT: usize = 10_000;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenLot";
