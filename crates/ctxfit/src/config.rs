//! Engine configuration with defaults for every tuning constant.
//!
//! [`EngineConfig::new`] takes only the token budget; everything else starts
//! at the retention policy's standard values and can be overridden with the
//! `with_*` builders.
//!
//! # Examples
//!
//! ```
//! use ctxfit::config::{CompressionConfig, EngineConfig};
//!
//! let config = EngineConfig::new(32_000)
//!     .with_recent_zone_size(8)
//!     .with_compression(CompressionConfig {
//!         content_threshold: 400,
//!         ..CompressionConfig::default()
//!     });
//!
//! assert_eq!(config.target_tokens(), 22_400);
//! assert!(config.validate().is_ok());
//! ```

use crate::context::budget::target_tokens;
use crate::error::{Error, Result};

/// Fraction of the budget compression aims for.
pub const DEFAULT_TARGET_FRACTION: f64 = 0.7;

/// Number of trailing messages that are always kept verbatim.
pub const DEFAULT_RECENT_ZONE_SIZE: usize = 5;

/// Thresholds and prefix lengths used when shrinking a single message.
///
/// A field longer than its threshold (in characters) is cut to its `keep`
/// prefix followed by [`COMPRESSED_MARKER`](crate::context::compress::COMPRESSED_MARKER).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionConfig {
    /// Content longer than this is compressed. Default: `200`.
    pub content_threshold: usize,
    /// Characters of content kept when compressing. Default: `100`.
    pub content_keep: usize,
    /// Context longer than this is compressed. Default: `500`.
    pub context_threshold: usize,
    /// Characters of context kept when compressing. Default: `200`.
    pub context_keep: usize,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            content_threshold: 200,
            content_keep: 100,
            context_threshold: 500,
            context_keep: 200,
        }
    }
}

/// Configuration for an [`Engine`](crate::optimizer::Engine).
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Token budget of the downstream model request.
    pub max_tokens: usize,
    /// Fraction of `max_tokens` that triggers and bounds compression.
    pub target_fraction: f64,
    /// Trailing messages retained verbatim regardless of budget.
    pub recent_zone_size: usize,
    /// Per-message compression settings.
    pub compression: CompressionConfig,
}

impl EngineConfig {
    /// Create a config for the given budget with default tuning.
    pub fn new(max_tokens: usize) -> Self {
        Self {
            max_tokens,
            target_fraction: DEFAULT_TARGET_FRACTION,
            recent_zone_size: DEFAULT_RECENT_ZONE_SIZE,
            compression: CompressionConfig::default(),
        }
    }

    /// Override the target fraction (must lie in `(0, 1]`).
    pub fn with_target_fraction(mut self, fraction: f64) -> Self {
        self.target_fraction = fraction;
        self
    }

    /// Override the size of the always-kept recent zone.
    pub fn with_recent_zone_size(mut self, size: usize) -> Self {
        self.recent_zone_size = size;
        self
    }

    /// Override per-message compression settings.
    pub fn with_compression(mut self, compression: CompressionConfig) -> Self {
        self.compression = compression;
        self
    }

    /// Token target: `floor(max_tokens * target_fraction)`.
    pub fn target_tokens(&self) -> usize {
        target_tokens(self.max_tokens, self.target_fraction)
    }

    /// Check every field, returning the first violation found.
    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == 0 {
            return Err(Error::configuration("max_tokens", "must be positive"));
        }
        if !(self.target_fraction > 0.0 && self.target_fraction <= 1.0) {
            return Err(Error::configuration(
                "target_fraction",
                format!("must be in (0, 1], got {}", self.target_fraction),
            ));
        }
        if self.recent_zone_size == 0 {
            return Err(Error::configuration(
                "recent_zone_size",
                "must keep at least one message",
            ));
        }
        let c = &self.compression;
        if c.content_keep > c.content_threshold {
            return Err(Error::configuration(
                "compression.content_keep",
                format!(
                    "({}) must not exceed content_threshold ({})",
                    c.content_keep, c.content_threshold
                ),
            ));
        }
        if c.context_keep > c.context_threshold {
            return Err(Error::configuration(
                "compression.context_keep",
                format!(
                    "({}) must not exceed context_threshold ({})",
                    c.context_keep, c.context_threshold
                ),
            ));
        }
        Ok(())
    }
}
