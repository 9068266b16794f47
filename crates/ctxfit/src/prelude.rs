//! Convenience re-exports for common `ctxfit` types.
//!
//! ```ignore
//! use ctxfit::prelude::*;
//! ```
//!
//! Pulls in the engine, its configuration, and every value object it
//! returns. Building blocks (partitioner, compressor, loader) stay in their
//! modules.

// ── Engine ──────────────────────────────────────────────────────────
pub use crate::config::{CompressionConfig, EngineConfig};
pub use crate::error::{Error, Result};
pub use crate::optimizer::{Engine, OptimizationMetrics, OptimizedContext};

// ── Context ─────────────────────────────────────────────────────────
pub use crate::context::{ContextStrategy, ContextUsage, Message, ZoneBreakdown, estimate_tokens};

// ── Analytics ───────────────────────────────────────────────────────
pub use crate::analytics::{Analytics, MemoryPressure, OptimizationFrequency, Recommendation};
