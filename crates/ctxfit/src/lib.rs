//! Budget-constrained retention for LLM conversation histories.
//!
//! `ctxfit` decides, deterministically, which messages of a growing history
//! are sent to a model verbatim, which are shrunk, and which are left out so
//! the result fits a token budget. The core abstraction is the
//! [`Engine`](optimizer::Engine): an append-only message store plus a
//! two-state retention policy.
//!
//! 1. Histories at or under the **target** (70% of the budget by default)
//!    pass through unchanged.
//! 2. Larger histories keep the last five messages verbatim, then walk older
//!    messages newest to oldest, keeping what fits, compressing the first
//!    message that doesn't, and stopping there.
//!
//! # Getting started
//!
//! ```
//! use ctxfit::prelude::*;
//!
//! let mut engine = Engine::new(8000)?;
//! engine.add_message("How do I parse JSON in Rust?", "");
//! engine.add_message("Use serde_json::from_str.", "docs.rs/serde_json");
//!
//! let optimized = engine.optimize_context();
//! assert_eq!(optimized.strategy_used, ContextStrategy::Full);
//!
//! let analytics = engine.get_analytics();
//! assert_eq!(analytics.memory_pressure, MemoryPressure::Low);
//! assert!(analytics.recommendations.is_empty());
//! # Ok::<(), ctxfit::Error>(())
//! ```
//!
//! Token counts are an approximation (`max(1, chars / 4)` per field), not a
//! tokenizer. Whoever assembles the final request must still check the real
//! model limit.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`context`] | Token estimation, [`Message`](context::Message) store, compression, zone partitioning |
//! | [`optimizer`] | [`Engine`](optimizer::Engine), [`OptimizedContext`](optimizer::OptimizedContext), metrics |
//! | [`analytics`] | Memory pressure, optimization frequency, efficiency, recommendations |
//! | [`config`] | [`EngineConfig`](config::EngineConfig) with validated tuning constants |
//! | [`input`] | JSON Lines history loader used by the `ctxfit` binary |

pub mod analytics;
pub mod config;
pub mod context;
pub mod error;
pub mod input;
pub mod optimizer;
pub mod prelude;

pub use analytics::{Analytics, MemoryPressure, OptimizationFrequency, Recommendation};
pub use config::{CompressionConfig, EngineConfig};
pub use context::{ContextStrategy, Message, ZoneBreakdown, estimate_tokens};
pub use error::{Error, Result};
pub use optimizer::{Engine, OptimizationMetrics, OptimizedContext};
