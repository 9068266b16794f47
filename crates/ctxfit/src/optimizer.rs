//! The optimization engine: owns the history and produces fitted views of it.
//!
//! [`Engine::optimize_context`] never mutates the store. Each call partitions
//! a snapshot of the history against the target, measures the result, and
//! returns a fresh [`OptimizedContext`]. Reads take `&self` and appends take
//! `&mut self`, so any number of threads may optimize a shared engine while
//! appends stay exclusive.
//!
//! # Example
//!
//! ```
//! use ctxfit::{ContextStrategy, Engine};
//!
//! let mut engine = Engine::new(2000)?;
//! for i in 0..10 {
//!     engine.add_message(format!("Message {i} with large context"), "x".repeat(1000));
//! }
//!
//! let optimized = engine.optimize_context();
//! assert_eq!(optimized.strategy_used, ContextStrategy::SmartCompression);
//! assert!(optimized.optimization_metrics.optimized_token_count <= engine.target_tokens());
//! # Ok::<(), ctxfit::Error>(())
//! ```

use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use crate::config::EngineConfig;
use crate::context::{
    ContextStrategy, ContextUsage, Message, MessageStore, ZoneBreakdown, calculate_context_zones,
    partition,
};
use crate::error::Result;

/// Preservation floor under smart compression.
const PRESERVATION_FLOOR: f64 = 0.70;

/// Weight of the surviving-token fraction in the preservation score.
const PRESERVATION_WEIGHT: f64 = 0.25;

/// Measurements taken during one optimization pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationMetrics {
    pub original_message_count: usize,
    pub optimized_message_count: usize,
    pub original_token_count: usize,
    pub optimized_token_count: usize,
    /// Fractional token reduction (same value as `memory_savings`).
    pub compression_ratio: f64,
    pub messages_compressed: usize,
    pub messages_kept_full: usize,
    /// Messages rejected after a failed compression attempt (0 or 1).
    pub messages_dropped: usize,
    pub context_zones: ZoneBreakdown,
    /// Wall-clock time of the pass. Diagnostic only.
    pub optimization_time_ms: f64,
}

impl OptimizationMetrics {
    /// Format as a short log-friendly string.
    pub fn to_log_string(&self) -> String {
        format!(
            "optimized: {} -> {} messages, {} -> {} tokens ({:.1}% saved, {} compressed, {} dropped) in {:.2}ms",
            self.original_message_count,
            self.optimized_message_count,
            self.original_token_count,
            self.optimized_token_count,
            self.compression_ratio * 100.0,
            self.messages_compressed,
            self.context_zones.dropped_zone_messages,
            self.optimization_time_ms,
        )
    }
}

/// A history fitted to the budget, plus how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizedContext {
    /// Surviving messages in chronological order.
    pub messages: Vec<Message>,
    pub strategy_used: ContextStrategy,
    /// `1 - optimized/original` tokens, `0.0` for an empty history.
    pub memory_savings: f64,
    /// Heuristic in `[0, 1]`: `1.0` when nothing changed.
    pub context_preservation: f64,
    pub optimization_metrics: OptimizationMetrics,
}

/// Budget-constrained retention engine over an append-only history.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    store: MessageStore,
}

impl Engine {
    /// Create an engine with default tuning for `max_tokens`.
    ///
    /// Fails with [`Error::Configuration`](crate::Error::Configuration) when
    /// `max_tokens` is zero.
    pub fn new(max_tokens: usize) -> Result<Self> {
        Self::with_config(EngineConfig::new(max_tokens))
    }

    /// Create an engine from a full configuration, validating it first.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        debug!(
            max_tokens = config.max_tokens,
            target = config.target_tokens(),
            recent_zone = config.recent_zone_size,
            "engine configured"
        );
        Ok(Self {
            config,
            store: MessageStore::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn max_tokens(&self) -> usize {
        self.config.max_tokens
    }

    /// Token count above which smart compression kicks in.
    pub fn target_tokens(&self) -> usize {
        self.config.target_tokens()
    }

    /// Append a message and return its id. Empty strings are allowed.
    pub fn add_message(&mut self, content: impl Into<String>, context: impl Into<String>) -> usize {
        self.store.add_message(content, context)
    }

    /// Append several `(content, context)` pairs in order.
    pub fn add_messages<C, X>(&mut self, pairs: impl IntoIterator<Item = (C, X)>)
    where
        C: Into<String>,
        X: Into<String>,
    {
        self.store.add_messages(pairs);
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn messages(&self) -> &[Message] {
        self.store.messages()
    }

    /// Raw token total of the stored history.
    pub fn total_tokens(&self) -> usize {
        self.store.total_tokens()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Raw usage of the unoptimized history against the budget.
    pub fn usage(&self) -> ContextUsage {
        ContextUsage::new(self.total_tokens(), self.config.max_tokens)
    }

    /// Fit the current history to the budget.
    pub fn optimize_context(&self) -> OptimizedContext {
        let start = Instant::now();
        let original_token_count = self.total_tokens();
        let original_message_count = self.store.len();

        let result = partition(
            self.store.messages(),
            self.target_tokens(),
            self.config.recent_zone_size,
            &self.config.compression,
        );

        let optimized_token_count: usize = result.messages.iter().map(Message::token_count).sum();
        let memory_savings = if original_token_count > 0 {
            1.0 - optimized_token_count as f64 / original_token_count as f64
        } else {
            0.0
        };
        let context_preservation = match result.strategy {
            ContextStrategy::Full => 1.0,
            ContextStrategy::SmartCompression if original_token_count > 0 => {
                PRESERVATION_FLOOR
                    + (optimized_token_count as f64 / original_token_count as f64)
                        * PRESERVATION_WEIGHT
            }
            ContextStrategy::SmartCompression => PRESERVATION_FLOOR,
        };

        let context_zones = calculate_context_zones(
            &result.messages,
            original_message_count,
            self.config.recent_zone_size,
        );
        let optimization_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        let metrics = OptimizationMetrics {
            original_message_count,
            optimized_message_count: result.messages.len(),
            original_token_count,
            optimized_token_count,
            compression_ratio: memory_savings,
            messages_compressed: result.compressed,
            messages_kept_full: result.kept_full,
            messages_dropped: result.dropped,
            context_zones,
            optimization_time_ms,
        };
        debug!(strategy = %result.strategy, "{}", metrics.to_log_string());

        OptimizedContext {
            messages: result.messages,
            strategy_used: result.strategy,
            memory_savings,
            context_preservation,
            optimization_metrics: metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn zero_budget_is_configuration_error() {
        assert!(matches!(
            Engine::new(0),
            Err(Error::Configuration {
                field: "max_tokens",
                ..
            })
        ));
    }

    #[test]
    fn empty_engine_optimizes_to_nothing() {
        let engine = Engine::new(8000).unwrap();
        let optimized = engine.optimize_context();
        assert!(optimized.messages.is_empty());
        assert_eq!(optimized.strategy_used, ContextStrategy::Full);
        assert_eq!(optimized.memory_savings, 0.0);
        assert_eq!(optimized.context_preservation, 1.0);
        assert_eq!(optimized.optimization_metrics.original_token_count, 0);
    }

    #[test]
    fn single_message_is_full() {
        let mut engine = Engine::new(8000).unwrap();
        engine.add_message("Single message", "");
        let optimized = engine.optimize_context();
        assert_eq!(optimized.messages.len(), 1);
        assert_eq!(optimized.strategy_used, ContextStrategy::Full);
    }

    #[test]
    fn full_strategy_reports_no_savings() {
        let mut engine = Engine::new(1000).unwrap();
        engine.add_messages((0..5).map(|i| (format!("message {i}"), "ctx")));
        let optimized = engine.optimize_context();
        let m = &optimized.optimization_metrics;

        assert_eq!(optimized.strategy_used, ContextStrategy::Full);
        assert_eq!(optimized.memory_savings, 0.0);
        assert_eq!(optimized.context_preservation, 1.0);
        assert_eq!(m.original_token_count, m.optimized_token_count);
        assert_eq!(m.compression_ratio, 0.0);
        assert_eq!((m.messages_compressed, m.messages_kept_full, m.messages_dropped), (0, 0, 0));
    }

    #[test]
    fn smart_compression_scores() {
        // Six 251-token messages, target 700: only the recent zone survives.
        let mut engine = Engine::new(1000).unwrap();
        engine.add_messages((0..6).map(|_| ("a".repeat(1000), "")));
        let optimized = engine.optimize_context();
        let m = &optimized.optimization_metrics;

        assert_eq!(optimized.strategy_used, ContextStrategy::SmartCompression);
        assert_eq!(m.original_token_count, 1506);
        assert_eq!(m.optimized_token_count, 1255);
        assert_eq!(m.messages_kept_full, 5);
        assert_eq!(m.messages_dropped, 1);

        let kept = 1255.0 / 1506.0;
        assert!((optimized.memory_savings - (1.0 - kept)).abs() < 1e-12);
        assert!((optimized.context_preservation - (0.70 + kept * 0.25)).abs() < 1e-12);
        assert_eq!(m.compression_ratio, optimized.memory_savings);
    }

    #[test]
    fn metrics_zone_counts_match_optimized_list() {
        let mut engine = Engine::new(1000).unwrap();
        engine.add_messages((0..3).map(|_| ("a".repeat(40), "")));
        engine.add_message("a".repeat(1000), "");
        engine.add_message("a".repeat(200), "");
        engine.add_messages((0..5).map(|_| ("a".repeat(400), "")));

        let optimized = engine.optimize_context();
        let m = &optimized.optimization_metrics;
        let zones = &m.context_zones;

        assert_eq!(m.optimized_message_count, optimized.messages.len());
        assert_eq!(
            zones.recent_zone_messages + zones.compressed_zone_messages,
            optimized.messages.len()
        );
        assert_eq!(zones.dropped_zone_messages, 10 - 7);
        assert_eq!(zones.dropped_zone_tokens, 0);
        assert_eq!(m.messages_compressed, 1);
        assert_eq!(m.messages_kept_full, 6);
    }

    #[test]
    fn optimize_does_not_mutate_store() {
        let mut engine = Engine::new(500).unwrap();
        engine.add_messages((0..12).map(|i| (format!("msg {i}"), "y".repeat(300))));
        let before = engine.messages().to_vec();

        let first = engine.optimize_context();
        let second = engine.optimize_context();

        assert_eq!(engine.messages(), before.as_slice());
        assert_eq!(first.messages, second.messages);
        assert_eq!(first.strategy_used, second.strategy_used);
    }

    #[test]
    fn custom_config_changes_target() {
        let config = EngineConfig::new(1000).with_target_fraction(0.5);
        let engine = Engine::with_config(config).unwrap();
        assert_eq!(engine.target_tokens(), 500);
        assert_eq!(engine.max_tokens(), 1000);
    }

    #[test]
    fn metrics_log_line() {
        let mut engine = Engine::new(8000).unwrap();
        engine.add_message("hello", "");
        let line = engine.optimize_context().optimization_metrics.to_log_string();
        assert!(line.starts_with("optimized: 1 -> 1 messages"));
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
        assert_send_sync::<OptimizedContext>();
    }
}
