//! Classification and recommendations layered over an optimization pass.
//!
//! [`Engine::get_analytics`] runs a fresh [`Engine::optimize_context`] and
//! derives from it, plus the raw store counters:
//!
//! - [`MemoryPressure`] from raw (unoptimized) usage of the budget,
//! - [`OptimizationFrequency`] from the number of stored messages,
//! - an efficiency score trading savings against preservation,
//! - zero or more independent [`Recommendation`]s.
//!
//! The classifiers are plain functions so callers holding an
//! [`OptimizedContext`] from elsewhere can reuse them without a second pass.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::context::{ContextStrategy, ContextUsage};
use crate::optimizer::{Engine, OptimizationMetrics, OptimizedContext};

/// Usage below this fraction of the budget is [`MemoryPressure::Low`].
const MEDIUM_PRESSURE_THRESHOLD: f64 = 0.80;
/// Usage below this fraction of the budget is [`MemoryPressure::Medium`].
const HIGH_PRESSURE_THRESHOLD: f64 = 0.95;

/// Savings below this fraction on a long history suggest enabling compression.
const LOW_SAVINGS_THRESHOLD: f64 = 0.1;
/// Histories longer than this are considered long.
const LONG_HISTORY_MESSAGES: usize = 10;
/// Preservation below this suggests keeping more context.
const MIN_PRESERVATION: f64 = 0.7;
/// Passes slower than this (ms) suggest optimizing performance.
const SLOW_OPTIMIZATION_MS: f64 = 50.0;
/// Penalty applied per unit of memory savings in the efficiency score.
const SAVINGS_PENALTY: f64 = 0.3;

/// Raw usage of the budget before optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MemoryPressure {
    /// Below 80% of the budget.
    Low,
    /// 80% up to 95%.
    Medium,
    /// 95% and above.
    High,
}

impl MemoryPressure {
    /// Classify a usage fraction (`total_tokens / max_tokens`).
    pub fn from_usage(usage_pct: f64) -> Self {
        if usage_pct < MEDIUM_PRESSURE_THRESHOLD {
            MemoryPressure::Low
        } else if usage_pct < HIGH_PRESSURE_THRESHOLD {
            MemoryPressure::Medium
        } else {
            MemoryPressure::High
        }
    }
}

impl fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "Low"),
            MemoryPressure::Medium => write!(f, "Medium"),
            MemoryPressure::High => write!(f, "High"),
        }
    }
}

/// How often a history of this length needs optimizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OptimizationFrequency {
    /// Up to 5 messages.
    Rare,
    /// 6 to 15 messages.
    Occasional,
    /// 16 to 30 messages.
    Frequent,
    /// More than 30 messages.
    Constant,
}

impl OptimizationFrequency {
    pub fn from_message_count(count: usize) -> Self {
        match count {
            0..=5 => OptimizationFrequency::Rare,
            6..=15 => OptimizationFrequency::Occasional,
            16..=30 => OptimizationFrequency::Frequent,
            _ => OptimizationFrequency::Constant,
        }
    }
}

impl fmt::Display for OptimizationFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizationFrequency::Rare => write!(f, "Rare"),
            OptimizationFrequency::Occasional => write!(f, "Occasional"),
            OptimizationFrequency::Frequent => write!(f, "Frequent"),
            OptimizationFrequency::Constant => write!(f, "Constant"),
        }
    }
}

/// Suggested tuning action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Recommendation {
    /// A long history is barely being reduced.
    EnableSmartCompression,
    /// Preservation fell below 0.7.
    PreserveMoreContext,
    /// The pass took longer than 50ms.
    OptimizePerformance,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::EnableSmartCompression => write!(f, "EnableSmartCompression"),
            Recommendation::PreserveMoreContext => write!(f, "PreserveMoreContext"),
            Recommendation::OptimizePerformance => write!(f, "OptimizePerformance"),
        }
    }
}

/// Efficiency of an optimization: `preservation * (1 - savings * 0.3)` when
/// anything was saved, `1.0` otherwise.
pub fn efficiency_score(optimized: &OptimizedContext) -> f64 {
    if optimized.memory_savings > 0.0 {
        optimized.context_preservation * (1.0 - optimized.memory_savings * SAVINGS_PENALTY)
    } else {
        1.0
    }
}

/// Evaluate every recommendation rule in order. Rules are independent; any
/// subset may fire.
pub fn recommendations_for(optimized: &OptimizedContext, message_count: usize) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();
    if optimized.memory_savings < LOW_SAVINGS_THRESHOLD && message_count > LONG_HISTORY_MESSAGES {
        recommendations.push(Recommendation::EnableSmartCompression);
    }
    if optimized.context_preservation < MIN_PRESERVATION {
        recommendations.push(Recommendation::PreserveMoreContext);
    }
    if optimized.optimization_metrics.optimization_time_ms > SLOW_OPTIMIZATION_MS {
        recommendations.push(Recommendation::OptimizePerformance);
    }
    recommendations
}

/// Classified view of an engine's state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analytics {
    pub current_strategy: ContextStrategy,
    pub efficiency_score: f64,
    pub memory_pressure: MemoryPressure,
    pub optimization_frequency: OptimizationFrequency,
    pub performance_metrics: OptimizationMetrics,
    pub recommendations: Vec<Recommendation>,
}

impl Analytics {
    /// Classify an optimization pass given the raw usage and message count
    /// it was computed from.
    pub fn from_optimization(
        optimized: OptimizedContext,
        usage: &ContextUsage,
        message_count: usize,
    ) -> Self {
        let recommendations = recommendations_for(&optimized, message_count);
        Self {
            current_strategy: optimized.strategy_used,
            efficiency_score: efficiency_score(&optimized),
            memory_pressure: MemoryPressure::from_usage(usage.usage_pct),
            optimization_frequency: OptimizationFrequency::from_message_count(message_count),
            performance_metrics: optimized.optimization_metrics,
            recommendations,
        }
    }
}

impl Engine {
    /// Run a fresh optimization pass and classify it.
    pub fn get_analytics(&self) -> Analytics {
        let optimized = self.optimize_context();
        let usage = self.usage();
        debug!("{}", usage.to_log_string());

        let analytics = Analytics::from_optimization(optimized, &usage, self.len());
        debug!(
            strategy = %analytics.current_strategy,
            pressure = %analytics.memory_pressure,
            frequency = %analytics.optimization_frequency,
            efficiency = analytics.efficiency_score,
            "analytics computed"
        );
        for recommendation in &analytics.recommendations {
            info!(%recommendation, "optimization recommendation");
        }
        analytics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(max_tokens: usize, count: usize, content: &str, context: &str) -> Engine {
        let mut engine = Engine::new(max_tokens).unwrap();
        engine.add_messages((0..count).map(|i| (format!("{content} {i}"), context.to_string())));
        engine
    }

    #[test]
    fn pressure_boundaries() {
        assert_eq!(MemoryPressure::from_usage(0.0), MemoryPressure::Low);
        assert_eq!(MemoryPressure::from_usage(0.79), MemoryPressure::Low);
        assert_eq!(MemoryPressure::from_usage(0.8), MemoryPressure::Medium);
        assert_eq!(MemoryPressure::from_usage(0.949), MemoryPressure::Medium);
        assert_eq!(MemoryPressure::from_usage(0.95), MemoryPressure::High);
        assert_eq!(MemoryPressure::from_usage(3.0), MemoryPressure::High);
    }

    #[test]
    fn frequency_boundaries() {
        let cases = [
            (0, OptimizationFrequency::Rare),
            (5, OptimizationFrequency::Rare),
            (6, OptimizationFrequency::Occasional),
            (15, OptimizationFrequency::Occasional),
            (16, OptimizationFrequency::Frequent),
            (30, OptimizationFrequency::Frequent),
            (31, OptimizationFrequency::Constant),
        ];
        for (count, expected) in cases {
            assert_eq!(OptimizationFrequency::from_message_count(count), expected, "count {count}");
        }
    }

    #[test]
    fn pressure_uses_raw_usage() {
        // 400 tokens of 500: Medium, even though the optimized view is smaller.
        let mut engine = Engine::new(500).unwrap();
        engine.add_messages((0..8).map(|_| ("a".repeat(196), "")));
        assert_eq!(engine.total_tokens(), 400);
        assert_eq!(engine.get_analytics().memory_pressure, MemoryPressure::Medium);
    }

    #[test]
    fn efficiency_is_one_without_savings() {
        let engine = engine_with(8000, 4, "short", "");
        let analytics = engine.get_analytics();
        assert_eq!(analytics.current_strategy, ContextStrategy::Full);
        assert_eq!(analytics.efficiency_score, 1.0);
    }

    #[test]
    fn efficiency_penalizes_savings() {
        let mut engine = Engine::new(1000).unwrap();
        engine.add_messages((0..6).map(|_| ("a".repeat(1000), "")));
        let optimized = engine.optimize_context();
        let expected = optimized.context_preservation * (1.0 - optimized.memory_savings * 0.3);
        assert!((efficiency_score(&optimized) - expected).abs() < 1e-12);
        assert!(efficiency_score(&optimized) < optimized.context_preservation);
    }

    #[test]
    fn long_history_without_savings_recommends_compression() {
        let engine = engine_with(2000, 25, "Large message with substantial content", &"x".repeat(100));
        let analytics = engine.get_analytics();
        assert_eq!(analytics.current_strategy, ContextStrategy::Full);
        assert!(analytics.recommendations.contains(&Recommendation::EnableSmartCompression));
    }

    #[test]
    fn short_history_gets_no_compression_advice() {
        let engine = engine_with(8000, 10, "Message", "");
        let optimized = engine.optimize_context();
        assert!(recommendations_for(&optimized, 10).is_empty());
    }

    #[test]
    fn low_preservation_and_slow_pass_fire_in_order() {
        let engine = engine_with(8000, 12, "Message", "");
        let mut optimized = engine.optimize_context();
        optimized.context_preservation = 0.65;
        optimized.optimization_metrics.optimization_time_ms = 75.0;

        assert_eq!(
            recommendations_for(&optimized, 12),
            vec![
                Recommendation::EnableSmartCompression,
                Recommendation::PreserveMoreContext,
                Recommendation::OptimizePerformance,
            ]
        );
    }

    #[test]
    fn from_optimization_carries_metrics() {
        let engine = engine_with(500, 10, "This is a longer message", &"x".repeat(200));
        let optimized = engine.optimize_context();
        let metrics = optimized.optimization_metrics.clone();
        let analytics = Analytics::from_optimization(optimized, &engine.usage(), engine.len());

        assert_eq!(analytics.performance_metrics, metrics);
        assert_eq!(analytics.optimization_frequency, OptimizationFrequency::Occasional);
        assert_eq!(analytics.memory_pressure, MemoryPressure::High);
    }

    #[test]
    fn display_names() {
        assert_eq!(MemoryPressure::Medium.to_string(), "Medium");
        assert_eq!(OptimizationFrequency::Constant.to_string(), "Constant");
        assert_eq!(
            Recommendation::EnableSmartCompression.to_string(),
            "EnableSmartCompression"
        );
    }
}
