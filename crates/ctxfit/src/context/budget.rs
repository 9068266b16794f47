//! Token estimation and budget usage snapshots.
//!
//! Token accounting here is an approximation contract, not a tokenizer: one
//! token per [`CHARS_PER_TOKEN`] characters, floored, with a minimum of one
//! token per field. Downstream request builders must still check the real
//! model limit.

use serde::Serialize;

/// Characters per estimated token.
pub const CHARS_PER_TOKEN: usize = 4;

/// Estimate the token count of `text`.
///
/// Returns `max(1, chars / 4)`. Empty text still costs one token.
///
/// ```
/// use ctxfit::context::estimate_tokens;
///
/// assert_eq!(estimate_tokens(""), 1);
/// assert_eq!(estimate_tokens("abcdefgh"), 2);
/// ```
pub fn estimate_tokens(text: &str) -> usize {
    (text.chars().count() / CHARS_PER_TOKEN).max(1)
}

/// Token target for a budget: `floor(max_tokens * fraction)`.
pub fn target_tokens(max_tokens: usize, fraction: f64) -> usize {
    (max_tokens as f64 * fraction) as usize
}

/// Snapshot of raw (unoptimized) usage against the budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextUsage {
    /// Estimated tokens held by the store.
    pub estimated_tokens: usize,
    /// Token budget.
    pub max_tokens: usize,
    /// Usage as a fraction (0.0 to 1.0+).
    pub usage_pct: f64,
}

impl ContextUsage {
    pub fn new(estimated_tokens: usize, max_tokens: usize) -> Self {
        let usage_pct = if max_tokens > 0 {
            estimated_tokens as f64 / max_tokens as f64
        } else {
            1.0
        };
        Self {
            estimated_tokens,
            max_tokens,
            usage_pct,
        }
    }

    /// Format as a short log-friendly string.
    pub fn to_log_string(&self) -> String {
        format!(
            "context: ~{} tokens ({:.0}% of {})",
            self.estimated_tokens,
            self.usage_pct * 100.0,
            self.max_tokens,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_costs_one_token() {
        assert_eq!(estimate_tokens(""), 1);
        assert_eq!(estimate_tokens("abc"), 1);
    }

    #[test]
    fn estimate_floors_division() {
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens(&"x".repeat(7)), 1);
        assert_eq!(estimate_tokens(&"x".repeat(8)), 2);
        assert_eq!(estimate_tokens(&"x".repeat(1000)), 250);
    }

    #[test]
    fn estimate_counts_characters_not_bytes() {
        // Eight two-byte characters.
        assert_eq!(estimate_tokens("éééééééé"), 2);
    }

    #[test]
    fn target_is_floored() {
        assert_eq!(target_tokens(8000, 0.7), 5600);
        assert_eq!(target_tokens(2000, 0.7), 1400);
        assert_eq!(target_tokens(15, 0.7), 10);
        assert_eq!(target_tokens(1, 0.7), 0);
    }

    #[test]
    fn usage_fraction() {
        let usage = ContextUsage::new(400, 500);
        assert!((usage.usage_pct - 0.8).abs() < 1e-12);
        assert_eq!(usage.to_log_string(), "context: ~400 tokens (80% of 500)");
    }

    #[test]
    fn usage_with_zero_budget_saturates() {
        let usage = ContextUsage::new(10, 0);
        assert!((usage.usage_pct - 1.0).abs() < f64::EPSILON);
    }
}
