//! Zone partitioning of a message history against a token target.
//!
//! Every optimized history is laid out as three disjoint zones:
//! 1. **Recent zone**: the last N messages (default 5), kept verbatim and
//!    unconditionally, even when they alone exceed the target.
//! 2. **Compressed zone**: older messages that survived, verbatim when they
//!    fit and shrunk by [`compress_message`] when they did not.
//! 3. **Dropped zone**: everything else.
//!
//! The partitioner is a two-state machine. Histories at or under the target
//! pass through untouched ([`ContextStrategy::Full`]); anything larger goes
//! through [`ContextStrategy::SmartCompression`].

use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::config::CompressionConfig;

use super::compress::compress_message;
use super::message::Message;

/// Which path the partitioner took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContextStrategy {
    /// Total tokens within target; nothing changed.
    Full,
    /// Older messages were compressed or dropped to approach the target.
    SmartCompression,
}

impl fmt::Display for ContextStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextStrategy::Full => write!(f, "Full"),
            ContextStrategy::SmartCompression => write!(f, "SmartCompression"),
        }
    }
}

/// Result of partitioning a history.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// Surviving messages in chronological order.
    pub messages: Vec<Message>,
    pub strategy: ContextStrategy,
    /// Older messages kept in compressed form.
    pub compressed: usize,
    /// Messages kept verbatim, recent zone included.
    pub kept_full: usize,
    /// Messages explicitly rejected after a failed compression attempt.
    ///
    /// Messages older than the one where the scan stopped are never
    /// examined and are not counted here.
    pub dropped: usize,
}

/// Partition `messages` against `target_tokens`.
///
/// Under smart compression the recent zone is taken first, then older
/// messages are scanned newest to oldest. A message that fits is kept as is.
/// The first one that does not fit gets a single compression attempt (kept
/// if the compressed form fits, dropped otherwise) and the scan stops there:
/// every older message is left out without being examined.
pub fn partition(
    messages: &[Message],
    target_tokens: usize,
    recent_zone_size: usize,
    compression: &CompressionConfig,
) -> Partition {
    let total: usize = messages.iter().map(Message::token_count).sum();
    if total <= target_tokens {
        return Partition {
            messages: messages.to_vec(),
            strategy: ContextStrategy::Full,
            compressed: 0,
            kept_full: 0,
            dropped: 0,
        };
    }

    let recent_len = recent_zone_size.min(messages.len());
    let (older, recent) = messages.split_at(messages.len() - recent_len);

    let mut running: usize = recent.iter().map(Message::token_count).sum();
    let mut kept_full = recent.len();
    let mut compressed = 0;
    let mut dropped = 0;

    // Collected newest first, reversed before the recent zone is appended.
    let mut survivors = Vec::with_capacity(older.len());
    for message in older.iter().rev() {
        let tokens = message.token_count();
        if running + tokens <= target_tokens {
            running += tokens;
            kept_full += 1;
            survivors.push(message.clone());
            continue;
        }

        let shrunk = compress_message(message, compression);
        if running + shrunk.token_count() <= target_tokens {
            trace!(
                id = message.id(),
                from = tokens,
                to = shrunk.token_count(),
                "compressed message"
            );
            running += shrunk.token_count();
            compressed += 1;
            survivors.push(shrunk);
        } else {
            trace!(id = message.id(), tokens, "dropped message");
            dropped += 1;
        }
        break;
    }

    survivors.reverse();
    survivors.extend_from_slice(recent);

    Partition {
        messages: survivors,
        strategy: ContextStrategy::SmartCompression,
        compressed,
        kept_full,
        dropped,
    }
}

/// Per-zone message and token counts for an optimized history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneBreakdown {
    pub recent_zone_messages: usize,
    pub compressed_zone_messages: usize,
    pub dropped_zone_messages: usize,
    pub recent_zone_tokens: usize,
    pub compressed_zone_tokens: usize,
    /// Always `0`: dropped messages are not tracked individually.
    pub dropped_zone_tokens: usize,
}

/// Derive the zone breakdown of an optimized `view` of a history that
/// originally held `original_count` messages.
///
/// The recent zone is the last `min(recent_zone_size, view.len())` messages
/// of the view; everything before it counts as the compressed zone.
pub fn calculate_context_zones(
    view: &[Message],
    original_count: usize,
    recent_zone_size: usize,
) -> ZoneBreakdown {
    let recent_len = recent_zone_size.min(view.len());
    let (older, recent) = view.split_at(view.len() - recent_len);

    ZoneBreakdown {
        recent_zone_messages: recent.len(),
        compressed_zone_messages: older.len(),
        dropped_zone_messages: original_count.saturating_sub(view.len()),
        recent_zone_tokens: recent.iter().map(Message::token_count).sum(),
        compressed_zone_tokens: older.iter().map(Message::token_count).sum(),
        dropped_zone_tokens: 0,
    }
}
