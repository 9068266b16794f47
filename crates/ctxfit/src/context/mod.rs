//! Message storage, token budgeting, compression, and zone layout.
//!
//! The building blocks the [`Engine`](crate::optimizer::Engine) composes:
//!
//! 1. **[`budget`]**: [`estimate_tokens`] (the approximate token contract),
//!    target computation, and [`ContextUsage`] snapshots.
//!
//! 2. **[`message`]**: immutable [`Message`] records and the append-only
//!    [`MessageStore`].
//!
//! 3. **[`compress`]**: deterministic prefix compression of a single message.
//!
//! 4. **[`layout`]**: the recent / compressed / dropped zone partitioner and
//!    the [`ZoneBreakdown`] view over an optimized history.

pub mod budget;
pub mod compress;
pub mod layout;
pub mod message;

pub use budget::{CHARS_PER_TOKEN, ContextUsage, estimate_tokens};
pub use compress::{COMPRESSED_MARKER, compress_message};
pub use layout::{ContextStrategy, Partition, ZoneBreakdown, calculate_context_zones, partition};
pub use message::{Message, MessageStore};
