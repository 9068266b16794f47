//! Deterministic single-message compression.
//!
//! Long fields are cut to a fixed-length prefix and tagged with
//! [`COMPRESSED_MARKER`]. No model call, no summarization. The result is a new
//! [`Message`] with the same id and a freshly estimated token count.

use crate::config::CompressionConfig;

use super::message::Message;

/// Suffix appended to every compressed field.
pub const COMPRESSED_MARKER: &str = "...[compressed]";

/// Shrink `message` according to `config`.
///
/// Not a fixed point: compressing an already compressed message may shrink it
/// again when the marker pushes a field back over its threshold.
pub fn compress_message(message: &Message, config: &CompressionConfig) -> Message {
    let content = shrink_field(
        message.content(),
        config.content_threshold,
        config.content_keep,
    );
    let context = shrink_field(
        message.context(),
        config.context_threshold,
        config.context_keep,
    );
    Message::new(message.id(), content, context)
}

/// Keep `text` when it has at most `threshold` characters; otherwise return
/// its first `keep` characters plus the marker.
fn shrink_field(text: &str, threshold: usize, keep: usize) -> String {
    if text.chars().count() <= threshold {
        return text.to_string();
    }
    let mut shrunk: String = text.chars().take(keep).collect();
    shrunk.push_str(COMPRESSED_MARKER);
    shrunk
}
