//! Messages and the append-only store that owns them.

use serde::Serialize;

use super::budget::estimate_tokens;

/// A single conversation message with a memoized token estimate.
///
/// Fields are read-only: the token count is computed once at construction
/// from `content` and `context`. Compression never edits a message; it
/// builds a replacement through [`Message::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    id: usize,
    content: String,
    context: String,
    token_count: usize,
}

impl Message {
    /// Build a message and estimate its tokens.
    pub fn new(id: usize, content: impl Into<String>, context: impl Into<String>) -> Self {
        let content = content.into();
        let context = context.into();
        let token_count = estimate_tokens(&content) + estimate_tokens(&context);
        Self {
            id,
            content,
            context,
            token_count,
        }
    }

    /// Position of the message in its store.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    /// Estimated tokens for content plus context.
    pub fn token_count(&self) -> usize {
        self.token_count
    }
}

/// Ordered, append-only sequence of messages.
///
/// There is no removal or reordering. Ids are dense and equal to each
/// message's index.
#[derive(Debug, Default, Clone)]
pub struct MessageStore {
    messages: Vec<Message>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return its id.
    pub fn add_message(&mut self, content: impl Into<String>, context: impl Into<String>) -> usize {
        let id = self.messages.len();
        self.messages.push(Message::new(id, content, context));
        id
    }

    /// Append several `(content, context)` pairs in order.
    pub fn add_messages<C, X>(&mut self, pairs: impl IntoIterator<Item = (C, X)>)
    where
        C: Into<String>,
        X: Into<String>,
    {
        for (content, context) in pairs {
            self.add_message(content, context);
        }
    }

    /// Sum of every stored message's token count.
    pub fn total_tokens(&self) -> usize {
        self.messages.iter().map(Message::token_count).sum()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, id: usize) -> Option<&Message> {
        self.messages.get(id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_count_sums_both_fields() {
        let msg = Message::new(0, "x".repeat(40), "y".repeat(100));
        assert_eq!(msg.token_count(), 10 + 25);
    }

    #[test]
    fn empty_fields_still_cost_tokens() {
        let msg = Message::new(3, "", "");
        assert_eq!(msg.token_count(), 2);
        assert_eq!(msg.id(), 3);
    }

    #[test]
    fn ids_follow_insertion_order() {
        let mut store = MessageStore::new();
        assert_eq!(store.add_message("first", ""), 0);
        assert_eq!(store.add_message("second", "ctx"), 1);
        assert_eq!(store.add_message("third", ""), 2);

        let ids: Vec<usize> = store.messages().iter().map(Message::id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(store.get(1).map(Message::content), Some("second"));
        assert!(store.get(3).is_none());
    }

    #[test]
    fn total_tokens_accumulates() {
        let mut store = MessageStore::new();
        assert_eq!(store.total_tokens(), 0);
        assert!(store.is_empty());

        store.add_messages([("x".repeat(400), String::new()), ("y".repeat(8), "z".repeat(20))]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.total_tokens(), (100 + 1) + (2 + 5));
    }
}
