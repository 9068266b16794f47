//! JSON Lines loader for `(content, context)` histories.
//!
//! One object per line:
//!
//! ```text
//! {"content": "How do I read a file?", "context": "src/main.rs"}
//! {"content": "Use std::fs::read_to_string."}
//! ```
//!
//! `context` is optional and defaults to the empty string. Blank lines are
//! skipped. Line numbers in errors are 1-based.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
struct MessageRecord {
    content: String,
    #[serde(default)]
    context: String,
}

/// Read `(content, context)` pairs from JSON Lines.
pub fn read_messages<R: BufRead>(reader: R) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: MessageRecord = serde_json::from_str(&line).map_err(|source| Error::Input {
            line: index + 1,
            source,
        })?;
        pairs.push((record.content, record.context));
    }
    debug!(count = pairs.len(), "loaded message records");
    Ok(pairs)
}

/// Read `(content, context)` pairs from a JSON Lines file.
pub fn read_messages_from_path(path: &Path) -> Result<Vec<(String, String)>> {
    let file = File::open(path)?;
    read_messages(BufReader::new(file))
}
