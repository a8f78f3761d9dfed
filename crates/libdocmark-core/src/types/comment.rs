use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Comments tracked for one file, keyed by function name
pub type FunctionComments = BTreeMap<String, CommentFunction>;

/// The whole index, keyed by file path
pub type CommentState = BTreeMap<String, FunctionComments>;

/// A generated comment for a single function.
///
/// Only `marked` has meaning to the registry. Everything else is payload
/// owned by the host and is stored and returned verbatim, including fields
/// this crate does not know about (kept in `extra`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentFunction {
    /// Set once the comment has been inserted into its source document
    #[serde(default)]
    pub marked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Line the comment is anchored to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CommentFunction {
    /// An unmarked comment with the given text
    pub fn new(comment: impl Into<String>) -> Self {
        Self {
            comment: Some(comment.into()),
            ..Self::default()
        }
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn is_marked(&self) -> bool {
        self.marked
    }
}
