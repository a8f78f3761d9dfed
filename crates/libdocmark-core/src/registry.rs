//! In-memory index of generated comments, keyed by file path then function name.
//!
//! The registry is single-owner: every mutation takes `&mut self`. Hosts that
//! share it across threads or processes are responsible for serializing
//! writers (the CLI does this with a lock file, see [`crate::snapshot`]).

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::{CommentFunction, CommentState, FunctionComments};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentRegistry {
    files: CommentState,
}

impl CommentRegistry {
    /// Empty registry (`{}`), the state every session starts from
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(files: CommentState) -> Self {
        Self { files }
    }

    pub fn into_state(self) -> CommentState {
        self.files
    }

    /// Replace every tracked comment for `file_path` with `comments`.
    ///
    /// Functions previously tracked for the file but absent from `comments`
    /// are dropped.
    pub fn update_comments(&mut self, file_path: &str, comments: FunctionComments) {
        debug!(file = file_path, count = comments.len(), "replacing file comments");
        self.files.insert(file_path.to_string(), comments);
    }

    /// Set the comment for one function, creating the file entry if needed.
    pub fn update_single_comment(
        &mut self,
        file_path: &str,
        function_name: &str,
        comment_fn: CommentFunction,
    ) {
        debug!(file = file_path, function = function_name, "setting comment");
        self.files
            .entry(file_path.to_string())
            .or_default()
            .insert(function_name.to_string(), comment_fn);
    }

    /// Mark a comment as inserted into its document.
    ///
    /// Unknown file or function is a no-op. Returns whether an entry was found.
    pub fn after_add_comment_to_doc(&mut self, file_path: &str, function_name: &str) -> bool {
        match self
            .files
            .get_mut(file_path)
            .and_then(|functions| functions.get_mut(function_name))
        {
            Some(comment_fn) => {
                debug!(file = file_path, function = function_name, "marking comment");
                comment_fn.marked = true;
                true
            }
            None => {
                warn!(
                    file = file_path,
                    function = function_name,
                    "no tracked comment to mark"
                );
                false
            }
        }
    }

    pub fn state(&self) -> &CommentState {
        &self.files
    }

    pub fn file(&self, file_path: &str) -> Option<&FunctionComments> {
        self.files.get(file_path)
    }

    pub fn get(&self, file_path: &str, function_name: &str) -> Option<&CommentFunction> {
        self.files.get(file_path)?.get(function_name)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Total number of tracked comments across all files
    pub fn comment_count(&self) -> usize {
        self.files.values().map(|f| f.len()).sum()
    }

    /// Every tracked comment as `(file, function, comment)`, in path then name order
    pub fn comments(&self) -> impl Iterator<Item = (&str, &str, &CommentFunction)> {
        self.files.iter().flat_map(|(path, functions)| {
            functions
                .iter()
                .map(move |(name, c)| (path.as_str(), name.as_str(), c))
        })
    }

    /// Comments not yet inserted into their documents
    pub fn unmarked(&self) -> impl Iterator<Item = (&str, &str, &CommentFunction)> {
        self.comments().filter(|(_, _, c)| !c.marked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unmarked() -> CommentFunction {
        CommentFunction::default()
    }

    fn comments(entries: &[(&str, CommentFunction)]) -> FunctionComments {
        entries
            .iter()
            .map(|(name, c)| (name.to_string(), c.clone()))
            .collect()
    }

    #[test]
    fn test_update_comments_creates_file() {
        let mut reg = CommentRegistry::new();
        let c = comments(&[("foo", CommentFunction::new("/** foo */"))]);
        reg.update_comments("a.ts", c.clone());
        assert_eq!(reg.file("a.ts"), Some(&c));
        assert_eq!(reg.file_count(), 1);
    }

    #[test]
    fn test_update_comments_replaces_without_merge() {
        let mut reg = CommentRegistry::new();
        reg.update_comments("a.ts", comments(&[("foo", unmarked()), ("bar", unmarked())]));
        reg.update_comments("a.ts", comments(&[("baz", unmarked())]));

        let file = reg.file("a.ts").unwrap();
        assert_eq!(file.len(), 1);
        assert!(file.contains_key("baz"));
        assert!(reg.get("a.ts", "foo").is_none());
    }

    #[test]
    fn test_update_comments_empty_keeps_entry() {
        let mut reg = CommentRegistry::new();
        reg.update_comments("a.ts", comments(&[("foo", unmarked())]));
        reg.update_comments("a.ts", FunctionComments::new());
        assert_eq!(reg.file("a.ts"), Some(&FunctionComments::new()));
        assert_eq!(reg.comment_count(), 0);
    }

    #[test]
    fn test_update_single_comment_leaves_siblings() {
        let mut reg = CommentRegistry::new();
        let foo = CommentFunction::new("/** foo */").with_line(4);
        reg.update_comments("a.ts", comments(&[("foo", foo.clone())]));
        reg.update_single_comment("a.ts", "bar", unmarked());

        assert_eq!(reg.get("a.ts", "foo"), Some(&foo));
        assert_eq!(reg.get("a.ts", "bar"), Some(&unmarked()));
    }

    #[test]
    fn test_update_single_comment_overwrites() {
        let mut reg = CommentRegistry::new();
        reg.update_single_comment("a.ts", "foo", CommentFunction::new("old"));
        reg.update_single_comment("a.ts", "foo", CommentFunction::new("new"));
        assert_eq!(reg.get("a.ts", "foo").unwrap().comment.as_deref(), Some("new"));
        assert_eq!(reg.comment_count(), 1);
    }

    #[test]
    fn test_update_single_comment_idempotent() {
        let c = CommentFunction::new("/** x */");
        let mut once = CommentRegistry::new();
        once.update_single_comment("b.rs", "x", c.clone());

        let mut twice = CommentRegistry::new();
        twice.update_single_comment("b.rs", "x", c.clone());
        twice.update_single_comment("b.rs", "x", c);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_mark_sets_only_marked() {
        let mut reg = CommentRegistry::new();
        let mut foo = CommentFunction::new("/** foo */").with_line(12);
        foo.extra.insert("author".into(), serde_json::json!("bot"));
        reg.update_comments("a.ts", comments(&[("foo", foo.clone()), ("bar", unmarked())]));

        assert!(reg.after_add_comment_to_doc("a.ts", "foo"));

        let marked = reg.get("a.ts", "foo").unwrap();
        assert!(marked.marked);
        assert_eq!(marked.comment, foo.comment);
        assert_eq!(marked.line, Some(12));
        assert_eq!(marked.extra, foo.extra);
        assert!(!reg.get("a.ts", "bar").unwrap().marked);
    }

    #[test]
    fn test_mark_unknown_file_is_noop() {
        let mut reg = CommentRegistry::new();
        assert!(!reg.after_add_comment_to_doc("unknown.ts", "foo"));
        assert!(reg.is_empty());
        assert_eq!(serde_json::to_string(&reg).unwrap(), "{}");
    }

    #[test]
    fn test_mark_unknown_function_is_noop() {
        let mut reg = CommentRegistry::new();
        reg.update_comments("a.ts", comments(&[("foo", unmarked())]));
        let before = reg.clone();

        assert!(!reg.after_add_comment_to_doc("a.ts", "missing"));
        assert_eq!(reg, before);
    }

    #[test]
    fn test_mark_twice_stays_marked() {
        let mut reg = CommentRegistry::new();
        reg.update_single_comment("a.ts", "foo", unmarked());
        reg.after_add_comment_to_doc("a.ts", "foo");
        reg.after_add_comment_to_doc("a.ts", "foo");
        assert!(reg.get("a.ts", "foo").unwrap().is_marked());
    }

    #[test]
    fn test_unmarked_iterates_in_order() {
        let mut reg = CommentRegistry::new();
        reg.update_single_comment("b.ts", "z", unmarked());
        reg.update_single_comment("a.ts", "y", unmarked());
        reg.update_single_comment("a.ts", "x", unmarked());
        reg.after_add_comment_to_doc("a.ts", "y");

        let pending: Vec<(&str, &str)> = reg.unmarked().map(|(p, n, _)| (p, n)).collect();
        assert_eq!(pending, vec![("a.ts", "x"), ("b.ts", "z")]);
    }

    #[test]
    fn test_comments_flattens_all_files() {
        let mut reg = CommentRegistry::new();
        reg.update_single_comment("b.ts", "z", unmarked());
        reg.update_comments("a.ts", comments(&[("y", unmarked()), ("x", unmarked())]));
        reg.after_add_comment_to_doc("a.ts", "x");

        let all: Vec<(&str, &str, bool)> = reg.comments().map(|(p, n, c)| (p, n, c.marked)).collect();
        assert_eq!(all, vec![("a.ts", "x", true), ("a.ts", "y", false), ("b.ts", "z", false)]);
        assert_eq!(all.len(), reg.comment_count());
    }

    #[test]
    fn test_from_state_roundtrip() {
        let mut state = CommentState::new();
        state.insert("a.ts".to_string(), comments(&[("foo", unmarked())]));

        let mut reg = CommentRegistry::from_state(state.clone());
        assert_eq!(reg.state(), &state);
        reg.after_add_comment_to_doc("a.ts", "foo");

        let out = reg.into_state();
        assert!(out["a.ts"]["foo"].marked);
    }

    #[test]
    fn test_state_serializes_as_nested_object() {
        let mut reg = CommentRegistry::new();
        reg.update_single_comment("a.ts", "foo", unmarked());
        let json = serde_json::to_value(&reg).unwrap();
        assert_eq!(json, serde_json::json!({"a.ts": {"foo": {"marked": false}}}));
    }
}
