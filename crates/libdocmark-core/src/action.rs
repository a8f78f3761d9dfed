use serde::{Deserialize, Serialize};

use crate::registry::CommentRegistry;
use crate::types::{CommentFunction, FunctionComments};

/// A dispatched change to the comment registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommentAction {
    UpdateComments {
        file_path: String,
        comments: FunctionComments,
    },
    UpdateSingleComment {
        file_path: String,
        function_name: String,
        comment_fn: CommentFunction,
    },
    AfterAddCommentToDoc {
        file_path: String,
        function_name: String,
    },
}

impl CommentAction {
    /// Wire tag for this action
    pub fn kind(&self) -> &'static str {
        match self {
            CommentAction::UpdateComments { .. } => "update_comments",
            CommentAction::UpdateSingleComment { .. } => "update_single_comment",
            CommentAction::AfterAddCommentToDoc { .. } => "after_add_comment_to_doc",
        }
    }

    pub fn file_path(&self) -> &str {
        match self {
            CommentAction::UpdateComments { file_path, .. }
            | CommentAction::UpdateSingleComment { file_path, .. }
            | CommentAction::AfterAddCommentToDoc { file_path, .. } => file_path,
        }
    }
}

impl CommentRegistry {
    /// Apply an action to the registry.
    ///
    /// Returns false only for a mark whose target is not tracked.
    pub fn apply(&mut self, action: &CommentAction) -> bool {
        match action {
            CommentAction::UpdateComments { file_path, comments } => {
                self.update_comments(file_path, comments.clone());
                true
            }
            CommentAction::UpdateSingleComment {
                file_path,
                function_name,
                comment_fn,
            } => {
                self.update_single_comment(file_path, function_name, comment_fn.clone());
                true
            }
            CommentAction::AfterAddCommentToDoc {
                file_path,
                function_name,
            } => self.after_add_comment_to_doc(file_path, function_name),
        }
    }

    /// Apply actions in order, returning how many had an effect
    pub fn apply_all<'a, I>(&mut self, actions: I) -> usize
    where
        I: IntoIterator<Item = &'a CommentAction>,
    {
        actions.into_iter().filter(|a| self.apply(a)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(file: &str, name: &str) -> CommentAction {
        CommentAction::UpdateSingleComment {
            file_path: file.to_string(),
            function_name: name.to_string(),
            comment_fn: CommentFunction::default(),
        }
    }

    fn mark(file: &str, name: &str) -> CommentAction {
        CommentAction::AfterAddCommentToDoc {
            file_path: file.to_string(),
            function_name: name.to_string(),
        }
    }

    #[test]
    fn test_deserialize_tagged_action() {
        let json = r#"{"type":"after_add_comment_to_doc","file_path":"a.ts","function_name":"foo"}"#;
        let action: CommentAction = serde_json::from_str(json).unwrap();
        assert_eq!(action, mark("a.ts", "foo"));
        assert_eq!(action.kind(), "after_add_comment_to_doc");
        assert_eq!(action.file_path(), "a.ts");
    }

    #[test]
    fn test_update_comments_action_from_json() {
        let json = r#"{"type":"update_comments","file_path":"a.ts","comments":{"foo":{"marked":false,"comment":"/** foo */"}}}"#;
        let action: CommentAction = serde_json::from_str(json).unwrap();

        let mut reg = CommentRegistry::new();
        assert!(reg.apply(&action));
        assert_eq!(reg.get("a.ts", "foo").unwrap().comment.as_deref(), Some("/** foo */"));
    }

    #[test]
    fn test_apply_all_counts_effective_actions() {
        let mut reg = CommentRegistry::new();
        let actions = vec![
            mark("a.ts", "foo"),
            single("a.ts", "foo"),
            mark("a.ts", "foo"),
            mark("a.ts", "bar"),
        ];
        assert_eq!(reg.apply_all(&actions), 2);
        assert!(reg.get("a.ts", "foo").unwrap().marked);
        assert!(reg.get("a.ts", "bar").is_none());
    }

    #[test]
    fn test_apply_matches_direct_calls() {
        let mut via_actions = CommentRegistry::new();
        via_actions.apply(&single("a.ts", "foo"));
        via_actions.apply(&mark("a.ts", "foo"));

        let mut direct = CommentRegistry::new();
        direct.update_single_comment("a.ts", "foo", CommentFunction::default());
        direct.after_add_comment_to_doc("a.ts", "foo");

        assert_eq!(via_actions, direct);
    }
}
