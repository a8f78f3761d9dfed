use std::io::Read;
use std::path::Path;

use libdocmark_core::snapshot::{load_snapshot, with_snapshot};
use libdocmark_core::{CommentAction, CommentFunction, CommentRegistry, DocmarkError, FunctionComments};

use crate::cli::{Cli, CommentsCommand};
use crate::context::DocmarkContext;
use crate::output::{output_success, print_comment_table, print_human};

pub fn run(cli: &Cli, cmd: CommentsCommand) -> Result<(), DocmarkError> {
    let ctx = DocmarkContext::resolve(cli)?;
    match cmd {
        CommentsCommand::Show { file, unmarked } => run_show(cli, &ctx, file, unmarked),
        CommentsCommand::Set { file, function, comment, line, marked } => {
            require_key("file path", &file)?;
            require_key("function name", &function)?;
            let comment_fn = CommentFunction {
                marked,
                comment,
                line,
                ..CommentFunction::default()
            };
            run_set(cli, &ctx, file, function, comment_fn)
        }
        CommentsCommand::Replace { file, from } => {
            require_key("file path", &file)?;
            run_replace(cli, &ctx, file, &from)
        }
        CommentsCommand::Mark { file, function } => {
            require_key("file path", &file)?;
            require_key("function name", &function)?;
            run_mark(cli, &ctx, file, function)
        }
        CommentsCommand::Apply { from } => run_apply(cli, &ctx, &from),
        CommentsCommand::Clear => run_clear(cli, &ctx),
    }
}

fn run_show(cli: &Cli, ctx: &DocmarkContext, file: Option<String>, unmarked: bool) -> Result<(), DocmarkError> {
    let registry = load_snapshot(&ctx.snapshot_path())?;

    if let Some(path) = &file {
        if registry.file(path).is_none() {
            return Err(DocmarkError::NotFound(format!("No comments tracked for '{}'", path)));
        }
    }

    if !cli.json {
        let rows: Vec<_> = registry
            .comments()
            .filter(|(path, _, c)| {
                file.as_deref().map_or(true, |f| f == *path) && !(unmarked && c.marked)
            })
            .collect();
        print_comment_table(cli, &rows);
        let pending = rows.iter().filter(|(_, _, c)| !c.marked).count();
        print_human(cli, &format!("{} comments, {} not yet inserted", rows.len(), pending));
        return Ok(());
    }

    if unmarked {
        let pending: Vec<serde_json::Value> = registry
            .unmarked()
            .filter(|(path, _, _)| file.as_deref().map_or(true, |f| f == *path))
            .map(|(path, name, c)| {
                serde_json::json!({
                    "file": path,
                    "function": name,
                    "comment": c,
                })
            })
            .collect();
        let output = serde_json::json!({
            "unmarked": pending,
            "count": pending.len(),
        });
        return output_success(cli, &output);
    }

    match file {
        Some(path) => {
            let comments = registry.file(&path).cloned().unwrap_or_default();
            let output = serde_json::json!({
                "file": path,
                "comments": comments,
                "count": comments.len(),
            });
            output_success(cli, &output)
        }
        None => {
            let output = serde_json::json!({
                "files": registry.state(),
                "file_count": registry.file_count(),
                "comment_count": registry.comment_count(),
            });
            output_success(cli, &output)
        }
    }
}

fn run_set(
    cli: &Cli,
    ctx: &DocmarkContext,
    file: String,
    function: String,
    comment_fn: CommentFunction,
) -> Result<(), DocmarkError> {
    let action = CommentAction::UpdateSingleComment {
        file_path: file.clone(),
        function_name: function.clone(),
        comment_fn,
    };
    dispatch(ctx, &action)?;

    let output = serde_json::json!({
        "file": file,
        "function": function,
        "action": action.kind(),
    });
    report(cli, &output, &format!("Set comment for {} in {}", function, file))
}

fn run_replace(cli: &Cli, ctx: &DocmarkContext, file: String, from: &Path) -> Result<(), DocmarkError> {
    let comments = read_comments(from)?;
    let count = comments.len();
    let action = CommentAction::UpdateComments {
        file_path: file.clone(),
        comments,
    };
    dispatch(ctx, &action)?;

    let output = serde_json::json!({
        "file": file,
        "count": count,
        "action": action.kind(),
    });
    report(cli, &output, &format!("Replaced comments for {} ({} functions)", file, count))
}

fn run_mark(cli: &Cli, ctx: &DocmarkContext, file: String, function: String) -> Result<(), DocmarkError> {
    let action = CommentAction::AfterAddCommentToDoc {
        file_path: file.clone(),
        function_name: function.clone(),
    };
    let found = dispatch(ctx, &action)?;

    let output = serde_json::json!({
        "file": file,
        "function": function,
        "found": found,
        "action": action.kind(),
    });
    let msg = if found {
        format!("Marked {} in {}", function, file)
    } else {
        format!("No comment tracked for {} in {}; nothing to mark", function, file)
    };
    report(cli, &output, &msg)
}

fn run_apply(cli: &Cli, ctx: &DocmarkContext, from: &Path) -> Result<(), DocmarkError> {
    let actions = read_actions(from)?;
    let applied = with_snapshot(&ctx.snapshot_path(), ctx.lock_timeout(), |reg| reg.apply_all(&actions))?;

    let output = serde_json::json!({
        "actions": actions.len(),
        "applied": applied,
    });
    report(cli, &output, &format!("Applied {} of {} actions", applied, actions.len()))
}

fn run_clear(cli: &Cli, ctx: &DocmarkContext) -> Result<(), DocmarkError> {
    let cleared = with_snapshot(&ctx.snapshot_path(), ctx.lock_timeout(), |reg| {
        let count = reg.file_count();
        *reg = CommentRegistry::new();
        count
    })?;

    let output = serde_json::json!({ "cleared_files": cleared });
    report(cli, &output, &format!("Cleared {} files", cleared))
}

/// Apply one action to the snapshot under its lock
fn dispatch(ctx: &DocmarkContext, action: &CommentAction) -> Result<bool, DocmarkError> {
    with_snapshot(&ctx.snapshot_path(), ctx.lock_timeout(), |reg| reg.apply(action))
}

fn report(cli: &Cli, output: &serde_json::Value, msg: &str) -> Result<(), DocmarkError> {
    if cli.json {
        output_success(cli, output)
    } else {
        print_human(cli, msg);
        Ok(())
    }
}

/// File paths and function names are registry keys and must not be empty
fn require_key(what: &str, value: &str) -> Result<(), DocmarkError> {
    if value.is_empty() {
        return Err(DocmarkError::InvalidArgs(format!("{} must not be empty", what)));
    }
    Ok(())
}

fn read_comments(from: &Path) -> Result<FunctionComments, DocmarkError> {
    let value = read_json(from)?;
    if !value.is_object() {
        return Err(DocmarkError::InvalidArgs(format!(
            "comments in '{}' must be a JSON object keyed by function name",
            from.display()
        )));
    }
    Ok(serde_json::from_value(value)?)
}

fn read_actions(from: &Path) -> Result<Vec<CommentAction>, DocmarkError> {
    let value = read_json(from)?;
    if !value.is_array() {
        return Err(DocmarkError::InvalidArgs(format!(
            "actions in '{}' must be a JSON array",
            from.display()
        )));
    }
    Ok(serde_json::from_value(value)?)
}

/// Read JSON from a file, or stdin for "-"
fn read_json(from: &Path) -> Result<serde_json::Value, DocmarkError> {
    let content = if from == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        if !from.exists() {
            return Err(DocmarkError::missing_file("input file", from));
        }
        std::fs::read_to_string(from)?
    };
    Ok(serde_json::from_str(&content)?)
}
