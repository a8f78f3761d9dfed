use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::Table;
use libdocmark_core::{CommentFunction, DocmarkError};
use serde::Serialize;
use crate::cli::Cli;

/// JSON response envelope
#[derive(Serialize)]
pub struct JsonResponse<T: Serialize> {
    pub schema_version: u32,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

#[derive(Serialize)]
pub struct JsonError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

/// Output a successful result
pub fn output_success<T: Serialize>(cli: &Cli, data: T) -> Result<(), DocmarkError> {
    if cli.json {
        let response = JsonResponse {
            schema_version: 1,
            ok: true,
            data: Some(data),
            error: None,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else if !cli.quiet {
        println!("{}", serde_json::to_string_pretty(&data)?);
    }
    Ok(())
}

/// Output an error
pub fn output_error(cli: &Cli, err: &DocmarkError) {
    if cli.json {
        let suggestions = err.suggestions();
        let details = if suggestions.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::json!({ "suggestions": suggestions })
        };

        let response: JsonResponse<()> = JsonResponse {
            schema_version: 1,
            ok: false,
            data: None,
            error: Some(JsonError {
                code: err.error_code().to_string(),
                message: err.to_string(),
                details,
            }),
        };
        match serde_json::to_string_pretty(&response) {
            Ok(s) => eprintln!("{}", s),
            Err(_) => eprintln!("error: {}", err),
        }
    } else {
        eprintln!("error: {}", err);
        let suggestions = err.suggestions();
        if !suggestions.is_empty() {
            eprintln!();
            eprintln!("Suggestions:");
            for suggestion in suggestions {
                eprintln!("  - {}", suggestion);
            }
        }
    }
}

const COMMENT_PREVIEW_CHARS: usize = 60;

/// Print tracked comments as a table (ignored in quiet and JSON modes)
pub fn print_comment_table(cli: &Cli, rows: &[(&str, &str, &CommentFunction)]) {
    if cli.json || cli.quiet {
        return;
    }
    if rows.is_empty() {
        println!("No matching comments");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_header(vec!["File", "Function", "Line", "Marked", "Comment"]);
    for (path, name, c) in rows {
        table.add_row(vec![
            path.to_string(),
            name.to_string(),
            c.line.map(|l| l.to_string()).unwrap_or_default(),
            if c.marked { "yes" } else { "no" }.to_string(),
            preview(c.comment.as_deref().unwrap_or("")),
        ]);
    }
    println!("{table}");
}

/// First line of a comment, cut to fit a table cell
fn preview(comment: &str) -> String {
    let first = comment.lines().next().unwrap_or("");
    if first.chars().count() > COMMENT_PREVIEW_CHARS {
        let cut: String = first.chars().take(COMMENT_PREVIEW_CHARS - 1).collect();
        format!("{}…", cut)
    } else if comment.lines().nth(1).is_some() {
        format!("{} …", first)
    } else {
        first.to_string()
    }
}

/// Print human-readable output (ignored in quiet and JSON modes)
pub fn print_human(cli: &Cli, msg: &str) {
    if !cli.json && !cli.quiet {
        println!("{}", msg);
    }
}
