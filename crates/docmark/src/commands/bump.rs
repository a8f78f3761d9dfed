use std::path::PathBuf;

use libdocmark_core::build_config::{bump_file, is_known_update_type};
use libdocmark_core::DocmarkError;
use tracing::info;

use crate::cli::Cli;
use crate::context::DocmarkContext;
use crate::output::{output_success, print_human};

pub fn run(
    cli: &Cli,
    update_type: Option<String>,
    preid: Option<String>,
    file: Option<PathBuf>,
) -> Result<(), DocmarkError> {
    let ctx = DocmarkContext::resolve(cli)?;
    let path = ctx.build_config_path(file.as_ref());

    let outcome = bump_file(&path, update_type.as_deref(), preid.as_deref())?;
    info!(path = %path.display(), nonce = %outcome.nonce, "build config bumped");

    if cli.json {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "version_definition": outcome.version_definition,
            "previous_nonce": outcome.previous_nonce,
            "nonce": outcome.nonce,
            "preid": outcome.preid,
            "known_update_type": is_known_update_type(&outcome.version_definition),
        });
        output_success(cli, &output)?;
    } else {
        let preid = outcome.preid.as_deref().unwrap_or("-");
        print_human(
            cli,
            &format!(
                "{}: versionDefinition={} nonce={} -> {} preid={}",
                path.display(),
                outcome.version_definition,
                outcome.previous_nonce,
                outcome.nonce,
                preid
            ),
        );
    }
    Ok(())
}
