use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docmark", about = "Track generated doc comments and bump build nonces", version)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress human-readable output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Project root (default: current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Tool config file (default: <root>/.docmark/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Bump the build config nonce and set the version definition
    Bump {
        /// major, minor, patch or prerelease
        update_type: Option<String>,

        /// Prerelease id (alpha, beta, rc); keeps the stored one when omitted
        preid: Option<String>,

        /// Build config file (default: .build/config.json)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Comment registry commands
    Comments {
        #[command(subcommand)]
        cmd: CommentsCommand,
    },
}

#[derive(Clone, Subcommand)]
pub enum CommentsCommand {
    /// Show tracked comments
    Show {
        /// Only this source file
        #[arg(long)]
        file: Option<String>,

        /// Only comments not yet inserted into their document
        #[arg(long)]
        unmarked: bool,
    },

    /// Set the comment for one function
    Set {
        /// Source file path
        file: String,

        /// Function name
        function: String,

        /// Comment text
        #[arg(long)]
        comment: Option<String>,

        /// Line the comment is anchored to
        #[arg(long)]
        line: Option<u32>,

        /// Record the comment as already inserted
        #[arg(long)]
        marked: bool,
    },

    /// Replace all comments for a file from a JSON object of function -> comment
    Replace {
        /// Source file path
        file: String,

        /// JSON file to read ("-" for stdin)
        #[arg(long)]
        from: PathBuf,
    },

    /// Mark a comment as inserted into its document
    Mark {
        /// Source file path
        file: String,

        /// Function name
        function: String,
    },

    /// Apply a JSON array of actions in order
    Apply {
        /// JSON file to read ("-" for stdin)
        #[arg(long)]
        from: PathBuf,
    },

    /// Reset the registry to empty
    Clear,
}
