use thiserror::Error;

/// Main error type for docmark operations
#[derive(Debug, Error)]
pub enum DocmarkError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("busy: {0}")]
    DbBusy(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl DocmarkError {
    /// Error code used in the JSON output envelope
    pub fn error_code(&self) -> &'static str {
        match self {
            DocmarkError::InvalidArgs(_) => "invalid_args",
            DocmarkError::InvalidConfig(_) => "invalid_config",
            DocmarkError::NotFound(_) => "not_found",
            DocmarkError::DbBusy(_) => "db_busy",
            DocmarkError::Io(_) => "io_error",
            DocmarkError::Json(_) => "invalid_json",
            DocmarkError::TomlParse(_) => "invalid_config",
            DocmarkError::TomlSerialize(_) => "internal_error",
        }
    }

    /// Process exit code for the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            DocmarkError::InvalidArgs(_) => 2,
            DocmarkError::InvalidConfig(_) => 2,
            DocmarkError::Json(_) => 2,
            DocmarkError::TomlParse(_) => 2,
            DocmarkError::NotFound(_) => 3,
            DocmarkError::DbBusy(_) => 5,
            DocmarkError::Io(_) => 5,
            DocmarkError::TomlSerialize(_) => 1,
        }
    }

    /// Get actionable suggestions for fixing the error
    pub fn suggestions(&self) -> Vec<&'static str> {
        match self {
            DocmarkError::NotFound(msg) => {
                if msg.contains("build config") {
                    vec![
                        "Run from the project root, or pass --file <path>",
                        "The file must contain versionDefinition, nonce and preid",
                    ]
                } else {
                    vec![]
                }
            }
            DocmarkError::InvalidConfig(msg) if msg.contains("nonce") => {
                vec!["Set \"nonce\" to a non-negative integer, e.g. \"nonce\": 0"]
            }
            DocmarkError::DbBusy(_) => vec![
                "Another docmark process is updating the comment snapshot",
                "Wait for it to finish and retry",
            ],
            DocmarkError::InvalidArgs(msg) if msg.contains("actions") => {
                vec!["Actions are a JSON array of {\"type\": ..., \"file_path\": ...} objects"]
            }
            DocmarkError::InvalidArgs(msg) if msg.contains("comments") => {
                vec!["Comments are a JSON object of function name -> {\"marked\": false, ...}"]
            }
            DocmarkError::Json(_) => vec!["Check the file is valid JSON"],
            DocmarkError::TomlParse(_) => vec!["Check .docmark/config.toml, or pass --config <path>"],
            _ => vec![],
        }
    }

    /// Create a NotFound error for a missing file with the given role
    pub fn missing_file(role: &str, path: &std::path::Path) -> Self {
        DocmarkError::NotFound(format!("{} '{}' does not exist", role, path.display()))
    }
}
