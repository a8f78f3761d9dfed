//! Build metadata file (`.build/config.json`) and its nonce bump.
//!
//! CI bumps the nonce to trigger a release; `versionDefinition` tells the
//! publish pipeline which part of the version to raise.

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Number, Value};
use tracing::{debug, warn};

use crate::error::DocmarkError;

/// Default location, relative to the project root
pub const DEFAULT_BUILD_CONFIG_PATH: &str = ".build/config.json";

/// Update type used when none is given
pub const DEFAULT_UPDATE_TYPE: &str = "minor";

/// Update types the publish pipeline understands
pub const KNOWN_UPDATE_TYPES: [&str; 4] = ["major", "minor", "patch", "prerelease"];

const VERSION_DEFINITION: &str = "versionDefinition";
const NONCE: &str = "nonce";
const PREID: &str = "preid";

/// The build config document.
///
/// Held as a JSON object so that fields this tool does not touch keep their
/// values and their order when written back.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    doc: Map<String, Value>,
}

/// Result of a bump, for reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BumpOutcome {
    pub version_definition: String,
    pub previous_nonce: Number,
    pub nonce: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preid: Option<String>,
}

impl BuildConfig {
    /// Parse a config document from JSON text
    pub fn parse(content: &str) -> Result<Self, DocmarkError> {
        match serde_json::from_str(content)? {
            Value::Object(doc) => Ok(Self { doc }),
            other => Err(DocmarkError::InvalidConfig(format!(
                "build config must be a JSON object, found {}",
                json_type(&other)
            ))),
        }
    }

    pub fn load(path: &Path) -> Result<Self, DocmarkError> {
        if !path.exists() {
            return Err(DocmarkError::missing_file("build config", path));
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Write as 2-space indented JSON, with no trailing newline
    pub fn save(&self, path: &Path) -> Result<(), DocmarkError> {
        std::fs::write(path, self.to_pretty_json()?)?;
        debug!(path = %path.display(), "wrote build config");
        Ok(())
    }

    pub fn to_pretty_json(&self) -> Result<String, DocmarkError> {
        Ok(serde_json::to_string_pretty(&self.doc)?)
    }

    pub fn version_definition(&self) -> Option<&str> {
        self.doc.get(VERSION_DEFINITION).and_then(Value::as_str)
    }

    /// Current nonce. Any JSON number is accepted.
    pub fn nonce(&self) -> Result<&Number, DocmarkError> {
        match self.doc.get(NONCE) {
            Some(Value::Number(n)) => Ok(n),
            Some(v) => Err(DocmarkError::InvalidConfig(format!(
                "\"nonce\" must be a number, found {}",
                json_type(v)
            ))),
            None => Err(DocmarkError::InvalidConfig(
                "build config has no \"nonce\" field".to_string(),
            )),
        }
    }

    pub fn preid(&self) -> Option<&str> {
        self.doc.get(PREID).and_then(Value::as_str)
    }

    /// Set the update type, increment the nonce and set the prerelease id.
    ///
    /// `update_type` is stored verbatim even when it is not a known type.
    /// With `preid` of `None` the stored prerelease id is kept.
    pub fn bump(&mut self, update_type: &str, preid: Option<&str>) -> Result<BumpOutcome, DocmarkError> {
        let previous_nonce = self.nonce()?.clone();
        let nonce = increment(&previous_nonce)?;

        if !is_known_update_type(update_type) {
            warn!(update_type, "unknown update type, storing it as given");
        }

        self.doc.insert(VERSION_DEFINITION.to_string(), Value::from(update_type));
        self.doc.insert(NONCE.to_string(), Value::Number(nonce.clone()));
        if let Some(preid) = preid {
            self.doc.insert(PREID.to_string(), Value::from(preid));
        }

        Ok(BumpOutcome {
            version_definition: update_type.to_string(),
            previous_nonce,
            nonce,
            preid: self.preid().map(str::to_string),
        })
    }
}

/// Add one to a JSON number.
///
/// Integers stay integers while they fit in i64/u64; anything else,
/// including fractions and overflow, is incremented as f64.
fn increment(n: &Number) -> Result<Number, DocmarkError> {
    if let Some(next) = n.as_i64().and_then(|i| i.checked_add(1)) {
        return Ok(Number::from(next));
    }
    if let Some(next) = n.as_u64().and_then(|u| u.checked_add(1)) {
        return Ok(Number::from(next));
    }
    n.as_f64()
        .and_then(|f| Number::from_f64(f + 1.0))
        .ok_or_else(|| DocmarkError::InvalidConfig(format!("\"nonce\" {} cannot be incremented", n)))
}

pub fn is_known_update_type(update_type: &str) -> bool {
    KNOWN_UPDATE_TYPES.contains(&update_type)
}

/// Load the config at `path`, bump it and write it back in place.
///
/// An absent or empty `update_type` means [`DEFAULT_UPDATE_TYPE`]; an absent
/// or empty `preid` keeps the stored one. Nothing is written if loading or
/// bumping fails.
pub fn bump_file(path: &Path, update_type: Option<&str>, preid: Option<&str>) -> Result<BumpOutcome, DocmarkError> {
    let update_type = update_type.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_UPDATE_TYPE);
    let preid = preid.filter(|s| !s.is_empty());

    let mut config = BuildConfig::load(path)?;
    let outcome = config.bump(update_type, preid)?;
    config.save(path)?;
    debug!(nonce = %outcome.nonce, "bumped build config");
    Ok(outcome)
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
