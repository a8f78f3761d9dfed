pub mod types;
pub mod registry;
pub mod action;
pub mod snapshot;
pub mod build_config;
pub mod config;
pub mod error;

pub use error::DocmarkError;
pub use types::{CommentFunction, CommentState, FunctionComments};
pub use registry::CommentRegistry;
pub use action::CommentAction;
pub use build_config::{BuildConfig, BumpOutcome};
pub use config::{DocmarkConfig, load_config, save_config};
