pub mod bump;
pub mod comments;
