pub mod comment;

pub use comment::{CommentFunction, CommentState, FunctionComments};
