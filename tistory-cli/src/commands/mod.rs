//! Subcommands.

pub mod blog;
pub mod call;
pub mod category;
pub mod comment;
pub mod post;
