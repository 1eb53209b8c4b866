//! Fetch-and-shape handlers behind the CLI commands.

pub mod auth;
pub mod blog;
pub mod category;
pub mod comment;
pub mod post;
