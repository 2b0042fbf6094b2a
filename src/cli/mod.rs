//! CLI module
//!
//! Command-line interface over [`crate::client::CanvasClient`].
//!
//! # Commands
//!
//! - `user` - Show the authenticated user
//! - `courses` - List enrolled courses
//! - `assignments` - Planner items in a day/week/month/semester window
//! - `course-assignments` - Assignments of selected (or all) courses
//! - `complete` - Mark a planner item complete or not complete
//!
//! When a request fails the user is asked for a new token on stdin; an empty
//! line cancels and the process exits with status 1.

mod commands;
mod prompt;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use prompt::{LinePrompt, StdinPrompt};
pub use runner::{render, Runner};
