//! CLI interface and argument parsing
//!
//! This module handles command-line parsing, the interactive session loop
//! and shell completion.

pub mod app;
pub mod prompt;

// Re-export main types
pub use app::*;
pub use prompt::*;
