//! udbg - an interactive command shell for CPU emulator debugging
//!
//! Typed lines are routed through a command tree built from attached feature
//! modules. Each module contributes top-level commands (with optional
//! sub-commands and aliases) and the dispatcher walks that tree to find the
//! handler responsible for a line.

// Public modules
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod modules;

// Re-export commonly used types
pub use error::{Result, UdbgError};

/// Current version of udbg
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
