//! Error types for udbg

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for udbg operations
pub type Result<T> = std::result::Result<T, UdbgError>;

/// Main error type for udbg
#[derive(Error, Debug)]
pub enum UdbgError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Module attachment errors
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Command dispatch errors
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Emulation engine errors
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration parsing and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find config file (searched: {0})")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Alias '{alias}' targets '{target}', which is itself an alias")]
    AliasChain { alias: String, target: String },

    #[error("Unknown module '{0}'")]
    UnknownModule(String),

    #[error("Failed to read config file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },
}

/// Errors raised while attaching a module to the registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Context '{0}' is already attached or reserved")]
    DuplicateContext(String),

    #[error("Command '{command}' already exists (while attaching '{context}')")]
    DuplicateCommand { context: String, command: String },

    #[error("Module '{0}' has an empty context id or exports no commands")]
    EmptyModule(String),
}

/// Errors raised while routing a command line to its handler
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("'{0}' not found")]
    CommandNotFound(String),

    #[error("'{0}' not implemented")]
    NotImplemented(String),

    #[error("'{command}' is bound incorrectly: {reason}")]
    HandlerBinding { command: String, reason: String },

    #[error("'{command}' failed: {source}")]
    HandlerExecution {
        command: String,
        #[source]
        source: HandlerError,
    },
}

/// A help lookup that did not reach a documented command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No help for command '{path}' found")]
pub struct NoHelpFound {
    /// The requested path, space separated.
    pub path: String,
    /// Usage of the first path token, if it has one.
    pub usage: Option<String>,
}

/// Errors returned by a command handler
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("usage: {0}")]
    Usage(String),

    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Emulation engine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("emulation is not running")]
    NotRunning,

    #[error("unknown register '{0}'")]
    InvalidRegister(String),

    #[error("address {0:#x} is not mapped")]
    Unmapped(u64),

    #[error("region at {address:#x} ({size} bytes) overlaps an existing mapping")]
    Overlap { address: u64, size: usize },

    #[error("region at {address:#x} ({size} bytes) runs past the end of the address space")]
    OutOfRange { address: u64, size: usize },
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for module attachment
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

/// Specialized result type for command dispatch
pub type DispatchResult<T> = std::result::Result<T, DispatchError>;

/// Specialized result type for command handlers
pub type HandlerResult<T> = std::result::Result<T, HandlerError>;

/// Specialized result type for engine operations
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Helper function to determine if a dispatch error points at a broken module
/// registration rather than at something the user typed
pub fn is_binding_defect(err: &DispatchError) -> bool {
    matches!(err, DispatchError::HandlerBinding { .. })
}
