//! Core types for driving Oracle client tools and native connections.
//!
//! This crate turns typed configuration into the two forms Oracle tooling
//! consumes: an exactly-ordered argument vector for `sqlldr` or `sqlplus`,
//! and a fixed argument tuple for one of three native connect primitives.
//!
//! # Security Guarantees
//! - Passwords are held in zeroizing containers
//! - `Debug` output and redacted renders never include the password
//! - Logon content is passed through verbatim, never shell-interpreted
//!
//! # Architecture
//! - One ordered descriptor table per tool drives both CLI registration and
//!   argument rendering
//! - The logon credential is embedded in each option set by composition
//! - Connection strategies are a closed enum resolved before any native call

pub mod connection;
pub mod error;
pub mod logging;
pub mod logon;
pub mod options;

// Re-export commonly used types
pub use connection::{
    Connection, ConnectionParameters, ConnectionResolver, ConnectionStrategy, EasyConnect,
    EasyConnectComponents, NativeConnector, NativeError, SessionMode,
};
pub use error::{CoercionError, OratoolError, Result};
pub use logging::init_logging;
pub use logon::LogonCredential;
pub use options::loader::{LOADER_OPTIONS, LOADER_SCHEMA, LoaderOptions};
pub use options::runner::{RUNNER_ARGUMENTS, RUNNER_OPTIONS, RUNNER_SCHEMA, RunnerOptions};
pub use options::{
    OptionDescriptor, OptionKind, OptionSchema, OptionValue, OptionValues, ToolCommand,
    ValueType,
};
