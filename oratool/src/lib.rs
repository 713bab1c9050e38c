//! Command-line front end for Oracle client tools.
//!
//! # Module Structure
//! - `cli`: clap definitions, descriptor-driven option registration
//! - `launch`: process execution and dry-run rendering

pub mod cli;
pub mod launch;
