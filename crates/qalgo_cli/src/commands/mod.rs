//! Subcommand implementations
//!
//! Each command returns its rendered report; `main` prints it.

pub mod bench;
pub mod cluster;
pub mod grover;
pub mod optimize;
