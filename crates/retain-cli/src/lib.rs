//! Command implementations behind the `retain` binary.
pub mod commands;
pub mod util;
