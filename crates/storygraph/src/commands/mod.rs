//! Command implementations shared by the CLI.

pub mod init;
