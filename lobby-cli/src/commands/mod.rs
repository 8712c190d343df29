//! CLI subcommands

pub mod connect;
pub mod serve;
