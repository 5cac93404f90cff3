//! Command line layer: argument resolution and console output

pub mod commands;

pub use commands::{
    cmd_hash, cmd_mine, cmd_validate, cmd_verify, recipient_policy, CliError, CliResult,
    MineArgs, MineRequest,
};
