//! Proof-of-work miner CLI
//!
//! Loads a block and a balances file, validates the block's transactions and
//! searches for a nonce that meets the requested difficulty.

use clap::{Parser, Subcommand};
use pow_demo::cli::{self, MineArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "miner")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "PoW example: find a nonce for a block", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(flatten)]
    mine: MineArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a block's canonical encoding and hash
    Hash {
        /// Block description (JSON)
        #[arg(long)]
        input: PathBuf,
    },

    /// Validate a block's transactions against balances without mining
    Validate {
        /// Block description (JSON)
        #[arg(long)]
        input: PathBuf,

        /// Account balances (JSON)
        #[arg(long)]
        balances: PathBuf,

        /// Reject transfers to accounts missing from the balances file
        #[arg(long)]
        reject_unknown_recipients: bool,
    },

    /// Check that an already mined block meets a difficulty
    Verify {
        /// Block description (JSON)
        #[arg(long)]
        input: PathBuf,

        /// Number of low-order hash bits that must be zero
        #[arg(long)]
        difficulty: u32,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        None => {
            cli::cmd_mine(&cli.mine)?;
        }

        Some(Commands::Hash { input }) => {
            cli::cmd_hash(&input)?;
        }

        Some(Commands::Validate {
            input,
            balances,
            reject_unknown_recipients,
        }) => {
            let policy = cli::recipient_policy(reject_unknown_recipients);
            cli::cmd_validate(&input, &balances, policy)?;
        }

        Some(Commands::Verify { input, difficulty }) => {
            cli::cmd_verify(&input, difficulty)?;
        }
    }

    Ok(())
}
