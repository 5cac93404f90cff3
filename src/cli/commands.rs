//! CLI commands for the miner
//!
//! Implements the command handlers behind the `miner` binary. All console
//! output lives here; the core only returns values and typed errors.

use crate::core::{BalanceLedger, Block, RecipientPolicy};
use crate::mining::{Miner, MinerConfig, MiningOutcome};
use crate::storage::{load_balances, load_block, save_block};
use clap::Args;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Errors raised by the command line layer itself
#[derive(Error, Debug, PartialEq)]
pub enum CliError {
    #[error("Missing input: no {0} was given")]
    MissingInput(&'static str),
    #[error("Block does not meet difficulty {difficulty} at nonce {nonce}")]
    VerificationFailed { difficulty: u32, nonce: u64 },
}

/// Arguments of the mine command
#[derive(Args, Debug, Clone, Default)]
pub struct MineArgs {
    /// Block description to mine (JSON)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Number of low-order hash bits that must be zero
    #[arg(long)]
    pub difficulty: Option<u32>,

    /// Account balances (JSON object of account -> amount)
    #[arg(long)]
    pub balances: Option<PathBuf>,

    /// Pause between attempts, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub delay_ms: u64,

    /// Give up after this many hash attempts
    #[arg(long)]
    pub max_attempts: Option<u64>,

    /// Reject transfers to accounts missing from the balances file
    #[arg(long)]
    pub reject_unknown_recipients: bool,

    /// Also write the mined block to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Fully resolved mining request
#[derive(Debug, Clone)]
pub struct MineRequest {
    pub input: PathBuf,
    pub difficulty: u32,
    pub balances: PathBuf,
    pub output: Option<PathBuf>,
    pub config: MinerConfig,
}

impl MineArgs {
    /// Check that all three required inputs are present
    pub fn resolve(&self) -> Result<MineRequest, CliError> {
        let input = self
            .input
            .clone()
            .ok_or(CliError::MissingInput("input file"))?;
        let difficulty = self
            .difficulty
            .ok_or(CliError::MissingInput("difficulty"))?;
        let balances = self
            .balances
            .clone()
            .ok_or(CliError::MissingInput("balances file"))?;

        Ok(MineRequest {
            input,
            difficulty,
            balances,
            output: self.output.clone(),
            config: MinerConfig {
                attempt_delay: Duration::from_millis(self.delay_ms),
                max_attempts: self.max_attempts,
                recipient_policy: recipient_policy(self.reject_unknown_recipients),
            },
        })
    }
}

/// Map the command line flag onto a recipient policy
pub fn recipient_policy(reject_unknown: bool) -> RecipientPolicy {
    if reject_unknown {
        RecipientPolicy::RejectUnknown
    } else {
        RecipientPolicy::AutoCreate
    }
}

/// Mine a block read from disk
pub fn cmd_mine(args: &MineArgs) -> CliResult<(Block, MiningOutcome)> {
    let request = args.resolve()?;

    let ledger = load_balances(&request.balances)?;
    let mut block = load_block(&request.input)?;

    println!(
        "⛏️  Mining block {} at difficulty {}",
        block.header.block_number, request.difficulty
    );

    let mut miner = Miner::new(request.config);
    let outcome = miner.mine(&mut block, &ledger, request.difficulty)?;

    println!("\n✅ Block successfully mined at nonce {}", outcome.nonce);
    println!("   ├─ Hash hex:          {:#x}", outcome.hash);
    println!("   ├─ Matching mask hex: {:#x}", outcome.mask);
    println!("   ├─ Hash bin:          {:#b}", outcome.hash);
    println!("   ├─ Matching mask bin: {:#b}", outcome.mask);
    println!("   └─ Attempts: {}", outcome.stats.hash_attempts);
    println!("{}", block.to_json());

    if let Some(path) = &request.output {
        save_block(&block, path)?;
        println!("📦 Block written to {:?}", path);
    }

    Ok((block, outcome))
}

/// Print a block's canonical encoding and hashes
pub fn cmd_hash(input: &Path) -> CliResult<Block> {
    let block = load_block(input)?;

    println!("{}", block.to_json());
    println!("   ├─ SHA-256: {}", block.hash_hex());
    println!("   └─ Work value: {:#014x}", block.hash());

    Ok(block)
}

/// Validate a block's transactions without mining
pub fn cmd_validate(
    input: &Path,
    balances: &Path,
    policy: RecipientPolicy,
) -> CliResult<BalanceLedger> {
    let ledger = load_balances(balances)?;
    let block = load_block(input)?;

    println!("🔍 Validating {} transaction(s)...", block.tx_count());
    let updated = ledger.validate_and_apply(block.transactions(), policy)?;

    println!("✅ All transactions are valid");
    println!("   Resulting balances:");
    for (account, balance) in updated.iter() {
        println!("   └─ {}: {}", account, balance);
    }

    Ok(updated)
}

/// Check an already mined block against a difficulty
pub fn cmd_verify(input: &Path, difficulty: u32) -> CliResult<()> {
    let block = load_block(input)?;

    if !block.meets_difficulty(difficulty) {
        return Err(CliError::VerificationFailed {
            difficulty,
            nonce: block.nonce(),
        }
        .into());
    }

    println!(
        "✅ Block {} meets difficulty {} at nonce {}",
        block.header.block_number,
        difficulty,
        block.nonce()
    );
    Ok(())
}
