//! Mining engine
//!
//! Validates a block's transactions once, then walks the nonce upward one
//! step at a time until the block's work value satisfies the difficulty mask.

use crate::core::{BalanceLedger, Block, LedgerError, RecipientPolicy};
use crate::mining::difficulty::{difficulty_mask, is_satisfiable, meets_mask, WORK_BITS};
use log::{debug, info, warn};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Delay between attempts used by the command line miner
pub const DEFAULT_ATTEMPT_DELAY: Duration = Duration::from_millis(1000);

/// Mining errors
#[derive(Error, Debug)]
pub enum MiningError {
    #[error("Block rejected: {0}")]
    Rejected(#[from] LedgerError),
    #[error("Difficulty {difficulty} cannot be met: work values are only {width} bits wide")]
    UnsatisfiableDifficulty { difficulty: u32, width: u32 },
    #[error("Search exhausted after {attempts} attempts (next nonce {next_nonce})")]
    SearchExhausted { attempts: u64, next_nonce: u64 },
    #[error("Search cancelled after {attempts} attempts (next nonce {next_nonce})")]
    Cancelled { attempts: u64, next_nonce: u64 },
    #[error("Nonce space exhausted at {0}")]
    NonceExhausted(u64),
}

/// Where a miner is in its run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiningState {
    Idle,
    Validating,
    Searching,
    Found,
    Rejected,
    /// Search ended or was refused without a result (unreachable
    /// difficulty, cancelled, capped or out of nonces)
    Stopped,
}

impl fmt::Display for MiningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MiningState::Idle => "idle",
            MiningState::Validating => "validating",
            MiningState::Searching => "searching",
            MiningState::Found => "found",
            MiningState::Rejected => "rejected",
            MiningState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Shared flag that stops a running search before its next attempt
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Miner configuration
#[derive(Debug, Clone, Default)]
pub struct MinerConfig {
    /// Pause after each failed attempt. Only affects wall-clock time.
    pub attempt_delay: Duration,
    /// Upper bound on hashes computed, unbounded if `None`
    pub max_attempts: Option<u64>,
    /// Handling of transfers to accounts missing from the ledger
    pub recipient_policy: RecipientPolicy,
}

/// Mining statistics
#[derive(Debug, Clone)]
pub struct MiningStats {
    /// Number of hash attempts
    pub hash_attempts: u64,
    /// Time taken in milliseconds
    pub time_ms: u128,
    /// Hash rate (hashes per second)
    pub hash_rate: f64,
}

impl MiningStats {
    fn new(hash_attempts: u64, elapsed: Duration) -> Self {
        let time_ms = elapsed.as_millis();
        let hash_rate = if time_ms > 0 {
            (hash_attempts as f64) / (time_ms as f64 / 1000.0)
        } else {
            hash_attempts as f64
        };
        Self {
            hash_attempts,
            time_ms,
            hash_rate,
        }
    }
}

/// A successful search
#[derive(Debug, Clone)]
pub struct MiningOutcome {
    /// Winning nonce, also written into the block
    pub nonce: u64,
    /// 48-bit work value at the winning nonce
    pub hash: u64,
    /// Mask the work value was tested against
    pub mask: u64,
    /// Balances after applying the block's transactions
    pub ledger: BalanceLedger,
    pub stats: MiningStats,
}

/// Proof-of-work miner
pub struct Miner {
    config: MinerConfig,
    cancel: CancelToken,
    state: MiningState,
}

impl Miner {
    /// Create a new miner
    pub fn new(config: MinerConfig) -> Self {
        Self {
            config,
            cancel: CancelToken::new(),
            state: MiningState::Idle,
        }
    }

    /// Use an externally held cancellation token
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops this miner's search
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> MiningState {
        self.state
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    fn transition(&mut self, next: MiningState) {
        debug!("Miner state: {} -> {}", self.state, next);
        self.state = next;
    }

    /// Mine `block` at `difficulty`.
    ///
    /// The transactions are validated against a copy of `ledger` first; a
    /// rejected block is never hashed and its nonce is left alone. Otherwise
    /// the nonce is incremented in place until the work value meets the mask,
    /// and the block keeps the winning nonce. If the search stops early the
    /// block holds the next untried nonce, so it can be resumed.
    pub fn mine(
        &mut self,
        block: &mut Block,
        ledger: &BalanceLedger,
        difficulty: u32,
    ) -> Result<MiningOutcome, MiningError> {
        self.transition(MiningState::Validating);
        let policy = self.config.recipient_policy;
        let ledger = match ledger.validate_and_apply(block.transactions(), policy) {
            Ok(ledger) => ledger,
            Err(e) => {
                warn!("Block {} rejected: {}", block.header.block_number, e);
                self.transition(MiningState::Rejected);
                return Err(e.into());
            }
        };
        info!(
            "Block {}: {} transaction(s) valid",
            block.header.block_number,
            block.tx_count()
        );

        if !is_satisfiable(difficulty) {
            self.transition(MiningState::Stopped);
            return Err(MiningError::UnsatisfiableDifficulty {
                difficulty,
                width: WORK_BITS,
            });
        }

        let mask = difficulty_mask(difficulty);
        self.transition(MiningState::Searching);
        info!(
            "Mining block {} with difficulty {} (mask {:#014x}) from nonce {}...",
            block.header.block_number,
            difficulty,
            mask,
            block.nonce()
        );

        let start = Instant::now();
        let mut attempts = 0u64;

        loop {
            if self.cancel.is_cancelled() {
                self.transition(MiningState::Stopped);
                return Err(MiningError::Cancelled {
                    attempts,
                    next_nonce: block.nonce(),
                });
            }
            if self.config.max_attempts.is_some_and(|max| attempts >= max) {
                self.transition(MiningState::Stopped);
                return Err(MiningError::SearchExhausted {
                    attempts,
                    next_nonce: block.nonce(),
                });
            }

            let hash = block.hash();
            attempts += 1;
            debug!("nonce {} -> {:#014x}", block.nonce(), hash);

            if meets_mask(hash, mask) {
                self.transition(MiningState::Found);
                let stats = MiningStats::new(attempts, start.elapsed());
                info!(
                    "Block {} mined at nonce {} in {}ms ({} attempts, {:.2} H/s)",
                    block.header.block_number,
                    block.nonce(),
                    stats.time_ms,
                    attempts,
                    stats.hash_rate
                );
                return Ok(MiningOutcome {
                    nonce: block.nonce(),
                    hash,
                    mask,
                    ledger,
                    stats,
                });
            }

            if block.increase_nonce().is_none() {
                self.transition(MiningState::Stopped);
                return Err(MiningError::NonceExhausted(block.nonce()));
            }

            if !self.config.attempt_delay.is_zero() {
                thread::sleep(self.config.attempt_delay);
            }
        }
    }
}

impl Default for Miner {
    fn default() -> Self {
        Self::new(MinerConfig::default())
    }
}
