//! Mining module: difficulty masks and the nonce search

pub mod difficulty;
pub mod miner;

pub use difficulty::{
    compute_mask, difficulty_mask, is_satisfiable, meets_mask, MASK_BASE_WIDTH, WORK_BITS,
    WORK_MASK,
};
pub use miner::{
    CancelToken, Miner, MinerConfig, MiningError, MiningOutcome, MiningState, MiningStats,
    DEFAULT_ATTEMPT_DELAY,
};
