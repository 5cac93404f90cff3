//! Storage layer for block and balance descriptions

pub mod persistence;

pub use persistence::{load_balances, load_block, save_block, StorageError};
