//! JSON file loading and writing
//!
//! Reads block and balance descriptions from disk and writes mined blocks
//! back out in their canonical encoding.

use crate::core::{BalanceLedger, Block};
use log::info;
use std::fs;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Load a block description
pub fn load_block(path: &Path) -> Result<Block, StorageError> {
    info!("Loading block from {}", path.display());
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    let block: Block = serde_json::from_reader(reader)?;
    info!(
        "Block {} loaded with {} transaction(s)",
        block.header.block_number,
        block.tx_count()
    );
    Ok(block)
}

/// Load a balance ledger description
pub fn load_balances(path: &Path) -> Result<BalanceLedger, StorageError> {
    info!("Loading balances from {}", path.display());
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    let ledger: BalanceLedger = serde_json::from_reader(reader)?;
    info!("{} account(s) loaded", ledger.len());
    Ok(ledger)
}

/// Write a block to `path` in canonical form
pub fn save_block(block: &Block, path: &Path) -> Result<(), StorageError> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&block.serialize())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!("Block {} written to {}", block.header.block_number, path.display());
    Ok(())
}
