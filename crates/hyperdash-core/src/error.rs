//! Error types for Hyperdash Core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Please enter an address")]
    MissingAddress,

    #[error("Invalid Ethereum address: {0}")]
    InvalidAddress(String),

    #[error("Enter an address, tx hash, block hash, or block number.")]
    InvalidSearchTerm(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
