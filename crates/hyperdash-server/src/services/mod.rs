//! Gateway calls composed into page-ready records.
//!
//! Where a view needs several upstream values they are fetched concurrently
//! and the first failure fails the whole load.

pub mod account;
pub mod evm;
pub mod markets;
