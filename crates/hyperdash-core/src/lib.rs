//! # Hyperdash Core
//!
//! Data models, response normalizers and presentation formatters for the
//! Hyperdash dashboard.
//!
//! The gateway in front of Hyperliquid does not commit to a single response
//! shape, so everything read from it goes through the total extraction
//! functions in [`normalize`] and [`evm`] before it reaches a page. Those
//! functions never fail: malformed input collapses into empty or default
//! records.

pub mod error;
pub mod evm;
pub mod format;
pub mod models;
pub mod normalize;
pub mod saved;
mod value;

pub use error::*;
pub use evm::*;
pub use models::*;
pub use normalize::*;
