//! Contract module.
//!
//! This module handles:
//! - Contract call parameters and receipts
//! - The client port real contract integrations plug into
//! - A timed mock client returning fabricated receipts

pub mod client;
pub mod mock;
pub mod types;

pub use client::ContractClient;
pub use mock::MockContractClient;
pub use types::{
    CreateMarketParams, CreateMarketReceipt, PayoutReceipt, PlaceStakeParams, ResolveReceipt,
    StakeReceipt, ValidationErrors,
};
