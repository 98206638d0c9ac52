//! EVM-side plumbing: contract bindings, the alloy chain client, and
//! ERC-20 helpers.

pub mod client;
pub mod contracts;
pub mod tokens;

pub use client::{EvmChainClient, ReceiptPolicy};
