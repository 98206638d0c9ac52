//! Protocol constants shared across the client engine
//!
//! System-contract addresses are fixed by the rollup protocol; gas-model
//! constants mirror the values the bridge contracts charge for.

use alloy::primitives::{keccak256, Address, B256, U256};

// ============================================================================
// Well-known addresses
// ============================================================================

/// Sentinel address for the native asset (ETH) in bridge call surfaces.
pub const ETH_ADDRESS: Address = Address::new([0xee; 20]);

/// L2 base-token system contract (fixed protocol address, 0x...800a).
pub const L2_BASE_TOKEN_ADDRESS: Address = Address::new([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x80, 0x0a,
]);

/// L2 asset router system contract (fixed protocol address, 0x...10003).
pub const L2_ASSET_ROUTER_ADDRESS: Address = Address::new([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x03,
]);

/// L2 native-token-vault system contract (fixed protocol address, 0x...10004).
pub const L2_NATIVE_TOKEN_VAULT_ADDRESS: Address = Address::new([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x04,
]);

/// True when `token` refers to the native asset.
///
/// Accepts both the sentinel and the zero address (older tooling encodes
/// ETH as the zero address).
pub fn is_eth(token: Address) -> bool {
    token == ETH_ADDRESS || token == Address::ZERO
}

// ============================================================================
// Gas model
// ============================================================================

/// Safety buffer applied to estimated gas limits: limit * 115 / 100.
pub const GAS_BUFFER_NUMERATOR: u64 = 115;
pub const GAS_BUFFER_DENOMINATOR: u64 = 100;

/// Default price the operator charges per published byte of pubdata.
pub const DEFAULT_GAS_PER_PUBDATA: u64 = 800;

/// Fallback L2 gas limit when no estimate can be made.
pub const DEFAULT_L2_GAS_LIMIT: u64 = 2_000_000;

/// Conservative L1 gas limit for a bridging call that cannot be simulated.
pub const L1_BRIDGE_FALLBACK_GAS_LIMIT: u64 = 500_000;

/// Gas charged per byte of the encoded L2 transaction held in bootloader
/// memory.
pub const MEMORY_OVERHEAD_GAS_PER_BYTE: u64 = 10;

/// Modeled encoded-transaction size in bytes, default routes.
pub const ENCODED_TX_SIZE_BYTES: u64 = 1_440;

/// Modeled encoded-transaction size for the compact ERC-20 two-bridges
/// payload.
pub const ENCODED_TX_SIZE_BYTES_COMPACT: u64 = 820;

/// Modeled pubdata bytes published per L2 transaction, default routes.
pub const PUBDATA_BYTES: u64 = 176;

/// Modeled pubdata bytes for the compact ERC-20 two-bridges payload.
pub const PUBDATA_BYTES_COMPACT: u64 = 116;

/// Apply the protocol safety buffer to an estimated gas limit.
pub fn buffered_gas_limit(estimate: u64) -> u64 {
    estimate.saturating_mul(GAS_BUFFER_NUMERATOR) / GAS_BUFFER_DENOMINATOR
}

/// Balance granted to the sender in simulation state overrides so gas
/// estimation of a not-yet-funded call does not revert on balance checks.
pub fn simulation_balance() -> U256 {
    U256::from(1u128 << 100)
}

// ============================================================================
// Legacy event topics
// ============================================================================

/// Legacy deposit event: the L2 transaction hash sits at topic index 2.
///
/// keccak256("DepositInitiated(address,bytes32,address,uint256)")
pub fn legacy_deposit_initiated_topic() -> B256 {
    keccak256(b"DepositInitiated(address,bytes32,address,uint256)")
}

/// Legacy priority-queue event: the L2 transaction hash sits at topic
/// index 3.
///
/// keccak256("PriorityOpQueued(uint256,address,bytes32,uint256)")
pub fn legacy_priority_queued_topic() -> B256 {
    keccak256(b"PriorityOpQueued(uint256,address,bytes32,uint256)")
}
