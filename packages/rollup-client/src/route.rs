//! Route resolution
//!
//! Maps (asset, base-token facts) to exactly one route tag. Resolution is
//! pure, total, and deterministic; the chosen route's preflight validates
//! that it actually accepts the asset.

use alloy::primitives::Address;

use crate::constants::{is_eth, L2_BASE_TOKEN_ADDRESS};
use crate::types::{DepositRoute, WithdrawRoute};

/// Resolve the deposit route for `token` toward a chain whose base token
/// is `base_token`.
pub fn resolve_deposit_route(token: Address, base_token: Address) -> DepositRoute {
    if is_eth(token) {
        if is_eth(base_token) {
            DepositRoute::EthBase
        } else {
            DepositRoute::EthNonBase
        }
    } else if eq_ignore_case(token, base_token) {
        DepositRoute::Erc20Base
    } else {
        DepositRoute::Erc20NonBase
    }
}

/// Resolve the withdrawal route for `token` on a chain whose base token is
/// `base_token` (`base_token_is_eth` pre-known).
///
/// ETH on an ETH-based chain resolves to the asset-router route: the
/// native-token-vault serves it like any other registered asset, and the
/// base-token route only exists for chains with an ERC-20 base token.
pub fn resolve_withdraw_route(
    token: Address,
    base_token: Address,
    base_token_is_eth: bool,
) -> WithdrawRoute {
    if base_token_is_eth {
        return WithdrawRoute::Erc20;
    }
    if token == L2_BASE_TOKEN_ADDRESS || eq_ignore_case(token, base_token) {
        WithdrawRoute::BaseToken
    } else {
        WithdrawRoute::Erc20
    }
}

/// Case-insensitive address equality.
///
/// Addresses are value types here, but callers may have parsed them from
/// differently-checksummed strings; comparing the raw bytes is the
/// canonical form of that comparison.
fn eq_ignore_case(a: Address, b: Address) -> bool {
    a.as_slice() == b.as_slice()
}
