//! Bridge contract ABI definitions
//!
//! Uses alloy's sol! macro to generate type-safe bindings for the bridge
//! entry point, the asset routers, and the L2 system contracts. The engine
//! encodes calls with these types and sends them through the
//! [`crate::chain::ChainClient`] adapter.

#![allow(clippy::too_many_arguments)]

use alloy::sol;

sol! {
    /// Direct-encoded L1→L2 request: the base token funds the call and the
    /// transferred amount rides as destination `msg.value`.
    struct L2TransactionRequestDirect {
        uint256 chainId;
        uint256 mintValue;
        address l2Contract;
        uint256 l2Value;
        bytes l2Calldata;
        uint256 l2GasLimit;
        uint256 l2GasPerPubdataByteLimit;
        bytes[] factoryDeps;
        address refundRecipient;
    }

    /// Two-bridges-encoded L1→L2 request: an outer envelope carrying a
    /// secondary asset-transfer leg routed through a second bridge.
    struct L2TransactionRequestTwoBridges {
        uint256 chainId;
        uint256 mintValue;
        uint256 l2Value;
        uint256 l2GasLimit;
        uint256 l2GasPerPubdataByteLimit;
        address refundRecipient;
        address secondBridgeAddress;
        uint256 secondBridgeValue;
        bytes secondBridgeCalldata;
    }

    /// Bridge entry point on the origin chain.
    #[sol(rpc)]
    contract Bridgehub {
        /// Base (fee) token of a registered chain.
        function baseToken(uint256 chainId) external view returns (address);

        /// Destination-execution fee for a priority transaction at the
        /// given gas price.
        function l2TransactionBaseCost(
            uint256 chainId,
            uint256 gasPrice,
            uint256 l2GasLimit,
            uint256 l2GasPerPubdataByteLimit
        ) external view returns (uint256);

        /// Queue a direct-encoded priority transaction.
        function requestL2TransactionDirect(L2TransactionRequestDirect request) external payable returns (bytes32 canonicalTxHash);

        /// Queue a two-bridges-encoded priority transaction.
        function requestL2TransactionTwoBridges(L2TransactionRequestTwoBridges request) external payable returns (bytes32 canonicalTxHash);

        /// Emitted when an origin-chain transaction queues a
        /// destination-chain execution.
        event PriorityRequest(
            uint256 indexed chainId,
            address indexed sender,
            bytes32 l2TxHash,
            uint256 priorityId,
            bytes data
        );
    }

    /// Standard ERC20 interface
    #[sol(rpc)]
    contract ERC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);

        event Transfer(address indexed from, address indexed to, uint256 value);
        event Approval(address indexed owner, address indexed spender, uint256 value);
    }

    /// Fixed L2 base-token system contract.
    #[sol(rpc)]
    contract L2BaseToken {
        /// Withdraw the base token to an L1 receiver; the amount rides as
        /// `msg.value`.
        function withdraw(address l1Receiver) external payable;

        event Withdrawal(address indexed l2Sender, address indexed l1Receiver, uint256 amount);
    }

    /// L2 asset router for generic ERC-20 withdrawals.
    #[sol(rpc)]
    contract L2AssetRouter {
        /// Withdraw a registered asset to an L1 receiver.
        function withdraw(address l1Receiver, address token, uint256 amount) external payable;

        event WithdrawalInitiated(
            address indexed l2Sender,
            address indexed l1Receiver,
            address indexed token,
            uint256 amount
        );
    }

    /// L2 native-token-vault: asset registry backing the router.
    #[sol(rpc)]
    contract L2NativeTokenVault {
        /// Asset id for a token; zero when the token is not registered.
        function assetId(address token) external view returns (bytes32);

        /// Register a first-time token so the router can route it.
        function registerToken(address token) external;

        event TokenRegistered(address indexed token, bytes32 assetId);
    }
}
