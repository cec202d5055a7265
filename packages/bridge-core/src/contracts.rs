//! Contract ABI definitions
//!
//! Uses alloy's sol! macro to generate type-safe bindings for the ERC-20
//! interface and the two bridge contracts (deposit side on L1, withdraw
//! side on L2).

use alloy::sol;

sol! {
    /// Standard ERC-20 token interface
    #[sol(rpc)]
    contract ERC20 {
        /// Get token balance of an account
        function balanceOf(address account) external view returns (uint256);

        /// Get allowance granted by owner to spender
        function allowance(address owner, address spender) external view returns (uint256);

        /// Approve spender to spend tokens
        function approve(address spender, uint256 amount) external returns (bool);

        /// Get token name
        function name() external view returns (string memory);

        /// Get token symbol
        function symbol() external view returns (string memory);

        /// Get token decimals
        function decimals() external view returns (uint8);

        /// Emitted when an allowance is set
        event Approval(address indexed owner, address indexed spender, uint256 value);
    }
}

sol! {
    /// L1 bridge contract interface (deposit side)
    #[sol(rpc)]
    contract L1Bridge {
        /// Deposit native ETH for bridging; the deposited value is msg.value
        function depositETH() external payable;

        /// Deposit ERC20 tokens for bridging (requires prior allowance)
        function depositERC20(address l1Token, uint256 amount) external;

        event DepositETH(
            uint256 indexed depositId,
            address indexed user,
            uint256 amount,
            uint256 timestamp
        );

        event DepositERC20(
            uint256 indexed depositId,
            address indexed user,
            address indexed l1Token,
            uint256 amount,
            uint256 timestamp
        );
    }
}

sol! {
    /// L2 bridge contract interface (withdraw side)
    ///
    /// Withdrawals burn/lock on L2 and become claimable on L1 after the
    /// challenge period; nothing here pays value out directly.
    #[sol(rpc)]
    contract L2Bridge {
        /// Withdraw native ETH back to L1
        function withdrawETH(uint256 amount) external;

        /// Withdraw ERC20 tokens back to L1
        function withdrawERC20(address l2Token, uint256 amount) external;

        event WithdrawETH(
            uint256 indexed withdrawId,
            address indexed user,
            uint256 amount,
            uint256 timestamp
        );

        event WithdrawERC20(
            uint256 indexed withdrawId,
            address indexed user,
            address indexed l2Token,
            uint256 amount,
            uint256 timestamp
        );
    }
}
