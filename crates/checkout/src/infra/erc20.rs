//! The ERC-20 surface the checkout flow talks to directly.
//!
//! https://eips.ethereum.org/EIPS/eip-20

use alloy::{
    primitives::{Address, U256},
    sol,
    sol_types::SolCall,
};

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

/// Calldata approving `spender` for the maximum representable amount, so
/// later purchases in the same currency never re-prompt the user.
pub fn approve_calldata(spender: Address) -> Vec<u8> {
    IERC20::approveCall {
        spender,
        amount: U256::MAX,
    }
    .abi_encode()
}
