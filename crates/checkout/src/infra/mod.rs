pub mod blockchain;
pub mod config;
pub mod erc20;
pub mod observe;
pub mod wallet;

pub use {
    blockchain::{Blockchain, Confirmation, Rpc},
    config::Config,
    wallet::{SignerWallet, Wallet},
};
