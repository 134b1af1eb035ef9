#![forbid(unsafe_code)]

pub mod arguments;
pub mod domain;
pub mod infra;

pub use {
    domain::{Checkout, PurchaseIntent, PurchaseResult, PurchaseStatus},
    infra::Config,
};
