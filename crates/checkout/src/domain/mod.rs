pub mod amount;
pub mod checkout;
pub mod error;
pub mod intent;
pub mod status;

pub use {
    checkout::{Checkout, PurchaseResult},
    error::PurchaseError,
    intent::PurchaseIntent,
    status::PurchaseStatus,
};
