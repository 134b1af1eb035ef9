use {alloy::primitives::TxHash, thiserror::Error};

/// Message fragments wallets emit when the user declines a signature
/// request. Matched against the lowercased error chain.
const REJECTION_MARKERS: &[&str] = &["rejected", "denied", "cancelled"];

/// Message fragments indicating the settlement failed on the token
/// allowance. Should not occur after a confirmed approval, but wallet and
/// RPC races make it possible.
const ALLOWANCE_MARKERS: &[&str] = &["allowance", "transfer amount exceeds"];

/// Why a purchase attempt ended without a successful settlement. Every
/// variant is terminal for the attempt; the caller starts over with a fresh
/// attempt if appropriate.
#[derive(Debug, Error)]
pub enum PurchaseError {
    /// The prepared order targets a chain this deployment does not settle on.
    #[error("unsupported chain {0}")]
    UnsupportedChain(String),

    /// The wallet rejected the approval or failed to submit it.
    #[error("approval rejected or failed")]
    ApprovalRejected,

    /// The approval was mined but reverted.
    #[error("approval failed on chain")]
    ApprovalReverted,

    #[error("order preparation failed: {0}")]
    OrderPreparation(#[from] order_api::OrderApiError),

    /// The backend's validity window elapsed before submission.
    #[error("transaction validity expired")]
    ValidityExpired,

    /// The user declined the settlement signature in their wallet.
    #[error("transaction rejected by user")]
    RejectedByUser,

    #[error("insufficient allowance, please retry")]
    InsufficientAllowance,

    /// Mined but reverted. The hash is preserved so the buyer can inspect
    /// the transaction on a block explorer.
    #[error("transaction reverted on chain")]
    Reverted(TxHash),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PurchaseError {
    /// Classifies an error thrown by the wallet while submitting the
    /// settlement transaction. Wallets only expose failure causes through
    /// their error messages, so this matches on substrings.
    pub fn from_submission(err: anyhow::Error) -> Self {
        let message = format!("{err:#}").to_lowercase();
        if REJECTION_MARKERS.iter().any(|marker| message.contains(marker)) {
            Self::RejectedByUser
        } else if ALLOWANCE_MARKERS.iter().any(|marker| message.contains(marker)) {
            Self::InsufficientAllowance
        } else {
            Self::Other(err)
        }
    }

    /// The settlement transaction hash, for outcomes where one exists even
    /// though the purchase failed.
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            Self::Reverted(hash) => Some(*hash),
            _ => None,
        }
    }
}
