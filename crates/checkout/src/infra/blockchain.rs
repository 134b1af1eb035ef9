use {
    super::erc20::IERC20,
    alloy::{
        primitives::{Address, TxHash, U256},
        providers::{DynProvider, Provider},
    },
    async_trait::async_trait,
    std::time::Duration,
    tracing::instrument,
};

/// Interval between receipt polls.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// How long to keep polling for a receipt before declaring it unavailable.
/// Many wallet and RPC combinations fail to surface receipts promptly even
/// for transactions that confirmed.
const RECEIPT_WAIT_DEADLINE: Duration = Duration::from_secs(120);

/// Outcome of waiting for a transaction's first confirmation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Confirmation {
    /// Mined and the receipt reports success.
    Confirmed,
    /// Mined but the receipt reports a revert.
    Reverted,
    /// No receipt could be retrieved before the deadline. Distinct from a
    /// reverted receipt: the transaction may well have confirmed.
    Unavailable,
}

/// Read-only chain access the purchase flow depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Blockchain: Send + Sync {
    /// Current ERC-20 allowance of `spender` over `owner`'s funds. Returns
    /// zero on any RPC failure so the flow falls back to a fresh approval
    /// instead of submitting with an allowance it never observed.
    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256;

    /// Waits for one confirmation of `tx_hash` and classifies the outcome.
    /// Never errors; see [`Confirmation::Unavailable`].
    async fn await_confirmation(&self, tx_hash: TxHash) -> Confirmation;
}

/// [`Blockchain`] backed by an Ethereum JSON-RPC node.
#[derive(Clone, Debug)]
pub struct Rpc {
    provider: DynProvider,
}

impl Rpc {
    pub fn new(provider: DynProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Blockchain for Rpc {
    #[instrument(skip_all)]
    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        match IERC20::new(token, self.provider.clone())
            .allowance(owner, spender)
            .call()
            .await
        {
            Ok(allowance) => allowance,
            Err(err) => {
                tracing::warn!(?err, %token, "error retrieving allowance, treating as zero");
                U256::ZERO
            }
        }
    }

    #[instrument(skip_all)]
    async fn await_confirmation(&self, tx_hash: TxHash) -> Confirmation {
        let deadline = tokio::time::Instant::now() + RECEIPT_WAIT_DEADLINE;
        loop {
            match self.provider.get_transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => {
                    return if receipt.status() {
                        Confirmation::Confirmed
                    } else {
                        Confirmation::Reverted
                    };
                }
                Ok(None) => tracing::trace!(?tx_hash, "receipt not yet available"),
                Err(err) => tracing::warn!(?err, ?tx_hash, "receipt retrieval failed"),
            }
            if tokio::time::Instant::now() + RECEIPT_POLL_INTERVAL > deadline {
                tracing::warn!(?tx_hash, "no receipt before deadline");
                return Confirmation::Unavailable;
            }
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }
}
