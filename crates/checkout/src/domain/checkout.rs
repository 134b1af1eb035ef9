//! The purchase saga: drives a [`PurchaseIntent`] through allowance
//! verification, an optional ERC-20 approval, backend order preparation and
//! on-chain settlement, surfacing progress through [`PurchaseStatus`].

use {
    crate::{
        domain::{
            amount,
            error::PurchaseError,
            intent::PurchaseIntent,
            status::PurchaseStatus,
        },
        infra::{
            blockchain::{Blockchain, Confirmation},
            config::Config,
            erc20,
            wallet::Wallet,
        },
    },
    alloy::{
        primitives::{Address, TxHash},
        rpc::types::TransactionRequest,
    },
    anyhow::Context,
    chrono::Utc,
    order_api::{OrderPreparing, PrepareOrderRequest, PreparedOrder},
    std::sync::Arc,
    token_registry::{TokenDescriptor, TokenRegistry},
    tokio::sync::watch,
};

/// Attached to a tentative success when no receipt could be retrieved.
pub const RECEIPT_UNAVAILABLE_NOTE: &str =
    "the receipt could not be retrieved, verify the purchase on a block explorer";

/// Terminal outcome of one purchase attempt. The UI layer owns turning this
/// into toasts and navigation; the flow only returns data.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PurchaseResult {
    pub success: bool,
    pub tx_hash: Option<TxHash>,
    pub message: Option<String>,
}

/// Orchestrates purchase attempts against the marketplace.
///
/// One attempt at a time: `purchase` takes `&mut self`, so a second call (or
/// a `reset`) cannot start while one is in flight. Nothing persists between
/// attempts except what lives on chain and in the wallet.
pub struct Checkout {
    wallet: Arc<dyn Wallet>,
    chain: Arc<dyn Blockchain>,
    orders: Arc<dyn OrderPreparing>,
    tokens: TokenRegistry,
    config: Config,
    status: watch::Sender<PurchaseStatus>,
    tx_hash: Option<TxHash>,
    error: Option<String>,
}

struct Settled {
    tx_hash: TxHash,
    note: Option<&'static str>,
}

impl Checkout {
    pub fn new(
        wallet: Arc<dyn Wallet>,
        chain: Arc<dyn Blockchain>,
        orders: Arc<dyn OrderPreparing>,
        tokens: TokenRegistry,
        config: Config,
    ) -> Self {
        let (status, _) = watch::channel(PurchaseStatus::Idle);
        Self {
            wallet,
            chain,
            orders,
            tokens,
            config,
            status,
            tx_hash: None,
            error: None,
        }
    }

    /// The current phase of the attempt in flight (or the terminal phase of
    /// the last one).
    pub fn status(&self) -> PurchaseStatus {
        *self.status.borrow()
    }

    /// A receiver observing status changes while `purchase` is in flight.
    pub fn subscribe(&self) -> watch::Receiver<PurchaseStatus> {
        self.status.subscribe()
    }

    /// The settlement transaction hash of the last attempt, if one was
    /// mined or submitted.
    pub fn tx_hash(&self) -> Option<TxHash> {
        self.tx_hash
    }

    /// The failure message of the last attempt.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns to [`PurchaseStatus::Idle`] and clears the stored hash and
    /// error. Does not (and cannot) unsubmit anything already handed to the
    /// wallet.
    pub fn reset(&mut self) {
        self.tx_hash = None;
        self.error = None;
        self.set_status(PurchaseStatus::Idle);
    }

    /// Runs one purchase attempt to a terminal state. Never returns an
    /// error: every failure mode is folded into the result and the
    /// [`PurchaseStatus::Error`] state.
    pub async fn purchase(&mut self, intent: &PurchaseIntent) -> PurchaseResult {
        self.tx_hash = None;
        self.error = None;
        self.set_status(PurchaseStatus::Preparing);
        match self.run(intent).await {
            Ok(settled) => {
                self.tx_hash = Some(settled.tx_hash);
                self.set_status(PurchaseStatus::Success);
                PurchaseResult {
                    success: true,
                    tx_hash: Some(settled.tx_hash),
                    message: settled.note.map(str::to_string),
                }
            }
            Err(err) => {
                tracing::warn!(?err, "purchase attempt failed");
                self.tx_hash = err.tx_hash();
                self.error = Some(err.to_string());
                self.set_status(PurchaseStatus::Error);
                PurchaseResult {
                    success: false,
                    tx_hash: self.tx_hash,
                    message: self.error.clone(),
                }
            }
        }
    }

    async fn run(&mut self, intent: &PurchaseIntent) -> Result<Settled, PurchaseError> {
        let token = self
            .tokens
            .resolve(self.wallet.chain_id(), &intent.primary_coin);
        if token.requires_approval {
            self.ensure_allowance(intent, &token).await?;
        }

        // Order preparation runs the backend's gas estimation against the
        // buyer's current allowance, so it must not be requested until the
        // approval above has confirmed.
        self.set_status(PurchaseStatus::Preparing);
        let order = self
            .orders
            .prepare_order(&PrepareOrderRequest {
                asset_id: intent.asset_id,
                primary_amount: intent.primary_amount.clone(),
                primary_coin: intent.primary_coin.to_uppercase(),
                secondary_amount: intent.secondary_amount.clone(),
                secondary_coin: intent.secondary_coin.clone(),
                buyer: intent.buyer,
            })
            .await?;
        if order.is_expired(Utc::now()) {
            return Err(PurchaseError::ValidityExpired);
        }
        if order.chain != self.config.settlement_chain {
            return Err(PurchaseError::UnsupportedChain(order.chain));
        }

        self.set_status(PurchaseStatus::AwaitingSignature);
        let tx_hash = self
            .wallet
            .send_transaction(settlement_transaction(&order, self.wallet.address()))
            .await
            .map_err(PurchaseError::from_submission)?;
        tracing::info!(?tx_hash, "settlement transaction submitted");

        self.set_status(PurchaseStatus::Confirming);
        match self.chain.await_confirmation(tx_hash).await {
            Confirmation::Confirmed => Ok(Settled {
                tx_hash,
                note: None,
            }),
            Confirmation::Reverted => Err(PurchaseError::Reverted(tx_hash)),
            Confirmation::Unavailable => Ok(Settled {
                tx_hash,
                note: Some(RECEIPT_UNAVAILABLE_NOTE),
            }),
        }
    }

    /// Brings the spender's allowance up to the purchase amount, submitting
    /// a fresh approval when the observed allowance falls short. The
    /// allowance is read fresh on every attempt: caching it across attempts
    /// would race approvals made elsewhere.
    async fn ensure_allowance(
        &mut self,
        intent: &PurchaseIntent,
        token: &TokenDescriptor,
    ) -> Result<(), PurchaseError> {
        let (Some(token_address), Some(spender)) =
            (token.address, intent.spender.or(self.config.marketplace))
        else {
            // No contract or spender known for this deployment. The backend
            // may still be able to settle the purchase, so this is not an
            // error.
            tracing::warn!(
                coin = %intent.primary_coin,
                "currency has no approval deployment, skipping approval"
            );
            return Ok(());
        };

        self.set_status(PurchaseStatus::CheckingAllowance);
        let required =
            amount::to_atoms(&intent.primary_amount, token.decimals).context("purchase amount")?;
        let owner = self.wallet.address();
        let allowance = self.chain.allowance(token_address, owner, spender).await;
        if allowance >= required {
            tracing::debug!(%allowance, %required, "existing allowance is sufficient");
            return Ok(());
        }

        self.set_status(PurchaseStatus::AwaitingApproval);
        let Some(approval) = self.approve(token_address, spender).await else {
            return Err(PurchaseError::ApprovalRejected);
        };

        self.set_status(PurchaseStatus::ConfirmingApproval);
        match self.chain.await_confirmation(approval).await {
            Confirmation::Confirmed => Ok(()),
            Confirmation::Reverted => {
                tracing::warn!(?approval, "approval reverted on chain");
                Err(PurchaseError::ApprovalReverted)
            }
            Confirmation::Unavailable => {
                // Flaky receipt retrieval must not strand the buyer: the
                // approval may well have landed.
                tracing::warn!(?approval, "approval receipt unavailable, proceeding");
                Ok(())
            }
        }
    }

    /// Submits an unlimited approval so later purchases in the same currency
    /// skip the wallet round trip. Returns `None` when the wallet rejects or
    /// fails to submit.
    async fn approve(&self, token: Address, spender: Address) -> Option<TxHash> {
        let tx = TransactionRequest::default()
            .from(self.wallet.address())
            .to(token)
            .input(erc20::approve_calldata(spender).into());
        match self.wallet.send_transaction(tx).await {
            Ok(tx_hash) => {
                tracing::info!(?tx_hash, %token, %spender, "approval submitted");
                Some(tx_hash)
            }
            Err(err) => {
                tracing::warn!(?err, %token, "approval submission failed");
                None
            }
        }
    }

    fn set_status(&self, status: PurchaseStatus) {
        tracing::debug!(%status, "purchase status");
        self.status.send_replace(status);
    }
}

/// Builds the wallet transaction for a backend-prepared order.
fn settlement_transaction(order: &PreparedOrder, from: Address) -> TransactionRequest {
    let mut tx = TransactionRequest::default()
        .from(from)
        .to(order.tx_data.to)
        .input(order.tx_data.data.clone().into());
    if let Some(gas) = order.tx_data.gas {
        tx = tx.gas_limit(u64::try_from(gas).unwrap_or(u64::MAX));
    }
    if let Some(value) = order.tx_data.value {
        tx = tx.value(value);
    }
    tx
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::infra::{blockchain::MockBlockchain, wallet::MockWallet},
        alloy::primitives::{Bytes, TxKind, U256},
        mockall::{Sequence, predicate::eq},
        order_api::{MockOrderPreparing, OrderApiError, TxData},
        token_registry::chains,
    };

    const APPROVAL_HASH: TxHash = TxHash::repeat_byte(0xaa);
    const SETTLEMENT_HASH: TxHash = TxHash::repeat_byte(0xbb);

    fn buyer() -> Address {
        Address::repeat_byte(0x01)
    }

    fn marketplace() -> Address {
        Address::repeat_byte(0x02)
    }

    fn destination() -> Address {
        Address::repeat_byte(0x03)
    }

    fn intent(amount: &str, coin: &str) -> PurchaseIntent {
        PurchaseIntent {
            asset_id: 42,
            primary_amount: amount.parse().unwrap(),
            primary_coin: coin.to_string(),
            buyer: buyer(),
            secondary_amount: None,
            secondary_coin: None,
            spender: None,
        }
    }

    fn order(chain: &str, valid_for_seconds: i64) -> PreparedOrder {
        PreparedOrder {
            tx_data: TxData {
                to: destination(),
                data: Bytes::from(vec![0x13, 0x37]),
                gas: Some(U256::from(100_000)),
                value: None,
            },
            validity: Utc::now() + chrono::Duration::seconds(valid_for_seconds),
            chain: chain.to_string(),
        }
    }

    fn is_approval(tx: &TransactionRequest) -> bool {
        tx.input
            .input()
            .is_some_and(|data| data.starts_with(&[0x09, 0x5e, 0xa7, 0xb3]))
    }

    fn is_settlement(tx: &TransactionRequest) -> bool {
        tx.to == Some(TxKind::Call(destination()))
    }

    struct Mocks {
        wallet: MockWallet,
        chain: MockBlockchain,
        orders: MockOrderPreparing,
    }

    impl Mocks {
        fn new() -> Self {
            let mut wallet = MockWallet::new();
            wallet.expect_address().return_const(buyer());
            wallet.expect_chain_id().return_const(chains::MAINNET);
            Self {
                wallet,
                chain: MockBlockchain::new(),
                orders: MockOrderPreparing::new(),
            }
        }

        fn into_checkout(self) -> Checkout {
            Checkout::new(
                Arc::new(self.wallet),
                Arc::new(self.chain),
                Arc::new(self.orders),
                TokenRegistry::bundled(),
                Config {
                    settlement_chain: "ethereum".to_string(),
                    marketplace: Some(marketplace()),
                },
            )
        }
    }

    #[tokio::test]
    async fn native_coin_skips_allowance_and_approval() {
        crate::infra::observe::init_reentrant("checkout=debug");
        let mut mocks = Mocks::new();
        mocks.chain.expect_allowance().never();
        mocks
            .orders
            .expect_prepare_order()
            .times(1)
            .returning(|_| Ok(order("ethereum", 300)));
        mocks
            .wallet
            .expect_send_transaction()
            .withf(is_settlement)
            .times(1)
            .returning(|_| Ok(SETTLEMENT_HASH));
        mocks
            .chain
            .expect_await_confirmation()
            .with(eq(SETTLEMENT_HASH))
            .times(1)
            .returning(|_| Confirmation::Confirmed);

        let mut checkout = mocks.into_checkout();
        let result = checkout.purchase(&intent("0.5", "ETH")).await;

        assert!(result.success);
        assert_eq!(result.tx_hash, Some(SETTLEMENT_HASH));
        assert_eq!(result.message, None);
        assert_eq!(checkout.status(), PurchaseStatus::Success);
    }

    #[tokio::test]
    async fn erc20_with_empty_allowance_approves_before_preparing_and_settling() {
        let mut seq = Sequence::new();
        let mut mocks = Mocks::new();
        mocks
            .chain
            .expect_allowance()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|token, owner, spender| {
                (*token, *owner, *spender)
                    == (
                        token_registry::TokenRegistry::bundled()
                            .resolve(chains::MAINNET, "LCX")
                            .address
                            .unwrap(),
                        Address::repeat_byte(0x01),
                        Address::repeat_byte(0x02),
                    )
            })
            .returning(|_, _, _| U256::ZERO);
        mocks
            .wallet
            .expect_send_transaction()
            .withf(is_approval)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(APPROVAL_HASH));
        mocks
            .chain
            .expect_await_confirmation()
            .with(eq(APPROVAL_HASH))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Confirmation::Confirmed);
        mocks
            .orders
            .expect_prepare_order()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(order("ethereum", 300)));
        mocks
            .wallet
            .expect_send_transaction()
            .withf(is_settlement)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(SETTLEMENT_HASH));
        mocks
            .chain
            .expect_await_confirmation()
            .with(eq(SETTLEMENT_HASH))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Confirmation::Confirmed);

        let mut checkout = mocks.into_checkout();
        let result = checkout.purchase(&intent("100", "LCX")).await;

        assert!(result.success);
        assert_eq!(result.tx_hash, Some(SETTLEMENT_HASH));
        assert_eq!(checkout.status(), PurchaseStatus::Success);
    }

    #[tokio::test]
    async fn sufficient_allowance_skips_approval() {
        let mut mocks = Mocks::new();
        mocks
            .chain
            .expect_allowance()
            .times(1)
            // 100 LCX at 18 decimals, exactly the required amount.
            .returning(|_, _, _| U256::from(100_000_000_000_000_000_000_u128));
        mocks
            .orders
            .expect_prepare_order()
            .times(1)
            .returning(|_| Ok(order("ethereum", 300)));
        mocks
            .wallet
            .expect_send_transaction()
            .withf(is_settlement)
            .times(1)
            .returning(|_| Ok(SETTLEMENT_HASH));
        mocks
            .chain
            .expect_await_confirmation()
            .times(1)
            .returning(|_| Confirmation::Confirmed);

        let mut checkout = mocks.into_checkout();
        let result = checkout.purchase(&intent("100", "LCX")).await;

        assert!(result.success);
    }

    #[tokio::test]
    async fn unknown_erc20_deployment_skips_approval_but_still_purchases() {
        let mut mocks = Mocks::new();
        mocks.chain.expect_allowance().never();
        mocks
            .orders
            .expect_prepare_order()
            .times(1)
            .returning(|_| Ok(order("ethereum", 300)));
        mocks
            .wallet
            .expect_send_transaction()
            .withf(is_settlement)
            .times(1)
            .returning(|_| Ok(SETTLEMENT_HASH));
        mocks
            .chain
            .expect_await_confirmation()
            .times(1)
            .returning(|_| Confirmation::Confirmed);

        let mut checkout = mocks.into_checkout();
        // XAU requires approval but has no deployment in the registry.
        let result = checkout.purchase(&intent("1", "XAU")).await;

        assert!(result.success);
    }

    #[tokio::test]
    async fn wallet_refusing_the_approval_fails_the_attempt() {
        let mut mocks = Mocks::new();
        mocks
            .chain
            .expect_allowance()
            .times(1)
            .returning(|_, _, _| U256::ZERO);
        mocks
            .wallet
            .expect_send_transaction()
            .withf(is_approval)
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("user rejected the request")));
        mocks.orders.expect_prepare_order().never();

        let mut checkout = mocks.into_checkout();
        let result = checkout.purchase(&intent("100", "LCX")).await;

        assert!(!result.success);
        assert_eq!(result.tx_hash, None);
        assert!(result.message.unwrap().contains("approval"));
        assert_eq!(checkout.status(), PurchaseStatus::Error);
    }

    #[tokio::test]
    async fn reverted_approval_fails_the_attempt() {
        let mut mocks = Mocks::new();
        mocks
            .chain
            .expect_allowance()
            .times(1)
            .returning(|_, _, _| U256::ZERO);
        mocks
            .wallet
            .expect_send_transaction()
            .withf(is_approval)
            .times(1)
            .returning(|_| Ok(APPROVAL_HASH));
        mocks
            .chain
            .expect_await_confirmation()
            .times(1)
            .returning(|_| Confirmation::Reverted);
        mocks.orders.expect_prepare_order().never();

        let mut checkout = mocks.into_checkout();
        let result = checkout.purchase(&intent("100", "LCX")).await;

        assert!(!result.success);
        assert_eq!(checkout.status(), PurchaseStatus::Error);
    }

    #[tokio::test]
    async fn unavailable_approval_receipt_proceeds_optimistically() {
        let mut seq = Sequence::new();
        let mut mocks = Mocks::new();
        mocks
            .chain
            .expect_allowance()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| U256::ZERO);
        mocks
            .wallet
            .expect_send_transaction()
            .withf(is_approval)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(APPROVAL_HASH));
        mocks
            .chain
            .expect_await_confirmation()
            .with(eq(APPROVAL_HASH))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Confirmation::Unavailable);
        mocks
            .orders
            .expect_prepare_order()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(order("ethereum", 300)));
        mocks
            .wallet
            .expect_send_transaction()
            .withf(is_settlement)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(SETTLEMENT_HASH));
        mocks
            .chain
            .expect_await_confirmation()
            .with(eq(SETTLEMENT_HASH))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Confirmation::Confirmed);

        let mut checkout = mocks.into_checkout();
        let result = checkout.purchase(&intent("100", "LCX")).await;

        assert!(result.success);
    }

    #[tokio::test]
    async fn expired_validity_is_rejected_without_submitting() {
        let mut mocks = Mocks::new();
        mocks
            .orders
            .expect_prepare_order()
            .times(1)
            .returning(|_| Ok(order("ethereum", -5)));
        mocks.wallet.expect_send_transaction().never();

        let mut checkout = mocks.into_checkout();
        let result = checkout.purchase(&intent("0.5", "ETH")).await;

        assert!(!result.success);
        assert!(result.message.unwrap().contains("validity expired"));
        assert_eq!(checkout.status(), PurchaseStatus::Error);
    }

    #[tokio::test]
    async fn foreign_chain_is_rejected_without_submitting() {
        let mut mocks = Mocks::new();
        mocks
            .orders
            .expect_prepare_order()
            .times(1)
            .returning(|_| Ok(order("polygon", 300)));
        mocks.wallet.expect_send_transaction().never();

        let mut checkout = mocks.into_checkout();
        let result = checkout.purchase(&intent("0.5", "ETH")).await;

        assert!(!result.success);
        assert!(result.message.unwrap().contains("unsupported chain"));
    }

    #[tokio::test]
    async fn order_preparation_failure_is_terminal() {
        let mut mocks = Mocks::new();
        mocks
            .orders
            .expect_prepare_order()
            .times(1)
            .returning(|_| Err(OrderApiError::Rejected("asset is sold out".to_string())));
        mocks.wallet.expect_send_transaction().never();

        let mut checkout = mocks.into_checkout();
        let result = checkout.purchase(&intent("0.5", "ETH")).await;

        assert!(!result.success);
        assert!(result.message.unwrap().contains("asset is sold out"));
    }

    #[tokio::test]
    async fn user_rejecting_the_signature_is_reported_as_such() {
        let mut mocks = Mocks::new();
        mocks
            .orders
            .expect_prepare_order()
            .times(1)
            .returning(|_| Ok(order("ethereum", 300)));
        mocks
            .wallet
            .expect_send_transaction()
            .withf(is_settlement)
            .times(1)
            .returning(|_| {
                Err(anyhow::anyhow!(
                    "MetaMask Tx Signature: User denied transaction signature."
                ))
            });
        mocks.chain.expect_await_confirmation().never();

        let mut checkout = mocks.into_checkout();
        let result = checkout.purchase(&intent("0.5", "ETH")).await;

        assert!(!result.success);
        assert_eq!(result.tx_hash, None);
        assert!(result.message.unwrap().contains("rejected by user"));
        assert_eq!(checkout.status(), PurchaseStatus::Error);
    }

    #[tokio::test]
    async fn revert_still_returns_the_transaction_hash() {
        let mut mocks = Mocks::new();
        mocks
            .orders
            .expect_prepare_order()
            .times(1)
            .returning(|_| Ok(order("ethereum", 300)));
        mocks
            .wallet
            .expect_send_transaction()
            .times(1)
            .returning(|_| Ok(SETTLEMENT_HASH));
        mocks
            .chain
            .expect_await_confirmation()
            .times(1)
            .returning(|_| Confirmation::Reverted);

        let mut checkout = mocks.into_checkout();
        let result = checkout.purchase(&intent("0.5", "ETH")).await;

        assert!(!result.success);
        assert_eq!(result.tx_hash, Some(SETTLEMENT_HASH));
        assert!(result.message.unwrap().contains("reverted"));
        assert_eq!(checkout.tx_hash(), Some(SETTLEMENT_HASH));
    }

    #[tokio::test]
    async fn unavailable_receipt_is_a_tentative_success() {
        let mut mocks = Mocks::new();
        mocks
            .orders
            .expect_prepare_order()
            .times(1)
            .returning(|_| Ok(order("ethereum", 300)));
        mocks
            .wallet
            .expect_send_transaction()
            .times(1)
            .returning(|_| Ok(SETTLEMENT_HASH));
        mocks
            .chain
            .expect_await_confirmation()
            .times(1)
            .returning(|_| Confirmation::Unavailable);

        let mut checkout = mocks.into_checkout();
        let result = checkout.purchase(&intent("0.5", "ETH")).await;

        assert!(result.success);
        assert_eq!(result.tx_hash, Some(SETTLEMENT_HASH));
        assert_eq!(result.message.as_deref(), Some(RECEIPT_UNAVAILABLE_NOTE));
    }

    #[tokio::test]
    async fn reset_clears_terminal_state_and_allows_a_fresh_attempt() {
        let mut mocks = Mocks::new();
        mocks
            .orders
            .expect_prepare_order()
            .times(2)
            .returning(|_| Ok(order("ethereum", 300)));
        let mut rejected = true;
        mocks
            .wallet
            .expect_send_transaction()
            .times(2)
            .returning(move |_| {
                if std::mem::take(&mut rejected) {
                    Err(anyhow::anyhow!("user rejected the request"))
                } else {
                    Ok(SETTLEMENT_HASH)
                }
            });
        mocks
            .chain
            .expect_await_confirmation()
            .times(1)
            .returning(|_| Confirmation::Confirmed);

        let mut checkout = mocks.into_checkout();
        let result = checkout.purchase(&intent("0.5", "ETH")).await;
        assert!(!result.success);
        assert_eq!(checkout.status(), PurchaseStatus::Error);
        assert!(checkout.error().is_some());

        checkout.reset();
        assert_eq!(checkout.status(), PurchaseStatus::Idle);
        assert_eq!(checkout.tx_hash(), None);
        assert_eq!(checkout.error(), None);

        let result = checkout.purchase(&intent("0.5", "ETH")).await;
        assert!(result.success);
        assert_eq!(checkout.status(), PurchaseStatus::Success);
    }

    #[tokio::test]
    async fn intent_spender_overrides_the_configured_marketplace() {
        let spender = Address::repeat_byte(0x42);
        let mut mocks = Mocks::new();
        mocks
            .chain
            .expect_allowance()
            .withf(move |_, _, actual| *actual == spender)
            .times(1)
            .returning(|_, _, _| U256::MAX);
        mocks
            .orders
            .expect_prepare_order()
            .times(1)
            .returning(|_| Ok(order("ethereum", 300)));
        mocks
            .wallet
            .expect_send_transaction()
            .times(1)
            .returning(|_| Ok(SETTLEMENT_HASH));
        mocks
            .chain
            .expect_await_confirmation()
            .times(1)
            .returning(|_| Confirmation::Confirmed);

        let mut checkout = mocks.into_checkout();
        let result = checkout
            .purchase(&PurchaseIntent {
                spender: Some(spender),
                ..intent("100", "LCX")
            })
            .await;

        assert!(result.success);
    }

    #[tokio::test]
    async fn uppercases_the_currency_for_the_backend() {
        let mut mocks = Mocks::new();
        mocks
            .orders
            .expect_prepare_order()
            .withf(|request| request.primary_coin == "ETH" && request.asset_id == 42)
            .times(1)
            .returning(|_| Ok(order("ethereum", 300)));
        mocks
            .wallet
            .expect_send_transaction()
            .times(1)
            .returning(|_| Ok(SETTLEMENT_HASH));
        mocks
            .chain
            .expect_await_confirmation()
            .times(1)
            .returning(|_| Confirmation::Confirmed);

        let mut checkout = mocks.into_checkout();
        let result = checkout.purchase(&intent("0.5", "eth")).await;

        assert!(result.success);
    }
}
