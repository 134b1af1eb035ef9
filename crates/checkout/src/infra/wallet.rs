use {
    alloy::{
        network::EthereumWallet,
        primitives::{Address, TxHash},
        providers::{DynProvider, Provider, ProviderBuilder},
        rpc::types::TransactionRequest,
        signers::local::PrivateKeySigner,
    },
    anyhow::{Context, Result},
    async_trait::async_trait,
    url::Url,
};

/// The buyer's connected wallet: an account on a specific chain that signs
/// and broadcasts transactions. Submission returns as soon as the wallet
/// hands back a hash; waiting for confirmation is the caller's concern.
///
/// There is deliberately no timeout around submission: a wallet may keep a
/// signature request pending until the user acts on it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Wallet: Send + Sync {
    fn address(&self) -> Address;
    fn chain_id(&self) -> u64;
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash>;
}

/// [`Wallet`] signing with a locally held private key.
#[derive(Clone, Debug)]
pub struct SignerWallet {
    provider: DynProvider,
    address: Address,
    chain_id: u64,
}

impl SignerWallet {
    /// Connects to the node at `node_url` with `signer` as the active
    /// account.
    pub async fn connect(node_url: &Url, signer: PrivateKeySigner) -> Result<Self> {
        let address = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::new(signer))
            .connect(node_url.as_str())
            .await
            .context("failed to connect to node")?
            .erased();
        let chain_id = provider
            .get_chain_id()
            .await
            .context("failed to fetch chain id")?;
        Ok(Self {
            provider,
            address,
            chain_id,
        })
    }

    /// The underlying provider, for read-only chain access sharing the same
    /// connection.
    pub fn provider(&self) -> DynProvider {
        self.provider.clone()
    }
}

#[async_trait]
impl Wallet for SignerWallet {
    fn address(&self) -> Address {
        self.address
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash> {
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .context("failed to submit transaction")?;
        Ok(*pending.tx_hash())
    }
}
