use {
    anyhow::{Context, Result, bail},
    checkout::{
        arguments::Arguments,
        domain::{Checkout, PurchaseIntent},
        infra::{self, Config, Rpc, SignerWallet, Wallet as _},
    },
    clap::Parser,
    std::sync::Arc,
    token_registry::{RegistryConfig, TokenRegistry},
};

#[tokio::main]
async fn main() {
    let args = Arguments::parse();
    infra::observe::init(&args.log_filter);

    if let Err(err) = run(args).await {
        tracing::error!(?err, "checkout failed");
        std::process::exit(1);
    }
}

async fn run(args: Arguments) -> Result<()> {
    let wallet = SignerWallet::connect(&args.node_url, args.private_key.clone())
        .await
        .context("wallet connection")?;
    tracing::info!(
        address = %wallet.address(),
        chain_id = wallet.chain_id(),
        "wallet connected"
    );

    let chain = Rpc::new(wallet.provider());

    let mut tokens = TokenRegistry::bundled();
    if let Some(path) = &args.tokens_config {
        tokens.apply(RegistryConfig::load(path)?);
    }

    let client = reqwest::Client::builder()
        .timeout(args.http_timeout)
        .build()
        .context("http client")?;
    let orders = order_api::DefaultOrderApi::new(
        args.marketplace_api_url.clone(),
        args.marketplace_api_key.clone(),
        client,
    )
    .context("order api client")?;

    let intent = PurchaseIntent {
        asset_id: args.asset_id,
        primary_amount: args.amount.clone(),
        primary_coin: args.currency.clone(),
        buyer: wallet.address(),
        secondary_amount: args.secondary_amount.clone(),
        secondary_coin: args.secondary_currency.clone(),
        spender: None,
    };

    let mut checkout = Checkout::new(
        Arc::new(wallet),
        Arc::new(chain),
        Arc::new(orders),
        tokens,
        Config {
            settlement_chain: args.settlement_chain,
            marketplace: args.marketplace,
        },
    );

    let mut status = checkout.subscribe();
    tokio::spawn(async move {
        while status.changed().await.is_ok() {
            tracing::info!(status = %*status.borrow(), "purchase status");
        }
    });

    let result = checkout.purchase(&intent).await;
    if !result.success {
        bail!(
            "purchase failed: {}{}",
            result.message.unwrap_or_default(),
            result
                .tx_hash
                .map(|hash| format!(" (transaction {hash})"))
                .unwrap_or_default()
        );
    }
    tracing::info!(tx_hash = ?result.tx_hash, note = ?result.message, "purchase settled");
    Ok(())
}
