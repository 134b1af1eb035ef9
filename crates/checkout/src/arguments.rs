use {
    alloy::{primitives::Address, signers::local::PrivateKeySigner},
    bigdecimal::BigDecimal,
    clap::Parser,
    std::{path::PathBuf, time::Duration},
    url::Url,
};

/// Runs a single purchase against the marketplace from the command line,
/// standing in for the storefront UI as the caller of the purchase flow.
#[derive(Debug, Parser)]
pub struct Arguments {
    #[clap(long, env, default_value = "warn,checkout=debug,order_api=debug")]
    pub log_filter: String,

    /// The Ethereum node URL to connect to.
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// The API endpoint of the marketplace backend.
    #[clap(long, env, default_value = "http://localhost:8080")]
    pub marketplace_api_url: Url,

    /// Optional API key for the marketplace backend.
    #[clap(long, env, hide_env_values = true)]
    pub marketplace_api_key: Option<String>,

    /// The private key used to sign transactions.
    #[clap(long, env, hide_env_values = true)]
    pub private_key: PrivateKeySigner,

    /// The marketplace settlement contract that receives token approvals.
    #[clap(long, env)]
    pub marketplace: Option<Address>,

    /// Name of the chain prepared orders must settle on.
    #[clap(long, env, default_value = "ethereum")]
    pub settlement_chain: String,

    /// Path to a TOML file with additional token deployments.
    #[clap(long, env)]
    pub tokens_config: Option<PathBuf>,

    /// Timeout for backend HTTP requests.
    #[clap(long, env, default_value = "10s", value_parser = humantime::parse_duration)]
    pub http_timeout: Duration,

    /// Identifier of the asset to purchase.
    #[clap(long, env)]
    pub asset_id: u64,

    /// Amount to pay, denominated in `--currency`.
    #[clap(long, env)]
    pub amount: BigDecimal,

    /// Settlement currency symbol.
    #[clap(long, env, default_value = "ETH")]
    pub currency: String,

    /// Secondary amount for listings priced in two currencies.
    #[clap(long, env, requires = "secondary_currency")]
    pub secondary_amount: Option<BigDecimal>,

    #[clap(long, env, requires = "secondary_amount")]
    pub secondary_currency: Option<String>,
}
