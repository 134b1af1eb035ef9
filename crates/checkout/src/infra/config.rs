use alloy::primitives::Address;

/// Static configuration of the purchase flow.
#[derive(Clone, Debug)]
pub struct Config {
    /// Name of the chain prepared orders must settle on. Orders targeting
    /// any other chain are rejected, there is no cross-chain fallback.
    pub settlement_chain: String,
    /// The marketplace contract that pulls settlement funds, used as the
    /// approval spender when the intent carries no override.
    pub marketplace: Option<Address>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settlement_chain: "ethereum".to_string(),
            marketplace: None,
        }
    }
}
