//! Deployment registry for the marketplace's settlement currencies.
//!
//! Maps a (chain id, currency symbol) pair to the on-chain data the checkout
//! flow needs: token contract address, decimal precision and whether settling
//! in that currency requires an ERC-20 approval. Lookups are pure table reads
//! and never touch chain state.

use {
    alloy::primitives::{Address, address},
    serde::Deserialize,
    serde_with::{DisplayFromStr, serde_as},
    std::{collections::HashMap, path::Path},
    thiserror::Error,
};

pub mod chains {
    pub const MAINNET: u64 = 1;
    pub const SEPOLIA: u64 = 11155111;
}

/// Decimal precision assumed for symbols without a known deployment.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Symbols that settle in the chain's gas currency. Everything else is
/// treated as an ERC-20 and needs an approval before the marketplace
/// contract can pull funds.
const NATIVE_COINS: &[&str] = &["ETH"];

/// Whether purchases in this currency require an ERC-20 approval first.
pub fn requires_approval(symbol: &str) -> bool {
    !NATIVE_COINS.contains(&symbol.to_uppercase().as_str())
}

/// Everything the checkout flow needs to know about a settlement currency on
/// a specific chain.
///
/// A `None` address means the currency has no known contract on that chain.
/// The flow must not attempt an approval in that case, but it may still hand
/// the purchase to the backend.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TokenDescriptor {
    pub address: Option<Address>,
    pub decimals: u8,
    pub requires_approval: bool,
}

/// A single token deployment as it appears in the registry and in override
/// files.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
pub struct Deployment {
    pub address: Address,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

fn default_decimals() -> u8 {
    DEFAULT_DECIMALS
}

/// Per-chain tables of token deployments.
#[derive(Clone, Debug, Default)]
pub struct TokenRegistry {
    deployments: HashMap<u64, HashMap<String, Deployment>>,
}

impl TokenRegistry {
    /// The deployments baked into the binary.
    pub fn bundled() -> Self {
        let mut registry = Self::default();
        registry.insert(
            chains::MAINNET,
            "LCX",
            Deployment {
                address: address!("0x037A54AaB062628C9Bbae1FDB1583c195585fe41"),
                decimals: 18,
            },
        );
        registry.insert(
            chains::MAINNET,
            "USDC",
            Deployment {
                address: address!("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
                decimals: 6,
            },
        );
        registry.insert(
            chains::MAINNET,
            "USDT",
            Deployment {
                address: address!("0xdAC17F958D2ee523a2206206994597C13D831ec7"),
                decimals: 6,
            },
        );
        registry.insert(
            chains::SEPOLIA,
            "USDC",
            Deployment {
                address: address!("0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238"),
                decimals: 6,
            },
        );
        registry
    }

    /// Resolves the deployment of `symbol` on `chain_id`. Symbols are
    /// case-insensitive. Unknown chains and symbols resolve to a descriptor
    /// without an address rather than an error.
    pub fn resolve(&self, chain_id: u64, symbol: &str) -> TokenDescriptor {
        let symbol = symbol.to_uppercase();
        let deployment = self
            .deployments
            .get(&chain_id)
            .and_then(|tokens| tokens.get(&symbol));
        TokenDescriptor {
            address: deployment.map(|deployment| deployment.address),
            decimals: deployment
                .map(|deployment| deployment.decimals)
                .unwrap_or(DEFAULT_DECIMALS),
            requires_approval: requires_approval(&symbol),
        }
    }

    /// Merges override deployments into the registry. Overrides win over
    /// bundled entries for the same (chain, symbol).
    pub fn apply(&mut self, overrides: RegistryConfig) {
        for (chain_id, tokens) in overrides.tokens {
            for (symbol, deployment) in tokens {
                self.insert(chain_id, &symbol, deployment);
            }
        }
    }

    fn insert(&mut self, chain_id: u64, symbol: &str, deployment: Deployment) {
        self.deployments
            .entry(chain_id)
            .or_default()
            .insert(symbol.to_uppercase(), deployment);
    }
}

/// Token deployment overrides, loaded from a TOML file of the form:
///
/// ```toml
/// [tokens.1.LCX]
/// address = "0x037A54AaB062628C9Bbae1FDB1583c195585fe41"
/// decimals = 18
/// ```
#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    #[serde_as(as = "HashMap<DisplayFromStr, _>")]
    tokens: HashMap<u64, HashMap<String, Deployment>>,
}

impl RegistryConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|err| ConfigError::Read(path.display().to_string(), err))?;
        Ok(toml::from_str(&contents)?)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read token config {0}")]
    Read(String, #[source] std::io::Error),
    #[error("invalid token config")]
    Parse(#[from] toml::de::Error),
}
