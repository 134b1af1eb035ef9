use {alloy::primitives::Address, bigdecimal::BigDecimal};

/// A buyer's intent to purchase a single marketplace asset. Immutable for the
/// lifetime of one purchase attempt.
#[derive(Clone, Debug)]
pub struct PurchaseIntent {
    /// Marketplace identifier of the asset being bought.
    pub asset_id: u64,
    /// Amount to pay, denominated in `primary_coin`.
    pub primary_amount: BigDecimal,
    /// Settlement currency symbol. Matched case-insensitively.
    pub primary_coin: String,
    /// The buying wallet.
    pub buyer: Address,
    /// Secondary amount for listings priced in two currencies.
    pub secondary_amount: Option<BigDecimal>,
    pub secondary_coin: Option<String>,
    /// Overrides the configured marketplace contract as the approval spender.
    pub spender: Option<Address>,
}
