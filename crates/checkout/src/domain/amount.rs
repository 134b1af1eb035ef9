//! Conversion from human-denominated decimal amounts to smallest-unit token
//! atoms.

use {
    alloy::primitives::U256,
    anyhow::{Result, ensure},
    bigdecimal::{
        BigDecimal,
        num_bigint::{BigInt, Sign, ToBigInt},
    },
};

/// Scales `amount` by `10^decimals` and converts the result to a [`U256`].
/// The scaled amount must be a non-negative integer that fits in 256 bits:
/// allowances and transaction values have no notion of fractional atoms.
pub fn to_atoms(amount: &BigDecimal, decimals: u8) -> Result<U256> {
    ensure!(amount.sign() != Sign::Minus, "amount must not be negative");
    let scaled = amount * BigDecimal::new(BigInt::from(1), -i64::from(decimals));
    ensure!(
        scaled.is_integer(),
        "amount has more fractional digits than the token supports"
    );
    let atoms = scaled
        .to_bigint()
        .expect("integral BigDecimal converts to BigInt");
    let (_, bytes) = atoms.to_bytes_be();
    ensure!(bytes.len() <= 32, "amount too large");
    Ok(U256::from_be_slice(&bytes))
}
