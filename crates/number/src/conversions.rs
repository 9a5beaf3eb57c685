use {
    crate::u256_ext::U256Ext,
    alloy_primitives::U256,
    bigdecimal::{BigDecimal, num_bigint::ToBigInt},
};

pub fn u256_to_big_decimal(u256: &U256) -> BigDecimal {
    BigDecimal::from(u256.to_big_int())
}

/// `None` for negative or fractional values and for values that do not fit
/// into 256 bits.
pub fn big_decimal_to_u256(big_decimal: &BigDecimal) -> Option<U256> {
    if !big_decimal.is_integer() {
        return None;
    }
    let big_int = big_decimal.to_bigint()?;
    U256::from_big_int(&big_int).ok()
}
