//! Exact numeric types shared by the validation crates.
//!
//! Token amounts routinely exceed 2^53 and carry 18 fractional digits, so
//! nothing in here ever goes through an `f64` once a value has been parsed.

pub mod conversions;
pub mod decimal;
pub mod serialization;
pub mod u256_ext;

pub use decimal::{Decimal, ToDecimal, number_literal, to_decimal};
