//! Arbitrary precision decimals.
//!
//! A [`Decimal`] is a signed coefficient together with a non-negative scale,
//! i.e. `coefficient * 10^-scale`. Parsing keeps every digit of the textual
//! input, including trailing fractional zeros, and the canonical string form
//! never uses scientific notation.

use {
    crate::{
        conversions::{big_decimal_to_u256, u256_to_big_decimal},
        u256_ext::U256Ext,
    },
    alloy_primitives::U256,
    bigdecimal::BigDecimal,
    num::{BigInt, Signed, Zero},
    serde::{Deserialize, Deserializer, Serialize, Serializer, de},
    std::{
        fmt::{self, Display, Formatter},
        ops::{Add, Mul, Neg, Sub},
        str::FromStr,
    },
};

/// Largest accepted magnitude of a scientific notation exponent. Anything
/// above would expand into an unreasonably long plain string.
pub const MAX_EXPONENT: i64 = 10_000;

const JSON_NUMBER_TOKEN: &str = "$serde_json::private::Number";

const NON_FINITE_MESSAGE: &str = "non-finite values (NaN, Infinity, -Infinity) are not allowed";

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("{NON_FINITE_MESSAGE}")]
    NonFinite,
    #[error("invalid decimal {input:?}: {reason}")]
    Format { input: String, reason: &'static str },
    #[error("cannot express {value} in base units with {decimals} decimals: {reason}")]
    Units {
        value: String,
        decimals: u8,
        reason: String,
    },
}

/// An exact decimal number.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Decimal(BigDecimal);

impl Decimal {
    pub fn zero() -> Self {
        Self(BigDecimal::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Number of digits after the decimal point.
    pub fn scale(&self) -> i64 {
        self.0.as_bigint_and_exponent().1
    }

    /// The same value with trailing fractional zeros removed.
    pub fn normalized(&self) -> Self {
        Self::from_big_decimal(self.0.normalized())
    }

    pub fn as_big_decimal(&self) -> &BigDecimal {
        &self.0
    }

    /// Interprets `amount` as an integer number of base units of a token
    /// with `decimals` decimals, e.g. wei for 18 decimals.
    pub fn from_units(amount: U256, decimals: u8) -> Self {
        Self(BigDecimal::new(amount.to_big_int(), i64::from(decimals)))
    }

    /// Converts the value into an integer number of base units of a token
    /// with `decimals` decimals.
    ///
    /// Fails for negative values, for values with more significant
    /// fractional digits than `decimals` and for values that overflow 256
    /// bits. Nothing is ever rounded.
    pub fn to_units(&self, decimals: u8) -> Result<U256, Error> {
        let units_error = |reason: &str| Error::Units {
            value: self.to_string(),
            decimals,
            reason: reason.to_string(),
        };
        if self.is_negative() {
            return Err(units_error("negative amount"));
        }
        let (coefficient, scale) = self.0.as_bigint_and_exponent();
        let units = BigDecimal::new(coefficient, scale - i64::from(decimals));
        if !units.is_integer() {
            return Err(units_error("too many fractional digits"));
        }
        big_decimal_to_u256(&units).ok_or_else(|| units_error("does not fit into 256 bits"))
    }

    /// Wraps a big decimal, folding negative scales into the coefficient so
    /// that the plain string form and the internal form always agree.
    fn from_big_decimal(value: BigDecimal) -> Self {
        if value.as_bigint_and_exponent().1 >= 0 {
            return Self(value);
        }
        Self(value.with_scale(0))
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_plain_string())
    }
}

impl FromStr for Decimal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Values that can be turned into a [`Decimal`].
pub trait ToDecimal {
    fn to_decimal(self) -> Result<Decimal, Error>;
}

/// Parses `input` into an exact decimal.
///
/// Already parsed decimals are returned unchanged, strings are parsed with
/// the strict grammar described on [`parse`] and floats must be finite.
pub fn to_decimal(input: impl ToDecimal) -> Result<Decimal, Error> {
    input.to_decimal()
}

/// Parses the literal of a JSON number exactly. JSON allows an uppercase
/// exponent marker, which the string grammar does not.
pub fn number_literal(literal: &str) -> Result<Decimal, Error> {
    parse(&literal.to_ascii_lowercase())
}

impl ToDecimal for Decimal {
    fn to_decimal(self) -> Result<Decimal, Error> {
        Ok(self)
    }
}

impl ToDecimal for &Decimal {
    fn to_decimal(self) -> Result<Decimal, Error> {
        Ok(self.clone())
    }
}

impl ToDecimal for &str {
    fn to_decimal(self) -> Result<Decimal, Error> {
        parse(self)
    }
}

impl ToDecimal for &String {
    fn to_decimal(self) -> Result<Decimal, Error> {
        parse(self)
    }
}

impl ToDecimal for f64 {
    fn to_decimal(self) -> Result<Decimal, Error> {
        if !self.is_finite() {
            return Err(Error::NonFinite);
        }
        // `Display` for floats prints the shortest digits that round trip and
        // never switches to exponent notation, so `0.1` stays `0.1`.
        parse(&self.to_string())
    }
}

impl ToDecimal for f32 {
    fn to_decimal(self) -> Result<Decimal, Error> {
        if !self.is_finite() {
            return Err(Error::NonFinite);
        }
        parse(&self.to_string())
    }
}

macro_rules! impl_to_decimal_for_integer {
    ($($t:ty),*) => {
        $(
            impl ToDecimal for $t {
                fn to_decimal(self) -> Result<Decimal, Error> {
                    Ok(Decimal(BigDecimal::from(BigInt::from(self))))
                }
            }
        )*
    };
}

impl_to_decimal_for_integer!(i32, i64, i128, u32, u64, u128);

impl ToDecimal for U256 {
    fn to_decimal(self) -> Result<Decimal, Error> {
        Ok(Decimal(u256_to_big_decimal(&self)))
    }
}

fn is_non_finite(s: &str) -> bool {
    ["nan", "infinity", "+infinity", "-infinity"]
        .iter()
        .any(|sentinel| s.eq_ignore_ascii_case(sentinel))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parses a decimal string.
///
/// Grammar: `[+-]? (digits ('.' digits)? | '.' digits) ('e' [+-]? digits)?`.
/// No whitespace is trimmed, `"."` and `"5."` are rejected, `".5"` is
/// accepted and only a lowercase `e` introduces an exponent.
pub fn parse(s: &str) -> Result<Decimal, Error> {
    if is_non_finite(s) {
        return Err(Error::NonFinite);
    }
    let format_error = |reason| Error::Format {
        input: s.to_string(),
        reason,
    };

    let (mantissa, exponent) = match s.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (s, None),
    };
    let (negative, unsigned) = match mantissa.as_bytes().first() {
        Some(b'-') => (true, &mantissa[1..]),
        Some(b'+') => (false, &mantissa[1..]),
        _ => (false, mantissa),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (unsigned, ""),
    };
    if unsigned.contains('.') && !is_digits(fraction) {
        return Err(format_error("expected digits after the decimal point"));
    }
    if !integer.is_empty() && !is_digits(integer) {
        return Err(format_error("expected only digits, one sign and one decimal point"));
    }
    if integer.is_empty() && fraction.is_empty() {
        return Err(format_error("expected at least one digit"));
    }

    let exponent = match exponent {
        None => 0,
        Some(exponent) => {
            let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
            if !is_digits(digits) {
                return Err(format_error("expected digits after the exponent marker"));
            }
            exponent
                .parse::<i64>()
                .ok()
                .filter(|exponent| (-MAX_EXPONENT..=MAX_EXPONENT).contains(exponent))
                .ok_or_else(|| format_error("exponent out of range"))?
        }
    };

    let digits = format!("{integer}{fraction}");
    let mut coefficient =
        BigInt::from_str(&digits).map_err(|_| format_error("expected only digits"))?;
    if negative {
        coefficient = -coefficient;
    }
    // `fraction` is bounded by the input length, which always fits.
    let fraction_len = i64::try_from(fraction.len()).map_err(|_| format_error("too long"))?;
    Ok(Decimal::from_big_decimal(BigDecimal::new(
        coefficient,
        fraction_len - exponent,
    )))
}

impl Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Self) -> Self::Output {
        Decimal(self.0 + rhs.0)
    }
}

impl Add<&Decimal> for &Decimal {
    type Output = Decimal;

    fn add(self, rhs: &Decimal) -> Self::Output {
        Decimal(&self.0 + &rhs.0)
    }
}

impl Sub for Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Self) -> Self::Output {
        Decimal(self.0 - rhs.0)
    }
}

impl Sub<&Decimal> for &Decimal {
    type Output = Decimal;

    fn sub(self, rhs: &Decimal) -> Self::Output {
        Decimal(&self.0 - &rhs.0)
    }
}

impl Mul for Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Self) -> Self::Output {
        Decimal(self.0 * rhs.0)
    }
}

impl Mul<&Decimal> for &Decimal {
    type Output = Decimal;

    fn mul(self, rhs: &Decimal) -> Self::Output {
        Decimal(&self.0 * &rhs.0)
    }
}

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Self::Output {
        Decimal(-self.0)
    }
}

impl std::iter::Sum for Decimal {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Decimal::zero(), Add::add)
    }
}

impl Serialize for Decimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor;

        impl<'de> de::Visitor<'de> for Visitor {
            type Value = Decimal;

            fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
                write!(formatter, "a decimal encoded as a string or a number")
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                to_decimal(s).map_err(de::Error::custom)
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                to_decimal(v).map_err(de::Error::custom)
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                to_decimal(v).map_err(de::Error::custom)
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                to_decimal(v).map_err(de::Error::custom)
            }

            // serde_json with `arbitrary_precision` hands numbers over as a
            // single entry map holding the literal.
            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                match map.next_entry::<String, String>()? {
                    Some((key, literal)) if key == JSON_NUMBER_TOKEN => {
                        number_literal(&literal).map_err(de::Error::custom)
                    }
                    _ => Err(de::Error::invalid_type(de::Unexpected::Map, &self)),
                }
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}
