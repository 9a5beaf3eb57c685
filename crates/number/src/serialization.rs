use {alloy_primitives::U256, serde::Serializer, serde_with::SerializeAs};

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ParseU256Error {
    #[error("{0:?} is not a 0x prefixed hex or a decimal encoded uint256")]
    Format(String),
    #[error("{0:?} does not fit into 256 bits")]
    Overflow(String),
}

/// Parses a uint256 from either a `0x` prefixed hex string or a plain
/// decimal string. Signs, whitespace and digit separators are rejected.
pub fn parse_u256(s: &str) -> Result<U256, ParseU256Error> {
    let (digits, radix) = match s.strip_prefix("0x") {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };
    let valid = !digits.is_empty()
        && digits.chars().all(|c| match radix {
            16 => c.is_ascii_hexdigit(),
            _ => c.is_ascii_digit(),
        });
    if !valid {
        return Err(ParseU256Error::Format(s.to_string()));
    }
    U256::from_str_radix(digits, radix).map_err(|_| ParseU256Error::Overflow(s.to_string()))
}

/// Serializes [`U256`] as a decimal string. [`parse_u256`] reads it back
/// along with the `0x` prefixed hex form.
pub struct DecimalU256;

impl SerializeAs<U256> for DecimalU256 {
    fn serialize_as<S>(source: &U256, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&source.to_string())
    }
}
