//! Checksum normalization of addresses and hashes.
//!
//! Addresses are normalized to their EIP-55 mixed case form. A mixed case
//! input whose casing does not match the checksum is rejected rather than
//! corrected: a wrong checksum usually means a typo, and silently fixing it
//! could send funds somewhere else.
//!
//! <https://eips.ethereum.org/EIPS/eip-55>

use {
    crate::{Validate, error::ValidationError, input},
    alloy_primitives::B256,
    serde::{Serialize, Serializer},
    serde_json::Value,
    std::{
        fmt::{self, Debug, Display, Formatter},
        str::FromStr,
    },
};

/// A 20 byte account or contract address.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Address(pub alloy_primitives::Address);

/// A 32 byte hash, rendered as lowercase hex.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Hash(pub B256);

/// Validates `input` as an address and returns its checksummed form.
pub fn normalize_address(input: &Value) -> Result<Address, ValidationError> {
    parse_address(input::as_str(input)?)
}

/// Validates `input` as a 32 byte hash.
pub fn normalize_hash(input: &Value) -> Result<Hash, ValidationError> {
    parse_hash(input::as_str(input)?)
}

pub fn parse_address(s: &str) -> Result<Address, ValidationError> {
    let digits = hex_digits(s, 40, "address")?;
    let mut bytes = [0u8; 20];
    const_hex::decode_to_slice(digits, &mut bytes)
        .map_err(|err| ValidationError::format(format!("address {s:?} is not valid hex: {err}")))?;

    let address = Address(alloy_primitives::Address::from(bytes));
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    if has_upper && has_lower {
        let expected = address.to_checksum();
        if expected[2..] != *digits {
            return Err(ValidationError::checksum(format!(
                "address {s:?} has an invalid checksum, expected {expected}"
            )));
        }
    }
    Ok(address)
}

pub fn parse_hash(s: &str) -> Result<Hash, ValidationError> {
    let digits = hex_digits(s, 64, "hash")?;
    let mut bytes = [0u8; 32];
    const_hex::decode_to_slice(digits, &mut bytes)
        .map_err(|err| ValidationError::format(format!("hash {s:?} is not valid hex: {err}")))?;
    Ok(Hash(B256::from(bytes)))
}

/// Checks the `0x` prefix, the exact length and the character set and
/// returns the hex digits without the prefix.
fn hex_digits<'a>(s: &'a str, digits: usize, what: &str) -> Result<&'a str, ValidationError> {
    let expected = digits + 2;
    let found = s.chars().count();
    if found < expected {
        return Err(ValidationError::format(format!(
            "{what} {s:?} is too short: expected {expected} characters, found {found}"
        )));
    }
    if found > expected {
        return Err(ValidationError::format(format!(
            "{what} {s:?} is too long: expected {expected} characters, found {found}"
        )));
    }
    let Some(hex) = s.strip_prefix("0x") else {
        return Err(ValidationError::format(format!(
            "{what} {s:?} must start with 0x"
        )));
    };
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ValidationError::format(format!(
            "{what} {s:?} contains bad characters: expected only hex digits after 0x"
        )));
    }
    Ok(hex)
}

impl Address {
    pub const ZERO: Self = Self(alloy_primitives::Address::ZERO);

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0.0.0
    }

    /// The canonical `0x` prefixed EIP-55 string.
    pub fn to_checksum(&self) -> String {
        self.0.to_checksum(None)
    }
}

impl Hash {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0.0
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes.into())
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes.into())
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl Display for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&const_hex::encode_prefixed(self.0))
    }
}

impl Debug for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl FromStr for Address {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_address(s)
    }
}

impl FromStr for Hash {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hash(s)
    }
}

impl Validate for Address {
    fn validate(input: &Value) -> Result<Self, ValidationError> {
        normalize_address(input)
    }
}

impl Validate for Hash {
    fn validate(input: &Value) -> Result<Self, ValidationError> {
        normalize_hash(input)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl Serialize for Hash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

deserialize_with_validate!(Address);
deserialize_with_validate!(Hash);

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::error::ErrorKind,
        hex_literal::hex,
        serde_json::json,
    };

    const LOWER: &str = "0x71c7656ec7ab88b098defb751b7401b5f6d8976f";
    const CHECKSUMMED: &str = "0x71C7656EC7ab88b098defB751B7401B5f6d8976F";

    #[test]
    fn lowercase_is_checksummed() {
        let address = normalize_address(&json!(LOWER)).unwrap();
        assert_eq!(address.to_string(), CHECKSUMMED);
        assert_eq!(
            address.as_bytes(),
            &hex!("71c7656ec7ab88b098defb751b7401b5f6d8976f")
        );
    }

    #[test]
    fn uppercase_is_checksummed() {
        let upper = format!("0x{}", LOWER[2..].to_ascii_uppercase());
        assert_eq!(
            normalize_address(&json!(upper)).unwrap().to_string(),
            CHECKSUMMED
        );
    }

    #[test]
    fn checksummed_input_is_kept() {
        let address = normalize_address(&json!(CHECKSUMMED)).unwrap();
        assert_eq!(address.to_string(), CHECKSUMMED);
        assert_eq!(address, normalize_address(&json!(LOWER)).unwrap());
    }

    #[test]
    fn eip55_test_vectors() {
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let lower = expected.to_ascii_lowercase();
            let address = parse_address(&lower).unwrap();
            assert_eq!(address.to_string(), expected);
            assert_eq!(address.to_string(), address.0.to_checksum(None));
        }
    }

    #[test]
    fn single_flipped_case_is_rejected() {
        // 'C' at position 3 of the digits flipped to lowercase.
        let typo = "0x71c7656EC7ab88b098defB751B7401B5f6d8976F";
        let err = normalize_address(&json!(typo)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Checksum);
        assert!(err.message().contains(CHECKSUMMED));

        let typo = "0x71C7656EC7ab88b098defB751B7401B5f6d8976f";
        assert_eq!(
            normalize_address(&json!(typo)).unwrap_err().kind(),
            ErrorKind::Checksum
        );
    }

    #[test]
    fn format_errors_are_distinguished() {
        let err = normalize_address(&json!("0x71c7")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.message().contains("too short"));

        let err = normalize_address(&json!(format!("{LOWER}00"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.message().contains("too long"));

        let err = normalize_address(&json!("0x71c7656ec7ab88b098defb751b7401b5f6d8976g")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.message().contains("bad characters"));

        let err = normalize_address(&json!("0071c7656ec7ab88b098defb751b7401b5f6d8976f")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.message().contains("0x"));

        let err = normalize_address(&json!(42)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn length_counts_characters() {
        // 42 characters, 43 bytes
        let input = "0x71c7656ec7ab88b098defb751b7401b5f6d8976é";
        let err = normalize_address(&json!(input)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.message().contains("bad characters"), "{}", err.message());

        let err = normalize_hash(&json!(format!("0x{}ü", "0".repeat(63)))).unwrap_err();
        assert!(err.message().contains("bad characters"), "{}", err.message());
    }

    #[test]
    fn checksum_matches_alloy() {
        for byte in [0x00u8, 0x11, 0xab, 0xee, 0xff] {
            let address = Address::from([byte; 20]);
            assert_eq!(address.to_checksum(), address.0.to_checksum(None));
        }
        assert_eq!(
            Address::ZERO.to_string(),
            "0x0000000000000000000000000000000000000000"
        );
        assert!(Address::ZERO.is_zero());
    }

    #[test]
    fn hashes_are_lowercased() {
        let input = "0xABCDEF0123456789abcdef0123456789ABCDEF0123456789abcdef0123456789";
        let hash = normalize_hash(&json!(input)).unwrap();
        assert_eq!(hash.to_string(), input.to_ascii_lowercase());

        let err = normalize_hash(&json!(LOWER)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.message().contains("too short"));
        let err = normalize_hash(&json!(format!("{input}0"))).unwrap_err();
        assert!(err.message().contains("too long"));
    }

    #[test]
    fn serde_round_trip() {
        let address: Address = serde_json::from_value(json!(LOWER)).unwrap();
        let serialized = serde_json::to_value(address).unwrap();
        assert_eq!(serialized, json!(CHECKSUMMED));
        assert_eq!(normalize_address(&serialized).unwrap(), address);

        let hash = Hash::from([0xab; 32]);
        let serialized = serde_json::to_value(hash).unwrap();
        assert_eq!(serde_json::from_value::<Hash>(serialized).unwrap(), hash);

        assert!(serde_json::from_value::<Address>(json!("0x71c7656EC7ab88b098defB751B7401B5f6d8976F")).is_err());
    }
}
