//! ABI encoded module parameters.
//!
//! Compliance modules receive their configuration as a single ABI encoded
//! value: `address[]` for the address and identity lists, `uint16[]` for the
//! country lists and `(uint8,uint256)[]` holding the postfix expression for
//! identity verification.

use {
    super::{country::CountryCode, expression::ExpressionNode},
    crate::{Validate, address::Address, error::ValidationError, input},
    alloy_sol_types::{SolValue, sol},
    serde::{Serialize, Serializer},
    serde_json::Value,
    std::fmt::{self, Debug, Display, Formatter},
};

sol! {
    struct ExpressionNodeSol {
        uint8 nodeType;
        uint256 value;
    }
}

#[derive(Clone, Default, Eq, PartialEq, Hash)]
pub struct AbiParams(Vec<u8>);

impl AbiParams {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn addresses(addresses: &[Address]) -> Self {
        let addresses = addresses
            .iter()
            .map(|address| address.0)
            .collect::<Vec<_>>();
        Self(addresses.abi_encode())
    }

    pub fn country_codes(codes: &[CountryCode]) -> Self {
        let codes = codes.iter().map(|code| code.code()).collect::<Vec<u16>>();
        Self(codes.abi_encode())
    }

    pub fn expression(postfix: &[ExpressionNode]) -> Self {
        let nodes = postfix
            .iter()
            .map(|node| ExpressionNodeSol {
                nodeType: node.node_type as u8,
                value: node.value,
            })
            .collect::<Vec<_>>();
        Self(nodes.abi_encode())
    }
}

impl From<Vec<u8>> for AbiParams {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl Display for AbiParams {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&const_hex::encode_prefixed(&self.0))
    }
}

impl Debug for AbiParams {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// Caller supplied parameters are kept verbatim, they only need to be `0x`
/// prefixed hex bytes.
impl Validate for AbiParams {
    fn validate(value: &Value) -> Result<Self, ValidationError> {
        let s = input::as_str(value)?;
        let Some(hex) = s.strip_prefix("0x") else {
            return Err(ValidationError::format(format!(
                "params {s:?} must start with 0x"
            )));
        };
        const_hex::decode(hex)
            .map(Self)
            .map_err(|err| ValidationError::format(format!("params {s:?} are not hex bytes: {err}")))
    }
}

impl Serialize for AbiParams {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

deserialize_with_validate!(AbiParams);

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{error::ErrorKind, topic::TopicName},
        alloy_primitives::U256,
        hex_literal::hex,
        serde_json::json,
    };

    fn word(bytes: &[u8], index: usize) -> &[u8] {
        &bytes[index * 32..(index + 1) * 32]
    }

    #[test]
    fn empty_list_is_offset_and_length() {
        let params = AbiParams::addresses(&[]);
        assert_eq!(params.as_bytes().len(), 64);
        assert_eq!(U256::from_be_slice(word(params.as_bytes(), 0)), U256::from(32));
        assert_eq!(U256::from_be_slice(word(params.as_bytes(), 1)), U256::ZERO);
    }

    #[test]
    fn addresses_are_left_padded_words() {
        let address = Address::from(hex!("71c7656ec7ab88b098defb751b7401b5f6d8976f"));
        let params = AbiParams::addresses(&[address]);
        let bytes = params.as_bytes();
        assert_eq!(bytes.len(), 96);
        assert_eq!(U256::from_be_slice(word(bytes, 1)), U256::from(1));
        assert_eq!(&word(bytes, 2)[..12], &[0u8; 12]);
        assert_eq!(&word(bytes, 2)[12..], address.as_bytes());
    }

    #[test]
    fn country_codes_are_uint16_words() {
        let codes = [840, 826].map(|code| CountryCode::new(code).unwrap());
        let bytes = AbiParams::country_codes(&codes).into_bytes();
        assert_eq!(bytes.len(), 128);
        assert_eq!(U256::from_be_slice(word(&bytes, 1)), U256::from(2));
        assert_eq!(U256::from_be_slice(word(&bytes, 2)), U256::from(840));
        assert_eq!(U256::from_be_slice(word(&bytes, 3)), U256::from(826));
    }

    #[test]
    fn expression_nodes_are_tuples() {
        let kyc = ExpressionNode::topic(TopicName::Kyc);
        let bytes = AbiParams::expression(&[kyc, kyc, ExpressionNode::and()]).into_bytes();
        // offset, length and two words per static tuple
        assert_eq!(bytes.len(), 32 * (2 + 3 * 2));
        assert_eq!(U256::from_be_slice(word(&bytes, 1)), U256::from(3));
        assert_eq!(U256::from_be_slice(word(&bytes, 2)), U256::ZERO);
        assert_eq!(U256::from_be_slice(word(&bytes, 3)), kyc.value);
        assert_eq!(U256::from_be_slice(word(&bytes, 6)), U256::from(1));
    }

    #[test]
    fn supplied_params_are_kept() {
        let params = AbiParams::validate(&json!("0xDEADbeef")).unwrap();
        assert_eq!(params.as_bytes(), hex!("deadbeef"));
        assert_eq!(params.to_string(), "0xdeadbeef");
        assert_eq!(AbiParams::validate(&json!("0x")).unwrap(), AbiParams::default());

        for input in ["deadbeef", "0xabc", "0xzz"] {
            let err = AbiParams::validate(&json!(input)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Format, "{input}");
        }
        assert_eq!(
            AbiParams::validate(&json!(1)).unwrap_err().kind(),
            ErrorKind::TypeMismatch
        );
    }
}
