use {
    crate::{
        Validate,
        address::{Address, Hash},
        error::ValidationError,
        input,
    },
    serde::Serialize,
    serde_json::Value,
};

/// A claim attached to an on-chain identity.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct IdentityClaim {
    pub id: Hash,
    pub name: String,
    pub revoked: bool,
    pub issuer: Address,
    pub values: Vec<ClaimValue>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ClaimValue {
    pub key: String,
    pub value: String,
}

impl IdentityClaim {
    /// The value stored under `key`, if any. The first entry wins when a key
    /// repeats.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }

    pub fn is_active(&self) -> bool {
        !self.revoked
    }
}

impl Validate for ClaimValue {
    fn validate(value: &Value) -> Result<Self, ValidationError> {
        let object = input::as_object(value)?;
        Ok(Self {
            key: input::field(object, "key", string)?,
            value: input::field(object, "value", string)?,
        })
    }
}

impl Validate for IdentityClaim {
    fn validate(value: &Value) -> Result<Self, ValidationError> {
        let object = input::as_object(value)?;
        Ok(Self {
            id: input::field(object, "id", Hash::validate)?,
            name: input::field(object, "name", string)?,
            revoked: input::field(object, "revoked", input::as_bool)?,
            issuer: input::field(object, "issuer", Address::validate)?,
            values: input::field(object, "values", |values| {
                input::list(values, ClaimValue::validate)
            })?,
        })
    }
}

fn string(value: &Value) -> Result<String, ValidationError> {
    input::as_str(value).map(str::to_owned)
}

deserialize_with_validate!(ClaimValue);
deserialize_with_validate!(IdentityClaim);
