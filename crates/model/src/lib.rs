//! Validation and normalization of untrusted domain input.
//!
//! Every validator takes a [`serde_json::Value`] of unknown shape and returns
//! either a normalized, strongly typed value or a [`ValidationError`]. The
//! validators are pure: they never log, never touch the network and never
//! substitute a default for an *invalid* value (defaults only apply to absent
//! ones).
//!
//! All validated types also implement `serde::Deserialize` by going through
//! their validator, and serialize into a form that validates back into the
//! identical value.

/// Implements `serde::Deserialize` for a type by running its [`Validate`]
/// implementation on the decoded JSON value.
macro_rules! deserialize_with_validate {
    ($type:ty) => {
        impl<'de> serde::Deserialize<'de> for $type {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
                <$type as $crate::Validate>::validate(&value).map_err(serde::de::Error::custom)
            }
        }
    };
}

pub mod address;
pub mod asset;
pub mod compliance;
pub mod decimal;
pub mod enumeration;
pub mod error;
pub mod identity_claim;
pub mod input;
pub mod role;
pub mod role_requirement;
pub mod role_set;
pub mod topic;

pub use {
    address::{Address, Hash, normalize_address, normalize_hash},
    asset::{AssetFactoryTypeId, AssetType},
    compliance::{ComplianceModuleConfig, ComplianceTypeId, validate_params},
    enumeration::Enumerated,
    error::{ErrorKind, ValidationError},
    identity_claim::IdentityClaim,
    number::Decimal,
    role::RoleName,
    role_requirement::{RoleRequirement, satisfies},
    role_set::AccessControlRoleSet,
    topic::TopicName,
};

/// A validator from untrusted JSON into `Self`.
pub trait Validate: Sized {
    fn validate(input: &serde_json::Value) -> Result<Self, ValidationError>;
}

/// Runs `T`'s validator on `input`.
pub fn validate<T: Validate>(input: &serde_json::Value) -> Result<T, ValidationError> {
    T::validate(input)
}
