//! Closed enumerations of domain names.
//!
//! Matching is exact and case sensitive: `"Bond"` is not an asset type and
//! `" bond"` is not either.

use {
    crate::{error::ValidationError, input},
    serde_json::Value,
    std::collections::BTreeSet,
    strum::VariantArray,
};

/// A closed set of names with a canonical string per variant.
pub trait Enumerated: Copy + Ord + Into<&'static str> + VariantArray + 'static {
    /// What a single value is called in error messages, e.g. "asset type".
    const DOMAIN: &'static str;

    fn name(self) -> &'static str {
        self.into()
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|variant| variant.name() == name)
    }
}

pub fn validate_variant<T: Enumerated>(input: &Value) -> Result<T, ValidationError> {
    parse_variant(input::as_str(input)?)
}

pub fn parse_variant<T: Enumerated>(name: &str) -> Result<T, ValidationError> {
    T::from_name(name).ok_or_else(|| {
        let allowed = T::VARIANTS
            .iter()
            .map(|variant| variant.name())
            .collect::<Vec<_>>()
            .join(", ");
        ValidationError::unknown_variant(format!(
            "unknown {} {name:?}, expected one of: {allowed}",
            T::DOMAIN
        ))
    })
}

/// A non-empty list of values. Duplicates are kept in input order.
pub fn validate_list<T: Enumerated>(input: &Value) -> Result<Vec<T>, ValidationError> {
    let values = input::list(input, validate_variant)?;
    if values.is_empty() {
        return Err(ValidationError::range(format!(
            "at least one {} must be selected",
            T::DOMAIN
        )));
    }
    Ok(values)
}

/// A non-empty set of values.
pub fn validate_set<T: Enumerated>(input: &Value) -> Result<BTreeSet<T>, ValidationError> {
    Ok(validate_list(input)?.into_iter().collect())
}

/// Falls back to `default` when the value is absent. A present value that
/// is invalid is still an error.
pub fn validate_or<T: Enumerated>(input: Option<&Value>, default: T) -> Result<T, ValidationError> {
    match input.filter(|value| !value.is_null()) {
        Some(value) => validate_variant(value),
        None => Ok(default),
    }
}

pub fn validate_or_default<T: Enumerated + Default>(
    input: Option<&Value>,
) -> Result<T, ValidationError> {
    validate_or(input, T::default())
}

/// Implements [`Enumerated`], [`crate::Validate`] and the serde traits for a
/// strum annotated enum.
macro_rules! enumerated {
    ($type:ty, $domain:literal) => {
        impl $crate::enumeration::Enumerated for $type {
            const DOMAIN: &'static str = $domain;
        }

        impl $crate::Validate for $type {
            fn validate(input: &serde_json::Value) -> Result<Self, $crate::ValidationError> {
                $crate::enumeration::validate_variant(input)
            }
        }

        impl serde::Serialize for $type {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str($crate::enumeration::Enumerated::name(*self))
            }
        }

        deserialize_with_validate!($type);
    };
}

pub(crate) use enumerated;

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{asset::AssetType, error::ErrorKind, role::RoleName, topic::TopicName},
        maplit::btreeset,
        serde_json::json,
    };

    #[test]
    fn matching_is_exact() {
        assert_eq!(validate_variant::<AssetType>(&json!("bond")).unwrap(), AssetType::Bond);
        for input in ["Bond", "BOND", " bond", "bond "] {
            let err = validate_variant::<AssetType>(&json!(input)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnknownVariant);
        }
        let err = validate_variant::<AssetType>(&json!(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn unknown_variant_lists_the_allowed_names() {
        let err = validate_variant::<AssetType>(&json!("commodity")).unwrap_err();
        assert_eq!(
            err.message(),
            "unknown asset type \"commodity\", expected one of: bond, equity, fund, stablecoin, deposit"
        );
    }

    #[test]
    fn lists_keep_duplicates_and_reject_empty() {
        let roles = validate_list::<RoleName>(&json!(["admin", "minter", "admin"])).unwrap();
        assert_eq!(roles, vec![RoleName::Admin, RoleName::Minter, RoleName::Admin]);

        let err = validate_list::<RoleName>(&json!([])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(err.message(), "at least one role must be selected");

        let err = validate_list::<RoleName>(&json!(["admin", "root"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownVariant);
        assert_eq!(err.path().to_string(), "[1]");
    }

    #[test]
    fn sets_deduplicate() {
        let topics = validate_set::<TopicName>(&json!(["kyc", "aml", "kyc"])).unwrap();
        assert_eq!(topics, btreeset! {TopicName::Kyc, TopicName::Aml});
        assert_eq!(
            validate_set::<TopicName>(&json!([])).unwrap_err().kind(),
            ErrorKind::Range
        );
    }

    #[test]
    fn defaults_apply_only_to_absent_values() {
        assert_eq!(validate_or_default::<AssetType>(None).unwrap(), AssetType::Bond);
        assert_eq!(
            validate_or_default::<AssetType>(Some(&json!(null))).unwrap(),
            AssetType::Bond
        );
        assert_eq!(
            validate_or(None, AssetType::Fund).unwrap(),
            AssetType::Fund
        );
        assert_eq!(
            validate_or_default::<AssetType>(Some(&json!("equity"))).unwrap(),
            AssetType::Equity
        );
        assert_eq!(
            validate_or_default::<TopicName>(Some(&json!("KYC")))
                .unwrap_err()
                .kind(),
            ErrorKind::UnknownVariant
        );
    }
}
