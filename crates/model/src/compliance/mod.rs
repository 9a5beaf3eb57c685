//! Compliance module configuration.
//!
//! A configuration names a module by its type id. The type id alone decides
//! what `values` must look like, so the id is validated first and the values
//! are never coerced from one shape into another.

pub mod country;
pub mod expression;
pub mod params;

pub use {
    country::CountryCode,
    expression::{Expression, ExpressionNode, ExpressionToken, NodeType, postfix_form},
    params::AbiParams,
};
use {
    crate::{
        Validate,
        address::Address,
        enumeration::enumerated,
        error::{ResultExt, ValidationError},
        input,
    },
    serde::{Serialize, Serializer, ser::SerializeStruct},
    serde_json::{Map, Value},
};

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Ord,
    PartialOrd,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::VariantArray,
)]
pub enum ComplianceTypeId {
    #[strum(serialize = "AddressBlockListComplianceModule")]
    AddressBlockList,
    #[strum(serialize = "CountryAllowListComplianceModule")]
    CountryAllowList,
    #[strum(serialize = "CountryBlockListComplianceModule")]
    CountryBlockList,
    #[strum(serialize = "IdentityAllowListComplianceModule")]
    IdentityAllowList,
    #[strum(serialize = "IdentityBlockListComplianceModule")]
    IdentityBlockList,
    #[strum(serialize = "SMARTIdentityVerificationComplianceModule")]
    SmartIdentityVerification,
}

enumerated!(ComplianceTypeId, "compliance module type id");

/// Shape of the `values` a module type expects.
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ValuesKind {
    Addresses,
    CountryCodes,
    Expression,
}

impl ComplianceTypeId {
    pub fn values_kind(self) -> ValuesKind {
        match self {
            Self::AddressBlockList | Self::IdentityAllowList | Self::IdentityBlockList => {
                ValuesKind::Addresses
            }
            Self::CountryAllowList | Self::CountryBlockList => ValuesKind::CountryCodes,
            Self::SmartIdentityVerification => ValuesKind::Expression,
        }
    }
}

/// The fields every module configuration shares.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModuleParams<V> {
    pub module: Address,
    pub values: V,
    /// ABI encoded `values` as handed to the module contract.
    pub params: AbiParams,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ComplianceModuleConfig {
    AddressBlockList(ModuleParams<Vec<Address>>),
    CountryAllowList(ModuleParams<Vec<CountryCode>>),
    CountryBlockList(ModuleParams<Vec<CountryCode>>),
    IdentityAllowList(ModuleParams<Vec<Address>>),
    IdentityBlockList(ModuleParams<Vec<Address>>),
    SmartIdentityVerification(ModuleParams<Vec<ExpressionToken>>),
}

impl ComplianceModuleConfig {
    pub fn type_id(&self) -> ComplianceTypeId {
        match self {
            Self::AddressBlockList(_) => ComplianceTypeId::AddressBlockList,
            Self::CountryAllowList(_) => ComplianceTypeId::CountryAllowList,
            Self::CountryBlockList(_) => ComplianceTypeId::CountryBlockList,
            Self::IdentityAllowList(_) => ComplianceTypeId::IdentityAllowList,
            Self::IdentityBlockList(_) => ComplianceTypeId::IdentityBlockList,
            Self::SmartIdentityVerification(_) => ComplianceTypeId::SmartIdentityVerification,
        }
    }

    pub fn module(&self) -> Address {
        match self {
            Self::AddressBlockList(p) | Self::IdentityAllowList(p) | Self::IdentityBlockList(p) => {
                p.module
            }
            Self::CountryAllowList(p) | Self::CountryBlockList(p) => p.module,
            Self::SmartIdentityVerification(p) => p.module,
        }
    }

    pub fn params(&self) -> &AbiParams {
        match self {
            Self::AddressBlockList(p) | Self::IdentityAllowList(p) | Self::IdentityBlockList(p) => {
                &p.params
            }
            Self::CountryAllowList(p) | Self::CountryBlockList(p) => &p.params,
            Self::SmartIdentityVerification(p) => &p.params,
        }
    }
}

/// Validates a compliance module configuration of any type.
///
/// The type id is read from `typeId` (or `type_id`). Fields other than
/// `typeId`, `module`, `values` and `params` are ignored. When `params` is
/// absent it is derived by ABI encoding `values`; identity verification
/// values must then form an infix or postfix expression.
pub fn validate_params(value: &Value) -> Result<ComplianceModuleConfig, ValidationError> {
    let object = input::as_object(value)?;
    let type_id = type_id(object)?;
    let module = input::field(object, "module", Address::validate)?;
    let supplied = input::optional(object, "params")
        .map(|params| AbiParams::validate(params).at("params"))
        .transpose()?;

    Ok(match type_id {
        ComplianceTypeId::AddressBlockList => ComplianceModuleConfig::AddressBlockList(
            addresses(object, module, supplied)?,
        ),
        ComplianceTypeId::IdentityAllowList => ComplianceModuleConfig::IdentityAllowList(
            addresses(object, module, supplied)?,
        ),
        ComplianceTypeId::IdentityBlockList => ComplianceModuleConfig::IdentityBlockList(
            addresses(object, module, supplied)?,
        ),
        ComplianceTypeId::CountryAllowList => ComplianceModuleConfig::CountryAllowList(
            country_codes(object, module, supplied)?,
        ),
        ComplianceTypeId::CountryBlockList => ComplianceModuleConfig::CountryBlockList(
            country_codes(object, module, supplied)?,
        ),
        ComplianceTypeId::SmartIdentityVerification => {
            let values = input::field(object, "values", |values| {
                input::list(values, ExpressionToken::validate)
            })?;
            let params = match supplied {
                Some(params) => params,
                None => AbiParams::expression(&derived_postfix(&values)?),
            };
            ComplianceModuleConfig::SmartIdentityVerification(ModuleParams {
                module,
                values,
                params,
            })
        }
    })
}

fn type_id(object: &Map<String, Value>) -> Result<ComplianceTypeId, ValidationError> {
    let (field, value) = match (
        input::optional(object, "typeId"),
        input::optional(object, "type_id"),
    ) {
        (Some(value), _) => ("typeId", value),
        (None, Some(value)) => ("type_id", value),
        (None, None) => {
            return Err(ValidationError::unknown_variant(
                "a compliance module type id is required",
            )
            .at("typeId"));
        }
    };
    ComplianceTypeId::validate(value).at(field)
}

fn derived_postfix(tokens: &[ExpressionToken]) -> Result<Vec<ExpressionNode>, ValidationError> {
    postfix_form(tokens).map_err(|err| {
        ValidationError::format(format!(
            "cannot be derived from values{}: {}",
            err.path(),
            err.message()
        ))
        .at("params")
    })
}

fn addresses(
    object: &Map<String, Value>,
    module: Address,
    supplied: Option<AbiParams>,
) -> Result<ModuleParams<Vec<Address>>, ValidationError> {
    let values = input::field(object, "values", |values| {
        input::list(values, Address::validate)
    })?;
    let params = supplied.unwrap_or_else(|| AbiParams::addresses(&values));
    Ok(ModuleParams {
        module,
        values,
        params,
    })
}

fn country_codes(
    object: &Map<String, Value>,
    module: Address,
    supplied: Option<AbiParams>,
) -> Result<ModuleParams<Vec<CountryCode>>, ValidationError> {
    let values = input::field(object, "values", |values| {
        input::list(values, CountryCode::validate)
    })?;
    let params = supplied.unwrap_or_else(|| AbiParams::country_codes(&values));
    Ok(ModuleParams {
        module,
        values,
        params,
    })
}

impl Validate for ComplianceModuleConfig {
    fn validate(value: &Value) -> Result<Self, ValidationError> {
        validate_params(value)
    }
}

impl Serialize for ComplianceModuleConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        fn fields<S, V>(
            mut state: S,
            params: &ModuleParams<V>,
        ) -> Result<S::Ok, S::Error>
        where
            S: SerializeStruct,
            V: Serialize,
        {
            state.serialize_field("module", &params.module)?;
            state.serialize_field("values", &params.values)?;
            state.serialize_field("params", &params.params)?;
            state.end()
        }

        let mut state = serializer.serialize_struct("ComplianceModuleConfig", 4)?;
        state.serialize_field("typeId", &self.type_id())?;
        match self {
            Self::AddressBlockList(p) | Self::IdentityAllowList(p) | Self::IdentityBlockList(p) => {
                fields(state, p)
            }
            Self::CountryAllowList(p) | Self::CountryBlockList(p) => fields(state, p),
            Self::SmartIdentityVerification(p) => fields(state, p),
        }
    }
}

deserialize_with_validate!(ComplianceModuleConfig);
