use crate::enumeration::enumerated;

/// Access control roles known to the platform contracts.
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
#[strum(serialize_all = "camelCase")]
pub enum RoleName {
    AddonManager,
    AddonModule,
    AddonRegistryModule,
    Admin,
    Auditor,
    Burner,
    CapManagement,
    ClaimPolicyManager,
    ClaimIssuer,
    ComplianceManager,
    Custodian,
    Emergency,
    ForcedTransfer,
    Freezer,
    FundsManager,
    GlobalListManager,
    Governance,
    IdentityManager,
    IdentityRegistryModule,
    Minter,
    OrganisationIdentityManager,
    Pauser,
    Recovery,
    SaleAdmin,
    Signer,
    SupplyManagement,
    SystemManager,
    SystemModule,
    TokenAdmin,
    TokenFactoryModule,
    TokenFactoryRegistryModule,
    TokenManager,
    VerificationAdmin,
}

enumerated!(RoleName, "role");
