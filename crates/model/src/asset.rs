use crate::enumeration::enumerated;

/// The kind of tokenized asset.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
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
#[strum(serialize_all = "lowercase")]
pub enum AssetType {
    #[default]
    Bond,
    Equity,
    Fund,
    Stablecoin,
    Deposit,
}

/// Identifier of the factory contract that deploys an asset type.
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
pub enum AssetFactoryTypeId {
    #[strum(serialize = "ATKBondFactory")]
    Bond,
    #[strum(serialize = "ATKEquityFactory")]
    Equity,
    #[strum(serialize = "ATKFundFactory")]
    Fund,
    #[strum(serialize = "ATKStableCoinFactory")]
    StableCoin,
    #[strum(serialize = "ATKDepositFactory")]
    Deposit,
}

enumerated!(AssetType, "asset type");
enumerated!(AssetFactoryTypeId, "asset factory type id");

impl AssetType {
    pub fn factory_type_id(self) -> AssetFactoryTypeId {
        match self {
            Self::Bond => AssetFactoryTypeId::Bond,
            Self::Equity => AssetFactoryTypeId::Equity,
            Self::Fund => AssetFactoryTypeId::Fund,
            Self::Stablecoin => AssetFactoryTypeId::StableCoin,
            Self::Deposit => AssetFactoryTypeId::Deposit,
        }
    }
}

impl AssetFactoryTypeId {
    pub fn asset_type(self) -> AssetType {
        match self {
            Self::Bond => AssetType::Bond,
            Self::Equity => AssetType::Equity,
            Self::Fund => AssetType::Fund,
            Self::StableCoin => AssetType::Stablecoin,
            Self::Deposit => AssetType::Deposit,
        }
    }
}

impl From<AssetFactoryTypeId> for AssetType {
    fn from(id: AssetFactoryTypeId) -> Self {
        id.asset_type()
    }
}

impl From<AssetType> for AssetFactoryTypeId {
    fn from(asset_type: AssetType) -> Self {
        asset_type.factory_type_id()
    }
}
