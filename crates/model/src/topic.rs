//! Claim topics and their on-chain ids.
//!
//! A topic id is the keccak-256 hash of the topic name read as a big endian
//! uint256. Ids are memoized in a process wide cache that only ever grows.

use {
    crate::enumeration::{Enumerated, enumerated},
    alloy_primitives::{U256, keccak256},
    dashmap::DashMap,
    std::sync::LazyLock,
    strum::VariantArray,
};

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
#[strum(serialize_all = "camelCase")]
pub enum TopicName {
    #[default]
    Kyc,
    Aml,
    Collateral,
    Isin,
    AssetClassification,
    BasePrice,
    AssetIssuer,
    ContractIdentity,
}

enumerated!(TopicName, "topic");

static TOPIC_IDS: LazyLock<DashMap<TopicName, U256>> = LazyLock::new(DashMap::new);
static TOPIC_NAMES: LazyLock<DashMap<U256, TopicName>> = LazyLock::new(DashMap::new);

/// The on-chain id of a topic.
pub fn topic_id(name: TopicName) -> U256 {
    if let Some(id) = TOPIC_IDS.get(&name).map(|id| *id) {
        return id;
    }
    let id = U256::from_be_bytes(keccak256(name.name()).0);
    TOPIC_IDS.entry(name).or_insert(id);
    TOPIC_NAMES.entry(id).or_insert(name);
    id
}

/// Reverse lookup of [`topic_id`]. Ids that belong to no known topic yield
/// `None`.
pub fn topic_name(id: U256) -> Option<TopicName> {
    if let Some(name) = TOPIC_NAMES.get(&id).map(|name| *name) {
        return Some(name);
    }
    TopicName::VARIANTS
        .iter()
        .copied()
        .find(|&name| topic_id(name) == id)
}

impl TopicName {
    pub fn id(self) -> U256 {
        topic_id(self)
    }
}
