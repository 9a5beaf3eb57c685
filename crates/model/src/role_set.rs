use {
    crate::{
        Validate,
        enumeration::Enumerated,
        error::{ResultExt, ValidationError},
        input,
        role::RoleName,
    },
    serde::{Serialize, Serializer, ser::SerializeMap},
    serde_json::Value,
    std::collections::BTreeMap,
    strum::VariantArray,
};

/// One flag per known role.
///
/// Validation starts from a record with every role set to `false` and
/// overlays the supplied flags. Keys that are not role names are dropped.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct AccessControlRoleSet(BTreeMap<RoleName, bool>);

impl Default for AccessControlRoleSet {
    fn default() -> Self {
        Self(
            RoleName::VARIANTS
                .iter()
                .map(|&role| (role, false))
                .collect(),
        )
    }
}

impl AccessControlRoleSet {
    pub fn has(&self, role: RoleName) -> bool {
        self.0.get(&role).copied().unwrap_or_default()
    }

    pub fn with(mut self, role: RoleName, granted: bool) -> Self {
        self.0.insert(role, granted);
        self
    }

    /// Roles whose flag is set, in vocabulary order.
    pub fn granted(&self) -> impl Iterator<Item = RoleName> + '_ {
        self.0
            .iter()
            .filter(|(_, granted)| **granted)
            .map(|(role, _)| *role)
    }

    /// Every role together with its flag.
    pub fn flags(&self) -> impl Iterator<Item = (RoleName, bool)> + '_ {
        self.0.iter().map(|(role, granted)| (*role, *granted))
    }

    pub fn to_roles(&self) -> Vec<RoleName> {
        self.granted().collect()
    }
}

impl FromIterator<RoleName> for AccessControlRoleSet {
    fn from_iter<I: IntoIterator<Item = RoleName>>(roles: I) -> Self {
        roles
            .into_iter()
            .fold(Self::default(), |set, role| set.with(role, true))
    }
}

impl From<&AccessControlRoleSet> for Vec<RoleName> {
    fn from(set: &AccessControlRoleSet) -> Self {
        set.to_roles()
    }
}

impl Validate for AccessControlRoleSet {
    fn validate(value: &Value) -> Result<Self, ValidationError> {
        let object = input::as_object(value)?;
        let mut set = Self::default();
        for &role in RoleName::VARIANTS {
            if let Some(flag) = input::optional(object, role.name()) {
                set = set.with(role, input::as_bool(flag).at(role.name())?);
            }
        }
        Ok(set)
    }
}

impl Serialize for AccessControlRoleSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (role, granted) in self.flags() {
            map.serialize_entry(role.name(), &granted)?;
        }
        map.end()
    }
}

deserialize_with_validate!(AccessControlRoleSet);
