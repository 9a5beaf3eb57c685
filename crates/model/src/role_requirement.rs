//! Boolean requirements over access control roles.
//!
//! A requirement is written as a role name (`"admin"`), or as an object with
//! exactly one of `any` or `all` holding nested requirements:
//!
//! ```json
//! {"any": ["admin", {"all": ["tokenManager", "auditor"]}]}
//! ```

use {
    crate::{
        Validate,
        enumeration::parse_variant,
        error::{ErrorKind, ResultExt, ValidationError},
        input,
        role::RoleName,
        role_set::AccessControlRoleSet,
    },
    serde::{Serialize, Serializer, ser::SerializeMap},
    serde_json::Value,
    std::{
        collections::{BTreeSet, HashSet},
        fmt::{self, Display, Formatter},
    },
};

/// Deepest accepted nesting of `any`/`all` objects in untrusted input.
pub const MAX_DEPTH: usize = 32;

/// A requirement on the roles a user holds.
///
/// Both combinators are vacuously satisfied when empty: `Any([])` and
/// `All([])` are **true** for every user, including one without any role.
/// An empty `Any` therefore means "no restriction", not "nobody".
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum RoleRequirement {
    Single(RoleName),
    Any(Vec<RoleRequirement>),
    All(Vec<RoleRequirement>),
}

/// Something that can answer whether a user holds a role.
pub trait RoleLookup {
    fn has_role(&self, role: RoleName) -> bool;
}

impl RoleLookup for HashSet<RoleName> {
    fn has_role(&self, role: RoleName) -> bool {
        self.contains(&role)
    }
}

impl RoleLookup for BTreeSet<RoleName> {
    fn has_role(&self, role: RoleName) -> bool {
        self.contains(&role)
    }
}

impl RoleLookup for [RoleName] {
    fn has_role(&self, role: RoleName) -> bool {
        self.contains(&role)
    }
}

impl RoleLookup for Vec<RoleName> {
    fn has_role(&self, role: RoleName) -> bool {
        self.contains(&role)
    }
}

impl RoleLookup for AccessControlRoleSet {
    fn has_role(&self, role: RoleName) -> bool {
        self.has(role)
    }
}

/// Whether a user holding `user_roles` meets `requirement`.
pub fn satisfies<R>(user_roles: &R, requirement: &RoleRequirement) -> bool
where
    R: RoleLookup + ?Sized,
{
    match requirement {
        RoleRequirement::Single(role) => user_roles.has_role(*role),
        RoleRequirement::Any(requirements) => {
            requirements.is_empty()
                || requirements
                    .iter()
                    .any(|requirement| satisfies(user_roles, requirement))
        }
        RoleRequirement::All(requirements) => requirements
            .iter()
            .all(|requirement| satisfies(user_roles, requirement)),
    }
}

impl RoleRequirement {
    pub fn is_satisfied_by<R>(&self, user_roles: &R) -> bool
    where
        R: RoleLookup + ?Sized,
    {
        satisfies(user_roles, self)
    }

    /// Every role mentioned anywhere in the requirement.
    pub fn roles(&self) -> BTreeSet<RoleName> {
        let mut roles = BTreeSet::new();
        self.collect_roles(&mut roles);
        roles
    }

    fn collect_roles(&self, roles: &mut BTreeSet<RoleName>) {
        match self {
            Self::Single(role) => {
                roles.insert(*role);
            }
            Self::Any(requirements) | Self::All(requirements) => requirements
                .iter()
                .for_each(|requirement| requirement.collect_roles(roles)),
        }
    }

    fn parse(value: &Value, depth: usize) -> Result<Self, ValidationError> {
        match value {
            Value::String(name) => Ok(Self::Single(parse_variant(name)?)),
            Value::Object(object) => {
                if depth > MAX_DEPTH {
                    return Err(ValidationError::range(format!(
                        "role requirement is nested deeper than {MAX_DEPTH} levels"
                    )));
                }
                let children = |field: &str| {
                    input::optional(object, field)
                        .map(|list| {
                            input::list(list, |child| Self::parse(child, depth + 1)).at(field)
                        })
                        .transpose()
                };
                match (children("any")?, children("all")?) {
                    (Some(any), None) => Ok(Self::Any(any)),
                    (None, Some(all)) => Ok(Self::All(all)),
                    (Some(_), Some(_)) => Err(ValidationError::format(
                        "role requirement must have exactly one of `any` or `all`, found both",
                    )),
                    (None, None) => Err(ValidationError::new(
                        ErrorKind::MissingField,
                        "role requirement object must have either `any` or `all`",
                    )),
                }
            }
            other => Err(ValidationError::type_mismatch(
                "a role name or an object with `any` or `all`",
                other,
            )),
        }
    }

    fn fmt_nested(&self, f: &mut Formatter<'_>, nested: bool) -> fmt::Result {
        let (requirements, operator) = match self {
            Self::Single(role) => return write!(f, "{role}"),
            Self::Any(requirements) => (requirements, " OR "),
            Self::All(requirements) => (requirements, " AND "),
        };
        match requirements.as_slice() {
            [] => f.write_str("true"),
            [only] => only.fmt_nested(f, nested),
            _ => {
                if nested {
                    f.write_str("(")?;
                }
                for (i, requirement) in requirements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(operator)?;
                    }
                    requirement.fmt_nested(f, true)?;
                }
                if nested {
                    f.write_str(")")?;
                }
                Ok(())
            }
        }
    }
}

impl From<RoleName> for RoleRequirement {
    fn from(role: RoleName) -> Self {
        Self::Single(role)
    }
}

impl Validate for RoleRequirement {
    fn validate(input: &Value) -> Result<Self, ValidationError> {
        Self::parse(input, 1)
    }
}

/// Renders the requirement as a boolean expression, e.g.
/// `admin OR (tokenManager AND auditor)`.
impl Display for RoleRequirement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.fmt_nested(f, false)
    }
}

impl Serialize for RoleRequirement {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Single(role) => role.serialize(serializer),
            Self::Any(requirements) | Self::All(requirements) => {
                let key = if matches!(self, Self::Any(_)) { "any" } else { "all" };
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(key, requirements)?;
                map.end()
            }
        }
    }
}

deserialize_with_validate!(RoleRequirement);
