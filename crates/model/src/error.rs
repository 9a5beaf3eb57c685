//! Structured validation failures.

use {
    serde::Serialize,
    serde_with::{DisplayFromStr, serde_as},
    std::fmt::{self, Display, Formatter},
};

/// Machine readable classification of a [`ValidationError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, strum::Display, strum::AsRefStr)]
pub enum ErrorKind {
    /// Malformed primitive shape: wrong length, bad characters, non-numeric
    /// string.
    #[strum(serialize = "FormatError")]
    #[serde(rename = "FormatError")]
    Format,
    /// Correct shape but the embedded checksum does not match.
    #[strum(serialize = "ChecksumError")]
    #[serde(rename = "ChecksumError")]
    Checksum,
    /// Value outside of a valid numeric or enumerated range.
    #[strum(serialize = "RangeError")]
    #[serde(rename = "RangeError")]
    Range,
    /// Discriminant not in the closed set of known values.
    #[strum(serialize = "UnknownVariantError")]
    #[serde(rename = "UnknownVariantError")]
    UnknownVariant,
    #[strum(serialize = "MissingFieldError")]
    #[serde(rename = "MissingFieldError")]
    MissingField,
    /// Field present but of the wrong primitive type.
    #[strum(serialize = "TypeMismatchError")]
    #[serde(rename = "TypeMismatchError")]
    TypeMismatch,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(value: &str) -> Self {
        Self::Field(value.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

/// Location of a failure inside a nested input, e.g. `values[2].value`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Path(Vec<PathSegment>);

impl Path {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    fn suffix(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" at `{self}`")
        }
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => f.write_str(name)?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// The single error type returned by every validator.
///
/// No partially validated value is ever returned together with an error.
#[serde_as]
#[derive(Clone, Debug, Eq, PartialEq, Serialize, thiserror::Error)]
#[error("{kind}{}: {message}", .path.suffix())]
pub struct ValidationError {
    kind: ErrorKind,
    #[serde_as(as = "DisplayFromStr")]
    path: Path,
    message: String,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: Path::default(),
            message: message.into(),
        }
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Format, message)
    }

    pub fn checksum(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Checksum, message)
    }

    pub fn range(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Range, message)
    }

    pub fn unknown_variant(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownVariant, message)
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorKind::MissingField,
            format!("required field `{field}` is missing"),
        )
        .at(field)
    }

    pub fn type_mismatch(expected: &str, found: &serde_json::Value) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("expected {expected}, found {}", crate::input::type_name(found)),
        )
    }

    /// Prepends a path segment. Composite validators call this while the
    /// error bubbles up so the final path reads from the root.
    pub fn at(mut self, segment: impl Into<PathSegment>) -> Self {
        self.path.0.insert(0, segment.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<number::decimal::Error> for ValidationError {
    fn from(err: number::decimal::Error) -> Self {
        Self::format(err.to_string())
    }
}

/// Adds path context to a `Result`.
pub trait ResultExt<T> {
    fn at(self, segment: impl Into<PathSegment>) -> Result<T, ValidationError>;
}

impl<T> ResultExt<T> for Result<T, ValidationError> {
    fn at(self, segment: impl Into<PathSegment>) -> Result<T, ValidationError> {
        self.map_err(|err| err.at(segment))
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn kind_names() {
        assert_eq!(ErrorKind::Format.to_string(), "FormatError");
        assert_eq!(ErrorKind::Checksum.as_ref(), "ChecksumError");
        assert_eq!(
            serde_json::to_value(ErrorKind::UnknownVariant).unwrap(),
            json!("UnknownVariantError")
        );
    }

    #[test]
    fn display_includes_path() {
        let err = ValidationError::range("unknown country code 999")
            .at(2)
            .at("values");
        assert_eq!(err.path().to_string(), "values[2]");
        assert_eq!(
            err.to_string(),
            "RangeError at `values[2]`: unknown country code 999"
        );

        let err = ValidationError::format("too short");
        assert_eq!(err.to_string(), "FormatError: too short");
    }

    #[test]
    fn missing_field_points_at_the_field() {
        let err = ValidationError::missing_field("issuer");
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert_eq!(err.path().to_string(), "issuer");
    }

    #[test]
    fn serializes_for_callers() {
        let err = ValidationError::type_mismatch("a boolean", &json!("false")).at("revoked");
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({
                "kind": "TypeMismatchError",
                "path": "revoked",
                "message": "expected a boolean, found a string",
            })
        );
    }
}
