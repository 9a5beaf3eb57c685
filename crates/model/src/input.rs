//! Accessors for untrusted JSON input.
//!
//! A field that is missing and a field that is explicitly `null` are both
//! treated as absent.

use {
    crate::error::{ResultExt, ValidationError},
    serde_json::{Map, Value},
};

/// Human readable name of a JSON value's type, used in error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn as_object(value: &Value) -> Result<&Map<String, Value>, ValidationError> {
    value
        .as_object()
        .ok_or_else(|| ValidationError::type_mismatch("an object", value))
}

pub fn as_array(value: &Value) -> Result<&Vec<Value>, ValidationError> {
    value
        .as_array()
        .ok_or_else(|| ValidationError::type_mismatch("an array", value))
}

pub fn as_str(value: &Value) -> Result<&str, ValidationError> {
    value
        .as_str()
        .ok_or_else(|| ValidationError::type_mismatch("a string", value))
}

pub fn as_bool(value: &Value) -> Result<bool, ValidationError> {
    value
        .as_bool()
        .ok_or_else(|| ValidationError::type_mismatch("a boolean", value))
}

/// A field that may be absent.
pub fn optional<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    object.get(field).filter(|value| !value.is_null())
}

/// A field that must be present.
pub fn required<'a>(
    object: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a Value, ValidationError> {
    optional(object, field).ok_or_else(|| ValidationError::missing_field(field))
}

/// Validates a required field, attributing any failure to that field.
pub fn field<T>(
    object: &Map<String, Value>,
    name: &str,
    validate: impl FnOnce(&Value) -> Result<T, ValidationError>,
) -> Result<T, ValidationError> {
    validate(required(object, name)?).at(name)
}

/// Validates every element of an array, attributing failures to the
/// element's index.
pub fn list<T>(
    value: &Value,
    mut validate: impl FnMut(&Value) -> Result<T, ValidationError>,
) -> Result<Vec<T>, ValidationError> {
    as_array(value)?
        .iter()
        .enumerate()
        .map(|(index, element)| validate(element).at(index))
        .collect()
}

#[cfg(test)]
mod tests {
    use {super::*, crate::error::ErrorKind, serde_json::json};

    #[test]
    fn null_is_absent() {
        let value = json!({"a": null, "b": 1});
        let object = as_object(&value).unwrap();
        assert_eq!(optional(object, "a"), None);
        assert_eq!(optional(object, "b"), Some(&json!(1)));
        assert_eq!(
            required(object, "a").unwrap_err().kind(),
            ErrorKind::MissingField
        );
    }

    #[test]
    fn list_reports_index() {
        let err = list(&json!(["a", 1]), |v| as_str(v).map(str::to_owned)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.path().to_string(), "[1]");
    }

    #[test]
    fn field_reports_name() {
        let value = json!({"flag": "true"});
        let err = field(as_object(&value).unwrap(), "flag", as_bool).unwrap_err();
        assert_eq!(err.to_string(), "TypeMismatchError at `flag`: expected a boolean, found a string");
    }
}
