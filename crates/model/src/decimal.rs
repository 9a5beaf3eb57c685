//! Validation of untrusted decimal input.

use {
    crate::{Validate, error::ValidationError},
    number::{Decimal, number_literal, to_decimal},
    serde_json::Value,
};

/// Strings go through the strict decimal grammar and numbers through their
/// exact literal, so no digit of the input is ever rounded away.
impl Validate for Decimal {
    fn validate(input: &Value) -> Result<Self, ValidationError> {
        match input {
            Value::String(s) => Ok(to_decimal(s.as_str())?),
            Value::Number(number) => Ok(number_literal(&number.to_string())?),
            other => Err(ValidationError::type_mismatch(
                "a decimal string or a number",
                other,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{error::ErrorKind, validate},
        serde_json::json,
    };

    fn check(input: Value) -> Result<Decimal, ValidationError> {
        validate::<Decimal>(&input)
    }

    #[test]
    fn accepts_strings_and_numbers() {
        assert_eq!(check(json!("1.50")).unwrap().to_string(), "1.50");
        assert_eq!(check(json!(42)).unwrap().to_string(), "42");
        assert_eq!(check(json!(-7)).unwrap().to_string(), "-7");
        assert_eq!(check(json!(0.1)).unwrap().to_string(), "0.1");
        assert_eq!(
            check(json!(u64::MAX)).unwrap().to_string(),
            u64::MAX.to_string()
        );
    }

    #[test]
    fn keeps_token_precision() {
        let amount = "123456789012345678901234.123456789012345678";
        assert_eq!(check(json!(amount)).unwrap().to_string(), amount);
    }

    #[test]
    fn large_json_numbers_are_exact() {
        for literal in [
            "18446744073709551616",
            "123456789012345678901234567",
            "-98765432109876543210.0123456789",
        ] {
            let number: Value = serde_json::from_str(literal).unwrap();
            assert_eq!(check(number).unwrap().to_string(), literal);
        }
        let number: Value = serde_json::from_str("1.5E3").unwrap();
        assert_eq!(check(number).unwrap().to_string(), "1500");
    }

    #[test]
    fn rejects_non_finite_strings_with_a_specific_message() {
        let nan = check(json!("nan")).unwrap_err();
        let infinity = check(json!("-INFINITY")).unwrap_err();
        let garbage = check(json!("abc")).unwrap_err();
        assert_eq!(nan.kind(), ErrorKind::Format);
        assert_eq!(nan.message(), infinity.message());
        assert!(nan.message().contains("non-finite"));
        assert!(!garbage.message().contains("non-finite"));
    }

    #[test]
    fn rejects_other_types() {
        for input in [json!(true), json!(null), json!([1]), json!({"value": 1})] {
            assert_eq!(check(input).unwrap_err().kind(), ErrorKind::TypeMismatch);
        }
    }

    #[test]
    fn precision_is_preserved_when_summing() {
        let tenth = check(json!("0.1")).unwrap();
        let sum = tenth.clone() + tenth.clone() + tenth;
        assert_eq!(sum.to_string(), "0.3");
    }

    #[test]
    fn revalidation_is_idempotent() {
        for input in [json!("1e3"), json!("0.000100"), json!(-12.5), json!("-.5")] {
            let first = check(input).unwrap();
            let second = check(serde_json::to_value(&first).unwrap()).unwrap();
            assert_eq!(first, second);
            assert_eq!(first.to_string(), second.to_string());
        }
    }
}
