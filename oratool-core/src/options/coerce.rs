//! Typed parsing of raw option text.
//!
//! The CLI hands over raw strings; these functions turn them into the
//! declared [`ValueType`] or fail with a [`CoercionError`] that names the
//! option and the offending text.

use super::{OptionDescriptor, OptionValue, ValueType};
use crate::error::CoercionError;

/// Parses a boolean option value.
///
/// Accepts `true/false`, `1/0`, `yes/no`, `on/off` and `y/n`, case-insensitively.
///
/// # Errors
/// Returns a [`CoercionError`] for any other text.
pub fn parse_bool(option: &str, raw: &str) -> Result<bool, CoercionError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "on" => Ok(true),
        "false" | "0" | "no" | "n" | "off" => Ok(false),
        _ => Err(coercion_error(option, raw, ValueType::Bool)),
    }
}

/// Parses an integer option value.
///
/// # Errors
/// Returns a [`CoercionError`] if the text is not a base-10 `i64`.
pub fn parse_int(option: &str, raw: &str) -> Result<i64, CoercionError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| coercion_error(option, raw, ValueType::Int))
}

/// Parses a text option value. Text is taken verbatim, untrimmed.
///
/// # Errors
/// Never fails; the signature matches the other parsers.
pub fn parse_text(_option: &str, raw: &str) -> Result<String, CoercionError> {
    Ok(raw.to_string())
}

/// Coerces raw text into the descriptor's declared type.
///
/// # Errors
/// Returns a [`CoercionError`] if the text cannot be interpreted.
pub fn coerce(descriptor: &OptionDescriptor, raw: &str) -> Result<OptionValue, CoercionError> {
    match descriptor.value_type {
        ValueType::Bool => parse_bool(descriptor.name, raw).map(OptionValue::Bool),
        ValueType::Int => parse_int(descriptor.name, raw).map(OptionValue::Int),
        ValueType::Text => parse_text(descriptor.name, raw).map(OptionValue::Text),
    }
}

fn coercion_error(option: &str, raw: &str, expected: ValueType) -> CoercionError {
    CoercionError {
        option: option.to_string(),
        raw: raw.to_string(),
        expected: match expected {
            ValueType::Bool => "true or false",
            ValueType::Int => "an integer",
            ValueType::Text => "text",
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::options::loader::LOADER_SCHEMA;

    #[test]
    fn test_parse_bool_accepted_spellings() {
        for raw in ["true", "TRUE", "1", "yes", "Y", "on", " true "] {
            assert!(parse_bool("direct", raw).unwrap(), "{raw}");
        }
        for raw in ["false", "False", "0", "no", "n", "OFF"] {
            assert!(!parse_bool("direct", raw).unwrap(), "{raw}");
        }
    }

    #[test]
    fn test_parse_bool_rejects_other_text() {
        let err = parse_bool("direct", "maybe").unwrap_err();
        assert_eq!(err.option, "direct");
        assert_eq!(err.raw, "maybe");
        assert_eq!(
            err.to_string(),
            "Invalid value 'maybe' for option 'direct': expected true or false"
        );
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("errors", "50").unwrap(), 50);
        assert_eq!(parse_int("errors", "-1").unwrap(), -1);
        assert!(parse_int("errors", "fifty").is_err());
        assert!(parse_int("errors", "1.5").is_err());
    }

    #[test]
    fn test_coerce_follows_descriptor_type() {
        let direct = LOADER_SCHEMA.find("direct").unwrap();
        let rows = LOADER_SCHEMA.find("rows").unwrap();
        let control = LOADER_SCHEMA.find("control").unwrap();

        assert_eq!(coerce(direct, "false").unwrap(), OptionValue::Bool(false));
        assert_eq!(coerce(rows, "5000").unwrap(), OptionValue::Int(5000));
        assert_eq!(
            coerce(control, "emp.ctl").unwrap(),
            OptionValue::Text("emp.ctl".into())
        );
        assert!(coerce(rows, "lots").is_err());
    }
}
