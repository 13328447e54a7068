//! Reusable field validators
//!
//! Each validator is a closure `(field, value) -> Result<(), message>`.
//! Validators only run on non-null values; presence is handled by the
//! validation config.

use crate::core::error::ValidationError;
use crate::core::field::check_decimal;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

pub const ALPHA_MESSAGE: &str = "This field should contain alphabetic characters and spaces only.";

fn alpha_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z ]+$").expect("alpha pattern is valid"))
}

/// Check that `value` contains only letters and spaces.
///
/// The returned error carries no field name; callers attach it.
pub fn validate_alpha(value: &str) -> Result<(), ValidationError> {
    if alpha_pattern().is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::FieldError {
            field: String::new(),
            message: ALPHA_MESSAGE.to_string(),
        })
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// Validator: field is required (not null)
pub fn required() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &Value| {
        if value.is_null() {
            Err("This field may not be null.".to_string())
        } else {
            Ok(())
        }
    }
}

/// Validator: value is a non-blank string
pub fn text() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &Value| match value.as_str() {
        Some(s) if s.trim().is_empty() => Err("This field may not be blank.".to_string()),
        Some(_) => Ok(()),
        None => Err("Not a valid string.".to_string()),
    }
}

/// Validator: string contains only letters and spaces
pub fn alpha() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &Value| match value.as_str() {
        Some(s) => validate_alpha(s).map_err(|_| ALPHA_MESSAGE.to_string()),
        None => Ok(()),
    }
}

/// Validator: string has at most `max` characters
pub fn max_length(max: usize) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &Value| match value.as_str() {
        Some(s) if s.chars().count() > max => Err(format!(
            "Ensure this field has no more than {} characters.",
            max
        )),
        _ => Ok(()),
    }
}

/// Validator: value must be one of the allowed codes
pub fn in_list(
    allowed: &'static [&'static str],
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &Value| match value.as_str() {
        Some(s) if allowed.iter().any(|choice| *choice == s) => Ok(()),
        Some(s) => Err(format!("\"{}\" is not a valid choice.", s)),
        None => Err(format!("\"{}\" is not a valid choice.", value)),
    }
}

/// Validator: ISO date (`YYYY-MM-DD`)
pub fn date() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &Value| {
        let parsed = value
            .as_str()
            .map(|s| chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d"));
        match parsed {
            Some(Ok(_)) => Ok(()),
            _ => Err(
                "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.".to_string(),
            ),
        }
    }
}

/// Validator: RFC 3339 date-time
pub fn datetime() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &Value| {
        let parsed = value.as_str().map(chrono::DateTime::parse_from_rfc3339);
        match parsed {
            Some(Ok(_)) => Ok(()),
            _ => Err("Datetime has wrong format. Use one of these formats instead: \
                      YYYY-MM-DDThh:mm[:ss[.uuuuuu]][+HH:MM|-HH:MM|Z]."
                .to_string()),
        }
    }
}

/// Validator: integer, given as a JSON number or a numeric string
pub fn integer() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &Value| {
        let ok = match value {
            Value::Number(n) => n.is_i64(),
            Value::String(s) => s.trim().parse::<i64>().is_ok(),
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err("A valid integer is required.".to_string())
        }
    }
}

/// Validator: primary key of a referenced record
pub fn foreign_key() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &Value| match value.as_i64() {
        Some(id) if id > 0 => Ok(()),
        Some(id) => Err(format!("Invalid pk \"{}\" - object does not exist.", id)),
        None => Err(format!(
            "Incorrect type. Expected pk value, received {}.",
            type_name(value)
        )),
    }
}

/// Validator: decimal with at most `max_digits` digits, `decimal_places` of them fractional
pub fn decimal(
    max_digits: usize,
    decimal_places: usize,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &Value| match value {
        Value::Number(n) => check_decimal(&n.to_string(), max_digits, decimal_places),
        Value::String(s) => check_decimal(s, max_digits, decimal_places),
        _ => Err("A valid number is required.".to_string()),
    }
}

/// Validator: number must not be negative
pub fn non_negative() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &Value| {
        let negative = match value {
            Value::Number(n) => n.as_f64().is_some_and(|n| n < 0.0),
            Value::String(s) => s.trim().starts_with('-'),
            _ => false,
        };
        if negative {
            Err("Ensure this value is greater than or equal to 0.".to_string())
        } else {
            Ok(())
        }
    }
}
