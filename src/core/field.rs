//! Field value types shared by the entity models

use crate::core::entity::KeyPart;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Sex of a pet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "M")]
    Male,
}

impl Sex {
    pub const CHOICES: &'static [&'static str] = &["F", "M"];
}

/// Gender of a vet or groomer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "NB")]
    NonBinary,
}

impl Gender {
    pub const CHOICES: &'static [&'static str] = &["F", "M", "NB"];
}

/// Role of a user with respect to a pet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OwnerType {
    #[default]
    #[serde(rename = "P", alias = "Primary")]
    Primary,
    #[serde(rename = "S", alias = "Secondary")]
    Secondary,
}

impl OwnerType {
    pub const CHOICES: &'static [&'static str] = &["P", "S", "Primary", "Secondary"];
}

/// Check a decimal literal against a digit budget.
///
/// Mirrors a `DECIMAL(max_digits, decimal_places)` column: at most
/// `decimal_places` digits after the point and `max_digits` in total.
pub fn check_decimal(text: &str, max_digits: usize, decimal_places: usize) -> Result<(), String> {
    let text = text.trim();
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (unsigned, ""),
    };

    let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err("A valid number is required.".to_string());
    }

    let whole_digits = whole.trim_start_matches('0').len();
    if fraction.len() > decimal_places {
        return Err(format!(
            "Ensure that there are no more than {} decimal places.",
            decimal_places
        ));
    }
    if whole_digits > max_digits - decimal_places {
        return Err(format!(
            "Ensure that there are no more than {} digits before the decimal point.",
            max_digits - decimal_places
        ));
    }
    Ok(())
}

/// Body weight with two decimal places and a magnitude below 10.
///
/// Stored as hundredths; rendered as a decimal string (`"4.50"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Weight(u16);

impl Weight {
    pub const MAX_DIGITS: usize = 3;
    pub const DECIMAL_PLACES: usize = 2;

    /// Parse a decimal literal such as `"4.5"` or `"0.75"`
    pub fn parse(text: &str) -> Result<Self, String> {
        let text = text.trim();
        if text.starts_with('-') {
            return Err("Ensure this value is greater than or equal to 0.".to_string());
        }
        check_decimal(text, Self::MAX_DIGITS, Self::DECIMAL_PLACES)?;

        let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
        let whole: u16 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| "A valid number is required.".to_string())?
        };
        let fraction: u16 = format!("{:0<2}", fraction)
            .parse()
            .map_err(|_| "A valid number is required.".to_string())?;

        Ok(Weight(whole * 100 + fraction))
    }

    /// Weight in hundredths
    pub fn hundredths(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl KeyPart for Weight {
    fn key_part(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl Serialize for Weight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Weight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        let text = match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text,
            Raw::Number(number) => number.to_string(),
        };
        Weight::parse(&text).map_err(serde::de::Error::custom)
    }
}
