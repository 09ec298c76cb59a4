//! Ledger construction parameters.
//!
//! Everything here is validated once, when the ledger is built, so the
//! identifier algorithm never has to deal with malformed input.

use serde::{Deserialize, Serialize};

use bankledger_core::{DomainError, DomainResult, ValueObject};

/// Opaque routing code copied into every account (a BIC analogue).
///
/// It does not take part in identifier computation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutingCode(String);

impl RoutingCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for RoutingCode {}

impl core::fmt::Display for RoutingCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One or two uppercase ASCII letters, e.g. `AT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    pub fn parse(code: &str) -> DomainResult<Self> {
        let valid_len = (1..=2).contains(&code.len());
        if !valid_len || !code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(DomainError::validation(format!(
                "country code must be one or two uppercase letters, got {code:?}"
            )));
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Letters mapped to two-digit numbers (`A` = 10 ... `Z` = 35), concatenated.
    pub fn numeric(&self) -> String {
        self.0
            .bytes()
            .map(|b| format!("{:02}", u32::from(b) - 55))
            .collect()
    }
}

impl ValueObject for CountryCode {}

impl TryFrom<String> for CountryCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CountryCode> for String {
    fn from(value: CountryCode) -> Self {
        value.0
    }
}

impl core::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw bank code as it may appear in configuration: integer, float or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BankCodeInput {
    Integer(u64),
    Float(f64),
    Text(String),
}

impl From<u64> for BankCodeInput {
    fn from(value: u64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for BankCodeInput {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for BankCodeInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for BankCodeInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Bank code: a non-empty run of decimal digits, kept as text.
///
/// Leading zeros are significant and preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BankCodeInput", into = "String")]
pub struct BankCode(String);

impl BankCode {
    pub fn parse(input: impl Into<BankCodeInput>) -> DomainResult<Self> {
        let text = match input.into() {
            BankCodeInput::Integer(n) => n.to_string(),
            BankCodeInput::Float(f) => {
                if !f.is_finite() || f < 0.0 || f.fract() != 0.0 {
                    return Err(DomainError::validation(format!(
                        "bank code must be a non-negative whole number, got {f}"
                    )));
                }
                format!("{f:.0}")
            }
            BankCodeInput::Text(s) => s,
        };

        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::validation(format!(
                "bank code must consist of decimal digits, got {text:?}"
            )));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for BankCode {}

impl TryFrom<BankCodeInput> for BankCode {
    type Error = DomainError;

    fn try_from(value: BankCodeInput) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<BankCode> for String {
    fn from(value: BankCode) -> Self {
        value.0
    }
}

impl core::fmt::Display for BankCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated construction parameters of a [`crate::Ledger`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSettings {
    #[serde(alias = "bic")]
    pub routing_code: RoutingCode,
    pub country: CountryCode,
    pub bank_code: BankCode,
}

impl LedgerSettings {
    pub fn new(
        routing_code: impl Into<String>,
        country: &str,
        bank_code: impl Into<BankCodeInput>,
    ) -> DomainResult<Self> {
        Ok(Self {
            routing_code: RoutingCode::new(routing_code),
            country: CountryCode::parse(country)?,
            bank_code: BankCode::parse(bank_code)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn country_letters_map_to_two_digit_codes() {
        assert_eq!(CountryCode::parse("AB").unwrap().numeric(), "1011");
        assert_eq!(CountryCode::parse("AT").unwrap().numeric(), "1029");
        assert_eq!(CountryCode::parse("Z").unwrap().numeric(), "35");
    }

    #[test]
    fn country_code_rejects_bad_shapes() {
        for bad in ["", "at", "AUT", "A1", "Ä"] {
            assert!(CountryCode::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn bank_code_is_stringified_from_any_numeric_form() {
        assert_eq!(BankCode::parse(12345u64).unwrap().as_str(), "12345");
        assert_eq!(BankCode::parse(1234.0).unwrap().as_str(), "1234");
        assert_eq!(BankCode::parse("00420").unwrap().as_str(), "00420");
    }

    #[test]
    fn bank_code_rejects_non_digits() {
        assert!(BankCode::parse(12.5).is_err());
        assert!(BankCode::parse(-3.0).is_err());
        assert!(BankCode::parse(f64::NAN).is_err());
        assert!(BankCode::parse("").is_err());
        assert!(BankCode::parse("12a").is_err());
    }

    #[test]
    fn settings_deserialize_with_bic_alias_and_numeric_bank_code() {
        let settings: LedgerSettings = serde_json::from_value(json!({
            "bic": "BANKATWW",
            "country": "AT",
            "bank_code": 12345
        }))
        .unwrap();
        assert_eq!(settings.routing_code.as_str(), "BANKATWW");
        assert_eq!(settings.country.as_str(), "AT");
        assert_eq!(settings.bank_code.as_str(), "12345");

        let from_float: LedgerSettings = serde_json::from_value(json!({
            "routing_code": "X",
            "country": "DE",
            "bank_code": 37040044.0
        }))
        .unwrap();
        assert_eq!(from_float.bank_code.as_str(), "37040044");
    }

    #[test]
    fn invalid_settings_fail_deserialization() {
        let err = serde_json::from_value::<LedgerSettings>(json!({
            "routing_code": "X",
            "country": "germany",
            "bank_code": "1"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("country code"));
    }
}
