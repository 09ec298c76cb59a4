//! Account numbers and their mod-97 checksum.
//!
//! The layout looks like an IBAN (`country + checksum + bank code + sequence`)
//! but the checksum rule is this ledger's own and is not interchangeable with
//! ISO 13616.

use serde::{Deserialize, Serialize};

use crate::settings::{BankCode, CountryCode};

/// Width of the zero-padded sequence part of an account number.
pub const SEQUENCE_WIDTH: usize = 11;

/// Width the numeric country code is right-padded to before the checksum.
const COUNTRY_FIELD_WIDTH: usize = 6;

/// Account identifier assigned once, at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountNumber(String);

impl AccountNumber {
    /// Derive the identifier for sequence number `sequence`.
    ///
    /// Pure: the same settings and sequence always yield the same identifier.
    pub fn assign(country: &CountryCode, bank_code: &BankCode, sequence: u64) -> Self {
        let padded = pad_sequence(sequence);
        let check = checksum(country, bank_code, &padded);
        Self(format!("{country}{check}{bank_code}{padded}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The two checksum digits following the country code.
    pub fn check_digits(&self) -> &str {
        let start = self.0.bytes().take_while(u8::is_ascii_uppercase).count();
        &self.0[start..start + 2]
    }
}

impl core::fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// `sequence` as an 11-digit, zero-padded decimal string.
pub fn pad_sequence(sequence: u64) -> String {
    format!("{sequence:0width$}", width = SEQUENCE_WIDTH)
}

/// Two-digit checksum over `bank_code + padded_sequence + padded_country`.
///
/// The concatenation is read as a decimal integer `n` and the result is
/// `98 - (n mod 97)`, zero-padded to two digits. The remainder is folded digit
/// by digit, so bank codes of any length are fine.
pub fn checksum(country: &CountryCode, bank_code: &BankCode, padded_sequence: &str) -> String {
    let mut country_field = country.numeric();
    while country_field.len() < COUNTRY_FIELD_WIDTH {
        country_field.push('0');
    }

    let digits = bank_code
        .as_str()
        .bytes()
        .chain(padded_sequence.bytes())
        .chain(country_field.bytes());
    let remainder = mod97(digits);

    format!("{:02}", 98 - remainder)
}

fn mod97(digits: impl Iterator<Item = u8>) -> u32 {
    digits.fold(0u32, |acc, b| {
        debug_assert!(b.is_ascii_digit());
        (acc * 10 + u32::from(b - b'0')) % 97
    })
}
