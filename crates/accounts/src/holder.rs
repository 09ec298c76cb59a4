use serde::{Deserialize, Serialize};

use bankledger_core::ValueObject;

/// The person an account belongs to.
///
/// Holders have no identity beyond their fields: two holders with the same
/// name, address and phone number are the same holder, and the ledger keys
/// accounts by that value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountHolder {
    first_name: String,
    last_name: String,
    address: String,
    phone_number: String,
}

impl AccountHolder {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: address.into(),
            phone_number: phone_number.into(),
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// "First Last", used in diagnostics.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl ValueObject for AccountHolder {}

impl core::fmt::Display for AccountHolder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}
