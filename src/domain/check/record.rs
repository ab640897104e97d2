//! CheckRecord - the fixed-shape extraction result.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel for any field the model did not supply.
pub const NOT_FOUND: &str = "Not found";

/// Sentinel for a missing signature status.
pub const NOT_DETECTED: &str = "Not detected";

/// The thirteen fields extracted from a check image.
///
/// Order matches the order the fields are listed in the extraction prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckField {
    AccountHolder,
    AccountNumber,
    RoutingNumber,
    BankName,
    IfscCode,
    MicrCode,
    CheckNumber,
    Date,
    AmountNumbers,
    AmountWords,
    SignatureStatus,
    Memo,
    Address,
}

impl CheckField {
    /// Every field, in prompt order.
    pub const ALL: [CheckField; 13] = [
        CheckField::AccountHolder,
        CheckField::AccountNumber,
        CheckField::RoutingNumber,
        CheckField::BankName,
        CheckField::IfscCode,
        CheckField::MicrCode,
        CheckField::CheckNumber,
        CheckField::Date,
        CheckField::AmountNumbers,
        CheckField::AmountWords,
        CheckField::SignatureStatus,
        CheckField::Memo,
        CheckField::Address,
    ];

    /// JSON key used both in the prompt and in the wire format.
    pub fn key(self) -> &'static str {
        match self {
            CheckField::AccountHolder => "accountHolder",
            CheckField::AccountNumber => "accountNumber",
            CheckField::RoutingNumber => "routingNumber",
            CheckField::BankName => "bankName",
            CheckField::IfscCode => "ifscCode",
            CheckField::MicrCode => "micrCode",
            CheckField::CheckNumber => "checkNumber",
            CheckField::Date => "date",
            CheckField::AmountNumbers => "amountNumbers",
            CheckField::AmountWords => "amountWords",
            CheckField::SignatureStatus => "signatureStatus",
            CheckField::Memo => "memo",
            CheckField::Address => "address",
        }
    }

    /// Human-readable label, used by the CLI table.
    pub fn label(self) -> &'static str {
        match self {
            CheckField::AccountHolder => "Account Holder",
            CheckField::AccountNumber => "Account Number",
            CheckField::RoutingNumber => "Routing Number",
            CheckField::BankName => "Bank Name",
            CheckField::IfscCode => "IFSC Code",
            CheckField::MicrCode => "MICR Code",
            CheckField::CheckNumber => "Check Number",
            CheckField::Date => "Date",
            CheckField::AmountNumbers => "Amount (Numbers)",
            CheckField::AmountWords => "Amount (Words)",
            CheckField::SignatureStatus => "Signature",
            CheckField::Memo => "Memo",
            CheckField::Address => "Address",
        }
    }

    /// Hint shown to the model for this field in the extraction prompt.
    pub fn prompt_hint(self) -> &'static str {
        match self {
            CheckField::AccountHolder => "account holder name or null",
            CheckField::AccountNumber => "account number or null",
            CheckField::RoutingNumber => "routing number or null",
            CheckField::BankName => "bank name or null",
            CheckField::IfscCode => "IFSC code or null",
            CheckField::MicrCode => "MICR code or null",
            CheckField::CheckNumber => "check number or null",
            CheckField::Date => "date or null",
            CheckField::AmountNumbers => "numerical amount or null",
            CheckField::AmountWords => "written amount or null",
            CheckField::SignatureStatus => "Present or Absent",
            CheckField::Memo => "memo/purpose or null",
            CheckField::Address => "address or null",
        }
    }

    /// Value substituted when the model supplied nothing usable.
    pub fn sentinel(self) -> &'static str {
        match self {
            CheckField::SignatureStatus => NOT_DETECTED,
            _ => NOT_FOUND,
        }
    }
}

impl fmt::Display for CheckField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Fixed 13-field extraction result.
///
/// Every field is always a string. A record built through [`CheckRecord::default`]
/// holds the sentinel for each field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRecord {
    pub account_holder: String,
    pub account_number: String,
    pub routing_number: String,
    pub bank_name: String,
    pub ifsc_code: String,
    pub micr_code: String,
    pub check_number: String,
    pub date: String,
    pub amount_numbers: String,
    pub amount_words: String,
    pub signature_status: String,
    pub memo: String,
    pub address: String,
}

impl CheckRecord {
    /// Returns the value stored for a field.
    pub fn get(&self, field: CheckField) -> &str {
        match field {
            CheckField::AccountHolder => &self.account_holder,
            CheckField::AccountNumber => &self.account_number,
            CheckField::RoutingNumber => &self.routing_number,
            CheckField::BankName => &self.bank_name,
            CheckField::IfscCode => &self.ifsc_code,
            CheckField::MicrCode => &self.micr_code,
            CheckField::CheckNumber => &self.check_number,
            CheckField::Date => &self.date,
            CheckField::AmountNumbers => &self.amount_numbers,
            CheckField::AmountWords => &self.amount_words,
            CheckField::SignatureStatus => &self.signature_status,
            CheckField::Memo => &self.memo,
            CheckField::Address => &self.address,
        }
    }

    /// Replaces the value stored for a field.
    pub fn set(&mut self, field: CheckField, value: impl Into<String>) {
        let slot = match field {
            CheckField::AccountHolder => &mut self.account_holder,
            CheckField::AccountNumber => &mut self.account_number,
            CheckField::RoutingNumber => &mut self.routing_number,
            CheckField::BankName => &mut self.bank_name,
            CheckField::IfscCode => &mut self.ifsc_code,
            CheckField::MicrCode => &mut self.micr_code,
            CheckField::CheckNumber => &mut self.check_number,
            CheckField::Date => &mut self.date,
            CheckField::AmountNumbers => &mut self.amount_numbers,
            CheckField::AmountWords => &mut self.amount_words,
            CheckField::SignatureStatus => &mut self.signature_status,
            CheckField::Memo => &mut self.memo,
            CheckField::Address => &mut self.address,
        };
        *slot = value.into();
    }

    /// Builder-style variant of [`CheckRecord::set`].
    pub fn with(mut self, field: CheckField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Iterates `(field, value)` pairs in prompt order.
    pub fn iter(&self) -> impl Iterator<Item = (CheckField, &str)> + '_ {
        CheckField::ALL.into_iter().map(move |f| (f, self.get(f)))
    }

    /// True when the field still holds its sentinel.
    pub fn is_missing(&self, field: CheckField) -> bool {
        self.get(field) == field.sentinel()
    }

    /// Number of fields that hold an extracted value.
    pub fn found_count(&self) -> usize {
        CheckField::ALL
            .into_iter()
            .filter(|f| !self.is_missing(*f))
            .count()
    }
}

impl Default for CheckRecord {
    fn default() -> Self {
        let sentinel = |f: CheckField| f.sentinel().to_string();
        Self {
            account_holder: sentinel(CheckField::AccountHolder),
            account_number: sentinel(CheckField::AccountNumber),
            routing_number: sentinel(CheckField::RoutingNumber),
            bank_name: sentinel(CheckField::BankName),
            ifsc_code: sentinel(CheckField::IfscCode),
            micr_code: sentinel(CheckField::MicrCode),
            check_number: sentinel(CheckField::CheckNumber),
            date: sentinel(CheckField::Date),
            amount_numbers: sentinel(CheckField::AmountNumbers),
            amount_words: sentinel(CheckField::AmountWords),
            signature_status: sentinel(CheckField::SignatureStatus),
            memo: sentinel(CheckField::Memo),
            address: sentinel(CheckField::Address),
        }
    }
}
