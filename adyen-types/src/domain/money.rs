//! Currency codes and minor-unit amount formatting.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// ISO-4217 currency code (always three upper-case ASCII letters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Parses and normalises a currency code.
    pub fn new(code: &str) -> Result<Self, DomainError> {
        let code = code.trim().to_ascii_uppercase();
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(DomainError::InvalidCurrency(code));
        }
        Ok(Self(code))
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    /// Returns the number of decimal places Adyen expects for this currency.
    pub fn decimals(&self) -> u32 {
        match self.0.as_str() {
            "JPY" | "IDR" | "KRW" | "BYR" | "VND" | "CVE" | "DJF" | "GNF" | "PYG" | "RWF"
            | "UGX" | "VUV" | "XAF" | "XOF" | "XPF" | "GHC" | "KMF" => 0,
            "MRO" => 1,
            "BHD" | "JOD" | "KWD" | "OMR" | "LYD" | "TND" => 3,
            _ => 2,
        }
    }
}

impl TryFrom<String> for Currency {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

impl std::str::FromStr for Currency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Converts a major-unit amount into Adyen minor units.
///
/// Rounds half away from zero at the currency's precision.
pub fn format_amount(amount: Decimal, currency: &Currency) -> Result<i64, DomainError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(DomainError::NegativeAmount);
    }
    let scale = Decimal::from(10_i64.pow(currency.decimals()));
    amount
        .checked_mul(scale)
        .map(|v| v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|v| v.to_i64())
        .ok_or(DomainError::AmountOverflow(amount))
}

/// Amount as sent to Adyen: currency plus value in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub currency: Currency,
    pub value: i64,
}

impl Amount {
    pub fn from_major(amount: Decimal, currency: Currency) -> Result<Self, DomainError> {
        let value = format_amount(amount, &currency)?;
        Ok(Self { currency, value })
    }
}
