//! Error types shared by the Adyen crates.

use rust_decimal::Decimal;

use crate::domain::StoreId;

/// Domain-level errors (invalid input or payment data).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Amount cannot be negative")]
    NegativeAmount,

    #[error("Amount {0} does not fit in minor units")]
    AmountOverflow(Decimal),

    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    #[error("Unknown recurring type: {0}")]
    UnknownRecurringType(String),

    #[error("Invalid credit number card.")]
    InvalidCardData,

    #[error("Missing token")]
    MissingToken,

    #[error("Missing boleto data")]
    MissingBoletoData,

    #[error("Selected payment type is not allowed for billing country.")]
    CountryNotAllowed(String),
}

/// Configuration lookups that cannot be satisfied.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing setting `{setting}` for store {store}")]
    MissingSetting { setting: &'static str, store: StoreId },
}
