//! # Adyen Types
//!
//! Domain types, the authorise request builder and port traits for the
//! Adyen integration. This crate performs no IO: the host's order data
//! goes in, Adyen-shaped DTOs come out.
//!
//! ## Layout
//!
//! - `domain/` - Orders, payments, currencies, recurring contracts
//! - `request/` - `PaymentRequest` and its builder
//! - `ports/` - Configuration, cache and session traits the host implements
//! - `error/` - Domain and configuration error types

pub mod domain;
pub mod error;
pub mod ports;
pub mod request;

// Re-export commonly used types
pub use domain::{
    Address, Amount, BoletoData, CcType, Currency, Customer, Order, Payment, PaymentInfo,
    PaymentMethodKind, RecurringContract, RecurringContracts, RecurringType, StoreId,
};
pub use error::{ConfigError, DomainError};
pub use ports::{
    Cache, CcConfig, ConfigProvider, InstallmentRule, InstallmentsConfig, PosConfig, SessionStore,
    StaticConfig, StoreConfig,
};
pub use request::{EncryptedCardData, PaymentRequest, PaymentRequestObserver, RequestOptions};
