//! Checkout session port.
//!
//! Holds data that must survive between the payment form submission and
//! order placement but must never be persisted with the order, such as
//! client-side encrypted card fields.

/// Key/value storage scoped to the shopper's checkout session.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, value: String);

    /// Removes and returns the value.
    async fn take(&self, key: &str) -> Option<String>;
}
