//! Order, customer and address data handed over by the host.

use serde::{Deserialize, Serialize};

use super::money::Currency;

/// Prefix for shopper references of guest checkouts.
pub const GUEST_ID: &str = "customer_";

/// A postal address as captured at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub firstname: Option<String>,
    pub middlename: Option<String>,
    pub lastname: Option<String>,
    /// Street lines, first line first.
    pub street: Vec<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub region_code: Option<String>,
    pub country_id: Option<String>,
}

impl Address {
    /// Returns the first street line, if it is non-empty.
    pub fn street_line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1)
            .and_then(|idx| self.street.get(idx))
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// A registered customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customer {
    pub id: String,
    /// Shopper reference explicitly assigned for Adyen.
    pub adyen_customer_ref: Option<String>,
    pub increment_id: Option<String>,
}

impl Customer {
    /// Returns the reference Adyen knows this customer by.
    pub fn shopper_reference(&self) -> &str {
        [&self.adyen_customer_ref, &self.increment_id]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.is_empty())
            .unwrap_or(self.id.as_str())
    }
}

/// The order a payment belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub increment_id: String,
    pub real_order_id: String,
    pub currency: Currency,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub remote_ip: Option<String>,
    #[serde(default)]
    pub billing_address: Option<Address>,
    #[serde(default)]
    pub shipping_address: Option<Address>,
}

impl Order {
    /// Returns the shopper reference: the customer's reference, or a
    /// guest reference built from the order id.
    pub fn shopper_reference(&self) -> String {
        self.customer
            .as_ref()
            .map(Customer::shopper_reference)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}{}", GUEST_ID, self.real_order_id))
    }
}
