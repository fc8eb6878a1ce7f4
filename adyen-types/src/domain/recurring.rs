//! Recurring contracts: payment details Adyen stores for a shopper.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::DomainError;

/// How a stored detail may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RecurringType {
    /// Shopper re-uses the detail and is present (enters the CVC).
    OneClick,
    /// Merchant charges the detail without the shopper.
    Recurring,
    /// Both of the above.
    OneClickRecurring,
}

impl RecurringType {
    /// The types Adyen lists details by, in listing order.
    pub const LISTABLE: [RecurringType; 2] = [RecurringType::OneClick, RecurringType::Recurring];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneClick => "ONECLICK",
            Self::Recurring => "RECURRING",
            Self::OneClickRecurring => "ONECLICK,RECURRING",
        }
    }

    /// Returns true if details of this type can be charged without the shopper.
    pub fn allows_recurring(&self) -> bool {
        matches!(self, Self::Recurring | Self::OneClickRecurring)
    }
}

impl fmt::Display for RecurringType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecurringType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ONECLICK" => Ok(Self::OneClick),
            "RECURRING" => Ok(Self::Recurring),
            "ONECLICK,RECURRING" => Ok(Self::OneClickRecurring),
            other => Err(DomainError::UnknownRecurringType(other.to_string())),
        }
    }
}

impl TryFrom<String> for RecurringType {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecurringType> for String {
    fn from(value: RecurringType) -> Self {
        value.as_str().to_string()
    }
}

/// A stored payment detail as listed by Adyen.
///
/// Attribute names follow the flattened listing keys, e.g.
/// `recurringDetailReference`, `variant`, `card_number`, `creationDate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringContract {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring_type: Option<RecurringType>,
    /// Host payment method the variant maps to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
}

impl RecurringContract {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn recurring_detail_reference(&self) -> Option<&str> {
        self.attribute("recurringDetailReference")
    }

    pub fn variant(&self) -> Option<&str> {
        self.attribute("variant")
    }
}

/// The merged set of a shopper's contracts, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecurringContracts(Vec<RecurringContract>);

impl RecurringContracts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one per-type listing.
    ///
    /// Contracts without a detail reference are dropped. A detail already
    /// present keeps its attributes and becomes `ONECLICK,RECURRING`.
    pub fn absorb(&mut self, listing: impl IntoIterator<Item = RecurringContract>) {
        for contract in listing {
            let Some(reference) = contract.recurring_detail_reference() else {
                continue;
            };
            match self
                .0
                .iter_mut()
                .find(|c| c.recurring_detail_reference() == Some(reference))
            {
                Some(existing) => existing.recurring_type = Some(RecurringType::OneClickRecurring),
                None => self.0.push(contract),
            }
        }
    }

    /// Finds the contract with the given detail reference.
    pub fn find(&self, recurring_detail_reference: &str) -> Option<&RecurringContract> {
        self.0
            .iter()
            .find(|c| c.recurring_detail_reference() == Some(recurring_detail_reference))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecurringContract> {
        self.0.iter()
    }
}

impl IntoIterator for RecurringContracts {
    type Item = RecurringContract;
    type IntoIter = std::vec::IntoIter<RecurringContract>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
