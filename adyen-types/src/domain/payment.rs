//! Payment data attached to an order.

use serde::{Deserialize, Serialize};

use super::order::Order;

/// Method-specific data captured during checkout.
///
/// Every field is optional; the host only fills what the selected method
/// collected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentInfo {
    /// The shopper is present (as opposed to a merchant-initiated charge).
    pub customer_interaction: bool,
    /// "Remember these details" checkbox: unset, ticked or unticked.
    pub store_cc: Option<bool>,
    pub recurring_detail_reference: Option<String>,
    pub number_of_installments: Option<u32>,
    /// Apple Pay payment token.
    pub token: Option<String>,
    pub iban: Option<String>,
    pub account_name: Option<String>,
    pub country: Option<String>,
    pub delivery_date: Option<String>,
    /// 3-D Secure issuer URL returned by the authorisation.
    pub issuer_url: Option<String>,
    pub pa_request: Option<String>,
    pub md: Option<String>,
}

/// Shopper data collected by the boleto form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoletoData {
    pub social_security_number: String,
    pub selected_brand: String,
    pub firstname: String,
    pub lastname: String,
    pub delivery_date: String,
}

/// A payment in progress for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub order: Order,
    #[serde(default)]
    pub cc_type: Option<String>,
    #[serde(default)]
    pub cc_owner: Option<String>,
    #[serde(default)]
    pub additional_information: PaymentInfo,
    #[serde(default)]
    pub boleto: Option<BoletoData>,
}

impl Payment {
    pub fn new(order: Order) -> Self {
        Self {
            order,
            cc_type: None,
            cc_owner: None,
            additional_information: PaymentInfo::default(),
            boleto: None,
        }
    }

    /// Returns true if the card type equals `code`.
    pub fn has_cc_type(&self, code: &str) -> bool {
        self.cc_type.as_deref() == Some(code)
    }

    pub fn info(&self) -> &PaymentInfo {
        &self.additional_information
    }

    pub fn info_mut(&mut self) -> &mut PaymentInfo {
        &mut self.additional_information
    }
}
