//! Payment method codes and card types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host method code of the credit-card method.
pub const CC_METHOD_CODE: &str = "adyen_cc";
/// Host method code of the SEPA direct debit method.
pub const SEPA_METHOD_CODE: &str = "adyen_sepa";

/// Payment method a request is built for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethodKind {
    Cc,
    ApplePay,
    OneClick,
    Multibanco,
    Boleto,
    Sepa,
    Other(String),
}

impl PaymentMethodKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cc => "cc",
            Self::ApplePay => "apple_pay",
            Self::OneClick => "oneclick",
            Self::Multibanco => "multibanco",
            Self::Boleto => "boleto",
            Self::Sepa => "sepa",
            Self::Other(code) => code,
        }
    }

    /// Methods whose request carries shopper, address and card data.
    pub fn is_card_like(&self) -> bool {
        matches!(
            self,
            Self::Cc | Self::ApplePay | Self::OneClick | Self::Multibanco
        )
    }
}

impl From<&str> for PaymentMethodKind {
    fn from(code: &str) -> Self {
        match code {
            "cc" => Self::Cc,
            "apple_pay" => Self::ApplePay,
            "oneclick" => Self::OneClick,
            "multibanco" => Self::Multibanco,
            "boleto" => Self::Boleto,
            "sepa" => Self::Sepa,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for PaymentMethodKind {
    fn from(code: String) -> Self {
        Self::from(code.as_str())
    }
}

impl From<PaymentMethodKind> for String {
    fn from(kind: PaymentMethodKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for PaymentMethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A card brand Adyen can process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CcType {
    /// Adyen variant code.
    pub code: &'static str,
    pub label: &'static str,
}

const CC_TYPES: &[CcType] = &[
    CcType { code: "visa", label: "Visa" },
    CcType { code: "mc", label: "MasterCard" },
    CcType { code: "amex", label: "American Express" },
    CcType { code: "discover", label: "Discover" },
    CcType { code: "diners", label: "Diners Club" },
    CcType { code: "jcb", label: "JCB" },
    CcType { code: "maestro", label: "Maestro" },
    CcType { code: "maestrouk", label: "Maestro UK" },
    CcType { code: "cup", label: "China UnionPay" },
    CcType { code: "bcmc", label: "Bancontact" },
    CcType { code: "cartebancaire", label: "Carte Bancaire" },
    CcType { code: "elo", label: "ELO" },
    CcType { code: "hipercard", label: "Hipercard" },
    CcType { code: "hiper", label: "Hiper" },
];

/// Returns every card type the integration knows, in display order.
pub fn cc_types() -> &'static [CcType] {
    CC_TYPES
}

/// Maps a stored-detail variant to the host method that can charge it.
pub fn map_variant_to_method(variant: &str) -> String {
    if variant == "sepadirectdebit" {
        return SEPA_METHOD_CODE.to_string();
    }
    if CC_TYPES.iter().any(|t| t.code.eq_ignore_ascii_case(variant)) {
        return CC_METHOD_CODE.to_string();
    }
    variant.to_string()
}
