//! Adyen authorise request assembled from a host payment.

use base64::{Engine, engine::general_purpose::STANDARD};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{Address, Amount, Order, Payment, PaymentMethodKind, RecurringType};
use crate::error::DomainError;

const SEPA_BRAND: &str = "sepadirectdebit";

/// Browser data forwarded for risk checks and 3-D Secure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept_header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Client-side encrypted card fields kept in the checkout session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncryptedCardData {
    pub number: Option<String>,
    pub expiry_month: Option<String>,
    pub expiry_year: Option<String>,
    pub cvc: Option<String>,
}

/// Lets the host amend card-like requests before they are sent.
pub trait PaymentRequestObserver: Send + Sync {
    fn on_card_payment_request(
        &self,
        order: &Order,
        payment_method: &PaymentMethodKind,
        request: &mut PaymentRequest,
    );
}

/// Inputs to [`PaymentRequest::create`] besides the payment itself.
pub struct RequestOptions<'a> {
    pub payment_method: PaymentMethodKind,
    pub merchant_account: Option<String>,
    pub recurring_type: Option<RecurringType>,
    pub enable_moto: bool,
    /// The request originates from the back office.
    pub is_admin: bool,
    pub installments_enabled: bool,
    pub browser_info: BrowserInfo,
    pub encrypted_card: EncryptedCardData,
    pub observer: Option<&'a dyn PaymentRequestObserver>,
}

impl<'a> RequestOptions<'a> {
    pub fn new(payment_method: PaymentMethodKind) -> Self {
        Self {
            payment_method,
            merchant_account: None,
            recurring_type: None,
            enable_moto: false,
            is_admin: false,
            installments_enabled: false,
            browser_info: BrowserInfo::default(),
            encrypted_card: EncryptedCardData::default(),
            observer: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopperInteraction {
    Ecommerce,
    ContAuth,
    Moto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurring {
    pub contract: RecurringType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopperName {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub infix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdyenAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_number_or_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_or_province: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl AdyenAddress {
    /// Billing address with the placeholders Adyen accepts for missing parts.
    fn billing(address: &Address) -> Self {
        fn or_placeholder(value: Option<&str>, fallback: &str) -> Option<String> {
            Some(value.filter(|v| !v.is_empty()).unwrap_or(fallback).to_string())
        }

        Self {
            street: or_placeholder(address.street_line(1), "N/A"),
            house_number_or_name: Some(String::new()),
            city: or_placeholder(address.city.as_deref(), "N/A"),
            postal_code: or_placeholder(address.postcode.as_deref(), ""),
            state_or_province: or_placeholder(address.region_code.as_deref(), ""),
            country: or_placeholder(address.country_id.as_deref(), "ZZ"),
        }
    }

    /// Delivery address copied as-is.
    fn delivery(address: &Address) -> Self {
        Self {
            street: address.street.first().cloned(),
            house_number_or_name: Some(String::new()),
            city: address.city.clone(),
            postal_code: address.postcode.clone(),
            state_or_province: address.region_code.clone(),
            country: address.country_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installments {
    pub value: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationInfo {
    pub adyen_library: LibraryInfo,
}

impl Default for ApplicationInfo {
    fn default() -> Self {
        Self {
            adyen_library: LibraryInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }
}

/// Authorise request in Adyen's field layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_account: Option<String>,
    pub amount: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopper_email: Option<String>,
    #[serde(rename = "shopperIP", skip_serializing_if = "Option::is_none")]
    pub shopper_ip: Option<String>,
    pub shopper_reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopper_interaction: Option<ShopperInteraction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring: Option<Recurring>,
    pub browser_info: BrowserInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopper_name: Option<ShopperName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<AdyenAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<AdyenAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_recurring_detail_reference: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_data: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installments: Option<Installments>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account: Option<BankAccount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_security_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<String>,
    pub application_info: ApplicationInfo,
}

/// Picks the contract to store the details under, if any.
fn recurring_contract(
    method: &PaymentMethodKind,
    recurring_type: Option<RecurringType>,
    payment: &Payment,
) -> Option<RecurringType> {
    let recurring_type = recurring_type?;
    let info = payment.info();
    match method {
        // Apple Pay tokens cannot be re-used with the shopper present.
        PaymentMethodKind::ApplePay => {
            (recurring_type != RecurringType::OneClick).then_some(RecurringType::Recurring)
        }
        PaymentMethodKind::OneClick if info.customer_interaction => Some(RecurringType::OneClick),
        PaymentMethodKind::OneClick => Some(RecurringType::Recurring),
        PaymentMethodKind::Cc => match info.store_cc {
            None if recurring_type == RecurringType::OneClickRecurring => {
                Some(RecurringType::Recurring)
            }
            Some(true) => Some(recurring_type),
            _ if recurring_type == RecurringType::Recurring => Some(RecurringType::Recurring),
            _ => None,
        },
        _ => Some(recurring_type),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Encrypted fields are dropped when blank or the literal `false` the
/// client-side library emits for fields it could not encrypt.
fn encrypted_field(value: Option<&str>) -> Option<&str> {
    non_empty(value).filter(|v| *v != "false")
}

impl PaymentRequest {
    /// Builds the authorise request for `payment` over `amount` (major units
    /// of the order currency).
    pub fn create(
        payment: &Payment,
        amount: Decimal,
        options: RequestOptions<'_>,
    ) -> Result<Self, DomainError> {
        let order = &payment.order;
        let method = &options.payment_method;

        let mut request = Self {
            reference: order.increment_id.clone(),
            merchant_account: options.merchant_account.clone(),
            amount: Amount::from_major(amount, order.currency.clone())?,
            shopper_email: order.customer_email.clone(),
            shopper_ip: order.remote_ip.clone(),
            shopper_reference: order.shopper_reference(),
            shopper_interaction: None,
            recurring: recurring_contract(method, options.recurring_type, payment)
                .map(|contract| Recurring { contract }),
            browser_info: options.browser_info.clone(),
            card: None,
            shopper_name: None,
            billing_address: None,
            delivery_address: None,
            selected_brand: None,
            selected_recurring_detail_reference: None,
            additional_data: BTreeMap::new(),
            installments: None,
            bank_account: None,
            social_security_number: None,
            delivery_date: None,
            application_info: ApplicationInfo::default(),
        };

        match method {
            m if m.is_card_like() => request.fill_card_like(payment, &options)?,
            PaymentMethodKind::Boleto => {
                let boleto = payment.boleto.as_ref().ok_or(DomainError::MissingBoletoData)?;
                request.social_security_number = Some(boleto.social_security_number.clone());
                request.selected_brand = Some(boleto.selected_brand.clone());
                request.shopper_name = Some(ShopperName {
                    first_name: Some(boleto.firstname.clone()),
                    infix: None,
                    last_name: Some(boleto.lastname.clone()),
                });
                request.delivery_date = Some(boleto.delivery_date.clone());
            }
            PaymentMethodKind::Sepa => {
                let info = payment.info();
                request.bank_account = Some(BankAccount {
                    iban: info.iban.clone(),
                    owner_name: info.account_name.clone(),
                    country_code: info.country.clone(),
                });
                request.selected_brand = Some(SEPA_BRAND.to_string());
            }
            _ => {}
        }

        tracing::debug!(
            reference = %request.reference,
            payment_method = %method,
            "built payment request"
        );
        Ok(request)
    }

    fn fill_card_like(
        &mut self,
        payment: &Payment,
        options: &RequestOptions<'_>,
    ) -> Result<(), DomainError> {
        let order = &payment.order;
        let info = payment.info();
        let method = &options.payment_method;

        if let Some(billing) = &order.billing_address {
            let trimmed = |v: &Option<String>| v.as_deref().unwrap_or_default().trim().to_string();
            let middle = trimmed(&billing.middlename);
            self.shopper_name = Some(ShopperName {
                first_name: Some(trimmed(&billing.firstname)),
                infix: (!middle.is_empty()).then_some(middle),
                last_name: Some(trimmed(&billing.lastname)),
            });
            self.billing_address = Some(AdyenAddress::billing(billing));
        }

        self.delivery_address = order.shipping_address.as_ref().map(AdyenAddress::delivery);

        let mut recurring_detail_reference = None;
        if *method == PaymentMethodKind::OneClick {
            recurring_detail_reference = non_empty(info.recurring_detail_reference.as_deref());
            if info.customer_interaction {
                self.shopper_interaction = Some(ShopperInteraction::Ecommerce);
            } else {
                self.shopper_interaction = Some(ShopperInteraction::ContAuth);
                // Stored iDEAL and Sofort details are charged as SEPA.
                if payment.has_cc_type("directEbanking") || payment.has_cc_type("ideal") {
                    self.selected_brand = Some(SEPA_BRAND.to_string());
                }
            }
        } else {
            self.shopper_interaction = Some(ShopperInteraction::Ecommerce);
        }

        if *method == PaymentMethodKind::Cc && options.is_admin && options.enable_moto {
            self.shopper_interaction = Some(ShopperInteraction::Moto);
        }

        if payment.has_cc_type(SEPA_BRAND) {
            self.selected_brand = Some(SEPA_BRAND.to_string());
        }

        self.selected_recurring_detail_reference = recurring_detail_reference.map(str::to_string);

        if *method == PaymentMethodKind::ApplePay {
            let token = non_empty(info.token.as_deref()).ok_or(DomainError::MissingToken)?;
            self.additional_data
                .insert("payment.token".to_string(), STANDARD.encode(token));
        } else {
            let card = &options.encrypted_card;
            self.card = Some(Card {
                holder_name: payment.cc_owner.clone(),
            });

            if let Some(number) = encrypted_field(card.number.as_deref()) {
                self.additional_data
                    .insert("encryptedCardNumber".to_string(), number.to_string());
            }
            if let (Some(month), Some(year)) = (
                non_empty(card.expiry_month.as_deref()),
                non_empty(card.expiry_year.as_deref()),
            ) {
                self.additional_data
                    .insert("encryptedExpiryMonth".to_string(), month.to_string());
                self.additional_data
                    .insert("encryptedExpiryYear".to_string(), year.to_string());
            }
            if let Some(cvc) = encrypted_field(card.cvc.as_deref()) {
                self.additional_data
                    .insert("encryptedSecurityCode".to_string(), cvc.to_string());
            }
        }

        if options.installments_enabled {
            self.installments = info
                .number_of_installments
                .filter(|n| *n > 0)
                .map(|value| Installments { value });
        }

        if *method == PaymentMethodKind::Multibanco {
            self.card = None;
            self.delivery_address = None;
            self.recurring = None;
            self.additional_data.clear();
            self.selected_brand = Some(method.as_str().to_string());
            self.delivery_date = info.delivery_date.clone();
        }

        if let Some(observer) = options.observer {
            observer.on_card_payment_request(order, method, self);
        }

        Ok(())
    }
}
