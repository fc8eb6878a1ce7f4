//! Credit card payment method.
//!
//! Card data is encrypted client side. The encrypted fields only live in
//! the checkout session between form submission and order placement and
//! are never stored on the payment.

use adyen_types::domain::{CC_METHOD_CODE, cc_types};
use adyen_types::request::BrowserInfo;
use adyen_types::{
    CcType, ConfigProvider, Currency, DomainError, EncryptedCardData, Payment, PaymentMethodKind,
    PaymentRequest, PaymentRequestObserver, RequestOptions, SessionStore, StoreId,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::MethodError;
use crate::installments::{self, InstallmentOption};

/// Session key holding a path to redirect to after order placement.
pub const REDIRECT_URL_KEY: &str = "redirect_url";

const VALIDATE_3D_PATH: &str = "adyen/process/validate3d";

/// Fields posted by the card form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CcFormData {
    pub number_of_installments: Option<u32>,
    /// "Remember these details" checkbox.
    pub store_cc: Option<bool>,
    pub cc_owner: Option<String>,
    pub encrypted_number: Option<String>,
    pub encrypted_expiry_month: Option<String>,
    pub encrypted_expiry_year: Option<String>,
    pub encrypted_cvc: Option<String>,
}

/// Outcome of [`CcMethod::assign_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assigned {
    /// Quote totals must be collected again, e.g. for an installment fee.
    pub recollect_totals: bool,
}

/// Per-call inputs to [`CcMethod::build_payment_request`].
#[derive(Default)]
pub struct RequestContext<'a> {
    pub is_admin: bool,
    pub browser_info: BrowserInfo,
    pub observer: Option<&'a dyn PaymentRequestObserver>,
}

fn session_key(field: &str) -> String {
    format!("encrypted_{field}_{CC_METHOD_CODE}")
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// The Adyen credit card method of one store.
pub struct CcMethod<C: ConfigProvider, S: SessionStore> {
    config: C,
    session: S,
    store: StoreId,
    cc_types_override: Option<Vec<CcType>>,
}

impl<C: ConfigProvider, S: SessionStore> CcMethod<C, S> {
    pub const CODE: &'static str = CC_METHOD_CODE;
    pub const PAYMENT_METHOD: &'static str = "cc";
    pub const CAN_CREATE_BILLING_AGREEMENT: bool = true;
    pub const CAN_USE_FOR_MULTISHIPPING: bool = true;

    pub fn new(config: C, session: S, store: StoreId) -> Self {
        Self {
            config,
            session,
            store,
            cc_types_override: None,
        }
    }

    pub fn store(&self) -> StoreId {
        self.store
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Checkout form
    // ─────────────────────────────────────────────────────────────────────────────

    /// Copies the submitted form onto the payment and parks the encrypted
    /// card fields in the session.
    #[instrument(skip(self, data, payment), fields(store = %self.store))]
    pub async fn assign_data(
        &self,
        data: &CcFormData,
        payment: &mut Payment,
        logged_in: bool,
    ) -> Result<Assigned, MethodError> {
        let info = payment.info_mut();
        info.number_of_installments = data.number_of_installments;
        if logged_in {
            info.store_cc = data.store_cc;
        }
        payment.cc_owner = data.cc_owner.clone();

        let (Some(number), Some(month), Some(year)) = (
            non_empty(&data.encrypted_number),
            non_empty(&data.encrypted_expiry_month),
            non_empty(&data.encrypted_expiry_year),
        ) else {
            warn!("incomplete encrypted card data");
            return Err(DomainError::InvalidCardData.into());
        };

        self.session.set(&session_key("number"), number.to_string()).await;
        self.session.set(&session_key("expiry_month"), month.to_string()).await;
        self.session.set(&session_key("expiry_year"), year.to_string()).await;
        if let Some(cvc) = non_empty(&data.encrypted_cvc) {
            self.session.set(&session_key("cvc"), cvc.to_string()).await;
        }

        let recollect_totals = data.number_of_installments.is_some();
        debug!(recollect_totals, "card data assigned");
        Ok(Assigned { recollect_totals })
    }

    /// Encrypted card fields saved by [`Self::assign_data`].
    pub async fn encrypted_card(&self) -> EncryptedCardData {
        EncryptedCardData {
            number: self.session.get(&session_key("number")).await,
            expiry_month: self.session.get(&session_key("expiry_month")).await,
            expiry_year: self.session.get(&session_key("expiry_year")).await,
            cvc: self.session.get(&session_key("cvc")).await,
        }
    }

    /// Checks the billing country against the configured allow list.
    pub fn validate(&self, payment: &Payment) -> Result<(), MethodError> {
        let config = self.config.store_config(self.store);
        let Some(allowed) = &config.cc.allowed_countries else {
            return Ok(());
        };

        let country = payment
            .order
            .billing_address
            .as_ref()
            .and_then(|a| a.country_id.as_deref())
            .unwrap_or_default();
        if allowed.iter().any(|c| c.eq_ignore_ascii_case(country)) {
            Ok(())
        } else {
            Err(DomainError::CountryNotAllowed(country.to_string()).into())
        }
    }

    pub fn possible_installments(
        &self,
        cc_type: Option<&str>,
        grand_total: Decimal,
        currency: &Currency,
    ) -> Vec<InstallmentOption> {
        let config = self.config.store_config(self.store);
        installments::possible_installments(&config.installments, cc_type, grand_total, currency)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // 3-D Secure
    // ─────────────────────────────────────────────────────────────────────────────

    /// Consumes a pending redirect path from the session and resolves it
    /// against the store front. `None` keeps the default success flow.
    pub async fn order_place_redirect_url(&self) -> Result<Option<String>, MethodError> {
        let Some(path) = self
            .session
            .take(REDIRECT_URL_KEY)
            .await
            .filter(|p| !p.is_empty())
        else {
            return Ok(None);
        };
        Ok(Some(self.url(&path)?))
    }

    /// Issuer URL the shopper is posted to for 3-D Secure.
    pub fn form_url<'p>(&self, payment: &'p Payment) -> Option<&'p str> {
        payment.info().issuer_url.as_deref()
    }

    pub fn form_name(&self) -> &'static str {
        "Adyen CC"
    }

    /// Fields posted to the issuer, in form order.
    pub fn form_fields(
        &self,
        payment: &Payment,
    ) -> Result<Vec<(&'static str, String)>, MethodError> {
        let info = payment.info();
        Ok(vec![
            ("PaReq", info.pa_request.clone().unwrap_or_default()),
            ("MD", info.md.clone().unwrap_or_default()),
            ("TermUrl", self.url(VALIDATE_3D_PATH)?),
        ])
    }

    fn url(&self, path: &str) -> Result<String, MethodError> {
        let config = self.config.store_config(self.store);
        let base = config.base_url(self.store)?;
        Ok(format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Availability
    // ─────────────────────────────────────────────────────────────────────────────

    /// Replaces the configured card types, e.g. to hide brands that cannot
    /// be used for subscriptions. An empty list leaves the configured types.
    pub fn set_available_cc_types(&mut self, cc_types: Vec<CcType>) {
        self.cc_types_override = Some(cc_types);
    }

    pub fn available_cc_types(&self) -> Vec<CcType> {
        if let Some(types) = self.cc_types_override.as_ref().filter(|t| !t.is_empty()) {
            return types.clone();
        }
        let config = self.config.store_config(self.store);
        cc_types()
            .iter()
            .filter(|t| match &config.cc.cctypes {
                Some(enabled) => enabled.iter().any(|code| code == t.code),
                None => true,
            })
            .copied()
            .collect()
    }

    /// Subscriptions need a contract that allows merchant-initiated charges.
    pub fn can_create_adyen_subscription(&self) -> bool {
        self.config
            .store_config(self.store)
            .recurring_type
            .is_some_and(|t| t.allows_recurring())
    }

    /// `grand_total` is the quote total, when a quote exists.
    pub fn is_available(&self, grand_total: Option<Decimal>) -> bool {
        let config = self.config.store_config(self.store);
        if !config.cc.active {
            return false;
        }
        !(config.cc.disable_zero_total && grand_total.is_some_and(|t| t <= Decimal::ZERO))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Authorisation
    // ─────────────────────────────────────────────────────────────────────────────

    /// Builds the authorise request for `payment` from the store
    /// configuration and the card data in the session.
    #[instrument(skip_all, fields(store = %self.store, reference = %payment.order.increment_id))]
    pub async fn build_payment_request(
        &self,
        payment: &Payment,
        amount: Decimal,
        context: RequestContext<'_>,
    ) -> Result<PaymentRequest, MethodError> {
        let config = self.config.store_config(self.store);

        let mut options = RequestOptions::new(PaymentMethodKind::Cc);
        options.merchant_account = Some(config.merchant_account(self.store)?.to_string());
        options.recurring_type = config.recurring_type;
        options.enable_moto = config.cc.enable_moto;
        options.installments_enabled = config.installments.enabled;
        options.is_admin = context.is_admin;
        options.browser_info = context.browser_info;
        options.encrypted_card = self.encrypted_card().await;
        options.observer = context.observer;

        let request = PaymentRequest::create(payment, amount, options)?;
        debug!("payment request built");
        Ok(request)
    }
}
