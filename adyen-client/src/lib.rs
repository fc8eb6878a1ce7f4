//! # Adyen Client
//!
//! Typed async client for the Adyen endpoints the integration uses: the
//! legacy name/value adapter (recurring details), checkout (origin keys)
//! and the cloud terminal API.

mod endpoints;
mod listing;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use adyen_types::{
    Cache, ConfigError, ConfigProvider, RecurringContract, RecurringContracts, RecurringType,
    StoreConfig, StoreId,
};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

pub use endpoints::Endpoints;

/// How long a fetched origin key stays cached.
pub const ORIGIN_KEY_TTL: Duration = Duration::from_secs(60 * 60 * 24);

const DISABLE_SUCCESS: &str = "disableResult.response=[detail-successfully-disabled]";

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP Status code {status} received, data {body}")]
    Status { status: u16, body: String },

    #[error("Received Status code {status}, please make sure your Checkout API key is correct.")]
    Unauthorized { status: u16 },

    #[error("{0}")]
    Rejected(String),

    #[error(
        "Error retrieving the Billing Agreement for shopperReference {shopper_reference} with recurringType #{recurring_type} Error: {source}"
    )]
    BillingAgreement {
        shopper_reference: String,
        recurring_type: RecurringType,
        source: Box<ApiError>,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Terminals reachable through the cloud terminal API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedTerminals {
    #[serde(default)]
    pub unique_terminal_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OriginKeysResponse {
    #[serde(default)]
    origin_keys: HashMap<String, String>,
}

/// Adyen API client.
pub struct AdyenApi {
    config: Arc<dyn ConfigProvider>,
    cache: Arc<dyn Cache>,
    endpoints: Endpoints,
    http: Client,
}

impl AdyenApi {
    /// Creates a client against Adyen's public endpoints.
    pub fn new(config: Arc<dyn ConfigProvider>, cache: Arc<dyn Cache>) -> Self {
        Self {
            config,
            cache,
            endpoints: Endpoints::default(),
            http: Client::new(),
        }
    }

    /// Overrides the endpoint URLs.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Recurring contracts
    // ─────────────────────────────────────────────────────────────────────────────

    /// Finds one stored detail of a shopper.
    pub async fn get_recurring_contract_detail(
        &self,
        shopper_reference: &str,
        recurring_detail_reference: &str,
        store: StoreId,
    ) -> Result<Option<RecurringContract>, ApiError> {
        let contracts = self.list_recurring_contracts(shopper_reference, store).await?;
        Ok(contracts.find(recurring_detail_reference).cloned())
    }

    /// Lists all stored details of a shopper, merging the ONECLICK and
    /// RECURRING listings.
    #[instrument(skip(self))]
    pub async fn list_recurring_contracts(
        &self,
        shopper_reference: &str,
        store: StoreId,
    ) -> Result<RecurringContracts, ApiError> {
        let mut contracts = RecurringContracts::new();
        for recurring_type in RecurringType::LISTABLE {
            let listing = self
                .list_recurring_contract_by_type(shopper_reference, store, recurring_type)
                .await
                .map_err(|e| ApiError::BillingAgreement {
                    shopper_reference: shopper_reference.to_string(),
                    recurring_type,
                    source: Box::new(e),
                })?;
            contracts.absorb(listing);
        }
        debug!(count = contracts.len(), "listed recurring contracts");
        Ok(contracts)
    }

    /// Lists the stored details of one contract type.
    pub async fn list_recurring_contract_by_type(
        &self,
        shopper_reference: &str,
        store: StoreId,
        recurring_type: RecurringType,
    ) -> Result<Vec<RecurringContract>, ApiError> {
        let config = self.config.store_config(store);
        let merchant_account = config.merchant_account(store)?;
        let form = [
            ("action", "Recurring.listRecurringDetails"),
            ("recurringDetailsRequest.merchantAccount", merchant_account),
            ("recurringDetailsRequest.shopperReference", shopper_reference),
            (
                "recurringDetailsRequest.recurring.contract",
                recurring_type.as_str(),
            ),
        ];

        let body = self.send_form(&config, &form, store).await?;
        Ok(listing::parse_recurring_details(&body, recurring_type))
    }

    /// Disables a stored detail.
    #[instrument(skip(self))]
    pub async fn disable_recurring_contract(
        &self,
        recurring_detail_reference: &str,
        shopper_reference: &str,
        store: StoreId,
    ) -> Result<(), ApiError> {
        let config = self.config.store_config(store);
        let merchant_account = config.merchant_account(store)?;
        let form = [
            ("action", "Recurring.disable"),
            ("disableRequest.merchantAccount", merchant_account),
            ("disableRequest.shopperReference", shopper_reference),
            (
                "disableRequest.recurringDetailReference",
                recurring_detail_reference,
            ),
        ];

        let body = self.send_form(&config, &form, store).await?;
        let result = listing::decode_body(&body);
        if result != DISABLE_SUCCESS {
            warn!(%result, "disable rejected");
            return Err(ApiError::Rejected(result));
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Checkout
    // ─────────────────────────────────────────────────────────────────────────────

    /// Returns the origin key for the store front's domain.
    ///
    /// Keys are cached per store for [`ORIGIN_KEY_TTL`]. Failures are logged
    /// and yield an empty string so the payment form can still render.
    #[instrument(skip(self))]
    pub async fn origin_keys(&self, store: StoreId) -> String {
        match self.fetch_origin_key(store).await {
            Ok(key) => key.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "origin key unavailable");
                String::new()
            }
        }
    }

    async fn fetch_origin_key(&self, store: StoreId) -> Result<Option<String>, ApiError> {
        let cache_id = format!("adyen_origin_keys_{store}");
        if let Some(key) = self.cache.load(&cache_id).await {
            return Ok(Some(key));
        }

        let config = self.config.store_config(store);
        let domain = origin_domain(config.base_url(store)?)?;
        let url = self.endpoints.origin_keys(&config, store)?;
        let request = json!({ "originDomains": [domain] });

        let body = self
            .do_request_json(&request, &url, config.checkout_api_key(), store, None)
            .await?;
        let response: OriginKeysResponse = serde_json::from_str(&body)?;

        let key = response
            .origin_keys
            .get(&domain)
            .filter(|k| !k.is_empty())
            .cloned();
        if let Some(key) = &key {
            self.cache.save(&cache_id, key, ORIGIN_KEY_TTL).await;
        }
        Ok(key)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Cloud terminals
    // ─────────────────────────────────────────────────────────────────────────────

    /// Sends a terminal API request and waits for the terminal's answer.
    #[instrument(skip(self, request))]
    pub async fn do_request_sync(&self, request: &Value, store: StoreId) -> Result<Value, ApiError> {
        let config = self.config.store_config(store);
        let url = self.endpoints.terminal_cloud(config.demo_mode);
        let timeout = config.pos.timeout_secs.map(Duration::from_secs);
        let body = self
            .do_request_json(request, url, config.pos_api_key(), store, timeout)
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Lists the terminals connected to the merchant account, restricted to
    /// the configured POS store when one is set.
    #[instrument(skip(self))]
    pub async fn retrieve_connected_terminals(
        &self,
        store: StoreId,
    ) -> Result<ConnectedTerminals, ApiError> {
        let config = self.config.store_config(store);
        let url = self.endpoints.connected_terminals(config.demo_mode);

        let mut request = json!({ "merchantAccount": config.pos_merchant_account(store)? });
        if let Some(store_code) = config.pos_store_code() {
            request["store"] = Value::from(store_code);
        }

        let body = self
            .do_request_json(&request, url, config.pos_api_key(), store, None)
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Transport
    // ─────────────────────────────────────────────────────────────────────────────

    /// Posts a name/value request to the legacy adapter with web-service
    /// credentials and returns the raw response body.
    pub async fn do_request(
        &self,
        form: &[(&str, &str)],
        store: StoreId,
    ) -> Result<String, ApiError> {
        let config = self.config.store_config(store);
        self.send_form(&config, form, store).await
    }

    async fn send_form(
        &self,
        config: &StoreConfig,
        form: &[(&str, &str)],
        store: StoreId,
    ) -> Result<String, ApiError> {
        let url = self.endpoints.pal(config.demo_mode);
        let (username, password) = config.ws_credentials(store)?;
        debug!(target: "adyen_api", %url, request = ?form, "legacy request");

        let req = self
            .http
            .post(url)
            .basic_auth(username, Some(password))
            .form(form);
        let (status, body) = send(req).await?;

        if status != StatusCode::OK {
            warn!(target: "adyen_api", status = status.as_u16(), "legacy request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    /// Posts a JSON request. Uses `x-api-key` when a key is given and
    /// falls back to web-service credentials otherwise.
    pub async fn do_request_json(
        &self,
        request: &Value,
        url: &str,
        api_key: Option<&str>,
        store: StoreId,
        timeout: Option<Duration>,
    ) -> Result<String, ApiError> {
        debug!(target: "adyen_api", %url, %request, "json request");

        let mut req = self.http.post(url).json(request);
        match api_key.filter(|k| !k.is_empty()) {
            Some(key) => req = req.header("x-api-key", key),
            None => {
                let config = self.config.store_config(store);
                let (username, password) = config.ws_credentials(store)?;
                req = req.basic_auth(username, Some(password));
            }
        }
        if let Some(timeout) = timeout.filter(|t| !t.is_zero()) {
            req = req.timeout(timeout);
        }

        let (status, body) = send(req).await?;
        match status {
            StatusCode::OK => Ok(body),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!(target: "adyen_api", status = status.as_u16(), "api key rejected");
                Err(ApiError::Unauthorized {
                    status: status.as_u16(),
                })
            }
            _ => {
                warn!(target: "adyen_api", status = status.as_u16(), "json request failed");
                Err(ApiError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}

async fn send(req: RequestBuilder) -> Result<(StatusCode, String), ApiError> {
    let resp = req.send().await?;
    let status = resp.status();
    let body = resp.text().await?;
    Ok((status, body))
}

/// Scheme and host of a store front URL, e.g. `https://shop.example.com`.
fn origin_domain(base_url: &str) -> Result<String, ApiError> {
    let url = url::Url::parse(base_url)?;
    let host = url.host_str().ok_or(url::ParseError::EmptyHost)?;
    Ok(format!("{}://{}", url.scheme(), host))
}
