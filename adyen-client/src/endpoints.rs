//! Adyen endpoint URLs.

use adyen_types::{StoreConfig, StoreId};

use crate::ApiError;

const PREFIX_PLACEHOLDER: &str = "{prefix}";

/// URLs the client talks to, split by test and live platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub pal_test: String,
    pub pal_live: String,
    pub terminal_cloud_test: String,
    pub terminal_cloud_live: String,
    pub connected_terminals_test: String,
    pub connected_terminals_live: String,
    pub checkout_test: String,
    /// Live checkout base; `{prefix}` is replaced by the merchant's
    /// live endpoint URL prefix.
    pub checkout_live: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            pal_test: "https://pal-test.adyen.com/pal/adapter/httppost".into(),
            pal_live: "https://pal-live.adyen.com/pal/adapter/httppost".into(),
            terminal_cloud_test: "https://terminal-api-test.adyen.com/sync".into(),
            terminal_cloud_live: "https://terminal-api-live.adyen.com/sync".into(),
            connected_terminals_test: "https://terminal-api-test.adyen.com/connectedTerminals"
                .into(),
            connected_terminals_live: "https://terminal-api-live.adyen.com/connectedTerminals"
                .into(),
            checkout_test: "https://checkout-test.adyen.com".into(),
            checkout_live: "https://{prefix}-checkout-live.adyenpayments.com/checkout".into(),
        }
    }
}

impl Endpoints {
    /// Points every endpoint, test and live, at one base URL.
    pub fn uniform(base_url: impl Into<String>) -> Self {
        let base = base_url.into().trim_end_matches('/').to_string();
        Self {
            pal_test: format!("{base}/pal/adapter/httppost"),
            pal_live: format!("{base}/pal/adapter/httppost"),
            terminal_cloud_test: format!("{base}/sync"),
            terminal_cloud_live: format!("{base}/sync"),
            connected_terminals_test: format!("{base}/connectedTerminals"),
            connected_terminals_live: format!("{base}/connectedTerminals"),
            checkout_test: base.clone(),
            checkout_live: format!("{}/{}/checkout", base, PREFIX_PLACEHOLDER),
        }
    }

    pub fn pal(&self, demo_mode: bool) -> &str {
        if demo_mode { &self.pal_test } else { &self.pal_live }
    }

    pub fn terminal_cloud(&self, demo_mode: bool) -> &str {
        if demo_mode {
            &self.terminal_cloud_test
        } else {
            &self.terminal_cloud_live
        }
    }

    pub fn connected_terminals(&self, demo_mode: bool) -> &str {
        if demo_mode {
            &self.connected_terminals_test
        } else {
            &self.connected_terminals_live
        }
    }

    /// Origin key endpoint for the store's platform.
    pub fn origin_keys(&self, config: &StoreConfig, store: StoreId) -> Result<String, ApiError> {
        let base = if config.demo_mode {
            self.checkout_test.clone()
        } else {
            let prefix = config.live_endpoint_url_prefix(store)?;
            self.checkout_live.replace(PREFIX_PLACEHOLDER, prefix)
        };
        Ok(format!("{base}/v1/originKeys"))
    }
}
