//! Store-scoped configuration port.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::{RecurringType, StoreId};
use crate::error::ConfigError;

/// Credit-card method settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CcConfig {
    pub active: bool,
    /// Enabled card variants; `None` enables all known types.
    pub cctypes: Option<Vec<String>>,
    pub disable_zero_total: bool,
    pub enable_moto: bool,
    /// Billing countries the method may be used for; `None` allows all.
    pub allowed_countries: Option<Vec<String>>,
}

impl Default for CcConfig {
    fn default() -> Self {
        Self {
            active: true,
            cctypes: None,
            disable_zero_total: false,
            enable_moto: false,
            allowed_countries: None,
        }
    }
}

/// One row of the installments table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentRule {
    /// Card variant the rule applies to, or `all`.
    pub cc_type: String,
    /// Smallest order total the rule applies from.
    pub minimum_amount: Decimal,
    pub max_installments: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallmentsConfig {
    pub enabled: bool,
    pub rules: Vec<InstallmentRule>,
}

/// Cloud terminal (point of sale) settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosConfig {
    pub api_key: Option<String>,
    pub merchant_account: Option<String>,
    pub timeout_secs: Option<u64>,
    pub store_code: Option<String>,
}

/// Everything the integration reads from the host configuration for one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub merchant_account: Option<String>,
    /// Use Adyen's test platform.
    pub demo_mode: bool,
    pub ws_username: Option<String>,
    pub ws_password: Option<String>,
    /// Checkout API key.
    pub api_key: Option<String>,
    pub live_endpoint_url_prefix: Option<String>,
    /// Web base URL of the store front, e.g. `https://shop.example.com/`.
    pub base_url: Option<String>,
    pub recurring_type: Option<RecurringType>,
    pub cc: CcConfig,
    pub installments: InstallmentsConfig,
    pub pos: PosConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            merchant_account: None,
            demo_mode: true,
            ws_username: None,
            ws_password: None,
            api_key: None,
            live_endpoint_url_prefix: None,
            base_url: None,
            recurring_type: None,
            cc: CcConfig::default(),
            installments: InstallmentsConfig::default(),
            pos: PosConfig::default(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl StoreConfig {
    pub fn merchant_account(&self, store: StoreId) -> Result<&str, ConfigError> {
        non_empty(&self.merchant_account).ok_or(ConfigError::MissingSetting {
            setting: "merchant_account",
            store,
        })
    }

    /// Web-service user credentials for basic auth.
    pub fn ws_credentials(&self, store: StoreId) -> Result<(&str, &str), ConfigError> {
        let username = non_empty(&self.ws_username).ok_or(ConfigError::MissingSetting {
            setting: "ws_username",
            store,
        })?;
        let password = self.ws_password.as_deref().unwrap_or_default();
        Ok((username, password))
    }

    pub fn checkout_api_key(&self) -> Option<&str> {
        non_empty(&self.api_key)
    }

    pub fn live_endpoint_url_prefix(&self, store: StoreId) -> Result<&str, ConfigError> {
        non_empty(&self.live_endpoint_url_prefix).ok_or(ConfigError::MissingSetting {
            setting: "live_endpoint_url_prefix",
            store,
        })
    }

    pub fn base_url(&self, store: StoreId) -> Result<&str, ConfigError> {
        non_empty(&self.base_url).ok_or(ConfigError::MissingSetting {
            setting: "base_url",
            store,
        })
    }

    pub fn pos_api_key(&self) -> Option<&str> {
        non_empty(&self.pos.api_key)
    }

    /// POS merchant account, falling back to the main merchant account.
    pub fn pos_merchant_account(&self, store: StoreId) -> Result<&str, ConfigError> {
        match non_empty(&self.pos.merchant_account) {
            Some(account) => Ok(account),
            None => self.merchant_account(store),
        }
    }

    pub fn pos_store_code(&self) -> Option<&str> {
        non_empty(&self.pos.store_code)
    }
}

/// Port for reading store configuration.
pub trait ConfigProvider: Send + Sync {
    /// Returns the effective configuration for `store`.
    fn store_config(&self, store: StoreId) -> StoreConfig;
}

/// Fixed configuration with optional per-store overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    pub default: StoreConfig,
    pub stores: HashMap<StoreId, StoreConfig>,
}

impl StaticConfig {
    pub fn new(default: StoreConfig) -> Self {
        Self {
            default,
            stores: HashMap::new(),
        }
    }

    pub fn with_store(mut self, store: StoreId, config: StoreConfig) -> Self {
        self.stores.insert(store, config);
        self
    }
}

impl ConfigProvider for StaticConfig {
    fn store_config(&self, store: StoreId) -> StoreConfig {
        self.stores
            .get(&store)
            .unwrap_or(&self.default)
            .clone()
    }
}

impl<T: ConfigProvider + ?Sized> ConfigProvider for std::sync::Arc<T> {
    fn store_config(&self, store: StoreId) -> StoreConfig {
        (**self).store_config(store)
    }
}
