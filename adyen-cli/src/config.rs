//! Configuration loading from a JSON file or the environment.

use std::env;
use std::path::Path;

use adyen_types::{PosConfig, RecurringType, StaticConfig, StoreConfig};
use anyhow::Context;

/// Loads store configuration from `path` when given, else from `ADYEN_*`
/// environment variables.
pub fn load(path: Option<&Path>) -> anyhow::Result<StaticConfig> {
    match path {
        Some(path) => from_file(path),
        None => Ok(StaticConfig::new(from_lookup(|name| env::var(name).ok())?)),
    }
}

fn from_file(path: &Path) -> anyhow::Result<StaticConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

/// Builds the default store's configuration from variables resolved by
/// `get`. Blank values count as unset.
pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<StoreConfig> {
    let var = |name: &str| get(name).filter(|v| !v.trim().is_empty());

    let demo_mode = match var("ADYEN_DEMO_MODE") {
        Some(v) => parse_bool(&v).with_context(|| format!("ADYEN_DEMO_MODE={v}"))?,
        None => true,
    };
    let recurring_type = var("ADYEN_RECURRING_TYPE")
        .map(|v| v.parse::<RecurringType>())
        .transpose()?;
    let timeout_secs = var("ADYEN_POS_TIMEOUT")
        .map(|v| v.parse::<u64>().with_context(|| format!("ADYEN_POS_TIMEOUT={v}")))
        .transpose()?;

    Ok(StoreConfig {
        merchant_account: var("ADYEN_MERCHANT_ACCOUNT"),
        demo_mode,
        ws_username: var("ADYEN_WS_USERNAME"),
        ws_password: var("ADYEN_WS_PASSWORD"),
        api_key: var("ADYEN_API_KEY"),
        live_endpoint_url_prefix: var("ADYEN_LIVE_ENDPOINT_URL_PREFIX"),
        base_url: var("ADYEN_BASE_URL"),
        recurring_type,
        pos: PosConfig {
            api_key: var("ADYEN_POS_API_KEY"),
            merchant_account: var("ADYEN_POS_MERCHANT_ACCOUNT"),
            timeout_secs,
            store_code: var("ADYEN_POS_STORE_CODE"),
        },
        ..Default::default()
    })
}

fn parse_bool(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => anyhow::bail!("expected a boolean, got `{other}`"),
    }
}
