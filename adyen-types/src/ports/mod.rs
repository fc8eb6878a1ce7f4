//! Port traits (interfaces for adapters).
//!
//! The host runtime implements these; this workspace ships in-memory
//! adapters in `adyen-store`.

mod cache;
mod config;
mod session;

pub use cache::Cache;
pub use config::{
    CcConfig, ConfigProvider, InstallmentRule, InstallmentsConfig, PosConfig, StaticConfig,
    StoreConfig,
};
pub use session::SessionStore;
