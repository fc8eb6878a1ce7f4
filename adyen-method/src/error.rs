//! Payment method errors.

use adyen_types::{ConfigError, DomainError};

#[derive(Debug, thiserror::Error)]
pub enum MethodError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
