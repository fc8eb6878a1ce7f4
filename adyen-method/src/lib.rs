//! # Adyen Method
//!
//! The credit card payment method as the checkout sees it.
//!
//! ## Architecture
//!
//! - `cc` - `CcMethod`: form data, 3-D Secure redirect, availability
//! - `installments` - Installment options from the configured rules
//! - `error` - `MethodError`
//!
//! `CcMethod` is generic over `C: ConfigProvider` and `S: SessionStore`,
//! so the host injects its own configuration and checkout session.

pub mod cc;
pub mod error;
pub mod installments;


pub use cc::{Assigned, CcFormData, CcMethod, RequestContext};
pub use error::MethodError;
pub use installments::InstallmentOption;
