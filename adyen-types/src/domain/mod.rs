//! Domain models for the Adyen integration.

pub mod method;
pub mod money;
pub mod order;
pub mod payment;
pub mod recurring;
pub mod store;

pub use method::{
    CC_METHOD_CODE, CcType, PaymentMethodKind, SEPA_METHOD_CODE, cc_types, map_variant_to_method,
};
pub use money::{Amount, Currency, format_amount};
pub use order::{Address, Customer, GUEST_ID, Order};
pub use payment::{BoletoData, Payment, PaymentInfo};
pub use recurring::{RecurringContract, RecurringContracts, RecurringType};
pub use store::StoreId;
