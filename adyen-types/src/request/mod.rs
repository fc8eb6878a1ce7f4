//! Request DTOs sent to Adyen.

mod payment_request;


pub use payment_request::{
    AdyenAddress, ApplicationInfo, BankAccount, BrowserInfo, Card, EncryptedCardData,
    Installments, LibraryInfo, PaymentRequest, PaymentRequestObserver, Recurring,
    RequestOptions, ShopperInteraction, ShopperName,
};
