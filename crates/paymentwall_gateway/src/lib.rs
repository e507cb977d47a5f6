//! Paymentwall payment gateway connector.
//!
//! Translates a uniform purchase / authorize / capture / void / refund /
//! status request model into the processor's wire formats and folds its
//! heterogeneous response shapes back into one result contract. Two API
//! families are covered: the direct-charge (Brick) API, where the server
//! charges a card or stored token, and the hosted Widget API, where the user
//! is redirected to a processor-operated payment page.
//!
//! The HTTP transport is injected through
//! [`gateway_common::api::HttpClient`]; the connector performs no connection
//! management, retries or timeouts of its own.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use masking::Secret;
//! use paymentwall_gateway::{
//!     ApiType, Gateway, GatewayConfig, PurchaseParams,
//! };
//!
//! # fn transport() -> Arc<dyn gateway_common::api::HttpClient> { unimplemented!() }
//! let config = GatewayConfig::with_library_keys(
//!     ApiType::DigitalGoods,
//!     Secret::new("YOUR_PUBLIC_KEY".to_string()),
//!     Secret::new("YOUR_PRIVATE_KEY".to_string()),
//! );
//! let gateway = Gateway::new(config, transport());
//!
//! let outcome = gateway
//!     .purchase(PurchaseParams {
//!         amount: Some("10.00".to_string()),
//!         currency: Some("AUD".to_string()),
//!         account_id: Some("12341234".to_string()),
//!         description: Some("Super Deluxe Excellent Discount Package".to_string()),
//!         fingerprint: Some("brick-js-fingerprint".to_string()),
//!         card_reference: Some(Secret::new("token_asdf1234asdf1234".to_string())),
//!         email: Some("customer@example.com".to_string()),
//!         ..PurchaseParams::default()
//!     })
//!     .send()?;
//! if outcome.successful {
//!     println!("sale id: {:?}", outcome.transaction_reference);
//! }
//! # Ok::<_, error_stack::Report<gateway_common::errors::ConnectorError>>(())
//! ```

pub mod brick;
mod constants;
pub mod gateway;
mod signature;
pub mod types;
mod utils;
pub mod widget;

pub use gateway::{
    AuthorizeRequest, CaptureRequest, Gateway, PurchaseRequest, PurchaseStatusRequest,
    RefundRequest, VoidRequest, WidgetPaymentListRequest, WidgetPurchaseRequest,
};
pub use types::{
    ApiType, Credentials, GatewayConfig, PaymentCard, PaymentInstrument, PaymentListParams,
    PaymentOutcome, PaymentSystem, PaymentSystemsOutcome, PurchaseParams, ReferenceParams,
    SignVersion, WidgetPurchaseParams,
};
