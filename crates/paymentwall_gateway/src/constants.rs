pub(crate) mod headers {
    pub(crate) const ACCEPT: &str = "Accept";
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
    pub(crate) const USER_AGENT: &str = "User-Agent";
    /// Any truthy value routes the call to the processor's test system.
    pub(crate) const DEV_FLAG: &str = "dev-flag";
    /// Carries the private key on charge-lifecycle calls.
    pub(crate) const X_API_KEY: &str = "X-ApiKey";
}

/// Production API host.
pub(crate) const LIVE_BASE_URL: &str = "https://www.paymentwall.com/api";

/// Sandbox API host, selected by `test_mode`.
pub(crate) const SANDBOX_BASE_URL: &str = "https://dev.paymentwall.com/api";

/// Host the hosted-widget redirect URLs point at.
pub(crate) const WIDGET_BASE_URL: &str = "https://api.paymentwall.com/api";

pub(crate) const TOKEN_PATH: &str = "token";
pub(crate) const CHARGE_PATH: &str = "charge";
pub(crate) const PAYMENT_SYSTEMS_PATH: &str = "payment-systems";

pub(crate) const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Processor error code for a refund of a charge that is already cancelled.
/// Remapped to a successful void so cancels stay idempotent.
pub(crate) const ALREADY_CANCELLED_CODE: i64 = 3201;

/// Error code the historical integration attached to transport failures.
pub(crate) const COMMUNICATION_ERROR_CODE: i64 = 231;

/// Widget product type for a one-off, fixed-price line item.
pub(crate) const PRODUCT_TYPE_FIXED: &str = "fixed";
