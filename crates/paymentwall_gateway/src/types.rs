//! Domain model: gateway configuration, payment instruments, per-operation
//! parameter sets and the uniform payment outcome.

use gateway_common::errors::{ConnectorError, CustomResult};
use masking::Secret;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants;

/// Which of the processor's product verticals the account is configured for.
/// Decides the controller segment of hosted-widget URLs.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiType {
    /// In-game / virtual currency accounts
    VirtualCurrency,
    /// One-off digital goods
    #[default]
    DigitalGoods,
    /// Shopping-cart style accounts
    Cart,
}

impl ApiType {
    pub(crate) fn widget_controller(self) -> &'static str {
        match self {
            Self::VirtualCurrency => "ps",
            Self::DigitalGoods => "subscription",
            Self::Cart => "cart",
        }
    }
}

/// Version of the widget signature scheme the account is enrolled in.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SignVersion {
    /// Sorted-parameter MD5 signature
    #[default]
    Two,
    /// Sorted-parameter SHA-256 signature
    Three,
}

impl SignVersion {
    pub(crate) fn number(self) -> u8 {
        match self {
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

impl TryFrom<u8> for SignVersion {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            other => Err(format!("unsupported sign version: {other}")),
        }
    }
}

impl From<SignVersion> for u8 {
    fn from(value: SignVersion) -> Self {
        value.number()
    }
}

/// Credential profile for the merchant account.
///
/// A deployment uses exactly one of these: the library profile (public plus
/// private key, the Brick and Widget APIs) or the legacy REST profile (site
/// key plus site domain). The profiles are mutually exclusive by
/// construction.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Credentials {
    /// Brick / Widget key pair
    LibraryKeys {
        /// Project public key, sent with tokenization and widget calls
        public_key: Secret<String>,
        /// Project private key, used for signing and lifecycle calls
        private_key: Secret<String>,
    },
    /// Legacy REST profile, kept for accounts that predate the key pair
    SiteKeys {
        /// Legacy site key
        site_key: Secret<String>,
        /// Domain the site key is registered for
        site_domain: String,
    },
}

/// Everything a gateway instance needs to talk to the processor.
/// Immutable for the lifetime of the instance; every request variant gets a
/// copy injected at construction.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GatewayConfig {
    /// Product vertical of the account
    #[serde(default)]
    pub api_type: ApiType,
    /// Credential profile
    #[serde(flatten)]
    pub credentials: Credentials,
    /// Routes calls to the sandbox host and flags them for the test system
    #[serde(default)]
    pub test_mode: bool,
    /// Widget code (e.g. `p2_1`) for hosted-page purchases
    #[serde(default)]
    pub widget_key: Option<String>,
    /// Signature scheme for widget and listing calls
    #[serde(default)]
    pub sign_version: SignVersion,
}

impl GatewayConfig {
    /// Builds a library-profile configuration from a key pair.
    pub fn with_library_keys(
        api_type: ApiType,
        public_key: Secret<String>,
        private_key: Secret<String>,
    ) -> Self {
        Self {
            api_type,
            credentials: Credentials::LibraryKeys {
                public_key,
                private_key,
            },
            test_mode: false,
            widget_key: None,
            sign_version: SignVersion::default(),
        }
    }

    /// Builds a legacy REST-profile configuration.
    pub fn with_site_keys(site_key: Secret<String>, site_domain: String) -> Self {
        Self {
            api_type: ApiType::default(),
            credentials: Credentials::SiteKeys {
                site_key,
                site_domain,
            },
            test_mode: false,
            widget_key: None,
            sign_version: SignVersion::default(),
        }
    }

    pub(crate) fn public_key(&self) -> CustomResult<Secret<String>, ConnectorError> {
        match &self.credentials {
            Credentials::LibraryKeys { public_key, .. } => Ok(public_key.clone()),
            Credentials::SiteKeys { .. } => Err(ConnectorError::FailedToObtainAuthType.into()),
        }
    }

    pub(crate) fn private_key(&self) -> CustomResult<Secret<String>, ConnectorError> {
        match &self.credentials {
            Credentials::LibraryKeys { private_key, .. } => Ok(private_key.clone()),
            Credentials::SiteKeys { .. } => Err(ConnectorError::FailedToObtainAuthType.into()),
        }
    }

    pub(crate) fn base_url(&self) -> &'static str {
        if self.test_mode {
            constants::SANDBOX_BASE_URL
        } else {
            constants::LIVE_BASE_URL
        }
    }
}

/// A pre-validated payment card. Luhn and expiry checks happen upstream;
/// this type only carries the fields the processor accepts.
#[derive(Clone, Debug)]
pub struct PaymentCard {
    /// Primary account number
    pub number: Secret<String>,
    /// Two-digit expiry month
    pub exp_month: Secret<String>,
    /// Four-digit expiry year
    pub exp_year: Secret<String>,
    /// Card verification value
    pub cvv: Secret<String>,
    /// Cardholder first name
    pub first_name: Option<Secret<String>>,
    /// Cardholder last name
    pub last_name: Option<Secret<String>>,
    /// Cardholder email, used when the purchase itself carries none
    pub email: Option<String>,
    /// Billing postcode
    pub billing_postcode: Option<Secret<String>>,
    /// Billing country
    pub billing_country: Option<String>,
    /// Billing phone
    pub billing_phone: Option<Secret<String>>,
}

/// The one payment instrument a charge-producing request resolves to.
#[derive(Clone, Debug)]
pub enum PaymentInstrument {
    /// Raw card data, to be exchanged for a one-time token before charging
    Card(Box<PaymentCard>),
    /// A stored card token or a one-time token from a prior tokenize call
    StoredToken(Secret<String>),
}

/// Caller-supplied parameters for purchase and authorize operations.
///
/// `None` means "not set"; boolean flags are read through accessors so an
/// absent flag can take the operation's documented default while an explicit
/// `false` is honored.
#[derive(Clone, Debug, Default)]
pub struct PurchaseParams {
    /// Amount in major units, e.g. `"10.00"`
    pub amount: Option<String>,
    /// ISO 4217 currency code
    pub currency: Option<String>,
    /// Merchant-side end-user id, echoed back in pingbacks
    pub account_id: Option<String>,
    /// Product id, echoed back as `goodsid` in pingbacks
    pub package_id: Option<String>,
    /// Human-readable purchase description
    pub description: Option<String>,
    /// End-user email; falls back to the card's email when unset
    pub email: Option<String>,
    /// Client-side token encoding originating IP and domain; substitutes for
    /// `client_ip` plus `browser_domain`
    pub fingerprint: Option<String>,
    /// Originating IP, required when no fingerprint is given
    pub client_ip: Option<String>,
    /// Originating domain, required when no fingerprint is given
    pub browser_domain: Option<String>,
    /// Raw card data
    pub card: Option<PaymentCard>,
    /// Reusable card token from an earlier purchase
    pub card_reference: Option<Secret<String>>,
    /// One-time token from an earlier tokenize call
    pub token: Option<Secret<String>>,
    /// Settle immediately (purchase) or reserve only (authorize)
    pub capture: Option<bool>,
    /// Request 3-D Secure; absent means "use the account default"
    pub secure: Option<bool>,
    /// Free-form fraud-signal parameters, sent as `custom[k]`
    pub custom_parameters: std::collections::BTreeMap<String, String>,
    /// Customer profile fraud signals, sent as `customer[k]`
    pub customer_data: std::collections::BTreeMap<String, String>,
    /// Account-history fraud signals, sent as `history[k]`
    pub history_data: std::collections::BTreeMap<String, String>,
    /// Where the hosted flow sends the user after success
    pub return_url: Option<String>,
    /// Pingback listener override
    pub notify_url: Option<String>,
}

impl PurchaseParams {
    /// Email from the parameters, falling back to the card instrument.
    pub fn resolved_email(&self) -> Option<String> {
        self.email
            .clone()
            .or_else(|| self.card.as_ref().and_then(|card| card.email.clone()))
    }

    /// Resolves the payment instrument: an explicit card reference wins over
    /// a one-time token, which wins over raw card data.
    pub fn instrument(&self) -> Option<PaymentInstrument> {
        if let Some(reference) = &self.card_reference {
            return Some(PaymentInstrument::StoredToken(reference.clone()));
        }
        if let Some(token) = &self.token {
            return Some(PaymentInstrument::StoredToken(token.clone()));
        }
        self.card
            .clone()
            .map(|card| PaymentInstrument::Card(Box::new(card)))
    }

    pub(crate) fn capture_or(&self, default: bool) -> bool {
        self.capture.unwrap_or(default)
    }
}

/// Parameters for operations addressing an existing charge.
#[derive(Clone, Debug, Default)]
pub struct ReferenceParams {
    /// The processor's charge id (`sale_id`)
    pub transaction_reference: Option<String>,
}

/// Parameters for a hosted-widget purchase.
#[derive(Clone, Debug, Default)]
pub struct WidgetPurchaseParams {
    /// End-user email
    pub email: Option<String>,
    /// Originating IP
    pub client_ip: Option<String>,
    /// Originating domain
    pub browser_domain: Option<String>,
    /// Merchant-side end-user id
    pub account_id: Option<String>,
    /// Widget code; falls back to the gateway configuration
    pub widget_key: Option<String>,
    /// Product id of the single fixed-price line item
    pub package_id: Option<String>,
    /// Amount in major units
    pub amount: Option<String>,
    /// ISO 4217 currency code
    pub currency: Option<String>,
    /// Line-item display name
    pub description: Option<String>,
    /// End-user country, forwarded to the hosted page
    pub country_code: Option<String>,
    /// Where the hosted page sends the user after payment
    pub return_url: Option<String>,
    /// Pingback listener override
    pub notify_url: Option<String>,
}

/// Parameters for the local payment-methods listing.
#[derive(Clone, Debug, Default)]
pub struct PaymentListParams {
    /// Two-letter country code the listing is filtered by
    pub country_code: Option<String>,
}

/// The uniform result every payment operation resolves to, regardless of
/// which of the processor's response shapes produced it.
#[derive(Clone, Debug, Default)]
pub struct PaymentOutcome {
    /// Whether the processor accepted the operation
    pub successful: bool,
    /// The charge id, when one is known
    pub transaction_reference: Option<String>,
    /// Reusable card token minted alongside the charge
    pub card_reference: Option<String>,
    /// Processor message, set on declines and errors
    pub message: Option<String>,
    /// Processor error code or HTTP-like status
    pub code: Option<i64>,
    /// Funds were settled, not merely reserved
    pub captured: bool,
    /// The charge is held for manual risk review
    pub under_review: bool,
    /// Hosted-page URL for redirect flows
    pub redirect_url: Option<Url>,
}

impl PaymentOutcome {
    /// True for widget flows: the caller must redirect the user rather than
    /// inspect a transaction reference.
    pub fn is_redirect(&self) -> bool {
        self.redirect_url.is_some()
    }

    pub(crate) fn declined(message: Option<String>, code: Option<i64>) -> Self {
        Self {
            successful: false,
            message,
            code,
            ..Self::default()
        }
    }

    pub(crate) fn transport_failure(message: String) -> Self {
        Self {
            successful: false,
            message: Some(message),
            code: Some(constants::COMMUNICATION_ERROR_CODE),
            ..Self::default()
        }
    }

    pub(crate) fn redirect(url: Url) -> Self {
        Self {
            successful: true,
            redirect_url: Some(url),
            ..Self::default()
        }
    }
}

/// One entry of the local payment-methods listing.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PaymentSystem {
    /// Processor identifier of the payment method
    pub id: Option<String>,
    /// Display name
    pub name: Option<String>,
}

/// Result of the payment-methods listing, mirroring the uniform
/// success/message/code contract of [`PaymentOutcome`].
#[derive(Clone, Debug, Default)]
pub struct PaymentSystemsOutcome {
    /// Whether the listing call succeeded
    pub successful: bool,
    /// The available payment methods
    pub systems: Vec<PaymentSystem>,
    /// Processor or transport message on failure
    pub message: Option<String>,
    /// Error code on failure
    pub code: Option<i64>,
}
