//! Wire types for the direct-charge (Brick) API: outbound form payloads and
//! the processor's several response shapes, normalized into
//! [`PaymentOutcome`].

use std::collections::BTreeMap;
use std::fmt;

use error_stack::{Report, ResultExt};
use gateway_common::errors::{ConnectorError, CustomResult};
use masking::{PeekInterface, Secret};
use serde::{Deserialize, Serialize};

use crate::{
    types::{GatewayConfig, PaymentCard, PaymentInstrument, PaymentOutcome, PurchaseParams},
    utils,
};

/// Form body that exchanges raw card data for a one-time token. Only ever
/// built while no token is resolved; the card fields ride in the processor's
/// bracketed key style.
#[derive(Debug, Serialize)]
pub struct BrickTokenRequest {
    public_key: Secret<String>,
    #[serde(rename = "card[number]")]
    number: Secret<String>,
    #[serde(rename = "card[exp_month]")]
    exp_month: Secret<String>,
    #[serde(rename = "card[exp_year]")]
    exp_year: Secret<String>,
    #[serde(rename = "card[cvv]")]
    cvv: Secret<String>,
}

impl TryFrom<(&GatewayConfig, &PaymentCard)> for BrickTokenRequest {
    type Error = Report<ConnectorError>;

    fn try_from((config, card): (&GatewayConfig, &PaymentCard)) -> Result<Self, Self::Error> {
        Ok(Self {
            public_key: config.public_key()?,
            number: card.number.clone(),
            exp_month: card.exp_month.clone(),
            exp_year: card.exp_year.clone(),
            cvv: card.cvv.clone(),
        })
    }
}

impl BrickTokenRequest {
    pub(crate) fn form_body(&self) -> CustomResult<String, ConnectorError> {
        serde_urlencoded::to_string(self).change_context(ConnectorError::RequestEncodingFailed)
    }
}

/// The `purchase` sub-map of a charge-create call.
#[derive(Debug, Serialize)]
pub struct BrickChargeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) token: Option<Secret<String>>,
    email: String,
    uid: String,
    amount: String,
    currency: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fingerprint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    browser_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    browser_domain: Option<String>,
    #[serde(rename = "customer[firstname]", skip_serializing_if = "Option::is_none")]
    customer_firstname: Option<Secret<String>>,
    #[serde(rename = "customer[lastname]", skip_serializing_if = "Option::is_none")]
    customer_lastname: Option<Secret<String>>,
    #[serde(rename = "customer[zip]", skip_serializing_if = "Option::is_none")]
    customer_zip: Option<Secret<String>>,
    capture: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    secure: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    success_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pingback_url: Option<String>,
    /// Bracketed fraud-signal parameters: `custom[..]`, `customer[..]`,
    /// `history[..]`. Flattened so empty maps contribute nothing.
    #[serde(flatten)]
    extra: BTreeMap<String, String>,
}

impl BrickChargeRequest {
    pub(crate) fn form_body(&self) -> CustomResult<String, ConnectorError> {
        serde_urlencoded::to_string(self).change_context(ConnectorError::RequestEncodingFailed)
    }
}

/// Caller parameters plus the operation's capture default, as handed to the
/// payload builder.
#[derive(Debug)]
pub struct PurchaseContext<'a> {
    pub(crate) config: &'a GatewayConfig,
    pub(crate) params: &'a PurchaseParams,
    pub(crate) capture_default: bool,
}

/// The assembled outbound structure of a purchase: the `purchase` sub-map
/// and, only while no token is resolved yet, the `card` sub-map used to mint
/// one. By construction the two never coexist with a resolved token.
#[derive(Debug)]
pub struct ChargePayload {
    pub purchase: BrickChargeRequest,
    pub card: Option<BrickTokenRequest>,
}

impl TryFrom<PurchaseContext<'_>> for ChargePayload {
    type Error = Report<ConnectorError>;

    fn try_from(context: PurchaseContext<'_>) -> Result<Self, Self::Error> {
        let params = context.params;

        utils::require_fields(&[
            ("amount", utils::is_set(params.amount.as_ref())),
            ("currency", utils::is_set(params.currency.as_ref())),
            ("accountId", utils::is_set(params.account_id.as_ref())),
            ("description", utils::is_set(params.description.as_ref())),
        ])?;

        // Site verification: a fingerprint carries both values, otherwise
        // the explicit pair is required.
        if !utils::is_set(params.fingerprint.as_ref()) {
            utils::require_fields(&[
                ("clientIp", utils::is_set(params.client_ip.as_ref())),
                ("browserDomain", utils::is_set(params.browser_domain.as_ref())),
            ])?;
        }

        let email = params
            .resolved_email()
            .filter(|email| !email.is_empty())
            .ok_or_else(utils::missing_field_err("email"))?;

        let (token, card) = match params
            .instrument()
            .ok_or_else(utils::missing_field_err("card"))?
        {
            PaymentInstrument::StoredToken(token) => (Some(token), None),
            PaymentInstrument::Card(card) => (
                None,
                Some(BrickTokenRequest::try_from((context.config, card.as_ref()))?),
            ),
        };

        let mut extra = BTreeMap::new();
        for (key, value) in &params.custom_parameters {
            extra.insert(format!("custom[{key}]"), value.clone());
        }
        for (key, value) in &params.customer_data {
            extra.insert(format!("customer[{key}]"), value.clone());
        }
        for (key, value) in &params.history_data {
            extra.insert(format!("history[{key}]"), value.clone());
        }

        let purchase = BrickChargeRequest {
            token,
            email,
            uid: params.account_id.clone().unwrap_or_default(),
            amount: params.amount.clone().unwrap_or_default(),
            currency: params.currency.clone().unwrap_or_default(),
            description: params.description.clone().unwrap_or_default(),
            plan: params.package_id.clone(),
            fingerprint: params.fingerprint.clone(),
            browser_ip: params.client_ip.clone(),
            browser_domain: params.browser_domain.clone(),
            customer_firstname: params
                .card
                .as_ref()
                .and_then(|card| card.first_name.clone()),
            customer_lastname: params.card.as_ref().and_then(|card| card.last_name.clone()),
            customer_zip: params
                .card
                .as_ref()
                .and_then(|card| card.billing_postcode.clone()),
            capture: u8::from(params.capture_or(context.capture_default)),
            // Absence means "use the account default" on the processor side.
            secure: params.secure.and_then(|secure| secure.then_some(1)),
            success_url: params.return_url.clone(),
            pingback_url: params.notify_url.clone(),
            extra,
        };

        Ok(Self { purchase, card })
    }
}

/// A flag the processor renders as `true`, `1` or `"1"` depending on the
/// call type.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ResponseFlag {
    Bool(bool),
    Numeric(i64),
    Text(String),
}

impl ResponseFlag {
    fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Numeric(value) => *value != 0,
            Self::Text(value) => !value.is_empty() && value != "0",
        }
    }
}

/// Charge ids arrive as integers on some call types and strings on others.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ResourceId {
    Text(String),
    Numeric(i64),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Numeric(value) => write!(f, "{value}"),
        }
    }
}

/// The error field: a bare message on charge calls, an object with code and
/// message elsewhere.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum BrickErrorBody {
    Detailed {
        #[serde(default)]
        code: Option<i64>,
        #[serde(default)]
        message: Option<String>,
    },
    Plain(String),
}

impl BrickErrorBody {
    fn code(&self) -> Option<i64> {
        match self {
            Self::Detailed { code, .. } => *code,
            Self::Plain(_) => None,
        }
    }

    fn message(&self) -> Option<String> {
        match self {
            Self::Detailed { message, .. } => message.clone(),
            Self::Plain(message) => Some(message.clone()),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BrickCardResource {
    #[serde(default)]
    pub token: Option<Secret<String>>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NestedResponseFlag {
    #[serde(default)]
    pub success: Option<ResponseFlag>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LibraryCharge {
    #[serde(default)]
    pub order_id: Option<ResourceId>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LibraryCardResource {
    #[serde(default)]
    pub auth_token: Option<Secret<String>>,
}

/// The nested shape library-style calls answer with.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LibraryPayment {
    #[serde(default)]
    pub charge: Option<LibraryCharge>,
    #[serde(default)]
    pub card: Option<LibraryCardResource>,
}

/// Superset of every shape the charge endpoints answer with. Only one family
/// of fields is populated per response; the accessors apply the documented
/// precedence.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct BrickChargeResponse {
    #[serde(default)]
    pub id: Option<ResourceId>,
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub success: Option<ResponseFlag>,
    #[serde(default)]
    pub captured: Option<bool>,
    #[serde(default)]
    pub risk: Option<String>,
    #[serde(default)]
    pub card: Option<BrickCardResource>,
    #[serde(default)]
    pub error: Option<BrickErrorBody>,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub response: Option<NestedResponseFlag>,
    #[serde(default)]
    pub payment: Option<LibraryPayment>,
}

impl BrickChargeResponse {
    fn error_code(&self) -> Option<i64> {
        self.error
            .as_ref()
            .and_then(BrickErrorBody::code)
            .or(self.code)
    }

    fn message(&self) -> Option<String> {
        self.error.as_ref().and_then(BrickErrorBody::message)
    }

    fn success_flag(&self) -> bool {
        self.success
            .as_ref()
            .map(ResponseFlag::is_truthy)
            .unwrap_or(false)
            || self
                .response
                .as_ref()
                .and_then(|nested| nested.success.as_ref())
                .map(ResponseFlag::is_truthy)
                .unwrap_or(false)
    }

    /// Top-level `id` wins; library-style calls nest the reference instead.
    pub fn transaction_reference(&self) -> Option<String> {
        self.id
            .as_ref()
            .map(ToString::to_string)
            .or_else(|| {
                self.payment
                    .as_ref()
                    .and_then(|payment| payment.charge.as_ref())
                    .and_then(|charge| charge.order_id.as_ref())
                    .map(ToString::to_string)
            })
    }

    pub fn card_reference(&self) -> Option<String> {
        self.card
            .as_ref()
            .and_then(|card| card.token.as_ref())
            .map(|token| token.peek().clone())
            .or_else(|| {
                self.payment
                    .as_ref()
                    .and_then(|payment| payment.card.as_ref())
                    .and_then(|card| card.auth_token.as_ref())
                    .map(|token| token.peek().clone())
            })
    }

    pub(crate) fn is_captured(&self) -> bool {
        self.captured == Some(true)
    }

    pub(crate) fn is_under_review(&self) -> bool {
        self.risk.as_deref() == Some("pending")
    }

    /// A body that carries none of the processor's fields. The processor
    /// answers unimplemented calls this way.
    fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.object.is_none()
            && self.success.is_none()
            && self.card.is_none()
            && self.error.is_none()
            && self.response.is_none()
            && self.payment.is_none()
    }
}

/// One charge-family response with the HTTP status it arrived under: the
/// direct-charge half of the uniform result contract.
#[derive(Clone, Debug)]
pub struct DirectChargeResult {
    pub response: BrickChargeResponse,
    pub status_code: u16,
}

impl DirectChargeResult {
    /// The error code the body carries, or the HTTP status when the body has
    /// none and the status already signals failure.
    pub fn code(&self) -> Option<i64> {
        self.response.error_code().or_else(|| {
            (self.status_code >= 400).then_some(i64::from(self.status_code))
        })
    }

    /// Success policy, evaluated in strict order: a failing code wins, then
    /// an explicit success flag, then the presence of an error; a response
    /// that carries nothing at all counts as a failure rather than a
    /// success.
    pub fn is_successful(&self) -> bool {
        if let Some(code) = self.code() {
            if code >= 400 {
                return false;
            }
        }
        if self.response.success_flag() {
            return true;
        }
        if self.response.error.is_some() {
            return false;
        }
        !self.response.is_empty()
    }

    /// Collapses the response into the uniform outcome. `captured` and
    /// `under_review` stay false here; flows that know the charge resource
    /// set them from its own state flags.
    pub fn into_outcome(self) -> PaymentOutcome {
        let successful = self.is_successful();
        let code = self.code();
        PaymentOutcome {
            successful,
            transaction_reference: self.response.transaction_reference(),
            card_reference: self.response.card_reference(),
            message: self.response.message(),
            code,
            captured: false,
            under_review: false,
            redirect_url: None,
        }
    }
}

/// Answer of the token-create endpoint.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BrickTokenResponse {
    #[serde(default)]
    pub token: Option<Secret<String>>,
    #[serde(default)]
    pub error: Option<BrickErrorBody>,
    #[serde(default)]
    pub code: Option<i64>,
}

impl BrickTokenResponse {
    pub(crate) fn error_code(&self) -> Option<i64> {
        self.error
            .as_ref()
            .and_then(BrickErrorBody::code)
            .or(self.code)
    }

    pub(crate) fn message(&self) -> Option<String> {
        self.error.as_ref().and_then(BrickErrorBody::message)
    }
}
