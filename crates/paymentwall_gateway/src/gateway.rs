//! The caller-facing gateway: holds the processor configuration and creates
//! one request variant per operation. No network activity happens here;
//! every variant validates, shapes its payload and only then talks to the
//! processor through the injected transport.

use std::sync::Arc;

use gateway_common::{
    api::HttpClient,
    errors::{ConnectorError, CustomResult, RemoteCallError},
};

use crate::{
    brick::{transformers as brick, BrickClient, TokenizeOutcome},
    constants,
    types::{
        GatewayConfig, PaymentListParams, PaymentOutcome, PaymentSystemsOutcome, PurchaseParams,
        ReferenceParams, WidgetPurchaseParams,
    },
    utils,
    widget::{transformers as widget, WidgetClient},
};

/// Entry point of the connector. Owns the configuration and the two API
/// clients; acts as a factory for request variants.
#[derive(Debug)]
pub struct Gateway {
    brick: BrickClient,
    widget: WidgetClient,
}

impl Gateway {
    /// Builds a gateway over the given configuration and transport.
    pub fn new(config: GatewayConfig, http: Arc<dyn HttpClient>) -> Self {
        Self {
            brick: BrickClient::new(config.clone(), Arc::clone(&http)),
            widget: WidgetClient::new(config, http),
        }
    }

    /// A purchase: charge and settle immediately unless `capture` is
    /// explicitly false.
    pub fn purchase(&self, params: PurchaseParams) -> PurchaseRequest<'_> {
        PurchaseRequest {
            client: &self.brick,
            params,
            capture_default: true,
        }
    }

    /// An authorization: reserve funds only, unless `capture` is explicitly
    /// true. Same payload builder as [`Self::purchase`], different capture
    /// default.
    pub fn authorize(&self, params: PurchaseParams) -> AuthorizeRequest<'_> {
        PurchaseRequest {
            client: &self.brick,
            params,
            capture_default: false,
        }
    }

    /// Settles a previously authorized charge.
    pub fn capture(&self, params: ReferenceParams) -> CaptureRequest<'_> {
        CaptureRequest {
            client: &self.brick,
            params,
        }
    }

    /// Cancels a charge. Idempotent: an "already cancelled" answer counts as
    /// success.
    pub fn void(&self, params: ReferenceParams) -> VoidRequest<'_> {
        VoidRequest {
            client: &self.brick,
            params,
        }
    }

    /// Refunds a charge.
    pub fn refund(&self, params: ReferenceParams) -> RefundRequest<'_> {
        RefundRequest {
            client: &self.brick,
            params,
        }
    }

    /// Reads the current state of a charge without touching it.
    pub fn purchase_status(&self, params: ReferenceParams) -> PurchaseStatusRequest<'_> {
        PurchaseStatusRequest {
            client: &self.brick,
            params,
        }
    }

    /// A purchase through the hosted widget page.
    pub fn widget_purchase(&self, params: WidgetPurchaseParams) -> WidgetPurchaseRequest<'_> {
        WidgetPurchaseRequest {
            client: &self.widget,
            params,
        }
    }

    /// Lists the local payment methods available for a country.
    pub fn payment_systems(&self, params: PaymentListParams) -> WidgetPaymentListRequest<'_> {
        WidgetPaymentListRequest {
            client: &self.widget,
            params,
        }
    }
}

fn remote_failure(error: RemoteCallError) -> CustomResult<PaymentOutcome, ConnectorError> {
    match error {
        RemoteCallError::Transport(report) => {
            tracing::warn!(?report, "remote call failed in transport");
            Ok(PaymentOutcome::transport_failure(
                report.current_context().to_string(),
            ))
        }
        RemoteCallError::Integration(report) => Err(report),
    }
}

/// Direct purchase against the charge API.
#[derive(Debug)]
pub struct PurchaseRequest<'a> {
    client: &'a BrickClient,
    params: PurchaseParams,
    capture_default: bool,
}

/// An authorization is a purchase whose capture flag defaults to false.
pub type AuthorizeRequest<'a> = PurchaseRequest<'a>;

impl PurchaseRequest<'_> {
    /// The effective capture flag: an explicit value wins, otherwise the
    /// operation's default applies.
    pub fn capture(&self) -> bool {
        self.params.capture_or(self.capture_default)
    }

    /// Validates the parameters and shapes the outbound payload.
    pub fn payload(&self) -> CustomResult<brick::ChargePayload, ConnectorError> {
        brick::ChargePayload::try_from(brick::PurchaseContext {
            config: self.client.config(),
            params: &self.params,
            capture_default: self.capture_default,
        })
    }

    /// Runs the purchase: resolves a token (minting one from the card if
    /// necessary), creates the charge and normalizes the answer. Declines
    /// and transport failures come back as unsuccessful outcomes, not
    /// errors.
    pub fn send(&self) -> CustomResult<PaymentOutcome, ConnectorError> {
        let mut payload = self.payload()?;

        if payload.purchase.token.is_none() {
            let card = payload
                .card
                .take()
                .ok_or_else(utils::missing_field_err("card"))?;
            match self.client.tokenize(card) {
                Ok(TokenizeOutcome::Minted(token)) => payload.purchase.token = Some(token),
                Ok(TokenizeOutcome::Declined { message, code }) => {
                    return Ok(PaymentOutcome::declined(message, code));
                }
                Err(error) => return remote_failure(error),
            }
        }
        // Token resolved; the card sub-map must not travel with the charge.
        payload.card = None;

        let result = match self.client.charge_create(payload.purchase) {
            Ok(result) => result,
            Err(error) => return remote_failure(error),
        };

        let captured = result.response.is_captured();
        let under_review = result.response.is_under_review();
        let mut outcome = result.into_outcome();
        if outcome.successful {
            outcome.captured = captured;
            outcome.under_review = under_review;
        }
        Ok(outcome)
    }
}

fn require_reference(params: &ReferenceParams) -> CustomResult<String, ConnectorError> {
    params
        .transaction_reference
        .clone()
        .filter(|reference| !reference.is_empty())
        .ok_or_else(utils::missing_field_err("transactionReference"))
}

fn backfill_reference(mut outcome: PaymentOutcome, sale_id: String) -> PaymentOutcome {
    if outcome.transaction_reference.is_none() {
        outcome.transaction_reference = Some(sale_id);
    }
    outcome
}

/// Settlement of an authorized charge.
#[derive(Debug)]
pub struct CaptureRequest<'a> {
    client: &'a BrickClient,
    params: ReferenceParams,
}

impl CaptureRequest<'_> {
    /// The `sale_id` the capture addresses.
    pub fn payload(&self) -> CustomResult<String, ConnectorError> {
        require_reference(&self.params)
    }

    /// Settles the charge.
    pub fn send(&self) -> CustomResult<PaymentOutcome, ConnectorError> {
        let sale_id = self.payload()?;
        let result = match self.client.charge_capture(&sale_id) {
            Ok(result) => result,
            Err(error) => return remote_failure(error),
        };
        let captured = result.response.is_captured();
        let mut outcome = backfill_reference(result.into_outcome(), sale_id);
        if outcome.successful {
            outcome.captured = captured;
        }
        Ok(outcome)
    }
}

/// Cancellation of a charge. The processor routes cancels through its refund
/// operation; there is no separate void.
#[derive(Debug)]
pub struct VoidRequest<'a> {
    client: &'a BrickClient,
    params: ReferenceParams,
}

impl VoidRequest<'_> {
    /// The `sale_id` the void addresses.
    pub fn payload(&self) -> CustomResult<String, ConnectorError> {
        require_reference(&self.params)
    }

    /// Cancels the charge. A charge the processor reports as already
    /// cancelled counts as a successful void.
    pub fn send(&self) -> CustomResult<PaymentOutcome, ConnectorError> {
        let sale_id = self.payload()?;
        let result = match self.client.charge_refund(&sale_id) {
            Ok(result) => result,
            Err(error) => return remote_failure(error),
        };
        let mut outcome = backfill_reference(result.into_outcome(), sale_id);
        if !outcome.successful && outcome.code == Some(constants::ALREADY_CANCELLED_CODE) {
            outcome.successful = true;
        }
        Ok(outcome)
    }
}

/// Refund of a charge.
#[derive(Debug)]
pub struct RefundRequest<'a> {
    client: &'a BrickClient,
    params: ReferenceParams,
}

impl RefundRequest<'_> {
    /// The `sale_id` the refund addresses.
    pub fn payload(&self) -> CustomResult<String, ConnectorError> {
        require_reference(&self.params)
    }

    /// Refunds the charge.
    pub fn send(&self) -> CustomResult<PaymentOutcome, ConnectorError> {
        let sale_id = self.payload()?;
        let result = match self.client.charge_refund(&sale_id) {
            Ok(result) => result,
            Err(error) => return remote_failure(error),
        };
        Ok(backfill_reference(result.into_outcome(), sale_id))
    }
}

/// Read-only charge state lookup.
#[derive(Debug)]
pub struct PurchaseStatusRequest<'a> {
    client: &'a BrickClient,
    params: ReferenceParams,
}

impl PurchaseStatusRequest<'_> {
    /// The `sale_id` the lookup addresses.
    pub fn payload(&self) -> CustomResult<String, ConnectorError> {
        require_reference(&self.params)
    }

    /// Fetches the charge and reports its state without mutating it.
    pub fn send(&self) -> CustomResult<PaymentOutcome, ConnectorError> {
        let sale_id = self.payload()?;
        let result = match self.client.charge_fetch(&sale_id) {
            Ok(result) => result,
            Err(error) => return remote_failure(error),
        };
        let captured = result.response.is_captured();
        let under_review = result.response.is_under_review();
        let mut outcome = backfill_reference(result.into_outcome(), sale_id);
        if outcome.successful {
            outcome.captured = captured;
            outcome.under_review = under_review;
        }
        Ok(outcome)
    }
}

/// Purchase through the hosted widget page.
#[derive(Debug)]
pub struct WidgetPurchaseRequest<'a> {
    client: &'a WidgetClient,
    params: WidgetPurchaseParams,
}

impl WidgetPurchaseRequest<'_> {
    /// Validates the parameters and shapes the URL request.
    pub fn payload(&self) -> CustomResult<widget::WidgetUrlRequest, ConnectorError> {
        widget::WidgetUrlRequest::try_from((self.client.config(), &self.params))
    }

    /// Builds the signed redirect URL. No charge exists yet; the reference
    /// arrives later through a pingback once the user pays on the hosted
    /// page.
    pub fn send(&self) -> CustomResult<PaymentOutcome, ConnectorError> {
        let request = self.payload()?;
        let url = self.client.build_widget_url(request)?;
        Ok(widget::WidgetRedirectResult { url }.into())
    }
}

/// Listing of local payment methods for a country.
#[derive(Debug)]
pub struct WidgetPaymentListRequest<'a> {
    client: &'a WidgetClient,
    params: PaymentListParams,
}

impl WidgetPaymentListRequest<'_> {
    /// Validates the parameters and signs the listing query.
    pub fn payload(&self) -> CustomResult<widget::PaymentListQuery, ConnectorError> {
        widget::PaymentListQuery::try_from((self.client.config(), &self.params))
    }

    /// Fetches the listing. Transport failures come back as an unsuccessful
    /// outcome carrying the historical communication-error code.
    pub fn send(&self) -> CustomResult<PaymentSystemsOutcome, ConnectorError> {
        let query = self.payload()?;
        match self.client.payment_systems(query) {
            Ok(outcome) => Ok(outcome),
            Err(RemoteCallError::Transport(report)) => {
                tracing::warn!(?report, "payment systems listing failed in transport");
                Ok(PaymentSystemsOutcome {
                    successful: false,
                    systems: Vec::new(),
                    message: Some("Error in communicating with Paymentwall".to_string()),
                    code: Some(constants::COMMUNICATION_ERROR_CODE),
                })
            }
            Err(RemoteCallError::Integration(report)) => Err(report),
        }
    }
}
