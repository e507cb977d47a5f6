//! Direct-charge (Brick) API client: tokenization and the charge lifecycle.
//!
//! Test payments can be performed by enabling `test_mode` and using the
//! following card number / CVV combinations:
//!
//! Card numbers: `4242424242424242`, `4000000000000002`
//!
//! | CVV | Expected response |
//! |-----|-------------------|
//! | 111 | Error: Please ensure the CVV/CVC number is correct before retrying the transaction |
//! | 222 | Error: Please contact your credit card company to check your available balance |
//! | 333 | Error: Please contact your credit card company to approve your payment |
//!
//! Any other valid CVV results in a success on the test system.

pub mod transformers;

use std::sync::Arc;

use error_stack::ResultExt;
use gateway_common::{
    api::HttpClient,
    consts,
    errors::{ConnectorError, CustomResult, HttpClientError, RemoteResult},
    ext_traits::BytesExt,
    request::{Headers, Method, Request, RequestBuilder, RequestContent},
    response::Response,
};
use masking::{Mask, PeekInterface, Secret};

use crate::{
    constants::{self, headers},
    types::GatewayConfig,
};

use transformers::{
    BrickChargeRequest, BrickChargeResponse, BrickTokenRequest, BrickTokenResponse,
    DirectChargeResult,
};

/// What a tokenize call resolves to. A declined card is data, not an error:
/// callers branch on the decline reason instead of unwinding.
#[derive(Debug)]
pub enum TokenizeOutcome {
    /// A one-time token was minted from the card data
    Minted(Secret<String>),
    /// The processor rejected the card data
    Declined {
        message: Option<String>,
        code: Option<i64>,
    },
}

/// Client for the direct-charge API. Wraps the injected transport with the
/// processor's endpoints, headers and response shapes.
pub struct BrickClient {
    config: GatewayConfig,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for BrickClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrickClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BrickClient {
    pub fn new(config: GatewayConfig, http: Arc<dyn HttpClient>) -> Self {
        Self { config, http }
    }

    pub(crate) fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url(), path)
    }

    fn default_headers(&self, with_private_key: bool) -> CustomResult<Headers, ConnectorError> {
        let mut headers: Headers = vec![
            (headers::ACCEPT.to_string(), consts::ACCEPT_HEADER.to_string().into()),
            (headers::USER_AGENT.to_string(), consts::USER_AGENT.to_string().into()),
        ];
        if self.config.test_mode {
            headers.push((headers::DEV_FLAG.to_string(), "1".to_string().into()));
        }
        if with_private_key {
            headers.push((
                headers::X_API_KEY.to_string(),
                self.config.private_key()?.peek().clone().into_masked(),
            ));
        }
        Ok(headers)
    }

    /// Exchanges raw card data for a one-time token.
    pub fn tokenize(&self, card: BrickTokenRequest) -> RemoteResult<TokenizeOutcome> {
        let body = card.form_body()?;
        let request = RequestBuilder::new()
            .method(Method::Post)
            .url(&self.url(constants::TOKEN_PATH))
            .headers(self.default_headers(false)?)
            .header(
                headers::CONTENT_TYPE,
                constants::FORM_CONTENT_TYPE.to_string().into(),
            )
            .set_body(RequestContent::FormUrlEncoded(body))
            .build();

        let response = self.http.send(request)?;
        let token_response: BrickTokenResponse = response
            .response
            .parse_struct("BrickTokenResponse")
            .change_context(HttpClientError::ResponseDecodingFailed)?;
        tracing::debug!(status = response.status_code, "tokenize call completed");

        match token_response.token.clone() {
            Some(token) => Ok(TokenizeOutcome::Minted(token)),
            None => Ok(TokenizeOutcome::Declined {
                message: token_response
                    .message()
                    .or_else(|| Some("Payment Token could not be created".to_string())),
                code: token_response.error_code(),
            }),
        }
    }

    /// Creates a charge from an assembled `purchase` sub-map. The payload
    /// must carry a resolved token by the time this is called.
    pub fn charge_create(&self, purchase: BrickChargeRequest) -> RemoteResult<DirectChargeResult> {
        let body = purchase.form_body()?;
        let request = RequestBuilder::new()
            .method(Method::Post)
            .url(&self.url(constants::CHARGE_PATH))
            .headers(self.default_headers(true)?)
            .header(
                headers::CONTENT_TYPE,
                constants::FORM_CONTENT_TYPE.to_string().into(),
            )
            .set_body(RequestContent::FormUrlEncoded(body))
            .build();

        self.exchange(request)
    }

    /// Looks a charge up by its `sale_id`.
    pub fn charge_fetch(&self, sale_id: &str) -> RemoteResult<DirectChargeResult> {
        let request = RequestBuilder::new()
            .method(Method::Get)
            .url(&format!("{}/{sale_id}", self.url(constants::CHARGE_PATH)))
            .headers(self.default_headers(true)?)
            .build();

        self.exchange(request)
    }

    /// Refunds a charge by `sale_id`. The processor exposes no separate void
    /// operation; cancels route here as well.
    pub fn charge_refund(&self, sale_id: &str) -> RemoteResult<DirectChargeResult> {
        let request = RequestBuilder::new()
            .method(Method::Post)
            .url(&format!(
                "{}/{sale_id}/refund",
                self.url(constants::CHARGE_PATH)
            ))
            .headers(self.default_headers(true)?)
            .build();

        self.exchange(request)
    }

    /// Settles a previously authorized charge.
    pub fn charge_capture(&self, sale_id: &str) -> RemoteResult<DirectChargeResult> {
        let request = RequestBuilder::new()
            .method(Method::Post)
            .url(&format!(
                "{}/{sale_id}/capture",
                self.url(constants::CHARGE_PATH)
            ))
            .headers(self.default_headers(true)?)
            .build();

        self.exchange(request)
    }

    fn exchange(&self, request: Request) -> RemoteResult<DirectChargeResult> {
        let response: Response = self.http.send(request)?;
        let parsed: BrickChargeResponse = response
            .response
            .parse_struct("BrickChargeResponse")
            .change_context(HttpClientError::ResponseDecodingFailed)?;
        tracing::info!(
            status = response.status_code,
            connector_response = ?parsed,
            "charge call completed"
        );
        Ok(DirectChargeResult {
            response: parsed,
            status_code: response.status_code,
        })
    }
}
