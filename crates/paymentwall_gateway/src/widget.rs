//! Hosted-widget API client: signed redirect URLs and the local
//! payment-methods listing. Nothing here moves money; the widget page does,
//! and reports back through pingbacks that are out of scope.

pub mod transformers;

use std::sync::Arc;

use error_stack::ResultExt;
use gateway_common::{
    api::HttpClient,
    consts,
    errors::{ConnectorError, CustomResult, HttpClientError, RemoteResult},
    ext_traits::BytesExt,
    request::{Headers, Method, RequestBuilder},
};
use url::Url;

use crate::{
    constants::{self, headers},
    types::{GatewayConfig, PaymentSystem, PaymentSystemsOutcome},
};

use transformers::{PaymentListQuery, WidgetUrlRequest};

/// Client for the widget API.
pub struct WidgetClient {
    config: GatewayConfig,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for WidgetClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl WidgetClient {
    pub fn new(config: GatewayConfig, http: Arc<dyn HttpClient>) -> Self {
        Self { config, http }
    }

    pub(crate) fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn default_headers(&self) -> Headers {
        let mut headers: Headers = vec![
            (headers::ACCEPT.to_string(), consts::ACCEPT_HEADER.to_string().into()),
            (headers::USER_AGENT.to_string(), consts::USER_AGENT.to_string().into()),
        ];
        if self.config.test_mode {
            headers.push((headers::DEV_FLAG.to_string(), "1".to_string().into()));
        }
        headers
    }

    /// Builds the hosted-page redirect URL. Purely local: the charge only
    /// comes into existence once the user completes payment on the page.
    pub fn build_widget_url(&self, request: WidgetUrlRequest) -> CustomResult<Url, ConnectorError> {
        let params = request.into_query_params(&self.config)?;
        let mut url = Url::parse(&format!(
            "{}/{}",
            constants::WIDGET_BASE_URL,
            self.config.api_type.widget_controller()
        ))
        .change_context(ConnectorError::FailedToObtainIntegrationUrl)?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }

    /// Fetches the payment methods available for a country.
    pub fn payment_systems(&self, query: PaymentListQuery) -> RemoteResult<PaymentSystemsOutcome> {
        let query_string = serde_urlencoded::to_string(&query)
            .change_context(ConnectorError::RequestEncodingFailed)?;
        let request = RequestBuilder::new()
            .method(Method::Get)
            .url(&format!(
                "{}/{}/?{query_string}",
                self.config.base_url(),
                constants::PAYMENT_SYSTEMS_PATH
            ))
            .headers(self.default_headers())
            .build();

        let response = self.http.send(request)?;
        if response.status_code >= 400 {
            tracing::warn!(status = response.status_code, "payment systems listing failed");
            return Ok(PaymentSystemsOutcome {
                successful: false,
                systems: Vec::new(),
                message: None,
                code: Some(i64::from(response.status_code)),
            });
        }

        let systems: Vec<PaymentSystem> = response
            .response
            .parse_struct("PaymentSystemList")
            .change_context(HttpClientError::ResponseDecodingFailed)?;
        tracing::debug!(count = systems.len(), "payment systems listed");

        Ok(PaymentSystemsOutcome {
            successful: true,
            systems,
            message: None,
            code: None,
        })
    }
}
