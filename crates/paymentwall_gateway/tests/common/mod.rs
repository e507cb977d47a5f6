//! Shared test harness: a programmable transport that emulates the
//! processor's sandbox, including its deterministic card/CVV matrix.

// Each test target compiles this module separately and uses its own subset.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use gateway_common::{
    api::HttpClient,
    errors::{CustomResult, HttpClientError},
    request::{Method, Request, RequestContent},
    response::Response,
};
use masking::Secret;
use paymentwall_gateway::{ApiType, Gateway, GatewayConfig};

pub const CVV_ERROR_MESSAGE: &str =
    "Please ensure the CVV/CVC number is correct before retrying the transaction";
pub const BALANCE_ERROR_MESSAGE: &str =
    "Please contact your credit card company to check your available balance";
pub const APPROVAL_ERROR_MESSAGE: &str =
    "Please contact your credit card company to approve your payment";

/// A `sale_id` the sandbox reports as already cancelled on refund.
pub const CANCELLED_SALE_ID: &str = "cancelled_sale_1";

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn form_value(&self, key: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(header, _)| header == name)
    }
}

/// Emulates the processor's test system over canned JSON bodies.
#[derive(Debug, Default)]
pub struct SandboxTransport {
    requests: Mutex<Vec<RecordedRequest>>,
}

impl SandboxTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .expect("request log poisoned")
            .clone()
    }

    fn record(&self, request: &Request) -> RecordedRequest {
        let form = match &request.body {
            Some(RequestContent::FormUrlEncoded(body)) => {
                serde_urlencoded::from_str(body).expect("request body must be form encoded")
            }
            None => Vec::new(),
        };
        let recorded = RecordedRequest {
            method: request.method,
            url: request.url.clone(),
            headers: request
                .headers
                .iter()
                .map(|(name, value)| (name.clone(), format!("{value:?}")))
                .collect(),
            form,
        };
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(recorded.clone());
        recorded
    }

    fn respond(&self, body: &str, status_code: u16) -> Response {
        Response::new(Bytes::from(body.to_string()), status_code)
    }

    fn tokenize(&self, request: &RecordedRequest) -> Response {
        let decline = |message: &str, code: i64| {
            self.respond(
                &format!(r#"{{"type":"Error","error":"{message}","code":{code}}}"#),
                200,
            )
        };
        match request.form_value("card[cvv]") {
            Some("111") => decline(CVV_ERROR_MESSAGE, 3104),
            Some("222") => decline(BALANCE_ERROR_MESSAGE, 3105),
            Some("333") => decline(APPROVAL_ERROR_MESSAGE, 3106),
            _ => self.respond(r#"{"type":"token","token":"ot_test_token"}"#, 200),
        }
    }

    fn charge_create(&self) -> Response {
        self.respond(
            r#"{"id":"5616524151429286237_test","object":"charge",
                "captured":true,"risk":"approved",
                "card":{"token":"qwerty12341234"}}"#,
            200,
        )
    }

    fn charge_fetch(&self, sale_id: &str) -> Response {
        self.respond(
            &format!(
                r#"{{"id":"{sale_id}","object":"charge","captured":false,"risk":"pending"}}"#
            ),
            200,
        )
    }

    fn charge_refund(&self, sale_id: &str) -> Response {
        if sale_id == CANCELLED_SALE_ID {
            return self.respond(
                r#"{"error":{"code":3201,"message":"Charge is already cancelled"}}"#,
                200,
            );
        }
        self.respond(
            &format!(r#"{{"id":"{sale_id}","object":"charge","captured":false}}"#),
            200,
        )
    }

    fn charge_capture(&self, sale_id: &str) -> Response {
        self.respond(
            &format!(r#"{{"id":"{sale_id}","object":"charge","captured":true}}"#),
            200,
        )
    }

    fn payment_systems(&self) -> Response {
        self.respond(
            r#"[{"id":"paypal","name":"PayPal"},{"id":"alipay","name":"Alipay"}]"#,
            200,
        )
    }
}

impl HttpClient for SandboxTransport {
    fn send(&self, request: Request) -> CustomResult<Response, HttpClientError> {
        let recorded = self.record(&request);
        let path = recorded
            .url
            .split_once("/api/")
            .map(|(_, path)| path)
            .unwrap_or_default();
        let path = path.split('?').next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let response = match segments.as_slice() {
            ["token"] => self.tokenize(&recorded),
            ["charge"] => self.charge_create(),
            ["charge", sale_id] => self.charge_fetch(sale_id),
            ["charge", sale_id, "refund"] => self.charge_refund(sale_id),
            ["charge", sale_id, "capture"] => self.charge_capture(sale_id),
            ["payment-systems"] => self.payment_systems(),
            _ => self.respond("{}", 404),
        };
        Ok(response)
    }
}

/// A transport that always fails below the HTTP layer.
#[derive(Debug)]
pub struct DeadTransport;

impl HttpClient for DeadTransport {
    fn send(&self, _request: Request) -> CustomResult<Response, HttpClientError> {
        Err(HttpClientError::ConnectionFailed.into())
    }
}

pub fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::with_library_keys(
        ApiType::DigitalGoods,
        Secret::new("test_public_key".to_string()),
        Secret::new("test_private_key".to_string()),
    );
    config.test_mode = true;
    config.widget_key = Some("p2_1".to_string());
    config
}

pub fn sandbox_gateway() -> (Gateway, Arc<SandboxTransport>) {
    let transport = SandboxTransport::new();
    (
        Gateway::new(test_config(), transport.clone()),
        transport,
    )
}
