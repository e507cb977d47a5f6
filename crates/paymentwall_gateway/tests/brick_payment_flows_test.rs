//! End-to-end flows against the emulated sandbox: purchase with raw cards
//! and stored tokens, the charge lifecycle, and the decline matrix.

mod common;

use std::sync::Arc;

use gateway_common::request::Method;
use masking::Secret;
use paymentwall_gateway::{Gateway, PaymentCard, PurchaseParams, ReferenceParams};

use common::{
    sandbox_gateway, test_config, DeadTransport, APPROVAL_ERROR_MESSAGE, BALANCE_ERROR_MESSAGE,
    CANCELLED_SALE_ID, CVV_ERROR_MESSAGE,
};

fn test_card(cvv: &str) -> PaymentCard {
    PaymentCard {
        number: Secret::new("4242424242424242".to_string()),
        exp_month: Secret::new("01".to_string()),
        exp_year: Secret::new("2030".to_string()),
        cvv: Secret::new(cvv.to_string()),
        first_name: Some(Secret::new("Example".to_string())),
        last_name: Some(Secret::new("Customer".to_string())),
        email: Some("customer@example.com".to_string()),
        billing_postcode: Some(Secret::new("4999".to_string())),
        billing_country: None,
        billing_phone: None,
    }
}

fn purchase_params(cvv: &str) -> PurchaseParams {
    PurchaseParams {
        amount: Some("10.00".to_string()),
        currency: Some("AUD".to_string()),
        account_id: Some("12341234".to_string()),
        description: Some("Super Deluxe Excellent Discount Package".to_string()),
        client_ip: Some("127.0.0.1".to_string()),
        browser_domain: Some("SiteName.com".to_string()),
        card: Some(test_card(cvv)),
        ..PurchaseParams::default()
    }
}

#[test]
fn purchase_with_raw_card_tokenizes_then_charges() {
    let (gateway, transport) = sandbox_gateway();

    let outcome = gateway
        .purchase(purchase_params("123"))
        .send()
        .expect("purchase must not error");

    assert!(outcome.successful);
    assert!(outcome.captured);
    assert!(!outcome.under_review);
    assert_eq!(
        outcome.transaction_reference.as_deref(),
        Some("5616524151429286237_test")
    );
    assert_eq!(outcome.card_reference.as_deref(), Some("qwerty12341234"));

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);

    let tokenize = &requests[0];
    assert_eq!(tokenize.method, Method::Post);
    assert!(tokenize.url.ends_with("/token"));
    assert_eq!(tokenize.form_value("card[number]"), Some("4242424242424242"));
    assert_eq!(tokenize.form_value("public_key"), Some("test_public_key"));
    assert!(tokenize.has_header("dev-flag"));

    let charge = &requests[1];
    assert!(charge.url.ends_with("/charge"));
    assert_eq!(charge.form_value("token"), Some("ot_test_token"));
    assert_eq!(charge.form_value("capture"), Some("1"));
    // Once a token is resolved the card sub-map must not travel.
    assert_eq!(charge.form_value("card[number]"), None);
    assert_eq!(charge.form_value("card[cvv]"), None);
}

#[test]
fn purchase_with_stored_token_skips_tokenization() {
    let (gateway, transport) = sandbox_gateway();

    let mut params = purchase_params("123");
    params.card = None;
    params.email = Some("customer@example.com".to_string());
    params.card_reference = Some(Secret::new("token_asdf1234asdf1234".to_string()));

    let outcome = gateway.purchase(params).send().expect("purchase");
    assert!(outcome.successful);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.ends_with("/charge"));
    assert_eq!(
        requests[0].form_value("token"),
        Some("token_asdf1234asdf1234")
    );
}

#[test]
fn sandbox_cvv_111_declines_with_the_cvv_message() {
    let (gateway, transport) = sandbox_gateway();

    let outcome = gateway
        .purchase(purchase_params("111"))
        .send()
        .expect("a decline is data, not an error");

    assert!(!outcome.successful);
    assert_eq!(outcome.message.as_deref(), Some(CVV_ERROR_MESSAGE));
    assert_eq!(outcome.code, Some(3104));
    assert!(outcome.transaction_reference.is_none());

    // The decline happens at tokenization; no charge call is made.
    assert_eq!(transport.requests().len(), 1);
}

#[test]
fn sandbox_cvv_222_declines_for_insufficient_balance() {
    let (gateway, _transport) = sandbox_gateway();

    let outcome = gateway
        .purchase(purchase_params("222"))
        .send()
        .expect("a decline is data, not an error");

    assert!(!outcome.successful);
    assert_eq!(outcome.message.as_deref(), Some(BALANCE_ERROR_MESSAGE));
}

#[test]
fn sandbox_cvv_333_declines_pending_approval() {
    let (gateway, _transport) = sandbox_gateway();

    let outcome = gateway
        .purchase(purchase_params("333"))
        .send()
        .expect("a decline is data, not an error");

    assert!(!outcome.successful);
    assert_eq!(outcome.message.as_deref(), Some(APPROVAL_ERROR_MESSAGE));
}

#[test]
fn authorize_sends_capture_zero() {
    let (gateway, transport) = sandbox_gateway();

    let outcome = gateway
        .authorize(purchase_params("123"))
        .send()
        .expect("authorize");
    assert!(outcome.successful);

    let requests = transport.requests();
    assert_eq!(requests[1].form_value("capture"), Some("0"));
}

#[test]
fn capture_settles_an_authorized_charge() {
    let (gateway, transport) = sandbox_gateway();

    let outcome = gateway
        .capture(ReferenceParams {
            transaction_reference: Some("auth_sale_7".to_string()),
        })
        .send()
        .expect("capture");

    assert!(outcome.successful);
    assert!(outcome.captured);
    assert_eq!(outcome.transaction_reference.as_deref(), Some("auth_sale_7"));
    assert!(transport.requests()[0].url.ends_with("/charge/auth_sale_7/capture"));
}

#[test]
fn void_routes_to_the_refund_primitive() {
    let (gateway, transport) = sandbox_gateway();

    let outcome = gateway
        .void(ReferenceParams {
            transaction_reference: Some("ASDF1234".to_string()),
        })
        .send()
        .expect("void");

    assert!(outcome.successful);
    assert_eq!(outcome.transaction_reference.as_deref(), Some("ASDF1234"));
    assert!(transport.requests()[0].url.ends_with("/charge/ASDF1234/refund"));
}

#[test]
fn voiding_an_already_cancelled_charge_is_successful() {
    let (gateway, _transport) = sandbox_gateway();

    let outcome = gateway
        .void(ReferenceParams {
            transaction_reference: Some(CANCELLED_SALE_ID.to_string()),
        })
        .send()
        .expect("void");

    assert!(outcome.successful);
    assert_eq!(outcome.code, Some(3201));
}

#[test]
fn refunding_an_already_cancelled_charge_stays_a_failure() {
    let (gateway, _transport) = sandbox_gateway();

    let outcome = gateway
        .refund(ReferenceParams {
            transaction_reference: Some(CANCELLED_SALE_ID.to_string()),
        })
        .send()
        .expect("refund");

    assert!(!outcome.successful);
    assert_eq!(outcome.code, Some(3201));
}

#[test]
fn purchase_status_reports_the_charge_state_unmodified() {
    let (gateway, transport) = sandbox_gateway();

    let outcome = gateway
        .purchase_status(ReferenceParams {
            transaction_reference: Some("sale_42".to_string()),
        })
        .send()
        .expect("status");

    assert!(outcome.successful);
    assert!(!outcome.captured);
    assert!(outcome.under_review);

    let requests = transport.requests();
    assert_eq!(requests[0].method, Method::Get);
    assert!(requests[0].url.ends_with("/charge/sale_42"));
}

#[test]
fn transport_failures_surface_as_error_outcomes_not_panics() {
    let gateway = Gateway::new(test_config(), Arc::new(DeadTransport));

    let outcome = gateway
        .purchase(purchase_params("123"))
        .send()
        .expect("transport failures are folded into the outcome");

    assert!(!outcome.successful);
    assert!(outcome.message.is_some());
}
