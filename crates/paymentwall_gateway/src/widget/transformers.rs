//! Wire types for the hosted-widget family: the signed redirect URL
//! parameters and the payment-systems listing query.

use error_stack::Report;
use gateway_common::errors::{ConnectorError, CustomResult};
use masking::{PeekInterface, Secret};
use serde::Serialize;
use url::Url;

use crate::{
    constants, signature,
    types::{GatewayConfig, PaymentListParams, PaymentOutcome, WidgetPurchaseParams},
    utils,
};

/// Everything a hosted-widget purchase URL is parameterized by: one
/// fixed-price product line item plus the end-user and callback fields.
#[derive(Clone, Debug)]
pub struct WidgetUrlRequest {
    uid: String,
    widget: String,
    product_id: String,
    amount: String,
    currency: String,
    name: String,
    email: String,
    browser_ip: String,
    browser_domain: String,
    country_code: Option<String>,
    success_url: Option<String>,
    pingback_url: Option<String>,
}

impl TryFrom<(&GatewayConfig, &WidgetPurchaseParams)> for WidgetUrlRequest {
    type Error = Report<ConnectorError>;

    fn try_from(
        (config, params): (&GatewayConfig, &WidgetPurchaseParams),
    ) -> Result<Self, Self::Error> {
        let widget_key = params
            .widget_key
            .clone()
            .or_else(|| config.widget_key.clone());

        utils::require_fields(&[
            ("email", utils::is_set(params.email.as_ref())),
            ("clientIp", utils::is_set(params.client_ip.as_ref())),
            ("browserDomain", utils::is_set(params.browser_domain.as_ref())),
            ("accountId", utils::is_set(params.account_id.as_ref())),
            ("widgetKey", utils::is_set(widget_key.as_ref())),
            ("packageId", utils::is_set(params.package_id.as_ref())),
            ("amount", utils::is_set(params.amount.as_ref())),
            ("currency", utils::is_set(params.currency.as_ref())),
            ("description", utils::is_set(params.description.as_ref())),
        ])?;

        Ok(Self {
            uid: params.account_id.clone().unwrap_or_default(),
            widget: widget_key.unwrap_or_default(),
            product_id: params.package_id.clone().unwrap_or_default(),
            amount: params.amount.clone().unwrap_or_default(),
            currency: params.currency.clone().unwrap_or_default(),
            name: params.description.clone().unwrap_or_default(),
            email: params.email.clone().unwrap_or_default(),
            browser_ip: params.client_ip.clone().unwrap_or_default(),
            browser_domain: params.browser_domain.clone().unwrap_or_default(),
            country_code: params.country_code.clone(),
            success_url: params.return_url.clone(),
            pingback_url: params.notify_url.clone(),
        })
    }
}

impl WidgetUrlRequest {
    /// Renders the query parameters, signing them with the configured
    /// private key. The signature covers every other parameter including
    /// `sign_version`.
    pub(crate) fn into_query_params(
        self,
        config: &GatewayConfig,
    ) -> CustomResult<Vec<(String, String)>, ConnectorError> {
        let mut params: Vec<(String, String)> = vec![
            ("key".to_string(), config.public_key()?.peek().clone()),
            ("uid".to_string(), self.uid),
            ("widget".to_string(), self.widget),
            ("amount".to_string(), self.amount),
            ("currencyCode".to_string(), self.currency),
            ("ag_external_id".to_string(), self.product_id),
            ("ag_name".to_string(), self.name),
            (
                "ag_type".to_string(),
                constants::PRODUCT_TYPE_FIXED.to_string(),
            ),
            ("email".to_string(), self.email),
            ("browser_ip".to_string(), self.browser_ip),
            ("browser_domain".to_string(), self.browser_domain),
        ];
        if let Some(country_code) = self.country_code {
            params.push(("country_code".to_string(), country_code));
        }
        if let Some(success_url) = self.success_url {
            params.push(("success_url".to_string(), success_url));
        }
        if let Some(pingback_url) = self.pingback_url {
            params.push(("pingback_url".to_string(), pingback_url));
        }
        params.push((
            "sign_version".to_string(),
            config.sign_version.number().to_string(),
        ));

        let sign = signature::calculate(&params, &config.private_key()?, config.sign_version)?;
        params.push(("sign".to_string(), sign));
        Ok(params)
    }
}

/// The widget-redirect half of the uniform result contract: no charge exists
/// yet, the caller forwards the user to the hosted page and learns the
/// reference later through a pingback.
#[derive(Clone, Debug)]
pub struct WidgetRedirectResult {
    pub url: Url,
}

impl From<WidgetRedirectResult> for PaymentOutcome {
    fn from(result: WidgetRedirectResult) -> Self {
        Self::redirect(result.url)
    }
}

/// Signed query of the payment-systems listing.
#[derive(Clone, Debug, Serialize)]
pub struct PaymentListQuery {
    key: Secret<String>,
    country_code: String,
    sign_version: u8,
    sign: String,
}

impl TryFrom<(&GatewayConfig, &PaymentListParams)> for PaymentListQuery {
    type Error = Report<ConnectorError>;

    fn try_from(
        (config, params): (&GatewayConfig, &PaymentListParams),
    ) -> Result<Self, Self::Error> {
        let country_code = params
            .country_code
            .clone()
            .filter(|code| !code.is_empty())
            .ok_or_else(utils::missing_field_err("country_code"))?;

        let key = config.public_key()?;
        let unsigned: Vec<(String, String)> = vec![
            ("key".to_string(), key.peek().clone()),
            ("country_code".to_string(), country_code.clone()),
            (
                "sign_version".to_string(),
                config.sign_version.number().to_string(),
            ),
        ];
        let sign = signature::calculate(&unsigned, &config.private_key()?, config.sign_version)?;

        Ok(Self {
            key,
            country_code,
            sign_version: config.sign_version.number(),
            sign,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::types::ApiType;

    fn config() -> GatewayConfig {
        let mut config = GatewayConfig::with_library_keys(
            ApiType::DigitalGoods,
            Secret::new("public".to_string()),
            Secret::new("private".to_string()),
        );
        config.widget_key = Some("p2_1".to_string());
        config
    }

    fn widget_params() -> WidgetPurchaseParams {
        WidgetPurchaseParams {
            email: Some("customer@example.com".to_string()),
            client_ip: Some("127.0.0.1".to_string()),
            browser_domain: Some("SiteName.com".to_string()),
            account_id: Some("12341234".to_string()),
            package_id: Some("1234".to_string()),
            amount: Some("10.00".to_string()),
            currency: Some("AUD".to_string()),
            description: Some("Super Deluxe Excellent Discount Package".to_string()),
            ..WidgetPurchaseParams::default()
        }
    }

    fn value<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn widget_key_falls_back_to_the_configuration() {
        let request = WidgetUrlRequest::try_from((&config(), &widget_params())).unwrap();
        let params = request.into_query_params(&config()).unwrap();
        assert_eq!(value(&params, "widget"), Some("p2_1"));
    }

    #[test]
    fn all_widget_fields_are_required_at_once() {
        let mut bare = config();
        bare.widget_key = None;
        let error =
            WidgetUrlRequest::try_from((&bare, &WidgetPurchaseParams::default())).unwrap_err();

        assert_eq!(
            error.current_context(),
            &ConnectorError::MissingRequiredFields {
                field_names: vec![
                    "email",
                    "clientIp",
                    "browserDomain",
                    "accountId",
                    "widgetKey",
                    "packageId",
                    "amount",
                    "currency",
                    "description",
                ],
            }
        );
    }

    #[test]
    fn query_carries_a_fixed_product_line_item_and_signature() {
        let request = WidgetUrlRequest::try_from((&config(), &widget_params())).unwrap();
        let params = request.into_query_params(&config()).unwrap();

        assert_eq!(value(&params, "key"), Some("public"));
        assert_eq!(value(&params, "ag_external_id"), Some("1234"));
        assert_eq!(value(&params, "ag_type"), Some("fixed"));
        assert_eq!(value(&params, "currencyCode"), Some("AUD"));
        assert_eq!(value(&params, "sign_version"), Some("2"));
        let sign = value(&params, "sign").unwrap();
        assert_eq!(sign.len(), 32);
    }

    #[test]
    fn listing_query_requires_a_country_code() {
        let error =
            PaymentListQuery::try_from((&config(), &PaymentListParams::default())).unwrap_err();
        assert_eq!(
            error.current_context(),
            &ConnectorError::MissingRequiredField {
                field_name: "country_code",
            }
        );
    }

    #[test]
    fn listing_query_is_signed_over_its_other_fields() {
        let query = PaymentListQuery::try_from((
            &config(),
            &PaymentListParams {
                country_code: Some("US".to_string()),
            },
        ))
        .unwrap();

        let expected = signature::calculate(
            &[
                ("key".to_string(), "public".to_string()),
                ("country_code".to_string(), "US".to_string()),
                ("sign_version".to_string(), "2".to_string()),
            ],
            &Secret::new("private".to_string()),
            crate::types::SignVersion::Two,
        )
        .unwrap();
        assert_eq!(query.sign, expected);
    }
}
