use crate::validation::rules::{validate_currency_code, validate_locale, validate_txn_ref};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Storefront request for a VNPay checkout URL.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    #[validate(custom(function = "validate_positive_amount"))]
    pub amount: Decimal,

    #[validate(custom(function = "validate_txn_ref"))]
    pub order_id: String,

    #[validate(length(min = 1, max = 255, message = "Order info is required"))]
    pub order_info: String,

    #[validate(custom(function = "validate_locale"))]
    pub locale: Option<String>,

    #[validate(custom(function = "validate_currency_code"))]
    pub currency: Option<String>,

    #[validate(length(min = 1, max = 20, message = "Bank code must be between 1 and 20 characters"))]
    pub bank_code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentUrlResponse {
    pub payment_url: String,
    pub order_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

fn validate_positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() || amount.is_zero() {
        return Err(ValidationError::new("Amount must be a positive number"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validatable;
    use serde_json::json;

    #[test]
    fn test_request_uses_storefront_field_names() {
        let request: CreatePaymentRequest = serde_json::from_value(json!({
            "amount": 150000,
            "orderId": "order_42",
            "orderInfo": "Gift box order",
            "bankCode": "NCB"
        }))
        .unwrap();

        assert_eq!(request.amount, Decimal::from(150000));
        assert_eq!(request.order_id, "order_42");
        assert_eq!(request.bank_code.as_deref(), Some("NCB"));
        assert!(request.locale.is_none());
        assert!(request.validate_request().is_ok());
    }

    #[test]
    fn test_request_rejects_non_positive_amount_and_bad_locale() {
        let request: CreatePaymentRequest = serde_json::from_value(json!({
            "amount": 0,
            "orderId": "order_42",
            "orderInfo": "Gift box order",
            "locale": "fr"
        }))
        .unwrap();

        assert!(request.validate_request().is_err());
    }

    #[test]
    fn test_response_amount_is_a_number() {
        let response = PaymentUrlResponse {
            payment_url: "https://pay.example/?a=1".into(),
            order_id: "order_42".into(),
            amount: Decimal::from(150000),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["amount"], json!(150000.0));
    }
}
