//! VNPay merchant operations: building checkout URLs and verifying the
//! return redirect and IPN callbacks the gateway sends back.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use super::params::PaymentParams;
use super::response_code::{response_message, PaymentOutcome};
use super::signature::{canonical_query, sign, verify_signature, SECURE_HASH_KEY};
use crate::config::VnpayConfig;
use crate::error::{AppError, Result};

/// The gateway expresses amounts in hundredths of the currency unit.
const AMOUNT_SCALE: u32 = 2;

/// Gateway timestamps are Vietnam local time (GMT+7).
const GATEWAY_UTC_OFFSET_SECS: i32 = 7 * 3600;

const GATEWAY_DATE_FORMAT: &str = "%Y%m%d%H%M%S";

#[derive(Debug, Clone)]
pub struct PaymentUrlRequest {
    pub amount: Decimal,
    pub txn_ref: String,
    pub order_info: String,
    pub ip_addr: String,
    pub locale: Option<String>,
    pub currency_code: Option<String>,
    pub bank_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationResult {
    pub is_verified: bool,
    pub is_success: bool,
    pub outcome: PaymentOutcome,
    pub response_code: Option<String>,
    pub message: String,
    pub txn_ref: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    pub transaction_no: Option<String>,
    pub bank_code: Option<String>,
    pub order_info: Option<String>,
    pub pay_date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct VnpayGateway {
    config: VnpayConfig,
}

impl VnpayGateway {
    pub fn new(config: VnpayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VnpayConfig {
        &self.config
    }

    pub fn build_payment_url(&self, request: &PaymentUrlRequest) -> Result<String> {
        let amount = to_gateway_amount(request.amount).ok_or_else(|| {
            AppError::Payment(format!("Amount {} cannot be sent to the gateway", request.amount))
        })?;

        let offset = FixedOffset::east_opt(GATEWAY_UTC_OFFSET_SECS)
            .ok_or_else(|| AppError::Payment("Invalid gateway time zone".to_string()))?;
        let created = request.created_at.with_timezone(&offset);
        let expires = created + Duration::minutes(self.config.expire_minutes);

        let locale = request.locale.as_deref().unwrap_or(&self.config.locale);
        let currency = request
            .currency_code
            .as_deref()
            .unwrap_or(&self.config.currency_code);

        let mut params = PaymentParams::new();
        params
            .insert("vnp_Version", &self.config.version)
            .insert("vnp_Command", &self.config.command)
            .insert("vnp_TmnCode", &self.config.tmn_code)
            .insert("vnp_Locale", locale)
            .insert("vnp_CurrCode", currency)
            .insert("vnp_TxnRef", &request.txn_ref)
            .insert("vnp_OrderInfo", &request.order_info)
            .insert("vnp_OrderType", &self.config.order_type)
            .insert("vnp_Amount", amount)
            .insert("vnp_ReturnUrl", &self.config.return_url)
            .insert("vnp_IpAddr", &request.ip_addr)
            .insert("vnp_CreateDate", created.format(GATEWAY_DATE_FORMAT))
            .insert("vnp_ExpireDate", expires.format(GATEWAY_DATE_FORMAT));

        if let Some(bank_code) = request.bank_code.as_deref().filter(|code| !code.is_empty()) {
            params.insert("vnp_BankCode", bank_code);
        }

        let signature = sign(&params, &self.config.hash_secret);

        let mut url = Url::parse(&self.config.payment_url)
            .map_err(|e| AppError::Payment(format!("Invalid payment URL: {}", e)))?;
        url.set_query(Some(&format!(
            "{}&{}={}",
            canonical_query(&params),
            SECURE_HASH_KEY,
            signature
        )));

        debug!("Built payment URL for transaction {}", request.txn_ref);
        Ok(url.into())
    }

    /// Verifies the parameters of the customer's return redirect.
    pub fn verify_return_url(&self, params: &PaymentParams) -> VerificationResult {
        self.verify(params)
    }

    /// Verifies the parameters of a server-to-server IPN call.
    pub fn verify_ipn_call(&self, params: &PaymentParams) -> VerificationResult {
        self.verify(params)
    }

    fn verify(&self, params: &PaymentParams) -> VerificationResult {
        let field = |key: &str| params.get(key).map(str::to_string);
        let response_code = field("vnp_ResponseCode");

        let mut result = VerificationResult {
            is_verified: false,
            is_success: false,
            outcome: PaymentOutcome::ChecksumFailed,
            response_code: response_code.clone(),
            message: "Invalid checksum".to_string(),
            txn_ref: field("vnp_TxnRef"),
            amount: None,
            transaction_no: field("vnp_TransactionNo"),
            bank_code: field("vnp_BankCode"),
            order_info: field("vnp_OrderInfo"),
            pay_date: field("vnp_PayDate"),
        };

        let verified = match params.get(SECURE_HASH_KEY) {
            Some(supplied) => verify_signature(params, supplied, &self.config.hash_secret),
            None => false,
        };

        if !verified {
            warn!(
                "Rejected gateway callback with invalid checksum (txn_ref={:?})",
                result.txn_ref
            );
            return result;
        }

        result.is_verified = true;
        result.amount = params.get("vnp_Amount").and_then(from_gateway_amount);

        let code = match (&response_code, &result.txn_ref, result.amount) {
            (Some(code), Some(_), Some(_)) => code.as_str(),
            _ => {
                warn!("Verified gateway callback is missing required fields");
                result.outcome = PaymentOutcome::Unknown;
                result.message = response_message("").to_string();
                return result;
            }
        };

        result.outcome = PaymentOutcome::from_response_code(code);
        result.is_success = result.outcome == PaymentOutcome::Success;
        result.message = response_message(code).to_string();
        result
    }
}

fn to_gateway_amount(amount: Decimal) -> Option<i64> {
    if amount.is_sign_negative() {
        return None;
    }
    amount
        .checked_mul(Decimal::from(10_i64.pow(AMOUNT_SCALE)))?
        .round()
        .to_i64()
}

fn from_gateway_amount(raw: &str) -> Option<Decimal> {
    let minor: i64 = raw.trim().parse().ok()?;
    if minor < 0 {
        return None;
    }
    Some(Decimal::new(minor, AMOUNT_SCALE).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn gateway() -> VnpayGateway {
        VnpayGateway::new(VnpayConfig {
            tmn_code: "DEMO0001".into(),
            hash_secret: "SECRETKEY123".into(),
            ..VnpayConfig::default()
        })
    }

    fn callback(code: &str) -> PaymentParams {
        let mut params = PaymentParams::new()
            .with("vnp_TmnCode", "DEMO0001")
            .with("vnp_Amount", "15000000")
            .with("vnp_TxnRef", "order_42")
            .with("vnp_ResponseCode", code)
            .with("vnp_TransactionNo", "14422574")
            .with("vnp_BankCode", "NCB")
            .with("vnp_OrderInfo", "Gift box order")
            .with("vnp_PayDate", "20250621113532");
        let signature = sign(&params, "SECRETKEY123");
        params.insert(SECURE_HASH_KEY, signature);
        params
    }

    #[test]
    fn test_success_callback() {
        let result = gateway().verify_return_url(&callback("00"));
        assert!(result.is_verified);
        assert!(result.is_success);
        assert_eq!(result.outcome, PaymentOutcome::Success);
        assert_eq!(result.amount, Some(Decimal::from(150000)));
        assert_eq!(result.txn_ref.as_deref(), Some("order_42"));
        assert_eq!(result.transaction_no.as_deref(), Some("14422574"));
        assert_eq!(result.message, "Transaction successful");
    }

    #[test]
    fn test_outcomes_follow_response_code() {
        let gateway = gateway();
        assert_eq!(gateway.verify_ipn_call(&callback("24")).outcome, PaymentOutcome::Canceled);
        assert_eq!(gateway.verify_ipn_call(&callback("51")).outcome, PaymentOutcome::Failed);

        let unknown = gateway.verify_ipn_call(&callback("42"));
        assert!(unknown.is_verified);
        assert!(!unknown.is_success);
        assert_eq!(unknown.outcome, PaymentOutcome::Unknown);
    }

    #[test]
    fn test_wrong_hash_fails_whatever_the_code() {
        for code in ["00", "24", "51", "42"] {
            let mut params = callback(code);
            params.insert(SECURE_HASH_KEY, "wronghash");
            let result = gateway().verify_return_url(&params);
            assert!(!result.is_verified);
            assert!(!result.is_success);
            assert_eq!(result.outcome, PaymentOutcome::ChecksumFailed);
        }
    }

    #[test]
    fn test_missing_hash_fails() {
        let mut params = callback("00");
        params.remove(SECURE_HASH_KEY);
        let result = gateway().verify_ipn_call(&params);
        assert_eq!(result.outcome, PaymentOutcome::ChecksumFailed);
    }

    #[test]
    fn test_signed_but_malformed_amount_degrades_to_unknown() {
        let mut params = callback("00");
        params.remove(SECURE_HASH_KEY);
        params.insert("vnp_Amount", "a lot");
        let signature = sign(&params, "SECRETKEY123");
        params.insert(SECURE_HASH_KEY, signature);

        let result = gateway().verify_ipn_call(&params);
        assert!(result.is_verified);
        assert!(!result.is_success);
        assert_eq!(result.outcome, PaymentOutcome::Unknown);
        assert_eq!(result.amount, None);
    }

    #[test]
    fn test_hash_type_field_is_ignored() {
        let params = callback("00").with("vnp_SecureHashType", "HmacSHA512");
        assert!(gateway().verify_return_url(&params).is_success);
    }

    #[test]
    fn test_build_payment_url() {
        let created_at = Utc.with_ymd_and_hms(2025, 6, 21, 4, 35, 32).unwrap();
        let url = gateway()
            .build_payment_url(&PaymentUrlRequest {
                amount: Decimal::from(150000),
                txn_ref: "order_42".into(),
                order_info: "Gift box order".into(),
                ip_addr: "127.0.0.1".into(),
                locale: None,
                currency_code: None,
                bank_code: Some("NCB".into()),
                created_at,
            })
            .unwrap();

        let parsed = Url::parse(&url).unwrap();
        assert_eq!(parsed.host_str(), Some("sandbox.vnpayment.vn"));

        let query: HashMap<String, String> = parsed.query_pairs().into_owned().collect();
        assert_eq!(query["vnp_Amount"], "15000000");
        assert_eq!(query["vnp_Command"], "pay");
        assert_eq!(query["vnp_CreateDate"], "20250621113532");
        assert_eq!(query["vnp_ExpireDate"], "20250621115032");
        assert_eq!(query["vnp_Locale"], "vn");
        assert_eq!(query["vnp_CurrCode"], "VND");
        assert_eq!(query["vnp_BankCode"], "NCB");

        let signed: PaymentParams = parsed.query_pairs().into_owned().collect();
        let supplied = signed.get(SECURE_HASH_KEY).unwrap();
        assert!(verify_signature(&signed, supplied, "SECRETKEY123"));
    }

    #[test]
    fn test_build_rejects_negative_amount() {
        let result = gateway().build_payment_url(&PaymentUrlRequest {
            amount: Decimal::from(-1),
            txn_ref: "order_42".into(),
            order_info: "Gift box order".into(),
            ip_addr: "127.0.0.1".into(),
            locale: None,
            currency_code: None,
            bank_code: None,
            created_at: Utc::now(),
        });
        assert!(matches!(result, Err(AppError::Payment(_))));
    }
}
