//! Acknowledgements returned to the gateway's IPN calls.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Serialize, Serializer};

use super::gateway::VerificationResult;
use crate::models::Order;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpnResponse {
    Success,
    OrderNotFound,
    OrderAlreadyConfirmed,
    InvalidAmount,
    FailChecksum,
    UnknownError,
}

impl IpnResponse {
    pub fn code(&self) -> &'static str {
        match self {
            IpnResponse::Success => "00",
            IpnResponse::OrderNotFound => "01",
            IpnResponse::OrderAlreadyConfirmed => "02",
            IpnResponse::InvalidAmount => "04",
            IpnResponse::FailChecksum => "97",
            IpnResponse::UnknownError => "99",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            IpnResponse::Success => "Confirm Success",
            IpnResponse::OrderNotFound => "Order not found",
            IpnResponse::OrderAlreadyConfirmed => "Order already confirmed",
            IpnResponse::InvalidAmount => "Invalid amount",
            IpnResponse::FailChecksum => "Fail checksum",
            IpnResponse::UnknownError => "Unknown error",
        }
    }
}

#[derive(Serialize)]
struct Acknowledgement {
    #[serde(rename = "RspCode")]
    rsp_code: &'static str,
    #[serde(rename = "Message")]
    message: &'static str,
}

impl Serialize for IpnResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Acknowledgement {
            rsp_code: self.code(),
            message: self.message(),
        }
        .serialize(serializer)
    }
}

/// The gateway retries on anything but a 200, so every acknowledgement,
/// including failures, is sent with that status.
impl IntoResponse for IpnResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Decides the acknowledgement for a verified IPN against the stored order.
/// Checks run in a fixed order and the first failing one wins.
pub fn reconcile_ipn(result: &VerificationResult, order: Option<&Order>) -> IpnResponse {
    if !result.is_verified {
        return IpnResponse::FailChecksum;
    }

    if !result.is_success {
        return IpnResponse::UnknownError;
    }

    let order = match order {
        Some(order) if result.txn_ref.as_deref() == Some(order.id.as_str()) => order,
        _ => return IpnResponse::OrderNotFound,
    };

    if result.amount != Some(order.total) {
        return IpnResponse::InvalidAmount;
    }

    if order.is_completed() {
        return IpnResponse::OrderAlreadyConfirmed;
    }

    IpnResponse::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;
    use crate::payment::PaymentOutcome;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn verified(amount: i64) -> VerificationResult {
        VerificationResult {
            is_verified: true,
            is_success: true,
            outcome: PaymentOutcome::Success,
            response_code: Some("00".into()),
            message: "Transaction successful".into(),
            txn_ref: Some("order_42".into()),
            amount: Some(Decimal::from(amount)),
            transaction_no: Some("14422574".into()),
            bank_code: Some("NCB".into()),
            order_info: None,
            pay_date: None,
        }
    }

    fn order(status: OrderStatus) -> Order {
        Order {
            id: "order_42".into(),
            total: Decimal::new(15000000, 2),
            currency_code: "VND".into(),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(IpnResponse::FailChecksum).unwrap();
        assert_eq!(value, serde_json::json!({"RspCode": "97", "Message": "Fail checksum"}));
    }

    #[test]
    fn test_reconcile_happy_path() {
        let pending = order(OrderStatus::Pending);
        assert_eq!(reconcile_ipn(&verified(150000), Some(&pending)), IpnResponse::Success);
    }

    #[test]
    fn test_reconcile_check_order() {
        let completed = order(OrderStatus::Completed);

        let mut unverified = verified(1);
        unverified.is_verified = false;
        unverified.is_success = false;
        assert_eq!(reconcile_ipn(&unverified, None), IpnResponse::FailChecksum);

        let mut failed = verified(1);
        failed.is_success = false;
        assert_eq!(reconcile_ipn(&failed, Some(&completed)), IpnResponse::UnknownError);

        assert_eq!(reconcile_ipn(&verified(1), None), IpnResponse::OrderNotFound);

        let mut other_ref = verified(150000);
        other_ref.txn_ref = Some("order_43".into());
        assert_eq!(reconcile_ipn(&other_ref, Some(&completed)), IpnResponse::OrderNotFound);

        assert_eq!(reconcile_ipn(&verified(1), Some(&completed)), IpnResponse::InvalidAmount);
        assert_eq!(
            reconcile_ipn(&verified(150000), Some(&completed)),
            IpnResponse::OrderAlreadyConfirmed
        );
    }
}
