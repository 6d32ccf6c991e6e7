use chrono::Utc;
use tracing::{error, info, warn};

use crate::{
    database::{NewOrder, OrderRepository, Repository},
    error::{AppError, Result},
    models::{CreatePaymentRequest, PaymentUrlResponse},
    payment::{
        is_exact_amount, reconcile_ipn, IpnResponse, PaymentParams, PaymentUrlRequest, VerificationResult,
        VnpayGateway,
    },
    validation::Validatable,
};

#[derive(Clone)]
pub struct PaymentService {
    gateway: VnpayGateway,
    orders: OrderRepository,
}

impl PaymentService {
    pub fn new(gateway: VnpayGateway, orders: OrderRepository) -> Self {
        Self { gateway, orders }
    }

    pub fn gateway(&self) -> &VnpayGateway {
        &self.gateway
    }

    /// Builds a checkout URL for `request`, recording a pending order under
    /// the order id the first time it is seen.
    ///
    /// The orders table stands in for the cart and order service the
    /// storefront checks out from: the first checkout for an order id fixes
    /// its total, and later checkouts and IPN callbacks are held to it.
    /// Callers are trusted to send the cart total on that first call.
    pub async fn create_payment_url(&self, request: CreatePaymentRequest, ip_addr: &str) -> Result<PaymentUrlResponse> {
        request.validate_request()?;

        let currency_code = request
            .currency
            .clone()
            .unwrap_or_else(|| self.gateway.config().currency_code.clone());

        if !is_exact_amount(request.amount, &currency_code) {
            return Err(AppError::BadRequest(format!(
                "Amount {} is not a valid {} amount",
                request.amount, currency_code
            )));
        }

        match self.orders.get_by_id(request.order_id.clone()).await? {
            Some(order) if order.is_completed() => {
                return Err(AppError::BadRequest(format!(
                    "Order {} has already been paid",
                    order.id
                )));
            }
            Some(order) if order.total != request.amount => {
                return Err(AppError::BadRequest(format!(
                    "Amount does not match the total of order {}",
                    order.id
                )));
            }
            Some(_) => {}
            None => {
                self.orders
                    .create(NewOrder {
                        id: request.order_id.clone(),
                        total: request.amount,
                        currency_code: currency_code.clone(),
                    })
                    .await?;
            }
        }

        let payment_url = self.gateway.build_payment_url(&PaymentUrlRequest {
            amount: request.amount,
            txn_ref: request.order_id.clone(),
            order_info: request.order_info,
            ip_addr: ip_addr.to_string(),
            locale: request.locale,
            currency_code: Some(currency_code),
            bank_code: request.bank_code,
            created_at: Utc::now(),
        })?;

        info!("Created payment URL for order {}", request.order_id);

        Ok(PaymentUrlResponse {
            payment_url,
            order_id: request.order_id,
            amount: request.amount,
        })
    }

    pub fn verify_return(&self, params: &PaymentParams) -> VerificationResult {
        self.gateway.verify_return_url(params)
    }

    /// Answers an IPN call. Never fails: internal errors become `UnknownError`
    /// so the gateway gets a well-formed acknowledgement.
    pub async fn handle_ipn(&self, params: &PaymentParams) -> IpnResponse {
        let result = self.gateway.verify_ipn_call(params);

        match self.settle(&result).await {
            Ok(response) => {
                info!(
                    "IPN for {:?} answered {} ({})",
                    result.txn_ref,
                    response.code(),
                    response.message()
                );
                response
            }
            Err(e) => {
                error!("Failed to process IPN for {:?}: {}", result.txn_ref, e);
                IpnResponse::UnknownError
            }
        }
    }

    async fn settle(&self, result: &VerificationResult) -> Result<IpnResponse> {
        let order = match result.txn_ref.as_deref() {
            Some(txn_ref) if result.is_verified && result.is_success => {
                self.orders.get_by_id(txn_ref.to_string()).await?
            }
            _ => None,
        };

        let response = reconcile_ipn(result, order.as_ref());

        if let (IpnResponse::Success, Some(order)) = (response, &order) {
            if !self.orders.mark_completed(&order.id).await? {
                warn!("Order {} was confirmed by a concurrent IPN", order.id);
                return Ok(IpnResponse::OrderAlreadyConfirmed);
            }
            info!("Order {} marked as completed", order.id);
        }

        Ok(response)
    }
}
