//! VNPay storefront endpoints: checkout URL, return redirect and IPN.

use crate::{
    error::Result,
    models::CreatePaymentRequest,
    payment::{PaymentParams, VerificationResult},
    AppState,
};
use axum::{
    extract::{ConnectInfo, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::net::SocketAddr;
use tracing::info;

const FALLBACK_IP: &str = "127.0.0.1";

/// Return-redirect result plus the payment session status the storefront
/// should record for it.
#[derive(Debug, Serialize)]
struct PaymentReturnView {
    #[serde(flatten)]
    result: VerificationResult,
    session_status: &'static str,
}

/// First hop of `X-Forwarded-For`, then the peer address.
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| FALLBACK_IP.to_string())
}

pub async fn create_payment(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse> {
    info!("POST /store/vnpay - order: {}", request.order_id);
    let ip_addr = client_ip(&headers, connect_info.map(|ConnectInfo(addr)| addr));
    let response = state.payments.create_payment_url(request, &ip_addr).await?;
    Ok(Json(response))
}

pub async fn payment_return(
    State(state): State<AppState>,
    Query(params): Query<PaymentParams>,
) -> impl IntoResponse {
    let result = state.payments.verify_return(&params);
    info!(
        "GET /store/vnpay/return - txn_ref: {:?}, outcome: {}",
        result.txn_ref, result.outcome
    );
    Json(PaymentReturnView {
        session_status: result.outcome.session_status(),
        result,
    })
}

pub async fn payment_ipn(
    State(state): State<AppState>,
    Query(params): Query<PaymentParams>,
) -> impl IntoResponse {
    info!("IPN received for {:?}", params.get("vnp_TxnRef"));
    state.payments.handle_ipn(&params).await
}
