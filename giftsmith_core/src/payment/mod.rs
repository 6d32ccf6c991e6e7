//! VNPay payment gateway support: signing, callback verification and IPN
//! acknowledgements.

pub mod currency;
pub mod gateway;
pub mod ipn;
pub mod params;
pub mod response_code;
pub mod signature;

pub use currency::{currency_multiplier, from_smallest_unit, is_exact_amount, to_smallest_unit};
pub use gateway::{PaymentUrlRequest, VerificationResult, VnpayGateway};
pub use ipn::{reconcile_ipn, IpnResponse};
pub use params::PaymentParams;
pub use response_code::{response_message, PaymentOutcome};
pub use signature::{canonical_query, sign, verify_signature, SECURE_HASH_KEY, SECURE_HASH_TYPE_KEY};
