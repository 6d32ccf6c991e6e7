//! Secure-hash signing of gateway parameters.
//!
//! The signing input is the canonical query string: hash fields removed,
//! keys sorted, pairs form-urlencoded and joined with `&`. The hash is a
//! lowercase hex HMAC-SHA512 of that string keyed with the merchant secret.

use hmac::{Hmac, Mac};
use sha2::Sha512;
use url::form_urlencoded;

use super::params::PaymentParams;

type HmacSha512 = Hmac<Sha512>;

pub const SECURE_HASH_KEY: &str = "vnp_SecureHash";
pub const SECURE_HASH_TYPE_KEY: &str = "vnp_SecureHashType";

fn is_hash_field(key: &str) -> bool {
    key == SECURE_HASH_KEY || key == SECURE_HASH_TYPE_KEY
}

pub fn canonical_query(params: &PaymentParams) -> String {
    let mut pairs: Vec<(&str, &str)> = params.iter().filter(|(key, _)| !is_hash_field(key)).collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

fn keyed_mac(secret: &str) -> HmacSha512 {
    // HMAC pads or hashes the key, so every length is accepted.
    HmacSha512::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length")
}

pub fn sign(params: &PaymentParams, secret: &str) -> String {
    let mut mac = keyed_mac(secret);
    mac.update(canonical_query(params).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Checks `supplied` (hex, either case) against the expected hash in constant time.
pub fn verify_signature(params: &PaymentParams, supplied: &str, secret: &str) -> bool {
    let expected = match hex::decode(supplied.trim()) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    let mut mac = keyed_mac(secret);
    mac.update(canonical_query(params).as_bytes());
    mac.verify_slice(&expected).is_ok()
}
