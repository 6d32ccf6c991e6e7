use serde::Serialize;
use std::fmt;

pub const SUCCESS_CODE: &str = "00";
pub const CANCELED_CODE: &str = "24";

const FAILURE_CODES: [&str; 13] = [
    "01", "02", "07", "09", "10", "11", "12", "13", "51", "65", "75", "79", "99",
];

/// Classification of a gateway callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOutcome {
    ChecksumFailed,
    Success,
    Canceled,
    Failed,
    Unknown,
}

impl PaymentOutcome {
    /// Maps a response code of a callback whose signature already verified.
    pub fn from_response_code(code: &str) -> Self {
        match code {
            SUCCESS_CODE => PaymentOutcome::Success,
            CANCELED_CODE => PaymentOutcome::Canceled,
            code if FAILURE_CODES.contains(&code) => PaymentOutcome::Failed,
            _ => PaymentOutcome::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentOutcome::ChecksumFailed => "checksum_failed",
            PaymentOutcome::Success => "success",
            PaymentOutcome::Canceled => "canceled",
            PaymentOutcome::Failed => "failed",
            PaymentOutcome::Unknown => "unknown",
        }
    }

    /// Payment session status a storefront records for this outcome.
    pub fn session_status(&self) -> &'static str {
        match self {
            PaymentOutcome::Success => "captured",
            PaymentOutcome::Failed => "error",
            PaymentOutcome::Canceled => "canceled",
            PaymentOutcome::ChecksumFailed | PaymentOutcome::Unknown => "pending",
        }
    }
}

impl fmt::Display for PaymentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn response_message(code: &str) -> &'static str {
    match code {
        "00" => "Transaction successful",
        "01" => "Transaction not completed",
        "02" => "Transaction failed",
        "07" => "Amount debited. Transaction flagged as suspicious (possible fraud or unusual activity)",
        "09" => "Transaction failed: card or account is not registered for internet banking",
        "10" => "Transaction failed: card or account details were entered incorrectly more than 3 times",
        "11" => "Transaction failed: the payment window expired, please try again",
        "12" => "Transaction failed: card or account is locked",
        "13" => "Transaction failed: incorrect one-time password (OTP)",
        "24" => "Transaction failed: the customer canceled the transaction",
        "51" => "Transaction failed: insufficient account balance",
        "65" => "Transaction failed: the account exceeded its daily transaction limit",
        "75" => "The paying bank is under maintenance",
        "79" => "Transaction failed: payment password entered incorrectly too many times",
        "99" => "Other errors",
        _ => "Unknown error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_table() {
        assert_eq!(PaymentOutcome::from_response_code("00"), PaymentOutcome::Success);
        assert_eq!(PaymentOutcome::from_response_code("24"), PaymentOutcome::Canceled);
        for code in FAILURE_CODES {
            assert_eq!(PaymentOutcome::from_response_code(code), PaymentOutcome::Failed, "code {}", code);
        }
        assert_eq!(PaymentOutcome::from_response_code("03"), PaymentOutcome::Unknown);
        assert_eq!(PaymentOutcome::from_response_code(""), PaymentOutcome::Unknown);
        assert_eq!(PaymentOutcome::from_response_code("0"), PaymentOutcome::Unknown);
    }

    #[test]
    fn test_every_known_code_has_a_message() {
        assert_eq!(response_message("00"), "Transaction successful");
        for code in FAILURE_CODES.iter().chain([&CANCELED_CODE]) {
            assert_ne!(response_message(code), "Unknown error", "code {}", code);
        }
        assert_eq!(response_message("42"), "Unknown error");
    }

    #[test]
    fn test_session_status() {
        assert_eq!(PaymentOutcome::Success.session_status(), "captured");
        assert_eq!(PaymentOutcome::Failed.session_status(), "error");
        assert_eq!(PaymentOutcome::Canceled.session_status(), "canceled");
        assert_eq!(PaymentOutcome::Unknown.session_status(), "pending");
    }

    #[test]
    fn test_serializes_snake_case() {
        let json = serde_json::to_string(&PaymentOutcome::ChecksumFailed).unwrap();
        assert_eq!(json, "\"checksum_failed\"");
    }
}
