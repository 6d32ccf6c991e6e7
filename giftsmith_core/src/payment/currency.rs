//! Conversion between major units and a currency's smallest unit.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const ZERO_DECIMAL_CURRENCIES: [&str; 16] = [
    "BIF", "CLP", "DJF", "GNF", "JPY", "KMF", "KRW", "MGA", "PYG", "RWF", "UGX", "VND", "VUV",
    "XAF", "XOF", "XPF",
];

const THREE_DECIMAL_CURRENCIES: [&str; 6] = ["BHD", "IQD", "JOD", "KWD", "OMR", "TND"];

pub fn decimal_places(currency: &str) -> u32 {
    let currency = currency.to_ascii_uppercase();
    if ZERO_DECIMAL_CURRENCIES.contains(&currency.as_str()) {
        0
    } else if THREE_DECIMAL_CURRENCIES.contains(&currency.as_str()) {
        3
    } else {
        2
    }
}

pub fn currency_multiplier(currency: &str) -> i64 {
    10_i64.pow(decimal_places(currency))
}

/// Converts a major-unit amount into the smallest unit, rounding half away
/// from zero. Three-decimal currencies are further rounded up to a multiple
/// of ten. `None` when the result does not fit in an `i64`.
pub fn to_smallest_unit(amount: Decimal, currency: &str) -> Option<i64> {
    let multiplier = Decimal::from(currency_multiplier(currency));
    let mut smallest = amount
        .checked_mul(multiplier)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    if decimal_places(currency) == 3 {
        let ten = Decimal::from(10);
        smallest = (smallest / ten).ceil() * ten;
    }

    smallest.to_i64()
}

pub fn from_smallest_unit(amount: i64, currency: &str) -> Decimal {
    Decimal::new(amount, decimal_places(currency)).normalize()
}

/// Whether `amount` is a whole number of the currency's smallest unit.
pub fn is_exact_amount(amount: Decimal, currency: &str) -> bool {
    to_smallest_unit(amount, currency)
        .is_some_and(|smallest| from_smallest_unit(smallest, currency) == amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn test_multipliers() {
        assert_eq!(currency_multiplier("VND"), 1);
        assert_eq!(currency_multiplier("jpy"), 1);
        assert_eq!(currency_multiplier("KWD"), 1000);
        assert_eq!(currency_multiplier("USD"), 100);
        assert_eq!(currency_multiplier("EUR"), 100);
    }

    #[test]
    fn test_to_smallest_unit() {
        assert_eq!(to_smallest_unit(dec("150000"), "VND"), Some(150000));
        assert_eq!(to_smallest_unit(dec("19.99"), "USD"), Some(1999));
        assert_eq!(to_smallest_unit(dec("0.125"), "USD"), Some(13));
        assert_eq!(to_smallest_unit(dec("10.5"), "VND"), Some(11));
        assert_eq!(to_smallest_unit(dec("1.234"), "KWD"), Some(1240));
        assert_eq!(to_smallest_unit(dec("1.230"), "KWD"), Some(1230));
    }

    #[test]
    fn test_from_smallest_unit() {
        assert_eq!(from_smallest_unit(1999, "USD"), dec("19.99"));
        assert_eq!(from_smallest_unit(150000, "VND"), dec("150000"));
        assert_eq!(from_smallest_unit(1240, "KWD"), dec("1.24"));
    }

    #[test]
    fn test_is_exact_amount() {
        assert!(is_exact_amount(dec("150000"), "VND"));
        assert!(is_exact_amount(dec("150000.00"), "vnd"));
        assert!(!is_exact_amount(dec("150000.5"), "VND"));
        assert!(is_exact_amount(dec("19.99"), "USD"));
        assert!(!is_exact_amount(dec("19.999"), "USD"));
        assert!(is_exact_amount(dec("1.23"), "KWD"));
    }
}
