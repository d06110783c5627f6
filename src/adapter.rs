//! Adapter layer: converts between the engine's f64 world and the ledger's
//! Decimal arithmetic.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Convert f64 to Decimal, saturating at `Decimal::MAX`/`Decimal::MIN` for
/// magnitudes Decimal cannot hold. NaN becomes zero.
pub fn to_decimal(v: f64) -> Decimal {
    if v.is_nan() {
        return Decimal::ZERO;
    }
    match Decimal::from_f64(v) {
        Some(d) => d,
        None if v.is_sign_negative() => Decimal::MIN,
        None => Decimal::MAX,
    }
}

/// Convert Decimal to f64.
pub fn from_decimal(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}
