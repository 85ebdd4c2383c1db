//! Stock movement types
//!
//! 库存变动类型。Inbound types add stock, outbound types remove it,
//! adjustment corrects in either direction.

use serde::{Deserialize, Serialize};

/// Stock movement type, kebab-case on the wire
/// (`purchase-in`, `return-in`, `sale-out`, `loss-out`, `adjustment`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovementType {
    PurchaseIn,
    ReturnIn,
    SaleOut,
    LossOut,
    Adjustment,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::PurchaseIn => "purchase-in",
            MovementType::ReturnIn => "return-in",
            MovementType::SaleOut => "sale-out",
            MovementType::LossOut => "loss-out",
            MovementType::Adjustment => "adjustment",
        }
    }

    /// Parse the wire token. None for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "purchase-in" => Some(MovementType::PurchaseIn),
            "return-in" => Some(MovementType::ReturnIn),
            "sale-out" => Some(MovementType::SaleOut),
            "loss-out" => Some(MovementType::LossOut),
            "adjustment" => Some(MovementType::Adjustment),
            _ => None,
        }
    }

    pub fn is_inbound(&self) -> bool {
        matches!(self, MovementType::PurchaseIn | MovementType::ReturnIn)
    }

    pub fn is_outbound(&self) -> bool {
        matches!(self, MovementType::SaleOut | MovementType::LossOut)
    }

    /// Check that a delta carries the natural sign for this movement type.
    /// Inbound must be positive, outbound negative, adjustment non-zero.
    pub fn accepts_delta(&self, delta: i64) -> bool {
        if delta == 0 {
            return false;
        }
        if self.is_inbound() {
            return delta > 0;
        }
        if self.is_outbound() {
            return delta < 0;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_types_require_positive_delta() {
        assert!(MovementType::PurchaseIn.accepts_delta(10));
        assert!(!MovementType::PurchaseIn.accepts_delta(-10));
        assert!(MovementType::ReturnIn.accepts_delta(1));
        assert!(!MovementType::ReturnIn.accepts_delta(0));
    }

    #[test]
    fn outbound_types_require_negative_delta() {
        assert!(MovementType::SaleOut.accepts_delta(-3));
        assert!(!MovementType::SaleOut.accepts_delta(3));
        assert!(MovementType::LossOut.accepts_delta(-1));
        assert!(!MovementType::LossOut.accepts_delta(0));
    }

    #[test]
    fn adjustment_accepts_either_sign_but_not_zero() {
        assert!(MovementType::Adjustment.accepts_delta(5));
        assert!(MovementType::Adjustment.accepts_delta(-5));
        assert!(!MovementType::Adjustment.accepts_delta(0));
    }

    #[test]
    fn wire_tokens_round_trip() {
        for (token, mt) in [
            ("purchase-in", MovementType::PurchaseIn),
            ("return-in", MovementType::ReturnIn),
            ("sale-out", MovementType::SaleOut),
            ("loss-out", MovementType::LossOut),
            ("adjustment", MovementType::Adjustment),
        ] {
            assert_eq!(MovementType::parse(token), Some(mt));
            assert_eq!(mt.as_str(), token);
        }
        assert_eq!(MovementType::parse("theft-out"), None);
    }
}
