//! # Area-Weight Calculations
//!
//! GSM (grams per square meter) and piece weight share one formula core:
//! the sample area in square meters.
//!
//! ```text
//! area_m2 = (length / per_meter) × (width / per_meter)
//! gsm     = weight_g / area_m2
//! weight  = area_m2 × gsm
//! ```
//!
//! ## Example
//!
//! ```rust
//! use fabric_core::calculations::area_weight::{calculate_gsm, GsmInput};
//! use fabric_core::units::LinearUnit;
//!
//! let input = GsmInput {
//!     length: "100".to_string(),
//!     width: "100".to_string(),
//!     weight: "100".to_string(),
//!     unit: LinearUnit::Cm,
//! };
//!
//! let result = calculate_gsm(&input);
//! assert_eq!(result.gsm_display(), "100.0");
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::parse::{format_fixed, parse_nonzero, round_to};
use crate::units::{Grams, Kilograms, LinearUnit, Pounds, SquareMeters};

/// grams per square meter -> ounces per square yard
pub const OZ_PER_SQ_YD_PER_GSM: f64 = 0.0294935;

/// Sample area from two dimensions in the selected unit.
///
/// `None` when either dimension is missing, non-numeric or zero.
pub fn area_m2(length: &str, width: &str, unit: LinearUnit) -> Option<SquareMeters> {
    let length = parse_nonzero(length)?;
    let width = parse_nonzero(width)?;
    let area = unit.to_meters(length) * unit.to_meters(width);
    if area.0 == 0.0 {
        return None;
    }
    Some(area)
}

// ============================================================================
// GSM
// ============================================================================

/// Input for the GSM calculator.
///
/// ## JSON Example
///
/// ```json
/// { "length": "10", "width": "10", "weight": "1.85", "unit": "cm" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GsmInput {
    /// Sample length in `unit`
    pub length: String,
    /// Sample width in `unit`
    pub width: String,
    /// Sample weight in grams
    pub weight: String,
    /// Unit of length and width
    pub unit: LinearUnit,
}

/// Result of the GSM calculator. All zeros until every input is usable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GsmResult {
    /// Areal density, g/m², 1 decimal
    pub gsm: f64,
    /// Areal density, oz/yd², 2 decimals
    pub oz_per_sq_yd: f64,
    /// Sample area in m² (full precision)
    pub area_m2: f64,
}

impl GsmResult {
    /// GSM as displayed (e.g., "100.0")
    pub fn gsm_display(&self) -> String {
        format_fixed(self.gsm, 1)
    }

    /// oz/yd² as displayed (e.g., "2.95")
    pub fn oz_display(&self) -> String {
        format_fixed(self.oz_per_sq_yd, 2)
    }
}

/// Calculate GSM from sample dimensions and weight.
pub fn calculate_gsm(input: &GsmInput) -> GsmResult {
    let Some(weight) = parse_nonzero(&input.weight) else {
        return GsmResult::default();
    };
    let Some(area) = area_m2(&input.length, &input.width, input.unit) else {
        return GsmResult::default();
    };

    let gsm = weight / area.0;
    debug!(area_m2 = area.0, weight_g = weight, gsm, unit = %input.unit, "gsm");

    GsmResult {
        gsm: round_to(gsm, 1),
        oz_per_sq_yd: round_to(gsm * OZ_PER_SQ_YD_PER_GSM, 2),
        area_m2: area.0,
    }
}

// ============================================================================
// Piece Weight
// ============================================================================

/// Input for the piece weight calculator.
///
/// ## JSON Example
///
/// ```json
/// { "length": "70", "width": "140", "gsm": "450", "unit": "cm" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieceWeightInput {
    /// Piece length in `unit`
    pub length: String,
    /// Piece width in `unit`
    pub width: String,
    /// Fabric GSM (g/m²)
    pub gsm: String,
    /// Unit of length and width
    pub unit: LinearUnit,
}

/// Result of the piece weight calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PieceWeightResult {
    /// Weight in grams, 1 decimal
    pub grams: f64,
    /// Weight in kilograms, 2 decimals
    pub kilograms: f64,
    /// Weight in pounds, 2 decimals
    pub pounds: f64,
}

impl PieceWeightResult {
    /// (grams, kilograms, pounds) as displayed
    pub fn display(&self) -> (String, String, String) {
        (
            format_fixed(self.grams, 1),
            format_fixed(self.kilograms, 2),
            format_fixed(self.pounds, 2),
        )
    }
}

/// Calculate the weight of a piece from its dimensions and GSM.
pub fn calculate_piece_weight(input: &PieceWeightInput) -> PieceWeightResult {
    let Some(gsm) = parse_nonzero(&input.gsm) else {
        return PieceWeightResult::default();
    };
    let Some(area) = area_m2(&input.length, &input.width, input.unit) else {
        return PieceWeightResult::default();
    };

    let weight = Grams(area.0 * gsm);
    let kg: Kilograms = weight.into();
    let lb: Pounds = weight.into();
    debug!(area_m2 = area.0, gsm, weight_g = weight.0, "piece weight");

    PieceWeightResult {
        grams: round_to(weight.0, 1),
        kilograms: round_to(kg.0, 2),
        pounds: round_to(lb.0, 2),
    }
}

/// The piece weight formula as shown next to the result for `unit`
pub fn piece_weight_formula(unit: LinearUnit) -> &'static str {
    match unit {
        LinearUnit::Mm => "(Length × Width × GSM) / 1,000,000",
        LinearUnit::Cm => "(Length × Width × GSM) / 10000",
        LinearUnit::M => "Length × Width × GSM",
        LinearUnit::In => "(Length × Width × GSM) / 1550",
        LinearUnit::Ft => "(Length × Width × GSM) / 10.7639",
        LinearUnit::Yd => "(Length × Width × GSM) / 1.19599",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gsm_input(length: &str, width: &str, weight: &str, unit: LinearUnit) -> GsmInput {
        GsmInput {
            length: length.to_string(),
            width: width.to_string(),
            weight: weight.to_string(),
            unit,
        }
    }

    #[test]
    fn test_gsm_square_meter_sample() {
        let result = calculate_gsm(&gsm_input("100", "100", "100", LinearUnit::Cm));
        assert_eq!(result.gsm_display(), "100.0");
        assert!((result.area_m2 - 1.0).abs() < 1e-12);
        assert_eq!(result.oz_display(), "2.95");
    }

    #[test]
    fn test_gsm_small_swatch() {
        // 10 cm × 10 cm = 0.01 m², 4.5 g -> 450 g/m²
        let result = calculate_gsm(&gsm_input("10", "10", "4.5", LinearUnit::Cm));
        assert_eq!(result.gsm, 450.0);
    }

    #[test]
    fn test_gsm_in_millimeters() {
        let result = calculate_gsm(&gsm_input("1000", "1000", "250", LinearUnit::Mm));
        assert_eq!(result.gsm, 250.0);
    }

    #[test]
    fn test_gsm_missing_or_zero_input_is_zero() {
        assert_eq!(calculate_gsm(&gsm_input("", "100", "100", LinearUnit::Cm)), GsmResult::default());
        assert_eq!(calculate_gsm(&gsm_input("100", "0", "100", LinearUnit::Cm)), GsmResult::default());
        assert_eq!(calculate_gsm(&gsm_input("100", "100", "abc", LinearUnit::Cm)), GsmResult::default());
        assert_eq!(calculate_gsm(&GsmInput::default()).gsm_display(), "0.0");
    }

    #[test]
    fn test_gsm_negative_dimension_is_not_rejected() {
        let result = calculate_gsm(&gsm_input("-100", "100", "100", LinearUnit::Cm));
        assert_eq!(result.gsm, -100.0);
    }

    #[test]
    fn test_piece_weight() {
        let input = PieceWeightInput {
            length: "100".to_string(),
            width: "50".to_string(),
            gsm: "400".to_string(),
            unit: LinearUnit::Cm,
        };
        let result = calculate_piece_weight(&input);
        assert_eq!(result.grams, 200.0);
        assert_eq!(result.kilograms, 0.2);
        assert_eq!(result.pounds, 0.44);
        assert_eq!(result.display(), ("200.0".to_string(), "0.20".to_string(), "0.44".to_string()));
    }

    #[test]
    fn test_piece_weight_missing_gsm() {
        let input = PieceWeightInput {
            length: "100".to_string(),
            width: "50".to_string(),
            gsm: String::new(),
            unit: LinearUnit::In,
        };
        let result = calculate_piece_weight(&input);
        assert_eq!(result.display(), ("0.0".to_string(), "0.00".to_string(), "0.00".to_string()));
    }

    #[test]
    fn test_gsm_and_piece_weight_are_inverse() {
        let gsm = calculate_gsm(&gsm_input("36", "36", "300", LinearUnit::In));
        let piece = calculate_piece_weight(&PieceWeightInput {
            length: "36".to_string(),
            width: "36".to_string(),
            gsm: gsm.gsm.to_string(),
            unit: LinearUnit::In,
        });
        assert!((piece.grams - 300.0).abs() < 0.1);
    }

    #[test]
    fn test_formula_text() {
        assert_eq!(piece_weight_formula(LinearUnit::Cm), "(Length × Width × GSM) / 10000");
        assert_eq!(piece_weight_formula(LinearUnit::M), "Length × Width × GSM");
    }

    #[test]
    fn test_input_deserializes_with_defaults() {
        let input: GsmInput = serde_json::from_str(r#"{"length":"10","width":"10","weight":"2"}"#).unwrap();
        assert_eq!(input.unit, LinearUnit::Cm);
    }
}
