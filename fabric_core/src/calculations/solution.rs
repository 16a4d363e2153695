//! # Solution Preparation & Dilution
//!
//! Two independent lab recipes:
//!
//! - **Solution preparation**: chemical mass for a dosage and target volume,
//!   `chemical_g = dosage_g_per_l × volume_l`.
//! - **Dilution**: stock volume for a target concentration,
//!   `V1 = C2 × V2 / C1`, `water = V2 - V1` (volumes in ml).
//!
//! Asking for a target at or above the stock concentration is reported as a
//! constraint violation on `target_concentration`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::CalcError;
use crate::parse::{format_fixed, parse_nonzero, round_to};
use crate::units::{Liters, VolumeUnit};

/// Instruction shown until dosage and volume are entered
pub const SOLUTION_PLACEHOLDER: &str = "Enter dosage and volume to see instructions.";

/// Instruction shown until concentrations and volume are entered
pub const DILUTION_PLACEHOLDER: &str = "Enter concentrations and volume to see instructions.";

/// Instruction shown alongside the dilution constraint violation
pub const DILUTION_INVALID: &str = "Target concentration cannot be higher than chemical concentration.";

// ============================================================================
// Solution Preparation
// ============================================================================

/// Input for solution preparation.
///
/// ## JSON Example
///
/// ```json
/// { "dosage": "50", "volume": "10", "unit": "liters" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolutionInput {
    /// Chemical dosage (g/L)
    pub dosage: String,
    /// Target volume in `unit`
    pub volume: String,
    pub unit: VolumeUnit,
}

/// Result of solution preparation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionResult {
    /// Chemical to dissolve (g), 2 decimals
    pub required_chemical_g: f64,
    /// Target volume normalized to liters
    pub volume_liters: f64,
    /// Step-by-step instruction, or the placeholder
    pub instructions: String,
}

impl SolutionResult {
    /// Required chemical as displayed (e.g., "500.00")
    pub fn required_display(&self) -> String {
        format_fixed(self.required_chemical_g, 2)
    }
}

/// Calculate the chemical mass for a solution.
pub fn calculate_solution(input: &SolutionInput) -> SolutionResult {
    let (Some(dosage), Some(volume)) = (parse_nonzero(&input.dosage), parse_nonzero(&input.volume)) else {
        return SolutionResult {
            required_chemical_g: 0.0,
            volume_liters: 0.0,
            instructions: SOLUTION_PLACEHOLDER.to_string(),
        };
    };

    let liters: Liters = input.unit.to_liters(volume);
    let required = dosage * liters.0;
    debug!(dosage, volume_l = liters.0, required_g = required, "solution");

    SolutionResult {
        required_chemical_g: round_to(required, 2),
        volume_liters: liters.0,
        instructions: format!(
            "Dissolve {}g of chemical in some water, then add water to reach a final volume of {} {}.",
            format_fixed(required, 2),
            volume,
            input.unit
        ),
    }
}

// ============================================================================
// Dilution
// ============================================================================

/// Input for dilution (C1·V1 = C2·V2).
///
/// ## JSON Example
///
/// ```json
/// { "stock_concentration": "100", "target_concentration": "10", "target_volume": "1000" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DilutionInput {
    /// C1: concentration of the chemical as supplied (%)
    pub stock_concentration: String,
    /// C2: concentration wanted (%)
    pub target_concentration: String,
    /// V2: volume wanted (ml)
    pub target_volume: String,
}

/// Result of a dilution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DilutionResult {
    /// V1: stock to take (ml), 2 decimals
    pub chemical_ml: f64,
    /// Water to add (ml), 2 decimals
    pub water_ml: f64,
    pub instructions: String,
    /// Constraint violation, if any
    pub error: Option<CalcError>,
}

impl DilutionResult {
    fn placeholder(instructions: &str, error: Option<CalcError>) -> Self {
        DilutionResult {
            chemical_ml: 0.0,
            water_ml: 0.0,
            instructions: instructions.to_string(),
            error,
        }
    }

    /// (chemical, water) as displayed; "Error" while a violation stands
    pub fn display(&self) -> (String, String) {
        if self.error.is_some() {
            return ("Error".to_string(), "Error".to_string());
        }
        (format_fixed(self.chemical_ml, 2), format_fixed(self.water_ml, 2))
    }
}

/// Solve C1·V1 = C2·V2 for V1 and the make-up water.
pub fn calculate_dilution(input: &DilutionInput) -> DilutionResult {
    let (Some(c1), Some(c2), Some(v2)) = (
        parse_nonzero(&input.stock_concentration),
        parse_nonzero(&input.target_concentration),
        parse_nonzero(&input.target_volume),
    ) else {
        return DilutionResult::placeholder(DILUTION_PLACEHOLDER, None);
    };

    if c2 >= c1 {
        debug!(c1, c2, "target concentration not below stock");
        return DilutionResult::placeholder(
            DILUTION_INVALID,
            Some(CalcError::constraint_violated(
                "target_concentration",
                "Target concentration cannot exceed chemical concentration",
            )),
        );
    }

    let v1 = (c2 * v2) / c1;
    let water = v2 - v1;
    debug!(c1, c2, v2, v1, water, "dilution");

    DilutionResult {
        chemical_ml: round_to(v1, 2),
        water_ml: round_to(water, 2),
        instructions: format!(
            "Take {}ml of chemical and add {}ml of water to make {}ml of solution.",
            format_fixed(v1, 2),
            format_fixed(water, 2),
            v2
        ),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dilution(c1: &str, c2: &str, v2: &str) -> DilutionInput {
        DilutionInput {
            stock_concentration: c1.to_string(),
            target_concentration: c2.to_string(),
            target_volume: v2.to_string(),
        }
    }

    #[test]
    fn test_solution_in_liters() {
        let input = SolutionInput {
            dosage: "50".to_string(),
            volume: "10".to_string(),
            unit: VolumeUnit::Liters,
        };
        let result = calculate_solution(&input);
        assert_eq!(result.required_display(), "500.00");
        assert_eq!(
            result.instructions,
            "Dissolve 500.00g of chemical in some water, then add water to reach a final volume of 10 L."
        );
    }

    #[test]
    fn test_solution_volume_normalization() {
        let ml = calculate_solution(&SolutionInput {
            dosage: "20".to_string(),
            volume: "250".to_string(),
            unit: VolumeUnit::Milliliters,
        });
        assert_eq!(ml.required_chemical_g, 5.0);
        assert!(ml.instructions.ends_with("250 ml."));

        let gal = calculate_solution(&SolutionInput {
            dosage: "1".to_string(),
            volume: "1".to_string(),
            unit: VolumeUnit::Gallons,
        });
        assert_eq!(gal.required_chemical_g, 3.79);
    }

    #[test]
    fn test_solution_placeholder() {
        let result = calculate_solution(&SolutionInput::default());
        assert_eq!(result.required_display(), "0.00");
        assert_eq!(result.instructions, SOLUTION_PLACEHOLDER);
    }

    #[test]
    fn test_dilution() {
        let result = calculate_dilution(&dilution("100", "10", "1000"));
        assert_eq!(result.display(), ("100.00".to_string(), "900.00".to_string()));
        assert_eq!(
            result.instructions,
            "Take 100.00ml of chemical and add 900.00ml of water to make 1000ml of solution."
        );
        assert!(result.error.is_none());
    }

    #[test]
    fn test_dilution_target_above_stock() {
        let result = calculate_dilution(&dilution("10", "20", "1000"));
        let error = result.error.clone().expect("domain error");
        assert!(error.is_constraint_violation());
        assert_eq!(error.field(), Some("target_concentration"));
        assert_eq!(result.chemical_ml, 0.0);
        assert_eq!(result.display().0, "Error");
        assert_eq!(result.instructions, DILUTION_INVALID);
    }

    #[test]
    fn test_dilution_equal_concentrations_rejected() {
        let result = calculate_dilution(&dilution("10", "10", "500"));
        assert!(result.error.is_some());
    }

    #[test]
    fn test_dilution_placeholder() {
        for (c1, c2, v2) in [("", "10", "1000"), ("0", "10", "1000"), ("100", "", "1000"), ("100", "10", "0")] {
            let result = calculate_dilution(&dilution(c1, c2, v2));
            assert!(result.error.is_none());
            assert_eq!(result.instructions, DILUTION_PLACEHOLDER);
            assert_eq!(result.display(), ("0.00".to_string(), "0.00".to_string()));
        }
    }
}
