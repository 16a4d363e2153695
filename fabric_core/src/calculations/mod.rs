//! # Quality-Control Calculations
//!
//! This module contains every calculator. Each one follows the pattern:
//!
//! - `*Input` - raw field text as the user typed it (JSON-serializable)
//! - `*Result` - derived values, rounded for display (JSON-serializable)
//! - `calculate(&input) -> *Result` - pure function, recomputed from scratch
//!
//! Incomplete input never fails: results fall back to zeros or placeholders.
//! Physical constraint violations travel inside the result as
//! `error: Option<CalcError>`.
//!
//! ## Available Calculations
//!
//! - [`area_weight`] - GSM and piece weight
//! - [`shrinkage`] - Shrinkage, body/trim differentials, auto GSM
//! - [`fiber`] - Two-fiber composition by dissolution
//! - [`lint_loss`] - Lint loss across washes
//! - [`solution`] - Solution preparation and dilution
//! - [`blend`] - Cotton/polyester blend by ratio or weight
//! - [`yarn_count`] - Ne count and twist multiplier
//! - [`conversion`] - General unit conversion

pub mod area_weight;
pub mod blend;
pub mod conversion;
pub mod fiber;
pub mod lint_loss;
pub mod shrinkage;
pub mod solution;
pub mod yarn_count;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

// Re-export commonly used types
pub use area_weight::{GsmInput, GsmResult, PieceWeightInput, PieceWeightResult};
pub use blend::{BlendInput, BlendMode, BlendResult, RowData};
pub use conversion::{ConversionInput, ConversionResult};
pub use fiber::{Fiber, FiberInput, FiberResult};
pub use lint_loss::{LintLossInput, LintLossResult, WashSchedule};
pub use shrinkage::{Classification, Component, MeasurementPair, ShrinkageInput, ShrinkageResult};
pub use solution::{DilutionInput, DilutionResult, SolutionInput, SolutionResult};
pub use yarn_count::{Ply, YarnCountInput, YarnCountResult};

/// Enum wrapper for all calculator inputs.
///
/// ## JSON Example
///
/// ```json
/// { "tool": "Dilution", "stock_concentration": "100", "target_concentration": "10", "target_volume": "1000" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool")]
pub enum CalculationItem {
    Gsm(GsmInput),
    PieceWeight(PieceWeightInput),
    Shrinkage(ShrinkageInput),
    FiberComposition(FiberInput),
    LintLoss(LintLossInput),
    Solution(SolutionInput),
    Dilution(DilutionInput),
    Blend(BlendInput),
    YarnCount(YarnCountInput),
    UnitConversion(ConversionInput),
}

/// Enum wrapper for all calculator results, tagged like [`CalculationItem`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool")]
pub enum CalculationOutput {
    Gsm(GsmResult),
    PieceWeight(PieceWeightResult),
    Shrinkage(ShrinkageResult),
    FiberComposition(FiberResult),
    LintLoss(LintLossResult),
    Solution(SolutionResult),
    Dilution(DilutionResult),
    Blend(BlendResult),
    YarnCount(YarnCountResult),
    UnitConversion(ConversionResult),
}

impl CalculationItem {
    /// Get the calculator name as a string
    pub fn tool_name(&self) -> &'static str {
        match self {
            CalculationItem::Gsm(_) => "GSM",
            CalculationItem::PieceWeight(_) => "Piece Weight",
            CalculationItem::Shrinkage(_) => "Shrinkage",
            CalculationItem::FiberComposition(_) => "Fiber Composition",
            CalculationItem::LintLoss(_) => "Lint Loss",
            CalculationItem::Solution(_) => "Solution Preparation",
            CalculationItem::Dilution(_) => "Dilution",
            CalculationItem::Blend(_) => "Towel Blend",
            CalculationItem::YarnCount(_) => "Yarn Count",
            CalculationItem::UnitConversion(_) => "Unit Conversion",
        }
    }

    /// Run the matching calculator.
    ///
    /// Errors only on contract violations of the structured input (unknown
    /// unit, blend row outside the schema, wash list out of bounds).
    pub fn calculate(&self) -> CalcResult<CalculationOutput> {
        let output = match self {
            CalculationItem::Gsm(input) => CalculationOutput::Gsm(area_weight::calculate_gsm(input)),
            CalculationItem::PieceWeight(input) => {
                CalculationOutput::PieceWeight(area_weight::calculate_piece_weight(input))
            }
            CalculationItem::Shrinkage(input) => CalculationOutput::Shrinkage(shrinkage::calculate(input)),
            CalculationItem::FiberComposition(input) => CalculationOutput::FiberComposition(fiber::calculate(input)),
            CalculationItem::LintLoss(input) => {
                input.validate()?;
                CalculationOutput::LintLoss(lint_loss::calculate(input))
            }
            CalculationItem::Solution(input) => CalculationOutput::Solution(solution::calculate_solution(input)),
            CalculationItem::Dilution(input) => CalculationOutput::Dilution(solution::calculate_dilution(input)),
            CalculationItem::Blend(input) => {
                input.validate()?;
                CalculationOutput::Blend(blend::calculate(input.mode.schema(), &input.rows))
            }
            CalculationItem::YarnCount(input) => CalculationOutput::YarnCount(yarn_count::calculate(input)),
            CalculationItem::UnitConversion(input) => CalculationOutput::UnitConversion(conversion::calculate(input)?),
        };
        Ok(output)
    }
}

impl CalculationOutput {
    /// Constraint violation reported by the calculator, if any
    pub fn error(&self) -> Option<&CalcError> {
        match self {
            CalculationOutput::FiberComposition(r) => r.error.as_ref(),
            CalculationOutput::Dilution(r) => r.error.as_ref(),
            _ => None,
        }
    }
}
