//! # Shrinkage & Differential
//!
//! Dimensional change of a towel or fabric panel after washing, measured on
//! six components, plus the differential between the body (width) and each
//! trim component (borders and end hems).
//!
//! ```text
//! shrinkage %  = ((after - before) / before) × 100
//! differential = |width % - trim %|
//! auto GSM     = weight × 10000 / (L × W)   (cm)
//!              = weight × 1550  / (L × W)   (in)
//! ```
//!
//! ## Thresholds
//!
//! | Measure | Warning when |
//! |---------|--------------|
//! | Length shrinkage | ≤ -7.1 % |
//! | Width, border, end hem shrinkage | ≤ -5.1 % |
//! | Differential | > 2.00 |
//!
//! Anything undefined (missing side, zero "before") is classified
//! [`Classification::Neutral`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::parse::{format_fixed, parse_nonzero, parse_number, parse_positive, round_to};
use crate::units::SampleUnit;

/// Length shrinkage at or below this is a warning
pub const LENGTH_WARNING_PCT: f64 = -7.1;

/// Width/border/end hem shrinkage at or below this is a warning
pub const PANEL_WARNING_PCT: f64 = -5.1;

/// Differentials above this are a warning
pub const DIFFERENTIAL_LIMIT: f64 = 2.0;

/// Measured parts of the sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Length,
    Width,
    Border1,
    Border2,
    End1,
    End2,
}

impl Component {
    /// All components in display order
    pub const ALL: [Component; 6] = [
        Component::Length,
        Component::Width,
        Component::Border1,
        Component::Border2,
        Component::End1,
        Component::End2,
    ];

    /// Trim components compared against the width
    pub const TRIMS: [Component; 4] = [Component::Border1, Component::Border2, Component::End1, Component::End2];

    /// Get display name
    pub fn display_name(self) -> &'static str {
        match self {
            Component::Length => "Length",
            Component::Width => "Width",
            Component::Border1 => "Border 1",
            Component::Border2 => "Border 2",
            Component::End1 => "End Hem 1",
            Component::End2 => "End Hem 2",
        }
    }

    /// Shrinkage at or below this value is a warning
    pub fn warning_threshold(self) -> f64 {
        match self {
            Component::Length => LENGTH_WARNING_PCT,
            _ => PANEL_WARNING_PCT,
        }
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Quality verdict for one measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Acceptable,
    Warning,
    /// Nothing to classify yet
    #[default]
    Neutral,
}

impl Classification {
    /// Short status marker for text output
    pub fn marker(self) -> &'static str {
        match self {
            Classification::Acceptable => "[OK]",
            Classification::Warning => "[WARN]",
            Classification::Neutral => "",
        }
    }
}

/// Raw before/after measurement text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementPair {
    pub before: String,
    pub after: String,
}

impl MeasurementPair {
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        MeasurementPair {
            before: before.into(),
            after: after.into(),
        }
    }
}

/// Input for the shrinkage calculator.
///
/// The GSM is never an input: it is derived from `length.before`,
/// `width.before`, `weight` and `unit`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShrinkageInput {
    /// Unit of every measurement
    pub unit: SampleUnit,
    pub length: MeasurementPair,
    pub width: MeasurementPair,
    pub border1: MeasurementPair,
    pub border2: MeasurementPair,
    pub end1: MeasurementPair,
    pub end2: MeasurementPair,
    /// Sample weight in grams (before washing)
    pub weight: String,
}

impl ShrinkageInput {
    /// Measurement of one component
    pub fn pair(&self, component: Component) -> &MeasurementPair {
        match component {
            Component::Length => &self.length,
            Component::Width => &self.width,
            Component::Border1 => &self.border1,
            Component::Border2 => &self.border2,
            Component::End1 => &self.end1,
            Component::End2 => &self.end2,
        }
    }

    /// Mutable measurement of one component
    pub fn pair_mut(&mut self, component: Component) -> &mut MeasurementPair {
        match component {
            Component::Length => &mut self.length,
            Component::Width => &mut self.width,
            Component::Border1 => &mut self.border1,
            Component::Border2 => &mut self.border2,
            Component::End1 => &mut self.end1,
            Component::End2 => &mut self.end2,
        }
    }
}

/// Shrinkage of one component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentShrinkage {
    pub component: Component,
    /// Percentage change, 2 decimals; `None` when undefined
    pub shrinkage_pct: Option<f64>,
    pub classification: Classification,
}

impl ComponentShrinkage {
    /// "x.xx%" or "-"
    pub fn display(&self) -> String {
        display_pct(self.shrinkage_pct)
    }
}

/// Width vs trim differential
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Differential {
    pub trim: Component,
    /// |width % - trim %|, 2 decimals; `None` when either side is undefined
    pub value: Option<f64>,
    pub classification: Classification,
}

impl Differential {
    /// "x.xx" or "-"
    pub fn display(&self) -> String {
        self.value.map_or_else(|| "-".to_string(), |v| format_fixed(v, 2))
    }
}

/// Result of the shrinkage calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShrinkageResult {
    /// One entry per [`Component::ALL`], same order
    pub components: Vec<ComponentShrinkage>,
    /// One entry per [`Component::TRIMS`], same order
    pub differentials: Vec<Differential>,
    /// Derived GSM, 1 decimal
    pub gsm: Option<f64>,
}

impl ShrinkageResult {
    /// Shrinkage entry of one component
    pub fn component(&self, component: Component) -> Option<&ComponentShrinkage> {
        self.components.iter().find(|c| c.component == component)
    }

    /// Differential entry of one trim component
    pub fn differential(&self, trim: Component) -> Option<&Differential> {
        self.differentials.iter().find(|d| d.trim == trim)
    }

    /// True when any measure is in warning
    pub fn has_warning(&self) -> bool {
        self.components.iter().any(|c| c.classification == Classification::Warning)
            || self.differentials.iter().any(|d| d.classification == Classification::Warning)
    }
}

/// Percentage change of one pair, unrounded.
///
/// `None` if either side is missing or non-numeric, or `before` is zero.
pub fn shrinkage_pct(pair: &MeasurementPair) -> Option<f64> {
    let before = parse_nonzero(&pair.before)?;
    let after = parse_number(&pair.after)?;
    Some(((after - before) / before) * 100.0)
}

/// Classify a shrinkage value for a component
pub fn classify_shrinkage(component: Component, pct: Option<f64>) -> Classification {
    match pct {
        None => Classification::Neutral,
        Some(v) if v <= component.warning_threshold() => Classification::Warning,
        Some(_) => Classification::Acceptable,
    }
}

/// Classify a (rounded) differential
pub fn classify_differential(diff: Option<f64>) -> Classification {
    match diff {
        None => Classification::Neutral,
        Some(v) if v <= DIFFERENTIAL_LIMIT => Classification::Acceptable,
        Some(_) => Classification::Warning,
    }
}

/// GSM of the unwashed sample, 1 decimal.
///
/// Depends only on `length.before`, `width.before`, `weight` and `unit`.
/// `None` unless both dimensions are positive and the weight parses.
pub fn derive_gsm(input: &ShrinkageInput) -> Option<f64> {
    let length = parse_positive(&input.length.before)?;
    let width = parse_positive(&input.width.before)?;
    let weight = parse_number(&input.weight)?;
    let gsm = (weight * input.unit.sq_per_sq_meter()) / (length * width);
    Some(round_to(gsm, 1))
}

/// Calculate shrinkage, differentials and the derived GSM.
pub fn calculate(input: &ShrinkageInput) -> ShrinkageResult {
    let components: Vec<ComponentShrinkage> = Component::ALL
        .iter()
        .map(|&component| {
            let raw = shrinkage_pct(input.pair(component));
            ComponentShrinkage {
                component,
                shrinkage_pct: raw.map(|v| round_to(v, 2)),
                classification: classify_shrinkage(component, raw),
            }
        })
        .collect();

    let width = shrinkage_pct(&input.width);
    let differentials = Component::TRIMS
        .iter()
        .map(|&trim| {
            let value = match (width, shrinkage_pct(input.pair(trim))) {
                (Some(w), Some(t)) => Some(round_to((w - t).abs(), 2)),
                _ => None,
            };
            Differential {
                trim,
                value,
                classification: classify_differential(value),
            }
        })
        .collect();

    let gsm = derive_gsm(input);
    debug!(unit = %input.unit, ?width, ?gsm, "shrinkage");

    ShrinkageResult {
        components,
        differentials,
        gsm,
    }
}

/// "x.xx%" or "-" for an optional percentage
pub fn display_pct(pct: Option<f64>) -> String {
    pct.map_or_else(|| "-".to_string(), |v| format!("{}%", format_fixed(v, 2)))
}

/// Formula strings shown next to the results
pub fn formulas(unit: SampleUnit) -> [&'static str; 3] {
    let gsm = match unit {
        SampleUnit::Cm => "(Weight × 10000) / (L × W)",
        SampleUnit::In => "(Weight × 1550) / (L × W)",
    };
    ["((After - Before) / Before) × 100", "|Width % - Trim %|", gsm]
}
