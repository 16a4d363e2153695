//! # Blend Composition
//!
//! Overall cotton/polyester split of a towel from its yarn components. One
//! algorithm serves both modes; the mode only selects a row schema:
//!
//! - **Ratio**: pile, ground, weft, fancy and end hem yarn ratios
//! - **Weight**: fancy, end hem and body component weights
//!
//! ```text
//! total  = Σ input                     (rows with input > 0)
//! cotton = Σ input × cotton% / 100     (those rows with a cotton %)
//! overall cotton % = cotton / total × 100
//! polyester %      = 100 - overall cotton %
//! ```
//!
//! Each row also shows `100 - row cotton %` for reference. That figure is
//! not weighted by the row's share.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use fabric_core::calculations::blend::{calculate, BlendMode, RowData};
//!
//! let mut rows = BTreeMap::new();
//! rows.insert("pile".to_string(), RowData::new("3", "100"));
//! rows.insert("ground".to_string(), RowData::new("1", "0"));
//!
//! let result = calculate(BlendMode::Ratio.schema(), &rows);
//! assert_eq!(result.cotton_pct, 75.0);
//! assert_eq!(result.polyester_pct, 25.0);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{CalcError, CalcResult};
use crate::parse::{format_fixed, parse_number, parse_positive, round_to};

/// One row of a blend schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowDefinition {
    pub id: &'static str,
    pub label: &'static str,
}

/// Static description of a blend calculator variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlendSchema {
    pub title: &'static str,
    pub description: &'static str,
    /// Column header for the row input
    pub input_label: &'static str,
    pub rows: &'static [RowDefinition],
}

impl BlendSchema {
    /// Whether `id` names a row of this schema
    pub fn has_row(&self, id: &str) -> bool {
        self.rows.iter().any(|r| r.id == id)
    }
}

static RATIO_SCHEMA: BlendSchema = BlendSchema {
    title: "Blend by Ratio",
    description: "Calculate using yarn ratios (Pile, Ground, Weft, etc.)",
    input_label: "Ratio",
    rows: &[
        RowDefinition { id: "pile", label: "Pile" },
        RowDefinition { id: "ground", label: "Ground" },
        RowDefinition { id: "weft", label: "Weft" },
        RowDefinition { id: "fancy", label: "Fancy" },
        RowDefinition { id: "endHem", label: "End Hem" },
    ],
};

static WEIGHT_SCHEMA: BlendSchema = BlendSchema {
    title: "Blend by Weight",
    description: "Calculate using component weights (Fancy, End Hem, Body)",
    input_label: "Weight (g)",
    rows: &[
        RowDefinition { id: "fancy1", label: "Fancy 1" },
        RowDefinition { id: "fancy2", label: "Fancy 2" },
        RowDefinition { id: "endHem1", label: "End Hem 1" },
        RowDefinition { id: "endHem2", label: "End Hem 2" },
        RowDefinition { id: "body", label: "Body" },
    ],
};

/// What the row input means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Ratio,
    Weight,
}

impl BlendMode {
    /// The row schema for this mode
    pub fn schema(self) -> &'static BlendSchema {
        match self {
            BlendMode::Ratio => &RATIO_SCHEMA,
            BlendMode::Weight => &WEIGHT_SCHEMA,
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "ratio" => Ok(BlendMode::Ratio),
            "weight" => Ok(BlendMode::Weight),
            _ => Err(CalcError::invalid_input("mode", s, "Expected ratio or weight")),
        }
    }
}

/// Raw text of one row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowData {
    /// Ratio or weight, depending on the mode
    pub input: String,
    /// Cotton share of this component (%)
    pub cotton_percent: String,
}

impl RowData {
    pub fn new(input: impl Into<String>, cotton_percent: impl Into<String>) -> Self {
        RowData {
            input: input.into(),
            cotton_percent: cotton_percent.into(),
        }
    }
}

/// Input for the blend calculator.
///
/// ## JSON Example
///
/// ```json
/// {
///   "mode": "weight",
///   "rows": {
///     "body": { "input": "420", "cotton_percent": "100" },
///     "fancy1": { "input": "30", "cotton_percent": "0" }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendInput {
    pub mode: BlendMode,
    /// Row data keyed by schema row id
    pub rows: BTreeMap<String, RowData>,
}

impl BlendInput {
    /// Check every row id belongs to the mode's schema
    pub fn validate(&self) -> CalcResult<()> {
        let schema = self.mode.schema();
        if let Some(id) = self.rows.keys().find(|id| !schema.has_row(id)) {
            return Err(CalcError::invalid_input(
                "rows",
                id.clone(),
                format!("Not a row of '{}'", schema.title),
            ));
        }
        Ok(())
    }
}

/// Per-row reference figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowBreakdown {
    pub id: String,
    pub label: String,
    /// `100 - row cotton %`, 1 decimal; `None` without a cotton %
    pub poly_pct: Option<f64>,
}

impl RowBreakdown {
    /// "x.x%" or "-%"
    pub fn display(&self) -> String {
        match self.poly_pct {
            Some(v) => format!("{}%", format_fixed(v, 1)),
            None => "-%".to_string(),
        }
    }
}

/// Result of the blend calculator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlendResult {
    /// Weighted cotton share, 2 decimals
    pub cotton_pct: f64,
    /// Complement of `cotton_pct`, 2 decimals
    pub polyester_pct: f64,
    /// Sum of positive inputs, 2 decimals
    pub total_input: f64,
    /// One entry per schema row, schema order
    pub rows: Vec<RowBreakdown>,
}

impl BlendResult {
    /// (cotton %, polyester %) as displayed
    pub fn display(&self) -> (String, String) {
        (format_fixed(self.cotton_pct, 2), format_fixed(self.polyester_pct, 2))
    }
}

/// Calculate the weighted blend for a schema and its row data.
///
/// Data under ids the schema does not know is ignored.
pub fn calculate(schema: &BlendSchema, data: &BTreeMap<String, RowData>) -> BlendResult {
    for id in data.keys().filter(|id| !schema.has_row(id)) {
        warn!(row = %id, schema = schema.title, "ignoring unknown blend row");
    }

    let mut total_input = 0.0;
    let mut cotton_parts = 0.0;
    let mut rows = Vec::with_capacity(schema.rows.len());

    for def in schema.rows {
        let row = data.get(def.id);
        let cotton = row.and_then(|r| parse_number(&r.cotton_percent));

        if let Some(input) = row.and_then(|r| parse_positive(&r.input)) {
            total_input += input;
            if let Some(cotton) = cotton {
                cotton_parts += input * (cotton / 100.0);
            }
        }

        rows.push(RowBreakdown {
            id: def.id.to_string(),
            label: def.label.to_string(),
            poly_pct: cotton.map(|c| round_to(100.0 - c, 1)),
        });
    }

    if total_input == 0.0 {
        return BlendResult {
            rows,
            ..BlendResult::default()
        };
    }

    let overall_cotton = cotton_parts / total_input * 100.0;
    let cotton_pct = round_to(overall_cotton, 2);
    debug!(total_input, cotton_parts, overall_cotton, schema = schema.title, "blend");

    BlendResult {
        cotton_pct,
        polyester_pct: round_to(100.0 - cotton_pct, 2),
        total_input: round_to(total_input, 2),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(entries: &[(&str, &str, &str)]) -> BTreeMap<String, RowData> {
        entries
            .iter()
            .map(|(id, input, cotton)| (id.to_string(), RowData::new(*input, *cotton)))
            .collect()
    }

    #[test]
    fn test_ratio_blend() {
        let data = rows(&[
            ("pile", "2", "100"),
            ("ground", "1", "40"),
            ("weft", "1", "60"),
        ]);
        let result = calculate(BlendMode::Ratio.schema(), &data);
        // (2 + 0.4 + 0.6) / 4 = 75%
        assert_eq!(result.display(), ("75.00".to_string(), "25.00".to_string()));
        assert_eq!(result.total_input, 4.0);
    }

    #[test]
    fn test_weight_blend() {
        let data = rows(&[("body", "420", "100"), ("fancy1", "30", "0"), ("endHem1", "50", "50")]);
        let result = calculate(BlendMode::Weight.schema(), &data);
        // (420 + 0 + 25) / 500 = 89%
        assert_eq!(result.cotton_pct, 89.0);
        assert_eq!(result.polyester_pct, 11.0);
    }

    #[test]
    fn test_row_without_cotton_counts_toward_total() {
        let data = rows(&[("pile", "1", "100"), ("ground", "1", "")]);
        let result = calculate(BlendMode::Ratio.schema(), &data);
        assert_eq!(result.cotton_pct, 50.0);
        assert_eq!(result.rows[1].poly_pct, None);
        assert_eq!(result.rows[1].display(), "-%");
    }

    #[test]
    fn test_non_positive_inputs_are_skipped() {
        let data = rows(&[("pile", "-3", "100"), ("ground", "0", "100"), ("weft", "2", "30")]);
        let result = calculate(BlendMode::Ratio.schema(), &data);
        assert_eq!(result.cotton_pct, 30.0);
        assert_eq!(result.total_input, 2.0);
    }

    #[test]
    fn test_empty_is_all_zero() {
        let result = calculate(BlendMode::Weight.schema(), &BTreeMap::new());
        assert_eq!(result.display(), ("0.00".to_string(), "0.00".to_string()));
        assert_eq!(result.rows.len(), 5);
    }

    #[test]
    fn test_per_row_complement_is_unweighted() {
        let data = rows(&[("pile", "9", "80"), ("ground", "1", "20")]);
        let result = calculate(BlendMode::Ratio.schema(), &data);
        assert_eq!(result.rows[0].poly_pct, Some(20.0));
        assert_eq!(result.rows[1].poly_pct, Some(80.0));
        assert_eq!(result.cotton_pct, 74.0);
    }

    #[test]
    fn test_cotton_and_polyester_sum_to_100() {
        let samples = [
            rows(&[("pile", "1", "33.335"), ("ground", "2", "10")]),
            rows(&[("pile", "7", "100"), ("weft", "3", "0"), ("fancy", "0.3", "55.5")]),
            rows(&[("endHem", "1.1", "66.666")]),
        ];
        for data in samples {
            let result = calculate(BlendMode::Ratio.schema(), &data);
            assert!((result.cotton_pct + result.polyester_pct - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_unknown_ids() {
        let input = BlendInput {
            mode: BlendMode::Ratio,
            rows: rows(&[("pile", "1", "100"), ("body", "5", "0")]),
        };
        assert!(input.validate().is_err());
        // the engine itself skips the stray row
        let result = calculate(input.mode.schema(), &input.rows);
        assert_eq!(result.cotton_pct, 100.0);
    }
}
