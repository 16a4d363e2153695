//! # Fiber Composition (Dissolution Method)
//!
//! A two-fiber blend is weighed, one fiber is chemically dissolved, and the
//! residue is weighed again:
//!
//! ```text
//! loss        = w1 - w2           (weight of the dissolved fiber)
//! dissolved % = loss / w1 × 100
//! residue %   = w2 / w1 × 100
//! ```
//!
//! A residue heavier than the sample is reported as a constraint violation
//! on `after_weight`, distinct from the silent "not enough input" state.
//!
//! ## Example
//!
//! ```rust
//! use fabric_core::calculations::fiber::{calculate, FiberInput};
//!
//! let input = FiberInput {
//!     before_weight: "10".to_string(),
//!     after_weight: "4".to_string(),
//!     ..Default::default()
//! };
//! let result = calculate(&input);
//! assert!(result.is_valid);
//! assert_eq!(result.dissolved_pct, 60.0);
//! assert_eq!(result.residue_pct, 40.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::parse::{format_fixed, parse_nonzero, round_to};

/// Fibers offered for dissolution analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fiber {
    Cotton,
    Polyester,
    Viscose,
    Modal,
    Lyocell,
    Nylon,
    Acrylic,
    Wool,
    Silk,
    Spandex,
    Linen,
    Bamboo,
}

impl Fiber {
    /// All fibers variants for selection lists
    pub const ALL: [Fiber; 12] = [
        Fiber::Cotton,
        Fiber::Polyester,
        Fiber::Viscose,
        Fiber::Modal,
        Fiber::Lyocell,
        Fiber::Nylon,
        Fiber::Acrylic,
        Fiber::Wool,
        Fiber::Silk,
        Fiber::Spandex,
        Fiber::Linen,
        Fiber::Bamboo,
    ];

    /// Get display name
    pub fn display_name(self) -> &'static str {
        match self {
            Fiber::Cotton => "Cotton",
            Fiber::Polyester => "Polyester",
            Fiber::Viscose => "Viscose",
            Fiber::Modal => "Modal",
            Fiber::Lyocell => "Lyocell",
            Fiber::Nylon => "Nylon",
            Fiber::Acrylic => "Acrylic",
            Fiber::Wool => "Wool",
            Fiber::Silk => "Silk",
            Fiber::Spandex => "Spandex",
            Fiber::Linen => "Linen",
            Fiber::Bamboo => "Bamboo",
        }
    }

    /// Parse a fiber name, case-insensitive
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let wanted = s.trim();
        Fiber::ALL
            .into_iter()
            .find(|f| f.display_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CalcError::invalid_input("fiber", s, "Unknown fiber"))
    }
}

impl std::fmt::Display for Fiber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Input for the fiber composition calculator.
///
/// ## JSON Example
///
/// ```json
/// {
///   "before_weight": "5.012",
///   "after_weight": "1.987",
///   "dissolved": "cotton",
///   "residue": "polyester"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiberInput {
    /// Sample weight before dissolution (g)
    pub before_weight: String,
    /// Residue weight after dissolution (g)
    pub after_weight: String,
    /// Fiber removed by the reagent
    pub dissolved: Fiber,
    /// Fiber left as residue
    pub residue: Fiber,
}

impl Default for FiberInput {
    fn default() -> Self {
        FiberInput {
            before_weight: String::new(),
            after_weight: String::new(),
            dissolved: Fiber::Cotton,
            residue: Fiber::Polyester,
        }
    }
}

/// Result of the fiber composition calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiberResult {
    pub dissolved: Fiber,
    pub residue: Fiber,
    /// Dissolved fiber share, 2 decimals
    pub dissolved_pct: f64,
    /// Residue fiber share, 2 decimals
    pub residue_pct: f64,
    /// Weight lost to dissolution (g), 3 decimals
    pub dissolved_weight: f64,
    /// Residue weight as measured (g)
    pub residue_weight: f64,
    /// True only when percentages were computed
    pub is_valid: bool,
    /// Constraint violation, if any
    pub error: Option<CalcError>,
}

impl FiberResult {
    fn empty(input: &FiberInput, error: Option<CalcError>) -> Self {
        FiberResult {
            dissolved: input.dissolved,
            residue: input.residue,
            dissolved_pct: 0.0,
            residue_pct: 0.0,
            dissolved_weight: 0.0,
            residue_weight: 0.0,
            is_valid: false,
            error,
        }
    }

    /// (dissolved %, residue %) as displayed
    pub fn display(&self) -> (String, String) {
        (format_fixed(self.dissolved_pct, 2), format_fixed(self.residue_pct, 2))
    }
}

/// Calculate the two-fiber split from before/after weights.
pub fn calculate(input: &FiberInput) -> FiberResult {
    let (Some(w1), Some(w2)) = (parse_nonzero(&input.before_weight), parse_nonzero(&input.after_weight)) else {
        return FiberResult::empty(input, None);
    };

    if w2 > w1 {
        debug!(w1, w2, "residue heavier than sample");
        return FiberResult::empty(
            input,
            Some(CalcError::constraint_violated(
                "after_weight",
                "Final weight cannot exceed initial weight",
            )),
        );
    }

    let loss = w1 - w2;
    let dissolved_pct = round_to((loss / w1) * 100.0, 2);
    // complement of the rounded figure keeps the pair summing to 100
    let residue_pct = round_to(100.0 - dissolved_pct, 2);
    debug!(w1, w2, loss, dissolved_pct, residue_pct, "fiber composition");

    FiberResult {
        dissolved: input.dissolved,
        residue: input.residue,
        dissolved_pct,
        residue_pct,
        dissolved_weight: round_to(loss, 3),
        residue_weight: w2,
        is_valid: true,
        error: None,
    }
}
