//! # Lint Loss
//!
//! Cumulative lint shed by a towel over repeated washes, as a share of its
//! original weight.
//!
//! ```text
//! per wash % = lint_g / initial_g × 100
//! total %    = Σ lint_g / initial_g × 100
//! ```
//!
//! Washes are identified by position (1-based). A wash whose weight is
//! missing or not positive keeps its position but contributes nothing.
//! [`WashSchedule`] owns the editable list and enforces its 1..=10 bounds.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::parse::{format_fixed, parse_nonzero, parse_positive, round_to};

/// Most washes a schedule can hold
pub const MAX_WASHES: usize = 10;

/// Fewest washes a schedule can hold
pub const MIN_WASHES: usize = 1;

/// Input for the lint loss calculator.
///
/// ## JSON Example
///
/// ```json
/// { "initial_weight": "500", "wash_weights": ["1.2", "0.8", ""] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintLossInput {
    /// Towel weight before the first wash (g)
    pub initial_weight: String,
    /// Lint collected per wash (g), in wash order
    pub wash_weights: Vec<String>,
}

impl Default for LintLossInput {
    fn default() -> Self {
        LintLossInput {
            initial_weight: String::new(),
            wash_weights: vec![String::new()],
        }
    }
}

impl LintLossInput {
    /// Check the wash list is within 1..=10 entries
    pub fn validate(&self) -> CalcResult<()> {
        let count = self.wash_weights.len();
        if !(MIN_WASHES..=MAX_WASHES).contains(&count) {
            return Err(CalcError::invalid_input(
                "wash_weights",
                count.to_string(),
                format!("Between {} and {} washes are supported", MIN_WASHES, MAX_WASHES),
            ));
        }
        Ok(())
    }
}

/// Contribution of one wash
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WashBreakdown {
    /// 1-based wash number
    pub wash: usize,
    /// Lint weight counted (g); 0 when the entry was unusable
    pub weight: f64,
    /// Share of the initial weight, 2 decimals
    pub percentage: f64,
}

/// Result of the lint loss calculator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LintLossResult {
    /// Total loss as % of initial weight, 2 decimals
    pub total_loss_pct: f64,
    /// Total lint collected (g), 2 decimals
    pub total_lint: f64,
    /// One entry per wash; empty until the initial weight is usable
    pub breakdown: Vec<WashBreakdown>,
}

impl LintLossResult {
    /// Total loss as displayed (e.g., "0.42")
    pub fn total_loss_display(&self) -> String {
        format_fixed(self.total_loss_pct, 2)
    }

    /// Washes that actually shed lint
    pub fn contributing(&self) -> impl Iterator<Item = &WashBreakdown> {
        self.breakdown.iter().filter(|w| w.weight > 0.0)
    }
}

/// Calculate lint loss over all recorded washes.
pub fn calculate(input: &LintLossInput) -> LintLossResult {
    let Some(initial) = parse_nonzero(&input.initial_weight) else {
        return LintLossResult::default();
    };

    let breakdown: Vec<WashBreakdown> = input
        .wash_weights
        .iter()
        .enumerate()
        .map(|(index, text)| match parse_positive(text) {
            Some(weight) => WashBreakdown {
                wash: index + 1,
                weight,
                percentage: round_to(weight / initial * 100.0, 2),
            },
            None => WashBreakdown {
                wash: index + 1,
                weight: 0.0,
                percentage: 0.0,
            },
        })
        .collect();

    let total_lint: f64 = breakdown.iter().map(|w| w.weight).sum();
    let total_loss = total_lint / initial * 100.0;
    debug!(initial, total_lint, total_loss, washes = breakdown.len(), "lint loss");

    LintLossResult {
        total_loss_pct: round_to(total_loss, 2),
        total_lint: round_to(total_lint, 2),
        breakdown,
    }
}

/// Field label for a wash number ("1st Wash", "2nd Wash", ...)
pub fn wash_label(wash: usize) -> String {
    let suffix = match (wash % 10, wash % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{} Wash", wash, suffix)
}

// ============================================================================
// Wash Schedule
// ============================================================================

/// Editable, bounded list of per-wash lint weights.
///
/// Starts with one empty wash. Removing an entry shifts later washes down
/// so wash numbers always follow list position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WashSchedule {
    weights: Vec<String>,
}

impl Default for WashSchedule {
    fn default() -> Self {
        WashSchedule::new()
    }
}

impl WashSchedule {
    pub fn new() -> Self {
        WashSchedule {
            weights: vec![String::new()],
        }
    }

    /// Number of washes recorded
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always false: a schedule holds at least one wash
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// True when no further wash can be added
    pub fn is_full(&self) -> bool {
        self.weights.len() >= MAX_WASHES
    }

    /// Weights in wash order
    pub fn weights(&self) -> &[String] {
        &self.weights
    }

    /// Append an empty wash, returning its 1-based number
    pub fn add_wash(&mut self) -> CalcResult<usize> {
        if self.is_full() {
            return Err(CalcError::invalid_input(
                "wash_weights",
                self.weights.len().to_string(),
                format!("At most {} washes are supported", MAX_WASHES),
            ));
        }
        self.weights.push(String::new());
        Ok(self.weights.len())
    }

    /// Remove the wash at `index` (0-based)
    pub fn remove_wash(&mut self, index: usize) -> CalcResult<String> {
        if self.weights.len() <= MIN_WASHES {
            return Err(CalcError::invalid_input(
                "wash_weights",
                self.weights.len().to_string(),
                "At least one wash is required",
            ));
        }
        if index >= self.weights.len() {
            return Err(CalcError::invalid_input(
                "wash_index",
                index.to_string(),
                "No wash at this position",
            ));
        }
        Ok(self.weights.remove(index))
    }

    /// Replace the weight text of the wash at `index` (0-based)
    pub fn set_weight(&mut self, index: usize, text: impl Into<String>) -> CalcResult<()> {
        let slot = self
            .weights
            .get_mut(index)
            .ok_or_else(|| CalcError::invalid_input("wash_index", index.to_string(), "No wash at this position"))?;
        *slot = text.into();
        Ok(())
    }

    /// Snapshot as calculator input
    pub fn to_input(&self, initial_weight: impl Into<String>) -> LintLossInput {
        LintLossInput {
            initial_weight: initial_weight.into(),
            wash_weights: self.weights.clone(),
        }
    }
}
