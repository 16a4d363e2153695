//! # Yarn Count & Twist Multiplier
//!
//! English cotton count (Ne) from a wrapped length of yarn, and the twist
//! multiplier for a given twist per inch.
//!
//! ```text
//! raw count = length_cm × threads × 0.0059 / weight_g
//! count     = raw count × ply multiplier     (Single = 1 ... Quintuple = 5)
//! TM        = TPI / √count
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::parse::{format_fixed, parse_nonzero, round_to};

/// cm·g⁻¹ to Ne
pub const NE_FACTOR: f64 = 0.0059;

/// Ply construction of the yarn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ply {
    #[default]
    Single,
    Double,
    Triple,
    Quadruple,
    Quintuple,
}

impl Ply {
    /// All ply options in display order
    pub const ALL: [Ply; 5] = [Ply::Single, Ply::Double, Ply::Triple, Ply::Quadruple, Ply::Quintuple];

    /// 1-based position in [`Ply::ALL`]
    pub fn multiplier(self) -> f64 {
        match self {
            Ply::Single => 1.0,
            Ply::Double => 2.0,
            Ply::Triple => 3.0,
            Ply::Quadruple => 4.0,
            Ply::Quintuple => 5.0,
        }
    }

    /// Get display name
    pub fn display_name(self) -> &'static str {
        match self {
            Ply::Single => "Single",
            Ply::Double => "Double",
            Ply::Triple => "Triple",
            Ply::Quadruple => "Quadruple",
            Ply::Quintuple => "Quintuple",
        }
    }

    /// Parse a ply name or its multiplier ("2", "double")
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let wanted = s.trim();
        Ply::ALL
            .into_iter()
            .find(|p| p.display_name().eq_ignore_ascii_case(wanted) || p.multiplier().to_string() == wanted)
            .ok_or_else(|| CalcError::invalid_input("ply", s, "Expected Single, Double, Triple, Quadruple or Quintuple"))
    }
}

impl std::fmt::Display for Ply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Input for the yarn count calculator.
///
/// ## JSON Example
///
/// ```json
/// { "length_cm": "100", "threads": "1", "weight_g": "2.0", "ply": "single", "tpi": "15" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YarnCountInput {
    /// Length of yarn weighed (cm)
    pub length_cm: String,
    /// Number of threads in the wrapping
    pub threads: String,
    /// Weight of the wrapping (g)
    pub weight_g: String,
    pub ply: Ply,
    /// Twist per inch
    pub tpi: String,
}

impl Default for YarnCountInput {
    fn default() -> Self {
        YarnCountInput {
            length_cm: String::new(),
            threads: "1".to_string(),
            weight_g: String::new(),
            ply: Ply::Single,
            tpi: String::new(),
        }
    }
}

/// Result of the yarn count calculator
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct YarnCountResult {
    /// Ne count including ply, 2 decimals
    pub count: f64,
    /// Twist multiplier, 2 decimals
    pub twist_multiplier: f64,
}

impl YarnCountResult {
    /// (count, TM) as displayed
    pub fn display(&self) -> (String, String) {
        (format_fixed(self.count, 2), format_fixed(self.twist_multiplier, 2))
    }
}

/// Twist multiplier for a count; 0 unless TPI is usable and count is positive.
pub fn twist_multiplier(tpi: &str, count: f64) -> f64 {
    let Some(tpi) = parse_nonzero(tpi) else {
        return 0.0;
    };
    if count <= 0.0 {
        return 0.0;
    }
    let tm = tpi / count.sqrt();
    if tm > 0.0 {
        tm
    } else {
        0.0
    }
}

/// Calculate count and twist multiplier.
pub fn calculate(input: &YarnCountInput) -> YarnCountResult {
    let (Some(length), Some(threads), Some(weight)) = (
        parse_nonzero(&input.length_cm),
        parse_nonzero(&input.threads),
        parse_nonzero(&input.weight_g),
    ) else {
        return YarnCountResult::default();
    };

    let count = (length * threads * NE_FACTOR) / weight * input.ply.multiplier();
    let tm = twist_multiplier(&input.tpi, count);
    debug!(length, threads, weight, ply = %input.ply, count, tm, "yarn count");

    YarnCountResult {
        count: round_to(count, 2),
        twist_multiplier: round_to(tm, 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(length: &str, threads: &str, weight: &str, ply: Ply, tpi: &str) -> YarnCountInput {
        YarnCountInput {
            length_cm: length.to_string(),
            threads: threads.to_string(),
            weight_g: weight.to_string(),
            ply,
            tpi: tpi.to_string(),
        }
    }

    #[test]
    fn test_ply_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Ply::Double).unwrap(), "\"double\"");
        let input: YarnCountInput = serde_json::from_str(r#"{"ply":"triple"}"#).unwrap();
        assert_eq!(input.ply, Ply::Triple);
    }

    #[test]
    fn test_single_ply_count() {
        let result = calculate(&input("100", "1", "2.0", Ply::Single, "0"));
        assert_eq!(result.display(), ("0.30".to_string(), "0.00".to_string()));
    }

    #[test]
    fn test_ply_multiplier() {
        let single = calculate(&input("1000", "4", "0.59", Ply::Single, ""));
        assert_eq!(single.count, 40.0);
        let double = calculate(&input("1000", "4", "0.59", Ply::Double, ""));
        assert_eq!(double.count, 80.0);
        let quintuple = calculate(&input("1000", "4", "0.59", Ply::Quintuple, ""));
        assert_eq!(quintuple.count, 200.0);
    }

    #[test]
    fn test_twist_multiplier() {
        // count 16 -> TM = 20 / 4 = 5
        let result = calculate(&input("1600", "1", "0.59", Ply::Single, "20"));
        assert_eq!(result.count, 16.0);
        assert_eq!(result.twist_multiplier, 5.0);
    }

    #[test]
    fn test_negative_tm_reported_as_zero() {
        let result = calculate(&input("1600", "1", "0.59", Ply::Single, "-20"));
        assert_eq!(result.twist_multiplier, 0.0);
    }

    #[test]
    fn test_missing_inputs() {
        assert_eq!(calculate(&YarnCountInput::default()), YarnCountResult::default());
        assert_eq!(calculate(&input("100", "", "2", Ply::Single, "10")), YarnCountResult::default());
        assert_eq!(calculate(&input("100", "1", "0", Ply::Single, "10")).display().0, "0.00");
    }

    #[test]
    fn test_ply_parsing() {
        assert_eq!(Ply::from_str_flexible("triple").unwrap(), Ply::Triple);
        assert_eq!(Ply::from_str_flexible("4").unwrap(), Ply::Quadruple);
        assert!(Ply::from_str_flexible("six").is_err());
    }

    #[test]
    fn test_idempotent() {
        let i = input("250", "2", "1.3", Ply::Triple, "17.5");
        assert_eq!(calculate(&i).count.to_bits(), calculate(&i).count.to_bits());
    }
}
