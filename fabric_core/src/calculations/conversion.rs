//! Unit conversion tool: text value in, 4-decimal result out.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::CalcResult;
use crate::parse::{format_fixed, parse_nonzero, round_to};
use crate::units::{scale, Category, UnitDef};

/// Shown in place of a result until a non-zero value is entered
pub const NO_RESULT: &str = "---";

/// Input for the unit conversion tool.
///
/// An empty `from` or `to` falls back to the category's default pair, so
/// `{ "category": "force" }` converts newtons to kilonewtons.
///
/// ## JSON Example
///
/// ```json
/// { "category": "length", "value": "1", "from": "meters", "to": "inches" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionInput {
    pub category: Category,
    pub value: String,
    /// Unit name or symbol
    #[serde(default)]
    pub from: String,
    /// Unit name or symbol
    #[serde(default)]
    pub to: String,
}

impl Default for ConversionInput {
    fn default() -> Self {
        ConversionInput::for_category(Category::Length)
    }
}

impl ConversionInput {
    /// Fresh input after switching category: first unit to second, value 1
    pub fn for_category(category: Category) -> Self {
        let (from, to) = category.default_pair();
        ConversionInput {
            category,
            value: "1".to_string(),
            from: from.name.to_string(),
            to: to.name.to_string(),
        }
    }
}

/// Result of the unit conversion tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Converted value, 4 decimals; `None` until a non-zero value is entered
    pub value: Option<f64>,
    /// Canonical source unit name
    pub from: String,
    /// Canonical target unit name
    pub to: String,
    /// Target unit symbol
    pub symbol: String,
}

impl ConversionResult {
    /// "39.3701" or "---"
    pub fn display(&self) -> String {
        self.value.map_or_else(|| NO_RESULT.to_string(), |v| format_fixed(v, 4))
    }
}

fn resolve(category: Category, name: &str, fallback: &'static UnitDef) -> CalcResult<&'static UnitDef> {
    if name.trim().is_empty() {
        Ok(fallback)
    } else {
        category.find(name)
    }
}

/// Convert the entered value. Fails only on unit names outside the category.
///
/// A result that overflows `f64` is reported as no result.
pub fn calculate(input: &ConversionInput) -> CalcResult<ConversionResult> {
    let (default_from, default_to) = input.category.default_pair();
    let from = resolve(input.category, &input.from, default_from)?;
    let to = resolve(input.category, &input.to, default_to)?;

    let value = parse_nonzero(&input.value)
        .map(|v| {
            let converted = scale(v, from, to);
            debug!(category = %input.category, from = from.name, to = to.name, v, converted, "convert");
            converted
        })
        .filter(|converted| converted.is_finite())
        .map(|converted| round_to(converted, 4));

    Ok(ConversionResult {
        value,
        from: from.name.to_string(),
        to: to.name.to_string(),
        symbol: to.symbol.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_length_conversion() {
        let result = calculate(&ConversionInput::default()).unwrap();
        assert_eq!(result.from, "meters");
        assert_eq!(result.to, "centimeters");
        assert_eq!(result.display(), "100.0000");
    }

    #[test]
    fn test_meters_to_inches() {
        let input = ConversionInput {
            category: Category::Length,
            value: "1".to_string(),
            from: "meters".to_string(),
            to: "in".to_string(),
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.display(), "39.3701");
        assert_eq!(result.symbol, "in");
    }

    #[test]
    fn test_force_conversion() {
        let input = ConversionInput {
            category: Category::Force,
            value: "1".to_string(),
            from: "kilogram_force".to_string(),
            to: "newtons".to_string(),
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.display(), "9.8068");
    }

    #[test]
    fn test_zero_or_empty_shows_no_result() {
        for value in ["", "0", "abc"] {
            let mut input = ConversionInput::for_category(Category::Area);
            input.value = value.to_string();
            assert_eq!(calculate(&input).unwrap().display(), NO_RESULT);
        }
    }

    #[test]
    fn test_unit_from_wrong_category() {
        let mut input = ConversionInput::for_category(Category::Weight);
        input.to = "feet".to_string();
        assert!(calculate(&input).is_err());
    }

    #[test]
    fn test_category_only_request_uses_default_pair() {
        let cases = [
            (r#"{"category":"weight"}"#, "kilograms", "grams", "1000.0000"),
            (r#"{"category":"area"}"#, "sq_meters", "sq_yards", "1.1960"),
            (r#"{"category":"force","value":"1"}"#, "newtons", "kilonewtons", "0.0010"),
        ];
        for (json, from, to, shown) in cases {
            let input: ConversionInput = serde_json::from_str(json).unwrap();
            let result = calculate(&input).unwrap();
            assert_eq!(result.from, from, "{}", json);
            assert_eq!(result.to, to, "{}", json);
            assert_eq!(result.display(), shown, "{}", json);
        }
    }

    #[test]
    fn test_only_target_named() {
        let input: ConversionInput = serde_json::from_str(r#"{"category":"force","to":"lbf"}"#).unwrap();
        let result = calculate(&input).unwrap();
        assert_eq!(result.from, "newtons");
        assert_eq!(result.display(), "0.2248");
    }

    #[test]
    fn test_overflowing_result_shows_no_result() {
        let input = ConversionInput {
            category: Category::Length,
            value: "1e307".to_string(),
            from: "m".to_string(),
            to: "cm".to_string(),
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.value, None);
        assert_eq!(result.display(), NO_RESULT);
    }
}
