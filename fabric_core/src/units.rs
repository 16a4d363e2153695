//! # Unit Types
//!
//! Conversion tables and unit selectors used by the calculators.
//!
//! ## Conversion Categories
//!
//! General conversion works through a closed set of [`Category`] tables.
//! Every factor is relative to the category's base unit (factor `1`):
//!
//! - Length: meters
//! - Weight: kilograms
//! - Area: square meters
//! - Force: newtons
//!
//! `converted = value / factor[from] * factor[to]`. No plausibility checks
//! are applied, negative values convert like any other number.
//!
//! ## Dimension Selectors
//!
//! [`LinearUnit`], [`VolumeUnit`] and [`SampleUnit`] are the fixed unit
//! pickers of the area-weight, solution and shrinkage calculators.
//!
//! ## Example
//!
//! ```rust
//! use fabric_core::units::{convert, Category};
//!
//! let inches = convert(Category::Length, 1.0, "meters", "inches").unwrap();
//! assert!((inches - 39.3701).abs() < 1e-9);
//!
//! // Symbols are accepted too
//! let grams = convert(Category::Weight, 2.0, "kg", "g").unwrap();
//! assert!((grams - 2000.0).abs() < 1e-9);
//! ```

use std::collections::HashMap;
use std::ops::Mul;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Conversion Categories
// ============================================================================

/// One entry of a conversion table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitDef {
    /// Canonical name (e.g., "centimeters", "sq_yards")
    pub name: &'static str,
    /// Display symbol (e.g., "cm", "yd²")
    pub symbol: &'static str,
    /// Units per one base unit
    pub factor: f64,
}

const fn unit(name: &'static str, symbol: &'static str, factor: f64) -> UnitDef {
    UnitDef { name, symbol, factor }
}

static LENGTH_UNITS: [UnitDef; 5] = [
    unit("meters", "m", 1.0),
    unit("centimeters", "cm", 100.0),
    unit("inches", "in", 39.3701),
    unit("yards", "yd", 1.09361),
    unit("feet", "ft", 3.28084),
];

static WEIGHT_UNITS: [UnitDef; 4] = [
    unit("kilograms", "kg", 1.0),
    unit("grams", "g", 1000.0),
    unit("pounds", "lb", 2.20462),
    unit("ounces", "oz", 35.274),
];

static AREA_UNITS: [UnitDef; 3] = [
    unit("sq_meters", "m²", 1.0),
    unit("sq_yards", "yd²", 1.19599),
    unit("sq_feet", "ft²", 10.7639),
];

static FORCE_UNITS: [UnitDef; 5] = [
    unit("newtons", "N", 1.0),
    unit("kilonewtons", "kN", 0.001),
    unit("pound_force", "lbf", 0.22481),
    unit("kilogram_force", "kgf", 0.10197),
    unit("gram_force", "gf", 101.972),
];

/// Physical quantity groups for general unit conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Length,
    Weight,
    Area,
    Force,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 4] = [Category::Length, Category::Weight, Category::Area, Category::Force];

    /// The category's conversion table, base unit first
    pub fn units(self) -> &'static [UnitDef] {
        match self {
            Category::Length => &LENGTH_UNITS,
            Category::Weight => &WEIGHT_UNITS,
            Category::Area => &AREA_UNITS,
            Category::Force => &FORCE_UNITS,
        }
    }

    /// The unit with factor 1
    pub fn base_unit(self) -> &'static UnitDef {
        &self.units()[0]
    }

    /// Units preselected when the user switches to this category
    pub fn default_pair(self) -> (&'static UnitDef, &'static UnitDef) {
        let units = self.units();
        (&units[0], &units[1])
    }

    /// Look up a unit by canonical name or symbol
    pub fn find(self, name: &str) -> CalcResult<&'static UnitDef> {
        UNIT_INDEX
            .get(&(self, name.trim().to_lowercase()))
            .copied()
            .ok_or_else(|| CalcError::unknown_unit(self.display_name(), name))
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "length" | "len" => Ok(Category::Length),
            "weight" | "mass" => Ok(Category::Weight),
            "area" => Ok(Category::Area),
            "force" => Ok(Category::Force),
            _ => Err(CalcError::invalid_input("category", s, "Expected Length, Weight, Area or Force")),
        }
    }

    /// Get display name
    pub fn display_name(self) -> &'static str {
        match self {
            Category::Length => "Length",
            Category::Weight => "Weight",
            Category::Area => "Area",
            Category::Force => "Force",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// (category, lowercase name or symbol) -> unit
static UNIT_INDEX: Lazy<HashMap<(Category, String), &'static UnitDef>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for category in Category::ALL {
        for def in category.units() {
            index.insert((category, def.name.to_lowercase()), def);
            index.insert((category, def.symbol.to_lowercase()), def);
            if def.name.contains('_') {
                index.insert((category, def.name.replace('_', " ")), def);
            }
        }
    }
    index
});

/// Convert `value` between two units of the same category.
///
/// Uses full floating-point precision; round with [`crate::parse::round_to`]
/// for display.
pub fn convert(category: Category, value: f64, from: &str, to: &str) -> CalcResult<f64> {
    let from = category.find(from)?;
    let to = category.find(to)?;
    Ok(scale(value, from, to))
}

/// Rescale through the base unit
pub fn scale(value: f64, from: &UnitDef, to: &UnitDef) -> f64 {
    let base = value / from.factor;
    base * to.factor
}

// ============================================================================
// Dimension Selectors
// ============================================================================

/// Linear unit for fabric sample dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinearUnit {
    Mm,
    #[default]
    Cm,
    M,
    In,
    Ft,
    Yd,
}

impl LinearUnit {
    /// All linear units in display order
    pub const ALL: [LinearUnit; 6] = [
        LinearUnit::Mm,
        LinearUnit::Cm,
        LinearUnit::M,
        LinearUnit::In,
        LinearUnit::Ft,
        LinearUnit::Yd,
    ];

    /// How many of this unit make one meter
    pub fn per_meter(self) -> f64 {
        match self {
            LinearUnit::Mm => 1000.0,
            LinearUnit::Cm => 100.0,
            LinearUnit::M => 1.0,
            LinearUnit::In => 39.3701,
            LinearUnit::Ft => 3.28084,
            LinearUnit::Yd => 1.09361,
        }
    }

    /// Short symbol (e.g., "cm")
    pub fn symbol(self) -> &'static str {
        match self {
            LinearUnit::Mm => "mm",
            LinearUnit::Cm => "cm",
            LinearUnit::M => "m",
            LinearUnit::In => "in",
            LinearUnit::Ft => "ft",
            LinearUnit::Yd => "yd",
        }
    }

    /// Get display name
    pub fn display_name(self) -> &'static str {
        match self {
            LinearUnit::Mm => "Millimeters (mm)",
            LinearUnit::Cm => "Centimeters (cm)",
            LinearUnit::M => "Meters (m)",
            LinearUnit::In => "Inches (in)",
            LinearUnit::Ft => "Feet (ft)",
            LinearUnit::Yd => "Yards (yd)",
        }
    }

    /// Spelled-out names accepted besides the symbol
    fn aliases(self) -> &'static [&'static str] {
        match self {
            LinearUnit::Mm => &["millimeter", "millimeters", "millimetre", "millimetres"],
            LinearUnit::Cm => &["centimeter", "centimeters", "centimetre", "centimetres"],
            LinearUnit::M => &["meter", "meters", "metre", "metres"],
            LinearUnit::In => &["inch", "inches"],
            LinearUnit::Ft => &["foot", "feet"],
            LinearUnit::Yd => &["yard", "yards"],
        }
    }

    /// Parse from symbol or name ("cm", "Centimeters")
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let wanted = s.trim().to_lowercase();
        LinearUnit::ALL
            .into_iter()
            .find(|u| u.symbol() == wanted || u.aliases().contains(&wanted.as_str()))
            .ok_or_else(|| CalcError::unknown_unit("Length", s))
    }
}

impl std::fmt::Display for LinearUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Unit of the shrinkage sample measurements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleUnit {
    #[default]
    Cm,
    In,
}

impl SampleUnit {
    /// Square units per square meter (1 m² = 10000 cm² ≈ 1550 in²)
    pub fn sq_per_sq_meter(self) -> f64 {
        match self {
            SampleUnit::Cm => 10000.0,
            SampleUnit::In => 1550.0,
        }
    }

    /// Short symbol
    pub fn symbol(self) -> &'static str {
        match self {
            SampleUnit::Cm => "cm",
            SampleUnit::In => "in",
        }
    }

    /// Parse from symbol or name
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "cm" | "centimeters" | "centimetres" => Ok(SampleUnit::Cm),
            "in" | "inch" | "inches" => Ok(SampleUnit::In),
            _ => Err(CalcError::unknown_unit("Length", s)),
        }
    }
}

impl std::fmt::Display for SampleUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Volume unit for solution preparation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeUnit {
    #[default]
    #[serde(alias = "L", alias = "l")]
    Liters,
    #[serde(alias = "ml")]
    Milliliters,
    #[serde(alias = "gal")]
    Gallons,
}

impl VolumeUnit {
    /// All volume units in display order
    pub const ALL: [VolumeUnit; 3] = [VolumeUnit::Liters, VolumeUnit::Milliliters, VolumeUnit::Gallons];

    /// Normalize a volume in this unit to liters
    pub fn to_liters(self, value: f64) -> Liters {
        match self {
            VolumeUnit::Liters => Liters(value),
            VolumeUnit::Milliliters => Liters(value / 1000.0),
            VolumeUnit::Gallons => Liters(value * 3.78541),
        }
    }

    /// Short symbol as shown in instructions
    pub fn symbol(self) -> &'static str {
        match self {
            VolumeUnit::Liters => "L",
            VolumeUnit::Milliliters => "ml",
            VolumeUnit::Gallons => "gal",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            VolumeUnit::Liters => &["l", "liter", "liters", "litre", "litres"],
            VolumeUnit::Milliliters => &["milliliter", "milliliters", "millilitre", "millilitres"],
            VolumeUnit::Gallons => &["gallon", "gallons"],
        }
    }

    /// Parse from symbol or name ("L", "ml", "gallons")
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let wanted = s.trim().to_lowercase();
        VolumeUnit::ALL
            .into_iter()
            .find(|u| u.symbol() == wanted || u.aliases().contains(&wanted.as_str()))
            .ok_or_else(|| CalcError::unknown_unit("Volume", s))
    }
}

impl std::fmt::Display for VolumeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ============================================================================
// Quantity Wrappers
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Area in square meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMeters(pub f64);

/// Mass in grams
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grams(pub f64);

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

/// Mass in pounds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pounds(pub f64);

/// Volume in liters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Liters(pub f64);

impl Mul for Meters {
    type Output = SquareMeters;
    fn mul(self, rhs: Self) -> SquareMeters {
        SquareMeters(self.0 * rhs.0)
    }
}

impl From<Grams> for Kilograms {
    fn from(g: Grams) -> Self {
        Kilograms(g.0 / 1000.0)
    }
}

impl From<Grams> for Pounds {
    fn from(g: Grams) -> Self {
        Pounds(g.0 * 0.00220462)
    }
}
