//! # fabric_core - Textile Quality-Control Calculation Engine
//!
//! `fabric_core` is the computational heart of Fabricalc: GSM, shrinkage,
//! fiber composition, lint loss, lab solutions, blends, yarn count and unit
//! conversion. Every input is the raw text a technician typed; every result
//! is rounded for display. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Forgiving Input**: Incomplete fields give zeros or placeholders, never errors
//! - **Rich Errors**: Physical constraint violations name the offending field
//!
//! ## Quick Start
//!
//! ```rust
//! use fabric_core::calculations::{CalculationItem, CalculationOutput, GsmInput};
//!
//! let item = CalculationItem::Gsm(GsmInput {
//!     length: "10".to_string(),
//!     width: "10".to_string(),
//!     weight: "2".to_string(),
//!     ..Default::default()
//! });
//!
//! match item.calculate().unwrap() {
//!     CalculationOutput::Gsm(result) => assert_eq!(result.gsm_display(), "200.0"),
//!     _ => unreachable!(),
//! }
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - All calculators and the tagged dispatch enum
//! - [`reactive`] - Forms whose derived fields follow their inputs
//! - [`parse`] - Field text parsing and display rounding
//! - [`units`] - Unit tables and type-safe quantity wrappers
//! - [`errors`] - Structured error types
//! - [`preferences`] / [`file_io`] - Theme preference and its atomic persistence

pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod parse;
pub mod preferences;
pub mod reactive;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{CalculationItem, CalculationOutput};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_or_default, save_preferences};
pub use preferences::{Preferences, Theme};
