//! # Reactive Forms
//!
//! A derived value is declared as a pure function of a named set of input
//! fields. The form owns the raw input; every edit goes through the form,
//! which notifies each derived cell so it re-derives only when one of its
//! dependencies changed.
//!
//! ```rust
//! use fabric_core::calculations::shrinkage::Component;
//! use fabric_core::reactive::{ShrinkageField, ShrinkageForm};
//!
//! let mut form = ShrinkageForm::new();
//! form.set(ShrinkageField::Before(Component::Length), "50").unwrap();
//! form.set(ShrinkageField::Before(Component::Width), "40").unwrap();
//! form.set(ShrinkageField::Weight, "90").unwrap();
//! assert_eq!(form.gsm(), Some(450.0));
//! ```

use tracing::trace;

use crate::calculations::shrinkage::{self, Component, ShrinkageInput, ShrinkageResult};
use crate::calculations::yarn_count::{self, Ply, YarnCountInput, YarnCountResult};
use crate::errors::CalcResult;
use crate::units::SampleUnit;

/// A value derived from a subset of a form's fields
pub trait Derivation {
    type Input;
    type Field: Copy + std::fmt::Debug;
    type Output: Clone + PartialEq;

    /// Whether an edit to `field` can change the derived value
    fn depends_on(&self, field: Self::Field) -> bool;

    /// Compute the value from the full input snapshot
    fn derive(&self, input: &Self::Input) -> Self::Output;
}

/// Cached result of a [`Derivation`]
#[derive(Debug, Clone)]
pub struct Derived<D: Derivation> {
    derivation: D,
    value: D::Output,
}

impl<D: Derivation> Derived<D> {
    pub fn new(derivation: D, input: &D::Input) -> Self {
        let value = derivation.derive(input);
        Derived { derivation, value }
    }

    pub fn value(&self) -> &D::Output {
        &self.value
    }

    /// Re-derive if `field` is a dependency. Returns true when it re-derived.
    pub fn notify(&mut self, field: D::Field, input: &D::Input) -> bool {
        if !self.derivation.depends_on(field) {
            return false;
        }
        let value = self.derivation.derive(input);
        trace!(?field, changed = value != self.value, "re-derived");
        self.value = value;
        true
    }
}

// ============================================================================
// Shrinkage
// ============================================================================

/// Editable fields of the shrinkage form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShrinkageField {
    Before(Component),
    After(Component),
    Weight,
    Unit,
}

/// Auto GSM of the unwashed sample
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoGsm;

impl Derivation for AutoGsm {
    type Input = ShrinkageInput;
    type Field = ShrinkageField;
    type Output = Option<f64>;

    fn depends_on(&self, field: ShrinkageField) -> bool {
        matches!(
            field,
            ShrinkageField::Before(Component::Length)
                | ShrinkageField::Before(Component::Width)
                | ShrinkageField::Weight
                | ShrinkageField::Unit
        )
    }

    fn derive(&self, input: &ShrinkageInput) -> Option<f64> {
        shrinkage::derive_gsm(input)
    }
}

/// Shrinkage input with its auto GSM kept current
#[derive(Debug, Clone)]
pub struct ShrinkageForm {
    input: ShrinkageInput,
    gsm: Derived<AutoGsm>,
}

impl Default for ShrinkageForm {
    fn default() -> Self {
        ShrinkageForm::new()
    }
}

impl ShrinkageForm {
    pub fn new() -> Self {
        ShrinkageForm::from_input(ShrinkageInput::default())
    }

    pub fn from_input(input: ShrinkageInput) -> Self {
        let gsm = Derived::new(AutoGsm, &input);
        ShrinkageForm { input, gsm }
    }

    pub fn input(&self) -> &ShrinkageInput {
        &self.input
    }

    /// Store field text. The unit field accepts "cm" or "in".
    pub fn set(&mut self, field: ShrinkageField, text: &str) -> CalcResult<()> {
        match field {
            ShrinkageField::Before(c) => self.input.pair_mut(c).before = text.to_string(),
            ShrinkageField::After(c) => self.input.pair_mut(c).after = text.to_string(),
            ShrinkageField::Weight => self.input.weight = text.to_string(),
            ShrinkageField::Unit => self.input.unit = SampleUnit::from_str_flexible(text)?,
        }
        self.gsm.notify(field, &self.input);
        Ok(())
    }

    pub fn set_unit(&mut self, unit: SampleUnit) {
        self.input.unit = unit;
        self.gsm.notify(ShrinkageField::Unit, &self.input);
    }

    /// Current auto GSM, 1 decimal
    pub fn gsm(&self) -> Option<f64> {
        *self.gsm.value()
    }

    /// Full result with the cached GSM
    pub fn result(&self) -> ShrinkageResult {
        ShrinkageResult {
            gsm: self.gsm(),
            ..shrinkage::calculate(&self.input)
        }
    }
}

// ============================================================================
// Yarn Count
// ============================================================================

/// Editable fields of the yarn count form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YarnField {
    Length,
    Threads,
    Weight,
    Ply,
    Tpi,
}

/// Count and twist multiplier; every field is a dependency
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveYarnCount;

impl Derivation for LiveYarnCount {
    type Input = YarnCountInput;
    type Field = YarnField;
    type Output = YarnCountResult;

    fn depends_on(&self, _field: YarnField) -> bool {
        true
    }

    fn derive(&self, input: &YarnCountInput) -> YarnCountResult {
        yarn_count::calculate(input)
    }
}

/// Yarn count input with a live result
#[derive(Debug, Clone)]
pub struct YarnCountForm {
    input: YarnCountInput,
    result: Derived<LiveYarnCount>,
}

impl Default for YarnCountForm {
    fn default() -> Self {
        let input = YarnCountInput::default();
        let result = Derived::new(LiveYarnCount, &input);
        YarnCountForm { input, result }
    }
}

impl YarnCountForm {
    pub fn new() -> Self {
        YarnCountForm::default()
    }

    pub fn input(&self) -> &YarnCountInput {
        &self.input
    }

    /// Store field text. The ply field accepts a name or multiplier.
    pub fn set(&mut self, field: YarnField, text: &str) -> CalcResult<()> {
        match field {
            YarnField::Length => self.input.length_cm = text.to_string(),
            YarnField::Threads => self.input.threads = text.to_string(),
            YarnField::Weight => self.input.weight_g = text.to_string(),
            YarnField::Ply => self.input.ply = Ply::from_str_flexible(text)?,
            YarnField::Tpi => self.input.tpi = text.to_string(),
        }
        self.result.notify(field, &self.input);
        Ok(())
    }

    pub fn set_ply(&mut self, ply: Ply) {
        self.input.ply = ply;
        self.result.notify(YarnField::Ply, &self.input);
    }

    pub fn result(&self) -> YarnCountResult {
        *self.result.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> ShrinkageForm {
        let mut form = ShrinkageForm::new();
        form.set(ShrinkageField::Before(Component::Length), "50").unwrap();
        form.set(ShrinkageField::Before(Component::Width), "40").unwrap();
        form.set(ShrinkageField::Weight, "90").unwrap();
        form
    }

    #[test]
    fn test_auto_gsm_follows_dependencies() {
        let mut form = filled_form();
        assert_eq!(form.gsm(), Some(450.0));

        form.set(ShrinkageField::Weight, "45").unwrap();
        assert_eq!(form.gsm(), Some(225.0));

        form.set_unit(SampleUnit::In);
        // 45 × 1550 / 2000 = 34.875
        assert_eq!(form.gsm(), Some(34.9));
    }

    #[test]
    fn test_after_values_do_not_trigger_gsm() {
        let mut gsm = Derived::new(AutoGsm, &ShrinkageInput::default());
        let input = ShrinkageInput::default();
        assert!(!gsm.notify(ShrinkageField::After(Component::Length), &input));
        assert!(!gsm.notify(ShrinkageField::Before(Component::Border1), &input));
        assert!(gsm.notify(ShrinkageField::Before(Component::Width), &input));
        assert!(gsm.notify(ShrinkageField::Unit, &input));
    }

    #[test]
    fn test_clearing_a_dependency_clears_gsm() {
        let mut form = filled_form();
        form.set(ShrinkageField::Before(Component::Width), "").unwrap();
        assert_eq!(form.gsm(), None);
        form.set(ShrinkageField::Before(Component::Width), "40").unwrap();
        assert_eq!(form.gsm(), Some(450.0));
    }

    #[test]
    fn test_form_result_matches_pure_engine() {
        let mut form = filled_form();
        form.set(ShrinkageField::After(Component::Length), "46").unwrap();
        form.set(ShrinkageField::After(Component::Width), "38").unwrap();
        assert_eq!(form.result(), shrinkage::calculate(form.input()));
    }

    #[test]
    fn test_unit_text_parsing() {
        let mut form = filled_form();
        assert!(form.set(ShrinkageField::Unit, "furlong").is_err());
        assert_eq!(form.input().unit, SampleUnit::Cm);
        form.set(ShrinkageField::Unit, "inches").unwrap();
        assert_eq!(form.input().unit, SampleUnit::In);
    }

    #[test]
    fn test_yarn_form_live_result() {
        let mut form = YarnCountForm::new();
        assert_eq!(form.result(), YarnCountResult::default());

        form.set(YarnField::Length, "1600").unwrap();
        form.set(YarnField::Weight, "0.59").unwrap();
        assert_eq!(form.result().count, 16.0);

        form.set(YarnField::Tpi, "20").unwrap();
        assert_eq!(form.result().twist_multiplier, 5.0);

        form.set(YarnField::Ply, "2").unwrap();
        assert_eq!(form.result().count, 32.0);

        form.set_ply(Ply::Single);
        form.set(YarnField::Threads, "").unwrap();
        assert_eq!(form.result(), YarnCountResult::default());
    }
}
