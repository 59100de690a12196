pub mod defs;

pub use defs::{FeatureDef, builtin_features};

pub const FEATURE_COUNT: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RangePolicy {
    /// Skip plausibility checks entirely.
    Off,
    /// Log out-of-range values but accept them.
    #[default]
    Warn,
    /// Reject out-of-range values as validation errors.
    Strict,
}

impl RangePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RangePolicy::Off => "off",
            RangePolicy::Warn => "warn",
            RangePolicy::Strict => "strict",
        }
    }
}

/// Raw measurements in schema order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        field_order().zip(self.values.iter().copied())
    }
}

/// Standardized measurements, same order as [`FeatureVector`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledVector {
    values: Vec<f64>,
}

impl ScaledVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

pub fn field_order() -> impl Iterator<Item = &'static str> {
    builtin_features().iter().map(|def| def.name)
}

pub fn expected_field_count() -> usize {
    builtin_features().len()
}

/// Checks a recorded feature-name list against the schema order.
pub fn check_order(names: &[String]) -> Result<(), String> {
    if names.len() != FEATURE_COUNT {
        return Err(format!(
            "expected {} feature names, found {}",
            FEATURE_COUNT,
            names.len()
        ));
    }
    for (idx, (found, expected)) in names.iter().zip(field_order()).enumerate() {
        if found != expected {
            return Err(format!(
                "feature {} is {:?}, expected {:?}",
                idx, found, expected
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/schema/tests.rs"]
mod tests;
