use crate::model::{ModelError, ShapeError};

/// Per-feature standardization `(x - mean) / scale` fitted offline.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ModelError> {
        if mean.len() != scale.len() {
            return Err(ShapeError {
                what: "scaler scale",
                expected: mean.len(),
                found: scale.len(),
            }
            .into());
        }
        for (index, &value) in mean.iter().enumerate() {
            if !value.is_finite() {
                return Err(ModelError::BadScale {
                    field: "mean",
                    index,
                    value,
                });
            }
        }
        for (index, &value) in scale.iter().enumerate() {
            if !value.is_finite() || value == 0.0 {
                return Err(ModelError::BadScale {
                    field: "scale",
                    index,
                    value,
                });
            }
        }
        Ok(Self { mean, scale })
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, values: &[f64]) -> Result<Vec<f64>, ShapeError> {
        self.check_len(values)?;
        Ok(values
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(&x, (&m, &s))| (x - m) / s)
            .collect())
    }

    pub fn inverse_transform(&self, scaled: &[f64]) -> Result<Vec<f64>, ShapeError> {
        self.check_len(scaled)?;
        Ok(scaled
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(&z, (&m, &s))| z * s + m)
            .collect())
    }

    fn check_len(&self, values: &[f64]) -> Result<(), ShapeError> {
        if values.len() != self.mean.len() {
            return Err(ShapeError {
                what: "scaler input",
                expected: self.mean.len(),
                found: values.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/scaler.rs"]
mod tests;
