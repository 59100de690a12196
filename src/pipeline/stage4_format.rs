use crate::schema::FeatureVector;

pub const SUCCESS_MESSAGE: &str = "prediction successful";

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    /// Score rounded to two decimals for presentation.
    pub predicted_quality: f64,
    pub raw_score: f64,
    pub input_features: FeatureVector,
    pub message: &'static str,
}

pub fn run_stage4(score: f64, features: FeatureVector) -> PredictionResult {
    PredictionResult {
        predicted_quality: round2(score),
        raw_score: score,
        input_features: features,
        message: SUCCESS_MESSAGE,
    }
}

/// Rounds on the exact binary value, so `2.675` (stored just below) gives `2.67`.
pub fn round2(v: f64) -> f64 {
    format!("{v:.2}").parse().unwrap_or(v)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_format.rs"]
mod tests;
