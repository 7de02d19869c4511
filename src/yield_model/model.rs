//! Regression models and the yield estimator.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::AppPaths;
use crate::yield_model::encoder::{DataError, LabelEncoders};

/// Categorical columns in model feature order; `Area` follows them.
pub const CATEGORICAL_COLUMNS: [&str; 3] = ["District_Name", "Season", "Crop"];

/// Smallest cultivated area accepted, in hectares.
pub const MIN_AREA_HECTARES: f64 = 1.0;

// ---------------------------------------------------------------------------
// YieldModel trait
// ---------------------------------------------------------------------------

/// A trained regressor: encoded features in, production (kilotons) out.
pub trait YieldModel: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<f64, DataError>;
}

/// `intercept + Σ coefficients[i] · features[i]`.
///
/// Artifact format (JSON): `{ "intercept": 1.5, "coefficients": [..4 values..] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearYieldModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearYieldModel {
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| DataError::artifact(path, e))?;
        serde_json::from_str(&content).map_err(|e| DataError::artifact(path, e))
    }
}

impl YieldModel for LinearYieldModel {
    fn predict(&self, features: &[f64]) -> Result<f64, DataError> {
        if features.len() != self.coefficients.len() {
            return Err(DataError::FeatureCount {
                expected: self.coefficients.len(),
                got: features.len(),
            });
        }
        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(c, x)| c * x)
                .sum::<f64>())
    }
}

// ---------------------------------------------------------------------------
// YieldEstimator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct YieldQuery {
    pub district: String,
    pub season: String,
    pub crop: String,
    pub area_hectares: f64,
}

pub struct YieldEstimator {
    encoders: LabelEncoders,
    model: Box<dyn YieldModel>,
}

impl YieldEstimator {
    pub fn new(encoders: LabelEncoders, model: Box<dyn YieldModel>) -> Self {
        Self { encoders, model }
    }

    pub fn from_files(encoders: &Path, model: &Path) -> Result<Self, DataError> {
        let encoders = LabelEncoders::load(encoders)?;
        let model = LinearYieldModel::load(model)?;
        Ok(Self::new(encoders, Box::new(model)))
    }

    /// Load `label-encoders.json` and `yield-model.json` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, DataError> {
        Self::from_files(&dir.join("label-encoders.json"), &dir.join("yield-model.json"))
    }

    /// Load from the platform artifacts directory.
    pub fn from_paths(paths: &AppPaths) -> Result<Self, DataError> {
        Self::from_files(&paths.label_encoders_file(), &paths.yield_model_file())
    }

    /// Predicted production in kilotons.
    pub fn estimate(&self, query: &YieldQuery) -> Result<f64, DataError> {
        if query.area_hectares.is_nan() || query.area_hectares < MIN_AREA_HECTARES {
            return Err(DataError::InvalidArea(query.area_hectares));
        }

        let values = [&query.district, &query.season, &query.crop];
        let mut features = Vec::with_capacity(CATEGORICAL_COLUMNS.len() + 1);
        for (column, value) in CATEGORICAL_COLUMNS.iter().zip(values) {
            features.push(self.encoders.encode(column, value)?);
        }
        features.push(query.area_hectares);

        let prediction = self.model.predict(&features)?;
        log::debug!("yield: {query:?} → {prediction:.2} kt");
        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yield_model::encoder::LabelEncoder;
    use tempfile::tempdir;

    fn encoders() -> LabelEncoders {
        let mut e = LabelEncoders::default();
        e.insert("District_Name", LabelEncoder::new(["AHMEDNAGAR", "PUNE"]));
        e.insert("Season", LabelEncoder::new(["Kharif", "Rabi"]));
        e.insert("Crop", LabelEncoder::new(["Jowar", "Wheat"]));
        e
    }

    fn model() -> LinearYieldModel {
        LinearYieldModel {
            intercept: 1.0,
            coefficients: vec![10.0, 100.0, 1000.0, 0.5],
        }
    }

    fn query(crop: &str, area: f64) -> YieldQuery {
        YieldQuery {
            district: "PUNE".into(),
            season: "Rabi".into(),
            crop: crop.into(),
            area_hectares: area,
        }
    }

    #[test]
    fn estimate_uses_encoded_features_in_order() {
        let est = YieldEstimator::new(encoders(), Box::new(model()));
        // 1 + 10·1 + 100·1 + 1000·1 + 0.5·4
        assert_eq!(est.estimate(&query("Wheat", 4.0)), Ok(1113.0));
    }

    #[test]
    fn unseen_crop_is_not_grown() {
        let est = YieldEstimator::new(encoders(), Box::new(model()));
        let err = est.estimate(&query("Coffee", 4.0)).unwrap_err();
        assert!(matches!(err, DataError::NotGrown { ref column, .. } if column == "Crop"));
    }

    #[test]
    fn area_below_one_hectare_is_rejected() {
        let est = YieldEstimator::new(encoders(), Box::new(model()));
        assert_eq!(
            est.estimate(&query("Wheat", 0.5)),
            Err(DataError::InvalidArea(0.5))
        );
        assert!(est.estimate(&query("Wheat", f64::NAN)).is_err());
        assert!(est.estimate(&query("Wheat", 1.0)).is_ok());
    }

    #[test]
    fn feature_count_mismatch() {
        let short = LinearYieldModel {
            intercept: 0.0,
            coefficients: vec![1.0],
        };
        assert_eq!(
            short.predict(&[1.0, 2.0]),
            Err(DataError::FeatureCount { expected: 1, got: 2 })
        );
    }

    #[test]
    fn loads_artifacts_from_dir() {
        let dir = tempdir().expect("temp dir");
        std::fs::write(
            dir.path().join("label-encoders.json"),
            r#"{"District_Name":["PUNE"],"Season":["Rabi"],"Crop":["Wheat"]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("yield-model.json"),
            serde_json::to_string(&model()).unwrap(),
        )
        .unwrap();

        let est = YieldEstimator::from_dir(dir.path()).unwrap();
        // All categories encode to 0.
        assert_eq!(est.estimate(&query("Wheat", 2.0)), Ok(2.0));
    }

    #[test]
    fn missing_dir_is_artifact_error() {
        let dir = tempdir().expect("temp dir");
        let err = YieldEstimator::from_dir(dir.path()).err().unwrap();
        assert!(matches!(err, DataError::Artifact { .. }));
    }
}
