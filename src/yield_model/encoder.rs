//! Categorical label encoding and the data-error type.
//!
//! A [`LabelEncoder`] maps each category seen during training to its index
//! in the sorted class list, matching how the training pipeline encoded
//! `District_Name`, `Season` and `Crop`.  Categories never seen in training
//! cannot be encoded; for this dataset that means the crop is not grown in
//! the chosen district.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::error::ErrorClass;

// ---------------------------------------------------------------------------
// DataError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DataError {
    /// A category value was not present in the training data.
    #[error("Crop not grown in this district ({column} {value:?} is unknown)")]
    NotGrown { column: String, value: String },

    /// Cultivated area below one hectare (or not a number).
    #[error("area must be at least 1 hectare, got {0}")]
    InvalidArea(f64),

    /// The encoder artifact has no table for a required column.
    #[error("no label encoder for column {0:?}")]
    MissingColumn(String),

    /// Feature vector length does not match the model.
    #[error("model expects {expected} features, got {got}")]
    FeatureCount { expected: usize, got: usize },

    /// A model or encoder artifact could not be read or parsed.
    #[error("cannot load artifact {path}: {message}")]
    Artifact { path: String, message: String },
}

impl DataError {
    pub fn class(&self) -> ErrorClass {
        match self {
            DataError::Artifact { .. } | DataError::MissingColumn(_) => {
                ErrorClass::Configuration
            }
            _ => ErrorClass::Data,
        }
    }

    pub(crate) fn artifact(path: &Path, message: impl ToString) -> Self {
        DataError::Artifact {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// LabelEncoder
// ---------------------------------------------------------------------------

/// Sorted, de-duplicated class list for one categorical column.
///
/// Classes are kept exactly as trained so indices match the artifact, padding
/// included: the source dataset pads season names (`"Kharif     "`).  Lookup
/// tries the exact value first, then the first class equal after trimming.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut classes: Vec<String> = classes
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Index of `value` among the sorted classes, as a model feature.
    pub fn transform(&self, column: &str, value: &str) -> Result<f64, DataError> {
        let needle = value.trim();
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
            .or_else(|| self.classes.iter().position(|c| c.trim() == needle))
            .map(|i| i as f64)
            .ok_or_else(|| DataError::NotGrown {
                column: column.to_string(),
                value: needle.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// LabelEncoders
// ---------------------------------------------------------------------------

/// Encoders for every categorical column, keyed by column name.
///
/// Artifact format (JSON): `{ "District_Name": ["AHMEDNAGAR", ...], ... }`.
#[derive(Debug, Clone, Default)]
pub struct LabelEncoders {
    columns: HashMap<String, LabelEncoder>,
}

impl LabelEncoders {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, Vec<String>> = serde_json::from_str(json)?;
        Ok(Self {
            columns: raw
                .into_iter()
                .map(|(column, classes)| (column, LabelEncoder::new(classes)))
                .collect(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, DataError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| DataError::artifact(path, e))?;
        Self::from_json_str(&content).map_err(|e| DataError::artifact(path, e))
    }

    pub fn insert(&mut self, column: impl Into<String>, encoder: LabelEncoder) {
        self.columns.insert(column.into(), encoder);
    }

    pub fn get(&self, column: &str) -> Option<&LabelEncoder> {
        self.columns.get(column)
    }

    pub fn encode(&self, column: &str, value: &str) -> Result<f64, DataError> {
        self.get(column)
            .ok_or_else(|| DataError::MissingColumn(column.to_string()))?
            .transform(column, value)
    }
}
