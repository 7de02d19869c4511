//! Crop-production estimate from district, season, crop and area.
//!
//! Categories are label-encoded with the class lists used at training time,
//! `Area` is appended, and the feature vector goes to a [`YieldModel`].
//! Training is done elsewhere; this module only loads its JSON artifacts.

pub mod encoder;
pub mod model;

pub use encoder::{DataError, LabelEncoder, LabelEncoders};
pub use model::{
    LinearYieldModel, YieldEstimator, YieldModel, YieldQuery, CATEGORICAL_COLUMNS,
    MIN_AREA_HECTARES,
};
