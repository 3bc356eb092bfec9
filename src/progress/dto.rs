use serde::{Deserialize, Serialize};
use time::Date;

use crate::day::iso_day;

use super::repo_types::ProgressPhoto;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeasurementRequest {
    #[serde(default, with = "iso_day::option")]
    pub date: Option<Date>,
    pub weight_kg: Option<f64>,
    pub waist_cm: Option<f64>,
    pub hips_cm: Option<f64>,
    pub chest_cm: Option<f64>,
    pub arms_cm: Option<f64>,
    pub legs_cm: Option<f64>,
    pub body_fat_pct: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PhotoFilter {
    pub photo_type: Option<String>,
}

/// Photo row plus a short-lived download link.
#[derive(Debug, Serialize)]
pub struct PhotoView {
    #[serde(flatten)]
    pub photo: ProgressPhoto,
    pub url: String,
}
