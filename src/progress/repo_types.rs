use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::day::iso_day;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BodyMeasurement {
    pub id: Uuid,
    #[serde(with = "iso_day")]
    pub date: Date,
    pub weight_kg: Option<f64>,
    pub waist_cm: Option<f64>,
    pub hips_cm: Option<f64>,
    pub chest_cm: Option<f64>,
    pub arms_cm: Option<f64>,
    pub legs_cm: Option<f64>,
    pub body_fat_pct: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProgressPhoto {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub s3_key: String,
    pub photo_type: String,
    #[serde(with = "iso_day")]
    pub date: Date,
    pub weight_kg: Option<f64>,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
