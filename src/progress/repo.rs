use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    repo_types::{BodyMeasurement, ProgressPhoto},
    services::{Measurement, NewPhoto},
};

const MEASUREMENT_COLUMNS: &str = "id, date, weight_kg, waist_cm, hips_cm, chest_cm, arms_cm, \
                                   legs_cm, body_fat_pct, created_at";

const PHOTO_COLUMNS: &str = "id, s3_key, photo_type, date, weight_kg, notes, created_at";

pub async fn insert_measurement(
    db: &PgPool,
    user_id: Uuid,
    m: &Measurement,
) -> anyhow::Result<BodyMeasurement> {
    sqlx::query_as::<_, BodyMeasurement>(&format!(
        r#"
        INSERT INTO body_measurements
            (user_id, date, weight_kg, waist_cm, hips_cm, chest_cm, arms_cm, legs_cm, body_fat_pct)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {MEASUREMENT_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(m.date)
    .bind(m.weight_kg)
    .bind(m.waist_cm)
    .bind(m.hips_cm)
    .bind(m.chest_cm)
    .bind(m.arms_cm)
    .bind(m.legs_cm)
    .bind(m.body_fat_pct)
    .fetch_one(db)
    .await
    .context("insert body measurement")
}

pub async fn list_measurements(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<BodyMeasurement>> {
    sqlx::query_as::<_, BodyMeasurement>(&format!(
        r#"
        SELECT {MEASUREMENT_COLUMNS}
        FROM body_measurements
        WHERE user_id = $1
        ORDER BY date DESC, created_at DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list body measurements")
}

pub async fn insert_photo(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    s3_key: &str,
    p: &NewPhoto,
) -> anyhow::Result<ProgressPhoto> {
    sqlx::query_as::<_, ProgressPhoto>(&format!(
        r#"
        INSERT INTO progress_photos (id, user_id, s3_key, photo_type, date, weight_kg, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {PHOTO_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user_id)
    .bind(s3_key)
    .bind(p.photo_type)
    .bind(p.date)
    .bind(p.weight_kg)
    .bind(&p.notes)
    .fetch_one(db)
    .await
    .context("insert progress photo")
}

pub async fn list_photos(
    db: &PgPool,
    user_id: Uuid,
    photo_type: Option<&str>,
) -> anyhow::Result<Vec<ProgressPhoto>> {
    sqlx::query_as::<_, ProgressPhoto>(&format!(
        r#"
        SELECT {PHOTO_COLUMNS}
        FROM progress_photos
        WHERE user_id = $1 AND ($2::TEXT IS NULL OR photo_type = $2)
        ORDER BY date DESC, created_at DESC
        "#
    ))
    .bind(user_id)
    .bind(photo_type)
    .fetch_all(db)
    .await
    .context("list progress photos")
}

/// Deletes the row and hands back its storage key.
pub async fn delete_photo(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<String>> {
    sqlx::query_scalar::<_, String>(
        "DELETE FROM progress_photos WHERE id = $1 AND user_id = $2 RETURNING s3_key",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("delete progress photo")
}
