use anyhow::Context;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{dto::UpsertProfileRequest, repo_types::Profile};

const COLUMNS: &str = "user_id, age, gender, height_cm, current_weight_kg, target_weight_kg, \
                       goal, fitness_experience, onboarding_completed, is_pro, updated_at";

pub async fn find(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
    let sql = format!("SELECT {COLUMNS} FROM user_profiles WHERE user_id = $1");
    sqlx::query_as::<_, Profile>(&sql)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("select profile")
}

pub async fn upsert(
    db: &PgPool,
    user_id: Uuid,
    req: &UpsertProfileRequest,
) -> anyhow::Result<Profile> {
    let sql = format!(
        r#"
        INSERT INTO user_profiles
            (user_id, age, gender, height_cm, current_weight_kg, target_weight_kg,
             goal, fitness_experience)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (user_id) DO UPDATE SET
            age = EXCLUDED.age,
            gender = EXCLUDED.gender,
            height_cm = EXCLUDED.height_cm,
            current_weight_kg = EXCLUDED.current_weight_kg,
            target_weight_kg = EXCLUDED.target_weight_kg,
            goal = EXCLUDED.goal,
            fitness_experience = EXCLUDED.fitness_experience,
            updated_at = now()
        RETURNING {COLUMNS}
        "#
    );
    sqlx::query_as::<_, Profile>(&sql)
        .bind(user_id)
        .bind(req.age)
        .bind(req.gender.as_deref())
        .bind(req.height_cm)
        .bind(req.current_weight_kg)
        .bind(req.target_weight_kg)
        .bind(req.goal.as_deref())
        .bind(req.fitness_experience.as_deref())
        .fetch_one(db)
        .await
        .context("upsert profile")
}

/// Flags onboarding as done, creating the profile if needed.
pub async fn mark_onboarded_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    goal: Option<&str>,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_profiles (user_id, goal, onboarding_completed)
        VALUES ($1, $2, TRUE)
        ON CONFLICT (user_id) DO UPDATE SET
            goal = COALESCE(EXCLUDED.goal, user_profiles.goal),
            onboarding_completed = TRUE,
            updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(goal)
    .execute(&mut **tx)
    .await
    .context("mark profile onboarded")?;
    Ok(())
}

pub async fn reset_onboarding(db: &PgPool, user_id: Uuid) -> anyhow::Result<()> {
    sqlx::query(
        "UPDATE user_profiles SET onboarding_completed = FALSE, updated_at = now() WHERE user_id = $1",
    )
    .bind(user_id)
    .execute(db)
    .await
    .context("reset onboarding")?;
    Ok(())
}

/// Mirrors the active plan onto the profile, creating the profile if needed.
pub async fn set_pro(conn: &mut PgConnection, user_id: Uuid, is_pro: bool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_profiles (user_id, is_pro)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO UPDATE SET
            is_pro = EXCLUDED.is_pro,
            updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(is_pro)
    .execute(conn)
    .await
    .context("update pro flag")?;
    Ok(())
}
