use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    extract::Json,
    state::AppState,
    storage::photo_key,
};

use super::{
    dto::{MeasurementRequest, PhotoFilter, PhotoView},
    repo,
    repo_types::{BodyMeasurement, ProgressPhoto},
    services::{self, PhotoForm},
};

const PRESIGN_TTL: Duration = Duration::from_secs(10 * 60);

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/measurements",
            get(list_measurements).post(add_measurement),
        )
        .route(
            "/photos",
            get(list_photos)
                .post(upload_photo)
                .layer(DefaultBodyLimit::max(services::MAX_PHOTO_BYTES + 64 * 1024)),
        )
        .route("/photos/:id", delete(delete_photo))
}

#[instrument(skip(state, payload))]
pub async fn add_measurement(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<MeasurementRequest>,
) -> AppResult<(StatusCode, Json<BodyMeasurement>)> {
    let m = services::measurement(payload)?;
    let row = repo::insert_measurement(&state.db, user_id, &m).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[instrument(skip(state))]
pub async fn list_measurements(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<BodyMeasurement>>> {
    Ok(Json(repo::list_measurements(&state.db, user_id).await?))
}

async fn with_url(state: &AppState, photo: ProgressPhoto) -> AppResult<PhotoView> {
    let url = state.photos.presign_get(&photo.s3_key, PRESIGN_TTL).await?;
    Ok(PhotoView { photo, url })
}

async fn read_form(mut mp: Multipart) -> AppResult<PhotoForm> {
    let bad = |e: axum::extract::multipart::MultipartError| AppError::validation(e.body_text());

    let mut form = PhotoForm::default();
    while let Some(field) = mp.next_field().await.map_err(bad)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let body = field.bytes().await.map_err(bad)?;
            form.file = Some((body, content_type));
        } else {
            let value = field.text().await.map_err(bad)?;
            form.set_text(&name, value);
        }
    }
    Ok(form)
}

/// Uploads the image first; a failed insert removes the orphaned object.
#[instrument(skip(state, mp))]
pub async fn upload_photo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mp: Multipart,
) -> AppResult<(StatusCode, Json<PhotoView>)> {
    let photo = read_form(mp).await?.finish()?;
    let id = Uuid::new_v4();
    let key = photo_key(user_id, id);

    state
        .photos
        .put_object(&key, photo.body.clone(), &photo.content_type)
        .await?;

    let row = match repo::insert_photo(&state.db, user_id, id, &key, &photo).await {
        Ok(row) => row,
        Err(e) => {
            if let Err(cleanup) = state.photos.delete_object(&key).await {
                warn!(error = ?cleanup, key = %key, "could not remove orphaned photo");
            }
            return Err(e.into());
        }
    };

    info!(%user_id, photo_id = %id, photo_type = photo.photo_type, size = photo.body.len(), "progress photo uploaded");
    Ok((StatusCode::CREATED, Json(with_url(&state, row).await?)))
}

#[instrument(skip(state))]
pub async fn list_photos(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(filter): Query<PhotoFilter>,
) -> AppResult<Json<Vec<PhotoView>>> {
    let photo_type = match filter.photo_type.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => Some(services::photo_type(t)?),
        _ => None,
    };

    let rows = repo::list_photos(&state.db, user_id, photo_type).await?;
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        out.push(with_url(&state, row).await?);
    }
    Ok(Json(out))
}

#[instrument(skip(state))]
pub async fn delete_photo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let key = repo::delete_photo(&state.db, user_id, id)
        .await?
        .ok_or(AppError::NotFound("Photo"))?;
    if let Err(e) = state.photos.delete_object(&key).await {
        warn!(error = ?e, key = %key, "photo row deleted but object removal failed");
    }
    info!(%user_id, photo_id = %id, "progress photo deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use time::{macros::date, OffsetDateTime};
    use tower::ServiceExt;

    #[tokio::test]
    async fn photos_need_auth() {
        let app = routes().with_state(AppState::fake());
        let res = app
            .oneshot(Request::get("/photos").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn views_carry_a_presigned_url_but_not_the_key() {
        let state = AppState::fake();
        let user = Uuid::new_v4();
        let id = Uuid::new_v4();
        let photo = ProgressPhoto {
            id,
            s3_key: photo_key(user, id),
            photo_type: "before".into(),
            date: date!(2024 - 03 - 10),
            weight_kg: Some(80.0),
            notes: None,
            created_at: OffsetDateTime::now_utc(),
        };

        let view = with_url(&state, photo).await.unwrap();
        assert_eq!(
            view.url,
            format!("https://photos.test/users/{user}/photos/{id}")
        );

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("s3_key").is_none());
        assert_eq!(json["photo_type"], "before");
        assert_eq!(json["date"], "2024-03-10");
    }
}
