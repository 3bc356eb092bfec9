use bytes::Bytes;
use time::{macros::format_description, Date};

use crate::{
    day,
    error::{AppError, AppResult},
    validate,
};

use super::dto::MeasurementRequest;

pub const PHOTO_TYPES: &[&str] = &["before", "after", "progress"];
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub date: Date,
    pub weight_kg: Option<f64>,
    pub waist_cm: Option<f64>,
    pub hips_cm: Option<f64>,
    pub chest_cm: Option<f64>,
    pub arms_cm: Option<f64>,
    pub legs_cm: Option<f64>,
    pub body_fat_pct: Option<f64>,
}

fn positive(field: &str, v: Option<f64>) -> AppResult<Option<f64>> {
    match v {
        Some(x) if !x.is_finite() || x <= 0.0 => Err(AppError::validation(format!(
            "{field} must be a positive number"
        ))),
        other => Ok(other),
    }
}

pub fn measurement(req: MeasurementRequest) -> AppResult<Measurement> {
    let m = Measurement {
        date: req.date.unwrap_or_else(day::today),
        weight_kg: positive("weight_kg", req.weight_kg)?,
        waist_cm: positive("waist_cm", req.waist_cm)?,
        hips_cm: positive("hips_cm", req.hips_cm)?,
        chest_cm: positive("chest_cm", req.chest_cm)?,
        arms_cm: positive("arms_cm", req.arms_cm)?,
        legs_cm: positive("legs_cm", req.legs_cm)?,
        body_fat_pct: positive("body_fat_pct", req.body_fat_pct)?,
    };
    if m.body_fat_pct.is_some_and(|p| p > 100.0) {
        return Err(AppError::validation("body_fat_pct must not exceed 100"));
    }
    let any = [
        m.weight_kg,
        m.waist_cm,
        m.hips_cm,
        m.chest_cm,
        m.arms_cm,
        m.legs_cm,
        m.body_fat_pct,
    ]
    .iter()
    .any(Option::is_some);
    if !any {
        return Err(AppError::validation("at least one measurement is required"));
    }
    Ok(m)
}

pub fn photo_type(value: &str) -> AppResult<&'static str> {
    let v = value.trim();
    PHOTO_TYPES
        .iter()
        .copied()
        .find(|t| *t == v)
        .ok_or_else(|| {
            AppError::validation(format!(
                "photo_type must be one of {}",
                PHOTO_TYPES.join(", ")
            ))
        })
}

/// Raw multipart fields of a photo upload.
#[derive(Debug, Default)]
pub struct PhotoForm {
    pub file: Option<(Bytes, String)>,
    pub photo_type: Option<String>,
    pub date: Option<String>,
    pub weight: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPhoto {
    pub body: Bytes,
    pub content_type: String,
    pub photo_type: &'static str,
    pub date: Date,
    pub weight_kg: Option<f64>,
    pub notes: Option<String>,
}

impl PhotoForm {
    /// Stores a text field; unknown names are ignored.
    pub fn set_text(&mut self, name: &str, value: String) {
        let slot = match name {
            "photo_type" => &mut self.photo_type,
            "date" => &mut self.date,
            "weight" | "weight_kg" => &mut self.weight,
            "notes" => &mut self.notes,
            _ => return,
        };
        *slot = Some(value);
    }

    pub fn finish(self) -> AppResult<NewPhoto> {
        let (body, content_type) = self
            .file
            .ok_or_else(|| AppError::validation("file is required"))?;
        if body.is_empty() {
            return Err(AppError::validation("file is empty"));
        }
        if body.len() > MAX_PHOTO_BYTES {
            return Err(AppError::validation("file is larger than 10 MB"));
        }
        if !content_type.starts_with("image/") {
            return Err(AppError::validation("file must be an image"));
        }

        let photo_type = photo_type(self.photo_type.as_deref().unwrap_or_default())?;

        let date = match validate::optional(self.date) {
            Some(s) => Date::parse(&s, format_description!("[year]-[month]-[day]"))
                .map_err(|_| AppError::validation("date must be YYYY-MM-DD"))?,
            None => day::today(),
        };

        let weight_kg = match validate::optional(self.weight) {
            Some(s) => {
                let w = s
                    .parse::<f64>()
                    .map_err(|_| AppError::validation("weight must be a number"))?;
                positive("weight", Some(w))?
            }
            None => None,
        };

        Ok(NewPhoto {
            body,
            content_type,
            photo_type,
            date,
            weight_kg,
            notes: validate::optional(self.notes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn form_with_file() -> PhotoForm {
        PhotoForm {
            file: Some((Bytes::from_static(b"\xff\xd8\xff"), "image/jpeg".into())),
            ..Default::default()
        }
    }

    #[test]
    fn measurement_needs_a_value() {
        assert!(measurement(MeasurementRequest::default()).is_err());
        let m = measurement(MeasurementRequest {
            waist_cm: Some(82.5),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(m.waist_cm, Some(82.5));
        assert_eq!(m.date, day::today());
    }

    #[test]
    fn measurement_values_are_positive() {
        assert!(measurement(MeasurementRequest {
            weight_kg: Some(0.0),
            ..Default::default()
        })
        .is_err());
        assert!(measurement(MeasurementRequest {
            body_fat_pct: Some(120.0),
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn photo_form_happy_path() {
        let mut form = form_with_file();
        form.set_text("photo_type", "before".into());
        form.set_text("date", "2024-03-10".into());
        form.set_text("weight", "81.2".into());
        form.set_text("notes", "  ".into());
        form.set_text("ignored", "x".into());

        let photo = form.finish().unwrap();
        assert_eq!(photo.photo_type, "before");
        assert_eq!(photo.date, date!(2024 - 03 - 10));
        assert_eq!(photo.weight_kg, Some(81.2));
        assert_eq!(photo.notes, None);
    }

    #[test]
    fn photo_form_requires_an_image() {
        let mut form = PhotoForm::default();
        form.set_text("photo_type", "after".into());
        assert!(form.finish().unwrap_err().to_string().contains("file"));

        let mut form = PhotoForm {
            file: Some((Bytes::from_static(b"%PDF"), "application/pdf".into())),
            ..Default::default()
        };
        form.set_text("photo_type", "after".into());
        assert!(form.finish().is_err());
    }

    #[test]
    fn photo_form_checks_fields() {
        let mut form = form_with_file();
        form.set_text("photo_type", "selfie".into());
        assert!(form.finish().is_err());

        let mut form = form_with_file();
        form.set_text("photo_type", "progress".into());
        form.set_text("date", "10/03/2024".into());
        assert!(form.finish().is_err());

        let mut form = form_with_file();
        form.set_text("photo_type", "progress".into());
        form.set_text("weight", "heavy".into());
        assert!(form.finish().is_err());
    }
}
