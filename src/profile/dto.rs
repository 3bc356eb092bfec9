use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct UpsertProfileRequest {
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub height_cm: Option<f64>,
    pub current_weight_kg: Option<f64>,
    pub target_weight_kg: Option<f64>,
    pub goal: Option<String>,
    pub fitness_experience: Option<String>,
}
