use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    pub water_enabled: bool,
    pub supplement_enabled: bool,
    pub workout_enabled: bool,
    #[serde(default)]
    pub reminder_times: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub updated: u64,
}
