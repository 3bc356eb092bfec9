use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Supplement,
    Water,
    Workout,
    Achievement,
    System,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Supplement => "supplement",
            NotificationKind::Water => "water",
            NotificationKind::Workout => "workout",
            NotificationKind::Achievement => "achievement",
            NotificationKind::System => "system",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub read: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct NotificationSettings {
    pub water_enabled: bool,
    pub supplement_enabled: bool,
    pub workout_enabled: bool,
    pub reminder_times: Vec<String>,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            water_enabled: true,
            supplement_enabled: true,
            workout_enabled: true,
            reminder_times: Vec::new(),
        }
    }
}

impl NotificationSettings {
    pub fn allows(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::Supplement => self.supplement_enabled,
            NotificationKind::Water => self.water_enabled,
            NotificationKind::Workout => self.workout_enabled,
            NotificationKind::Achievement | NotificationKind::System => true,
        }
    }
}
