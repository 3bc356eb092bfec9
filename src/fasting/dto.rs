use serde::{Deserialize, Serialize};

use super::repo_types::FastingSession;

#[derive(Debug, Deserialize)]
pub struct StartFastRequest {
    #[serde(default)]
    pub plan_type: String,
}

/// The running fast with its live counters.
#[derive(Debug, Serialize)]
pub struct ActiveFast {
    #[serde(flatten)]
    pub session: FastingSession,
    pub elapsed_hours: f64,
    pub remaining_hours: f64,
    pub progress_pct: f64,
}
