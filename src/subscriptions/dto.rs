use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Deserialize)]
pub struct ChangePlanRequest {
    #[serde(default)]
    pub plan: String,
}

/// The caller's plan as the paywall reads it. Users without a subscription
/// row are on an open-ended free plan.
#[derive(Debug, Serialize)]
pub struct PlanView {
    pub plan: &'static str,
    pub status: &'static str,
    pub is_pro: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub start_date: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub end_date: Option<OffsetDateTime>,
}
