use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppendMessageRequest {
    #[serde(default = "user_role")]
    pub role: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

fn user_role() -> String {
    "user".into()
}
