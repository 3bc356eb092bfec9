pub mod handlers;
pub mod repo;
mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use services::StreakType;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
