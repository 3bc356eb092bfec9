mod app;
mod auth;
mod chat;
mod config;
mod dashboard;
mod day;
mod error;
mod extract;
mod fasting;
mod gamification;
mod hydration;
mod notifications;
mod nutrition;
mod profile;
mod progress;
mod quiz;
mod state;
mod storage;
mod subscriptions;
mod supplements;
mod validate;
mod workouts;

use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "zerotools=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = state::AppState::init().await?;

    sqlx::migrate!("./migrations")
        .run(&app_state.db)
        .await
        .context("run migrations")?;

    let addr = app_state.config.bind_addr()?;
    app::serve(app::build_app(app_state), addr).await
}
