use anyhow::Context;

mod app;
mod auth;
mod categories;
mod config;
mod error;
mod params;
mod products;
mod state;
mod users;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "storefront=debug,axum=info,tower_http=info".to_string());
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

    let app_state = AppState::init().await?;

    sqlx::migrate!("./migrations")
        .run(&app_state.db)
        .await
        .context("run migrations")?;

    let app = app::build_app(app_state.clone());
    app::serve(app).await?;

    // Server stopped accepting requests; release the pool.
    app_state.shutdown().await;

    Ok(())
}
