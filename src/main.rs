// SPDX-License-Identifier: MIT

use std::sync::Arc;

use driving_hours::auth::password::{generate_password, hash_password};
use driving_hours::auth::session::SessionManager;
use driving_hours::config::Config;
use driving_hours::routes::create_router;
use driving_hours::storage::{self, JsonStore};
use driving_hours::AppState;

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env()?;
    tracing::info!(data_dir = %config.data_dir.display(), "starting up");

    let store = JsonStore::new(&config.data_dir)?;

    if let Some(credentials) = storage::initialize(
        &store,
        hash_password,
        generate_password,
        config.bootstrap_password_length,
    )? {
        // Shown once on first run; the password is never logged or stored
        // in plain text.
        println!("==============================================");
        println!(" First run: admin account created");
        println!("   email:    {}", credentials.email);
        println!("   password: {}", credentials.password);
        println!(" Change this password after signing in.");
        println!("==============================================");
    }

    match store.sweep_expired_sessions() {
        Ok(0) => {}
        Ok(removed) => tracing::info!(removed, "swept expired sessions"),
        Err(err) => tracing::warn!(error = %err, "session sweep failed"),
    }

    let sessions = SessionManager::new(store.clone(), config.is_prod);
    let port = config.port;

    let state = Arc::new(AppState {
        config,
        store,
        sessions,
    });

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
