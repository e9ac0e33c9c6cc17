mod config;
mod format;
mod models;
mod routes;
mod services;
mod state;
mod store;
mod supabase;
mod views;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Loaded before the subscriber so RUST_LOG from the env file applies.
    let env_file = config::env_file_name(std::env::var("APP_ENV").ok().as_deref());
    let loaded = dotenvy::from_filename(env_file);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match loaded {
        Ok(path) => tracing::info!(path = %path.display(), "env file loaded"),
        Err(e) if e.not_found() => tracing::info!(env_file, "no env file; using process environment"),
        Err(e) => tracing::warn!(env_file, error = %e, "env file could not be read"),
    }

    let config = config::SiteConfig::from_env().expect("invalid configuration");
    let client = supabase::SupabaseClient::new(&config.supabase).expect("supabase client init failed");
    tracing::info!(
        production = config.production,
        supabase_url = client.base_url(),
        bucket = client.bucket(),
        static_dir = %config.static_dir.display(),
        "configuration loaded"
    );

    let port = config.port;
    let state = state::AppState::new(Arc::new(store::SupabaseStore::new(client)), config);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "vitrine listening");
    axum::serve(listener, app).await.expect("server failed");
}
