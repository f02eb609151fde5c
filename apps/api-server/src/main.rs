//! # Quill API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use clap::Parser;
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::{AppConfig, Cli, EnvFile};
use middleware::cors;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();
    let env_file = config::load_env(cli.env_path.as_deref());

    let telemetry_config = TelemetryConfig::from_env();
    telemetry::init_telemetry(&telemetry_config);

    match env_file {
        EnvFile::Default => {}
        EnvFile::Loaded(path) => tracing::info!(path = %path.display(), "Loaded env file"),
        EnvFile::Failed(path, error) => {
            tracing::warn!(path = %path.display(), %error, "Failed to load env file")
        }
    }

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Quill API Server on {}:{}",
        config.host,
        config.port
    );

    cors::validate_origin(&config.cors_origin)
        .map_err(|msg| std::io::Error::new(std::io::ErrorKind::InvalidInput, msg))?;

    let state = web::Data::new(AppState::new(&config).await);
    let cors_origin = config.cors_origin.clone();

    let result = HttpServer::new(move || {
        App::new()
            .wrap(cors::cors_policy(&cors_origin))
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    telemetry::shutdown_telemetry();
    result
}
