//! Application configuration loaded from environment variables.

use std::env;
use std::path::{Path, PathBuf};

use clap::Parser;

use quill_infra::{DatabaseConfig, JwtConfig};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "api-server", version, about = "Quill blog API server")]
pub struct Cli {
    /// Path to a .env file, loaded before `config/.env` and `.env`
    #[arg(long = "env-path")]
    pub env_path: Option<PathBuf>,
}

/// Outcome of loading an explicit `--env-path` file.
#[derive(Debug)]
pub enum EnvFile {
    Default,
    Loaded(PathBuf),
    Failed(PathBuf, String),
}

/// Load dotenv files. Variables already set win over every file, and an
/// explicit path wins over the defaults.
pub fn load_env(env_path: Option<&Path>) -> EnvFile {
    let outcome = match env_path {
        None => EnvFile::Default,
        Some(path) => match dotenvy::from_path(path) {
            Ok(()) => EnvFile::Loaded(path.to_path_buf()),
            Err(e) => EnvFile::Failed(path.to_path_buf(), e.to_string()),
        },
    };

    dotenvy::from_filename("config/.env").ok();
    dotenvy::dotenv().ok();

    outcome
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    /// Origin allowed to call the API with credentials.
    pub cors_origin: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(20),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(2),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(3011),
            database,
            jwt: JwtConfig::from_env(),
            cors_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_path_flag() {
        let cli = Cli::try_parse_from(["api-server", "--env-path", "deploy/staging.env"]).unwrap();
        assert_eq!(cli.env_path, Some(PathBuf::from("deploy/staging.env")));

        let cli = Cli::try_parse_from(["api-server"]).unwrap();
        assert!(cli.env_path.is_none());
    }

    #[test]
    fn test_missing_env_file_is_reported() {
        let outcome = load_env(Some(Path::new("does/not/exist.env")));
        assert!(matches!(outcome, EnvFile::Failed(path, _) if path == Path::new("does/not/exist.env")));
    }
}
