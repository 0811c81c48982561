use clap::Parser;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Backend provider: memory or http
    #[arg(long, env = "BACKEND_PROVIDER")]
    pub backend_provider: Option<String>,

    /// Base URL of a remote backend actor
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub ui: UiConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    /// `memory` or `http`.
    pub provider: String,
    pub base_url: Option<String>,
    /// Mount the REST surface of the in-process actor under `/backend`.
    pub serve_embedded: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    pub user_id: String,
    pub splash_ms: u64,
    pub typing_indicator_ms: u64,
    pub copy_feedback_ms: u64,
    pub recent_chats_limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    pub json: bool,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl UiConfig {
    pub fn typing_window(&self) -> Duration {
        Duration::from_millis(self.typing_indicator_ms)
    }

    pub fn copy_window(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 3000,
                host: "0.0.0.0".to_string(),
                request_timeout_secs: 30,
            },
            backend: BackendConfig {
                provider: "memory".to_string(),
                base_url: None,
                serve_embedded: true,
            },
            ui: UiConfig {
                user_id: "default-user".to_string(),
                splash_ms: 3000,
                typing_indicator_ms: 2000,
                copy_feedback_ms: 2000,
                recent_chats_limit: 10,
            },
            log: LogConfig { json: false },
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    /// Layers, lowest first: defaults, YAML file, `NELSON_` environment,
    /// CLI flags (and their plain env aliases such as `PORT`).
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("server.port", defaults.server.port)?
            .set_default("server.host", defaults.server.host)?
            .set_default("server.request_timeout_secs", defaults.server.request_timeout_secs)?
            .set_default("backend.provider", defaults.backend.provider)?
            .set_default("backend.serve_embedded", defaults.backend.serve_embedded)?
            .set_default("ui.user_id", defaults.ui.user_id)?
            .set_default("ui.splash_ms", defaults.ui.splash_ms)?
            .set_default("ui.typing_indicator_ms", defaults.ui.typing_indicator_ms)?
            .set_default("ui.copy_feedback_ms", defaults.ui.copy_feedback_ms)?
            .set_default("ui.recent_chats_limit", defaults.ui.recent_chats_limit as u64)?
            .set_default("log.json", defaults.log.json)?;

        // An explicit file must exist; the working-directory fallback is optional.
        builder = match &cli.config {
            Some(path) => builder.add_source(File::new(path, FileFormat::Yaml)),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                builder.add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml))
            }
            None => builder,
        };

        // E.g. NELSON_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("NELSON")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(provider) = cli.backend_provider {
            builder = builder.set_override("backend.provider", provider)?;
        }
        if let Some(url) = cli.backend_url {
            builder = builder.set_override("backend.base_url", url)?;
        }
        if let Some(json) = cli.log_json {
            builder = builder.set_override("log.json", json)?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_overrides() {
        let cli = Cli::try_parse_from([
            "nelson-gpt",
            "--port",
            "8080",
            "--backend-provider",
            "http",
            "--backend-url",
            "http://actor:9000",
        ])
        .unwrap();
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.backend_provider.as_deref(), Some("http"));
        assert_eq!(cli.backend_url.as_deref(), Some("http://actor:9000"));
    }

    #[test]
    fn test_windows() {
        let config = AppConfig::default();
        assert_eq!(config.ui.typing_window(), Duration::from_secs(2));
        assert_eq!(config.server.request_timeout(), Duration::from_secs(30));
    }
}
