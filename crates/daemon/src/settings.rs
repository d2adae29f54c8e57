//! Layered configuration
//!
//! Sources, lowest to highest precedence:
//! 1. built-in defaults
//! 2. optional TOML file (`POSTUREPAL_CONFIG`, default `posturepal.toml`)
//! 3. `POSTUREPAL_*` environment variables, `__` between section and key
//!
//! ```text
//! POSTUREPAL_SERVER__PORT=9000
//! POSTUREPAL_CORS__ALLOWED_ORIGINS=http://localhost:5173,https://posture.example
//! POSTUREPAL_LOG__FORMAT=json
//! ```

use config::{Config, ConfigError, Environment, File};
use posturepal_api_http::server::DEFAULT_ALLOWED_ORIGINS;
use posturepal_api_http::HttpServerConfig;
use serde::Deserialize;
use std::path::PathBuf;

pub const CONFIG_PATH_ENV: &str = "POSTUREPAL_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "posturepal.toml";
const ENV_PREFIX: &str = "POSTUREPAL";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub model: ModelSettings,
    pub cors: CorsSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub strict_error_status: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        let http = HttpServerConfig::default();
        Self {
            host: http.host,
            port: http.port,
            strict_error_status: http.strict_error_status,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub model_path: String,
    pub meta_path: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model_path: "models/posture_model.json".to_string(),
            meta_path: "models/meta.json".to_string(),
        }
    }
}

impl ModelSettings {
    pub fn model_path(&self) -> PathBuf {
        shellexpand::tilde(&self.model_path).into_owned().into()
    }

    pub fn meta_path(&self) -> PathBuf {
        shellexpand::tilde(&self.meta_path).into_owned().into()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect(),
            allow_credentials: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub format: LogFormat,
    /// Used when RUST_LOG is unset
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            filter: "posturepal=info,tower_http=info".to_string(),
        }
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("cors.allowed_origins")
        .try_parsing(true)
}

impl Settings {
    /// Load from the config file named by `POSTUREPAL_CONFIG` and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path, env_source())
    }

    fn load_from(path: &str, env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    pub fn http_config(&self) -> HttpServerConfig {
        HttpServerConfig {
            host: self.server.host.clone(),
            port: self.server.port,
            allowed_origins: self.cors.allowed_origins.clone(),
            allow_credentials: self.cors.allow_credentials,
            strict_error_status: self.server.strict_error_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_from(pairs: &[(&str, &str)]) -> Environment {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        env_source().source(Some(vars))
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let settings = Settings::load_from("/nonexistent/posturepal.toml", env_from(&[])).unwrap();

        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8001);
        assert!(!settings.server.strict_error_status);
        assert_eq!(settings.cors.allowed_origins.len(), 4);
        assert!(settings.cors.allow_credentials);
        assert_eq!(settings.log.format, LogFormat::Pretty);
        assert_eq!(
            settings.model.model_path(),
            PathBuf::from("models/posture_model.json")
        );
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9100
strict_error_status = true

[model]
model_path = "/srv/models/rf.json"

[log]
format = "json"
"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let settings = Settings::load_from(&path, env_from(&[])).unwrap();

        assert_eq!(settings.server.port, 9100);
        assert!(settings.server.strict_error_status);
        assert_eq!(settings.model.model_path(), PathBuf::from("/srv/models/rf.json"));
        assert_eq!(settings.model.meta_path(), PathBuf::from("models/meta.json"));
        assert_eq!(settings.log.format, LogFormat::Json);
    }

    #[test]
    fn test_env_overrides_and_origin_list() {
        let settings = Settings::load_from(
            "/nonexistent/posturepal.toml",
            env_from(&[
                ("POSTUREPAL_SERVER__PORT", "9200"),
                (
                    "POSTUREPAL_CORS__ALLOWED_ORIGINS",
                    "http://localhost:4000,https://posture.example",
                ),
                ("POSTUREPAL_CORS__ALLOW_CREDENTIALS", "false"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.server.port, 9200);
        assert_eq!(
            settings.cors.allowed_origins,
            vec!["http://localhost:4000", "https://posture.example"]
        );
        assert!(!settings.cors.allow_credentials);

        let http = settings.http_config();
        assert_eq!(http.port, 9200);
        assert_eq!(http.allowed_origins.len(), 2);
    }

    #[test]
    fn test_tilde_is_expanded() {
        let model = ModelSettings {
            model_path: "~/posturepal/model.json".to_string(),
            ..Default::default()
        };

        assert!(!model.model_path().to_string_lossy().starts_with('~'));
    }
}
