use serde::Deserialize;
use std::env;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub wizard: WizardConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Period of the sweep that drops stale wizards and selections
    pub sweep_interval_seconds: u64,
}

/// Remote backend reached through the HTTP client
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WizardConfig {
    pub countdown_seconds: u32,
    pub otp_delay_ms: u64,
    pub payment_delay_ms: u64,
    pub test_otp: String,
    pub retention_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    pub search_delay_ms: u64,
    pub seat_delay_ms: u64,
    pub reserve_delay_ms: u64,
    pub max_seats: usize,
    pub booked_probability: f64,
    /// Idle time after which an unreserved selection is dropped
    pub selection_ttl_seconds: u64,
    /// Fixed seed for reproducible mock data
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Self::load_from(Path::new("config"), &run_mode)
    }

    /// Built-in defaults, then `default`, `{run_mode}` and `local` files from
    /// `dir` (all optional), then `RAILBOOK__*` environment variables.
    pub fn load_from(dir: &Path, run_mode: &str) -> Result<Self, config::ConfigError> {
        let file = |name: &str| {
            config::File::with_name(&dir.join(name).to_string_lossy()).required(false)
        };

        let s = config::Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.sweep_interval_seconds", 60)?
            .set_default("api.base_url", "http://localhost:5001")?
            .set_default("api.timeout_seconds", 10)?
            .set_default("wizard.countdown_seconds", 300)?
            .set_default("wizard.otp_delay_ms", 500)?
            .set_default("wizard.payment_delay_ms", 1000)?
            .set_default("wizard.test_otp", "123456")?
            .set_default("wizard.retention_seconds", 900)?
            .set_default("catalog.search_delay_ms", 500)?
            .set_default("catalog.seat_delay_ms", 500)?
            .set_default("catalog.reserve_delay_ms", 500)?
            .set_default("catalog.max_seats", 4)?
            .set_default("catalog.booked_probability", 0.3)?
            .set_default("catalog.selection_ttl_seconds", 900)?
            .add_source(file("default"))
            .add_source(file(run_mode))
            // Not checked in
            .add_source(file("local"))
            // e.g. `RAILBOOK__API__BASE_URL=http://auth:5001`
            .add_source(config::Environment::with_prefix("RAILBOOK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_files() {
        let config = Config::load_from(Path::new("does-not-exist"), "test").unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.api.base_url, "http://localhost:5001");
        assert_eq!(config.wizard.countdown_seconds, 300);
        assert_eq!(config.wizard.otp_delay_ms, 500);
        assert_eq!(config.wizard.payment_delay_ms, 1000);
        assert_eq!(config.catalog.max_seats, 4);
        assert_eq!(config.wizard.retention_seconds, 900);
        assert_eq!(config.catalog.selection_ttl_seconds, 900);
        assert_eq!(config.server.sweep_interval_seconds, 60);
        assert!(config.catalog.seed.is_none());
    }

    #[test]
    fn test_run_mode_file_overrides_defaults() {
        let dir = env::temp_dir().join(format!("railbook-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("ci.toml"),
            "[wizard]\notp_delay_ms = 0\npayment_delay_ms = 0\n\n[catalog]\nseed = 42\n",
        )
        .unwrap();

        let config = Config::load_from(&dir, "ci").unwrap();
        fs::remove_dir_all(&dir).ok();

        assert_eq!(config.wizard.otp_delay_ms, 0);
        assert_eq!(config.wizard.payment_delay_ms, 0);
        assert_eq!(config.catalog.seed, Some(42));
        assert_eq!(config.wizard.countdown_seconds, 300);
    }
}
