use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub rewards: RewardsConfig,
    pub control: ControlConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_true")]
    pub secure_user_calls: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RewardsConfig {
    #[serde(default)]
    pub track_reward_miles: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ControlConfig {
    pub name: String,
    pub hw: f32,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    pub redis_url: Option<String>,
    #[serde(default = "default_true")]
    pub service_demand: bool,
}

fn default_true() -> bool { true }

fn default_interval_ms() -> u64 { 500 }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Environment overlay is optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `ACMEAIR__CONTROL__HW=2.0` sets `control.hw`
            .add_source(config::Environment::with_prefix("ACMEAIR").separator("__"))
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.control.interval_ms == 0 {
            return Err(config::ConfigError::Message(
                "control.interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
