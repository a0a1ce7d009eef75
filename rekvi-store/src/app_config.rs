use rekvi_order::PhonePolicy;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub order: OrderConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OrderConfig {
    /// "required" (patient flow) or "optional" (doctor flow).
    pub phone_policy: PhonePolicy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Where the selected user is persisted; in-memory only when unset.
    #[serde(default)]
    pub file_path: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file
            // Default to 'development' env
            // Note that this file is _optional_
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of REKVI)
            // Eg.. `REKVI_SERVER__PORT=9000` would set the server port
            .add_source(config::Environment::with_prefix("REKVI").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
