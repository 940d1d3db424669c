use core_config::{FromEnv, notifier::NotifierConfig, server::ServerConfig};

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: Environment,
    pub server: ServerConfig,
    pub notifier: NotifierConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let notifier = NotifierConfig::from_env()?; // Uses default: NOTIFIER_CAPACITY=500

        Ok(Self {
            environment,
            server,
            notifier,
        })
    }
}
