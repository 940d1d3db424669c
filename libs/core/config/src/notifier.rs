use crate::{ConfigError, FromEnv, env_parse_or};

/// Pending events each change-event subscriber may buffer before new events
/// are dropped for it.
pub const DEFAULT_NOTIFIER_CAPACITY: usize = 500;

/// Change notifier tuning
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotifierConfig {
    pub capacity: usize,
}

impl FromEnv for NotifierConfig {
    /// - NOTIFIER_CAPACITY: defaults to 500, must be positive
    fn from_env() -> Result<Self, ConfigError> {
        let capacity = env_parse_or("NOTIFIER_CAPACITY", DEFAULT_NOTIFIER_CAPACITY)?;
        if capacity == 0 {
            return Err(ConfigError::ParseError {
                key: "NOTIFIER_CAPACITY".to_string(),
                details: "capacity must be greater than zero".to_string(),
            });
        }

        Ok(Self { capacity })
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_NOTIFIER_CAPACITY,
        }
    }
}
