// settings are deserialized from the merged config sources
use serde::Deserialize;

use crate::error::Result;

/// Base name of the optional settings file (`aldb.toml`, `aldb.yaml`, ...).
pub const SETTINGS_FILE: &str = "aldb";
/// Prefix of environment variables overriding the file, e.g. `ALDB_PRETTY=true`.
pub const ENV_PREFIX: &str = "ALDB";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Filter directives for the log subscriber, e.g. `"aldb=debug"`.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Pretty print JSON output.
    #[serde(default)]
    pub pretty: bool,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self { log_filter: default_log_filter(), pretty: false }
    }
}

impl Settings {
    /// Reads the settings file from the working directory, if there is one,
    /// and overlays the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(SETTINGS_FILE)
    }

    pub fn load_from(base_name: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(base_name).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let settings = Settings::load_from("definitely-not-here/aldb-settings").unwrap();
        assert_eq!(settings.pretty, Settings::default().pretty);
    }
}
