use crate::error::DataError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Runtime settings, loadable from a JSON file. Every field has a default.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub dispatcher: DispatcherSettings,
}

impl Settings {
    pub fn from_file(path: &str) -> Result<Self, DataError> {
        let content = fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// How invocation watchers observe the remote endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DispatcherSettings {
    /// Delay between two status polls of one remote run.
    pub poll_interval_ms: u64,
    /// Polls before a watcher gives up on a run. `0` polls forever.
    pub max_polls: u32,
    /// Upper bound on a single `submit` or `status` call. A call that runs
    /// over counts as an unanswered poll.
    pub request_timeout_ms: u64,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            max_polls: 240,
            request_timeout_ms: 30_000,
        }
    }
}

impl DispatcherSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings = Settings::from_json(r#"{"dispatcher": {"max_polls": 3}}"#).unwrap();
        assert_eq!(settings.dispatcher.max_polls, 3);
        assert_eq!(settings.dispatcher.poll_interval_ms, 500);
        assert_eq!(settings.dispatcher.request_timeout(), Duration::from_secs(30));

        let empty = Settings::from_json("{}").unwrap();
        assert_eq!(empty, Settings::default());
    }
}
