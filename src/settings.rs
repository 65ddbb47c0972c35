use crate::flight_control::RetryPolicy;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use strum_macros::Display;

#[derive(Debug, Display)]
pub enum SettingsError {
    /// The variable is set but does not parse.
    Invalid { key: &'static str, value: String },
}

impl std::error::Error for SettingsError {}

/// Runtime configuration, read once from the environment at start-up.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    service_url: String,
    connection_name: String,
    schema_path: PathBuf,
    log_dir: PathBuf,
    subscriber_addr: String,
    retry: RetryPolicy,
    tick_interval: Duration,
    max_q_altitude: f64,
}

impl Settings {
    const DEFAULT_SERVICE_URL: &'static str = "http://localhost:50080";
    const DEFAULT_CONNECTION_NAME: &'static str = "LaunchOpsConnection";
    const DEFAULT_SCHEMA_PATH: &'static str = "rocket_schema.json";
    const DEFAULT_LOG_DIR: &'static str = "./logs";
    const DEFAULT_SUBSCRIBER_ADDR: &'static str = "0.0.0.0:1337";
    const TICK_INTERVAL: Duration = Duration::from_secs(1);

    pub fn from_env() -> Result<Self, SettingsError> { Self::from_lookup(|key| std::env::var(key).ok()) }

    /// Builds the settings from an arbitrary variable source.
    pub fn from_lookup<L: Fn(&str) -> Option<String>>(lookup: L) -> Result<Self, SettingsError> {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let defaults = RetryPolicy::default();
        let retry = RetryPolicy {
            attempts: parsed(&lookup, "FLIGHT_RETRY_ATTEMPTS", defaults.attempts)?,
            interval: millis(&lookup, "FLIGHT_RETRY_INTERVAL_MS", defaults.interval)?,
            liveness_interval: millis(&lookup, "FLIGHT_LIVENESS_INTERVAL_MS", defaults.liveness_interval)?,
            max_in_flight: parsed(&lookup, "FLIGHT_MAX_IN_FLIGHT", defaults.max_in_flight)?,
        };
        Ok(Self {
            service_url: text("FLIGHT_SERVICE_URL", Self::DEFAULT_SERVICE_URL),
            connection_name: text("FLIGHT_CONNECTION_NAME", Self::DEFAULT_CONNECTION_NAME),
            schema_path: PathBuf::from(text("FLIGHT_SCHEMA_PATH", Self::DEFAULT_SCHEMA_PATH)),
            log_dir: PathBuf::from(text("FLIGHT_LOG_DIR", Self::DEFAULT_LOG_DIR)),
            subscriber_addr: text("SUBSCRIBER_ADDR", Self::DEFAULT_SUBSCRIBER_ADDR),
            retry,
            tick_interval: Self::TICK_INTERVAL,
            max_q_altitude: crate::flight_control::MilestoneTracker::DEFAULT_MAX_Q_ALTITUDE,
        })
    }

    pub fn service_url(&self) -> &str { self.service_url.as_str() }
    pub fn connection_name(&self) -> &str { self.connection_name.as_str() }
    pub fn schema_path(&self) -> &std::path::Path { &self.schema_path }
    pub fn log_dir(&self) -> &std::path::Path { &self.log_dir }
    pub fn subscriber_addr(&self) -> &str { self.subscriber_addr.as_str() }
    pub fn retry(&self) -> RetryPolicy { self.retry }
    pub fn tick_interval(&self) -> Duration { self.tick_interval }
    pub fn max_q_altitude(&self) -> f64 { self.max_q_altitude }
}

fn parsed<L, T>(lookup: &L, key: &'static str, default: T) -> Result<T, SettingsError>
where
    L: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| SettingsError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn millis<L>(lookup: &L, key: &'static str, default: Duration) -> Result<Duration, SettingsError>
where
    L: Fn(&str) -> Option<String>,
{
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    parsed(lookup, key, default_ms).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_variables() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.retry(), RetryPolicy::default());
        assert_eq!(settings.subscriber_addr(), "0.0.0.0:1337");
        assert_eq!(settings.schema_path(), std::path::Path::new("rocket_schema.json"));
        assert_eq!(settings.tick_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_overrides_are_parsed() {
        let settings = Settings::from_lookup(lookup(&[
            ("FLIGHT_SERVICE_URL", "http://bridge:9000"),
            ("FLIGHT_RETRY_ATTEMPTS", "5"),
            ("FLIGHT_RETRY_INTERVAL_MS", "250"),
            ("FLIGHT_MAX_IN_FLIGHT", " 8 "),
        ]))
        .unwrap();
        assert_eq!(settings.service_url(), "http://bridge:9000");
        assert_eq!(settings.retry().attempts, 5);
        assert_eq!(settings.retry().interval, Duration::from_millis(250));
        assert_eq!(settings.retry().max_in_flight, 8);
        assert_eq!(settings.retry().liveness_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let err = Settings::from_lookup(lookup(&[("FLIGHT_RETRY_ATTEMPTS", "three")])).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { key: "FLIGHT_RETRY_ATTEMPTS", .. }));
    }
}
