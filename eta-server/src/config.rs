//! Server settings from environment variables.

use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::domain::CrowdLevel;
use crate::estimator::{EstimatorConfig, InvalidSpeed, SpeedTable, VehicleSelection};
use crate::provider::FeedConfig;

/// Error building settings from the environment.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("no transit data source: set TRANSIT_ENDPOINT or TRANSIT_FIXTURE_DIR")]
    MissingSource,

    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Speed(#[from] InvalidSpeed),
}

/// Where transit data is read from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceSettings {
    /// Live feed over HTTP.
    Live {
        endpoint: String,
        timeout_secs: u64,
        max_concurrent: usize,
    },
    /// Fixture directory, for development and demos.
    Fixture { dir: PathBuf },
}

impl SourceSettings {
    /// Feed client configuration, for the live source.
    pub fn feed_config(&self) -> Option<FeedConfig> {
        match self {
            SourceSettings::Live {
                endpoint,
                timeout_secs,
                max_concurrent,
            } => Some(
                FeedConfig::new(endpoint.as_str())
                    .with_timeout(*timeout_secs)
                    .with_max_concurrent(*max_concurrent),
            ),
            SourceSettings::Fixture { .. } => None,
        }
    }
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: IpAddr,
    pub port: u16,
    pub request_timeout: Duration,
    pub source: SourceSettings,
    pub estimator: EstimatorConfig,
    pub cache: CacheConfig,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which returns a variable's value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let source = match (lookup("TRANSIT_FIXTURE_DIR"), lookup("TRANSIT_ENDPOINT")) {
            (Some(dir), _) if !dir.is_empty() => SourceSettings::Fixture {
                dir: PathBuf::from(dir),
            },
            (_, Some(endpoint)) if !endpoint.is_empty() => SourceSettings::Live {
                endpoint,
                timeout_secs: parse_or(&lookup, "TRANSIT_TIMEOUT_SECS", 30)?,
                max_concurrent: parse_or(&lookup, "TRANSIT_MAX_CONCURRENT", 5)?,
            },
            _ => return Err(ConfigError::MissingSource),
        };

        let default_speeds = SpeedTable::default();
        let speed = |var, level| parse_or(&lookup, var, default_speeds.speed_for(level));
        let speeds = SpeedTable::new(
            speed("ETA_SPEED_LOW", CrowdLevel::Low)?,
            speed("ETA_SPEED_MEDIUM", CrowdLevel::Medium)?,
            speed("ETA_SPEED_HIGH", CrowdLevel::High)?,
        )?;

        let selection = match lookup("ETA_VEHICLE_SELECTION").as_deref() {
            None | Some("admissible") => VehicleSelection::AdmissibleOnly,
            Some("fallback-first") => VehicleSelection::FallbackToFirst,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "ETA_VEHICLE_SELECTION",
                    value: other.to_string(),
                    reason: "expected `admissible` or `fallback-first`".to_string(),
                });
            }
        };

        let defaults = EstimatorConfig::default();
        let estimator = EstimatorConfig::new(
            speeds,
            selection,
            parse_or(&lookup, "ETA_BATCH_SIZE", defaults.batch_size)?,
        );

        let cache_defaults = CacheConfig::default();
        let cache = CacheConfig {
            routes_ttl: Duration::from_secs(parse_or(
                &lookup,
                "ETA_ROUTES_TTL_SECS",
                cache_defaults.routes_ttl.as_secs(),
            )?),
            fixes_ttl: Duration::from_secs(parse_or(
                &lookup,
                "ETA_FIXES_TTL_SECS",
                cache_defaults.fixes_ttl.as_secs(),
            )?),
            ..cache_defaults
        };

        Ok(Self {
            host: parse_or(&lookup, "ETA_HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?,
            port: parse_or(&lookup, "ETA_PORT", 3000)?,
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "ETA_REQUEST_TIMEOUT_SECS",
                30,
            )?),
            source,
            estimator,
            cache,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Parse `var` if set, else use `default`.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(e) => Err(ConfigError::Invalid {
                var,
                reason: e.to_string(),
                value,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_with_live_endpoint() {
        let s = settings(&[("TRANSIT_ENDPOINT", "http://feed.local")]).unwrap();

        assert_eq!(s.addr(), "127.0.0.1:3000".parse().unwrap());
        assert_eq!(s.request_timeout, Duration::from_secs(30));
        assert_eq!(
            s.source,
            SourceSettings::Live {
                endpoint: "http://feed.local".to_string(),
                timeout_secs: 30,
                max_concurrent: 5,
            }
        );
        assert_eq!(s.estimator.speeds, SpeedTable::default());
        assert_eq!(s.estimator.selection, VehicleSelection::AdmissibleOnly);
        assert_eq!(s.estimator.batch_size, 8);
        assert_eq!(s.cache.routes_ttl, Duration::from_secs(300));
        assert_eq!(s.cache.fixes_ttl, Duration::from_secs(10));
    }

    #[test]
    fn fixture_dir_takes_precedence() {
        let s = settings(&[
            ("TRANSIT_ENDPOINT", "http://feed.local"),
            ("TRANSIT_FIXTURE_DIR", "data/fixtures"),
        ])
        .unwrap();

        assert_eq!(
            s.source,
            SourceSettings::Fixture {
                dir: PathBuf::from("data/fixtures")
            }
        );
        assert!(s.source.feed_config().is_none());
    }

    #[test]
    fn missing_source_is_an_error() {
        assert_eq!(settings(&[]).unwrap_err(), ConfigError::MissingSource);
        assert_eq!(
            settings(&[("TRANSIT_ENDPOINT", "")]).unwrap_err(),
            ConfigError::MissingSource
        );
    }

    #[test]
    fn overrides() {
        let s = settings(&[
            ("TRANSIT_ENDPOINT", "http://feed.local/"),
            ("TRANSIT_TIMEOUT_SECS", "5"),
            ("TRANSIT_MAX_CONCURRENT", "2"),
            ("ETA_HOST", "0.0.0.0"),
            ("ETA_PORT", "8080"),
            ("ETA_SPEED_LOW", "70"),
            ("ETA_SPEED_MEDIUM", "55.5"),
            ("ETA_SPEED_HIGH", "30"),
            ("ETA_VEHICLE_SELECTION", "fallback-first"),
            ("ETA_BATCH_SIZE", "3"),
            ("ETA_FIXES_TTL_SECS", "1"),
        ])
        .unwrap();

        assert_eq!(s.addr(), "0.0.0.0:8080".parse().unwrap());
        assert_eq!(s.estimator.speeds.speed_for(CrowdLevel::Low), 70.0);
        assert_eq!(s.estimator.speeds.speed_for(CrowdLevel::Medium), 55.5);
        assert_eq!(s.estimator.speeds.speed_for(CrowdLevel::High), 30.0);
        assert_eq!(s.estimator.selection, VehicleSelection::FallbackToFirst);
        assert_eq!(s.estimator.batch_size, 3);
        assert_eq!(s.cache.fixes_ttl, Duration::from_secs(1));

        let feed = s.source.feed_config().unwrap();
        assert_eq!(feed.endpoint, "http://feed.local");
        assert_eq!(feed.timeout_secs, 5);
        assert_eq!(feed.max_concurrent, 2);
    }

    #[test]
    fn unparsable_value_names_the_variable() {
        let err = settings(&[("TRANSIT_ENDPOINT", "http://x"), ("ETA_PORT", "eighty")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "ETA_PORT", .. }));
        assert!(err.to_string().contains("ETA_PORT=\"eighty\""));
    }

    #[test]
    fn non_positive_speed_is_rejected() {
        let err = settings(&[("TRANSIT_ENDPOINT", "http://x"), ("ETA_SPEED_HIGH", "0")])
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Speed(InvalidSpeed {
                level: CrowdLevel::High,
                ..
            })
        ));
    }

    #[test]
    fn unknown_selection_is_rejected() {
        let err = settings(&[
            ("TRANSIT_ENDPOINT", "http://x"),
            ("ETA_VEHICLE_SELECTION", "nearest"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "ETA_VEHICLE_SELECTION",
                ..
            }
        ));
    }
}
