//! Server settings, read once from the environment at startup.

use std::time::Duration;

use wolfline_transit::{RefreshIntervals, TransLocConfig};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is not a valid number: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub transloc: TransLocConfig,
    pub intervals: RefreshIntervals,
}

impl ServerConfig {
    pub const DEFAULT_PORT: u16 = 5000;
    pub const DEFAULT_HOST: &'static str = "transloc-api-1-2.p.rapidapi.com";

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source
    ///
    /// `TRANSLOC_KEY` is required. `STATIC_REFRESH_SECS` covers routes,
    /// segments and stops; `LIVE_REFRESH_SECS` covers vehicles and arrival
    /// estimates.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("TRANSLOC_KEY").ok_or(ConfigError::Missing("TRANSLOC_KEY"))?;
        let api_host = lookup("TRANSLOC_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_owned());

        let mut transloc = TransLocConfig::new(api_key, api_host);
        if let Some(agency) = lookup("TRANSLOC_AGENCY") {
            transloc = transloc.with_agency(agency);
        }
        if let Some(base_url) = lookup("TRANSLOC_BASE_URL") {
            transloc = transloc.with_base_url(base_url);
        }

        let port = parse(&lookup, "PORT")?.unwrap_or(Self::DEFAULT_PORT);

        let mut intervals = RefreshIntervals::default();
        if let Some(secs) = parse::<u64>(&lookup, "STATIC_REFRESH_SECS")? {
            let interval = Duration::from_secs(secs);
            intervals.routes = interval;
            intervals.segments = interval;
            intervals.stops = interval;
        }
        if let Some(secs) = parse::<u64>(&lookup, "LIVE_REFRESH_SECS")? {
            let interval = Duration::from_secs(secs);
            intervals.vehicles = interval;
            intervals.arrival_estimates = interval;
        }

        Ok(Self {
            port,
            transloc,
            intervals,
        })
    }
}

fn parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    lookup(name)
        .map(|value| value.trim().parse().map_err(|_| ConfigError::Invalid { name, value }))
        .transpose()
}
