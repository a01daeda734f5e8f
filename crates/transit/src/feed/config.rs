//! Connection settings for the TransLoc API.

use std::time::Duration;

/// Feed resources exposed by the API
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Routes,
    Segments,
    Vehicles,
    Stops,
    ArrivalEstimates,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Routes => "routes.json",
            Self::Segments => "segments.json",
            Self::Vehicles => "vehicles.json",
            Self::Stops => "stops.json",
            Self::ArrivalEstimates => "arrival-estimates.json",
        }
    }
}

/// Explicit API configuration
///
/// Nothing in this crate reads the environment; callers build this however
/// they like and pass it in.
#[derive(Clone, Debug)]
pub struct TransLocConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_host: String,
    pub agency_id: String,
    pub timeout: Duration,
}

impl TransLocConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://transloc-api-1-2.p.rapidapi.com";

    /// NC State Wolfline
    pub const DEFAULT_AGENCY: &'static str = "16";

    pub fn new(api_key: impl Into<String>, api_host: impl Into<String>) -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            api_key: api_key.into(),
            api_host: api_host.into(),
            agency_id: Self::DEFAULT_AGENCY.to_owned(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_agency(mut self, agency_id: impl Into<String>) -> Self {
        self.agency_id = agency_id.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Full request URL for an endpoint, scoped to the configured agency
    pub fn url(&self, endpoint: Endpoint) -> String {
        format!(
            "{}/{}?agencies={}",
            self.base_url.trim_end_matches('/'),
            endpoint.path(),
            self.agency_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TransLocConfig::new("key", "host");

        assert_eq!(config.agency_id, "16");
        assert_eq!(
            config.url(Endpoint::Routes),
            "https://transloc-api-1-2.p.rapidapi.com/routes.json?agencies=16"
        );
    }

    #[test]
    fn test_url_with_custom_base_and_agency() {
        let config = TransLocConfig::new("key", "host")
            .with_base_url("http://localhost:8080/")
            .with_agency("1323");

        assert_eq!(
            config.url(Endpoint::ArrivalEstimates),
            "http://localhost:8080/arrival-estimates.json?agencies=1323"
        );
    }
}
