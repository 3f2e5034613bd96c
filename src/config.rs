//! Static configuration for the club API and the report defaults.
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Production occupancy endpoint.
pub const API_URL: &str = "https://solutions.sportlife.ua/Connect/hs/external/";
/// Brand marker the API expects on every request.
pub const BRAND: &str = "SportLife";
/// Locale marker the API expects on every request.
pub const LANGUAGE: &str = "uk";
/// Client identity string, matching the mobile app the API serves.
pub const USER_AGENT: &str = "SLClient/2 CFNetwork/3860.400.51 Darwin/25.3.0";
/// Logical operation name routed by the API gateway.
pub const OPERATION: &str = "gymLoading";

/// Bound on the one outbound request per collect run.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_CHART_PATH: &str = "gym_load_chart.svg";
pub const DEFAULT_WINDOW_HOURS: i64 = 96;
pub const DEFAULT_THRESHOLD: u32 = 140;

/// Everything the collector needs to reach the occupancy endpoint.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub endpoint: String,
    pub auth_key: String,
    pub gym_uid: String,
    pub timeout: Duration,
}

impl ApiConfig {
    /// Build the API configuration from the environment.
    ///
    /// The credential and club identifier are required; the endpoint may be
    /// overridden for testing against a local server.
    pub fn from_env() -> Result<Self> {
        let auth_key =
            env::var("SPORTLIFE_AUTH_KEY").context("SPORTLIFE_AUTH_KEY must be set")?;
        let gym_uid = env::var("SPORTLIFE_GYM_ID").context("SPORTLIFE_GYM_ID must be set")?;
        let endpoint = env::var("SPORTLIFE_API_URL").unwrap_or_else(|_| API_URL.to_string());
        Ok(Self {
            endpoint,
            auth_key,
            gym_uid,
            timeout: FETCH_TIMEOUT,
        })
    }
}
