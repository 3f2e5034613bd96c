//! Occupancy fetch against the club API.
//!
//! One bounded request per collect run; every failure mode (transport,
//! timeout, non-2xx status, malformed body, missing field) collapses into a
//! single error the command layer reports without crashing.
use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::time::Instant;
use ureq::Agent;

use crate::config::{ApiConfig, BRAND, LANGUAGE, OPERATION, USER_AGENT};

/// Fetch the current occupancy count from the configured endpoint.
pub fn fetch_occupancy(config: &ApiConfig) -> Result<u32> {
    let agent: Agent = Agent::config_builder()
        .timeout_global(Some(config.timeout))
        .build()
        .into();

    let start = Instant::now();
    let mut response = agent
        .post(config.endpoint.as_str())
        .header("auth-key", config.auth_key.as_str())
        .header("Accept", "*/*")
        .header("brand", BRAND)
        .header("language", LANGUAGE)
        .header("User-Agent", USER_AGENT)
        .header("request", OPERATION)
        .send_json(serde_json::json!({ "uid": config.gym_uid }))
        .context("post occupancy request")?;
    let body: Value = response
        .body_mut()
        .read_json()
        .context("read occupancy response")?;
    let elapsed_ms = start.elapsed().as_millis();
    tracing::info!(elapsed_ms, "occupancy fetch complete");

    occupancy_from_response(&body)
}

/// Extract the occupancy count from a decoded API response.
pub fn occupancy_from_response(body: &Value) -> Result<u32> {
    let number = body
        .get("number")
        .ok_or_else(|| anyhow!("response is missing the number field"))?;
    let count = number
        .as_u64()
        .ok_or_else(|| anyhow!("number field is not a non-negative integer: {number}"))?;
    u32::try_from(count).map_err(|_| anyhow!("occupancy count out of range: {count}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_integer_number_field() {
        let body = json!({ "number": 57 });
        assert_eq!(occupancy_from_response(&body).expect("count"), 57);
    }

    #[test]
    fn zero_occupancy_is_a_valid_reading() {
        let body = json!({ "number": 0, "status": "ok" });
        assert_eq!(occupancy_from_response(&body).expect("count"), 0);
    }

    #[test]
    fn missing_number_field_is_an_error() {
        let body = json!({ "status": "ok" });
        assert!(occupancy_from_response(&body).is_err());
    }

    #[test]
    fn non_integer_number_is_an_error() {
        for body in [
            json!({ "number": "57" }),
            json!({ "number": 57.5 }),
            json!({ "number": -3 }),
            json!({ "number": null }),
        ] {
            assert!(occupancy_from_response(&body).is_err(), "body: {body}");
        }
    }
}
