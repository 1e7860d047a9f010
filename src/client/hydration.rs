//! REST hydration client.
//!
//! One `GET` of the aggregate stats seeds the dashboard before the push
//! channel is up. This pull is the only gap-filling mechanism the channel
//! has; it is never retried or reconciled against pushed events.

use std::time::Duration;

use async_trait::async_trait;

use crate::ports::{DashboardStats, HydrationError, StateHydrator};

/// Path of the aggregate stats endpoint.
pub const STATS_PATH: &str = "/api/v1/dashboard/stats";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Stats client over reqwest.
pub struct RestStateHydrator {
    client: reqwest::Client,
    stats_url: String,
}

impl RestStateHydrator {
    pub fn new(api_base: &str) -> Result<Self, HydrationError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| HydrationError::Request(e.to_string()))?;

        Ok(Self {
            client,
            stats_url: format!("{}{}", api_base.trim_end_matches('/'), STATS_PATH),
        })
    }

    pub fn stats_url(&self) -> &str {
        &self.stats_url
    }
}

#[async_trait]
impl StateHydrator for RestStateHydrator {
    async fn fetch(&self) -> Result<DashboardStats, HydrationError> {
        let response = self
            .client
            .get(&self.stats_url)
            .send()
            .await
            .map_err(|e| HydrationError::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| HydrationError::Request(e.to_string()))?;

        response
            .json::<DashboardStats>()
            .await
            .map_err(|e| HydrationError::Malformed(e.to_string()))
    }
}
