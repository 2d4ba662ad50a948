//! Client for the hosted records backend.
//!
//! The backend exposes each table through a PostgREST-style REST endpoint:
//! `GET {base}/rest/v1/{table}?select=*&user_id=eq.{id}`. Requests carry the
//! project API key both as an `apikey` header and as a bearer token.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::{header, Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::models::{CareerGoal, SeaServicePeriod, Ship, TrainingCertificate, UserRecords, UserSettings};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

const REST_PATH: &str = "rest/v1";

const TABLE_CAREER_GOALS: &str = "career_goals";
const TABLE_SEA_SERVICE: &str = "sea_service";
const TABLE_CERTIFICATES: &str = "training_certificates";
const TABLE_SETTINGS: &str = "user_settings";
const TABLE_SHIPS: &str = "ships";

/// Backend client. Clone is cheap; reqwest::Client pools connections behind
/// an Arc.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(anyhow!("Backend URL is not configured"));
        }
        Url::parse(&base_url).with_context(|| format!("Invalid backend URL: {}", base_url))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key: None,
        })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: &str, user_id: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{}/{}", self.base_url, REST_PATH, table))
            .with_context(|| format!("Invalid URL for table {}", table))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", "*");
            if let Some(id) = user_id {
                query.append_pair("user_id", &format!("eq.{}", id));
            }
        }
        Ok(url)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        if let Some(ref key) = self.api_key {
            headers.insert("apikey", header::HeaderValue::from_str(key)?);
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", key))?,
            );
        }
        Ok(headers)
    }

    /// Ok(Some) on success, Ok(None) when rate limited, Err otherwise.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .get(url.clone())
                .headers(self.auth_headers()?)
                .send()
                .await
                .map_err(ApiError::from)
                .with_context(|| format!("Failed to send GET request to {}", url.path()))?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    return response
                        .json()
                        .await
                        .with_context(|| format!("Failed to parse JSON response from {}", url.path()));
                }
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(path = url.path(), retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2;
                }
            }
        }
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, table: &str, user_id: Option<&str>) -> Result<Vec<T>> {
        let rows: Vec<T> = self.get(self.table_url(table, user_id)?).await?;
        debug!(table, rows = rows.len(), "Fetched rows");
        Ok(rows)
    }

    // ===== Per-user tables =====

    /// The user's career goal row, if one exists.
    pub async fn fetch_goal(&self, user_id: &str) -> Result<Option<CareerGoal>> {
        let rows: Vec<CareerGoal> = self
            .fetch_rows(TABLE_CAREER_GOALS, Some(user_id))
            .await
            .context("Failed to fetch career goal")?;
        Ok(rows.into_iter().next())
    }

    pub async fn fetch_sea_service(&self, user_id: &str) -> Result<Vec<SeaServicePeriod>> {
        self.fetch_rows(TABLE_SEA_SERVICE, Some(user_id))
            .await
            .context("Failed to fetch sea service")
    }

    pub async fn fetch_certificates(&self, user_id: &str) -> Result<Vec<TrainingCertificate>> {
        self.fetch_rows(TABLE_CERTIFICATES, Some(user_id))
            .await
            .context("Failed to fetch training certificates")
    }

    pub async fn fetch_settings(&self, user_id: &str) -> Result<Option<UserSettings>> {
        let rows: Vec<UserSettings> = self
            .fetch_rows(TABLE_SETTINGS, Some(user_id))
            .await
            .context("Failed to fetch user settings")?;
        Ok(rows.into_iter().next())
    }

    /// Goal, sea service, certificates and settings, fetched concurrently.
    pub async fn fetch_user_records(&self, user_id: &str) -> Result<UserRecords> {
        let (goal, sea_service, certificates, settings) = futures::try_join!(
            self.fetch_goal(user_id),
            self.fetch_sea_service(user_id),
            self.fetch_certificates(user_id),
            self.fetch_settings(user_id),
        )?;

        debug!(
            user_id,
            has_goal = goal.is_some(),
            periods = sea_service.len(),
            certificates = certificates.len(),
            "Fetched user records"
        );

        Ok(UserRecords {
            user_id: user_id.to_string(),
            goal,
            sea_service,
            certificates,
            settings,
        })
    }

    // ===== Catalog =====

    pub async fn fetch_ships(&self) -> Result<Vec<Ship>> {
        self.fetch_rows(TABLE_SHIPS, None)
            .await
            .context("Failed to fetch ship catalog")
    }
}

// ============================================================================
// Tests
// ============================================================================
