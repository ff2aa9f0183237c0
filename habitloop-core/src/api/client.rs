//! HTTP client for the habit backend API
//!
//! Wraps every endpoint the client consumes: auth, habits,
//! completions, tags, the server-side stats rollup, and the user
//! profile. The session is injected at construction; there is no
//! ambient auth state.

use std::future::Future;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::session::{LoginData, Session};
use crate::types::{Frequency, Habit, HabitCompletion, ServerHabitStats, StatsFilter, Tag, User};

/// Response from habit/tag creation endpoints.
#[derive(Debug, Deserialize)]
struct CreatedResponse {
    id: i64,
}

/// One per-habit row from GET /stats.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HabitStatRow {
    /// Days the habit was done.
    #[serde(default)]
    positive: i64,
    /// Days explicitly marked missed.
    #[serde(default)]
    negative: i64,
    /// Opportunities the backend expected.
    #[serde(default)]
    expected: i64,
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(default)]
    data: Vec<HabitStatRow>,
}

/// HTTP client for the habit backend
pub struct ApiClient {
    config: ApiConfig,
    http_client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client from configuration and an optional session.
    ///
    /// Returns an error if the configuration is invalid or missing
    /// required fields. Without a session only the auth endpoints and
    /// the health check are usable.
    pub fn new(config: ApiConfig, session: Option<&Session>) -> Result<Self> {
        config.validate()?;

        let base_url = config
            .server_url
            .clone()
            .ok_or_else(|| Error::Config("api.server_url is required".to_string()))?
            .trim_end_matches('/')
            .to_string();

        // Build default headers
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(session) = session {
            let auth_value = format!("Bearer {}", session.token);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth_value)
                    .map_err(|e| Error::Config(format!("invalid session token: {}", e)))?,
            );
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
            base_url,
        })
    }

    // ---- auth ----

    /// Sign in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginData> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body<'a> {
            email: &'a str,
            password: &'a str,
            remember_me: bool,
        }
        self.post_json(
            &format!("{}/auth/login", self.base_url),
            &Body {
                email,
                password,
                remember_me: true,
            },
        )
        .await
    }

    /// Create an account; returns the new user id.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<i64> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
            password: &'a str,
            name: &'a str,
        }
        self.post_json(
            &format!("{}/auth/register", self.base_url),
            &Body {
                email,
                password,
                name,
            },
        )
        .await
    }

    /// Sign in with a Google provider token; the credential exchange
    /// happens on the backend.
    pub async fn login_google(&self, token: &str) -> Result<LoginData> {
        #[derive(Serialize)]
        struct Body<'a> {
            token: &'a str,
        }
        self.post_json(&format!("{}/auth/google", self.base_url), &Body { token })
            .await
    }

    // ---- habits ----

    /// Fetch all habits with nested tags and completions, optionally
    /// bounded to a completion date window.
    pub async fn get_all_habits(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Habit>> {
        let url = format!("{}/habits/all", self.base_url);
        let mut params = Vec::new();
        if let Some(start) = start {
            params.push(("startDate", format_query_day(start)));
        }
        if let Some(end) = end {
            params.push(("endDate", format_query_day(end)));
        }
        self.with_retry(|| self.get_json(&url, &params)).await
    }

    /// Fetch habits created on a given day.
    pub async fn get_habits_created_on(&self, day: NaiveDate) -> Result<Vec<Habit>> {
        let url = format!("{}/habits/{}", self.base_url, format_query_day(day));
        self.with_retry(|| self.get_json(&url, &[])).await
    }

    /// Create a habit; returns its id.
    pub async fn create_habit(
        &self,
        name: &str,
        description: Option<&str>,
        frequency: Frequency,
        tags: &[String],
    ) -> Result<i64> {
        #[derive(Serialize)]
        struct Body<'a> {
            name: &'a str,
            description: &'a str,
            frequency: Frequency,
            tags: &'a [String],
        }
        let created: CreatedResponse = self
            .post_json(
                &format!("{}/habits", self.base_url),
                &Body {
                    name,
                    description: description.unwrap_or(""),
                    frequency,
                    tags,
                },
            )
            .await?;
        Ok(created.id)
    }

    /// Toggle a habit's completion for a calendar day.
    pub async fn mark_completion(&self, habit_id: i64, day: NaiveDate) -> Result<()> {
        #[derive(Serialize)]
        struct Body {
            date: String,
        }
        let url = format!("{}/habits/{}/complete", self.base_url, habit_id);
        let response = self
            .http_client
            .post(&url)
            .json(&Body {
                date: format_query_day(day),
            })
            .send()
            .await
            .map_err(|e| Error::Api(format!("HTTP request failed: {}", e)))?;
        check_status(response).await.map(|_| ())
    }

    /// Fetch one habit's completion records, optionally windowed.
    pub async fn get_completions(
        &self,
        habit_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<HabitCompletion>> {
        let url = format!("{}/habits/{}/completions", self.base_url, habit_id);
        let mut params = Vec::new();
        if let Some(start) = start {
            params.push(("startDate", format_query_day(start)));
        }
        if let Some(end) = end {
            params.push(("endDate", format_query_day(end)));
        }
        self.with_retry(|| self.get_json(&url, &params)).await
    }

    // ---- tags ----

    pub async fn get_all_tags(&self) -> Result<Vec<Tag>> {
        let url = format!("{}/tags", self.base_url);
        self.with_retry(|| self.get_json(&url, &[])).await
    }

    /// Create a tag; returns its id.
    pub async fn create_tag(&self, name: &str, color: Option<&str>) -> Result<i64> {
        #[derive(Serialize)]
        struct Body<'a> {
            name: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            color: Option<&'a str>,
        }
        let created: CreatedResponse = self
            .post_json(&format!("{}/tags", self.base_url), &Body { name, color })
            .await?;
        Ok(created.id)
    }

    pub async fn update_tag(&self, id: i64, name: &str, color: Option<&str>) -> Result<()> {
        #[derive(Serialize)]
        struct Body<'a> {
            name: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            color: Option<&'a str>,
        }
        let url = format!("{}/tags/{}", self.base_url, id);
        let response = self
            .http_client
            .put(&url)
            .json(&Body { name, color })
            .send()
            .await
            .map_err(|e| Error::Api(format!("HTTP request failed: {}", e)))?;
        check_status(response).await.map(|_| ())
    }

    pub async fn delete_tag(&self, id: i64) -> Result<()> {
        let url = format!("{}/tags/{}", self.base_url, id);
        let response = self
            .http_client
            .delete(&url)
            .send()
            .await
            .map_err(|e| Error::Api(format!("HTTP request failed: {}", e)))?;
        check_status(response).await.map(|_| ())
    }

    // ---- stats & profile ----

    /// Fetch the backend's aggregate stats for the filter, rolled up
    /// into total/completed/pending/notCompleted counts. Used as a
    /// cross-check against the client-side snapshot.
    pub async fn get_server_stats(&self, filter: &StatsFilter) -> Result<ServerHabitStats> {
        let url = format!("{}/stats", self.base_url);
        let mut params = Vec::new();
        if let Some(frequency) = filter.frequency {
            params.push(("frequency", frequency.as_str().to_string()));
        }
        if let Some(start) = filter.start {
            params.push(("startDate", format_query_day(start)));
        }
        if let Some(end) = filter.end {
            params.push(("endDate", format_query_day(end)));
        }
        if let Some(tags) = &filter.tags {
            if !tags.is_empty() {
                params.push(("tags", tags.join(",")));
            }
        }
        let response: StatsResponse = self.with_retry(|| self.get_json(&url, &params)).await?;
        Ok(rollup_server_stats(&response.data))
    }

    /// Fetch the authenticated user's profile.
    pub async fn get_user(&self) -> Result<User> {
        let url = format!("{}/user/me", self.base_url);
        self.with_retry(|| self.get_json(&url, &[])).await
    }

    /// Check if the backend is reachable
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);

        match self.http_client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    // ---- plumbing ----

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .http_client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| Error::Api(format!("HTTP request failed: {}", e)))?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| Error::Api(format!("failed to parse response: {}", e)))
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(&self, url: &str, body: &B) -> Result<T> {
        let response = self
            .http_client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Api(format!("HTTP request failed: {}", e)))?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| Error::Api(format!("failed to parse response: {}", e)))
    }

    /// Run an idempotent request, retrying transient failures (5xx,
    /// timeouts) with exponential backoff capped at 30s.
    async fn with_retry<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut last_error = None;
        let mut delay = Duration::from_millis(500);

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tracing::debug!(
                    "Retrying request (attempt {}/{}), waiting {:?}",
                    attempt + 1,
                    self.config.max_retries + 1,
                    delay
                );
                tokio::time::sleep(delay).await;
                delay = std::cmp::min(delay * 2, Duration::from_secs(30));
            }

            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if is_retryable_error(&e) {
                        tracing::warn!("Transient error from backend: {}", e);
                        last_error = Some(e);
                        continue;
                    } else {
                        // Non-retryable error, fail immediately
                        return Err(e);
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::Api("max retries exceeded".to_string())))
    }
}

/// Roll per-habit stat rows up into the aggregate counts, the same
/// way the stats view classifies habits: positive >= expected means
/// completed, any negative means missed, otherwise still pending.
fn rollup_server_stats(rows: &[HabitStatRow]) -> ServerHabitStats {
    let mut stats = ServerHabitStats {
        total: rows.len(),
        ..Default::default()
    };
    for row in rows {
        if row.positive >= row.expected {
            stats.completed += 1;
        } else if row.negative > 0 {
            stats.not_completed += 1;
        } else {
            stats.pending += 1;
        }
    }
    stats
}

fn format_query_day(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Map a response to an error unless it succeeded. 401 gets its own
/// variant so callers can drop the session and re-authenticate.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown".to_string());

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::Unauthorized(error_text));
    }
    Err(Error::Api(format!("API error ({}): {}", status, error_text)))
}

/// Check if an error is retryable (transient)
fn is_retryable_error(error: &Error) -> bool {
    match error {
        Error::Api(msg) => {
            // Retry on 5xx errors
            msg.contains("50") && (msg.contains("API error") || msg.contains("HTTP"))
                // Retry on network/timeout errors
                || msg.contains("timeout")
                || msg.contains("connection")
                || msg.contains("request failed")
        }
        _ => false,
    }
}
