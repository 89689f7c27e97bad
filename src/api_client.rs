use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::errors::{ClientError, ClientResult, GENERIC_SERVER_ERROR};
use crate::models::{
    ApiErrorBody, HealthStatus, LoginRequest, LoginResponse, Period, RegisterRequest,
    StatsSnapshot, WorkoutDraft, WorkoutId, WorkoutRecord,
};

/// Server-side narrowing of `GET /workouts`. Unset fields are omitted from the query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkoutQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout_type: Option<String>,
}

/// REST client for the Fitness Journal API.
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let parsed = Url::parse(base_url)?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::validation(format!(
                "API URL cannot be used as a base: {}",
                base_url
            )));
        }

        Ok(ApiClient {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "api request");

        let mut req = self
            .client
            .request(method, &url)
            .header("Content-Type", "application/json");
        if let Some(token) = &self.token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        req
    }

    async fn check(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string());
        debug!(%status, %message, "api request failed");

        Err(ClientError::Api { status, message })
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        let response = Self::check(req.send().await?).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn send_discard(&self, req: RequestBuilder) -> ClientResult<()> {
        Self::check(req.send().await?).await?;
        Ok(())
    }

    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let req = self
            .request(Method::POST, "/login")
            .json(&LoginRequest { username, password });
        self.send_json(req).await
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> ClientResult<()> {
        let req = self.request(Method::POST, "/register").json(&RegisterRequest {
            username,
            email,
            password,
        });
        self.send_discard(req).await
    }

    pub async fn list_workouts(&self) -> ClientResult<Vec<WorkoutRecord>> {
        self.list_workouts_matching(&WorkoutQuery::default()).await
    }

    pub async fn list_workouts_matching(
        &self,
        query: &WorkoutQuery,
    ) -> ClientResult<Vec<WorkoutRecord>> {
        let req = self.request(Method::GET, "/workouts").query(query);
        self.send_json(req).await
    }

    pub async fn get_workout(&self, id: WorkoutId) -> ClientResult<WorkoutRecord> {
        let req = self.request(Method::GET, &format!("/workouts/{}", id));
        self.send_json(req).await
    }

    pub async fn create_workout(&self, draft: &WorkoutDraft) -> ClientResult<WorkoutRecord> {
        let req = self.request(Method::POST, "/workouts").json(draft);
        self.send_json(req).await
    }

    pub async fn update_workout(
        &self,
        id: WorkoutId,
        draft: &WorkoutDraft,
    ) -> ClientResult<WorkoutRecord> {
        let req = self
            .request(Method::PUT, &format!("/workouts/{}", id))
            .json(draft);
        self.send_json(req).await
    }

    pub async fn delete_workout(&self, id: WorkoutId) -> ClientResult<()> {
        let req = self.request(Method::DELETE, &format!("/workouts/{}", id));
        self.send_discard(req).await
    }

    pub async fn stats(&self, period: Period) -> ClientResult<StatsSnapshot> {
        let req = self
            .request(Method::GET, "/stats")
            .query(&[("period", period.as_str())]);
        self.send_json(req).await
    }

    pub async fn health(&self) -> ClientResult<HealthStatus> {
        let req = self.request(Method::GET, "/health");
        self.send_json(req).await
    }
}
