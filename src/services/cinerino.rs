use crate::error::{AppError, CinerinoError, ErrorKind};
use crate::models::{EventSearchConditions, ScreeningEvent, TicketOffer, TicketOfferSearchConditions};
use crate::services::event::{EventService, SearchResult};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Header carrying the total hit count of a search
const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

/// Tokens are refreshed this long before they actually expire
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Connection settings of the Cinerino API
#[derive(Debug, Clone)]
pub struct CinerinoCredentials {
    pub endpoint: String,
    pub auth_endpoint: String,
    pub project_id: String,
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 { 3600 }

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<CinerinoError>,
    #[serde(default)]
    message: Option<String>,
}

/// Cinerino API client
///
/// Authenticates with OAuth2 client credentials and exposes the event and
/// ticket offer lookups the POS adapter needs.
pub struct CinerinoClient {
    credentials: CinerinoCredentials,
    client: Client,
    token: Mutex<Option<AccessToken>>,
}

impl CinerinoClient {
    /// Create a new Cinerino client
    pub fn new(credentials: CinerinoCredentials, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            credentials,
            client,
            token: Mutex::new(None),
        })
    }

    /// Client id of this application, used as the requesting store
    pub fn client_id(&self) -> &str {
        &self.credentials.client_id
    }

    fn project_url(&self, path: &str) -> String {
        format!(
            "{}/projects/{}{}",
            self.credentials.endpoint.trim_end_matches('/'),
            urlencoding::encode(&self.credentials.project_id),
            path
        )
    }

    /// Current access token, fetching a new one when missing or about to expire
    async fn access_token(&self) -> Result<String, AppError> {
        let mut token = self.token.lock().await;

        if let Some(cached) = token.as_ref() {
            if cached.expires_at > Instant::now() + TOKEN_EXPIRY_MARGIN {
                return Ok(cached.value.clone());
            }
        }

        let url = format!("{}/token", self.credentials.auth_endpoint.trim_end_matches('/'));

        tracing::debug!("Requesting access token from: {}", url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("Failed to obtain access token: {}", status);
            return Err(CinerinoError::new(
                ErrorKind::Unauthorized,
                format!("Failed to obtain access token: {}", status),
            )
            .into());
        }

        let issued: TokenResponse = response.json().await?;
        let value = issued.access_token;

        *token = Some(AccessToken {
            value: value.clone(),
            expires_at: Instant::now() + Duration::from_secs(issued.expires_in),
        });

        Ok(value)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, AppError> {
        let token = self.access_token().await?;
        let response = request.bearer_auth(token).send().await?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AppError> {
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl EventService for CinerinoClient {
    async fn find_by_id(&self, id: &str) -> Result<ScreeningEvent, AppError> {
        let url = self.project_url(&format!("/events/{}", urlencoding::encode(id)));

        tracing::debug!("Fetching event: {}", id);

        self.get_json(self.client.get(&url)).await
    }

    async fn search(
        &self,
        conditions: &EventSearchConditions,
    ) -> Result<SearchResult<ScreeningEvent>, AppError> {
        let url = self.project_url("/events");
        let request = self.client.get(&url).query(&conditions.to_query_pairs());

        let response = self.send(request).await?;

        let total_count = response
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());

        let data: Vec<ScreeningEvent> = response.json().await?;

        tracing::debug!("Searched {} events (total: {:?})", data.len(), total_count);

        Ok(SearchResult { data, total_count })
    }

    async fn search_ticket_offers(
        &self,
        conditions: &TicketOfferSearchConditions,
    ) -> Result<Vec<TicketOffer>, AppError> {
        let url = self.project_url(&format!(
            "/events/{}/offers/ticket",
            urlencoding::encode(&conditions.event_id)
        ));
        let request = self.client.get(&url).query(&conditions.to_query_pairs());

        self.get_json(request).await
    }
}

/// Turn a non-success upstream response into the errors it reports
async fn error_from_response(response: Response) -> AppError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read body".to_string());

    tracing::error!("Cinerino API returned {}: {}", status, body);

    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => {
            let mut errors = envelope.error.errors;
            match errors.len() {
                0 => CinerinoError::new(
                    kind_for_status(status),
                    envelope.error.message.unwrap_or_else(|| status.to_string()),
                )
                .into(),
                1 => errors.remove(0).into(),
                _ => errors.into(),
            }
        }
        Err(_) => CinerinoError::new(kind_for_status(status), body).into(),
    }
}

fn kind_for_status(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::BAD_REQUEST => ErrorKind::Argument,
        StatusCode::UNAUTHORIZED => ErrorKind::Unauthorized,
        StatusCode::FORBIDDEN => ErrorKind::Forbidden,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::CONFLICT => ErrorKind::AlreadyInUse,
        StatusCode::TOO_MANY_REQUESTS => ErrorKind::RateLimitExceeded,
        StatusCode::NOT_IMPLEMENTED => ErrorKind::NotImplemented,
        StatusCode::SERVICE_UNAVAILABLE => ErrorKind::ServiceUnavailable,
        _ => ErrorKind::Cinerino,
    }
}
