//! Waldo web service client.

use chrono::DateTime;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::domain::{Coordinate, Waldo};

use super::error::WaldoError;
use super::types::{MessagesDto, SessionDto, WaldoDto};

/// Default base URL for the Waldo web service.
const DEFAULT_BASE_URL: &str = "http://kramer.nss.cs.ubc.ca:8080";

/// Configuration for the Waldo client.
#[derive(Debug, Clone)]
pub struct WaldoClientConfig {
    /// Base URL for the service
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl WaldoClientConfig {
    /// Create a new config pointing at the public service.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for WaldoClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A registered session with the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The name the service knows us by.
    pub name: String,
    /// Key to pass on later requests.
    pub key: String,
}

/// Client for the Waldo web service.
#[derive(Debug, Clone)]
pub struct WaldoClient {
    http: reqwest::Client,
    base_url: String,
}

impl WaldoClient {
    /// Create a new Waldo client.
    pub fn new(config: WaldoClientConfig) -> Result<Self, WaldoError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Start a session, optionally asking for a particular name.
    ///
    /// Without a name the service picks one. Sessions can time out on the
    /// service side at any point.
    pub async fn init_session(&self, name: Option<&str>) -> Result<Session, WaldoError> {
        let url = match name {
            Some(name) => format!("{}/initsession/{}", self.base_url, name.trim()),
            None => format!("{}/initsession", self.base_url),
        };

        let body = self.get(&url).await?;
        let session = parse_session(&body)?;
        debug!(name = %session.name, "started Waldo session");
        Ok(session)
    }

    /// Fetch up to `count` Waldos.
    pub async fn get_waldos(&self, session: &Session, count: u32) -> Result<Vec<Waldo>, WaldoError> {
        let url = format!("{}/getwaldos/{}/{}", self.base_url, session.key, count);
        let body = self.get(&url).await?;
        parse_waldos(&body)
    }

    /// Fetch the messages waiting for this session.
    pub async fn get_messages(&self, session: &Session) -> Result<Vec<String>, WaldoError> {
        let url = format!("{}/getmsgs/{}/", self.base_url, session.key);
        let body = self.get(&url).await?;
        parse_messages(&body)
    }

    async fn get(&self, url: &str) -> Result<String, WaldoError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WaldoError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}

fn json_error(e: serde_json::Error) -> WaldoError {
    WaldoError::Json {
        message: e.to_string(),
    }
}

/// Parse an `initsession` response.
pub fn parse_session(body: &str) -> Result<Session, WaldoError> {
    let dto: SessionDto = serde_json::from_str(body).map_err(json_error)?;
    Ok(Session {
        name: dto.name.trim().to_string(),
        key: dto.key.trim().to_string(),
    })
}

/// Parse a `getwaldos` response, skipping entries with an invalid
/// position or timestamp.
pub fn parse_waldos(body: &str) -> Result<Vec<Waldo>, WaldoError> {
    let dtos: Vec<WaldoDto> = serde_json::from_str(body).map_err(json_error)?;

    Ok(dtos
        .into_iter()
        .filter_map(|dto| match convert_waldo(&dto) {
            Some(waldo) => Some(waldo),
            None => {
                warn!(name = %dto.name, "skipping Waldo with invalid location");
                None
            }
        })
        .collect())
}

fn convert_waldo(dto: &WaldoDto) -> Option<Waldo> {
    let location = Coordinate::new(dto.loc.lat, dto.loc.long).ok()?;
    let last_updated = DateTime::from_timestamp_millis(dto.loc.tstamp)?;
    Some(Waldo::new(dto.name.trim(), last_updated, location))
}

/// Parse a `getmsgs` response.
pub fn parse_messages(body: &str) -> Result<Vec<String>, WaldoError> {
    let dto: MessagesDto = serde_json::from_str(body).map_err(json_error)?;
    Ok(dto
        .messages
        .unwrap_or_default()
        .into_iter()
        .map(|m| m.message.trim().to_string())
        .collect())
}
