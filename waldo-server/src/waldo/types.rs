//! Waldo web service response DTOs.
//!
//! The service answers in PascalCase JSON.

use serde::Deserialize;

/// Response from `initsession`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionDto {
    /// Name the service registered us under.
    pub name: String,

    /// Session key for subsequent requests.
    pub key: String,
}

/// One element of the `getwaldos` array.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WaldoDto {
    pub name: String,

    pub loc: LocationDto,
}

/// Last known position of a Waldo.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocationDto {
    pub lat: f64,

    pub long: f64,

    /// Milliseconds since the Unix epoch.
    pub tstamp: i64,
}

/// Response from `getmsgs`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessagesDto {
    #[serde(default)]
    pub messages: Option<Vec<MessageDto>>,
}

/// A single message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageDto {
    pub message: String,
}
