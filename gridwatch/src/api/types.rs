//! Wire types and errors for the schedule API.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur during API operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Response body was not the expected JSON shape.
    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// A region as published by the regions endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Region {
    pub id: u32,
    pub name: String,
    /// Distribution system operators serving the region.
    #[serde(default)]
    pub dsos: Vec<Dso>,
}

/// A distribution system operator (provider) within a region.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Dso {
    pub id: u32,
    pub name: String,
}

/// Raw group schedule as returned by the schedule endpoint.
///
/// This is the fetch contract, not the domain model; conversion into a
/// [`GroupSnapshot`](crate::schedule::GroupSnapshot) validates timestamps
/// and interval boundaries.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawGroupSchedule {
    /// When the utility last revised this group's schedule.
    pub updated_on: String,
    #[serde(default)]
    pub days: Vec<RawDay>,
}

/// One day's worth of raw schedule data.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RawDay {
    /// Calendar date, `YYYY-MM-DD` in the provider's timezone.
    pub date: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub intervals: Vec<RawInterval>,
}

/// One raw outage interval.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RawInterval {
    pub start: String,
    pub end: String,
    #[serde(rename = "type")]
    pub kind: String,
}
