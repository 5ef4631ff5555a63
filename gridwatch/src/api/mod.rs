//! Schedule API client.
//!
//! The [`YasnoClient`] talks to the utility's backend over a mockable
//! [`AsyncHttpClient`]; fetched payloads stay in their raw wire form here
//! and are parsed into the domain model by [`crate::schedule`].

mod http;
mod types;
mod yasno;

pub use http::{AsyncHttpClient, AsyncReqwestClient};
pub use types::{ApiError, Dso, RawDay, RawGroupSchedule, RawInterval, Region};
pub use yasno::{RegionDirectory, YasnoClient, DEFAULT_BASE_URL};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
