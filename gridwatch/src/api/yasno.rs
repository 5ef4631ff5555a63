//! Yasno schedule API client.

use super::http::AsyncHttpClient;
use super::types::{ApiError, Dso, RawGroupSchedule, Region};

/// Default base URL for the published schedule API.
pub const DEFAULT_BASE_URL: &str = "https://api.yasno.com.ua/api/v1";

/// Region metadata fetched from the regions endpoint.
///
/// Supports the name-to-id lookups configuration is expressed in: users
/// configure region and provider by their published display names, while
/// the schedule endpoint wants numeric ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionDirectory {
    regions: Vec<Region>,
}

impl RegionDirectory {
    /// Wraps a fetched region listing.
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    /// Looks up a region by its published name.
    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|region| region.name == name)
    }

    /// Looks up a provider by region and provider name.
    pub fn provider(&self, region_name: &str, provider_name: &str) -> Option<&Dso> {
        self.region(region_name)?
            .dsos
            .iter()
            .find(|dso| dso.name == provider_name)
    }

    /// All fetched regions.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }
}

/// Client for the utility's schedule backend.
///
/// Generic over the HTTP client so tests can substitute a mock.
pub struct YasnoClient<C: AsyncHttpClient> {
    http_client: C,
    base_url: String,
}

impl<C: AsyncHttpClient> YasnoClient<C> {
    /// Creates a new client against the default base URL.
    pub fn new(http_client: C) -> Self {
        Self::with_base_url(http_client, DEFAULT_BASE_URL.to_string())
    }

    /// Creates a new client with a custom base URL.
    ///
    /// Useful for testing or self-hosted mirrors of the schedule data.
    pub fn with_base_url(http_client: C, base_url: String) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn regions_url(&self) -> String {
        format!("{}/regions", self.base_url)
    }

    fn schedule_url(&self, region_id: u32, provider_id: u32, group: &str) -> String {
        format!(
            "{}/schedule?region={}&dso={}&group={}",
            self.base_url, region_id, provider_id, group
        )
    }

    /// Fetches the region listing with its nested providers.
    pub async fn fetch_regions(&self) -> Result<RegionDirectory, ApiError> {
        let url = self.regions_url();
        let body = self.http_client.get(&url).await?;
        let regions: Vec<Region> =
            serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
                url,
                message: e.to_string(),
            })?;
        Ok(RegionDirectory::new(regions))
    }

    /// Fetches the raw schedule for one (region, provider, group) tuple.
    pub async fn fetch_group_schedule(
        &self,
        region_id: u32,
        provider_id: u32,
        group: &str,
    ) -> Result<RawGroupSchedule, ApiError> {
        let url = self.schedule_url(region_id, provider_id, group);
        let body = self.http_client.get(&url).await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
            url,
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::http::tests::MockAsyncHttpClient;

    fn directory() -> RegionDirectory {
        RegionDirectory::new(vec![
            Region {
                id: 14,
                name: "Київська область".to_string(),
                dsos: vec![Dso {
                    id: 3,
                    name: "ДТЕК Київські регіональні електромережі".to_string(),
                }],
            },
            Region {
                id: 25,
                name: "м. Київ".to_string(),
                dsos: vec![],
            },
        ])
    }

    #[test]
    fn directory_resolves_names() {
        let directory = directory();

        assert_eq!(directory.region("м. Київ").map(|r| r.id), Some(25));
        assert!(directory.region("Марс").is_none());

        let dso = directory
            .provider("Київська область", "ДТЕК Київські регіональні електромережі")
            .unwrap();
        assert_eq!(dso.id, 3);
        assert!(directory.provider("м. Київ", "ДТЕК").is_none());
    }

    #[test]
    fn urls_are_built_from_base() {
        let client = YasnoClient::with_base_url(
            MockAsyncHttpClient {
                response: Ok(vec![]),
            },
            "http://localhost:9000/api/".to_string(),
        );

        assert_eq!(client.regions_url(), "http://localhost:9000/api/regions");
        assert_eq!(
            client.schedule_url(14, 3, "1.1"),
            "http://localhost:9000/api/schedule?region=14&dso=3&group=1.1"
        );
    }

    #[tokio::test]
    async fn fetch_regions_decodes_listing() {
        let body = br#"[{"id": 14, "name": "A", "dsos": [{"id": 3, "name": "B"}]}]"#;
        let client = YasnoClient::new(MockAsyncHttpClient {
            response: Ok(body.to_vec()),
        });

        let directory = client.fetch_regions().await.unwrap();
        assert_eq!(directory.regions().len(), 1);
        assert_eq!(directory.provider("A", "B").map(|d| d.id), Some(3));
    }

    #[tokio::test]
    async fn fetch_regions_maps_decode_failure() {
        let client = YasnoClient::new(MockAsyncHttpClient {
            response: Ok(b"not json".to_vec()),
        });

        match client.fetch_regions().await {
            Err(ApiError::Decode { url, .. }) => {
                assert!(url.ends_with("/regions"));
            }
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn fetch_schedule_propagates_http_error() {
        let client = YasnoClient::new(MockAsyncHttpClient {
            response: Err(ApiError::Status {
                status: 503,
                url: "x".to_string(),
            }),
        });

        let result = client.fetch_group_schedule(14, 3, "1.1").await;
        assert_eq!(
            result,
            Err(ApiError::Status {
                status: 503,
                url: "x".to_string(),
            })
        );
    }
}
