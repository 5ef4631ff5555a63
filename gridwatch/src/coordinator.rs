//! Refresh coordinator daemon.
//!
//! Owns the periodic fetch cycle: resolve region/provider ids once, fetch
//! the group schedule, parse it, and swap it into the store. The daemon
//! runs in a background task and:
//! 1. Refreshes immediately on startup, then on every interval tick
//! 2. Coalesces manual `refresh_now` calls with an in-flight refresh
//! 3. Leaves the previous snapshot authoritative when a refresh fails
//! 4. Respects cancellation for graceful shutdown

use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::{ApiError, AsyncHttpClient, YasnoClient};
use crate::cache::SnapshotCache;
use crate::config::Settings;
use crate::facts::OutageFacts;
use crate::i18n::Translations;
use crate::schedule::{GroupSnapshot, ParseError, ScheduleStore};

/// Capacity of the snapshot-update broadcast channel.
const UPDATE_CHANNEL_CAPACITY: usize = 8;

/// Errors that can fail one refresh cycle.
///
/// A failed cycle is logged and retried on the next tick; it never
/// invalidates the previously loaded snapshot.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Configured region name is not in the fetched region listing.
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    /// Configured provider name is not in the configured region.
    #[error("Unknown provider {provider} in region {region}")]
    UnknownProvider { region: String, provider: String },
}

/// Region and provider ids resolved from the configured names.
///
/// Resolved once per process; the provider display name is cached for the
/// process lifetime since it cannot change without reconfiguration.
#[derive(Debug, Clone)]
struct ResolvedGroup {
    region_id: u32,
    provider_id: u32,
    provider_name: String,
}

/// Coordinates schedule refreshes for one configured group.
pub struct RefreshCoordinator<C: AsyncHttpClient> {
    settings: Settings,
    client: YasnoClient<C>,
    store: Arc<ScheduleStore>,
    cache: Arc<SnapshotCache>,
    resolved: RwLock<Option<ResolvedGroup>>,
    refresh_guard: tokio::sync::Mutex<()>,
    updates: broadcast::Sender<DateTime<Utc>>,
}

impl<C: AsyncHttpClient> RefreshCoordinator<C> {
    /// Creates a coordinator with an empty store.
    pub fn new(settings: Settings, client: YasnoClient<C>) -> Self {
        let store = Arc::new(ScheduleStore::new());
        let cache = Arc::new(SnapshotCache::new(
            Arc::clone(&store),
            settings.update_interval,
        ));
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);

        Self {
            settings,
            client,
            store,
            cache,
            resolved: RwLock::new(None),
            refresh_guard: tokio::sync::Mutex::new(()),
            updates,
        }
    }

    /// The store this coordinator refreshes.
    pub fn store(&self) -> &Arc<ScheduleStore> {
        &self.store
    }

    /// A fact provider over the current snapshot.
    pub fn facts(&self) -> OutageFacts {
        let provider_name = self
            .resolved
            .read()
            .unwrap()
            .as_ref()
            .map(|resolved| resolved.provider_name.clone())
            .unwrap_or_default();

        OutageFacts::new(
            Arc::clone(&self.store),
            Arc::clone(&self.cache),
            Translations::new(self.settings.language),
            self.settings.timezone,
            self.settings.region.clone(),
            provider_name,
        )
    }

    /// Subscribes to `updated_on` stamps announced after successful loads.
    pub fn subscribe_updates(&self) -> broadcast::Receiver<DateTime<Utc>> {
        self.updates.subscribe()
    }

    /// Runs one refresh cycle now.
    ///
    /// Returns `Ok(false)` when another refresh is already in flight: the
    /// call coalesces into it instead of queuing a second fetch.
    pub async fn refresh_now(&self) -> Result<bool, RefreshError> {
        let Ok(_guard) = self.refresh_guard.try_lock() else {
            debug!("Refresh already in flight, coalescing");
            return Ok(false);
        };

        self.do_refresh().await?;
        Ok(true)
    }

    async fn do_refresh(&self) -> Result<(), RefreshError> {
        let resolved = self.ensure_resolved().await?;

        let raw = self
            .client
            .fetch_group_schedule(resolved.region_id, resolved.provider_id, &self.settings.group)
            .await?;
        let snapshot = GroupSnapshot::from_raw(&raw)?;
        let updated_on = snapshot.updated_on();
        let days = snapshot.days().len();

        self.store.load(snapshot);
        self.cache.invalidate();
        // Receivers may come and go; an empty audience is not an error
        let _ = self.updates.send(updated_on);

        info!(
            group = %self.settings.group,
            days = days,
            updated_on = %updated_on,
            "Schedule refreshed"
        );
        Ok(())
    }

    async fn ensure_resolved(&self) -> Result<ResolvedGroup, RefreshError> {
        if let Some(resolved) = self.resolved.read().unwrap().clone() {
            return Ok(resolved);
        }

        let directory = self.client.fetch_regions().await?;
        let region = directory
            .region(&self.settings.region)
            .ok_or_else(|| RefreshError::UnknownRegion(self.settings.region.clone()))?;
        let dso = directory
            .provider(&self.settings.region, &self.settings.provider)
            .ok_or_else(|| RefreshError::UnknownProvider {
                region: self.settings.region.clone(),
                provider: self.settings.provider.clone(),
            })?;

        let resolved = ResolvedGroup {
            region_id: region.id,
            provider_id: dso.id,
            provider_name: dso.name.clone(),
        };
        info!(
            region_id = resolved.region_id,
            provider_id = resolved.provider_id,
            provider = %resolved.provider_name,
            "Resolved region and provider ids"
        );

        *self.resolved.write().unwrap() = Some(resolved.clone());
        Ok(resolved)
    }

    /// Runs the refresh loop until shutdown is signalled.
    ///
    /// Refreshes once immediately, then on every interval tick. A failed
    /// cycle keeps the previous snapshot and waits for the next tick.
    pub async fn run(&self, shutdown: CancellationToken) {
        info!(
            region = %self.settings.region,
            provider = %self.settings.provider,
            group = %self.settings.group,
            interval_secs = self.settings.update_interval.as_secs(),
            "Refresh coordinator starting"
        );

        if let Err(error) = self.refresh_now().await {
            warn!(error = %error, "Initial refresh failed, serving no data until the next cycle");
        }

        let mut interval = tokio::time::interval(self.settings.update_interval);
        // Skip the first immediate tick
        interval.tick().await;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Refresh coordinator shutting down");
                    break;
                }

                _ = interval.tick() => {
                    if let Err(error) = self.refresh_now().await {
                        warn!(error = %error, "Refresh failed, previous snapshot stays authoritative");
                    }
                }
            }
        }
    }
}
