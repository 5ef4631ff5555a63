//! Gridwatch - power outage schedule tracking
//!
//! This library computes a household's electrical-power connectivity
//! timeline from a utility's published outage schedule (the Yasno/DTEK
//! rotation-group model) and derives point-in-time facts for display.
//!
//! # High-Level API
//!
//! The [`coordinator`] module wires the fetch cycle together:
//!
//! ```ignore
//! use gridwatch::api::{AsyncReqwestClient, YasnoClient};
//! use gridwatch::config::Settings;
//! use gridwatch::coordinator::RefreshCoordinator;
//!
//! let settings = Settings::new("м. Київ", "ДТЕК Київські електромережі", "1.1")?;
//! let client = YasnoClient::new(AsyncReqwestClient::new()?);
//! let coordinator = RefreshCoordinator::new(settings, client);
//!
//! coordinator.refresh_now().await?;
//! let state = coordinator.facts().current_state(chrono::Utc::now());
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod countdown;
pub mod facts;
pub mod i18n;
pub mod logging;
pub mod resolver;
pub mod schedule;

/// Version of the gridwatch library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
