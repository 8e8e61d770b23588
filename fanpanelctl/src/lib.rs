//! Fan panel CLI library
//!
//! Talks to a fan controller's RPC endpoints, keeps a live status view up to
//! date and edits the persisted fan settings.
//!
//! # Public API
//!
//! [`client::FanPanelClient`] fetches status and curves. [`page::StatusPage`]
//! mounts the status view and runs the [`poll::RefreshLoop`] behind it.
//!
//! ```no_run
//! use fanpanelctl::client::FanPanelClient;
//! use fanpanelctl::page::StatusPage;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = FanPanelClient::with_config(
//!     "http://192.168.1.1:8080".to_string(),
//!     10,  // timeout in seconds
//!     3,   // max retries
//!     Duration::from_millis(500),  // initial retry delay
//! )?;
//!
//! let load = client.load_initial().await?;
//! let page = StatusPage::mount(load, Arc::new(client), Duration::from_secs(3));
//! // ...
//! page.unmount().await;
//! # Ok(())
//! # }
//! ```

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

/// HTTP client for the device RPC endpoints.
pub mod client;

/// Configuration types for the CLI tool.
pub mod config;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;

/// Status page lifecycle.
pub mod page;

/// Background status refresh.
pub mod poll;

#[cfg(test)]
pub mod test_utils;
