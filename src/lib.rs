//!# CTERA Management API Client
//!
//! A Rust client library for the management API of CTERA Portals and Edge Filers.
//!
//! ## Features
//!
//! - Paged queries with filters, projections and sorting
//! - Lazy, single-pass iteration over paged listings ([`pager::Pager`])
//! - Zones: look up, list, create, delete, add devices
//! - Team portals: list tenants, create, delete, recover, browse
//! - Cloud drive directory listing
//!
//! ## Usage example
//!
//! ```rust,no_run
//! use anyhow::Result;
//! use ctera_client::client::CteraHost;
//! use ctera_client::files::CloudPath;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     let portal = CteraHost::builder()
//!         .host("https://portal.example.com")
//!         .build()?;
//!
//!     let mut zones = portal.zones().list()?;
//!     while let Some(zone) = zones.next().await? {
//!         println!("zone: {}, id: {}", zone.name, zone.zone_id);
//!     }
//!
//!     let resources = portal
//!         .files()
//!         .ls(&CloudPath::new("My Files"))?
//!         .collect_all()
//!         .await?;
//!     for resource in resources {
//!         println!("{} {}", resource.name, resource.calculate_size());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod devices;
pub mod entities;
pub mod files;
pub mod pager;
pub mod portals;
pub mod query;
pub mod utils;
pub mod version;
pub mod zones;
