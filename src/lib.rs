//! Library for talking to the HTTP API of a PRTG Network Monitor server
//! <https://www.paessler.com/manuals/prtg/http_api>.
//!
//! The sensor tree is downloaded once into a [`PrtgTree`] of [`Node`]s
//! (probes, groups, devices, sensors and channels). Actions on a node are
//! sent to the server and update the local copy.
//!
//! ## Example
//!
//! ### Pause all sensors that are down
//!
//! ```ignore
//! let config = prtgapi::ConnectionConfig::new("prtg.example.com", "admin", &passhash);
//! let client = prtgapi::PrtgClient::new(config)?;
//!
//! let mut tree = client.load_tree()?;
//! let down: Vec<i64> = tree
//!     .all_sensors()
//!     .into_iter()
//!     .filter(|sensor| sensor.status().map_or(false, |s| s.is_down()))
//!     .map(|sensor| sensor.id())
//!     .collect();
//!
//! for id in down {
//!     let sensor = tree.search_by_id_mut(id).unwrap();
//!     sensor.pause(&client, None, Some("down, checking"))?;
//! }
//! ```

pub(crate) mod api;
pub mod chart;
pub(crate) mod client;
pub mod config;
pub mod error;
pub mod historic;
pub mod nodes;
pub(crate) mod prtg_xml;
pub mod tree;

pub use api::ObjectRef;
pub use chart::{GraphFormat, GraphOptions, GraphSize};
pub use client::PrtgClient;
pub use config::{ConnectionConfig, Protocol};
pub use error::{PrtgError, Result};
pub use historic::HistoricData;
pub use nodes::{Node, NodeKind, Status, VALID_INTERVALS};
pub use tree::PrtgTree;
