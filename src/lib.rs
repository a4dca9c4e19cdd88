//! colex-network: persistence and derivation layer for colexification networks
//!
//! # Overview
//!
//! A colexification network links Concepticon concepts that are expressed by
//! the same word form in some language variety. This crate stores such a
//! network under a logical name, reloads it lazily, and derives connected
//! components and community groupings from it.
//!
//! # Quick Start
//!
//! ```no_run
//! use colex_network::{AttrGraph, Attributes, Network};
//!
//! # fn example() -> colex_network::Result<()> {
//! // Build a graph: nodes are concept ids, `infomap` holds the community
//! let mut graph = AttrGraph::new();
//! graph.add_node_with("1277", Attributes::new().with("Gloss", "HAND").with("infomap", 1_i64));
//! graph.add_node_with("1673", Attributes::new().with("Gloss", "ARM").with("infomap", 1_i64));
//! graph.add_edge("1277", "1673");
//!
//! // Writes graphs/network-3-families.bin and graphs/network-3-families.gml
//! let network = Network::new("network", 3.0, "families", "graphs");
//! network.save(&graph)?;
//!
//! // Reopen later: the first artifact found is read once and cached
//! let mut network = Network::new("network", 3.0, "families", "graphs");
//! let components = network.components()?;
//! let communities = network.communities()?;
//! assert_eq!(components.len(), 1);
//! assert_eq!(communities.members(1).map(<[String]>::len), Some(2));
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Storage**: attributed undirected graph keyed by node label
//! - **Persistence**: Parquet snapshot (feature `storage`) plus GML text
//! - **Algorithms**: connected components, attribute-based communities
//! - **Model**: forms, concepts and varieties with their tabular and GeoJSON
//!   projections

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod algorithms;
pub mod error;
pub mod export;
pub mod model;
pub mod network;
pub mod storage;

// Re-export core types
pub use algorithms::{communities, communities_by, components, Communities};
pub use error::{NetworkError, Result};
pub use export::{feature_collection, write_concept_table, write_geojson, FeatureCollection};
pub use model::{Concept, ConceptRow, Form, Variety, WithGid};
pub use network::{Network, NetworkConfig};
pub use storage::{
    AttrGraph, AttrValue, Attributes, CommunityLabel, FormatPolicy, GraphFormat, Gml, NodeId,
    RealLabel, COMMUNITY_KEY,
};

#[cfg(feature = "storage")]
pub use storage::Snapshot;
