//! Graph storage layer
//!
//! Provides the attributed graph handle and its two persistence formats:
//! a Parquet snapshot (feature `storage`) and GML text.

pub mod attrs;
pub mod escape;
pub mod format;
pub mod gml;
pub mod graph;
#[cfg(feature = "storage")]
pub mod snapshot;

pub use attrs::{AttrValue, Attributes, CommunityLabel, RealLabel, COMMUNITY_KEY};
#[cfg(feature = "storage")]
pub use format::Snapshot;
pub use format::{FormatPolicy, GraphFormat, Gml};
pub use graph::{AttrGraph, Edge, EdgeId, NodeId};
