//! Network identity, persistence and cached loading
//!
//! A [`Network`] names one persisted colexification graph:
//! `"{graphname}-{threshold}-{edgefilter}"` under `graphdir`. Saving writes
//! every artifact of its [`FormatPolicy`]; loading reads the first artifact
//! that exists and caches the graph for the lifetime of the instance.
//!
//! ```text
//! graphdir/
//!   network-3-families.bin   # Parquet snapshot, tried first
//!   network-3-families.gml   # GML text, fallback
//! ```

use crate::algorithms::{self, Communities};
use crate::error::{NetworkError, Result};
use crate::storage::{AttrGraph, FormatPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Serializable identity of a persisted network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Base name of the graph
    pub graphname: String,
    /// Edge-inclusion cutoff used when building the graph
    pub threshold: f64,
    /// Name of the edge filtering strategy used when building the graph
    pub edgefilter: String,
    /// Directory holding the artifacts
    pub graphdir: PathBuf,
}

/// A named, persisted colexification network
///
/// # Example
///
/// ```
/// use colex_network::{AttrGraph, Network};
///
/// # fn main() -> colex_network::Result<()> {
/// let dir = tempfile::tempdir().unwrap();
///
/// let mut graph = AttrGraph::new();
/// graph.add_edge("HAND", "ARM");
///
/// let saved = Network::new("network", 3.0, "families", dir.path().join("graphs"));
/// let gml = saved.save(&graph)?;
/// assert!(gml.ends_with("network-3-families.gml"));
///
/// let mut reopened = Network::new("network", 3.0, "families", dir.path().join("graphs"));
/// assert_eq!(reopened.components()?.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Network {
    graphname: String,
    threshold: f64,
    edgefilter: String,
    graphdir: PathBuf,
    formats: FormatPolicy,
    graph: Option<AttrGraph>,
}

impl Network {
    /// Create a network identity with no graph loaded
    pub fn new(
        graphname: impl Into<String>,
        threshold: f64,
        edgefilter: impl Into<String>,
        graphdir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            graphname: graphname.into(),
            threshold,
            edgefilter: edgefilter.into(),
            graphdir: graphdir.into(),
            formats: FormatPolicy::default(),
            graph: None,
        }
    }

    /// Create a network identity from its configuration
    #[must_use]
    pub fn from_config(config: &NetworkConfig) -> Self {
        Self::new(
            config.graphname.clone(),
            config.threshold,
            config.edgefilter.clone(),
            config.graphdir.clone(),
        )
    }

    /// Replace the format policy
    #[must_use]
    pub fn with_formats(mut self, formats: FormatPolicy) -> Self {
        self.formats = formats;
        self
    }

    /// Configuration describing this identity
    #[must_use]
    pub fn config(&self) -> NetworkConfig {
        NetworkConfig {
            graphname: self.graphname.clone(),
            threshold: self.threshold,
            edgefilter: self.edgefilter.clone(),
            graphdir: self.graphdir.clone(),
        }
    }

    /// Logical name, `"{graphname}-{threshold}-{edgefilter}"`
    #[must_use]
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Directory holding the artifacts
    #[must_use]
    pub fn graphdir(&self) -> &Path {
        &self.graphdir
    }

    /// Artifact path for a file extension
    #[must_use]
    pub fn fname(&self, ext: &str) -> PathBuf {
        self.graphdir.join(format!("{self}.{ext}"))
    }

    /// The cached graph, if one has been loaded
    #[must_use]
    pub const fn graph(&self) -> Option<&AttrGraph> {
        self.graph.as_ref()
    }

    /// Persist `graph` in every configured format
    ///
    /// Creates `graphdir` if needed (one level only), then writes the
    /// artifacts in policy order, overwriting existing files. The cached
    /// graph, if any, is left untouched.
    ///
    /// Returns the path of the text artifact, or of the last artifact
    /// written when the policy has no text format.
    ///
    /// # Errors
    ///
    /// - [`NetworkError::NoFormats`] if the policy is empty
    /// - [`NetworkError::CreateDir`] if `graphdir` cannot be created, e.g.
    ///   because its parent does not exist
    /// - any error from a format writer; artifacts written before the failure
    ///   are left in place
    pub fn save(&self, graph: &AttrGraph) -> Result<PathBuf> {
        if self.formats.is_empty() {
            return Err(NetworkError::NoFormats(self.name()));
        }
        if !self.graphdir.exists() {
            fs::create_dir(&self.graphdir).map_err(|source| NetworkError::CreateDir {
                path: self.graphdir.clone(),
                source,
            })?;
            debug!(dir = %self.graphdir.display(), "created graph directory");
        }

        let mut text_path = None;
        let mut last_path = None;
        for format in self.formats.iter() {
            let path = self.fname(format.extension());
            format.write(graph, &path)?;
            if format.is_text() && text_path.is_none() {
                text_path = Some(path.clone());
            }
            last_path = Some(path);
        }

        info!(
            network = %self,
            nodes = graph.num_nodes(),
            edges = graph.num_edges(),
            "saved network"
        );

        text_path
            .or(last_path)
            .ok_or_else(|| NetworkError::NoFormats(self.name()))
    }

    /// Load the graph, reading disk only if nothing is cached
    ///
    /// Formats are tried in policy order; the first artifact that exists is
    /// read. Later artifacts are never consulted, even if they differ.
    ///
    /// # Errors
    ///
    /// - [`NetworkError::NotFound`] if no artifact exists
    /// - the reader's error if the chosen artifact is malformed; there is no
    ///   fallback to the next format
    pub fn load(&mut self) -> Result<&AttrGraph> {
        if self.graph.is_none() {
            let graph = self.read_artifacts()?;
            self.graph = Some(graph);
        }
        self.graph.as_ref().ok_or_else(|| NetworkError::NotFound {
            name: self.name(),
            searched: Vec::new(),
        })
    }

    fn read_artifacts(&self) -> Result<AttrGraph> {
        let mut searched = Vec::with_capacity(self.formats.len());
        for format in self.formats.iter() {
            let path = self.fname(format.extension());
            if path.exists() {
                let graph = format.read(&path)?;
                info!(
                    network = %self,
                    path = %path.display(),
                    nodes = graph.num_nodes(),
                    edges = graph.num_edges(),
                    "loaded network"
                );
                return Ok(graph);
            }
            searched.push(path);
        }
        Err(NetworkError::NotFound {
            name: self.name(),
            searched,
        })
    }

    /// Connected components of the loaded graph (see [`algorithms::components`])
    ///
    /// # Errors
    ///
    /// Returns the [`load`](Self::load) error if nothing is cached and no
    /// artifact can be read
    pub fn components(&mut self) -> Result<Vec<BTreeSet<String>>> {
        Ok(algorithms::components(self.load()?))
    }

    /// Community groups of the loaded graph (see [`algorithms::communities`])
    ///
    /// # Errors
    ///
    /// Returns the [`load`](Self::load) error if nothing is cached and no
    /// artifact can be read
    pub fn communities(&mut self) -> Result<Communities> {
        Ok(algorithms::communities(self.load()?))
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.graphname, self.threshold, self.edgefilter)
    }
}
