//! On-disk formats and the order they are tried in
//!
//! A [`FormatPolicy`] is an ordered list of [`GraphFormat`] handlers. Saving
//! writes every format in order; loading reads the first one whose artifact
//! exists. The default policy puts the lossless binary snapshot ahead of the
//! portable GML text.

use super::gml;
use super::graph::AttrGraph;
use crate::error::{NetworkError, Result};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// A persistence format for [`AttrGraph`]
pub trait GraphFormat: fmt::Debug {
    /// File extension (without the dot) of this format's artifact
    fn extension(&self) -> &'static str;

    /// Whether the artifact is human-readable text
    fn is_text(&self) -> bool {
        false
    }

    /// Write `graph` to `path`, replacing any existing file
    ///
    /// # Errors
    ///
    /// Returns error if encoding or file I/O fails
    fn write(&self, graph: &AttrGraph, path: &Path) -> Result<()>;

    /// Read a graph from `path`
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing, unreadable or malformed
    fn read(&self, path: &Path) -> Result<AttrGraph>;
}

/// GML text artifact (`.gml`)
#[derive(Debug, Clone, Copy, Default)]
pub struct Gml;

impl GraphFormat for Gml {
    fn extension(&self) -> &'static str {
        "gml"
    }

    fn is_text(&self) -> bool {
        true
    }

    fn write(&self, graph: &AttrGraph, path: &Path) -> Result<()> {
        let text = gml::render(graph)?;
        fs::write(path, text).map_err(|source| NetworkError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "wrote GML artifact");
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<AttrGraph> {
        let text = fs::read_to_string(path).map_err(|source| NetworkError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = text.len(), "parsing GML artifact");
        gml::parse(&text)
    }
}

/// Parquet snapshot artifact (`.bin`), lossless
#[cfg(feature = "storage")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Snapshot;

#[cfg(feature = "storage")]
impl GraphFormat for Snapshot {
    fn extension(&self) -> &'static str {
        "bin"
    }

    fn write(&self, graph: &AttrGraph, path: &Path) -> Result<()> {
        super::snapshot::write_snapshot(graph, path).map_err(|source| NetworkError::Snapshot {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "wrote binary snapshot");
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<AttrGraph> {
        debug!(path = %path.display(), "reading binary snapshot");
        super::snapshot::read_snapshot(path).map_err(|source| NetworkError::Snapshot {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Ordered list of formats; earlier entries win on load
#[derive(Debug)]
pub struct FormatPolicy {
    formats: Vec<Box<dyn GraphFormat>>,
}

impl FormatPolicy {
    /// Policy with no formats
    #[must_use]
    pub fn empty() -> Self {
        Self {
            formats: Vec::new(),
        }
    }

    /// Policy that only reads and writes GML
    #[must_use]
    pub fn text_only() -> Self {
        Self::empty().with(Gml)
    }

    /// Append a format at the lowest precedence
    #[must_use]
    pub fn with(mut self, format: impl GraphFormat + 'static) -> Self {
        self.formats.push(Box::new(format));
        self
    }

    /// Formats in precedence order
    pub fn iter(&self) -> impl Iterator<Item = &dyn GraphFormat> + '_ {
        self.formats.iter().map(|format| &**format)
    }

    /// Number of formats
    #[must_use]
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    /// Whether no format is configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl Default for FormatPolicy {
    /// `[Snapshot, Gml]` with the `storage` feature, `[Gml]` without
    fn default() -> Self {
        #[cfg(feature = "storage")]
        {
            Self::empty().with(Snapshot).with(Gml)
        }
        #[cfg(not(feature = "storage"))]
        {
            Self::text_only()
        }
    }
}
