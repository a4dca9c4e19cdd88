//! Community grouping from precomputed labels
//!
//! Community detection itself runs upstream (Infomap in the CLICS pipeline)
//! and leaves a label on each clustered node under [`COMMUNITY_KEY`]. This
//! module only groups nodes by that label. Nodes without a label are not
//! clustered and are left out of every group.

use crate::storage::{AttrGraph, CommunityLabel, COMMUNITY_KEY};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Nodes grouped by community label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Communities {
    groups: BTreeMap<CommunityLabel, Vec<String>>,
}

impl Communities {
    /// Members of a community, in graph order
    #[must_use]
    pub fn get(&self, label: &CommunityLabel) -> Option<&[String]> {
        self.groups.get(label).map(Vec::as_slice)
    }

    /// Members of an integer-labelled community
    #[must_use]
    pub fn members(&self, label: i64) -> Option<&[String]> {
        self.get(&CommunityLabel::Int(label))
    }

    /// Community of a node, if it is clustered
    #[must_use]
    pub fn community_of(&self, node: &str) -> Option<&CommunityLabel> {
        self.groups
            .iter()
            .find(|(_, members)| members.iter().any(|m| m == node))
            .map(|(label, _)| label)
    }

    /// Size of a community
    #[must_use]
    pub fn community_size(&self, label: &CommunityLabel) -> Option<usize> {
        self.groups.get(label).map(Vec::len)
    }

    /// Total number of communities found
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no node carries a label
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate communities in label order
    pub fn iter(&self) -> btree_map::Iter<'_, CommunityLabel, Vec<String>> {
        self.groups.iter()
    }

    /// Consume into the underlying map
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<CommunityLabel, Vec<String>> {
        self.groups
    }
}

impl<'a> IntoIterator for &'a Communities {
    type Item = (&'a CommunityLabel, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, CommunityLabel, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Group nodes by their [`COMMUNITY_KEY`] label
///
/// # Example
///
/// ```
/// use colex_network::{communities, AttrGraph, Attributes};
///
/// let mut graph = AttrGraph::new();
/// graph.add_node_with("a", Attributes::new().with("infomap", 1_i64));
/// graph.add_node_with("b", Attributes::new().with("infomap", 1_i64));
/// graph.add_node("unclustered");
///
/// let comms = communities(&graph);
/// assert_eq!(comms.members(1), Some(&["a".to_string(), "b".to_string()][..]));
/// assert_eq!(comms.community_of("unclustered"), None);
/// ```
#[must_use]
pub fn communities(graph: &AttrGraph) -> Communities {
    communities_by(graph, COMMUNITY_KEY)
}

/// Group nodes by the label stored under an arbitrary attribute `key`
#[must_use]
pub fn communities_by(graph: &AttrGraph, key: &str) -> Communities {
    let mut groups: BTreeMap<CommunityLabel, Vec<String>> = BTreeMap::new();
    for (_, label, attrs) in graph.nodes() {
        if let Some(community) = attrs.label_at(key) {
            groups.entry(community).or_default().push(label.to_string());
        }
    }
    Communities { groups }
}
