//! Lexical data records that feed the network
//!
//! Plain value types: forms attested in a variety, the concepts they express,
//! and the varieties themselves. Their only behaviour is projection into node
//! attributes, tabular rows and GeoJSON features.

pub mod concept;
pub mod form;
pub mod variety;

pub use concept::{Concept, ConceptRow};
pub use form::Form;
pub use variety::{Feature, Point, Variety, VarietyProperties};

/// Entities identified by an `id` that is unique within its `source`
///
/// The global identifier is `"{source}-{id}"`. Callers guarantee that
/// `(source, id)` pairs are unique; nothing here checks it.
pub trait WithGid {
    /// Identifier within the source dataset
    fn id(&self) -> &str;

    /// Source dataset the entity was read from
    fn source(&self) -> &str;

    /// Globally unique identifier
    fn gid(&self) -> String {
        format!("{}-{}", self.source(), self.id())
    }
}
