//! Derived views over a loaded network (components, communities)
//!
//! Pure functions over [`crate::AttrGraph`]; they never touch disk.

pub mod communities;
pub mod structure;

pub use communities::{communities, communities_by, Communities};
pub use structure::{component_ids, components, count_components};
