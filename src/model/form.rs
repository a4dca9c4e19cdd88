//! Lexical forms

use super::WithGid;
use serde::{Deserialize, Serialize};

/// A word form attested in one variety, mapped to a Concepticon concept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    /// Identifier within the source dataset
    pub id: String,
    /// Source dataset
    pub source: String,
    /// Surface form as given in the source
    pub form: String,
    /// Normalised form used for colexification matching
    pub clics_form: String,
    /// Gloss as given in the source
    pub gloss: String,
    /// Concepticon concept set id
    pub concepticon_id: String,
    /// Concepticon concept set gloss
    pub concepticon_gloss: String,
    /// Ontological category of the concept
    pub ontological_category: String,
    /// Semantic field of the concept
    pub semantic_field: String,
}

impl WithGid for Form {
    fn id(&self) -> &str {
        &self.id
    }

    fn source(&self) -> &str {
        &self.source
    }
}
