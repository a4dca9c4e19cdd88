//! Concepts (network nodes) and their tabular projection

use crate::storage::{AttrValue, Attributes};
use serde::{Deserialize, Serialize};

/// A Concepticon concept aggregated across all forms that express it
///
/// `forms`, `varieties` and `families` are filled in by the network builder
/// as it walks the lexical data; order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    /// Concepticon id, also used as the node label
    pub id: String,
    /// Concepticon gloss
    pub gloss: String,
    /// Ontological category
    pub ontological_category: String,
    /// Semantic field
    pub semantic_field: String,
    /// Attested surface forms
    #[serde(default)]
    pub forms: Vec<String>,
    /// Identifiers of attesting varieties
    #[serde(default)]
    pub varieties: Vec<String>,
    /// Identifiers of attesting families
    #[serde(default)]
    pub families: Vec<String>,
}

/// Flat eleven-field record of a [`Concept`], in export column order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConceptRow {
    /// Concept id
    #[serde(rename = "ID")]
    pub id: String,
    /// Gloss
    pub gloss: String,
    /// Semantic field
    #[serde(rename = "Semanticfield")]
    pub semantic_field: String,
    /// Ontological category
    pub category: String,
    /// Number of attesting families
    pub family_frequency: usize,
    /// Number of attesting varieties
    pub language_frequency: usize,
    /// Number of attested forms
    pub word_frequency: usize,
    /// Forms joined with `;`
    pub words: String,
    /// Varieties joined with `;`
    pub languages: String,
    /// Families joined with `;`
    pub families: String,
    /// Concepticon id (same as `ID`)
    pub concepticon_id: String,
}

impl Concept {
    /// Create a concept with empty attestation lists
    pub fn new(
        id: impl Into<String>,
        gloss: impl Into<String>,
        ontological_category: impl Into<String>,
        semantic_field: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            gloss: gloss.into(),
            ontological_category: ontological_category.into(),
            semantic_field: semantic_field.into(),
            ..Self::default()
        }
    }

    /// Flat record for tabular export
    #[must_use]
    pub fn to_row(&self) -> ConceptRow {
        ConceptRow {
            id: self.id.clone(),
            gloss: self.gloss.clone(),
            semantic_field: self.semantic_field.clone(),
            category: self.ontological_category.clone(),
            family_frequency: self.families.len(),
            language_frequency: self.varieties.len(),
            word_frequency: self.forms.len(),
            words: self.forms.join(";"),
            languages: self.varieties.join(";"),
            families: self.families.join(";"),
            concepticon_id: self.id.clone(),
        }
    }

    /// Ordered node attributes: the eleven export fields, in column order
    #[must_use]
    pub fn as_node_attrs(&self) -> Vec<(&'static str, AttrValue)> {
        let row = self.to_row();
        vec![
            ("ID", row.id.into()),
            ("Gloss", row.gloss.into()),
            ("Semanticfield", row.semantic_field.into()),
            ("Category", row.category.into()),
            ("FamilyFrequency", row.family_frequency.into()),
            ("LanguageFrequency", row.language_frequency.into()),
            ("WordFrequency", row.word_frequency.into()),
            ("Words", row.words.into()),
            ("Languages", row.languages.into()),
            ("Families", row.families.into()),
            ("ConcepticonId", row.concepticon_id.into()),
        ]
    }

    /// Node attributes as an attribute bag, ready for [`crate::AttrGraph::add_node_with`]
    #[must_use]
    pub fn to_attributes(&self) -> Attributes {
        self.as_node_attrs().into_iter().collect()
    }
}
