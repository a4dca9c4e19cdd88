//! Map and table exports of the lexical records

use crate::error::Result;
use crate::model::{Concept, Feature, Variety};
use serde::{Deserialize, Serialize};
use std::io;
use tracing::debug;

/// GeoJSON `FeatureCollection` of variety locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    /// One feature per variety, in input order
    pub features: Vec<Feature>,
}

/// Collect the GeoJSON features of `varieties`
#[must_use]
pub fn feature_collection(varieties: &[Variety]) -> FeatureCollection {
    FeatureCollection {
        features: varieties.iter().map(Variety::as_geojson).collect(),
    }
}

/// Write the GeoJSON `FeatureCollection` of `varieties` as pretty JSON
///
/// # Errors
///
/// Returns [`crate::NetworkError::Json`] if serialization or the underlying
/// writer fails
pub fn write_geojson<W: io::Write>(writer: W, varieties: &[Variety]) -> Result<()> {
    serde_json::to_writer_pretty(writer, &feature_collection(varieties))?;
    debug!(features = varieties.len(), "wrote feature collection");
    Ok(())
}

/// Write `concepts` as CSV, one row per concept with a header row
///
/// # Errors
///
/// Returns [`crate::NetworkError::Csv`] if serialization or the underlying
/// writer fails
pub fn write_concept_table<W: io::Write>(writer: W, concepts: &[Concept]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for concept in concepts {
        csv.serialize(concept.to_row())?;
    }
    csv.flush().map_err(csv::Error::from)?;
    debug!(rows = concepts.len(), "wrote concept table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_collection() {
        let varieties = vec![
            Variety {
                id: "1".to_string(),
                source: "wold".to_string(),
                name: "Russian".to_string(),
                glottocode: None,
                family: "Indo-European".to_string(),
                macroarea: "Eurasia".to_string(),
                longitude: Some(37.6),
                latitude: Some(55.75),
            },
            Variety {
                id: "2".to_string(),
                source: "ids".to_string(),
                name: "Nowhere".to_string(),
                glottocode: None,
                family: "Isolate".to_string(),
                macroarea: "Africa".to_string(),
                longitude: None,
                latitude: None,
            },
        ];

        let value = serde_json::to_value(feature_collection(&varieties)).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["features"][0]["properties"]["key"], "wold-1");
        assert!(value["features"][1]["geometry"].is_null());
    }

    #[test]
    fn test_write_geojson() {
        let mut out = Vec::new();
        write_geojson(&mut out, &[]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value, serde_json::json!({"type": "FeatureCollection", "features": []}));
    }

    #[test]
    fn test_concept_table() {
        let mut hand = Concept::new("1277", "HAND", "Person/Thing", "The body");
        hand.forms = vec!["ruka".to_string(), "kéz".to_string()];
        hand.varieties = vec!["wold-rus".to_string(), "wold-hun".to_string()];
        hand.families = vec!["Indo-European".to_string(), "Uralic".to_string()];
        let arm = Concept::new("1673", "ARM", "Person/Thing", "The body");

        let mut out = Vec::new();
        write_concept_table(&mut out, &[hand, arm]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(
            lines[0],
            "ID,Gloss,Semanticfield,Category,FamilyFrequency,LanguageFrequency,\
             WordFrequency,Words,Languages,Families,ConcepticonId"
        );
        assert_eq!(
            lines[1],
            "1277,HAND,The body,Person/Thing,2,2,2,ruka;kéz,wold-rus;wold-hun,Indo-European;Uralic,1277"
        );
        assert_eq!(lines[2], "1673,ARM,The body,Person/Thing,0,0,0,,,,1673");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_empty_table_has_no_rows() {
        let mut out = Vec::new();
        write_concept_table(&mut out, &[]).unwrap();
        assert!(out.is_empty());
    }
}
