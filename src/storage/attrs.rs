//! Attribute bags carried by the graph, its nodes and its edges
//!
//! Upstream builders attach arbitrary key/value metadata to concept nodes and
//! colexification edges. Values are limited to the scalar types both storage
//! formats can represent losslessly: text, 64-bit integers and floats.

use std::cmp::Ordering;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Attribute key holding the externally assigned community label
pub const COMMUNITY_KEY: &str = "infomap";

/// A single attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// UTF-8 text
    Text(String),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
}

impl AttrValue {
    /// Borrow as text
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value (integral floats included)
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    /// Numeric value as `f64`
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for AttrValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for AttrValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for AttrValue {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<usize> for AttrValue {
    fn from(n: usize) -> Self {
        Self::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f64> for AttrValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

/// Non-integral float label, compared and hashed by bit pattern
///
/// Ordering is [`f64::total_cmp`], so `NaN` labels group with themselves.
#[derive(Debug, Clone, Copy)]
pub struct RealLabel(pub f64);

impl PartialEq for RealLabel {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for RealLabel {}

impl PartialOrd for RealLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RealLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for RealLabel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// Community label read from the [`COMMUNITY_KEY`] attribute
///
/// Clustering tools emit integer labels; float and text labels are accepted
/// too so that hand-edited GML stays usable. A float label and a text label
/// never share a community, even when they print the same.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommunityLabel {
    /// Integer label (integral floats fold into this)
    Int(i64),
    /// Non-integral float label
    Float(RealLabel),
    /// Text label
    Text(String),
}

impl From<&AttrValue> for CommunityLabel {
    fn from(value: &AttrValue) -> Self {
        match value {
            AttrValue::Text(s) => Self::Text(s.clone()),
            AttrValue::Int(i) => Self::Int(*i),
            AttrValue::Float(x) => value
                .as_int()
                .map_or(Self::Float(RealLabel(*x)), Self::Int),
        }
    }
}

impl fmt::Display for CommunityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{}", x.0),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Key-sorted attribute map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(BTreeMap<String, AttrValue>);

impl Attributes {
    /// Create an empty attribute bag
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Option<AttrValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert)
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.0.get(key)
    }

    /// Remove `key`
    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        self.0.remove(key)
    }

    /// Whether `key` is present
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Overwrite entries with those of `other`
    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// Number of attributes
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the bag is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in key order
    pub fn iter(&self) -> btree_map::Iter<'_, String, AttrValue> {
        self.0.iter()
    }

    /// Community label, if the node has been clustered
    #[must_use]
    pub fn community(&self) -> Option<CommunityLabel> {
        self.label_at(COMMUNITY_KEY)
    }

    /// Read `key` as a community label
    #[must_use]
    pub fn label_at(&self, key: &str) -> Option<CommunityLabel> {
        self.get(key).map(CommunityLabel::from)
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a String, &'a AttrValue);
    type IntoIter = btree_map::Iter<'a, String, AttrValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut attrs = Attributes::new();
        assert!(attrs.is_empty());
        attrs.insert("Gloss", "HAND");
        attrs.insert("WordFrequency", 12_i64);
        attrs.insert("weight", 0.25);

        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs.get("Gloss").and_then(AttrValue::as_str), Some("HAND"));
        assert_eq!(attrs.get("WordFrequency").and_then(AttrValue::as_int), Some(12));
        assert_eq!(attrs.get("weight").and_then(AttrValue::as_float), Some(0.25));
        assert!(attrs.get("missing").is_none());
    }

    #[test]
    fn test_iteration_is_key_sorted() {
        let attrs: Attributes = [("b", 1_i64), ("a", 2), ("c", 3)].into_iter().collect();
        let keys: Vec<_> = attrs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_merge_overwrites() {
        let mut attrs = Attributes::new().with("weight", 1_i64).with("kind", "colex");
        attrs.merge(Attributes::new().with("weight", 4_i64));
        assert_eq!(attrs.get("weight"), Some(&AttrValue::Int(4)));
        assert_eq!(attrs.get("kind"), Some(&AttrValue::from("colex")));
    }

    #[test]
    fn test_community_label_variants() {
        let int = Attributes::new().with(COMMUNITY_KEY, 3_i64);
        assert_eq!(int.community(), Some(CommunityLabel::Int(3)));

        let integral_float = Attributes::new().with(COMMUNITY_KEY, 3.0);
        assert_eq!(integral_float.community(), Some(CommunityLabel::Int(3)));

        let fractional = Attributes::new().with(COMMUNITY_KEY, 2.5);
        assert_eq!(
            fractional.community(),
            Some(CommunityLabel::Float(RealLabel(2.5)))
        );
        assert_ne!(
            fractional.community(),
            Attributes::new().with(COMMUNITY_KEY, "2.5").community()
        );

        let text = Attributes::new().with(COMMUNITY_KEY, "north");
        assert_eq!(
            text.community(),
            Some(CommunityLabel::Text("north".to_string()))
        );

        assert_eq!(Attributes::new().community(), None);
    }

    #[test]
    fn test_label_ordering_ints_before_text() {
        let mut labels = vec![
            CommunityLabel::Text("a".to_string()),
            CommunityLabel::Int(10),
            CommunityLabel::Int(2),
        ];
        labels.sort();
        assert_eq!(
            labels,
            vec![
                CommunityLabel::Int(2),
                CommunityLabel::Int(10),
                CommunityLabel::Text("a".to_string()),
            ]
        );
    }

    #[test]
    fn test_float_labels_order_between_ints_and_text() {
        let mut labels = vec![
            CommunityLabel::Text("0".to_string()),
            CommunityLabel::Float(RealLabel(2.5)),
            CommunityLabel::Float(RealLabel(-0.5)),
            CommunityLabel::Int(7),
        ];
        labels.sort();
        assert_eq!(
            labels,
            vec![
                CommunityLabel::Int(7),
                CommunityLabel::Float(RealLabel(-0.5)),
                CommunityLabel::Float(RealLabel(2.5)),
                CommunityLabel::Text("0".to_string()),
            ]
        );
        assert_eq!(CommunityLabel::Float(RealLabel(2.5)).to_string(), "2.5");

        let nan = CommunityLabel::Float(RealLabel(f64::NAN));
        assert_eq!(nan, nan.clone());
    }

    #[test]
    fn test_display() {
        assert_eq!(AttrValue::from("ŋa").to_string(), "ŋa");
        assert_eq!(AttrValue::Int(-4).to_string(), "-4");
        assert_eq!(AttrValue::Float(0.5).to_string(), "0.5");
    }
}
