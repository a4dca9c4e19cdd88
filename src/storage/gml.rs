//! GML (Graph Modelling Language) reader and writer
//!
//! The text artifact is meant for inspection and for tools outside Rust, so
//! it follows the common dialect:
//!
//! ```text
//! graph [
//!   name "clics"
//!   node [
//!     id 0
//!     label "1277"
//!     Gloss "HAND"
//!     infomap 3
//!   ]
//!   edge [
//!     source 0
//!     target 1
//!     FamilyWeight 12
//!   ]
//! ]
//! ```
//!
//! Strings are written with non-ASCII characters as literal UTF-8; only `"`,
//! `&` and control characters become numeric references. The reader first
//! escapes every non-ASCII character per line (see [`escape::ascii_safe`]) and
//! decodes references inside string values after tokenizing, so both literal
//! and escaped files load to the same graph.

use super::attrs::{AttrValue, Attributes};
use super::escape;
use super::graph::{AttrGraph, NodeId};
use crate::error::{NetworkError, Result};
use std::collections::HashMap;
use std::fmt::Write;
use tracing::{debug, warn};

const NODE_RESERVED: [&str; 2] = ["id", "label"];
const EDGE_RESERVED: [&str; 2] = ["source", "target"];
const GRAPH_RESERVED: [&str; 4] = ["node", "edge", "directed", "multigraph"];

// ============================================================================
// Writer
// ============================================================================

/// Render a graph as GML text
///
/// Node attributes named `id`/`label`, edge attributes named
/// `source`/`target` and graph attributes that collide with GML structure
/// are skipped with a warning.
///
/// # Errors
///
/// Returns [`NetworkError::InvalidKey`] if an attribute key is not a valid
/// GML key (`[A-Za-z][A-Za-z0-9_]*`).
pub fn render(graph: &AttrGraph) -> Result<String> {
    let mut out = String::from("graph [\n");

    write_attrs(&mut out, 1, graph.graph_attrs(), &GRAPH_RESERVED)?;

    for (id, label, attrs) in graph.nodes() {
        out.push_str("  node [\n");
        push_line(&mut out, 2, &format!("id {}", id.0));
        push_line(
            &mut out,
            2,
            &format!("label \"{}\"", escape::escape_markup(label)),
        );
        write_attrs(&mut out, 2, attrs, &NODE_RESERVED)?;
        out.push_str("  ]\n");
    }

    for edge in graph.edges() {
        out.push_str("  edge [\n");
        push_line(&mut out, 2, &format!("source {}", edge.source.0));
        push_line(&mut out, 2, &format!("target {}", edge.target.0));
        write_attrs(&mut out, 2, &edge.attrs, &EDGE_RESERVED)?;
        out.push_str("  ]\n");
    }

    out.push_str("]\n");
    Ok(out)
}

fn push_line(out: &mut String, depth: usize, line: &str) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(line);
    out.push('\n');
}

fn write_attrs(out: &mut String, depth: usize, attrs: &Attributes, reserved: &[&str]) -> Result<()> {
    for (key, value) in attrs {
        if reserved.contains(&key.as_str()) {
            warn!(key = %key, "skipping reserved GML attribute");
            continue;
        }
        if !is_valid_key(key) {
            return Err(NetworkError::InvalidKey(key.clone()));
        }
        let mut line = String::with_capacity(key.len() + 16);
        line.push_str(key);
        line.push(' ');
        match value {
            AttrValue::Text(s) => {
                let _ = write!(line, "\"{}\"", escape::escape_markup(s));
            }
            AttrValue::Int(i) => {
                let _ = write!(line, "{i}");
            }
            AttrValue::Float(x) => line.push_str(&format_real(*x)),
        }
        push_line(out, depth, &line);
    }
    Ok(())
}

/// Whether `key` can be written as a GML key
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    let mut bytes = key.bytes();
    bytes.next().is_some_and(|b| b.is_ascii_alphabetic())
        && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Format a float so that it reads back as a GML real (always has a `.`)
#[must_use]
pub fn format_real(x: f64) -> String {
    if x.is_nan() {
        return "NAN".to_string();
    }
    if x.is_infinite() {
        let signed = if x > 0.0 { "+INF" } else { "-INF" };
        return signed.to_string();
    }
    let mut s = format!("{x:?}");
    if !s.contains('.') {
        match s.find(['e', 'E']) {
            Some(pos) => s.insert_str(pos, ".0"),
            None => s.push_str(".0"),
        }
    }
    s
}

// ============================================================================
// Lexer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Key(String),
    Int(i64),
    Real(f64),
    Str(String),
    Open,
    Close,
}

struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn slice(&self, start: usize) -> &'a str {
        // Token boundaries are ASCII bytes, so this never splits a character
        std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or_default()
    }

    fn skip_trivia(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                b'#' => {
                    while self.peek().is_some_and(|b| b != b'\n') {
                        self.pos += 1;
                    }
                }
                b if b.is_ascii_whitespace() => self.pos += 1,
                _ => break,
            }
        }
    }

    /// Next token with the line it starts on
    fn next_token(&mut self) -> Result<Option<(Token, usize)>> {
        self.skip_trivia();
        let line = self.line;
        let Some(b) = self.peek() else {
            return Ok(None);
        };

        let token = match b {
            b'[' => {
                self.pos += 1;
                Token::Open
            }
            b']' => {
                self.pos += 1;
                Token::Close
            }
            b'"' => self.string()?,
            b'+' | b'-' | b'.' | b'0'..=b'9' => self.number()?,
            b if b.is_ascii_alphabetic() => {
                let start = self.pos;
                while self
                    .peek()
                    .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
                {
                    self.pos += 1;
                }
                Token::Key(self.slice(start).to_string())
            }
            other => {
                return Err(NetworkError::gml(
                    line,
                    format!("unexpected character `{}`", char::from(other)),
                ))
            }
        };
        Ok(Some((token, line)))
    }

    fn string(&mut self) -> Result<Token> {
        let line = self.line;
        self.pos += 1;
        let start = self.pos;
        loop {
            match self.peek() {
                Some(b'"') => break,
                Some(b'\n') | None => {
                    return Err(NetworkError::gml(line, "unterminated string"));
                }
                Some(_) => self.pos += 1,
            }
        }
        let raw = self.slice(start);
        self.pos += 1;
        Ok(Token::Str(escape::decode(raw).into_owned()))
    }

    fn number(&mut self) -> Result<Token> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        if self.bytes[self.pos..].starts_with(b"INF") {
            self.pos += 3;
            let inf = if self.bytes[start] == b'-' {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            };
            return Ok(Token::Real(inf));
        }

        let digits_start = self.pos;
        self.eat_digits();
        let mut digits = self.pos - digits_start;
        let mut is_real = false;
        if self.peek() == Some(b'.') {
            is_real = true;
            self.pos += 1;
            let frac_start = self.pos;
            self.eat_digits();
            digits += self.pos - frac_start;
        }
        if digits == 0 {
            return Err(NetworkError::gml(self.line, "expected a number"));
        }
        if is_real && matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            let exp_start = self.pos;
            self.eat_digits();
            if self.pos == exp_start {
                return Err(NetworkError::gml(self.line, "malformed exponent"));
            }
        }

        let text = self.slice(start);
        if is_real {
            text.parse()
                .map(Token::Real)
                .map_err(|e| NetworkError::gml(self.line, format!("invalid real `{text}`: {e}")))
        } else {
            text.parse()
                .map(Token::Int)
                .map_err(|e| NetworkError::gml(self.line, format!("invalid integer `{text}`: {e}")))
        }
    }

    fn eat_digits(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
    }
}

// ============================================================================
// Parser
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum GmlValue {
    Scalar(AttrValue),
    List(Vec<Entry>),
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    key: String,
    value: GmlValue,
    line: usize,
}

/// Deepest list nesting accepted; the writer never goes past 2
const MAX_DEPTH: usize = 64;

fn parse_list(lexer: &mut Lexer<'_>, depth: usize) -> Result<Vec<Entry>> {
    let nested = depth > 0;
    let mut entries = Vec::new();
    loop {
        let Some((token, line)) = lexer.next_token()? else {
            if nested {
                return Err(NetworkError::gml(lexer.line, "missing `]`"));
            }
            return Ok(entries);
        };

        let key = match token {
            Token::Key(key) => key,
            Token::Close if nested => return Ok(entries),
            Token::Close => return Err(NetworkError::gml(line, "unexpected `]`")),
            other => return Err(NetworkError::gml(line, format!("expected a key, found {other:?}"))),
        };

        let value = match lexer.next_token()? {
            Some((Token::Int(i), _)) => GmlValue::Scalar(AttrValue::Int(i)),
            Some((Token::Real(x), _)) => GmlValue::Scalar(AttrValue::Float(x)),
            Some((Token::Str(s), _)) => GmlValue::Scalar(AttrValue::Text(s)),
            Some((Token::Key(k), _)) if k == "NAN" => GmlValue::Scalar(AttrValue::Float(f64::NAN)),
            Some((Token::Key(k), _)) if k == "INF" => {
                GmlValue::Scalar(AttrValue::Float(f64::INFINITY))
            }
            Some((Token::Open, open_line)) => {
                if depth >= MAX_DEPTH {
                    return Err(NetworkError::gml(open_line, "lists nested too deeply"));
                }
                GmlValue::List(parse_list(lexer, depth + 1)?)
            }
            _ => return Err(NetworkError::gml(line, format!("missing value for `{key}`"))),
        };

        entries.push(Entry { key, value, line });
    }
}

/// Parse GML text into a graph
///
/// Every line is made ASCII-safe before tokenizing; string values are
/// reference-decoded afterwards. Node labels become node identifiers (the
/// numeric `id` is used when a node has no label).
///
/// # Errors
///
/// Returns [`NetworkError::Gml`] on lexical or structural errors: missing
/// `graph` list, nodes without `id`, duplicate ids or labels, edges pointing
/// at unknown ids, or duplicate edges.
pub fn parse(text: &str) -> Result<AttrGraph> {
    let safe = text
        .split('\n')
        .map(escape::ascii_safe)
        .collect::<Vec<_>>()
        .join("\n");

    let mut lexer = Lexer::new(&safe);
    let top = parse_list(&mut lexer, 0)?;

    let body = top
        .into_iter()
        .find_map(|entry| match (entry.key.as_str(), entry.value) {
            ("graph", GmlValue::List(body)) => Some(body),
            _ => None,
        })
        .ok_or_else(|| NetworkError::gml(1, "no `graph [ ... ]` block"))?;

    build_graph(body)
}

fn build_graph(body: Vec<Entry>) -> Result<AttrGraph> {
    let mut graph = AttrGraph::new();
    let mut ids: HashMap<i64, NodeId> = HashMap::new();
    let mut edges = Vec::new();

    for entry in body {
        match (entry.key.as_str(), entry.value) {
            ("node", GmlValue::List(fields)) => {
                add_node(&mut graph, &mut ids, fields, entry.line)?;
            }
            ("edge", GmlValue::List(fields)) => edges.push((fields, entry.line)),
            (flag @ ("directed" | "multigraph"), _) => {
                debug!(key = flag, "ignoring GML graph flag");
            }
            (key, GmlValue::Scalar(value)) => {
                graph.graph_attrs_mut().insert(key, value);
            }
            (key, GmlValue::List(_)) => {
                debug!(key, line = entry.line, "skipping nested GML list");
            }
        }
    }

    // Edges may precede the nodes they reference
    for (fields, line) in edges {
        add_edge(&mut graph, &ids, fields, line)?;
    }

    Ok(graph)
}

fn add_node(
    graph: &mut AttrGraph,
    ids: &mut HashMap<i64, NodeId>,
    fields: Vec<Entry>,
    line: usize,
) -> Result<()> {
    let mut id = None;
    let mut label = None;
    let mut attrs = Attributes::new();

    for field in fields {
        match (field.key.as_str(), field.value) {
            ("id", GmlValue::Scalar(AttrValue::Int(i))) => id = Some(i),
            ("id", _) => return Err(NetworkError::gml(field.line, "node id must be an integer")),
            ("label", GmlValue::Scalar(value)) => label = Some(value.to_string()),
            (key, GmlValue::Scalar(value)) => {
                attrs.insert(key, value);
            }
            (key, GmlValue::List(_)) => {
                debug!(key, line = field.line, "skipping nested node list");
            }
        }
    }

    let id = id.ok_or_else(|| NetworkError::gml(line, "node without `id`"))?;
    if ids.contains_key(&id) {
        return Err(NetworkError::gml(line, format!("node id {id} is duplicated")));
    }
    let label = label.unwrap_or_else(|| id.to_string());
    if graph.node_id(&label).is_some() {
        return Err(NetworkError::gml(line, format!("node label `{label}` is duplicated")));
    }

    let node = graph.add_node_with(label, attrs);
    ids.insert(id, node);
    Ok(())
}

fn add_edge(
    graph: &mut AttrGraph,
    ids: &HashMap<i64, NodeId>,
    fields: Vec<Entry>,
    line: usize,
) -> Result<()> {
    let mut source = None;
    let mut target = None;
    let mut attrs = Attributes::new();

    for field in fields {
        match (field.key.as_str(), field.value) {
            ("source", GmlValue::Scalar(AttrValue::Int(i))) => source = Some(i),
            ("target", GmlValue::Scalar(AttrValue::Int(i))) => target = Some(i),
            ("source" | "target", _) => {
                return Err(NetworkError::gml(field.line, "edge endpoints must be integers"));
            }
            (key, GmlValue::Scalar(value)) => {
                attrs.insert(key, value);
            }
            (key, GmlValue::List(_)) => {
                debug!(key, line = field.line, "skipping nested edge list");
            }
        }
    }

    let resolve = |end: Option<i64>, name: &str| -> Result<NodeId> {
        let raw = end.ok_or_else(|| NetworkError::gml(line, format!("edge without `{name}`")))?;
        ids.get(&raw)
            .copied()
            .ok_or_else(|| NetworkError::gml(line, format!("edge {name} {raw} is not a node id")))
    };
    let source = resolve(source, "source")?;
    let target = resolve(target, "target")?;

    if graph.edge_between(source, target).is_some() {
        return Err(NetworkError::gml(
            line,
            format!("edge ({}, {}) is duplicated", source.0, target.0),
        ));
    }

    let edge = graph
        .connect_ids(source, target)
        .ok_or_else(|| NetworkError::gml(line, "edge endpoint out of range"))?;
    if let Some(slot) = graph.edge_attrs_mut(edge) {
        slot.merge(attrs);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> AttrGraph {
        let mut graph = AttrGraph::new();
        graph.graph_attrs_mut().insert("name", "clics");
        graph.add_node_with(
            "1277",
            Attributes::new()
                .with("Gloss", "HAND")
                .with("WordFrequency", 12_i64)
                .with("infomap", 3_i64),
        );
        graph.add_node_with("1673", Attributes::new().with("Gloss", "ARM"));
        graph.add_edge_with(
            "1277",
            "1673",
            Attributes::new().with("FamilyWeight", 5_i64).with("weight", 0.75),
        );
        graph
    }

    #[test]
    fn test_render_layout() {
        let text = render(&sample_graph()).unwrap();
        let expected = "\
graph [
  name \"clics\"
  node [
    id 0
    label \"1277\"
    Gloss \"HAND\"
    WordFrequency 12
    infomap 3
  ]
  node [
    id 1
    label \"1673\"
    Gloss \"ARM\"
  ]
  edge [
    source 0
    target 1
    FamilyWeight 5
    weight 0.75
  ]
]
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_parse_round_trip() {
        let graph = sample_graph();
        let parsed = parse(&render(&graph).unwrap()).unwrap();
        assert_eq!(parsed, graph);
    }

    #[test]
    fn test_render_writes_unicode_literally() {
        let mut graph = AttrGraph::new();
        graph.add_node_with("ŋa", Attributes::new().with("Words", "mɛ̃;\"tu\""));
        let text = render(&graph).unwrap();
        assert!(text.contains("label \"ŋa\""));
        assert!(text.contains("Words \"mɛ̃;&#34;tu&#34;\""));

        let parsed = parse(&text).unwrap();
        let id = parsed.node_id("ŋa").unwrap();
        assert_eq!(
            parsed.node_attrs(id).unwrap().get("Words"),
            Some(&AttrValue::from("mɛ̃;\"tu\""))
        );
    }

    #[test]
    fn test_parse_escaped_input() {
        let text = "graph [ node [ id 0 label \"&#331;a\" ] ]";
        let graph = parse(text).unwrap();
        assert!(graph.node_id("ŋa").is_some());
    }

    #[test]
    fn test_reserved_and_invalid_keys() {
        let mut graph = AttrGraph::new();
        graph.add_node_with("a", Attributes::new().with("label", "shadow"));
        let text = render(&graph).unwrap();
        assert!(!text.contains("shadow"));

        let mut bad = AttrGraph::new();
        bad.add_node_with("a", Attributes::new().with("not a key", 1_i64));
        assert!(matches!(render(&bad), Err(NetworkError::InvalidKey(k)) if k == "not a key"));
    }

    #[test]
    fn test_format_real() {
        assert_eq!(format_real(1.0), "1.0");
        assert_eq!(format_real(0.1), "0.1");
        assert_eq!(format_real(1e20), "1.0e20");
        assert_eq!(format_real(1e-7), "1.0e-7");
        assert_eq!(format_real(f64::INFINITY), "+INF");
        assert_eq!(format_real(f64::NEG_INFINITY), "-INF");
        assert_eq!(format_real(f64::NAN), "NAN");
    }

    #[test]
    fn test_parse_reals() {
        let text = "graph [ a 1.0e20 b -INF c NAN d .5 e 3. f +2.5E-3 ]";
        let graph = parse(text).unwrap();
        let attrs = graph.graph_attrs();
        assert_eq!(attrs.get("a"), Some(&AttrValue::Float(1e20)));
        assert_eq!(attrs.get("b"), Some(&AttrValue::Float(f64::NEG_INFINITY)));
        assert!(attrs.get("c").and_then(AttrValue::as_float).is_some_and(f64::is_nan));
        assert_eq!(attrs.get("d"), Some(&AttrValue::Float(0.5)));
        assert_eq!(attrs.get("e"), Some(&AttrValue::Float(3.0)));
        assert_eq!(attrs.get("f"), Some(&AttrValue::Float(0.0025)));
    }

    #[test]
    fn test_parse_comments_flags_and_nested_lists() {
        let text = "\
# exported by hand
graph [
  directed 0
  graphics [ w 10 ]
  node [ id 7 label \"x\" graphics [ fill \"red\" ] ]
  node [ id 9 ]
  edge [ source 7 target 9 ]
]";
        let graph = parse(text).unwrap();
        assert_eq!(graph.num_nodes(), 2);
        assert_eq!(graph.num_edges(), 1);
        assert!(graph.graph_attrs().is_empty());
        assert!(graph.node_id("9").is_some());
        let x = graph.node_id("x").unwrap();
        assert!(graph.node_attrs(x).unwrap().is_empty());
    }

    #[test]
    fn test_parse_edges_before_nodes() {
        let text = "graph [ edge [ source 1 target 0 ] node [ id 0 label \"a\" ] node [ id 1 label \"b\" ] ]";
        let graph = parse(text).unwrap();
        let edge = &graph.edges()[0];
        assert_eq!(graph.node_label(edge.source), Some("b"));
        assert_eq!(graph.node_label(edge.target), Some("a"));
    }

    #[test]
    fn test_parse_errors_report_line() {
        let cases = [
            ("graph [\n  node [ id 0 ]\n", "missing `]`"),
            ("graph [\n  node [ label \"a\" ]\n]", "node without `id`"),
            ("graph [\n  node [ id 0 ]\n  node [ id 0 ]\n]", "duplicated"),
            ("graph [\n  edge [ source 0 target 1 ]\n]", "not a node id"),
            ("graph [\n  name \"open\n]", "unterminated string"),
            ("graph [\n  key ]\n", "missing value"),
            ("graph [ ] ]", "unexpected `]`"),
            ("nodes 3", "no `graph"),
        ];
        for (text, needle) in cases {
            let err = parse(text).unwrap_err();
            assert!(
                matches!(&err, NetworkError::Gml { message, .. } if message.contains(needle)),
                "{text:?} gave {err}"
            );
        }

        match parse("graph [\n\n  x @\n]") {
            Err(NetworkError::Gml { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected GML error, got {other:?}"),
        }
    }

    #[test]
    fn test_nesting_depth_is_capped() {
        let deep = format!("graph [ {} ]", "a [ ".repeat(5000));
        let err = parse(&deep).unwrap_err();
        assert!(matches!(&err, NetworkError::Gml { message, .. } if message.contains("nested too deeply")));

        let within = format!("graph [ {}{} ]", "a [ ".repeat(MAX_DEPTH - 1), "] ".repeat(MAX_DEPTH - 1));
        assert!(parse(&within).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_edge_rejected() {
        let text = "graph [ node [ id 0 ] node [ id 1 ] edge [ source 0 target 1 ] edge [ source 1 target 0 ] ]";
        assert!(parse(text).is_err());
    }

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("FamilyFrequency"));
        assert!(is_valid_key("a_1"));
        assert!(!is_valid_key("1a"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("with-dash"));
    }
}
