//! Parquet snapshot of an attributed graph
//!
//! Nodes, edges and all three attribute scopes are flattened into a single
//! long-format table so one file holds the whole graph:
//!
//! ```text
//! record  owner  label   source target  key      kind  text    int   real
//! 0       0      -       -      -       "name"   0     "clics" -     -      graph attribute
//! 1       0      "1277"  -      -       -        -     -       -     -      node
//! 3       0      -       -      -       "Gloss"  0     "HAND"  -     -      node attribute
//! 2       0      -       0      1       -        -     -       -     -      edge
//! 4       0      -       -      -       "weight" 2     -       -     0.75   edge attribute
//! ```
//!
//! Rows are written in graph order, so reading them back sequentially
//! rebuilds node order, edge order and orientation exactly. Values are stored
//! in typed columns (`Int64`, `Float64`), so no precision is lost.

use super::attrs::{AttrValue, Attributes};
use super::graph::{AttrGraph, EdgeId, NodeId};
use anyhow::{bail, Context, Result};
use arrow::array::{Array, Float64Array, Int64Array, StringArray, UInt32Array, UInt8Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::arrow_writer::ArrowWriter;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

const RECORD_GRAPH_ATTR: u8 = 0;
const RECORD_NODE: u8 = 1;
const RECORD_EDGE: u8 = 2;
const RECORD_NODE_ATTR: u8 = 3;
const RECORD_EDGE_ATTR: u8 = 4;

const KIND_TEXT: u8 = 0;
const KIND_INT: u8 = 1;
const KIND_FLOAT: u8 = 2;

fn schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("record", DataType::UInt8, false),
        Field::new("owner", DataType::UInt32, false),
        Field::new("label", DataType::Utf8, true),
        Field::new("source", DataType::UInt32, true),
        Field::new("target", DataType::UInt32, true),
        Field::new("key", DataType::Utf8, true),
        Field::new("kind", DataType::UInt8, true),
        Field::new("text", DataType::Utf8, true),
        Field::new("int", DataType::Int64, true),
        Field::new("real", DataType::Float64, true),
    ]))
}

/// Column buffers for the long-format table
#[derive(Default)]
struct Rows {
    record: Vec<u8>,
    owner: Vec<u32>,
    label: Vec<Option<String>>,
    source: Vec<Option<u32>>,
    target: Vec<Option<u32>>,
    key: Vec<Option<String>>,
    kind: Vec<Option<u8>>,
    text: Vec<Option<String>>,
    int: Vec<Option<i64>>,
    real: Vec<Option<f64>>,
}

impl Rows {
    fn push_entity(&mut self, record: u8, owner: u32, label: Option<&str>, ends: Option<(u32, u32)>) {
        self.record.push(record);
        self.owner.push(owner);
        self.label.push(label.map(str::to_string));
        self.source.push(ends.map(|(s, _)| s));
        self.target.push(ends.map(|(_, t)| t));
        self.key.push(None);
        self.kind.push(None);
        self.text.push(None);
        self.int.push(None);
        self.real.push(None);
    }

    fn push_attrs(&mut self, record: u8, owner: u32, attrs: &Attributes) {
        for (key, value) in attrs {
            self.record.push(record);
            self.owner.push(owner);
            self.label.push(None);
            self.source.push(None);
            self.target.push(None);
            self.key.push(Some(key.clone()));
            let (kind, text, int, real) = match value {
                AttrValue::Text(s) => (KIND_TEXT, Some(s.clone()), None, None),
                AttrValue::Int(i) => (KIND_INT, None, Some(*i), None),
                AttrValue::Float(x) => (KIND_FLOAT, None, None, Some(*x)),
            };
            self.kind.push(Some(kind));
            self.text.push(text);
            self.int.push(int);
            self.real.push(real);
        }
    }

    fn into_batch(self) -> Result<RecordBatch> {
        RecordBatch::try_new(
            schema(),
            vec![
                Arc::new(UInt8Array::from(self.record)),
                Arc::new(UInt32Array::from(self.owner)),
                Arc::new(StringArray::from(self.label)),
                Arc::new(UInt32Array::from(self.source)),
                Arc::new(UInt32Array::from(self.target)),
                Arc::new(StringArray::from(self.key)),
                Arc::new(UInt8Array::from(self.kind)),
                Arc::new(StringArray::from(self.text)),
                Arc::new(Int64Array::from(self.int)),
                Arc::new(Float64Array::from(self.real)),
            ],
        )
        .context("Failed to create snapshot RecordBatch")
    }
}

/// Write a graph snapshot to a single Parquet file
///
/// # Errors
///
/// Returns error if file I/O fails or Arrow conversion fails
pub fn write_snapshot(graph: &AttrGraph, path: &Path) -> Result<()> {
    let mut rows = Rows::default();

    rows.push_attrs(RECORD_GRAPH_ATTR, 0, graph.graph_attrs());

    for (id, label, attrs) in graph.nodes() {
        rows.push_entity(RECORD_NODE, id.0, Some(label), None);
        rows.push_attrs(RECORD_NODE_ATTR, id.0, attrs);
    }

    for (index, edge) in graph.edges().iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)] // Graphs >4B edges not supported
        let owner = index as u32;
        rows.push_entity(RECORD_EDGE, owner, None, Some((edge.source.0, edge.target.0)));
        rows.push_attrs(RECORD_EDGE_ATTR, owner, &edge.attrs);
    }

    let batch = rows.into_batch()?;

    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let props = WriterProperties::builder()
        .set_compression(parquet::basic::Compression::ZSTD(
            parquet::basic::ZstdLevel::try_new(3)?,
        ))
        .build();

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    Ok(())
}

fn column<'b, T: 'static>(batch: &'b RecordBatch, name: &str) -> Result<&'b T> {
    batch
        .column_by_name(name)
        .with_context(|| format!("Missing {name} column"))?
        .as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("Invalid {name} column type"))
}

fn opt_u32(array: &UInt32Array, i: usize) -> Option<u32> {
    (!array.is_null(i)).then(|| array.value(i))
}

fn opt_str(array: &StringArray, i: usize) -> Option<&str> {
    (!array.is_null(i)).then(|| array.value(i))
}

/// Read a graph snapshot written by [`write_snapshot`]
///
/// # Errors
///
/// Returns error if the file doesn't exist, is not Parquet, or its rows do
/// not describe a consistent graph
pub fn read_snapshot(path: &Path) -> Result<AttrGraph> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut graph = AttrGraph::new();

    for batch_result in reader {
        let batch: RecordBatch = batch_result?;

        let record = column::<UInt8Array>(&batch, "record")?;
        let owner = column::<UInt32Array>(&batch, "owner")?;
        let label = column::<StringArray>(&batch, "label")?;
        let source = column::<UInt32Array>(&batch, "source")?;
        let target = column::<UInt32Array>(&batch, "target")?;
        let key = column::<StringArray>(&batch, "key")?;
        let kind = column::<UInt8Array>(&batch, "kind")?;
        let text = column::<StringArray>(&batch, "text")?;
        let int = column::<Int64Array>(&batch, "int")?;
        let real = column::<Float64Array>(&batch, "real")?;

        for i in 0..batch.num_rows() {
            let owner_id = owner.value(i);
            match record.value(i) {
                RECORD_NODE => {
                    let name = opt_str(label, i).with_context(|| format!("Row {i}: node without label"))?;
                    let id = graph.add_node(name);
                    if id != NodeId(owner_id) {
                        bail!("Row {i}: node `{name}` is duplicated or out of order");
                    }
                }
                RECORD_EDGE => {
                    let (Some(s), Some(t)) = (opt_u32(source, i), opt_u32(target, i)) else {
                        bail!("Row {i}: edge without endpoints");
                    };
                    let id = graph
                        .connect_ids(NodeId(s), NodeId(t))
                        .with_context(|| format!("Row {i}: edge ({s}, {t}) references a missing node"))?;
                    if id != EdgeId(owner_id) {
                        bail!("Row {i}: edge ({s}, {t}) is duplicated or out of order");
                    }
                }
                tag @ (RECORD_GRAPH_ATTR | RECORD_NODE_ATTR | RECORD_EDGE_ATTR) => {
                    let name = opt_str(key, i).with_context(|| format!("Row {i}: attribute without key"))?;
                    let value = match (!kind.is_null(i)).then(|| kind.value(i)) {
                        Some(KIND_TEXT) if !text.is_null(i) => AttrValue::Text(text.value(i).to_string()),
                        Some(KIND_INT) if !int.is_null(i) => AttrValue::Int(int.value(i)),
                        Some(KIND_FLOAT) if !real.is_null(i) => AttrValue::Float(real.value(i)),
                        other => bail!("Row {i}: attribute `{name}` has invalid kind {other:?}"),
                    };
                    let slot = match tag {
                        RECORD_GRAPH_ATTR => Some(graph.graph_attrs_mut()),
                        RECORD_NODE_ATTR => graph.node_attrs_mut(NodeId(owner_id)),
                        _ => graph.edge_attrs_mut(EdgeId(owner_id)),
                    };
                    slot.with_context(|| format!("Row {i}: attribute `{name}` has no owner {owner_id}"))?
                        .insert(name, value);
                }
                other => bail!("Row {i}: unknown record tag {other}"),
            }
        }
    }

    Ok(graph)
}
