use crate::error::LoadError;
use crate::model::{AttributeValue, ElementRecord, RecordKind, RelationKind};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

// web-ifc tags handles (entity references) with this value type.
const HANDLE_VALUE_TYPE: u64 = 5;

/// Every record of one model, ordered by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyGraph {
    records: Vec<ElementRecord>,
}

impl PropertyGraph {
    /// Build a graph from loose records. Records are sorted by id; when two
    /// share an id the later one is kept.
    #[must_use]
    pub fn from_records(records: Vec<ElementRecord>) -> Self {
        let mut by_id: BTreeMap<u64, ElementRecord> = BTreeMap::new();
        for record in records {
            if let Some(previous) = by_id.insert(record.id, record) {
                tracing::warn!(id = previous.id, "Duplicate record id, keeping the last one");
            }
        }
        Self {
            records: by_id.into_values().collect(),
        }
    }

    #[must_use]
    pub fn records(&self) -> &[ElementRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<ElementRecord> {
        self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Reads a serialized property graph from disk.
///
/// # Errors
///
/// Returns [`LoadError::FileRead`] if the file cannot be read, and the errors
/// of [`parse_property_graph`] otherwise.
pub fn load_property_graph<P: AsRef<Path>>(path: P) -> Result<PropertyGraph, LoadError> {
    let content = super::read_file(path.as_ref())?;
    parse_property_graph(&content)
}

/// Parses a serialized property graph.
///
/// The expected input is the object produced by the viewer's property
/// serializer, keyed by stringified express id:
///
/// ```json
/// {
///   "10": { "expressID": 10, "type": "IFCWALL", "Name": { "type": 1, "value": "Wall-01" } },
///   "40": { "expressID": 40, "type": "IFCRELDEFINESBYPROPERTIES",
///           "RelatedObjects": [10], "RelatingPropertyDefinition": 20 }
/// }
/// ```
///
/// A plain array of records is accepted as well. Wrapped values
/// (`{ "type": .., "value": .. }`) are unwrapped here, once.
///
/// # Errors
///
/// Returns [`LoadError::Json`] for malformed JSON and
/// [`LoadError::InvalidShape`] when a record has no usable id or type.
pub fn parse_property_graph(json: &str) -> Result<PropertyGraph, LoadError> {
    let root: Value = serde_json::from_str(json)?;

    let records = match &root {
        Value::Object(entries) => entries
            .iter()
            .map(|(key, value)| parse_record(Some(key), value))
            .collect::<Result<Vec<_>, _>>()?,
        Value::Array(entries) => entries
            .iter()
            .map(|value| parse_record(None, value))
            .collect::<Result<Vec<_>, _>>()?,
        _ => {
            return Err(LoadError::InvalidShape {
                what: "property graph",
                message: "expected an object keyed by express id".to_string(),
            })
        }
    };

    let graph = PropertyGraph::from_records(records);
    tracing::info!(records = graph.len(), "Loaded property graph");
    Ok(graph)
}

fn parse_record(key: Option<&str>, value: &Value) -> Result<ElementRecord, LoadError> {
    let label = key.unwrap_or("?");
    let invalid = |message: String| LoadError::InvalidShape {
        what: "property graph",
        message,
    };

    let fields = value
        .as_object()
        .ok_or_else(|| invalid(format!("entry '{label}' is not an object")))?;

    let id = fields
        .get("expressID")
        .map(normalize_value)
        .as_ref()
        .and_then(as_id)
        .or_else(|| key.and_then(|k| k.parse().ok()))
        .ok_or_else(|| invalid(format!("entry '{label}' has no express id")))?;

    let entity_type = match fields.get("type").map(normalize_value) {
        Some(AttributeValue::Text(t)) => t.to_ascii_uppercase(),
        _ => return Err(invalid(format!("record #{id} has no type name"))),
    };

    let attributes: BTreeMap<String, AttributeValue> = fields
        .iter()
        .filter(|(name, _)| !matches!(name.as_str(), "expressID" | "type"))
        .map(|(name, value)| (name.clone(), normalize_value(value)))
        .collect();

    let name = match attributes.get("Name") {
        Some(AttributeValue::Text(s)) => Some(s.clone()),
        _ => None,
    };

    let kind = record_kind(&entity_type, &attributes);

    Ok(ElementRecord {
        id,
        entity_type,
        name,
        kind,
        attributes,
    })
}

fn record_kind(entity_type: &str, attributes: &BTreeMap<String, AttributeValue>) -> RecordKind {
    let single = |field: &str| attributes.get(field).and_then(as_id);
    let many = |field: &str| attributes.get(field).map(as_ids).unwrap_or_default();

    match RelationKind::from_entity_type(entity_type) {
        Some(RelationKind::DefinesByProperties) => RecordKind::DefinesByProperties {
            related_objects: many("RelatedObjects"),
            relating_property_definition: single("RelatingPropertyDefinition"),
        },
        Some(RelationKind::ContainedInSpatialStructure) => {
            RecordKind::ContainedInSpatialStructure {
                relating_structure: single("RelatingStructure"),
                related_elements: many("RelatedElements"),
            }
        }
        Some(RelationKind::Aggregates) => RecordKind::Aggregates {
            relating_object: single("RelatingObject"),
            related_objects: many("RelatedObjects"),
        },
        None if attributes.contains_key("HasProperties") || attributes.contains_key("Quantities") => {
            RecordKind::PropertyDefinition {
                has_properties: many("HasProperties"),
                quantities: many("Quantities"),
            }
        }
        None => RecordKind::Entity,
    }
}

/// Flatten a serialized value into an [`AttributeValue`].
fn normalize_value(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null,
        Value::Bool(b) => AttributeValue::Boolean(*b),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => AttributeValue::Integer(i),
            (None, Some(f)) => AttributeValue::Real(f),
            (None, None) => AttributeValue::Null,
        },
        Value::String(s) => AttributeValue::Text(s.clone()),
        Value::Array(items) => AttributeValue::List(items.iter().map(normalize_value).collect()),
        Value::Object(fields) => normalize_wrapped(fields),
    }
}

fn normalize_wrapped(fields: &Map<String, Value>) -> AttributeValue {
    let Some(inner) = fields.get("value") else {
        return AttributeValue::Null;
    };

    let is_handle = fields.get("type").and_then(Value::as_u64) == Some(HANDLE_VALUE_TYPE);
    match (is_handle, inner.as_u64()) {
        (true, Some(id)) => AttributeValue::Reference(id),
        _ => normalize_value(inner),
    }
}

fn as_id(value: &AttributeValue) -> Option<u64> {
    match value {
        AttributeValue::Reference(id) => Some(*id),
        AttributeValue::Integer(i) => u64::try_from(*i).ok(),
        _ => None,
    }
}

fn as_ids(value: &AttributeValue) -> Vec<u64> {
    match value {
        AttributeValue::List(items) => items.iter().filter_map(as_id).collect(),
        other => as_id(other).into_iter().collect(),
    }
}
