use crate::decode::{decode_ifc_string, decode_name};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// An attribute value after ingestion. `{ "type": .., "value": .. }` wrappers
/// have already been removed, so every value is a plain scalar, a reference or
/// a list of those.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Real(f64),
    Integer(i64),
    Boolean(bool),
    Reference(u64),
    List(Vec<AttributeValue>),
    Null,
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(s) => f.write_str(&decode_ifc_string(s)),
            AttributeValue::Real(v) => write!(f, "{v:.2}"),
            AttributeValue::Integer(i) => write!(f, "{i}"),
            AttributeValue::Boolean(b) => f.write_str(if *b { "Yes" } else { "No" }),
            AttributeValue::Reference(id) => write!(f, "#{id}"),
            AttributeValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            AttributeValue::Null => f.write_str("-"),
        }
    }
}

/// The relationship entities the checker walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    DefinesByProperties,
    ContainedInSpatialStructure,
    Aggregates,
}

impl RelationKind {
    pub const ALL: [RelationKind; 3] = [
        RelationKind::DefinesByProperties,
        RelationKind::ContainedInSpatialStructure,
        RelationKind::Aggregates,
    ];

    #[must_use]
    pub fn entity_type(self) -> &'static str {
        match self {
            RelationKind::DefinesByProperties => "IFCRELDEFINESBYPROPERTIES",
            RelationKind::ContainedInSpatialStructure => "IFCRELCONTAINEDINSPATIALSTRUCTURE",
            RelationKind::Aggregates => "IFCRELAGGREGATES",
        }
    }

    #[must_use]
    pub fn from_entity_type(entity_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.entity_type() == entity_type)
    }
}

/// Typed view of the fields the checker needs, chosen by entity type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordKind {
    /// `IFCRELDEFINESBYPROPERTIES`
    DefinesByProperties {
        related_objects: Vec<u64>,
        relating_property_definition: Option<u64>,
    },
    /// `IFCRELCONTAINEDINSPATIALSTRUCTURE`
    ContainedInSpatialStructure {
        relating_structure: Option<u64>,
        related_elements: Vec<u64>,
    },
    /// `IFCRELAGGREGATES`
    Aggregates {
        relating_object: Option<u64>,
        related_objects: Vec<u64>,
    },
    /// Property sets, quantity sets and anything else carrying
    /// `HasProperties` or `Quantities`.
    PropertyDefinition {
        has_properties: Vec<u64>,
        quantities: Vec<u64>,
    },
    /// Any other entity: building elements, storeys, single properties.
    Entity,
}

/// One entry of the property graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementRecord {
    pub id: u64,
    pub entity_type: String,
    /// Raw `Name`, still carrying any `\X2\` escapes.
    pub name: Option<String>,
    pub kind: RecordKind,
    /// Every other attribute, for display.
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl ElementRecord {
    #[must_use]
    pub fn new(id: u64, entity_type: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            id,
            entity_type: entity_type.into().to_ascii_uppercase(),
            name: name.map(str::to_string),
            kind: RecordKind::Entity,
            attributes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: RecordKind) -> Self {
        self.kind = kind;
        self
    }

    /// Decoded `Name`, or `"Unknown"` when the record has none.
    #[must_use]
    pub fn decoded_name(&self) -> String {
        decode_name(self.name.as_deref())
    }

    #[must_use]
    pub fn relation_kind(&self) -> Option<RelationKind> {
        match self.kind {
            RecordKind::DefinesByProperties { .. } => Some(RelationKind::DefinesByProperties),
            RecordKind::ContainedInSpatialStructure { .. } => {
                Some(RelationKind::ContainedInSpatialStructure)
            }
            RecordKind::Aggregates { .. } => Some(RelationKind::Aggregates),
            RecordKind::PropertyDefinition { .. } | RecordKind::Entity => None,
        }
    }

    /// Ids this record points at through the fields the checker follows.
    #[must_use]
    pub fn references(&self) -> Vec<u64> {
        match &self.kind {
            RecordKind::DefinesByProperties {
                related_objects,
                relating_property_definition,
            } => related_objects
                .iter()
                .copied()
                .chain(*relating_property_definition)
                .collect(),
            RecordKind::ContainedInSpatialStructure {
                relating_structure,
                related_elements,
            } => relating_structure
                .iter()
                .chain(related_elements)
                .copied()
                .collect(),
            RecordKind::Aggregates {
                relating_object,
                related_objects,
            } => relating_object
                .iter()
                .chain(related_objects)
                .copied()
                .collect(),
            RecordKind::PropertyDefinition {
                has_properties,
                quantities,
            } => has_properties.iter().chain(quantities).copied().collect(),
            RecordKind::Entity => Vec::new(),
        }
    }
}
