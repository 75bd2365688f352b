//! Lookup structures over a property graph.

use crate::error::DataError;
use crate::model::{ElementRecord, RecordKind, RelationKind};
use crate::parser::PropertyGraph;
use std::collections::HashMap;

/// An `IFCRELDEFINESBYPROPERTIES` edge from an element to a property
/// definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyLink {
    pub relation: u64,
    pub definition: u64,
}

/// Read-only index over the records of one model.
///
/// Built in one pass over the records; every grouped lookup keeps the order
/// of the records it was built from.
#[derive(Debug, Default)]
pub struct PropertyIndex {
    records: Vec<ElementRecord>,
    by_id: HashMap<u64, usize>,
    by_type: HashMap<String, Vec<usize>>,
    by_relation: HashMap<RelationKind, Vec<usize>>,
    links: HashMap<u64, Vec<PropertyLink>>,
}

impl PropertyIndex {
    #[must_use]
    pub fn build(records: Vec<ElementRecord>) -> Self {
        let mut index = Self {
            by_id: HashMap::with_capacity(records.len()),
            ..Self::default()
        };

        for (pos, record) in records.iter().enumerate() {
            index.by_id.insert(record.id, pos);
            index
                .by_type
                .entry(record.entity_type.clone())
                .or_default()
                .push(pos);

            if let Some(kind) = record.relation_kind() {
                index.by_relation.entry(kind).or_default().push(pos);
            }

            if let RecordKind::DefinesByProperties {
                related_objects,
                relating_property_definition,
            } = &record.kind
            {
                let Some(definition) = *relating_property_definition else {
                    tracing::debug!(relation = record.id, "Relation without property definition");
                    continue;
                };
                for element in related_objects {
                    index.links.entry(*element).or_default().push(PropertyLink {
                        relation: record.id,
                        definition,
                    });
                }
            }
        }

        index.records = records;
        tracing::debug!(
            records = index.records.len(),
            types = index.by_type.len(),
            linked_elements = index.links.len(),
            dangling = index.dangling_references().len(),
            "Built property index"
        );
        index
    }

    /// References that point outside the graph. They are tolerated: lookups
    /// through them simply find nothing.
    #[must_use]
    pub fn dangling_references(&self) -> Vec<DataError> {
        self.records
            .iter()
            .flat_map(|record| {
                record
                    .references()
                    .into_iter()
                    .filter(move |id| !self.by_id.contains_key(id))
                    .map(move |missing| DataError::MissingReference {
                        from: record.id,
                        missing,
                    })
            })
            .collect()
    }

    #[must_use]
    pub fn from_graph(graph: PropertyGraph) -> Self {
        Self::build(graph.into_records())
    }

    #[must_use]
    pub fn by_id(&self, id: u64) -> Option<&ElementRecord> {
        self.by_id.get(&id).map(|&pos| &self.records[pos])
    }

    /// Follow a reference held by record `from`.
    pub fn resolve(&self, from: u64, id: u64) -> Result<&ElementRecord, DataError> {
        self.by_id(id)
            .ok_or(DataError::MissingReference { from, missing: id })
    }

    /// Records of exactly this (upper-case) entity type.
    pub fn by_type<'a>(&'a self, entity_type: &str) -> impl Iterator<Item = &'a ElementRecord> + 'a {
        self.positions(self.by_type.get(entity_type))
    }

    pub fn relations_of_kind(&self, kind: RelationKind) -> impl Iterator<Item = &ElementRecord> + '_ {
        self.positions(self.by_relation.get(&kind))
    }

    /// Property definitions linked to `element`, in relation order.
    #[must_use]
    pub fn property_links(&self, element: u64) -> &[PropertyLink] {
        self.links.get(&element).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn records(&self) -> &[ElementRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn positions<'a>(
        &'a self,
        positions: Option<&'a Vec<usize>>,
    ) -> impl Iterator<Item = &'a ElementRecord> + 'a {
        positions
            .into_iter()
            .flatten()
            .map(move |&pos| &self.records[pos])
    }
}
