//! Narrowing a check to the elements of one building storey.

use crate::decode::decode_ifc_string;
use crate::error::ScopeError;
use crate::index::PropertyIndex;
use crate::model::{RecordKind, RelationKind};
use std::collections::BTreeSet;

pub const STOREY_TYPE: &str = "IFCBUILDINGSTOREY";

/// What to do when several storeys share a decoded name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum AmbiguityPolicy {
    /// Fail with [`ScopeError::AmbiguousStoreyName`].
    #[default]
    Error,
    /// Use the storey with the highest id.
    Last,
}

/// Decoded names of all storeys, in id order.
#[must_use]
pub fn storey_names(index: &PropertyIndex) -> Vec<String> {
    index
        .by_type(STOREY_TYPE)
        .map(crate::model::ElementRecord::decoded_name)
        .collect()
}

/// Find the storey whose decoded name equals `name`. Storeys without a name
/// never match.
pub fn find_storey(
    index: &PropertyIndex,
    name: &str,
    policy: AmbiguityPolicy,
) -> Result<u64, ScopeError> {
    let ids: Vec<u64> = index
        .by_type(STOREY_TYPE)
        .filter(|storey| {
            storey.name.as_deref().map(decode_ifc_string).as_deref() == Some(name)
        })
        .map(|storey| storey.id)
        .collect();

    match ids.as_slice() {
        [] => Err(ScopeError::StoreyNotFound {
            name: name.to_string(),
        }),
        [id] => Ok(*id),
        [.., last] if policy == AmbiguityPolicy::Last => Ok(*last),
        _ => Err(ScopeError::AmbiguousStoreyName {
            name: name.to_string(),
            ids: ids.clone(),
        }),
    }
}

/// Ids of the elements contained in storey `name`, plus the direct
/// aggregation children of those elements.
///
/// Aggregation is followed one level down from the contained elements only.
/// Ids missing from the graph are left out.
pub fn resolve_storey_scope(
    index: &PropertyIndex,
    name: &str,
    policy: AmbiguityPolicy,
) -> Result<BTreeSet<u64>, ScopeError> {
    let storey = find_storey(index, name, policy)?;

    let contained: BTreeSet<u64> = index
        .relations_of_kind(RelationKind::ContainedInSpatialStructure)
        .filter_map(|rel| match &rel.kind {
            RecordKind::ContainedInSpatialStructure {
                relating_structure: Some(structure),
                related_elements,
            } if *structure == storey => Some(related_elements),
            _ => None,
        })
        .flatten()
        .copied()
        .collect();

    let aggregated: Vec<u64> = index
        .relations_of_kind(RelationKind::Aggregates)
        .filter_map(|rel| match &rel.kind {
            RecordKind::Aggregates {
                relating_object: Some(parent),
                related_objects,
            } if contained.contains(parent) => Some(related_objects),
            _ => None,
        })
        .flatten()
        .copied()
        .collect();

    let scope: BTreeSet<u64> = contained
        .iter()
        .copied()
        .chain(aggregated)
        .filter(|id| {
            let known = index.by_id(*id).is_some();
            if !known {
                tracing::debug!(storey, missing = id, "Scope references missing element");
            }
            known
        })
        .collect();

    tracing::info!(storey = name, storey_id = storey, elements = scope.len(), "Resolved storey scope");
    Ok(scope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementRecord;
    use pretty_assertions::assert_eq;

    fn contains(id: u64, storey: u64, elements: Vec<u64>) -> ElementRecord {
        ElementRecord::new(id, "IFCRELCONTAINEDINSPATIALSTRUCTURE", None).with_kind(
            RecordKind::ContainedInSpatialStructure {
                relating_structure: Some(storey),
                related_elements: elements,
            },
        )
    }

    fn aggregates(id: u64, parent: u64, children: Vec<u64>) -> ElementRecord {
        ElementRecord::new(id, "IFCRELAGGREGATES", None).with_kind(RecordKind::Aggregates {
            relating_object: Some(parent),
            related_objects: children,
        })
    }

    fn building() -> PropertyIndex {
        PropertyIndex::build(vec![
            ElementRecord::new(1, STOREY_TYPE, Some("Ground Floor")),
            ElementRecord::new(2, STOREY_TYPE, Some(r"\X2\00C9\X0\tage 1")),
            ElementRecord::new(10, "IFCWALL", None),
            ElementRecord::new(11, "IFCSTAIR", None),
            ElementRecord::new(12, "IFCSTAIRFLIGHT", None),
            ElementRecord::new(13, "IFCRAILING", None),
            ElementRecord::new(14, "IFCMEMBER", None),
            ElementRecord::new(20, "IFCWALL", None),
            contains(100, 1, vec![10, 11]),
            contains(101, 2, vec![20, 99]),
            aggregates(102, 11, vec![12, 13]),
            aggregates(103, 13, vec![14]),
        ])
    }

    #[test]
    fn lists_decoded_storey_names() {
        assert_eq!(storey_names(&building()), vec!["Ground Floor", "Étage 1"]);
    }

    #[test]
    fn scope_includes_contained_and_aggregated_children() {
        let scope = resolve_storey_scope(&building(), "Ground Floor", AmbiguityPolicy::Error)
            .unwrap();
        assert_eq!(scope.into_iter().collect::<Vec<_>>(), vec![10, 11, 12, 13]);
    }

    #[test]
    fn aggregation_is_followed_one_level_only() {
        let scope = resolve_storey_scope(&building(), "Ground Floor", AmbiguityPolicy::Error)
            .unwrap();
        assert!(!scope.contains(&14));
    }

    #[test]
    fn matches_decoded_name_and_drops_missing_ids() {
        let scope =
            resolve_storey_scope(&building(), "Étage 1", AmbiguityPolicy::Error).unwrap();
        assert_eq!(scope.into_iter().collect::<Vec<_>>(), vec![20]);
    }

    #[test]
    fn unknown_storey_is_an_error() {
        assert_eq!(
            resolve_storey_scope(&building(), "Roof", AmbiguityPolicy::Error),
            Err(ScopeError::StoreyNotFound {
                name: "Roof".to_string()
            })
        );
    }

    #[test]
    fn storey_without_name_never_matches() {
        let index = PropertyIndex::build(vec![ElementRecord::new(1, STOREY_TYPE, None)]);
        assert_eq!(storey_names(&index), vec!["Unknown"]);
        assert_eq!(
            resolve_storey_scope(&index, "Unknown", AmbiguityPolicy::Error),
            Err(ScopeError::StoreyNotFound {
                name: "Unknown".to_string()
            })
        );
    }

    #[test]
    fn duplicate_names_follow_the_policy() {
        let index = PropertyIndex::build(vec![
            ElementRecord::new(1, STOREY_TYPE, Some("Level")),
            ElementRecord::new(2, STOREY_TYPE, Some("Level")),
        ]);
        assert_eq!(
            find_storey(&index, "Level", AmbiguityPolicy::Error),
            Err(ScopeError::AmbiguousStoreyName {
                name: "Level".to_string(),
                ids: vec![1, 2]
            })
        );
        assert_eq!(find_storey(&index, "Level", AmbiguityPolicy::Last), Ok(2));
    }
}
