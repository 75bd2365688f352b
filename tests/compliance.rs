use ifc_checker::check::{check, match_requirements, CheckError, CheckOptions, Session};
use ifc_checker::decode::decode_ifc_string;
use ifc_checker::error::{InputError, ScopeError};
use ifc_checker::index::PropertyIndex;
use ifc_checker::parser::{parse_property_graph, parse_requirements};
use ifc_checker::scope::{resolve_storey_scope, AmbiguityPolicy};
use pretty_assertions::assert_eq;

const WALL_GRAPH: &str = r#"{
    "10": { "expressID": 10, "type": "IFCWALL", "Name": { "type": 1, "value": "Wall-01" } },
    "20": { "expressID": 20, "type": "IFCPROPERTYSET", "Name": { "type": 1, "value": "Pset_WallCommon" },
            "HasProperties": [30] },
    "30": { "expressID": 30, "type": "IFCPROPERTYSINGLEVALUE", "Name": { "type": 1, "value": "IsExternal" } },
    "40": { "expressID": 40, "type": "IFCRELDEFINESBYPROPERTIES",
            "RelatedObjects": [10], "RelatingPropertyDefinition": 20 }
}"#;

/// Two storeys; a stair on the ground floor aggregates a flight and a
/// railing, and the railing aggregates a member.
const BUILDING_GRAPH: &str = r#"{
    "1":  { "expressID": 1, "type": "IFCBUILDINGSTOREY", "Name": "Ground Floor" },
    "2":  { "expressID": 2, "type": "IFCBUILDINGSTOREY", "Name": "\\X2\\00C9\\X0\\tage" },
    "10": { "expressID": 10, "type": "IFCWALL", "Name": "W-G" },
    "11": { "expressID": 11, "type": "IFCSTAIR", "Name": "Stair" },
    "12": { "expressID": 12, "type": "IFCSTAIRFLIGHT", "Name": "Flight" },
    "13": { "expressID": 13, "type": "IFCRAILING", "Name": "Railing" },
    "14": { "expressID": 14, "type": "IFCMEMBER", "Name": "Post" },
    "20": { "expressID": 20, "type": "IFCWALL", "Name": "W-1" },
    "30": { "expressID": 30, "type": "IFCELEMENTQUANTITY", "Name": "Qto_RailingBaseQuantities",
            "Quantities": [{ "type": 5, "value": 31 }] },
    "31": { "expressID": 31, "type": "IFCQUANTITYLENGTH", "Name": "Length" },
    "50": { "expressID": 50, "type": "IFCRELCONTAINEDINSPATIALSTRUCTURE",
            "RelatingStructure": 1, "RelatedElements": [10, 11] },
    "51": { "expressID": 51, "type": "IFCRELCONTAINEDINSPATIALSTRUCTURE",
            "RelatingStructure": 2, "RelatedElements": [20] },
    "60": { "expressID": 60, "type": "IFCRELAGGREGATES", "RelatingObject": 11, "RelatedObjects": [12, 13] },
    "61": { "expressID": 61, "type": "IFCRELAGGREGATES", "RelatingObject": 13, "RelatedObjects": [14] },
    "70": { "expressID": 70, "type": "IFCRELDEFINESBYPROPERTIES",
            "RelatedObjects": [13], "RelatingPropertyDefinition": 30 }
}"#;

fn wall_index() -> PropertyIndex {
    PropertyIndex::from_graph(parse_property_graph(WALL_GRAPH).unwrap())
}

fn building_index() -> PropertyIndex {
    PropertyIndex::from_graph(parse_property_graph(BUILDING_GRAPH).unwrap())
}

#[test]
fn present_property_passes() {
    let index = wall_index();
    let requirements = parse_requirements(
        r#"[{ "IFCEntity": "IFCWALL", "PropertySet": "Pset_WallCommon", "Property": "IsExternal" }]"#,
    )
    .unwrap();

    let result = match_requirements(&index, &requirements, index.records());
    assert_eq!(result.failing_ids(), Vec::<u64>::new());
}

#[test]
fn missing_property_fails_with_reason() {
    let index = wall_index();
    let requirements = parse_requirements(
        r#"[{ "IFCEntity": "IFCWALL", "PropertySet": "Pset_WallCommon", "Property": "FireRating" }]"#,
    )
    .unwrap();

    let result = match_requirements(&index, &requirements, index.records());
    assert_eq!(result.failing_ids(), vec![10]);
    assert_eq!(result.reasons_for(10), ["Pset_WallCommon.FireRating"]);
}

#[test]
fn requirement_for_absent_entity_has_no_effect() {
    let index = wall_index();
    let requirements = parse_requirements(
        r#"[{ "IFCEntity": "IFCDOOR", "PropertySet": "Pset_DoorCommon", "Property": "FireRating" }]"#,
    )
    .unwrap();

    let result = match_requirements(&index, &requirements, index.records());
    assert!(result.is_empty());
}

#[test]
fn requirement_without_property_fails_every_element_of_its_type() {
    let index = wall_index();
    let requirements = parse_requirements(
        r#"[
            { "IFCEntity": "IFCWALL", "PropertySet": "Pset_WallCommon" },
            { "PropertySet": "Pset_WallCommon", "Property": "IsExternal" }
        ]"#,
    )
    .unwrap();

    let report = check(&index, &requirements, &CheckOptions::default()).unwrap();
    assert_eq!(report.failing_ids, vec![10]);
    assert_eq!(report.reasons_for(10), ["Pset_WallCommon.<missing>"]);
    assert_eq!(report.requirements_checked, 1);
    assert_eq!(report.requirements_skipped, 1);
}

#[test]
fn identification_never_appears_in_reasons() {
    let index = building_index();
    let requirements = parse_requirements(
        r#"[
            { "IFCEntity": "IFCWALL", "PropertySet": "Identification", "Property": "Mark" },
            { "IFCEntity": "IFCWALL", "PropertySet": "Pset_WallCommon", "Property": "IsExternal" },
            { "IFCEntity": "IFCSTAIR", "PropertySet": "Identification", "Property": "Code" }
        ]"#,
    )
    .unwrap();

    let result = match_requirements(&index, &requirements, index.records());
    assert_eq!(result.failing_ids(), vec![10, 20]);
    for (_, reasons) in result.iter() {
        assert!(reasons.iter().all(|r| !r.starts_with("Identification.")));
    }
}

#[test]
fn matching_is_deterministic() {
    let index = building_index();
    let requirements = parse_requirements(
        r#"[
            { "IFCEntity": "IFCWALL", "PropertySet": "Pset_WallCommon", "Property": "IsExternal" },
            { "IFCEntity": "IFCRAILING", "PropertySet": "Pset_RailingCommon", "Property": "Height" },
            { "IFCEntity": "IFCWALL", "PropertySet": "Pset_WallCommon", "Property": "FireRating" }
        ]"#,
    )
    .unwrap();

    let first = match_requirements(&index, &requirements, index.records());
    let second = match_requirements(&index, &requirements, index.records());
    assert_eq!(first, second);
    assert_eq!(
        first.reasons_for(10),
        ["Pset_WallCommon.IsExternal", "Pset_WallCommon.FireRating"]
    );
}

#[test]
fn quantities_satisfy_requirements() {
    let index = building_index();
    let requirements = parse_requirements(
        r#"[{ "IFCEntity": "IfcRailing", "PropertySet": "Qto_RailingBaseQuantities", "Property": "Length" }]"#,
    )
    .unwrap();

    let report = check(&index, &requirements, &CheckOptions::default()).unwrap();
    assert!(report.is_compliant());
}

#[test]
fn storey_scope_covers_containment_and_one_level_of_aggregation() {
    let index = building_index();
    let scope = resolve_storey_scope(&index, "Ground Floor", AmbiguityPolicy::Error).unwrap();
    assert_eq!(scope.into_iter().collect::<Vec<_>>(), vec![10, 11, 12, 13]);

    let upper = resolve_storey_scope(&index, "Étage", AmbiguityPolicy::Error).unwrap();
    assert_eq!(upper.into_iter().collect::<Vec<_>>(), vec![20]);
}

#[test]
fn scope_is_a_subset_of_the_graph() {
    let index = building_index();
    for name in ["Ground Floor", "Étage"] {
        let scope = resolve_storey_scope(&index, name, AmbiguityPolicy::Error).unwrap();
        assert!(scope.iter().all(|id| index.by_id(*id).is_some()));
    }
}

#[test]
fn scoped_check_only_reports_elements_of_the_storey() {
    let index = building_index();
    let requirements = parse_requirements(
        r#"[{ "IFCEntity": "IFCWALL", "PropertySet": "Pset_WallCommon", "Property": "IsExternal" }]"#,
    )
    .unwrap();

    let report = check(&index, &requirements, &CheckOptions::for_storey("Étage")).unwrap();
    assert_eq!(report.failing_ids, vec![20]);
    assert_eq!(report.elements[0].name, "W-1");
}

#[test]
fn session_rejects_missing_inputs_and_unknown_storeys() {
    let mut session = Session::new();
    assert_eq!(
        session.run(&CheckOptions::default()),
        Err(CheckError::Input(InputError::NoModelLoaded))
    );

    session.set_graph(parse_property_graph(BUILDING_GRAPH).unwrap());
    assert_eq!(
        session.run(&CheckOptions::default()),
        Err(CheckError::Input(InputError::NoRequirementsLoaded))
    );

    session.set_requirements(Vec::new());
    assert_eq!(
        session.run(&CheckOptions::for_storey("Attic")),
        Err(CheckError::Scope(ScopeError::StoreyNotFound {
            name: "Attic".to_string()
        }))
    );
}

#[test]
fn decoder_round_trips_hex_groups() {
    let decoded = decode_ifc_string(r"\X2\00440065\X0\");
    assert_eq!(decoded, "\u{0440}\u{0065}");
    assert_eq!(decode_ifc_string(&decoded), decoded);
}
