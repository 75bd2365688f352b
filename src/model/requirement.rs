use crate::error::DataError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Property set name reserved for identity metadata; never checked.
pub const IDENTIFICATION_PSET: &str = "Identification";

/// Stands in for an absent field in a failure reason.
pub const MISSING_FIELD: &str = "<missing>";

/// One entry of a requirements file:
/// `{ "IFCEntity": "IFCWALL", "PropertySet": "Pset_WallCommon", "Property": "IsExternal" }`.
///
/// Fields are optional so that incomplete entries can be loaded instead of
/// rejecting the whole file. A field that is not a string counts as absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Requirement {
    #[serde(rename = "IFCEntity", default, deserialize_with = "lenient_string")]
    pub ifc_entity: Option<String>,
    #[serde(rename = "PropertySet", default, deserialize_with = "lenient_string")]
    pub property_set: Option<String>,
    #[serde(rename = "Property", default, deserialize_with = "lenient_string")]
    pub property: Option<String>,
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// A requirement that selects candidates: its entity type is known.
///
/// A missing property set or property makes it impossible to satisfy, so
/// every element of the entity type fails it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredProperty<'a> {
    /// Upper-cased entity type.
    pub entity_type: String,
    pub property_set: Option<&'a str>,
    pub property: Option<&'a str>,
}

impl RequiredProperty<'_> {
    /// `"PropertySet.Property"`, the form shown to users for a failure.
    #[must_use]
    pub fn reason(&self) -> String {
        format!(
            "{}.{}",
            self.property_set.unwrap_or(MISSING_FIELD),
            self.property.unwrap_or(MISSING_FIELD)
        )
    }
}

impl Requirement {
    #[must_use]
    pub fn new(ifc_entity: &str, property_set: &str, property: &str) -> Self {
        Self {
            ifc_entity: Some(ifc_entity.to_string()),
            property_set: Some(property_set.to_string()),
            property: Some(property.to_string()),
        }
    }

    #[must_use]
    pub fn is_identification(&self) -> bool {
        self.property_set.as_deref() == Some(IDENTIFICATION_PSET)
    }

    /// First absent field, in file-key order.
    #[must_use]
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.ifc_entity.is_none() {
            Some("IFCEntity")
        } else if self.property_set.is_none() {
            Some("PropertySet")
        } else if self.property.is_none() {
            Some("Property")
        } else {
            None
        }
    }

    /// Turn the entry into something the matcher can evaluate. Only a missing
    /// `IFCEntity` is an error, since such an entry selects no element.
    /// `index` is the entry's position in the requirements file and only
    /// feeds the error.
    pub fn validate(&self, index: usize) -> Result<RequiredProperty<'_>, DataError> {
        let entity = self
            .ifc_entity
            .as_deref()
            .ok_or(DataError::MalformedRequirement {
                index,
                field: "IFCEntity",
            })?;

        Ok(RequiredProperty {
            entity_type: entity.to_ascii_uppercase(),
            property_set: self.property_set.as_deref(),
            property: self.property.as_deref(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_from_requirements_file_keys() {
        let json = r#"{"IFCEntity":"IfcDoor","PropertySet":"Pset_DoorCommon","Property":"FireRating"}"#;
        let requirement: Requirement = serde_json::from_str(json).unwrap();
        assert_eq!(
            requirement,
            Requirement::new("IfcDoor", "Pset_DoorCommon", "FireRating")
        );
    }

    #[test]
    fn validate_upper_cases_entity_and_builds_reason() {
        let requirement = Requirement::new("IfcDoor", "Pset_DoorCommon", "FireRating");
        let required = requirement.validate(0).unwrap();
        assert_eq!(required.entity_type, "IFCDOOR");
        assert_eq!(required.reason(), "Pset_DoorCommon.FireRating");
    }

    #[test]
    fn validate_rejects_only_a_missing_entity() {
        let no_entity = Requirement {
            ifc_entity: None,
            property_set: Some("Pset_WallCommon".to_string()),
            property: Some("IsExternal".to_string()),
        };
        assert_eq!(
            no_entity.validate(3),
            Err(DataError::MalformedRequirement {
                index: 3,
                field: "IFCEntity"
            })
        );

        let no_property = Requirement {
            property: None,
            ..Requirement::new("IfcWall", "Pset_WallCommon", "IsExternal")
        };
        let required = no_property.validate(4).unwrap();
        assert_eq!(no_property.missing_field(), Some("Property"));
        assert_eq!(required.property, None);
        assert_eq!(required.reason(), "Pset_WallCommon.<missing>");
    }

    #[test]
    fn non_string_fields_deserialize_as_absent() {
        let json = r#"{"IFCEntity":"IFCWALL","PropertySet":["a"],"Property":5}"#;
        let requirement: Requirement = serde_json::from_str(json).unwrap();
        assert_eq!(requirement.ifc_entity.as_deref(), Some("IFCWALL"));
        assert_eq!(requirement.missing_field(), Some("PropertySet"));
        assert_eq!(requirement.property, None);
    }

    #[test]
    fn identification_is_recognised() {
        assert!(Requirement::new("IFCWALL", "Identification", "Mark").is_identification());
        assert!(!Requirement::new("IFCWALL", "Pset_WallCommon", "Mark").is_identification());
    }
}
