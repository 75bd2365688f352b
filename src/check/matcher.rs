use crate::decode::decode_ifc_string;
use crate::error::DataError;
use crate::index::PropertyIndex;
use crate::model::{CheckResult, ElementRecord, Failure, RecordKind, RequiredProperty, Requirement};

/// The requirements of one pass that will actually be evaluated, in file
/// order, with counts of the ones left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementPlan<'a> {
    pub checked: Vec<RequiredProperty<'a>>,
    /// `PropertySet == "Identification"` entries.
    pub identification: usize,
    /// Entries without an `IFCEntity`; they select no element.
    pub malformed: usize,
    /// Checked entries missing `PropertySet` or `Property`. Every element of
    /// their entity type fails them.
    pub unsatisfiable: usize,
}

impl RequirementPlan<'_> {
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.identification + self.malformed
    }
}

/// Sort requirements into evaluated and skipped ones. Identification entries
/// and entries without an entity type are skipped; the rest are evaluated.
#[must_use]
pub fn plan_requirements(requirements: &[Requirement]) -> RequirementPlan<'_> {
    let mut plan = RequirementPlan::default();

    for (index, requirement) in requirements.iter().enumerate() {
        if requirement.is_identification() {
            plan.identification += 1;
            continue;
        }
        match requirement.validate(index) {
            Ok(required) => {
                if let Some(field) = requirement.missing_field() {
                    let err = DataError::MalformedRequirement { index, field };
                    tracing::debug!(%err, "Requirement can never be satisfied");
                    plan.unsatisfiable += 1;
                }
                plan.checked.push(required);
            }
            Err(err) => {
                tracing::debug!(%err, "Skipping requirement");
                plan.malformed += 1;
            }
        }
    }

    plan
}

/// Evaluate `requirements` against `candidates`.
///
/// A candidate fails a requirement of its entity type unless one of its
/// property definitions is named like the requirement's property set and
/// holds a property or quantity named like the requirement's property.
/// Requirements are visited in order, so each element's reasons follow the
/// requirements file.
#[must_use]
pub fn match_requirements<'a, I>(
    index: &PropertyIndex,
    requirements: &[Requirement],
    candidates: I,
) -> CheckResult
where
    I: IntoIterator<Item = &'a ElementRecord>,
{
    let plan = plan_requirements(requirements);
    match_planned(index, &plan, candidates)
}

/// [`match_requirements`] for an already built plan.
#[must_use]
pub fn match_planned<'a, I>(
    index: &PropertyIndex,
    plan: &RequirementPlan<'_>,
    candidates: I,
) -> CheckResult
where
    I: IntoIterator<Item = &'a ElementRecord>,
{
    let candidates: Vec<&ElementRecord> = candidates.into_iter().collect();

    let failures = plan.checked.iter().flat_map(|required| {
        candidates
            .iter()
            .filter(move |element| element.entity_type == required.entity_type)
            .filter(move |element| !has_required_property(index, element, required))
            .map(move |element| Failure::new(element.id, required.reason()))
    });

    CheckResult::aggregate(failures)
}

/// Whether `element` carries `required` through any of its property sets.
/// Stops at the first hit. A requirement missing its property set or
/// property is never met.
#[must_use]
pub fn has_required_property(
    index: &PropertyIndex,
    element: &ElementRecord,
    required: &RequiredProperty<'_>,
) -> bool {
    let (Some(property_set), Some(property)) = (required.property_set, required.property) else {
        return false;
    };

    index.property_links(element.id).iter().any(|link| {
        match index.resolve(link.relation, link.definition) {
            Ok(definition) => {
                name_matches(definition, property_set)
                    && defines_property(index, definition, property)
            }
            Err(err) => {
                tracing::debug!(%err, element = element.id, "Property set not found");
                false
            }
        }
    })
}

fn defines_property(index: &PropertyIndex, definition: &ElementRecord, property: &str) -> bool {
    let RecordKind::PropertyDefinition {
        has_properties,
        quantities,
    } = &definition.kind
    else {
        return false;
    };

    has_properties
        .iter()
        .chain(quantities)
        .any(|&id| match index.resolve(definition.id, id) {
            Ok(record) => name_matches(record, property),
            Err(err) => {
                tracing::debug!(%err, "Property not found");
                false
            }
        })
}

// A record without a name never matches.
fn name_matches(record: &ElementRecord, expected: &str) -> bool {
    record
        .name
        .as_deref()
        .is_some_and(|raw| decode_ifc_string(raw) == expected)
}
