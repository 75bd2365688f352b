use crate::index::PropertyIndex;
use crate::model::CheckResult;
use serde::Serialize;

/// A failing element as shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementSummary {
    pub id: u64,
    pub entity_type: String,
    pub name: String,
    pub missing: Vec<String>,
}

/// One check pass: the result plus what is needed to present it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Storey the pass was limited to, if any.
    pub storey: Option<String>,
    pub elements_checked: usize,
    pub requirements_checked: usize,
    pub requirements_skipped: usize,
    pub failing_ids: Vec<u64>,
    pub elements: Vec<ElementSummary>,
    #[serde(skip)]
    result: CheckResult,
}

impl CheckReport {
    #[must_use]
    pub fn new(
        index: &PropertyIndex,
        result: CheckResult,
        storey: Option<String>,
        elements_checked: usize,
        requirements_checked: usize,
        requirements_skipped: usize,
    ) -> Self {
        let elements = result
            .iter()
            .map(|(id, missing)| {
                let record = index.by_id(id);
                ElementSummary {
                    id,
                    entity_type: record.map_or_else(String::new, |r| r.entity_type.clone()),
                    name: record.map_or_else(
                        || crate::decode::UNKNOWN_NAME.to_string(),
                        crate::model::ElementRecord::decoded_name,
                    ),
                    missing: missing.to_vec(),
                }
            })
            .collect();

        Self {
            storey,
            elements_checked,
            requirements_checked,
            requirements_skipped,
            failing_ids: result.failing_ids(),
            elements,
            result,
        }
    }

    #[must_use]
    pub fn result(&self) -> &CheckResult {
        &self.result
    }

    #[must_use]
    pub fn reasons_for(&self, id: u64) -> &[String] {
        self.result.reasons_for(id)
    }

    #[must_use]
    pub fn is_compliant(&self) -> bool {
        self.result.is_empty()
    }
}
