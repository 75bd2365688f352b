use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One unmet requirement on one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub element_id: u64,
    /// `"PropertySet.Property"`
    pub reason: String,
}

impl Failure {
    #[must_use]
    pub fn new(element_id: u64, reason: impl Into<String>) -> Self {
        Self {
            element_id,
            reason: reason.into(),
        }
    }
}

/// Outcome of one check pass: which elements fail and why.
///
/// Built fresh for every pass. Reasons keep the order in which they were
/// recorded and are not deduplicated, so a requirement listed twice shows up
/// twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    failing_ids: BTreeSet<u64>,
    reasons: BTreeMap<u64, Vec<String>>,
}

impl CheckResult {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collapse raw failures into a result.
    #[must_use]
    pub fn aggregate<I>(failures: I) -> Self
    where
        I: IntoIterator<Item = Failure>,
    {
        let mut result = Self::new();
        for failure in failures {
            result.record(failure);
        }
        result
    }

    pub fn record(&mut self, failure: Failure) {
        self.failing_ids.insert(failure.element_id);
        self.reasons
            .entry(failure.element_id)
            .or_default()
            .push(failure.reason);
    }

    /// Failing element ids, ascending.
    #[must_use]
    pub fn failing_ids(&self) -> Vec<u64> {
        self.failing_ids.iter().copied().collect()
    }

    #[must_use]
    pub fn is_failing(&self, id: u64) -> bool {
        self.failing_ids.contains(&id)
    }

    /// Unmet `"PropertySet.Property"` entries for `id`; empty if it passed.
    #[must_use]
    pub fn reasons_for(&self, id: u64) -> &[String] {
        self.reasons.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of failing elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failing_ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failing_ids.is_empty()
    }

    /// Total number of recorded reasons across all elements.
    #[must_use]
    pub fn reason_count(&self) -> usize {
        self.reasons.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &[String])> {
        self.reasons.iter().map(|(id, reasons)| (*id, reasons.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn aggregate_deduplicates_ids_and_keeps_reason_order() {
        let result = CheckResult::aggregate([
            Failure::new(12, "Pset_WallCommon.FireRating"),
            Failure::new(10, "Pset_WallCommon.IsExternal"),
            Failure::new(12, "Pset_WallCommon.LoadBearing"),
        ]);

        assert_eq!(result.failing_ids(), vec![10, 12]);
        assert_eq!(
            result.reasons_for(12),
            ["Pset_WallCommon.FireRating", "Pset_WallCommon.LoadBearing"]
        );
        assert_eq!(result.reason_count(), 3);
    }

    #[test]
    fn repeated_reasons_are_kept() {
        let result = CheckResult::aggregate([
            Failure::new(4, "Pset_SlabCommon.IsExternal"),
            Failure::new(4, "Pset_SlabCommon.IsExternal"),
        ]);
        assert_eq!(result.len(), 1);
        assert_eq!(result.reasons_for(4).len(), 2);
    }

    #[test]
    fn unknown_id_has_no_reasons() {
        let result = CheckResult::new();
        assert!(result.is_empty());
        assert!(!result.is_failing(1));
        assert!(result.reasons_for(1).is_empty());
    }
}
