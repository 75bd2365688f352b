use super::matcher::{match_planned, plan_requirements};
use super::report::CheckReport;
use crate::error::{CheckError, InputError, LoadError, ScopeError};
use crate::index::PropertyIndex;
use crate::model::{ElementRecord, Requirement};
use crate::parser::{load_property_graph, load_requirements, PropertyGraph};
use crate::scope::{resolve_storey_scope, storey_names, AmbiguityPolicy};
use std::path::Path;
use std::time::Instant;

/// Settings for one check pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckOptions {
    /// Only check elements of the storey with this decoded name.
    pub storey: Option<String>,
    pub ambiguity: AmbiguityPolicy,
}

impl CheckOptions {
    #[must_use]
    pub fn for_storey(storey: impl Into<String>) -> Self {
        Self {
            storey: Some(storey.into()),
            ..Self::default()
        }
    }
}

/// Run one pass over an indexed model.
pub fn check(
    index: &PropertyIndex,
    requirements: &[Requirement],
    options: &CheckOptions,
) -> Result<CheckReport, ScopeError> {
    let started = Instant::now();

    let scope = options
        .storey
        .as_deref()
        .map(|name| resolve_storey_scope(index, name, options.ambiguity))
        .transpose()?;

    let candidates: Vec<&ElementRecord> = index
        .records()
        .iter()
        .filter(|record| match &scope {
            Some(ids) => ids.contains(&record.id),
            None => true,
        })
        .collect();

    let plan = plan_requirements(requirements);
    let result = match_planned(index, &plan, candidates.iter().copied());

    tracing::info!(
        candidates = candidates.len(),
        requirements = plan.checked.len(),
        skipped = plan.skipped(),
        unsatisfiable = plan.unsatisfiable,
        failing = result.len(),
        elapsed_ms = started.elapsed().as_millis(),
        "Check complete"
    );

    Ok(CheckReport::new(
        index,
        result,
        options.storey.clone(),
        candidates.len(),
        plan.checked.len(),
        plan.skipped(),
    ))
}

/// The loaded inputs of the checker. Loading replaces earlier inputs; each
/// [`Session::run`] builds a new report from scratch.
#[derive(Debug, Default)]
pub struct Session {
    index: Option<PropertyIndex>,
    requirements: Option<Vec<Requirement>>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_graph(&mut self, graph: PropertyGraph) {
        self.index = Some(PropertyIndex::from_graph(graph));
    }

    pub fn set_requirements(&mut self, requirements: Vec<Requirement>) {
        self.requirements = Some(requirements);
    }

    pub fn load_graph<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LoadError> {
        let graph = load_property_graph(path)?;
        self.set_graph(graph);
        Ok(())
    }

    pub fn load_requirements<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LoadError> {
        let requirements = load_requirements(path)?;
        self.set_requirements(requirements);
        Ok(())
    }

    #[must_use]
    pub fn index(&self) -> Option<&PropertyIndex> {
        self.index.as_ref()
    }

    pub fn storey_names(&self) -> Result<Vec<String>, InputError> {
        self.index
            .as_ref()
            .map(storey_names)
            .ok_or(InputError::NoModelLoaded)
    }

    /// Check the loaded model against the loaded requirements.
    pub fn run(&self, options: &CheckOptions) -> Result<CheckReport, CheckError> {
        let index = self.index.as_ref().ok_or(InputError::NoModelLoaded)?;
        let requirements = self
            .requirements
            .as_deref()
            .ok_or(InputError::NoRequirementsLoaded)?;

        Ok(check(index, requirements, options)?)
    }
}
