pub mod matcher;
pub mod report;
pub mod session;

pub use crate::error::CheckError;
pub use matcher::{has_required_property, match_requirements, plan_requirements, RequirementPlan};
pub use report::{CheckReport, ElementSummary};
pub use session::{check, CheckOptions, Session};
