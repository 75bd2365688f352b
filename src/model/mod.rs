pub mod record;
pub mod requirement;
pub mod result;

pub use record::{AttributeValue, ElementRecord, RecordKind, RelationKind};
pub use requirement::{RequiredProperty, Requirement, IDENTIFICATION_PSET, MISSING_FIELD};
pub use result::{CheckResult, Failure};
