//! # IFC Checker
//!
//! Checks the elements of an IFC model against a list of required properties
//! and reports the elements that miss them.
//!
//! ## Features
//!
//! - Load a serialized IFC property graph (JSON keyed by express id)
//! - Load requirements as `{IFCEntity, PropertySet, Property}` entries
//! - Decode `\X2\...\X0\` escapes in IFC names
//! - Limit a check to one building storey, including aggregated parts
//! - Browse failing elements in the terminal, export to CSV and JSON
//!
//! ## Example
//!
//! ```no_run
//! use ifc_checker::check::{CheckOptions, Session};
//!
//! let mut session = Session::new();
//! session.load_graph("properties.json").expect("Failed to load model");
//! session.load_requirements("requirements.json").expect("Failed to load requirements");
//!
//! let report = session.run(&CheckOptions::default()).expect("Check failed");
//! for id in &report.failing_ids {
//!     println!("#{id}: {:?}", report.reasons_for(*id));
//! }
//! ```

pub mod check;
pub mod decode;
pub mod error;
pub mod export;
pub mod index;
pub mod model;
pub mod parser;
pub mod scope;
pub mod ui;
