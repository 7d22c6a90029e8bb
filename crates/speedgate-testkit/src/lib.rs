//! Shared test utilities for the speedgate workspace.
//!
//! This crate provides:
//! - **arb**: Proptest strategies for generating records, scores and payloads
//! - **fixtures**: Sample audit payloads shaped like real PSI responses
//! - **schema**: JSON schema validators for the `json` report
//!
//! # Example
//!
//! ```rust,ignore
//! use speedgate_testkit::arb;
//! use proptest::prelude::*;
//!
//! proptest! {
//!     fn test_sorted(records in arb::arb_record_list()) {
//!         // Use the generated records
//!     }
//! }
//! ```

pub mod arb;
pub mod fixtures;
pub mod schema;

// Re-export commonly used items
pub use arb::{arb_label, arb_payload, arb_record_list, arb_score, arb_strategy, arb_threshold};
pub use fixtures::sample_payloads;
pub use schema::{validate_config_file, validate_json_report};
