//! Domain logic: value formatting, payload extraction, link enrichment and the
//! threshold gate.
//!
//! This crate is designed to be I/O-free and highly testable.

pub mod extract;
pub mod format;
pub mod gate;
pub mod links;
pub mod sort;

pub use extract::{ExtractError, field_data, lab_data, opportunities, overview};
pub use format::{format_duration, format_percentage, humanize_url, score_percent};
pub use gate::{GateStatus, ThresholdGate, ThresholdNotMet};
pub use links::{LinkStyle, enrich_title, extract_link};
pub use sort::sort_by_label;
