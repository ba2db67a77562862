//! Result types for the linking pipeline.
//!
//! The report lists every page that was linked or skipped, so callers can
//! treat "fewer links than requested" as a soft degradation and log it.

use serde::{Deserialize, Serialize};

use crate::session::LinkStats;

/// A link that was inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedLink {
    pub page_title: String,
    pub target_url: String,
    pub anchor: String,
    /// Index of the paragraph block the anchor was chosen from, if any.
    pub paragraph_index: Option<usize>,
    pub quality_score: Option<f64>,
    pub power_pattern_matches: Vec<String>,
}

/// A page that did not receive a link, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedLink {
    pub page_title: String,
    /// Absent when the target URL itself could not be built.
    pub target_url: Option<String>,
    /// The anchor that was tried last, if one was found.
    pub anchor: Option<String>,
    pub reason: String,
}

/// Diagnostics for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkReport {
    pub accepted: Vec<AcceptedLink>,
    pub rejected: Vec<RejectedLink>,
    pub stats: LinkStats,
}

/// HTML with links inserted, plus the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkingResult {
    pub html: String,
    pub report: LinkReport,
}
