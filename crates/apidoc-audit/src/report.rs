//! # Audit Report
//!
//! Built incrementally by the auditor and immutable once returned. The
//! report is a census: every listed endpoint appears exactly once, either
//! as an [`AuditEntry`] (evaluated, possibly with zero violations) or as
//! an [`AuditFailure`].

use serde::{Deserialize, Serialize};

use apidoc_core::EndpointRef;
use apidoc_rules::ValidationViolation;

/// One evaluated endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub endpoint: EndpointRef,
    /// Empty when the endpoint is compliant.
    pub violations: Vec<ValidationViolation>,
}

impl AuditEntry {
    pub fn is_compliant(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Why a listed endpoint could not be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The service answered with an error, or the detail was malformed.
    Fetch,
    /// The per-call timeout elapsed.
    Timeout,
    /// The overall audit deadline expired before the fetch completed.
    DeadlineExceeded,
    /// The fetch task ended without producing a result.
    Aborted,
}

/// One listed endpoint that could not be fetched or evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFailure {
    pub endpoint: EndpointRef,
    pub kind: FailureKind,
    pub error: String,
}

/// Headline numbers for a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub total_listed: usize,
    pub compliant: usize,
    pub non_compliant: usize,
    pub fetch_failures: usize,
    pub total_violations: usize,
    pub pages: u32,
    pub truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_error: Option<String>,
}

/// Project-wide audit result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub summary: AuditSummary,
    /// Evaluated endpoints in listing order.
    pub entries: Vec<AuditEntry>,
    /// Endpoints that could not be evaluated, in listing order.
    pub failures: Vec<AuditFailure>,
}

impl AuditReport {
    pub fn total_listed(&self) -> usize {
        self.summary.total_listed
    }

    pub fn fetch_failure_count(&self) -> usize {
        self.failures.len()
    }

    /// True when the scan stopped early (deadline or listing error).
    pub fn is_truncated(&self) -> bool {
        self.summary.truncated
    }

    pub fn non_compliant(&self) -> impl Iterator<Item = &AuditEntry> {
        self.entries.iter().filter(|e| !e.is_compliant())
    }
}

/// Mutable accumulator the auditor fills page by page.
#[derive(Debug, Default)]
pub(crate) struct ReportBuilder {
    entries: Vec<AuditEntry>,
    failures: Vec<AuditFailure>,
    total_listed: usize,
    pages: u32,
    truncated: bool,
    listing_error: Option<String>,
}

impl ReportBuilder {
    pub(crate) fn listed(&mut self, count: usize) {
        self.total_listed += count;
        self.pages += 1;
    }

    pub(crate) fn entry(&mut self, entry: AuditEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn failure(&mut self, failure: AuditFailure) {
        self.failures.push(failure);
    }

    pub(crate) fn truncate(&mut self) {
        self.truncated = true;
    }

    pub(crate) fn listing_failed(&mut self, error: String) {
        self.truncated = true;
        self.listing_error = Some(error);
    }

    pub(crate) fn finish(self) -> AuditReport {
        let compliant = self.entries.iter().filter(|e| e.is_compliant()).count();
        let total_violations = self.entries.iter().map(|e| e.violations.len()).sum();
        AuditReport {
            summary: AuditSummary {
                total_listed: self.total_listed,
                compliant,
                non_compliant: self.entries.len() - compliant,
                fetch_failures: self.failures.len(),
                total_violations,
                pages: self.pages,
                truncated: self.truncated,
                listing_error: self.listing_error,
            },
            entries: self.entries,
            failures: self.failures,
        }
    }
}
