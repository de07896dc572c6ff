//! # apidoc-audit — Completeness Auditor
//!
//! Scans every endpoint reachable under a scope, evaluates each one with
//! the rule engine, and aggregates the results into an [`AuditReport`].
//!
//! ## Guarantees
//!
//! - **Census.** `entries.len() + failures.len() == total_listed` on every
//!   run. A listed endpoint is either evaluated or recorded as a failure,
//!   never dropped.
//!
//! - **Listing order.** Entries (and failures) appear in the order the
//!   service listed them, even though detail fetches within a page run
//!   concurrently.
//!
//! - **Partial-failure tolerance.** A failed, timed-out or panicked detail
//!   fetch becomes one [`AuditFailure`]; a failed listing page ends the scan
//!   with a truncated report. The auditor itself never returns an error.
//!
//! - **Read-only.** The auditor only lists and fetches; it never calls a
//!   mutation route.
//!
//! ## Pagination
//!
//! Pages are pulled sequentially through [`Pages`]: the next page is
//! requested only after the current page's items have been processed,
//! because the service's cursor is not safe to advance concurrently.

pub mod auditor;
pub mod config;
pub mod report;
pub mod source;

pub use auditor::Auditor;
pub use config::{AuditConfig, AuditConfigError};
pub use report::{AuditEntry, AuditFailure, AuditReport, AuditSummary, FailureKind};
pub use source::{EndpointSource, Pages};
