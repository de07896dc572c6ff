//! # Auditor
//!
//! Sequential pagination, bounded-concurrency detail fetch within a page,
//! order restoration before merge.

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio::time::{timeout, timeout_at, Instant};

use apidoc_client::ListScope;
use apidoc_core::{EndpointDefinition, EndpointSummary};
use apidoc_rules::RuleEngine;

use crate::config::AuditConfig;
use crate::report::{AuditEntry, AuditFailure, AuditReport, FailureKind, ReportBuilder};
use crate::source::{EndpointSource, Pages};

/// Outcome of one detail fetch, keyed back to its listing position.
type FetchOutcome = Result<EndpointDefinition, (FailureKind, String)>;

/// Project-wide completeness auditor.
pub struct Auditor<S> {
    source: Arc<S>,
    engine: RuleEngine,
    config: AuditConfig,
}

impl<S> std::fmt::Debug for Auditor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auditor")
            .field("engine", &self.engine)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: EndpointSource + 'static> Auditor<S> {
    pub fn new(source: Arc<S>, engine: RuleEngine, config: AuditConfig) -> Self {
        Self {
            source,
            engine,
            config,
        }
    }

    /// Audit every endpoint under `scope`. Never fails: remote errors are
    /// recorded in the report.
    pub async fn audit(&self, scope: &ListScope) -> AuditReport {
        // A deadline past the clock's range is the same as no deadline.
        let deadline = self.config.deadline.and_then(|d| {
            let at = Instant::now().checked_add(d);
            if at.is_none() {
                tracing::warn!(deadline_secs = d.as_secs(), "audit deadline out of range, ignoring it");
            }
            at
        });
        let mut report = ReportBuilder::default();
        let mut pages = Pages::new(self.source.as_ref(), scope.clone(), self.config.page_size);

        tracing::info!(
            folder_id = scope.folder_id.map(|f| f.as_u64()),
            tag = scope.tag.as_deref(),
            page_size = self.config.page_size,
            concurrency = self.config.concurrency,
            "audit started"
        );

        loop {
            let next = match deadline {
                Some(at) => match timeout_at(at, pages.next_page()).await {
                    Ok(next) => next,
                    Err(_) => {
                        tracing::warn!(page = pages.fetched() + 1, "audit deadline expired while listing");
                        report.truncate();
                        break;
                    }
                },
                None => pages.next_page().await,
            };

            let page = match next {
                None => break,
                Some(Ok(page)) => page,
                Some(Err(e)) => {
                    tracing::warn!(page = pages.fetched() + 1, error = %e, "listing page failed, ending scan");
                    report.listing_failed(e.to_string());
                    break;
                }
            };

            report.listed(page.items.len());
            tracing::debug!(page = pages.fetched(), items = page.items.len(), "processing page");

            let expired = self.process_page(&page.items, deadline, &mut report).await;
            if expired {
                report.truncate();
                break;
            }
        }

        let report = report.finish();
        tracing::info!(
            total_listed = report.summary.total_listed,
            compliant = report.summary.compliant,
            non_compliant = report.summary.non_compliant,
            fetch_failures = report.summary.fetch_failures,
            truncated = report.summary.truncated,
            "audit finished"
        );
        report
    }

    /// Fetch, evaluate and record every item of one page, in listing order.
    /// Returns true if the deadline expired.
    async fn process_page(
        &self,
        items: &[EndpointSummary],
        deadline: Option<Instant>,
        report: &mut ReportBuilder,
    ) -> bool {
        let (outcomes, expired) = self.fetch_all(items, deadline).await;

        for (summary, outcome) in items.iter().zip(outcomes) {
            let endpoint = summary.reference();
            match outcome {
                Some(Ok(def)) => {
                    let violations = self.engine.validate_endpoint(&def);
                    report.entry(AuditEntry {
                        endpoint,
                        violations,
                    });
                }
                Some(Err((kind, error))) => {
                    tracing::warn!(endpoint_id = summary.id.as_u64(), ?kind, %error, "endpoint not evaluated");
                    report.failure(AuditFailure {
                        endpoint,
                        kind,
                        error,
                    });
                }
                None => {
                    let (kind, error) = if expired {
                        (FailureKind::DeadlineExceeded, "audit deadline exceeded".to_string())
                    } else {
                        (FailureKind::Aborted, "fetch task ended without a result".to_string())
                    };
                    tracing::warn!(endpoint_id = summary.id.as_u64(), ?kind, "endpoint not evaluated");
                    report.failure(AuditFailure {
                        endpoint,
                        kind,
                        error,
                    });
                }
            }
        }
        expired
    }

    /// Fetch details with at most `concurrency` requests in flight.
    ///
    /// Results come back in completion order and are slotted by listing
    /// index. Slots still empty on return were never completed.
    async fn fetch_all(
        &self,
        items: &[EndpointSummary],
        deadline: Option<Instant>,
    ) -> (Vec<Option<FetchOutcome>>, bool) {
        let mut outcomes: Vec<Option<FetchOutcome>> = items.iter().map(|_| None).collect();
        let mut queue = items.iter().enumerate();
        let mut in_flight = JoinSet::new();
        let concurrency = self.config.concurrency.max(1);
        let fetch_timeout = self.config.fetch_timeout;
        let mut expired = false;

        loop {
            while in_flight.len() < concurrency {
                let Some((index, summary)) = queue.next() else {
                    break;
                };
                let source = Arc::clone(&self.source);
                let id = summary.id;
                in_flight.spawn(async move {
                    let outcome = match timeout(fetch_timeout, source.fetch_endpoint(id)).await {
                        Ok(Ok(def)) => Ok(def),
                        Ok(Err(e)) => Err((FailureKind::Fetch, e.to_string())),
                        Err(_) => Err((
                            FailureKind::Timeout,
                            format!("timed out after {}ms", fetch_timeout.as_millis()),
                        )),
                    };
                    (index, outcome)
                });
            }

            let joined = match deadline {
                Some(at) => match timeout_at(at, in_flight.join_next()).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        expired = true;
                        break;
                    }
                },
                None => in_flight.join_next().await,
            };

            match joined {
                None => break,
                Some(Ok((index, outcome))) => outcomes[index] = Some(outcome),
                // The slot stays empty and is reported as aborted.
                Some(Err(join_err)) => tracing::error!(error = %join_err, "detail fetch task failed"),
            }
        }

        in_flight.abort_all();
        (outcomes, expired)
    }
}
