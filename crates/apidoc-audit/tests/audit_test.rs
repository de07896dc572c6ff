//! Auditor behaviour against in-memory endpoint sources.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use apidoc_audit::{AuditConfig, Auditor, EndpointSource, FailureKind, Pages};
use apidoc_client::{ApifoxApiError, ListScope, Page, PageCursor};
use apidoc_core::{
    normalize_endpoint, EndpointDefinition, EndpointId, EndpointSummary, HttpMethod,
};
use apidoc_rules::{with_standard_errors, RuleCode, RuleEngine};
use serde_json::json;

/// How the fake answers a detail fetch.
#[derive(Clone, Copy, Debug)]
enum Detail {
    Compliant,
    MissingFieldDescription,
    Fail,
    Hang,
    Delay(u64),
}

struct FakeSource {
    pages: Vec<Vec<EndpointSummary>>,
    details: HashMap<u64, Detail>,
    failing_page: Option<usize>,
    list_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl FakeSource {
    fn new(total: u64, page_size: usize) -> Self {
        let summaries: Vec<EndpointSummary> = (1..=total).map(summary).collect();
        Self {
            pages: summaries.chunks(page_size).map(|c| c.to_vec()).collect(),
            details: HashMap::new(),
            failing_page: None,
            list_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    fn with(mut self, id: u64, detail: Detail) -> Self {
        self.details.insert(id, detail);
        self
    }
}

fn summary(id: u64) -> EndpointSummary {
    EndpointSummary {
        id: EndpointId(id),
        title: format!("获取资源{id}"),
        method: HttpMethod::Get,
        path: format!("/resources/{id}"),
        tags: Vec::new(),
        folder_id: Default::default(),
        status: None,
    }
}

fn definition(id: u64, described: bool) -> EndpointDefinition {
    let mut field = json!({"type": "integer", "example": id});
    if described {
        field["description"] = json!("资源唯一标识");
    }
    let def = normalize_endpoint(&json!({
        "id": id,
        "title": format!("获取资源{id}"),
        "description": "根据资源ID获取资源详情",
        "method": "GET",
        "path": format!("/resources/{id}"),
        "responses": {"200": {"type": "object", "properties": {"id": field}}}
    }))
    .unwrap();
    with_standard_errors(def)
}

impl EndpointSource for FakeSource {
    fn list_page(
        &self,
        _scope: &ListScope,
        cursor: Option<&PageCursor>,
        _limit: u32,
    ) -> impl Future<Output = Result<Page<EndpointSummary>, ApifoxApiError>> + Send {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let index: usize = cursor.map(|c| c.as_str().parse().unwrap()).unwrap_or(0);
        let result = if self.failing_page == Some(index) {
            Err(ApifoxApiError::ApiError {
                endpoint: "GET /api-endpoints".into(),
                status: 500,
                body: "服务器内部错误".into(),
            })
        } else {
            let items = self.pages.get(index).cloned().unwrap_or_default();
            let next_cursor =
                (index + 1 < self.pages.len()).then(|| PageCursor((index + 1).to_string()));
            Ok(Page { items, next_cursor })
        };
        async move { result }
    }

    fn fetch_endpoint(
        &self,
        id: EndpointId,
    ) -> impl Future<Output = Result<EndpointDefinition, ApifoxApiError>> + Send {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let detail = self
            .details
            .get(&id.as_u64())
            .copied()
            .unwrap_or(Detail::Compliant);
        let id = id.as_u64();
        async move {
            match detail {
                Detail::Compliant => Ok(definition(id, true)),
                Detail::MissingFieldDescription => Ok(definition(id, false)),
                Detail::Fail => Err(ApifoxApiError::ApiError {
                    endpoint: format!("GET /api-endpoints/{id}"),
                    status: 404,
                    body: "接口不存在".into(),
                }),
                Detail::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(definition(id, true))
                }
                Detail::Delay(ms) => {
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                    Ok(definition(id, true))
                }
            }
        }
    }
}

fn config(page_size: u32) -> AuditConfig {
    AuditConfig {
        page_size,
        concurrency: 8,
        fetch_timeout: Duration::from_millis(200),
        deadline: None,
    }
}

fn listed_ids(report: &apidoc_audit::AuditReport) -> Vec<u64> {
    report
        .entries
        .iter()
        .filter_map(|e| e.endpoint.id.map(|id| id.as_u64()))
        .collect()
}

#[tokio::test]
async fn one_timeout_among_250_endpoints() {
    let source = Arc::new(FakeSource::new(250, 100).with(150, Detail::Hang));
    let auditor = Auditor::new(source.clone(), RuleEngine::default(), config(100));

    let report = auditor.audit(&ListScope::all()).await;

    assert_eq!(report.total_listed(), 250);
    assert_eq!(report.entries.len(), 249);
    assert_eq!(report.fetch_failure_count(), 1);
    assert_eq!(report.failures[0].endpoint.id, Some(EndpointId(150)));
    assert_eq!(report.failures[0].kind, FailureKind::Timeout);
    assert!(!report.is_truncated());
    assert_eq!(report.summary.pages, 3);
    assert_eq!(source.list_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn report_is_a_census_including_compliant_entries() {
    let source = Arc::new(
        FakeSource::new(12, 5)
            .with(2, Detail::MissingFieldDescription)
            .with(7, Detail::Fail)
            .with(11, Detail::MissingFieldDescription),
    );
    let auditor = Auditor::new(source, RuleEngine::default(), config(5));

    let report = auditor.audit(&ListScope::all()).await;

    assert_eq!(report.entries.len() + report.fetch_failure_count(), 12);
    assert_eq!(report.summary.compliant, 9);
    assert_eq!(report.summary.non_compliant, 2);
    assert_eq!(report.failures[0].kind, FailureKind::Fetch);
    assert!(report.failures[0].error.contains("404"));

    let flagged: Vec<u64> = report
        .non_compliant()
        .filter_map(|e| e.endpoint.id.map(|id| id.as_u64()))
        .collect();
    assert_eq!(flagged, vec![2, 11]);
    for entry in report.non_compliant() {
        assert_eq!(entry.violations.len(), 1);
        assert_eq!(entry.violations[0].rule, RuleCode::FieldDescriptionRequired);
    }
}

#[tokio::test]
async fn entries_keep_listing_order_under_scrambled_completion() {
    let mut source = FakeSource::new(30, 10);
    for id in 1..=30u64 {
        // Later items finish first.
        source = source.with(id, Detail::Delay((31 - id) * 3 % 40));
    }
    let auditor = Auditor::new(Arc::new(source), RuleEngine::default(), config(10));

    let report = auditor.audit(&ListScope::all()).await;
    assert_eq!(listed_ids(&report), (1..=30).collect::<Vec<_>>());
}

#[tokio::test]
async fn listing_failure_returns_partial_truncated_report() {
    let mut source = FakeSource::new(25, 10);
    source.failing_page = Some(1);
    let auditor = Auditor::new(Arc::new(source), RuleEngine::default(), config(10));

    let report = auditor.audit(&ListScope::all()).await;
    assert!(report.is_truncated());
    assert_eq!(report.total_listed(), 10);
    assert_eq!(report.entries.len(), 10);
    assert!(report.summary.listing_error.as_deref().unwrap().contains("500"));
}

#[tokio::test]
async fn deadline_truncates_but_keeps_the_census() {
    let mut source = FakeSource::new(20, 10);
    for id in 1..=20u64 {
        source = source.with(id, Detail::Delay(if id <= 3 { 1 } else { 5_000 }));
    }
    let cfg = AuditConfig {
        fetch_timeout: Duration::from_secs(60),
        deadline: Some(Duration::from_millis(300)),
        concurrency: 2,
        ..config(10)
    };
    let auditor = Auditor::new(Arc::new(source), RuleEngine::default(), cfg);

    let report = auditor.audit(&ListScope::all()).await;
    assert!(report.is_truncated());
    assert_eq!(report.total_listed(), 10, "second page is never listed");
    assert_eq!(report.entries.len() + report.fetch_failure_count(), 10);
    assert!(report
        .failures
        .iter()
        .all(|f| f.kind == FailureKind::DeadlineExceeded));
    assert!(!report.failures.is_empty());
}

#[tokio::test]
async fn out_of_range_deadline_means_no_deadline() {
    let env = HashMap::from([("APIFOX_AUDIT_DEADLINE_SECS", "18446744073709551615")]);
    let parsed = AuditConfig::from_lookup(|var| env.get(var).map(|v| v.to_string())).unwrap();
    assert_eq!(parsed.deadline, Some(Duration::from_secs(u64::MAX)));

    let cfg = AuditConfig {
        deadline: parsed.deadline,
        ..config(10)
    };
    let auditor = Auditor::new(Arc::new(FakeSource::new(5, 10)), RuleEngine::default(), cfg);

    let report = auditor.audit(&ListScope::all()).await;
    assert!(!report.is_truncated());
    assert_eq!(report.total_listed(), 5);
    assert_eq!(report.entries.len(), 5);
    assert_eq!(report.fetch_failure_count(), 0);
}

#[tokio::test]
async fn pages_are_lazy_and_not_restartable() {
    let source = FakeSource::new(5, 2);
    let mut pages = Pages::new(&source, ListScope::all(), 2);

    assert_eq!(source.list_calls.load(Ordering::SeqCst), 0);
    let mut seen = Vec::new();
    while let Some(page) = pages.next_page().await {
        seen.extend(page.unwrap().items.into_iter().map(|s| s.id.as_u64()));
    }
    assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    assert_eq!(pages.fetched(), 3);
    assert!(pages.next_page().await.is_none());
    assert_eq!(source.list_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn empty_project_yields_empty_report() {
    let source = Arc::new(FakeSource::new(0, 10));
    let auditor = Auditor::new(source.clone(), RuleEngine::default(), config(10));
    let report = auditor.audit(&ListScope::all()).await;
    assert_eq!(report.total_listed(), 0);
    assert!(report.entries.is_empty());
    assert_eq!(source.fetch_calls.load(Ordering::SeqCst), 0);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_detail() -> impl Strategy<Value = Detail> {
        prop_oneof![
            4 => Just(Detail::Compliant),
            2 => Just(Detail::MissingFieldDescription),
            2 => Just(Detail::Fail),
            1 => (0u64..5).prop_map(Detail::Delay),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// entries + failures == listed, in listing order, for any page
        /// layout and any mix of fetch outcomes.
        #[test]
        fn census_and_order_hold(
            details in prop::collection::vec(arb_detail(), 0..40),
            page_size in 1usize..12,
            concurrency in 1usize..6,
        ) {
            let total = details.len() as u64;
            let mut source = FakeSource::new(total, page_size);
            for (i, d) in details.iter().enumerate() {
                source = source.with(i as u64 + 1, *d);
            }
            let cfg = AuditConfig { concurrency, ..config(page_size as u32) };
            let auditor = Auditor::new(Arc::new(source), RuleEngine::default(), cfg);

            let runtime = tokio::runtime::Runtime::new().unwrap();
            let report = runtime.block_on(auditor.audit(&ListScope::all()));

            prop_assert_eq!(report.entries.len() + report.fetch_failure_count(), details.len());
            prop_assert_eq!(report.total_listed(), details.len());

            let failed: HashSet<u64> = report
                .failures
                .iter()
                .filter_map(|f| f.endpoint.id.map(|id| id.as_u64()))
                .collect();
            let expected: Vec<u64> = (1..=total).filter(|id| !failed.contains(id)).collect();
            prop_assert_eq!(listed_ids(&report), expected);

            let failed_order: Vec<u64> = report
                .failures
                .iter()
                .filter_map(|f| f.endpoint.id.map(|id| id.as_u64()))
                .collect();
            let mut sorted = failed_order.clone();
            sorted.sort_unstable();
            prop_assert_eq!(failed_order, sorted);
        }
    }
}
