//! # Audit Subcommand
//!
//! Scans every endpoint in scope and prints the report. Exits 1 when any
//! endpoint is non-compliant, could not be evaluated, or the scan was
//! truncated.

use anyhow::Result;
use clap::Args;

use apidoc_audit::AuditReport;
use apidoc_client::ListScope;
use apidoc_core::FolderId;
use apidoc_tools::ApiDocTools;

use crate::io::print_json;
use crate::{EXIT_FAILURE, EXIT_OK};

/// Arguments for `apidoc audit`.
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Restrict the scan to one folder.
    #[arg(long)]
    pub folder_id: Option<u64>,
    /// Restrict the scan to one tag.
    #[arg(long)]
    pub tag: Option<String>,
}

/// Execute the audit subcommand.
pub async fn run_audit(args: &AuditArgs, tools: &ApiDocTools) -> Result<u8> {
    let scope = ListScope {
        folder_id: args.folder_id.map(FolderId),
        tag: args.tag.clone(),
    };
    let report = tools.audit_all_api_responses(&scope).await;
    print_json(&report)?;
    Ok(exit_code(&report))
}

fn exit_code(report: &AuditReport) -> u8 {
    let clean = report.summary.non_compliant == 0
        && report.fetch_failure_count() == 0
        && !report.is_truncated();
    if clean {
        EXIT_OK
    } else {
        EXIT_FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apidoc_audit::AuditSummary;

    fn report(non_compliant: usize, truncated: bool) -> AuditReport {
        AuditReport {
            summary: AuditSummary {
                total_listed: 3,
                compliant: 3 - non_compliant,
                non_compliant,
                fetch_failures: 0,
                total_violations: non_compliant,
                pages: 1,
                truncated,
                listing_error: None,
            },
            entries: Vec::new(),
            failures: Vec::new(),
        }
    }

    #[test]
    fn clean_report_exits_zero() {
        assert_eq!(exit_code(&report(0, false)), EXIT_OK);
    }

    #[test]
    fn findings_or_truncation_exit_one() {
        assert_eq!(exit_code(&report(1, false)), EXIT_FAILURE);
        assert_eq!(exit_code(&report(0, true)), EXIT_FAILURE);
    }
}
