//! # Endpoint Subcommand
//!
//! - `list`: summaries, filtered by folder, tag and keyword.
//! - `get`: one normalized definition.
//! - `create` / `update`: validated write from a JSON payload.
//! - `delete`: requires `--confirm`.
//! - `check`: violations of the stored endpoint; exits 1 when any.
//! - `by-tag` / `add-tag`
//! - `crud`: generate the REST endpoints of a resource model.
//! - `naming`: route naming report; exits 1 on any violation.
//! - `consistency`: response-shape report; exits 1 when shapes diverge.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use apidoc_client::ListScope;
use apidoc_core::{EndpointId, FolderId};
use apidoc_tools::endpoints::DEFAULT_LIST_LIMIT;
use apidoc_tools::{ApiDocTools, CrudRequest, EndpointFilter, ResponseConsistencyReport};

use crate::io::{emit, print_json, read_payload};
use crate::{EXIT_FAILURE, EXIT_OK};

/// Arguments for `apidoc endpoint`.
#[derive(Args, Debug)]
pub struct EndpointArgs {
    #[command(subcommand)]
    pub command: EndpointCommand,
}

#[derive(Subcommand, Debug)]
pub enum EndpointCommand {
    /// List endpoint summaries.
    List {
        #[arg(long)]
        folder_id: Option<u64>,
        #[arg(long)]
        tag: Option<String>,
        /// Case-insensitive match on title or path.
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: usize,
    },

    /// Show one endpoint.
    Get { id: u64 },

    /// Create an endpoint from a JSON payload.
    Create {
        /// Payload file, `-` for stdin.
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Replace an endpoint with a JSON payload.
    Update {
        id: u64,
        /// Payload file, `-` for stdin.
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Delete an endpoint.
    Delete {
        id: u64,
        /// Actually delete. Without it nothing is sent.
        #[arg(long)]
        confirm: bool,
    },

    /// Report documentation violations of a stored endpoint.
    Check { id: u64 },

    /// List endpoints carrying a tag.
    ByTag { tag: String },

    /// Add tags to an endpoint.
    AddTag {
        id: u64,
        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// Generate list/get/create/update/delete endpoints for a resource.
    Crud {
        /// Request file, `-` for stdin.
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Check route segments against a naming style.
    Naming {
        /// `kebab-case`, `snake_case` or `camelCase`.
        #[arg(long, default_value = "kebab-case")]
        style: String,
    },

    /// Compare response shapes across endpoints.
    Consistency {
        #[arg(long)]
        folder_id: Option<u64>,
        #[arg(long)]
        tag: Option<String>,
    },
}

/// Execute the endpoint subcommand.
pub async fn run_endpoint(args: &EndpointArgs, tools: &ApiDocTools) -> Result<u8> {
    match &args.command {
        EndpointCommand::List {
            folder_id,
            tag,
            keyword,
            limit,
        } => {
            let filter = EndpointFilter {
                folder_id: folder_id.map(FolderId),
                tag: tag.clone(),
                keyword: keyword.clone(),
                limit: Some(*limit),
            };
            emit(tools.list_api_endpoints(&filter).await)
        }
        EndpointCommand::Get { id } => emit(tools.get_api_endpoint_detail(EndpointId(*id)).await),
        EndpointCommand::Create { file } => {
            let payload = read_payload(file)?;
            emit(tools.create_api_endpoint(&payload).await)
        }
        EndpointCommand::Update { id, file } => {
            let payload = read_payload(file)?;
            emit(tools.update_api_endpoint(EndpointId(*id), &payload).await)
        }
        EndpointCommand::Delete { id, confirm } => {
            emit(tools.delete_api_endpoint(EndpointId(*id), *confirm).await)
        }
        EndpointCommand::Check { id } => match tools.check_api_responses(EndpointId(*id)).await {
            Ok(violations) => {
                print_json(&violations)?;
                Ok(if violations.is_empty() { EXIT_OK } else { EXIT_FAILURE })
            }
            Err(e) => emit::<()>(Err(e)),
        },
        EndpointCommand::ByTag { tag } => emit(tools.get_apis_by_tag(tag).await),
        EndpointCommand::AddTag { id, tags } => {
            emit(tools.add_tag_to_api(EndpointId(*id), tags).await)
        }
        EndpointCommand::Crud { file } => {
            let req: CrudRequest = serde_json::from_value(read_payload(file)?)
                .with_context(|| format!("{} is not a CRUD request", file.display()))?;
            match tools.generate_crud_apis(&req).await {
                Ok(outcome) => {
                    print_json(&outcome)?;
                    Ok(if outcome.failed.is_empty() { EXIT_OK } else { EXIT_FAILURE })
                }
                Err(e) => emit::<()>(Err(e)),
            }
        }
        EndpointCommand::Naming { style } => {
            match tools.check_path_naming_convention(style).await {
                Ok(report) => {
                    print_json(&report)?;
                    Ok(if report.is_compliant() { EXIT_OK } else { EXIT_FAILURE })
                }
                Err(e) => emit::<()>(Err(e)),
            }
        }
        EndpointCommand::Consistency { folder_id, tag } => {
            let scope = ListScope {
                folder_id: folder_id.map(FolderId),
                tag: tag.clone(),
            };
            match tools.check_response_consistency(&scope).await {
                Ok(report) => {
                    print_json(&report)?;
                    Ok(consistency_exit_code(&report))
                }
                Err(e) => emit::<()>(Err(e)),
            }
        }
    }
}

fn consistency_exit_code(report: &ResponseConsistencyReport) -> u8 {
    let c = &report.consistency;
    if c.success_uniform && c.errors_uniform && c.pagination_uniform && report.failures.is_empty() {
        EXIT_OK
    } else {
        EXIT_FAILURE
    }
}
