//! # apidoc-cli — Command-Line Shell for the Tool Surface
//!
//! Provides the `apidoc` binary. Every documentation tool is a subcommand;
//! payloads are JSON files (or `-` for stdin) and results are JSON on
//! stdout. Logs go to stderr.
//!
//! ## Subcommands
//!
//! - `apidoc endpoint`: list, get, create, update, delete, check, by-tag, add-tag,
//!   crud, naming, consistency.
//! - `apidoc schema`: list, get, create, update, delete.
//! - `apidoc folder`: list, create, delete.
//! - `apidoc tag list`
//! - `apidoc audit`: project-wide completeness report.
//! - `apidoc check-config`: credential presence and reachability.
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | success, nothing to report |
//! | 1 | the tool failed, or a check/audit found problems |
//! | 2 | configuration missing or invalid |
//!
//! ```bash
//! APIFOX_TOKEN=... APIFOX_PROJECT_ID=123456 apidoc endpoint create -f user.json
//! apidoc -v audit --tag 用户管理
//! ```

pub mod audit;
pub mod endpoint;
pub mod folder;
pub mod io;
pub mod logging;
pub mod schema;
pub mod setup;
pub mod tag;

/// Success.
pub const EXIT_OK: u8 = 0;
/// The tool failed or reported problems.
pub const EXIT_FAILURE: u8 = 1;
/// Startup configuration is missing or invalid.
pub const EXIT_CONFIG: u8 = 2;
