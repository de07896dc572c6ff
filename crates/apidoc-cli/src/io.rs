//! Payload input and JSON output.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use apidoc_tools::ToolError;

use crate::{EXIT_FAILURE, EXIT_OK};

/// Read a JSON payload from `source`, or from stdin when it is `-`.
pub fn read_payload(source: &Path) -> Result<Value> {
    let raw = if source.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read payload from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("failed to read payload {}", source.display()))?
    };
    serde_json::from_str(&raw)
        .with_context(|| format!("payload {} is not valid JSON", source.display()))
}

/// Pretty-print `value` to stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{text}");
    Ok(())
}

/// Print a tool result: the value on success, the JSON error body on
/// failure. Returns the exit code.
pub fn emit<T: Serialize>(result: Result<T, ToolError>) -> Result<u8> {
    match result {
        Ok(value) => {
            print_json(&value)?;
            Ok(EXIT_OK)
        }
        Err(e) => {
            tracing::error!(code = e.code(), "{e}");
            print_json(&e.to_body())?;
            Ok(EXIT_FAILURE)
        }
    }
}
