//! Test utilities for apicalls integration tests

// Internal imports (std, crate)
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

// External imports (alphabetized)
use anyhow::Context;
use serde_json::{json, Value as JsonValue};

/// Path of the compiled CLI binary
pub fn binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_apicalls"))
}

/// Runs `apicalls report` with `args`, feeding `stdin` to the process
pub fn run_report(args: &[&str], stdin: &str) -> anyhow::Result<Output> {
    let mut child = Command::new(binary())
        .arg("report")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .context("Failed to spawn apicalls")?;

    child
        .stdin
        .take()
        .context("stdin was not piped")?
        .write_all(stdin.as_bytes())?;

    child.wait_with_output().context("Failed to wait for apicalls")
}

/// Identity v2 response line carrying `catalog` as `access.serviceCatalog`
pub fn identity_v2_line(catalog: JsonValue) -> String {
    response_line(&json!({ "access": { "serviceCatalog": catalog } }))
}

/// Identity v3 response line carrying `catalog` as `token.catalog`
pub fn identity_v3_line(catalog: JsonValue) -> String {
    response_line(&json!({ "token": { "catalog": catalog } }))
}

fn response_line(body: &JsonValue) -> String {
    let escaped = body.to_string().replace('"', "\\\"");
    format!(
        "D, [2016-03-01T10:00:00.000000 #4242] DEBUG -- : excon.response {{:status=>200}} body: {}",
        escaped
    )
}

/// Request line as excon logs it
pub fn request_line(
    method: &str,
    url: &str,
    host: &str,
    query: &JsonValue,
    body: Option<&JsonValue>,
) -> String {
    let params = format!(
        r#"{{"host":"{}","query":{},"method":"{}"}}"#,
        host,
        query,
        method.to_lowercase()
    );
    let body = body
        .map(|b| format!(" body: {}", b.to_string().replace('"', "\\\"")))
        .unwrap_or_default();
    format!(
        "D, [2016-03-01T10:00:01.000000 #4242] DEBUG -- : excon.request {} {} params: {}{}",
        method, url, params, body
    )
}

/// Writes `content` to `name` inside `dir`
pub fn write_file(dir: &Path, name: &str, content: &str) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, content)?;
    Ok(path)
}
