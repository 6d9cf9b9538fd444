//! End-to-end tests for the apicalls CLI

mod test_utils;

use anyhow::Result;
use serde_json::json;
use test_utils::{identity_v2_line, identity_v3_line, request_line, run_report, write_file};

fn nova_catalog() -> serde_json::Value {
    json!([{
        "type": "compute",
        "name": "nova",
        "endpoints": [{"publicURL": "http://x:8774/v2/1234", "region": "RegionOne"}]
    }])
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_single_request_report() -> Result<()> {
    let log = [
        identity_v2_line(nova_catalog()),
        request_line("GET", "http://x:8774/v2/1234/servers", "x", &json!({}), None),
    ]
    .join("\n");

    let output = run_report(&[], &log)?;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        stdout_of(&output),
        "### All calls for API endpoint 'compute (nova)'\n```\nGET /v2/1234/servers\n```\n"
    );
    Ok(())
}

#[test]
fn test_scrubbed_and_grouped_report() -> Result<()> {
    let catalog = json!([
        {
            "type": "volume",
            "name": "cinder",
            "endpoints": [{"interface": "public", "url": "http://x:8776/v1/0123456789abcdef0123456789abcdef"}]
        },
        {
            "type": "compute",
            "name": "nova",
            "endpoints": [
                {"interface": "admin", "url": "http://x:8775/v2.1"},
                {"interface": "public", "url": "http://x:8774/v2.1"}
            ]
        },
        {
            "type": "image",
            "name": "glance",
            "endpoints": [{"interface": "public", "url": "http://x:9292"}]
        }
    ]);
    let log = [
        "I, [2016-03-01T10:00:00.000000 #4242]  INFO -- : Running lifecycle test".to_string(),
        identity_v3_line(catalog),
        request_line(
            "POST",
            "http://x:8774/v2.1/servers",
            "x",
            &json!({}),
            Some(&json!({"server": {"name": "vm-1", "flavorRef": "2", "imageRef": "4f1c2a3b-0d9e-4a8b-9c7d-112233445566"}})),
        ),
        request_line(
            "POST",
            "http://x:8774/v2.1/servers",
            "x",
            &json!({}),
            Some(&json!({"server": {"name": "vm-2", "flavorRef": "3", "imageRef": "aaaaaaaa-0d9e-4a8b-9c7d-112233445566"}})),
        ),
        request_line(
            "GET",
            "http://x:8776/v1/0123456789abcdef0123456789abcdef/volumes/non-existing-disk",
            "x",
            &json!({}),
            None,
        ),
        request_line(
            "GET",
            "http://x:8774/v2.1/servers/detail",
            "x",
            &json!({"name": "vm-1", "limit": 10}),
            None,
        ),
    ]
    .join("\n");

    let output = run_report(&[], &log)?;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let expected = [
        "### All calls for API endpoint 'compute (nova)'",
        "```",
        "GET /v2.1/servers/detail?name=<name>&limit=10",
        r#"POST /v2.1/servers body: {"server":{"name":"<name>","flavorRef":"<flavorRef_id>","imageRef":"<resource_id>"}}"#,
        "```",
        "### All calls for API endpoint 'image (glance)'",
        "### All calls for API endpoint 'volume (cinder)'",
        "```",
        "GET /v1/<tenant_id>/volumes/<resource_id>",
        "```",
        "",
    ]
    .join("\n");
    assert_eq!(stdout_of(&output), expected);
    Ok(())
}

#[test]
fn test_unmatched_request_diagnostic() -> Result<()> {
    let log = [
        identity_v2_line(nova_catalog()),
        request_line("GET", "http://y:9696/v2.0/ports", "y", &json!({}), None),
    ]
    .join("\n");

    let output = run_report(&[], &log)?;
    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "nothing found for url '(http|https)://y:9696'\n### All calls for API endpoint 'compute (nova)'\n"
    );
    Ok(())
}

#[test]
fn test_missing_catalog_fails() -> Result<()> {
    let log = request_line("GET", "http://x:8774/v2/1234/servers", "x", &json!({}), None);

    let output = run_report(&[], &log)?;
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no catalog with endpoints found"));
    Ok(())
}

#[test]
fn test_file_input_output_and_config() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let log = [
        identity_v2_line(nova_catalog()),
        request_line(
            "POST",
            "http://x:8774/v2/1234/os-keypairs",
            "x",
            &json!({}),
            Some(&json!({"keypair": {"name": "kp", "public_key": "ssh-rsa AAAA"}})),
        ),
    ]
    .join("\n");
    let input = write_file(dir.path(), "excon.log", &log)?;
    let config = write_file(dir.path(), "apicalls.yaml", "sensitive_keys: [public_key]\n")?;
    let report = dir.path().join("report.md");

    let output = run_report(
        &[
            "--input",
            input.to_str().unwrap(),
            "--output",
            report.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ],
        "",
    )?;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());
    assert_eq!(
        std::fs::read_to_string(&report)?,
        "### All calls for API endpoint 'compute (nova)'\n```\nPOST /v2/1234/os-keypairs body: {\"keypair\":{\"name\":\"kp\",\"public_key\":\"<public_key>\"}}\n```\n"
    );
    Ok(())
}
