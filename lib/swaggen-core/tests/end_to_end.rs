#![allow(missing_docs)]

use anyhow::Context;
use chrono::{TimeZone, Utc};
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use rstest::rstest;
use serde_json::{Value, json};
use swaggen_core::{
    AssemblerConfig, CapturedExchange, DEPRECATED_PATHS_HEADER, DeprecatedPaths,
    DocumentAssembler, DocumentCache, ExamplePool, ExampleRecord, FileSink, RedactionConfig,
    Redactor, SchemaDocument,
};
use tracing::info;

mod common;
pub use self::common::*;

fn captured_pool() -> anyhow::Result<ExamplePool> {
    let captures: Vec<CapturedExchange> = serde_json::from_str(&load_fixture("captures.json"))
        .context("captures should deserialize")?;
    let mut pool = ExamplePool::default();
    pool.extend_captures(captures)?;
    Ok(pool)
}

fn release_date() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 1, 9, 30, 0)
        .single()
        .expect("valid date")
}

fn take(cache: &mut DocumentCache) -> anyhow::Result<DocumentAssembler> {
    cache.take().context("cache should hold the prepared document")
}

#[test]
fn should_publish_ping_example() -> anyhow::Result<()> {
    init_tracing();
    let raw = r#"{
        "info": {"title": "API", "version": ""},
        "paths": {
            "/api/{version}/ping/": {
                "get": {
                    "description": "Ping\ndetail",
                    "parameters": [{"name": "version", "in": "path", "required": true, "type": "string"}],
                    "responses": {}
                }
            }
        }
    }"#;
    let output = SchemaDocument::from_json(raw)?;
    let mut assembler = DocumentAssembler::prepare(output, AssemblerConfig::default())?;

    let mut pool = ExamplePool::default();
    pool.record(
        "/api/v2/ping/",
        ExampleRecord::new(Method::GET, StatusCode::OK)
            .with_content_type("application/json")
            .with_response_body(r#"{"status":"ok"}"#),
    );
    assembler.merge_examples(&pool)?;
    let artifact = assembler.finalize("1.0.0", release_date())?;

    let value: Value = serde_json::from_str(&artifact)?;
    let operation = &value["paths"]["/api/v2/ping/"]["get"];
    assert_eq!(operation["summary"], json!("Ping"));
    assert_eq!(operation["description"], json!("detail"));
    assert_eq!(operation["produces"], json!(["application/json"]));
    assert_eq!(
        operation["responses"]["200"]["examples"]["application/json"],
        json!({"status": "ok"})
    );
    assert_eq!(operation["parameters"], json!([]));
    assert_eq!(value["info"]["version"], json!("1.0.0"));

    Ok(())
}

#[rstest]
fn should_normalize_controller_paths(mut cache: DocumentCache) -> anyhow::Result<()> {
    let assembler = take(&mut cache)?;
    let document = assembler.document();

    let paths = document.paths.keys().map(String::as_str).collect::<Vec<_>>();
    info!(?paths, "normalized paths");
    assert_eq!(
        paths,
        [
            "/api/",
            "/api/v2/",
            "/api/v2/ping/",
            "/api/v2/credentials/",
            "/api/v2/credentials/{id}/",
            "/api/v2/settings/",
            "/api/v2/settings/{category_slug}/",
            "/api/v2/settings/logging/test/",
        ]
    );
    assert!(
        document
            .paths
            .values()
            .flat_map(|item| item.operations.values())
            .flat_map(|operation| operation.parameters.iter().flatten())
            .all(|param| !param.is_path_param("version"))
    );
    assert!(
        document
            .paths
            .values()
            .flat_map(|item| item.parameters.iter().flatten())
            .all(|param| !param.is_path_param("version"))
    );

    Ok(())
}

#[rstest]
fn should_annotate_controller_operations(mut cache: DocumentCache) -> anyhow::Result<()> {
    let assembler = take(&mut cache)?;
    let document = assembler.document();

    let credentials = &document.paths["/api/v2/credentials/"].operations;
    assert_eq!(
        credentials["get"].summary.as_deref(),
        Some("List Credentials")
    );
    assert_eq!(
        credentials["get"].description.as_deref(),
        Some("\nMake a GET request to this resource to retrieve the list of credentials.")
    );

    let credential = &document.paths["/api/v2/credentials/{id}/"].operations;
    assert_eq!(
        credential["patch"].summary.as_deref(),
        Some("No Description for PATCH on /api/v2/credentials/{id}/")
    );
    assert_eq!(credential["patch"].description.as_deref(), Some(""));

    let logging = &document.paths["/api/v2/settings/logging/test/"].operations;
    assert!(logging["post"].is_deprecated());
    assert!(
        document
            .paths
            .iter()
            .filter(|(path, _)| *path != "/api/v2/settings/logging/test/")
            .flat_map(|(_, item)| item.operations.values())
            .all(|operation| !operation.is_deprecated())
    );

    Ok(())
}

#[rstest]
fn should_merge_captured_traffic(mut cache: DocumentCache) -> anyhow::Result<()> {
    let pool = captured_pool()?;
    let assembler = cache
        .get_mut()
        .context("cache should hold the prepared document")?;

    let report = assembler.merge_examples(&pool)?;

    assert_eq!(report.matches, 6);
    assert_eq!(report.response_examples, 6);
    assert_eq!(report.request_examples, 1);
    assert_eq!(report.unmatched_paths, ["/api/v2/applications/1/"]);
    assert_eq!(
        report.skipped_methods,
        [("/api/v2/credentials/7/".to_string(), Method::OPTIONS)]
    );
    assert!(!report.short_circuited);

    let document = assembler.document();
    let root = &document.paths["/api/"].operations["get"];
    assert_eq!(
        root.produces.as_deref(),
        Some(
            [
                "application/json".to_string(),
                "text/html; charset=utf-8".to_string()
            ]
            .as_slice()
        )
    );
    assert!(!root.responses.contains_key("406"));

    let create = &document.paths["/api/v2/credentials/"].operations["post"];
    let parameters = create.parameters.as_deref().unwrap_or_default();
    assert_eq!(parameters.len(), 1);
    assert_eq!(parameters[0].name, "data");
    assert_eq!(
        parameters[0].schema,
        Some(json!({"example": {"name": "Machine", "credential_type": 1, "inputs": {"username": "admin"}}}))
    );

    let logging = &document.paths["/api/v2/settings/logging/test/"].operations["post"];
    assert!(
        logging
            .parameters
            .iter()
            .flatten()
            .all(|param| param.name != "data")
    );
    assert_eq!(
        logging.responses["409"].examples["application/json"],
        json!({"error": "Logging not enabled"})
    );

    Ok(())
}

#[rstest]
fn should_produce_identical_artifact_when_merging_twice(
    mut cache: DocumentCache,
) -> anyhow::Result<()> {
    let pool = captured_pool()?;
    let mut once = take(&mut cache)?;
    let mut twice = once.clone();

    once.merge_examples(&pool)?;
    twice.merge_examples(&pool)?;
    let second = twice.merge_examples(&pool)?;

    assert_eq!(second.request_examples, 0);
    assert_eq!(
        once.finalize("24.6.1", release_date())?,
        twice.finalize("24.6.1", release_date())?
    );

    Ok(())
}

#[rstest]
fn should_redact_volatile_values(mut cache: DocumentCache) -> anyhow::Result<()> {
    let pool = captured_pool()?;
    let mut assembler = take(&mut cache)?;
    assembler.merge_examples(&pool)?;

    let artifact = assembler.finalize("24.6.1", release_date())?;

    let value: Value = serde_json::from_str(&artifact)?;
    assert_eq!(value["modified"], json!("2018-02-01T08:00:00.000000Z"));
    let ping = &value["paths"]["/api/v2/ping/"]["get"]["responses"]["200"]["examples"]["application/json"];
    assert_eq!(
        ping["install_uuid"],
        json!("00000000-0000-0000-0000-000000000000")
    );
    assert_eq!(
        ping["instances"][0]["heartbeat"],
        json!("2018-02-01T08:00:00.000000Z")
    );
    assert_eq!(ping["active_node"], json!("awx-7d8c9"));

    let redactor = Redactor::new(&RedactionConfig::default())?;
    assert_eq!(redactor.redact(&artifact), artifact);

    Ok(())
}

#[rstest]
fn should_produce_same_artifact_at_different_times(
    mut cache: DocumentCache,
) -> anyhow::Result<()> {
    let assembler = take(&mut cache)?;
    let later = Utc
        .with_ymd_and_hms(2025, 1, 2, 3, 4, 5)
        .single()
        .context("valid date")?;

    let first = assembler.clone().finalize("24.6.1", release_date())?;
    let second = assembler.finalize("24.6.1", later)?;

    assert_eq!(first, second);

    Ok(())
}

#[rstest]
fn should_skip_example_injection_in_schema_only_mode() -> anyhow::Result<()> {
    init_tracing();
    let output = SchemaDocument::from_json(&load_fixture("controller.json"))?;
    let config = AssemblerConfig::default().with_schema_only(true);
    let mut assembler = DocumentAssembler::prepare(output, config)?;

    let report = assembler.merge_examples(&captured_pool()?)?;
    assert!(report.short_circuited);

    let create = &assembler.document().paths["/api/v2/credentials/"].operations["post"];
    assert!(
        create
            .parameters
            .iter()
            .flatten()
            .all(|param| param.name != "data")
    );

    let artifact = assembler.finalize("24.6.1", release_date())?;
    let value: Value = serde_json::from_str(&artifact)?;
    assert!(value.get("modified").is_none());

    Ok(())
}

#[rstest]
fn should_deprecate_from_response_header() -> anyhow::Result<()> {
    init_tracing();
    let mut output = SchemaDocument::from_json(&load_fixture("controller.json"))?;
    let mut headers = HeaderMap::new();
    headers.insert(
        DEPRECATED_PATHS_HEADER,
        HeaderValue::from_static(r#"["/api/{version}/settings/{category_slug}/"]"#),
    );
    output
        .deprecated_paths
        .merge(DeprecatedPaths::from_headers(&headers)?);

    let assembler = DocumentAssembler::prepare(output, AssemblerConfig::default())?;

    let settings = &assembler.document().paths["/api/v2/settings/{category_slug}/"];
    assert!(settings.operations.values().all(|operation| operation.is_deprecated()));
    let logging = &assembler.document().paths["/api/v2/settings/logging/test/"];
    assert!(logging.operations["post"].is_deprecated());

    Ok(())
}

#[rstest]
fn should_write_artifact_file(mut cache: DocumentCache) -> anyhow::Result<()> {
    let pool = captured_pool()?;
    let mut assembler = take(&mut cache)?;
    assembler.merge_examples(&pool)?;
    let dir = std::env::temp_dir().join(format!("swaggen-e2e-{}", std::process::id()));
    let mut sink = FileSink::new(dir.join("docs").join("swagger.json"));

    assembler.write_to("24.6.1", release_date(), &mut sink)?;

    let written = std::fs::read_to_string(sink.path())?;
    let value: Value = serde_json::from_str(&written)?;
    assert_eq!(value["host"], Value::Null);
    assert_eq!(value["schemes"], json!(["https"]));
    assert!(value.get("deprecated_paths").is_none());
    std::fs::remove_dir_all(&dir)?;

    Ok(())
}
