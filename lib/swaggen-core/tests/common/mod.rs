use std::path::PathBuf;

use rstest::fixture;
use swaggen_core::{AssemblerConfig, DocumentAssembler, DocumentCache, SchemaDocument};
use tracing::info;

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    info!("Tracing initialized");
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn load_fixture(name: &str) -> String {
    let path = fixture_path(name);
    match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(error) => panic!("fail to read fixture {}: {error}", path.display()),
    }
}

/// A cache holding the prepared controller document, as shared by a test run.
#[fixture]
pub fn cache() -> DocumentCache {
    init_tracing();
    let mut cache = DocumentCache::new();
    if let Err(error) = cache.get_or_try_init(|| {
        let output = SchemaDocument::from_json(&load_fixture("controller.json"))?;
        DocumentAssembler::prepare(output, AssemblerConfig::default())
    }) {
        panic!("fail to prepare document: {error:?}");
    }
    cache
}
