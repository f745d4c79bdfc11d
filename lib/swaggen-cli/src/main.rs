#![allow(missing_docs)]
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use swaggen_core::{
    AssemblerConfig, CapturedExchange, DEFAULT_ARTIFACT, DEFAULT_VERSION, DeprecatedPaths,
    DocumentAssembler, ExamplePool, FileSink, SchemaDocument,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt().pretty().init();

    let args = AppArgs::parse().context("parsing arguments")?;
    run(args)?;

    info!("Bye!");
    Ok(())
}

fn run(args: AppArgs) -> Result<()> {
    let AppArgs {
        input,
        examples,
        deprecated,
        release,
        default_version,
        output,
        schema_only,
    } = args;

    let raw = fs::read_to_string(&input)
        .with_context(|| format!("reading generator output {}", input.display()))?;
    let mut generated = SchemaDocument::from_json(&raw).context("parsing generator output")?;

    for path in deprecated {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading deprecated paths {}", path.display()))?;
        let paths = DeprecatedPaths::from_json(&text)
            .with_context(|| format!("parsing deprecated paths {}", path.display()))?;
        generated.deprecated_paths.merge(paths);
    }

    let config = AssemblerConfig::default()
        .with_default_version(default_version)
        .with_schema_only(schema_only);
    let mut assembler = DocumentAssembler::prepare(generated, config)?;

    for path in examples {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading captured exchanges {}", path.display()))?;
        let captures: Vec<CapturedExchange> = serde_json::from_str(&text)
            .with_context(|| format!("parsing captured exchanges {}", path.display()))?;
        let mut pool = ExamplePool::default();
        pool.extend_captures(captures)?;

        let report = assembler.merge_examples(&pool)?;
        if !report.unmatched_paths.is_empty() {
            warn!(unmatched = ?report.unmatched_paths, "captured paths without a documented template");
        }
        if report.short_circuited {
            break;
        }
    }

    let mut sink = FileSink::new(output);
    assembler.write_to(release, chrono::Utc::now(), &mut sink)?;
    Ok(())
}

#[derive(Debug)]
struct AppArgs {
    input: PathBuf,
    examples: Vec<PathBuf>,
    deprecated: Vec<PathBuf>,
    release: String,
    default_version: String,
    output: PathBuf,
    schema_only: bool,
}

impl AppArgs {
    fn parse() -> Result<Self> {
        let mut pargs = pico_args::Arguments::from_env();

        let schema_only = pargs.contains("--genschema");

        let input = pargs
            .value_from_str(["-i", "--input"])
            .context("parsing input argument")?;

        let examples = pargs
            .values_from_str(["-e", "--examples"])
            .context("parsing examples argument")?;

        let deprecated = pargs
            .values_from_str(["-d", "--deprecated"])
            .context("parsing deprecated argument")?;

        let release = pargs
            .value_from_str(["-r", "--release"])
            .context("parsing release argument")?;

        let default_version = pargs
            .opt_value_from_str("--default-version")
            .context("parsing default version argument")?;

        let output = pargs
            .opt_value_from_str(["-o", "--output"])
            .context("parsing output argument")?;

        let result = Self {
            input,
            examples,
            deprecated,
            release,
            default_version: default_version.unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            output: output.unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACT)),
            schema_only,
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            warn!(?remaining, "Warning: unused arguments left");
        }
        Ok(result)
    }
}
