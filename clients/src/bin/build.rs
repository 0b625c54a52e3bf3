//! `dcat-build`: renders the DCAT catalog of a dataset snapshot to static
//! files, one per supported format.
//!
//! **Outputs:**
//! - `<out>/dcat.ttl`: Turtle 1.1
//! - `<out>/dcat.nt`: N-Triples
//! - `<out>/dcat.json`: JSON-LD 1.1
//! - `<out>/dcat.rdf`: RDF/XML
//!
//! **Usage:**
//! ```text
//! dcat-build --datasets <path> --base-uri <uri> [--out <path>]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use dcat_catalog::{dcat_envelope, DatasetRepository, Format, InMemoryRepository};

/// Build static DCAT catalog files.
#[derive(Parser)]
#[command(name = "dcat-build", about = "Build static DCAT catalog files")]
struct Args {
    /// JSON snapshot of the published datasets.
    #[arg(long)]
    datasets: PathBuf,
    /// Root URI the catalog and dataset URIs are minted under.
    #[arg(long)]
    base_uri: String,
    /// Output directory for generated files.
    #[arg(long, default_value = "public")]
    out: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let out = &args.out;

    if !args.base_uri.starts_with("http://") && !args.base_uri.starts_with("https://") {
        bail!("--base-uri must start with http:// or https://, got {:?}", args.base_uri);
    }

    let repository = InMemoryRepository::from_json_file(&args.datasets)
        .with_context(|| format!("Failed to load datasets from {}", args.datasets.display()))?;
    let datasets = repository.list_datasets()?;
    let envelope = dcat_envelope(&args.base_uri, &datasets)
        .context("Failed to build the DCAT catalog")?;

    fs::create_dir_all(out)
        .with_context(|| format!("Failed to create output directory: {}", out.display()))?;

    println!(
        "DCAT catalog for {}: {} datasets, {} triples",
        args.base_uri,
        datasets.len(),
        envelope.graph.len()
    );

    for format in [Format::Turtle, Format::NTriples, Format::JsonLd, Format::RdfXml] {
        let path = out.join(format!("{}.{}", envelope.resource_label, format.suffix()));
        let body = format
            .render(&envelope)
            .with_context(|| format!("Failed to render the catalog as {format}"))?;
        fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
        println!("  Written: {}", path.display());
    }

    println!("Build complete.");
    Ok(())
}
