//! Demonstrates building a small catalog and printing it in every format.
//!
//! Run with: `cargo run --example dump_catalog -p dcat-catalog`

use dcat_catalog::{dcat_envelope, DatasetSummary, Format, InMemoryRepository, DatasetRepository};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let repository = InMemoryRepository::new(vec![
        DatasetSummary {
            resource_name: "stops".to_owned(),
            collection_uri: "transport".to_owned(),
            description: "Public transport stops".to_owned(),
            created_at: "2013-02-11 10:00:00".to_owned(),
            updated_at: "2013-04-02 16:45:00".to_owned(),
        },
        DatasetSummary {
            resource_name: "rainfall".to_owned(),
            collection_uri: "weather".to_owned(),
            description: "Rain data".to_owned(),
            created_at: "2013-01-01 00:00:00".to_owned(),
            updated_at: "2013-06-01 00:00:00".to_owned(),
        },
    ]);

    let datasets = repository.list_datasets()?;
    let envelope = dcat_envelope("http://example.org", &datasets)?;

    println!(
        "Catalog: {} datasets, {} triples",
        datasets.len(),
        envelope.graph.len()
    );

    for format in Format::ALL {
        println!();
        println!("# {} ({})", format, format.media_type());
        println!("{}", String::from_utf8(format.render(&envelope)?)?);
    }

    Ok(())
}
