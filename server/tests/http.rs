//! End-to-end checks of the info resource over a real socket.

use std::path::PathBuf;
use std::sync::Arc;

use dcat_catalog::{DatasetSummary, Format, InMemoryRepository};
use dcat_server::{CatalogServer, ServerConfig};
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE, VARY};
use reqwest::StatusCode;

fn dataset(collection: &str, resource: &str, updated: &str) -> DatasetSummary {
    DatasetSummary {
        resource_name: resource.to_owned(),
        collection_uri: collection.to_owned(),
        description: format!("{resource} data"),
        created_at: "2020-01-01T00:00:00Z".to_owned(),
        updated_at: updated.to_owned(),
    }
}

fn config(base_uri: Option<&str>) -> ServerConfig {
    ServerConfig {
        listen_addr: "127.0.0.1:0".parse().expect("socket addr"),
        base_uri: base_uri.map(str::to_owned),
        default_format: Format::Turtle,
        datasets: PathBuf::from("unused.json"),
    }
}

async fn start(base_uri: Option<&str>, datasets: Vec<DatasetSummary>) -> CatalogServer {
    CatalogServer::start(
        &config(base_uri),
        Arc::new(InMemoryRepository::new(datasets)),
        std::future::pending(),
    )
    .await
    .expect("server starts")
}

async fn rainfall_server() -> CatalogServer {
    start(
        Some("http://data.example.org"),
        vec![dataset("weather", "rainfall", "2020-06-01T00:00:00Z")],
    )
    .await
}

#[tokio::test]
async fn json_suffix_serves_json_ld() {
    let server = rainfall_server().await;
    let response = reqwest::get(format!("{}/info/dcat.json", server.base_url))
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_TYPE],
        "application/ld+json; charset=utf-8"
    );
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION],
        "inline; filename=\"dcat.json\""
    );
    let text = response.text().await.expect("text body");
    let body: serde_json::Value = serde_json::from_str(&text).expect("JSON body");
    assert!(body["@context"].is_object());
    assert!(body["@graph"].is_array());
}

#[tokio::test]
async fn accept_header_selects_turtle() {
    let server = rainfall_server().await;
    let response = reqwest::Client::new()
        .get(format!("{}/info/dcat", server.base_url))
        .header("Accept", "application/rdf+xml;q=0.5, text/turtle")
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/turtle; charset=utf-8");
    assert_eq!(response.headers()[VARY], "Accept");
    let body = response.text().await.expect("text body");
    assert!(body.contains("<http://data.example.org/info/dcat>"));
    assert!(body.contains("dcat:Catalog"));
    assert!(body.contains("\"2020-06-01T00:00:00Z\""));
}

#[tokio::test]
async fn wildcard_accept_uses_default_format() {
    let server = rainfall_server().await;
    let response = reqwest::Client::new()
        .get(format!("{}/info/dcat", server.base_url))
        .header("Accept", "*/*")
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.headers()[CONTENT_TYPE], "text/turtle; charset=utf-8");
}

#[tokio::test]
async fn suffix_beats_accept_header() {
    let server = rainfall_server().await;
    let response = reqwest::Client::new()
        .get(format!("{}/info/dcat.nt", server.base_url))
        .header("Accept", "text/turtle")
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(
        response.headers()[CONTENT_TYPE],
        "application/n-triples; charset=utf-8"
    );
    let body = response.text().await.expect("text body");
    assert_eq!(body.lines().count(), 9);
}

#[tokio::test]
async fn unsupported_methods_are_rejected_before_lookup() {
    let server = rainfall_server().await;
    let client = reqwest::Client::new();

    for path in ["dcat", "nothing-here"] {
        let response = client
            .post(format!("{}/info/{path}", server.base_url))
            .send()
            .await
            .expect("request succeeds");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.text().await.expect("text body"),
            "The method POST is not supported by the info resource."
        );
    }
}

#[tokio::test]
async fn unknown_suffix_is_not_acceptable() {
    let server = rainfall_server().await;
    let response = reqwest::get(format!("{}/info/dcat.csv", server.base_url))
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
}

#[tokio::test]
async fn unknown_resource_is_not_found() {
    let server = rainfall_server().await;
    let response = reqwest::get(format!("{}/info/formats", server.base_url))
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn head_returns_headers_without_body() {
    let server = rainfall_server().await;
    let response = reqwest::Client::new()
        .head(format!("{}/info/dcat.rdf", server.base_url))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_TYPE],
        "application/rdf+xml; charset=utf-8"
    );
    assert!(response.bytes().await.expect("body").is_empty());
}

#[tokio::test]
async fn base_uri_follows_host_header_when_unconfigured() {
    let server = start(None, vec![dataset("weather", "rainfall", "2020-06-01T00:00:00Z")]).await;
    let body = reqwest::get(format!("{}/info/dcat.nt", server.base_url))
        .await
        .expect("request succeeds")
        .text()
        .await
        .expect("text body");
    assert!(body.contains(&format!("<{}/weather/rainfall>", server.base_url)));
}

#[tokio::test]
async fn malformed_timestamp_is_a_server_error() {
    let server = start(
        Some("http://data.example.org"),
        vec![dataset("weather", "wind", "last tuesday")],
    )
    .await;
    let response = reqwest::get(format!("{}/info/dcat.ttl", server.base_url))
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.text().await.expect("text body");
    assert!(!body.contains("last tuesday"));
}

#[tokio::test]
async fn empty_repository_serves_catalog_header_only() {
    let server = start(Some("http://data.example.org"), Vec::new()).await;
    let body = reqwest::get(format!("{}/info/dcat.nt", server.base_url))
        .await
        .expect("request succeeds")
        .text()
        .await
        .expect("text body");
    assert_eq!(body.lines().count(), 3);
}

#[tokio::test]
async fn snapshot_file_feeds_the_server() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("datasets.json");
    let snapshot = serde_json::json!([
        {
            "resource_name": "stops",
            "collection_uri": "transport",
            "description": "Stops",
            "created_at": "2013-02-11 10:00:00",
            "updated_at": "2013-04-02 16:45:00"
        },
        {
            "resource_name": "rainfall",
            "collection_uri": "weather",
            "description": "Rain data",
            "created_at": "2013-01-01 00:00:00",
            "updated_at": "2013-06-01 00:00:00"
        }
    ]);
    std::fs::write(&path, snapshot.to_string()).expect("write snapshot");

    let repository = InMemoryRepository::from_json_file(&path).expect("snapshot loads");
    let server = CatalogServer::start(
        &config(Some("http://data.example.org")),
        Arc::new(repository),
        std::future::pending(),
    )
    .await
    .expect("server starts");

    let body = reqwest::get(format!("{}/info/dcat.ttl", server.base_url))
        .await
        .expect("request succeeds")
        .text()
        .await
        .expect("text body");
    assert!(body.contains("\"2013-06-01T00:00:00Z\""));
}

#[tokio::test]
async fn unknown_suffix_is_rejected_before_the_catalog_is_built() {
    let mut broken = dataset("weather", "wind", "2020-06-01T00:00:00Z");
    broken.created_at = "bad".to_owned();
    let server = start(Some("http://data.example.org"), vec![broken]).await;

    let response = reqwest::get(format!("{}/info/dcat.csv", server.base_url))
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
}

#[tokio::test]
async fn refused_default_format_is_not_served() {
    let server = rainfall_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/info/dcat", server.base_url))
        .header("Accept", "text/turtle;q=0")
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_TYPE],
        "application/rdf+xml; charset=utf-8"
    );

    let response = client
        .get(format!("{}/info/dcat", server.base_url))
        .header("Accept", "*/*;q=0")
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
}

#[tokio::test]
async fn info_root_rejects_methods_and_has_no_resource() {
    let server = rainfall_server().await;
    let client = reqwest::Client::new();

    for path in ["/info", "/info/"] {
        let response = client
            .post(format!("{}{path}", server.base_url))
            .send()
            .await
            .expect("request succeeds");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(
            response.text().await.expect("text body"),
            "The method POST is not supported by the info resource."
        );

        let response = client
            .get(format!("{}{path}", server.base_url))
            .send()
            .await
            .expect("request succeeds");
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
    }
}
