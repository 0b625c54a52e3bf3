//! Server configuration: an optional TOML file overridden by flags and
//! environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use clap::Parser;
use dcat_catalog::{Format, NegotiateError};
use serde::Deserialize;
use thiserror::Error;

/// Default listen address when neither the file nor the flags set one.
pub const DEFAULT_LISTEN_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8080);

/// Command-line flags of `dcat-server`. Every flag can also come from the
/// environment.
#[derive(Debug, Default, Parser)]
#[command(
    name = "dcat-server",
    about = "Serve the DCAT catalog of published datasets"
)]
pub struct CliArgs {
    /// TOML configuration file; flags override its values.
    #[arg(long, env = "DCAT_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Listen address for the server.
    #[arg(long, env = "DCAT_LISTEN_ADDR", value_name = "HOST:PORT")]
    pub listen_addr: Option<SocketAddr>,
    /// Root URI of the platform; derived from the Host header when unset.
    #[arg(long, env = "DCAT_BASE_URI", value_name = "URI")]
    pub base_uri: Option<String>,
    /// Format used when neither suffix nor Accept header decide (ttl, rdf, json, nt).
    #[arg(long, env = "DCAT_DEFAULT_FORMAT", value_name = "FORMAT")]
    pub default_format: Option<String>,
    /// JSON snapshot of the published datasets.
    #[arg(long, env = "DCAT_DATASETS", value_name = "PATH")]
    pub datasets: Option<PathBuf>,
}

/// Errors raised while assembling the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {}", path.display())]
    Read {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid TOML for this server.
    #[error("failed to parse configuration file {}", path.display())]
    Parse {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying TOML failure.
        #[source]
        source: toml::de::Error,
    },
    /// No dataset snapshot was configured.
    #[error("no dataset snapshot configured; pass --datasets or set `datasets` in the configuration file")]
    MissingDatasets,
    /// The default format names no supported serialization.
    #[error("invalid default format")]
    InvalidFormat(#[from] NegotiateError),
    /// The base URI is not an absolute http(s) URI.
    #[error("base URI {0:?} must start with http:// or https://")]
    InvalidBaseUri(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    listen_addr: Option<SocketAddr>,
    base_uri: Option<String>,
    default_format: Option<String>,
    datasets: Option<PathBuf>,
}

/// Validated server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind.
    pub listen_addr: SocketAddr,
    /// Fixed root URI, or `None` to derive it from each request's Host header.
    pub base_uri: Option<String>,
    /// Format chosen when the request does not decide.
    pub default_format: Format,
    /// Path of the JSON dataset snapshot.
    pub datasets: PathBuf,
}

impl ServerConfig {
    /// Merges the configuration file named by `args` (if any) with `args`.
    ///
    /// A relative `datasets` path in the file is resolved against the file's
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, or if
    /// the merged values are incomplete or invalid.
    pub fn load(args: CliArgs) -> Result<ServerConfig, ConfigError> {
        let file = match &args.config {
            Some(path) => read_file(path)?,
            None => FileConfig::default(),
        };

        let datasets = args
            .datasets
            .or(file.datasets)
            .ok_or(ConfigError::MissingDatasets)?;

        let default_format = match args.default_format.or(file.default_format) {
            Some(name) => name.parse::<Format>()?,
            None => Format::Turtle,
        };

        let base_uri = match args.base_uri.or(file.base_uri) {
            Some(uri) if uri.starts_with("http://") || uri.starts_with("https://") => {
                Some(uri.trim_end_matches('/').to_owned())
            }
            Some(uri) => return Err(ConfigError::InvalidBaseUri(uri)),
            None => None,
        };

        Ok(ServerConfig {
            listen_addr: args
                .listen_addr
                .or(file.listen_addr)
                .unwrap_or(DEFAULT_LISTEN_ADDR),
            base_uri,
            default_format,
            datasets,
        })
    }
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })?;
    let mut file: FileConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_owned(),
        source,
    })?;
    if let (Some(datasets), Some(dir)) = (&file.datasets, path.parent()) {
        if datasets.is_relative() {
            file.datasets = Some(dir.join(datasets));
        }
    }
    Ok(file)
}
