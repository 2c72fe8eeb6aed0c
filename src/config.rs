//! Node Configuration
//!
//! All runtime settings are parsed from argv exactly once in `main` and
//! carried in an owned [`Config`] value that is handed to each component
//! constructor. Nothing in this crate reads flag state through globals.

use anyhow::{Result, bail};
use std::net::SocketAddr;
use std::time::Duration;

/// Default byte budget for the main cache tier (matches the original
/// deployment sizing of the cache group).
pub const DEFAULT_CACHE_BYTES: u64 = 2 << 32;
/// The hot tier receives 1/8th of the main tier budget.
pub const DEFAULT_HOT_RATIO: u64 = 8;
/// A value fetched from a peer is inserted into the hot tier roughly once
/// per this many fetches.
pub const DEFAULT_HOT_INSERT_ONE_IN: u32 = 10;
/// Default interval between peer discovery refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(15);
/// Default logical cache group name, shared by every node in the cluster.
pub const DEFAULT_GROUP: &str = "buildcache";

/// How the node discovers its peers. Exactly one variant is selected at
/// startup; the modes are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryConfig {
    /// A fixed, externally supplied list of peer URLs.
    Static { peers: Vec<String> },
    /// Periodic SRV lookups against a service discovery name.
    DnsSrv { service: String },
    /// Periodic A-record lookups for one or more hostnames on a fixed port.
    DnsA { hostnames: Vec<String>, port: u16 },
}

/// Which durable store backs the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// An S3-compatible bucket. `endpoint`/`path_style` cover MinIO-style
    /// deployments.
    S3 {
        bucket: String,
        region: String,
        endpoint: Option<String>,
        path_style: bool,
    },
    /// Process-local storage, for development and tests only.
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Socket the HTTP server binds to.
    pub listen: SocketAddr,
    /// This node's externally reachable base URL. Must appear in every
    /// accepted membership snapshot.
    pub self_url: String,
    pub discovery: DiscoveryConfig,
    pub refresh_interval: Duration,
    pub backend: StoreBackend,
    /// Main tier byte budget.
    pub cache_bytes: u64,
    /// Hot tier budget = `cache_bytes / hot_ratio`.
    pub hot_ratio: u64,
    pub hot_insert_one_in: u32,
    pub group: String,
}

impl Config {
    pub fn usage(program: &str) -> String {
        format!(
            "Usage: {program} --listen <addr:port> --self-url <url> \
             (--peers <url,url,...> | --srv <service> | --dns-host <host> [--dns-host <host>] --dns-port <port>) \
             [--refresh-secs <n>] [--backend s3|memory] [--bucket <name>] \
             [--s3-region <region>] [--s3-endpoint <url>] [--s3-path-style] \
             [--cache-mb <n>] [--group <name>]"
        )
    }

    /// Parse configuration from argv (excluding the program name).
    /// Invalid or conflicting settings are fatal.
    pub fn from_args(args: &[String]) -> Result<Config> {
        let mut listen: Option<SocketAddr> = None;
        let mut self_url: Option<String> = None;
        let mut peers: Option<Vec<String>> = None;
        let mut srv: Option<String> = None;
        let mut dns_hosts: Vec<String> = vec![];
        let mut dns_port: Option<u16> = None;
        let mut refresh_secs: u64 = DEFAULT_REFRESH_INTERVAL.as_secs();
        let mut backend = "s3".to_string();
        let mut bucket: Option<String> = None;
        let mut region = "us-west-2".to_string();
        let mut endpoint: Option<String> = None;
        let mut path_style = false;
        let mut cache_bytes = DEFAULT_CACHE_BYTES;
        let mut group = DEFAULT_GROUP.to_string();

        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            let value = |i: &mut usize| -> Result<String> {
                *i += 1;
                match args.get(*i) {
                    Some(v) => Ok(v.clone()),
                    None => bail!("missing value for {flag}"),
                }
            };

            match flag {
                "--listen" => listen = Some(value(&mut i)?.parse()?),
                "--self-url" => self_url = Some(value(&mut i)?),
                "--peers" => {
                    peers = Some(
                        value(&mut i)?
                            .split(',')
                            .map(|p| p.trim().to_string())
                            .filter(|p| !p.is_empty())
                            .collect(),
                    )
                }
                "--srv" => srv = Some(value(&mut i)?),
                "--dns-host" => dns_hosts.push(value(&mut i)?),
                "--dns-port" => dns_port = Some(value(&mut i)?.parse()?),
                "--refresh-secs" => refresh_secs = value(&mut i)?.parse()?,
                "--backend" => backend = value(&mut i)?,
                "--bucket" => bucket = Some(value(&mut i)?),
                "--s3-region" => region = value(&mut i)?,
                "--s3-endpoint" => endpoint = Some(value(&mut i)?),
                "--s3-path-style" => path_style = true,
                "--cache-mb" => cache_bytes = value(&mut i)?.parse::<u64>()? * 1024 * 1024,
                "--group" => group = value(&mut i)?,
                other => bail!("unknown flag: {other}"),
            }
            i += 1;
        }

        let listen = match listen {
            Some(l) => l,
            None => bail!("--listen is required"),
        };
        let self_url = match self_url {
            Some(s) => s,
            None => bail!("--self-url is required"),
        };

        let mut modes = 0;
        if peers.is_some() {
            modes += 1;
        }
        if srv.is_some() {
            modes += 1;
        }
        if !dns_hosts.is_empty() {
            modes += 1;
        }
        if modes != 1 {
            bail!("exactly one of --peers, --srv or --dns-host must be given");
        }

        let discovery = if let Some(peers) = peers {
            if peers.is_empty() {
                bail!("--peers must name at least one peer URL");
            }
            DiscoveryConfig::Static { peers }
        } else if let Some(service) = srv {
            DiscoveryConfig::DnsSrv { service }
        } else {
            let port = match dns_port {
                Some(p) => p,
                None => bail!("--dns-port is required with --dns-host"),
            };
            DiscoveryConfig::DnsA {
                hostnames: dns_hosts,
                port,
            }
        };

        let backend = match backend.as_str() {
            "s3" => {
                let bucket = match bucket {
                    Some(b) if !b.is_empty() => b,
                    _ => bail!("--bucket is required for the s3 backend"),
                };
                StoreBackend::S3 {
                    bucket,
                    region,
                    endpoint,
                    path_style,
                }
            }
            "memory" => StoreBackend::Memory,
            other => bail!("unknown backend: {other} (expected s3 or memory)"),
        };

        if refresh_secs == 0 {
            bail!("--refresh-secs must be positive");
        }
        if cache_bytes == 0 {
            bail!("--cache-mb must be positive");
        }

        Ok(Config {
            listen,
            self_url,
            discovery,
            refresh_interval: Duration::from_secs(refresh_secs),
            backend,
            cache_bytes,
            hot_ratio: DEFAULT_HOT_RATIO,
            hot_insert_one_in: DEFAULT_HOT_INSERT_ONE_IN,
            group,
        })
    }

    /// Byte budget of the hot tier.
    pub fn hot_cache_bytes(&self) -> u64 {
        (self.cache_bytes / self.hot_ratio).max(1)
    }
}
