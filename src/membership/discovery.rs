use anyhow::{Context, Result};
use hickory_resolver::TokioAsyncResolver;
use std::net::IpAddr;

use crate::config::DiscoveryConfig;

use super::types::PeerIdentity;

/// SRV service label; lookups are issued for `_distcache._tcp.<service>`.
pub const SRV_SERVICE: &str = "distcache";

/// The closed set of peer discovery strategies. Selected once at startup;
/// business logic only ever sees `resolve()`.
pub enum DiscoverySource {
    /// Fixed peer list, validated at construction. Never changes.
    Static { peers: Vec<PeerIdentity> },
    /// SRV lookup against a service discovery name.
    DnsSrv {
        service: String,
        resolver: TokioAsyncResolver,
    },
    /// A-record lookups for a set of hostnames on a fixed port.
    DnsA {
        hostnames: Vec<String>,
        port: u16,
        resolver: TokioAsyncResolver,
    },
}

fn host_fragment(addr: IpAddr) -> String {
    match addr {
        IpAddr::V4(v4) => v4.to_string(),
        IpAddr::V6(v6) => format!("[{v6}]"),
    }
}

impl DiscoverySource {
    /// Build a source from configuration. Static peer URLs are validated
    /// here; a malformed entry is a fatal configuration error.
    pub fn from_config(config: &DiscoveryConfig) -> Result<Self> {
        match config {
            DiscoveryConfig::Static { peers } => {
                let peers = peers
                    .iter()
                    .map(|raw| PeerIdentity::parse(raw))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::Static { peers })
            }
            DiscoveryConfig::DnsSrv { service } => Ok(Self::DnsSrv {
                service: service.clone(),
                resolver: TokioAsyncResolver::tokio_from_system_conf()
                    .context("failed to build DNS resolver from system configuration")?,
            }),
            DiscoveryConfig::DnsA { hostnames, port } => Ok(Self::DnsA {
                hostnames: hostnames.clone(),
                port: *port,
                resolver: TokioAsyncResolver::tokio_from_system_conf()
                    .context("failed to build DNS resolver from system configuration")?,
            }),
        }
    }

    /// A static source resolves once and never changes; no refresh task is
    /// needed for it.
    pub fn is_static(&self) -> bool {
        matches!(self, Self::Static { .. })
    }

    /// Produce the current peer set from the discovery backend.
    pub async fn resolve(&self) -> Result<Vec<PeerIdentity>> {
        match self {
            Self::Static { peers } => Ok(peers.clone()),

            Self::DnsSrv { service, resolver } => {
                let name = format!("_{SRV_SERVICE}._tcp.{service}");
                let lookup = resolver
                    .srv_lookup(name.clone())
                    .await
                    .with_context(|| format!("SRV lookup failed for {name:?}"))?;

                let mut peers = Vec::new();
                for srv in lookup.iter() {
                    let peer = PeerIdentity::from_host_port(
                        &srv.target().to_utf8(),
                        srv.port(),
                    );
                    tracing::debug!("SRV peer: {}", peer);
                    peers.push(peer);
                }
                Ok(peers)
            }

            Self::DnsA {
                hostnames,
                port,
                resolver,
            } => {
                let mut peers = Vec::new();
                for host in hostnames {
                    let lookup = resolver
                        .lookup_ip(host.as_str())
                        .await
                        .with_context(|| format!("failed to resolve {host:?}"))?;

                    for addr in lookup.iter() {
                        let peer = PeerIdentity::from_host_port(&host_fragment(addr), *port);
                        tracing::debug!("A-record peer: {}", peer);
                        peers.push(peer);
                    }
                }
                Ok(peers)
            }
        }
    }
}
