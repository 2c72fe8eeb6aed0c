use distributed_cache::cache::CacheGroup;
use distributed_cache::config::{Config, StoreBackend};
use distributed_cache::membership::discovery::DiscoverySource;
use distributed_cache::membership::service::MembershipService;
use distributed_cache::membership::types::PeerIdentity;
use distributed_cache::server;
use distributed_cache::store::{MemoryStore, ObjectStore, S3Store};
use std::sync::Arc;
use std::time::Duration;

/// How often the stats reporter logs a counter snapshot.
const STATS_LOG_INTERVAL: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = match Config::from_args(&args[1..]) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:#}");
            eprintln!("{}", Config::usage(&args[0]));
            std::process::exit(1);
        }
    };

    tracing::info!("starting cache node on {}", config.listen);

    // 1. Durable store:
    let store: Arc<dyn ObjectStore> = match &config.backend {
        StoreBackend::S3 {
            bucket,
            region,
            endpoint,
            path_style,
        } => Arc::new(
            S3Store::connect(
                bucket.clone(),
                region.clone(),
                endpoint.clone(),
                *path_style,
            )
            .await,
        ),
        StoreBackend::Memory => {
            tracing::warn!("memory backend selected; objects do not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    // 2. Membership (must succeed before the node serves traffic):
    let self_identity = PeerIdentity::parse(&config.self_url)?;
    let source = DiscoverySource::from_config(&config.discovery)?;
    let membership =
        MembershipService::bootstrap(self_identity, source, config.refresh_interval).await?;
    membership.start();

    // 3. Cache group:
    let group = CacheGroup::new(
        config.group.as_str(),
        config.cache_bytes,
        config.hot_cache_bytes(),
        config.hot_insert_one_in,
        Arc::clone(&membership),
        store,
    );

    // 4. Stats reporter:
    let stats_group = Arc::clone(&group);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(STATS_LOG_INTERVAL);
        loop {
            interval.tick().await;
            let snapshot = stats_group.stats_snapshot();
            tracing::info!(
                "stats | gets={} hits(main/hot)={}/{} misses={} loads(local/peer)={}/{} errors={} main={}B hot={}B",
                snapshot.gets,
                snapshot.hits_main,
                snapshot.hits_hot,
                snapshot.misses,
                snapshot.local_loads,
                snapshot.peer_loads,
                snapshot.load_errors,
                snapshot.main.used_bytes,
                snapshot.hot.used_bytes,
            );
        }
    });

    // 5. HTTP server:
    let app = server::router(group);
    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    tracing::info!("listening on {}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
