use indexer_core::IndexerConfig;
use indexer_db::{
    repositories::{BotRepository, OwnerRepository, SyncStateRepository, TradeRepository},
    DatabaseConfig, DatabasePool,
};
use indexer_metrics::{MetricsConfig, MetricsServer};
use indexer_pinning::{PinataClient, PinningConfig};
use indexer_processor::{CacheSink, CompositeSink, DatabaseSink, PinningSink};
use indexer_redis::{BotStateCache, RedisConfig, RedisConnection};
use indexer_reporting::{ReportingConfig, Severity};
use indexer_store::IndexerStore;
use indexer_sync::SyncEngine;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (ignore if not found)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(Level::INFO.into())
                .add_directive("indexer_sync=info".parse()?)
                .add_directive("indexer_processor=info".parse()?),
        )
        .init();

    indexer_reporting::init(ReportingConfig::from_env());

    info!("Trading bot indexer starting...");

    // Load configuration (validates env vars and loads deployment file)
    let config = match IndexerConfig::load() {
        Ok(config) => {
            info!(
                chain_id = config.chain_id,
                bot_factory = ?config.bot_factory,
                deployment_start_block = config.start_block,
                duplicate_policy = %config.duplicate_policy,
                "Configuration loaded from deployment"
            );
            config
        }
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            indexer_reporting::capture_error(&e, None);
            std::process::exit(1);
        }
    };

    // Initialize database (optional - only if DATABASE_URL is set)
    let mut resume_block = None;
    let db_pool = match DatabaseConfig::from_env() {
        Some(db_config) => match DatabasePool::new(&db_config).await {
            Ok(pool) => {
                if let Err(e) = pool.migrate().await {
                    error!(error = %e, "Failed to run database migrations");
                    std::process::exit(1);
                }
                info!("Database connected and migrations applied");

                match SyncStateRepository::get_last_synced_block(pool.inner(), config.chain_id as i64)
                    .await
                {
                    Ok(Some(last_block)) => {
                        info!(
                            last_synced_block = last_block,
                            deployment_start_block = config.start_block,
                            "Resuming from database sync state"
                        );
                        resume_block = Some(last_block);
                    }
                    Ok(None) => {
                        info!(
                            start_block = config.start_block,
                            "No previous sync state found, starting from deployment config"
                        );
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to query sync state, using deployment config");
                    }
                }
                Some(Arc::new(pool))
            }
            Err(e) => {
                error!(error = %e, "Failed to connect to database");
                std::process::exit(1);
            }
        },
        None => {
            warn!("DATABASE_URL not set, running without persistence");
            None
        }
    };

    // Resume from the next block after the last synced one
    let store = Arc::new(match resume_block {
        Some(last_block) => IndexerStore::starting_at(last_block + 1),
        None => IndexerStore::starting_at(config.start_block),
    });

    // Restore entities so replayed logs are recognised and trades keep being attributed
    if let Some(db) = db_pool.as_ref() {
        restore_entities(db, &store, config.chain_id).await;
    }

    // Initialize cache (optional - only if a cache host is configured)
    let bot_cache = match RedisConfig::from_env(&config.services) {
        Some(redis_config) => {
            match RedisConnection::new(redis_config).await {
                Ok(conn) => {
                    info!("Redis connected for bot state cache");
                    Some(BotStateCache::new(Arc::new(conn)))
                }
                Err(e) => {
                    error!(error = %e, "Failed to connect to Redis");
                    std::process::exit(1);
                }
            }
        }
        None => {
            warn!("REDIS_HOST not set, running without bot state cache");
            None
        }
    };

    let mut engine = match SyncEngine::new(config.clone(), store.clone()) {
        Ok(engine) => engine,
        Err(e) => {
            error!(error = %e, "Failed to create sync engine");
            std::process::exit(1);
        }
    };

    // Wire up sinks to the event processor
    let mut composite_sink = CompositeSink::new();

    if let Some(db) = db_pool.clone() {
        composite_sink.add_sink(Arc::new(DatabaseSink::new(db, config.chain_id)));
        info!("Database sink configured");
    }

    if let Some(cache) = bot_cache {
        composite_sink.add_sink(Arc::new(CacheSink::new(cache)));
        info!("Cache sink configured");
    }

    match PinningConfig::from_services(&config.services) {
        Some(pinning_config) => {
            let client = PinataClient::new(pinning_config);
            composite_sink.add_sink(Arc::new(PinningSink::new(client)));
            info!("Pinning sink configured");
        }
        None => warn!("Pinning credentials not set, bot metadata will not be pinned"),
    }

    if !composite_sink.is_empty() {
        info!(sinks = composite_sink.len(), "Event sinks configured and wired to processor");
        engine.processor().set_sinks(composite_sink).await;
    }

    // Setup shutdown signal
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);

    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Shutdown signal received (Ctrl+C)");
        shutdown_tx_clone.send(()).ok();
    });

    // Start Metrics server (if enabled)
    if std::env::var("METRICS_PORT").is_ok() || std::env::var("METRICS_ENABLED").is_ok() {
        let metrics_server = MetricsServer::new(MetricsConfig::from_env());
        tokio::spawn(async move {
            if let Err(e) = metrics_server.run().await {
                error!(error = %e, "Metrics server error");
            }
        });
        info!("Metrics server started");
    }

    // Spawn status printer. The database sink persists the cursor after every window
    let store_clone = store.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(30));
        loop {
            interval.tick().await;
            let current_block = {
                let state = store_clone.sync_state.read().await;
                info!(
                    mode = ?state.mode,
                    last_block = state.last_synced_block,
                    bots = store_clone.bots.count(),
                    owners = store_clone.owners.count(),
                    trades = store_clone.trades.count(),
                    orphaned_trades = state.stats.orphaned_trades,
                    events = state.stats.total_events_processed,
                    "Status"
                );
                state.last_synced_block()
            };

            indexer_metrics::gauges::set_current_block(current_block);
            indexer_metrics::gauges::set_memory_bots(store_clone.bots.count());
            indexer_metrics::gauges::set_memory_owners(store_clone.owners.count());
            indexer_metrics::gauges::set_memory_trades(store_clone.trades.count());
        }
    });

    let run_result = engine.run(shutdown_rx).await;
    if let Err(e) = run_result.as_ref() {
        error!(error = %e, "Sync engine error");
        indexer_reporting::capture_error(e, None);
    }

    info!("Shutting down...");

    // Persist the cursor on both clean and failed exits before closing
    if let Some(db) = db_pool.as_ref() {
        let (final_block, timestamp) = {
            let state = store.sync_state.read().await;
            (state.last_synced_block, state.stats.last_block_timestamp)
        };
        if final_block > 0 {
            match SyncStateRepository::set_sync_state(
                db.inner(),
                config.chain_id as i64,
                final_block,
                timestamp,
            )
            .await
            {
                Ok(()) => info!(block = final_block, "Final sync state persisted"),
                Err(e) => warn!(error = %e, "Failed to persist final sync state"),
            }
        }
        db.close().await;
        info!("Database connections closed");
    }

    if run_result.is_err() {
        std::process::exit(1);
    }

    indexer_reporting::capture_message("Trading bot indexer stopped", Severity::Info);
    info!("Trading bot indexer shutdown complete");
    Ok(())
}

/// Load persisted bots, owners and trades into the in-memory store
async fn restore_entities(db: &DatabasePool, store: &IndexerStore, chain_id: u64) {
    match BotRepository::get_all(db.inner(), chain_id as i64).await {
        Ok(rows) => {
            let bots = rows.into_iter().filter_map(|row| {
                let id = row.id.clone();
                row.into_bot()
                    .map_err(|e| warn!(bot = %id, error = %e, "Skipping unreadable bot row"))
                    .ok()
            });
            let count = store.bots.bulk_insert(bots);
            info!(bots_loaded = count, "Restored bots from database into memory");
        }
        Err(e) => warn!(error = %e, "Failed to load bots from database, starting with empty bot store"),
    }

    match OwnerRepository::get_all(db.inner(), chain_id as i64).await {
        Ok(rows) => {
            let owners = rows.into_iter().filter_map(|row| {
                let address = row.address.clone();
                row.into_owner()
                    .map_err(|e| warn!(owner = %address, error = %e, "Skipping unreadable owner row"))
                    .ok()
            });
            let count = store.owners.bulk_insert(owners);
            info!(owners_loaded = count, "Restored owners from database into memory");
        }
        Err(e) => warn!(error = %e, "Failed to load owners from database"),
    }

    match TradeRepository::get_all(db.inner(), chain_id as i64).await {
        Ok(rows) => {
            let trades = rows.into_iter().filter_map(|row| {
                let id = row.id.clone();
                row.into_trade()
                    .map_err(|e| warn!(trade = %id, error = %e, "Skipping unreadable trade row"))
                    .ok()
            });
            let count = store.trades.bulk_insert(trades);
            info!(trades_loaded = count, "Restored trades from database into memory");
        }
        Err(e) => warn!(error = %e, "Failed to load trades from database"),
    }
}
