use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use tokio::sync::broadcast::error::RecvError;

use crate::core::{BackgroundTasks, Config, Result, StorageKind, TaskKind};
use crate::orders::{
    FloorManager, LifecycleSimulator, MemoryTableStore, RandomAdvancement, RedbTableStore,
    TableStore,
};
use crate::pricing::PromotionEngine;
use crate::services::{AssistantService, MenuCatalog, NotificationInbox};

/// Server state - shared handles to every service
///
/// Cloning is cheap (all services are behind `Arc`).
///
/// | Field | Type | Purpose |
/// |------|------|------|
/// | config | Config | configuration (immutable) |
/// | catalog | Arc<MenuCatalog> | the menu |
/// | manager | Arc<FloorManager> | tables and orders, single mutation authority |
/// | menu_promotions | Arc<PromotionEngine> | code rules for the menu price preview |
/// | assistant | Arc<AssistantService> | chat advisor |
/// | notifications | Arc<NotificationInbox> | staff inbox fed by floor events |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub catalog: Arc<MenuCatalog>,
    pub manager: Arc<FloorManager>,
    pub menu_promotions: Arc<PromotionEngine>,
    pub assistant: Arc<AssistantService>,
    pub notifications: Arc<NotificationInbox>,
    started_at: Instant,
}

impl ServerState {
    /// Wire the services together over an already opened table store
    pub fn with_store(config: &Config, store: Arc<dyn TableStore>) -> Result<Self> {
        config.warn_on_promotion_bound_mismatch();

        let catalog = Arc::new(MenuCatalog::default());
        let manager = Arc::new(FloorManager::new(
            store,
            catalog.clone(),
            PromotionEngine::for_tables(config.promo_table_max_percent),
        )?);
        let menu_promotions = Arc::new(PromotionEngine::for_menu(config.promo_menu_max_percent));
        let assistant = Arc::new(AssistantService::from_config(config, manager.clone()));
        let notifications = Arc::new(NotificationInbox::new(
            manager.subscribe(),
            config.notification_capacity,
        ));

        Ok(Self {
            config: config.clone(),
            catalog,
            manager,
            menu_promotions,
            assistant,
            notifications,
            started_at: Instant::now(),
        })
    }

    /// Initialize server state
    ///
    /// In order:
    /// 1. Table store (redb file under `work_dir`, or memory)
    /// 2. FloorManager (seeds the floor on an empty store)
    /// 3. Catalog, promotion rules, assistant and notification inbox
    pub async fn initialize(config: &Config) -> Result<Self> {
        let store: Arc<dyn TableStore> = match config.storage {
            StorageKind::Redb => {
                let path = config.database_path();
                let store = RedbTableStore::open(&path)
                    .with_context(|| format!("Failed to open table store {}", path.display()))?;
                tracing::info!(path = %path.display(), "Table store opened");
                Arc::new(store)
            }
            StorageKind::Memory => {
                tracing::warn!("Using in-memory table store, nothing survives a restart");
                Arc::new(MemoryTableStore::new())
            }
        };
        Self::with_store(config, store)
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Start the simulator and the event log listener
    ///
    /// The returned registry must be shut down by the caller.
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        if self.config.simulator_enabled {
            let simulator = LifecycleSimulator::new(
                self.manager.clone(),
                Arc::new(RandomAdvancement::new(
                    self.config.simulator_advance_probability,
                )),
                Duration::from_millis(self.config.simulator_tick_ms),
            );
            let token = tasks.shutdown_token();
            tasks.spawn("lifecycle_simulator", TaskKind::Periodic, simulator.run(token));
        } else {
            tracing::info!("Lifecycle simulator disabled");
        }

        let mut rx = self.manager.subscribe();
        let token = tasks.shutdown_token();
        tasks.spawn("floor_event_log", TaskKind::Listener, async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => return,
                    received = rx.recv() => match received {
                        Ok(event) => tracing::info!(
                            target: "floor_events",
                            sequence = event.sequence,
                            table_id = event.table_id,
                            event = event.payload.name(),
                            "{}",
                            event.payload
                        ),
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Event log lagged behind");
                        }
                        Err(RecvError::Closed) => return,
                    }
                }
            }
        });

        tasks.log_summary();
        tasks
    }
}
