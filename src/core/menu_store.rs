use crate::domain::model::{MenuInfo, MenuSnapshot};
use crate::domain::ports::MenuSource;
use crate::utils::error::{GachaError, Result};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Holds the current menu snapshot.
///
/// Readers clone an `Arc` to the snapshot, so a draw keeps seeing the menu it
/// started with while a refresh swaps in the next one.
#[derive(Debug, Default)]
pub struct MenuStore {
    current: RwLock<Arc<MenuSnapshot>>,
}

impl MenuStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: MenuSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub fn snapshot(&self) -> Arc<MenuSnapshot> {
        self.current.read().clone()
    }

    pub fn replace(&self, snapshot: MenuSnapshot) {
        *self.current.write() = Arc::new(snapshot);
    }

    /// Fetches and publishes a new snapshot. On error the current one is kept.
    pub async fn try_load(&self, source: &dyn MenuSource) -> Result<usize> {
        let info = source.fetch().await?;
        check_menu(&info)?;

        let snapshot = MenuSnapshot::from(info);
        let count = snapshot.len();
        let last_updated = snapshot.last_updated();
        self.replace(snapshot);

        tracing::info!(
            "🍽️ Menu loaded from {}: {} items (last updated {:?})",
            source.describe(),
            count,
            last_updated
        );
        Ok(count)
    }

    /// Fail-soft load used by the refresher: errors are logged, never returned.
    pub async fn load(&self, source: &dyn MenuSource) -> bool {
        match self.try_load(source).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(
                    "⚠️ Menu refresh from {} failed, keeping {} cached items: {}",
                    source.describe(),
                    self.snapshot().len(),
                    e
                );
                false
            }
        }
    }

    /// Reloads from `source` every `interval` until cancelled.
    pub fn spawn_refresher(
        self: &Arc<Self>,
        source: Arc<dyn MenuSource>,
        interval: Duration,
    ) -> MenuRefresher {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let store = Arc::clone(self);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; startup already loaded.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        tracing::debug!("Menu refresher stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        tracing::info!("Updating menu");
                        store.load(source.as_ref()).await;
                    }
                }
            }
        });

        MenuRefresher { cancel, handle }
    }
}

fn check_menu(info: &MenuInfo) -> Result<()> {
    if let Some(item) = info.menus.iter().find(|item| item.price < 0) {
        return Err(GachaError::MenuError {
            message: format!("item {} ({}) has negative price {}", item.id, item.name, item.price),
        });
    }
    Ok(())
}

/// Handle to the background refresh task.
pub struct MenuRefresher {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl MenuRefresher {
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            tracing::error!("Menu refresher task failed: {}", e);
        }
    }
}
