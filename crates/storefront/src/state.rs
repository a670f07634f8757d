//! Application state shared across handlers.

use std::sync::Arc;

use moka::future::Cache;
use tower_sessions::Session;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::config::StorefrontConfig;
use crate::controller::ShopController;
use crate::error::AppError;
use crate::middleware::session::{MAX_SESSIONS, keys};
use crate::source::{self, ProductSource};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the product source and every live shopper's controller.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    source: Arc<dyn ProductSource>,
    shops: Cache<String, Arc<ShopController>>,
}

impl AppState {
    /// Create application state with the product source the config describes.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let source = source::from_config(&config.source);
        Self::with_source(config, source)
    }

    /// Create application state around an explicit product source.
    #[must_use]
    pub fn with_source(config: StorefrontConfig, source: Arc<dyn ProductSource>) -> Self {
        let shops = Cache::builder()
            .max_capacity(MAX_SESSIONS)
            .time_to_idle(config.session_idle)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                source,
                shops,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the controller for this session, creating it on first use.
    ///
    /// A new controller loads the catalog before it is handed out, so the
    /// first request of a session waits for the product source once.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read or written.
    #[instrument(skip_all)]
    pub async fn shop(&self, session: &Session) -> Result<Arc<ShopController>, AppError> {
        let shop_id = match session.get::<String>(keys::SHOP_ID).await? {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4().to_string();
                session.insert(keys::SHOP_ID, &id).await?;
                id
            }
        };

        let controller = self
            .inner
            .shops
            .get_with(shop_id, async {
                let controller = Arc::new(ShopController::new(
                    Arc::clone(&self.inner.source),
                    self.inner.config.confirmation_delay,
                ));
                if let Err(e) = controller.load_catalog().await {
                    warn!(error = %e, "Starting session without a catalog");
                }
                controller
            })
            .await;

        Ok(controller)
    }
}
