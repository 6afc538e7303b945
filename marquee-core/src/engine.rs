use std::fmt;
use std::sync::Arc;

use marquee_config::Config;
use marquee_config::validation::apply_guard_rails;
use marquee_model::{Availability, ContentItem};
use parking_lot::{Mutex, RwLock};
use tracing::{info, warn};

use crate::api::{CatalogApi, HttpCatalogClient};
use crate::catalog::{CatalogCache, RefreshReport, RefreshScheduler};
use crate::content::ContentFetcher;
use crate::error::{MarqueeError, Result};
use crate::notify::NotificationService;
use crate::requests::{AvailabilityStore, RequestOutcome, RequestWorkflow};
use crate::router::{RouteOutcome, ViewRouter};

/// Owns every component and exposes the explicit lifecycle.
pub struct Engine {
    config: RwLock<Arc<Config>>,
    http: Option<Arc<HttpCatalogClient>>,
    cache: Arc<CatalogCache>,
    router: ViewRouter,
    workflow: RequestWorkflow,
    store: Arc<AvailabilityStore>,
    notifications: Arc<NotificationService>,
    scheduler: Mutex<Option<RefreshScheduler>>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("service", &self.config.read().service.url.as_str())
            .field("scheduler_running", &self.is_running())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Build an engine that talks to the configured service over HTTP.
    pub fn new(config: Config) -> Result<Self> {
        apply_guard_rails(&config)?;
        let http = Arc::new(HttpCatalogClient::new(&config.service, &config.http)?);
        let api: Arc<dyn CatalogApi> = http.clone();
        Ok(Self::assemble(config, api, Some(http)))
    }

    /// Build an engine on top of any [`CatalogApi`] implementation.
    pub fn with_api(config: Config, api: Arc<dyn CatalogApi>) -> Result<Self> {
        apply_guard_rails(&config)?;
        Ok(Self::assemble(config, api, None))
    }

    fn assemble(
        config: Config,
        api: Arc<dyn CatalogApi>,
        http: Option<Arc<HttpCatalogClient>>,
    ) -> Self {
        let cache = Arc::new(CatalogCache::new(Arc::clone(&api)));
        let store = Arc::new(AvailabilityStore::new());
        let notifications = Arc::new(NotificationService::new(&config.notifications));
        let router = ViewRouter::new(
            Arc::clone(&cache),
            ContentFetcher::new(Arc::clone(&api)),
            Arc::clone(&store),
            config.display.clone(),
        );
        let workflow = RequestWorkflow::new(
            api,
            Arc::clone(&store),
            Arc::clone(&notifications),
        );

        Self {
            config: RwLock::new(Arc::new(config)),
            http,
            cache,
            router,
            workflow,
            store,
            notifications,
            scheduler: Mutex::new(None),
        }
    }

    pub fn config(&self) -> Arc<Config> {
        Arc::clone(&self.config.read())
    }

    pub fn cache(&self) -> &Arc<CatalogCache> {
        &self.cache
    }

    pub fn router(&self) -> &ViewRouter {
        &self.router
    }

    pub fn workflow(&self) -> &RequestWorkflow {
        &self.workflow
    }

    pub fn store(&self) -> &Arc<AvailabilityStore> {
        &self.store
    }

    pub fn notifications(&self) -> &Arc<NotificationService> {
        &self.notifications
    }

    pub fn is_running(&self) -> bool {
        self.scheduler
            .lock()
            .as_ref()
            .is_some_and(RefreshScheduler::is_running)
    }

    /// Start the refresh scheduler, which refreshes immediately and then on
    /// the configured period. Calling this while running does nothing.
    pub fn start(&self) {
        let mut scheduler = self.scheduler.lock();
        if scheduler.as_ref().is_some_and(RefreshScheduler::is_running) {
            return;
        }
        let period = self.config.read().refresh.interval();
        *scheduler = Some(RefreshScheduler::start(Arc::clone(&self.cache), period));
    }

    /// Run one refresh cycle inline.
    pub async fn refresh(&self) -> RefreshReport {
        self.cache.refresh().await
    }

    pub async fn navigate(&self, path: &str) -> RouteOutcome {
        self.router.navigate(path).await
    }

    pub async fn submit(&self, item: &ContentItem) -> Result<RequestOutcome> {
        self.workflow.submit(item).await
    }

    pub async fn reconcile(&self, item: &ContentItem) -> Result<Availability> {
        self.workflow.reconcile(item).await
    }

    /// Swap in a new configuration.
    ///
    /// A configuration that fails validation is rejected before anything
    /// changes. Display lists and notification settings apply immediately. A
    /// changed period re-arms the scheduler. A changed period or credential
    /// triggers an out-of-band refresh, returned as `true`.
    pub async fn apply_config(&self, new: Config) -> Result<bool> {
        let warnings = apply_guard_rails(&new)?;
        for warning in warnings.iter() {
            warn!(message = %warning.message, "configuration warning");
        }

        let old = self.config();
        let refresh_needed = Config::refresh_triggering_change(&old, &new);
        let period_changed = old.refresh.interval_hours != new.refresh.interval_hours;

        if let Some(http) = &self.http {
            http.reconfigure(&new.service, &new.http)
                .map_err(MarqueeError::from)?;
        }
        self.router.set_display(new.display.clone());
        self.notifications.reconfigure(&new.notifications);

        let period = new.refresh.interval();
        *self.config.write() = Arc::new(new);

        let scheduled = {
            let scheduler = self.scheduler.lock();
            match scheduler.as_ref() {
                Some(running) if running.is_running() => {
                    if period_changed {
                        running.set_period(period);
                    }
                    if refresh_needed {
                        running.trigger();
                    }
                    true
                }
                _ => false,
            }
        };

        if refresh_needed {
            info!(period_changed, "configuration change requires a catalog refresh");
            if !scheduled {
                self.cache.refresh().await;
            }
        }

        Ok(refresh_needed)
    }

    /// Stop the scheduler, aborting any in-flight refresh.
    pub async fn shutdown(&self) {
        let scheduler = self.scheduler.lock().take();
        if let Some(scheduler) = scheduler {
            scheduler.shutdown().await;
        }
    }
}
