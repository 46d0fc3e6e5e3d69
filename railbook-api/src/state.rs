use railbook_catalog::{CatalogSettings, MockTrainApi};
use railbook_core::{
    AuthApi, BookingApi, Latency, Notifier, SeededRandom, SessionContext, SystemClock, TracingNotifier, TrainApi,
};
use railbook_order::{BookingApiSettings, MockBookingApi, WizardDeps, WizardRegistry, WizardSettings};
use railbook_store::{ApiClient, Config, HttpAuthApi};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::selection_store::SelectionStore;

#[derive(Clone)]
pub struct AppState {
    pub trains: Arc<dyn TrainApi>,
    pub bookings: Arc<dyn BookingApi>,
    pub auth: Arc<dyn AuthApi>,
    pub wizards: Arc<WizardRegistry>,
    pub selections: Arc<SelectionStore>,
    pub notifier: Arc<dyn Notifier>,
    pub session: Arc<SessionContext>,
    pub max_seats: usize,
}

impl AppState {
    /// Wire the mock services, the auth client and the wizard registry
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let session = Arc::new(SessionContext::new());
        let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);
        let random = Arc::new(SeededRandom::from_seed_option(config.catalog.seed));
        let clock = Arc::new(SystemClock);

        let trains = Arc::new(MockTrainApi::new(
            CatalogSettings {
                search_latency: Latency::from_millis(config.catalog.search_delay_ms),
                seat_latency: Latency::from_millis(config.catalog.seat_delay_ms),
                booked_probability: config.catalog.booked_probability,
            },
            random.clone(),
        ));

        let bookings: Arc<dyn BookingApi> = Arc::new(MockBookingApi::new(
            BookingApiSettings {
                reserve_latency: Latency::from_millis(config.catalog.reserve_delay_ms),
                otp_latency: Latency::from_millis(config.wizard.otp_delay_ms),
                payment_latency: Latency::from_millis(config.wizard.payment_delay_ms),
                ..BookingApiSettings::default()
            },
            random,
            clock.clone(),
        ));

        let client = ApiClient::new(
            config.api.base_url.clone(),
            Duration::from_secs(config.api.timeout_seconds),
            session.clone(),
        )?;

        let wizards = Arc::new(WizardRegistry::new(
            WizardDeps {
                api: bookings.clone(),
                notifier: notifier.clone(),
                session: session.clone(),
                clock,
            },
            WizardSettings {
                countdown_seconds: config.wizard.countdown_seconds,
                test_otp: config.wizard.test_otp.clone(),
                retention: Duration::from_secs(config.wizard.retention_seconds),
            },
        ));

        Ok(Self {
            trains,
            bookings,
            auth: Arc::new(HttpAuthApi::new(client)),
            wizards,
            selections: Arc::new(SelectionStore::new(Duration::from_secs(
                config.catalog.selection_ttl_seconds,
            ))),
            notifier,
            session,
            max_seats: config.catalog.max_seats,
        })
    }

    /// Swap the auth backend, e.g. for an in-process fake
    pub fn with_auth(mut self, auth: Arc<dyn AuthApi>) -> Self {
        self.auth = auth;
        self
    }

    /// Periodically drop stale wizards and abandoned selections
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let wizards = self.wizards.clone();
        let selections = self.selections.clone();
        let period = period.max(Duration::from_secs(1));

        tokio::spawn(async move {
            let mut ticks = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                ticks.tick().await;
                let wizards_evicted = wizards.evict_stale().await;
                let selections_evicted = selections.evict_stale().await;
                if wizards_evicted + selections_evicted > 0 {
                    tracing::info!(wizards = wizards_evicted, selections = selections_evicted, "swept stale entries");
                }
            }
        })
    }
}
