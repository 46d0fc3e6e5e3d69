use railbook_core::{Booking, BookingId, Seat};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::session::{WizardDeps, WizardSession, WizardSettings};

/// Open booking wizards, keyed by booking id. In memory only; closing or
/// evicting a wizard discards its booking.
pub struct WizardRegistry {
    sessions: RwLock<HashMap<BookingId, Arc<WizardSession>>>,
    deps: WizardDeps,
    settings: WizardSettings,
}

impl WizardRegistry {
    pub fn new(deps: WizardDeps, settings: WizardSettings) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            deps,
            settings,
        }
    }

    /// Mount the wizard for `booking_id`, or return the one already open.
    /// Without seats the booking falls back to a single default seat.
    pub async fn open(&self, booking_id: BookingId, seats: Option<Vec<Seat>>) -> Arc<WizardSession> {
        if let Some(existing) = self.get(&booking_id).await {
            return existing;
        }

        let now = self.deps.clock.now();
        let booking = match seats {
            Some(seats) if !seats.is_empty() => Booking::new(booking_id, seats, now),
            _ => Booking::fallback(booking_id, now),
        };
        self.mount(booking).await
    }

    /// Mount a wizard for a freshly reserved booking. An earlier wizard for the
    /// same id is replaced.
    pub async fn open_booking(&self, booking: Booking) -> Arc<WizardSession> {
        if let Some(previous) = self.close(&booking.booking_id).await {
            tracing::debug!(booking_id = %previous.booking_id(), "replacing open wizard");
        }
        self.mount(booking).await
    }

    pub async fn get(&self, booking_id: &BookingId) -> Option<Arc<WizardSession>> {
        self.sessions.read().await.get(booking_id).cloned()
    }

    /// Tear down and forget a wizard
    pub async fn close(&self, booking_id: &BookingId) -> Option<Arc<WizardSession>> {
        let removed = self.sessions.write().await.remove(booking_id);
        if let Some(session) = &removed {
            session.teardown();
        }
        removed
    }

    /// Tear down wizards that outlived their retention window. Returns how
    /// many were removed.
    pub async fn evict_stale(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|booking_id, session| {
            if session.is_stale() {
                session.teardown();
                tracing::debug!(%booking_id, "evicting stale booking wizard");
                false
            } else {
                true
            }
        });

        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    async fn mount(&self, booking: Booking) -> Arc<WizardSession> {
        let mut sessions = self.sessions.write().await;
        // Another caller may have mounted it between the read and this write
        if let Some(existing) = sessions.get(&booking.booking_id) {
            return existing.clone();
        }

        let booking_id = booking.booking_id.clone();
        let session = Arc::new(WizardSession::mount(booking, self.deps.clone(), self.settings.clone()));
        sessions.insert(booking_id, session.clone());
        session
    }
}
