use railbook_catalog::SeatSelection;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

struct Entry {
    selection: SeatSelection,
    touched_at: Instant,
}

/// Seat selections in progress, keyed by selection id. A selection nobody
/// touched for `ttl` is dropped by `evict_stale`.
pub struct SelectionStore {
    entries: RwLock<HashMap<Uuid, Entry>>,
    ttl: Duration,
}

impl SelectionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn insert(&self, selection: SeatSelection) -> Uuid {
        let selection_id = Uuid::new_v4();
        self.restore(selection_id, selection).await;
        selection_id
    }

    pub async fn get(&self, selection_id: &Uuid) -> Option<SeatSelection> {
        self.update(selection_id, |selection| selection.clone()).await
    }

    /// Run `f` on the selection, refreshing its idle timer
    pub async fn update<R>(&self, selection_id: &Uuid, f: impl FnOnce(&mut SeatSelection) -> R) -> Option<R> {
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(selection_id)?;
        entry.touched_at = Instant::now();
        Some(f(&mut entry.selection))
    }

    /// Remove the selection so only one caller can reserve it
    pub async fn take(&self, selection_id: &Uuid) -> Option<SeatSelection> {
        self.entries.write().await.remove(selection_id).map(|entry| entry.selection)
    }

    /// Put a selection back, e.g. after a failed reservation
    pub async fn restore(&self, selection_id: Uuid, selection: SeatSelection) {
        self.entries.write().await.insert(
            selection_id,
            Entry {
                selection,
                touched_at: Instant::now(),
            },
        );
    }

    pub async fn evict_stale(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.touched_at.elapsed() < self.ttl);
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use railbook_core::Seat;

    fn selection() -> SeatSelection {
        SeatSelection::new(1, vec![Seat::new(1, "A1", 550), Seat::new(2, "A2", 550)])
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_selections_are_evicted() {
        let store = SelectionStore::new(Duration::from_secs(300));
        let idle = store.insert(selection()).await;
        let active = store.insert(selection()).await;

        tokio::time::sleep(Duration::from_secs(200)).await;
        store.update(&active, |s| s.toggle(1)).await.unwrap().unwrap();
        tokio::time::sleep(Duration::from_secs(100)).await;

        assert_eq!(store.evict_stale().await, 1);
        assert!(store.get(&idle).await.is_none());
        assert_eq!(store.get(&active).await.unwrap().selected_count(), 1);
    }

    #[tokio::test]
    async fn test_take_hands_out_a_selection_once() {
        let store = SelectionStore::new(Duration::from_secs(300));
        let id = store.insert(selection()).await;

        let taken = store.take(&id).await.unwrap();
        assert!(store.take(&id).await.is_none());
        assert!(store.is_empty().await);

        store.restore(id, taken).await;
        assert_eq!(store.len().await, 1);
    }
}
