//! Committed time selection
//!
//! The single owner of the `(selected_time, time_unit)` pair every screen
//! reads, plus whether the full-screen selector is open. The wheel never
//! writes here directly: it emits [`WheelEffect`]s which the host forwards
//! through [`TimeSelectorStore::apply`].

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use time_wheel::{TimeUnit, WheelEffect};
use tokio::sync::{broadcast, watch, RwLock};

/// Snapshot of the committed selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSelection {
    /// Committed time
    pub selected_time: NaiveDateTime,
    /// Committed granularity
    pub time_unit: TimeUnit,
    /// Whether the selector overlay is showing
    pub is_open: bool,
}

/// Events broadcast when the selection changes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeSelectionEvent {
    /// A new time was committed
    TimeChanged(NaiveDateTime),
    /// A new granularity was committed
    UnitChanged(TimeUnit),
    /// The selector was opened
    Opened,
    /// The selector was closed
    Closed,
}

/// Owner of the committed time selection
///
/// # Example
///
/// ```no_run
/// use app_state::TimeSelectorStore;
/// use time_wheel::TimeUnit;
///
/// #[tokio::main]
/// async fn main() {
///     let store = TimeSelectorStore::starting_now();
///     let mut rx = store.subscribe();
///
///     store.set_time_unit(TimeUnit::Week).await;
///     rx.changed().await.unwrap();
///     assert_eq!(rx.borrow().time_unit, TimeUnit::Week);
/// }
/// ```
pub struct TimeSelectorStore {
    /// Internal state
    state: Arc<RwLock<TimeSelection>>,
    /// Snapshot sender
    selection_tx: watch::Sender<TimeSelection>,
    /// Event broadcaster
    events_tx: broadcast::Sender<TimeSelectionEvent>,
}

impl TimeSelectorStore {
    /// Create a closed store with the given selection
    pub fn new(selected_time: NaiveDateTime, time_unit: TimeUnit) -> Self {
        let initial = TimeSelection { selected_time, time_unit, is_open: false };
        let (selection_tx, _) = watch::channel(initial);
        let (events_tx, _) = broadcast::channel(16);

        TimeSelectorStore {
            state: Arc::new(RwLock::new(initial)),
            selection_tx,
            events_tx,
        }
    }

    /// Create a store selecting the current local time at day granularity
    pub fn starting_now() -> Self {
        Self::new(chrono::Local::now().naive_local(), TimeUnit::Day)
    }

    /// Current selection
    pub async fn selection(&self) -> TimeSelection {
        *self.state.read().await
    }

    /// Commit a new time
    pub async fn set_selected_time(&self, time: NaiveDateTime) {
        self.update(TimeSelectionEvent::TimeChanged(time), |s| {
            if s.selected_time == time {
                return false;
            }
            s.selected_time = time;
            true
        })
        .await;
    }

    /// Commit a new granularity
    pub async fn set_time_unit(&self, unit: TimeUnit) {
        self.update(TimeSelectionEvent::UnitChanged(unit), |s| {
            if s.time_unit == unit {
                return false;
            }
            s.time_unit = unit;
            true
        })
        .await;
    }

    /// Show the selector overlay
    pub async fn open_selector(&self) {
        self.update(TimeSelectionEvent::Opened, |s| !std::mem::replace(&mut s.is_open, true))
            .await;
    }

    /// Hide the selector overlay
    pub async fn close_selector(&self) {
        self.update(TimeSelectionEvent::Closed, |s| std::mem::replace(&mut s.is_open, false))
            .await;
    }

    /// Apply an effect emitted by the wheel or the overlay
    ///
    /// Scroll requests are meant for the host view and are ignored.
    pub async fn apply(&self, effect: &WheelEffect) {
        match *effect {
            WheelEffect::TimeChanged(time) => self.set_selected_time(time).await,
            WheelEffect::TimeUnitChanged(unit) => self.set_time_unit(unit).await,
            WheelEffect::ScrollTo { .. } => {}
        }
    }

    /// Subscribe to selection snapshots
    pub fn subscribe(&self) -> watch::Receiver<TimeSelection> {
        self.selection_tx.subscribe()
    }

    /// Subscribe to change events
    pub fn subscribe_events(&self) -> broadcast::Receiver<TimeSelectionEvent> {
        self.events_tx.subscribe()
    }

    async fn update<F>(&self, event: TimeSelectionEvent, mutate: F)
    where
        F: FnOnce(&mut TimeSelection) -> bool,
    {
        let mut state = self.state.write().await;
        if !mutate(&mut *state) {
            return;
        }
        let snapshot = *state;
        drop(state);

        tracing::debug!(?event, "Time selection updated");
        let _ = self.selection_tx.send(snapshot);
        let _ = self.events_tx.send(event);
    }
}

impl Default for TimeSelectorStore {
    fn default() -> Self {
        Self::starting_now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, d)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    #[tokio::test]
    async fn test_initial_selection() {
        let store = TimeSelectorStore::new(day(10), TimeUnit::Day);
        let selection = store.selection().await;
        assert_eq!(selection.selected_time, day(10));
        assert_eq!(selection.time_unit, TimeUnit::Day);
        assert!(!selection.is_open);
    }

    #[tokio::test]
    async fn test_set_time_notifies_once() {
        let store = TimeSelectorStore::new(day(10), TimeUnit::Day);
        let mut events = store.subscribe_events();

        store.set_selected_time(day(13)).await;
        store.set_selected_time(day(13)).await;

        assert_eq!(events.recv().await.unwrap(), TimeSelectionEvent::TimeChanged(day(13)));
        assert!(events.try_recv().is_err());
        assert_eq!(store.selection().await.selected_time, day(13));
    }

    #[tokio::test]
    async fn test_subscription_sees_unit_change() {
        let store = TimeSelectorStore::new(day(10), TimeUnit::Day);
        let mut rx = store.subscribe();
        assert_eq!(rx.borrow().time_unit, TimeUnit::Day);

        store.set_time_unit(TimeUnit::Month).await;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().time_unit, TimeUnit::Month);
    }

    #[tokio::test]
    async fn test_open_and_close() {
        let store = TimeSelectorStore::new(day(10), TimeUnit::Day);
        let mut events = store.subscribe_events();

        store.close_selector().await;
        store.open_selector().await;
        store.open_selector().await;
        assert!(store.selection().await.is_open);
        store.close_selector().await;

        assert_eq!(events.recv().await.unwrap(), TimeSelectionEvent::Opened);
        assert_eq!(events.recv().await.unwrap(), TimeSelectionEvent::Closed);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_apply_wheel_effects() {
        let store = TimeSelectorStore::new(day(10), TimeUnit::Day);
        let mut events = store.subscribe_events();

        store.apply(&WheelEffect::ScrollTo { position: 120.0, animated: true }).await;
        store.apply(&WheelEffect::TimeChanged(day(12))).await;
        store.apply(&WheelEffect::TimeUnitChanged(TimeUnit::Week)).await;

        assert_eq!(events.recv().await.unwrap(), TimeSelectionEvent::TimeChanged(day(12)));
        assert_eq!(events.recv().await.unwrap(), TimeSelectionEvent::UnitChanged(TimeUnit::Week));
        let selection = store.selection().await;
        assert_eq!(selection.selected_time, day(12));
        assert_eq!(selection.time_unit, TimeUnit::Week);
    }
}
