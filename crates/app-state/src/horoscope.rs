//! Horoscope reading that follows the committed time
//!
//! Each committed date triggers a fetch through the [`HoroscopeProvider`].
//! Fetches may overlap when the user commits several dates quickly; only
//! the most recently requested one is allowed to land.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use app_core::{BirthData, DailyHoroscope, HoroscopeError, HoroscopeProvider};
use chrono::NaiveDateTime;
use tokio::sync::{oneshot, watch, RwLock};
use tokio::task::JoinHandle;

use crate::error::{Result, StoreError};
use crate::time_selector::TimeSelectorStore;

/// Lifecycle of the reading
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FeedState {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Fetching the reading for `date`
    Loading {
        /// Requested date
        date: NaiveDateTime,
    },
    /// Reading available
    Ready(Arc<DailyHoroscope>),
    /// Fetching failed
    Failed {
        /// Requested date
        date: NaiveDateTime,
        /// Error message for display
        message: String,
        /// Whether offering a retry makes sense
        retryable: bool,
    },
}

impl FeedState {
    /// Whether a fetch is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, FeedState::Loading { .. })
    }

    /// The reading, if ready
    pub fn reading(&self) -> Option<&DailyHoroscope> {
        match self {
            FeedState::Ready(reading) => Some(reading.as_ref()),
            _ => None,
        }
    }
}

/// Horoscope banner state
pub struct HoroscopeFeed {
    provider: Arc<dyn HoroscopeProvider>,
    birth: RwLock<Option<BirthData>>,
    /// Incremented for every requested load
    generation: AtomicU64,
    state_tx: watch::Sender<FeedState>,
}

impl HoroscopeFeed {
    /// Create an idle feed
    pub fn new(provider: Arc<dyn HoroscopeProvider>) -> Self {
        let (state_tx, _) = watch::channel(FeedState::Idle);
        Self {
            provider,
            birth: RwLock::new(None),
            generation: AtomicU64::new(0),
            state_tx,
        }
    }

    /// Set the birth data readings are cast from
    pub async fn set_birth_data(&self, birth: BirthData) {
        *self.birth.write().await = Some(birth);
    }

    /// Current state
    pub fn state(&self) -> FeedState {
        self.state_tx.borrow().clone()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state_tx.subscribe()
    }

    /// Fetch the reading for `date`
    ///
    /// Returns `Ok(())` without touching the state when a newer load was
    /// requested while this one was in flight.
    pub async fn load(&self, date: NaiveDateTime) -> Result<()> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(birth) = self.birth.read().await.clone() else {
            self.fail(date, &HoroscopeError::MissingBirthData);
            return Err(HoroscopeError::MissingBirthData.into());
        };

        let _ = self.state_tx.send(FeedState::Loading { date });
        tracing::debug!(%date, generation, "Loading horoscope");

        let result = self.provider.daily_horoscope(&birth, date).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(%date, generation, "Discarding stale horoscope response");
            return Ok(());
        }

        match result {
            Ok(reading) => {
                let _ = self.state_tx.send(FeedState::Ready(Arc::new(reading)));
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%date, %error, "Horoscope fetch failed");
                self.fail(date, &error);
                Err(error.into())
            }
        }
    }

    /// Repeat the last failed load
    pub async fn retry(&self) -> Result<()> {
        let date = match self.state() {
            FeedState::Failed { date, .. } => date,
            _ => return Err(StoreError::NothingToRetry),
        };
        self.load(date).await
    }

    /// Reload whenever `store` commits a new time
    ///
    /// Loads the current selection immediately. Each load runs on its own
    /// task so a slow response never delays the next request. Following
    /// stops when the returned handle is dropped.
    pub fn follow(self: &Arc<Self>, store: &TimeSelectorStore) -> FollowHandle {
        let (stop_tx, mut stop_rx) = oneshot::channel();
        let mut selection_rx = store.subscribe();
        let feed = Arc::clone(self);

        let handle = tokio::spawn(async move {
            let mut last = selection_rx.borrow_and_update().selected_time;
            feed.spawn_load(last);

            loop {
                tokio::select! {
                    changed = selection_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let time = selection_rx.borrow_and_update().selected_time;
                        if time != last {
                            last = time;
                            feed.spawn_load(time);
                        }
                    }
                    _ = &mut stop_rx => {
                        break;
                    }
                }
            }
        });

        FollowHandle { stop_tx: Some(stop_tx), _handle: handle }
    }

    fn spawn_load(self: &Arc<Self>, date: NaiveDateTime) {
        let feed = Arc::clone(self);
        tokio::spawn(async move {
            // Failures are already reflected in the state
            let _ = feed.load(date).await;
        });
    }

    fn fail(&self, date: NaiveDateTime, error: &HoroscopeError) {
        let _ = self.state_tx.send(FeedState::Failed {
            date,
            message: error.to_string(),
            retryable: error.is_retryable(),
        });
    }
}

/// Handle for a running [`HoroscopeFeed::follow`]
///
/// When dropped, following stops.
pub struct FollowHandle {
    stop_tx: Option<oneshot::Sender<()>>,
    _handle: JoinHandle<()>,
}

impl FollowHandle {
    /// Stop following manually
    pub fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for FollowHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}
