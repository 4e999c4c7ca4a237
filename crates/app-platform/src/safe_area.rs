//! Safe-area insets
//!
//! The region of the viewport hidden behind system chrome, reported by the
//! host platform. Hosts whose insets change at runtime (rotation, embedded
//! web views resizing) push updates through [`WatchedInsets`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

/// Platform errors
#[derive(Debug, Error, PartialEq)]
pub enum PlatformError {
    /// An inset was negative or not finite
    #[error("Invalid inset on {edge:?}: {value}")]
    InvalidInset {
        /// Offending edge
        edge: Edge,
        /// Reported value
        value: f32,
    },
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;

/// Viewport edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// Top edge
    Top,
    /// Bottom edge
    Bottom,
    /// Left edge
    Left,
    /// Right edge
    Right,
}

/// Insets in logical pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SafeAreaInsets {
    /// Top inset
    pub top: f32,
    /// Bottom inset
    pub bottom: f32,
    /// Left inset
    pub left: f32,
    /// Right inset
    pub right: f32,
}

impl SafeAreaInsets {
    /// Create validated insets
    pub fn new(top: f32, bottom: f32, left: f32, right: f32) -> Result<Self> {
        let insets = Self { top, bottom, left, right };
        for edge in [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right] {
            let value = insets.get(edge);
            if !value.is_finite() || value < 0.0 {
                return Err(PlatformError::InvalidInset { edge, value });
            }
        }
        Ok(insets)
    }

    /// Inset for one edge
    pub fn get(&self, edge: Edge) -> f32 {
        match edge {
            Edge::Top => self.top,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
            Edge::Right => self.right,
        }
    }

    /// Padding that applies only the given edges
    pub fn padding_for(&self, edges: &[Edge]) -> SafeAreaInsets {
        let pick = |edge| if edges.contains(&edge) { self.get(edge) } else { 0.0 };
        SafeAreaInsets {
            top: pick(Edge::Top),
            bottom: pick(Edge::Bottom),
            left: pick(Edge::Left),
            right: pick(Edge::Right),
        }
    }
}

/// Source of the current safe-area insets
pub trait InsetsProvider: Send + Sync {
    /// Current insets
    fn insets(&self) -> SafeAreaInsets;
}

/// Fixed insets, for hosts without dynamic chrome
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticInsets(pub SafeAreaInsets);

impl InsetsProvider for StaticInsets {
    fn insets(&self) -> SafeAreaInsets {
        self.0
    }
}

/// Insets that the host updates at runtime
pub struct WatchedInsets {
    tx: watch::Sender<SafeAreaInsets>,
}

impl WatchedInsets {
    /// Start from `initial`
    pub fn new(initial: SafeAreaInsets) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Replace the insets, notifying subscribers only on an actual change
    pub fn update(&self, insets: SafeAreaInsets) {
        self.tx.send_if_modified(|current| {
            if *current == insets {
                false
            } else {
                *current = insets;
                true
            }
        });
    }

    /// Subscribe to inset changes
    pub fn subscribe(&self) -> watch::Receiver<SafeAreaInsets> {
        self.tx.subscribe()
    }
}

impl InsetsProvider for WatchedInsets {
    fn insets(&self) -> SafeAreaInsets {
        *self.tx.borrow()
    }
}

/// Top offset for a fixed-position header
pub fn header_safe_area(provider: &dyn InsetsProvider) -> f32 {
    provider.insets().top
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insets_validation() {
        assert!(SafeAreaInsets::new(47.0, 34.0, 0.0, 0.0).is_ok());
        assert_eq!(
            SafeAreaInsets::new(0.0, -1.0, 0.0, 0.0),
            Err(PlatformError::InvalidInset { edge: Edge::Bottom, value: -1.0 })
        );
        assert!(SafeAreaInsets::new(f32::NAN, 0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_padding_for_edges() {
        let insets = SafeAreaInsets::new(47.0, 34.0, 5.0, 6.0).unwrap();
        let padding = insets.padding_for(&[Edge::Top, Edge::Bottom]);
        assert_eq!(padding, SafeAreaInsets { top: 47.0, bottom: 34.0, left: 0.0, right: 0.0 });
    }

    #[test]
    fn test_header_safe_area() {
        let provider = StaticInsets(SafeAreaInsets { top: 59.0, ..Default::default() });
        assert_eq!(header_safe_area(&provider), 59.0);
    }

    #[tokio::test]
    async fn test_watched_insets_notify_on_change() {
        let watched = WatchedInsets::new(SafeAreaInsets::default());
        let mut rx = watched.subscribe();

        watched.update(SafeAreaInsets::default());
        assert!(!rx.has_changed().unwrap());

        let rotated = SafeAreaInsets { left: 47.0, right: 47.0, ..Default::default() };
        watched.update(rotated);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), rotated);
        assert_eq!(watched.insets(), rotated);
    }
}
