// Promotion Rotation Controller
// Cycles through the eligible promotions shown in the banner, automatically or on demand

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Default auto-advance period of the banner
pub const DEFAULT_ROTATION_PERIOD: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationState {
    /// Nothing to show
    Idle,
    Showing { index: usize },
}

/// Rotation over a list of promotions
///
/// The index is always valid for the current list while `Showing`.
#[derive(Debug, Clone)]
pub struct PromotionRotation<T> {
    items: Vec<T>,
    state: RotationState,
}

impl<T> PromotionRotation<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self::starting_at(items, 0)
    }

    /// Start at a given index, wrapped into range
    pub fn starting_at(items: Vec<T>, index: usize) -> Self {
        let state = if items.is_empty() {
            RotationState::Idle
        } else {
            RotationState::Showing {
                index: index % items.len(),
            }
        };
        Self { items, state }
    }

    pub fn state(&self) -> RotationState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Timer-driven advance; a single promotion stays put
    pub fn tick(&mut self) {
        if self.auto_advance_enabled() {
            self.next();
        }
    }

    /// Manual advance, wrapping past the last promotion
    pub fn next(&mut self) {
        if let RotationState::Showing { index } = self.state {
            self.state = RotationState::Showing {
                index: (index + 1) % self.items.len(),
            };
        }
    }

    /// Manual step back, wrapping before the first promotion
    pub fn prev(&mut self) {
        if let RotationState::Showing { index } = self.state {
            let len = self.items.len();
            self.state = RotationState::Showing {
                index: (index + len - 1) % len,
            };
        }
    }

    /// Swap in a freshly loaded list
    ///
    /// An empty list goes idle; otherwise the current index is kept when it
    /// still fits and reset to the first promotion when it does not.
    pub fn replace(&mut self, items: Vec<T>) {
        let index = match self.state {
            RotationState::Showing { index } if index < items.len() => index,
            _ => 0,
        };
        *self = Self::starting_at(items, index);
    }

    pub fn current(&self) -> Option<&T> {
        match self.state {
            RotationState::Idle => None,
            RotationState::Showing { index } => self.items.get(index),
        }
    }

    /// 1-based position and total, e.g. `(2, 5)` for "2/5"
    pub fn position(&self) -> Option<(usize, usize)> {
        match self.state {
            RotationState::Idle => None,
            RotationState::Showing { index } => Some((index + 1, self.items.len())),
        }
    }

    pub fn show_navigation(&self) -> bool {
        self.items.len() > 1
    }

    pub fn auto_advance_enabled(&self) -> bool {
        self.items.len() > 1
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }
}

/// Background task advancing a shared rotation on a fixed period
///
/// For long-lived consumers that hold a rotation of their own, such as a
/// kiosk or display process embedding this crate. The HTTP banner does not
/// use it: each request rebuilds the rotation at the client's position.
///
/// The task ends on `stop`, when the handle is dropped, or by itself once the
/// rotation has gone idle. `period` must be non-zero.
pub struct RotationTicker {
    handle: JoinHandle<()>,
}

impl RotationTicker {
    pub fn spawn<T>(rotation: Arc<RwLock<PromotionRotation<T>>>, period: Duration) -> Self
    where
        T: Send + Sync + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;

                let mut rotation = rotation.write().await;
                if rotation.state() == RotationState::Idle {
                    tracing::debug!("Rotation idle, stopping ticker");
                    break;
                }
                rotation.tick();
            }
        });

        Self { handle }
    }

    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RotationTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
