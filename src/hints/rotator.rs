//! Timer-driven hint rotation
//!
//! The timer runs as a tokio task. Every show/hide bumps a generation
//! counter under the lock, and a tick only advances the index when its
//! generation is still current, so no tick lands after `hide` returns.
//! Without a runtime the hints still show and hide but never rotate.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::events::SearchEvent;

/// Snapshot of the rotator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HintState {
    pub index: usize,
    pub visible: bool,
}

#[derive(Debug, Default)]
struct Shared {
    state: HintState,
    generation: u64,
}

/// Cycles a fixed list of hints while visible
pub struct HintRotator {
    hints: &'static [&'static str],
    interval: Duration,
    shared: Arc<Mutex<Shared>>,
    timer: Option<JoinHandle<()>>,
    runtime: Option<Handle>,
    event_tx: Option<broadcast::Sender<SearchEvent>>,
}

impl HintRotator {
    pub fn new(hints: &'static [&'static str], interval: Duration) -> Self {
        Self {
            hints,
            interval,
            shared: Arc::new(Mutex::new(Shared::default())),
            timer: None,
            runtime: Handle::try_current().ok(),
            event_tx: None,
        }
    }

    /// Also broadcast [`SearchEvent::HintChanged`] on every change
    pub fn with_events(mut self, event_tx: broadcast::Sender<SearchEvent>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    pub fn state(&self) -> HintState {
        self.shared
            .lock()
            .map(|shared| shared.state)
            .unwrap_or_default()
    }

    /// Hint at the current index
    pub fn current(&self) -> &'static str {
        self.hints.get(self.state().index).copied().unwrap_or("")
    }

    /// Make hints visible, starting over at the first one.
    /// No-op while already visible.
    pub fn show(&mut self) {
        if self.hints.is_empty() {
            return;
        }

        let generation = {
            let Ok(mut shared) = self.shared.lock() else {
                warn!("hint state poisoned, not showing hints");
                return;
            };
            if shared.state.visible {
                return;
            }
            shared.generation += 1;
            shared.state = HintState {
                index: 0,
                visible: true,
            };
            shared.generation
        };

        debug!(generation, "hints shown");
        self.emit(0);
        self.spawn_timer(generation);
    }

    /// Hide hints and cancel the timer
    pub fn hide(&mut self) {
        if let Ok(mut shared) = self.shared.lock() {
            if shared.state.visible {
                debug!(generation = shared.generation, "hints hidden");
            }
            shared.generation += 1;
            shared.state.visible = false;
        }
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn spawn_timer(&mut self, generation: u64) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }

        let Some(runtime) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            warn!("no tokio runtime, hints will not rotate");
            return;
        };

        let shared = Arc::clone(&self.shared);
        let hints = self.hints;
        let event_tx = self.event_tx.clone();
        let period = self.interval;

        self.timer = Some(runtime.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let Some(index) = advance(&shared, generation, hints.len()) else {
                    break;
                };
                if let Some(tx) = &event_tx {
                    let _ = tx.send(SearchEvent::HintChanged {
                        index,
                        text: hints[index].to_string(),
                    });
                }
            }
        }));
    }

    fn emit(&self, index: usize) {
        if let (Some(tx), Some(text)) = (&self.event_tx, self.hints.get(index)) {
            let _ = tx.send(SearchEvent::HintChanged {
                index,
                text: text.to_string(),
            });
        }
    }
}

impl Drop for HintRotator {
    fn drop(&mut self) {
        self.hide();
    }
}

/// Advance the index if `generation` is still current
fn advance(shared: &Mutex<Shared>, generation: u64, len: usize) -> Option<usize> {
    let mut shared = shared.lock().ok()?;
    if shared.generation != generation || !shared.state.visible {
        return None;
    }
    shared.state.index = (shared.state.index + 1) % len;
    Some(shared.state.index)
}
