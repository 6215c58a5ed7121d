//! Hero slider state
//!
//! [`CarouselState`] is the pure state machine. [`Carousel::activate`] runs
//! it on a tokio task that owns the auto-advance timer and the settle delay;
//! the returned [`ActiveCarousel`] stops the task when dropped.

use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::SliderConfig;

/// Default auto-advance interval
pub const AUTO_ADVANCE: Duration = Duration::from_millis(6000);

/// Default time a slide transition occupies
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// A navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Next,
    Prev,
    Jump(usize),
}

/// Whether a transition is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Settled,
    Transitioning,
}

/// Current slide and transition phase over `len` slides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselState {
    index: usize,
    len: usize,
    phase: Transition,
}

impl CarouselState {
    /// A settled carousel on the first of `len` slides
    pub fn new(len: usize) -> Self {
        Self {
            index: 0,
            len,
            phase: Transition::Settled,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn phase(&self) -> Transition {
        self.phase
    }

    /// Apply a request; returns whether it was accepted
    ///
    /// Requests are ignored while a transition is running, when there are no
    /// slides, and when a jump targets a slide that does not exist.
    pub fn request(&mut self, nav: Nav) -> bool {
        if self.phase == Transition::Transitioning || self.len == 0 {
            return false;
        }

        let target = match nav {
            Nav::Next => (self.index + 1) % self.len,
            Nav::Prev => (self.index + self.len - 1) % self.len,
            Nav::Jump(i) if i < self.len => i,
            Nav::Jump(_) => return false,
        };

        self.index = target;
        self.phase = Transition::Transitioning;
        true
    }

    /// End the running transition
    pub fn settle(&mut self) {
        self.phase = Transition::Settled;
    }
}

/// Timing of an active carousel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselTiming {
    pub interval: Duration,
    pub settle: Duration,
}

impl Default for CarouselTiming {
    fn default() -> Self {
        Self {
            interval: AUTO_ADVANCE,
            settle: SETTLE_DELAY,
        }
    }
}

impl From<&SliderConfig> for CarouselTiming {
    fn from(config: &SliderConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.interval.max(1)),
            settle: Duration::from_millis(config.settle),
        }
    }
}

/// Slides shown by a carousel
#[derive(Debug, Clone)]
pub struct Carousel<T> {
    items: Vec<T>,
}

impl<T> Carousel<T> {
    /// Keep at most `limit` of `items`
    pub fn new(items: impl IntoIterator<Item = T>, limit: usize) -> Self {
        Self {
            items: items.into_iter().take(limit).collect(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// State before activation, as rendered on first paint
    pub fn initial_state(&self) -> CarouselState {
        CarouselState::new(self.items.len())
    }

    /// Start the auto-advance timer
    ///
    /// Must be called inside a tokio runtime. The timer keeps its own
    /// cadence: manual navigation neither resets nor pauses it.
    pub fn activate(self, timing: CarouselTiming) -> ActiveCarousel<T> {
        let state = self.initial_state();
        let (state_tx, state_rx) = watch::channel(state);
        let (nav_tx, nav_rx) = mpsc::unbounded_channel();

        tracing::debug!("Carousel activated with {} slides", state.len());
        let task = tokio::spawn(drive(state, timing, nav_rx, state_tx));

        ActiveCarousel {
            items: self.items,
            nav: nav_tx,
            state: state_rx,
            task,
        }
    }
}

/// Owns the timer and applies every request in arrival order
async fn drive(
    mut state: CarouselState,
    timing: CarouselTiming,
    mut nav_rx: mpsc::UnboundedReceiver<Nav>,
    state_tx: watch::Sender<CarouselState>,
) {
    let mut ticker = time::interval_at(Instant::now() + timing.interval, timing.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let settle = time::sleep(Duration::ZERO);
    tokio::pin!(settle);
    let mut settling = false;

    loop {
        let nav = tokio::select! {
            _ = ticker.tick() => Some(Nav::Next),
            msg = nav_rx.recv() => match msg {
                Some(nav) => Some(nav),
                None => break,
            },
            _ = &mut settle, if settling => {
                settling = false;
                state.settle();
                None
            }
        };

        if let Some(nav) = nav {
            if state.request(nav) {
                settle.as_mut().reset(Instant::now() + timing.settle);
                settling = true;
            } else {
                tracing::trace!("Carousel ignored {:?}", nav);
            }
        }

        state_tx.send_replace(state);
    }

    tracing::debug!("Carousel stopped");
}

/// A running carousel; dropping it cancels the timer
#[derive(Debug)]
pub struct ActiveCarousel<T> {
    items: Vec<T>,
    nav: mpsc::UnboundedSender<Nav>,
    state: watch::Receiver<CarouselState>,
    task: JoinHandle<()>,
}

impl<T> ActiveCarousel<T> {
    /// Ask for a slide change; ignored while a transition is running
    pub fn navigate(&self, nav: Nav) {
        let _ = self.nav.send(nav);
    }

    pub fn next(&self) {
        self.navigate(Nav::Next);
    }

    pub fn prev(&self) {
        self.navigate(Nav::Prev);
    }

    pub fn jump(&self, index: usize) {
        self.navigate(Nav::Jump(index));
    }

    /// Latest published state
    pub fn state(&self) -> CarouselState {
        *self.state.borrow()
    }

    /// The slide currently shown
    pub fn current(&self) -> Option<&T> {
        self.items.get(self.state().index())
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// A receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<CarouselState> {
        self.state.clone()
    }

    /// Stop the timer now
    pub fn deactivate(self) {}
}

impl<T> Drop for ActiveCarousel<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
