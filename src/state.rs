//! Observable state cells and the save/upload state machine.
//!
//! Controllers expose their state through [`StateCell`]s and a [`SaveSlot`].
//! Both are thin wrappers over `tokio::sync::watch`: subscribing yields a
//! receiver that immediately replays the last value, so a UI attaching late
//! still renders current state. Unsubscribing is dropping the receiver.

use tokio::sync::watch;

use crate::{Error, Result};

/// A single observable value.
///
/// Contract: `subscribe()` returns a receiver whose first read observes the
/// value current at subscription time (last-value replay); every later write
/// is fanned out to all live receivers. Writes are crate-internal - only the
/// owning controller mutates its cells.
#[derive(Debug)]
pub struct StateCell<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> StateCell<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Subscribe to value changes. The receiver replays the current value.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    pub(crate) fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    pub(crate) fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }
}

impl<T: Clone + Default> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Lifecycle of one in-flight write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SaveState {
    /// No operation pending.
    #[default]
    Idle,
    /// Exactly one write in flight.
    Loading,
    /// Terminal for this attempt; consumed once, then reset.
    Success,
    /// Terminal for this attempt; carries the user-facing failure message.
    Error(String),
}

impl SaveState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SaveState::Loading)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SaveState::Success | SaveState::Error(_))
    }
}

/// Terminal outcome handed to the caller exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed(String),
}

/// Tracks the lifecycle of one in-flight write and enforces that at most
/// one write is in flight at a time.
///
/// Transitions: Idle -> Loading (claimed attempt) -> Success | Error.
/// A new attempt claims the slot out of Idle or a terminal state; claiming
/// while Loading fails, which is what callers use to gate re-entrancy.
#[derive(Debug)]
pub struct SaveSlot {
    tx: watch::Sender<SaveState>,
}

impl SaveSlot {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SaveState::Idle);
        Self { tx }
    }

    pub fn state(&self) -> SaveState {
        self.tx.borrow().clone()
    }

    /// Subscribe to state transitions. The receiver replays the current state.
    pub fn subscribe(&self) -> watch::Receiver<SaveState> {
        self.tx.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.tx.borrow().is_loading()
    }

    /// Claim the slot for a new attempt. Fails with [`Error::SaveInFlight`]
    /// when a write is already in flight; the state is left untouched in
    /// that case.
    pub(crate) fn begin(&self) -> Result<()> {
        let mut claimed = false;
        self.tx.send_if_modified(|state| {
            if state.is_loading() {
                return false;
            }
            *state = SaveState::Loading;
            claimed = true;
            true
        });
        if claimed { Ok(()) } else { Err(Error::SaveInFlight) }
    }

    /// Record a failure without entering Loading, for attempts that
    /// short-circuit locally (validation failure, missing identity).
    /// Never clobbers a write in flight.
    pub(crate) fn reject(&self, message: impl Into<String>) {
        let message = message.into();
        self.tx.send_if_modified(|state| {
            if state.is_loading() {
                return false;
            }
            *state = SaveState::Error(message);
            true
        });
    }

    /// Remote write acknowledged.
    pub(crate) fn succeed(&self) {
        self.tx.send_replace(SaveState::Success);
    }

    /// Remote write failed.
    pub(crate) fn fail(&self, message: impl Into<String>) {
        self.tx.send_replace(SaveState::Error(message.into()));
    }

    /// Consume a terminal state exactly once, resetting the slot to Idle.
    ///
    /// This is how the caller triggers one-shot side effects (navigation on
    /// success, a toast on error) without replaying them on re-render.
    /// Returns `None` while Idle or Loading.
    pub fn take_outcome(&self) -> Option<SaveOutcome> {
        let mut outcome = None;
        self.tx.send_if_modified(|state| match std::mem::take(state) {
            SaveState::Success => {
                outcome = Some(SaveOutcome::Saved);
                true
            }
            SaveState::Error(message) => {
                outcome = Some(SaveOutcome::Failed(message));
                true
            }
            other => {
                // Not terminal: put it back, notify nobody.
                *state = other;
                false
            }
        });
        outcome
    }
}

impl Default for SaveSlot {
    fn default() -> Self {
        Self::new()
    }
}
