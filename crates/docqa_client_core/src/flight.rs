//! crates/docqa_client_core/src/flight.rs
//!
//! Single-flight guard shared by the chat and upload controllers.
//!
//! A controller owns one `FlightGate`. `try_begin` is the only way into
//! `Busy`, and dropping the returned `Flight` is the only way back to `Idle`,
//! so every exit path of an operation (including an early `return` or a
//! dropped future) releases the gate.

use std::sync::{Mutex, MutexGuard};

/// The state of one controller's in-progress operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlightState {
    #[default]
    Idle,
    Busy,
}

#[derive(Debug, Default)]
pub struct FlightGate {
    state: Mutex<FlightState>,
}

impl FlightGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FlightState {
        *self.lock()
    }

    pub fn is_busy(&self) -> bool {
        self.state() == FlightState::Busy
    }

    /// Moves `Idle -> Busy`. Returns `None` when an operation is already in
    /// flight; concurrent attempts are rejected, never queued.
    pub fn try_begin(&self) -> Option<Flight<'_>> {
        let mut state = self.lock();
        match *state {
            FlightState::Busy => None,
            FlightState::Idle => {
                *state = FlightState::Busy;
                Some(Flight { gate: self })
            }
        }
    }

    // The state is a plain enum, so a poisoned lock still holds a valid value.
    fn lock(&self) -> MutexGuard<'_, FlightState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Proof that the holder owns the gate. Returns it to `Idle` on drop.
#[must_use = "dropping the flight immediately releases the gate"]
#[derive(Debug)]
pub struct Flight<'a> {
    gate: &'a FlightGate,
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        *self.gate.lock() = FlightState::Idle;
    }
}
