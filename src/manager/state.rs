// src/manager/state.rs

//! Per-target build/start state, shared between the request handler that
//! triggers a build, the detached build task, and concurrent status queries.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::types::Target;

/// Orchestration phase of one target.
///
/// `Building` and `Starting` are the in-flight phases: while either is set,
/// status reports `building = true` and no second build may begin. `Failed`
/// keeps the last failure message visible until the next trigger resolves
/// or replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Building,
    Starting,
    Failed,
}

impl Phase {
    /// Whether a build-and-start workflow is currently in flight.
    pub fn in_flight(self) -> bool {
        matches!(self, Phase::Building | Phase::Starting)
    }
}

/// Mutable record for one target.
#[derive(Debug, Clone)]
pub struct BuildState {
    pub phase: Phase,
    pub message: String,
}

impl BuildState {
    fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            message: String::new(),
        }
    }
}

/// Outcome of the check-and-set that gates build launches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildGate {
    /// The caller owns the transition to `Building` and must launch the
    /// detached task.
    Started,
    /// A build or start is already in flight; `message` is its current note.
    InFlight { message: String },
}

/// Shared table of build states, one record per target.
///
/// A single mutex guards the whole table: there are only two targets and
/// every critical section is a handful of loads and stores. The lock is
/// never held across an await point.
#[derive(Debug)]
pub struct StateTable {
    states: Mutex<HashMap<Target, BuildState>>,
}

impl StateTable {
    /// Table with every target seeded as `Idle`.
    pub fn new() -> Self {
        let states = Target::ALL
            .iter()
            .map(|t| (*t, BuildState::idle()))
            .collect();
        Self {
            states: Mutex::new(states),
        }
    }

    // A panicked writer must not take status queries down with it.
    fn guard(&self) -> MutexGuard<'_, HashMap<Target, BuildState>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current record for `target`.
    pub fn snapshot(&self, target: Target) -> BuildState {
        self.guard()
            .get(&target)
            .cloned()
            .unwrap_or_else(BuildState::idle)
    }

    /// Atomically move `target` to `Building` unless a workflow is already
    /// in flight.
    ///
    /// The check and the transition share one guard, so two concurrent
    /// callers can never both be told to launch a build for the same target.
    pub fn try_begin_build(&self, target: Target, message: impl Into<String>) -> BuildGate {
        let mut states = self.guard();
        let state = states.entry(target).or_insert_with(BuildState::idle);

        if state.phase.in_flight() {
            return BuildGate::InFlight {
                message: state.message.clone(),
            };
        }

        state.phase = Phase::Building;
        state.message = message.into();
        BuildGate::Started
    }

    /// Record that the build finished and the start is underway.
    pub fn mark_starting(&self, target: Target, message: impl Into<String>) {
        self.set(target, Phase::Starting, message.into());
    }

    /// Record a terminal failure, keeping the diagnostic for status queries.
    pub fn mark_failed(&self, target: Target, message: impl Into<String>) {
        self.set(target, Phase::Failed, message.into());
    }

    /// Clear back to `Idle` after a successful resolution.
    pub fn resolve_idle(&self, target: Target) {
        self.set(target, Phase::Idle, String::new());
    }

    fn set(&self, target: Target, phase: Phase, message: String) {
        let mut states = self.guard();
        let state = states.entry(target).or_insert_with(BuildState::idle);
        state.phase = phase;
        state.message = message;
    }
}

impl Default for StateTable {
    fn default() -> Self {
        Self::new()
    }
}
