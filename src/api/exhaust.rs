/// Scheduling state of a single-slot worker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SlotState<T> {
    #[default]
    Idle,
    Running,
    RunningWithPending(T),
}

/// What the caller must do with a freshly submitted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission<T> {
    /// Nothing was running: start this request now.
    Start(T),
    /// Parked until the running request completes.
    Pending,
    /// Parked, and the previously parked request was dropped.
    Superseded(T),
}

/// Exhaust-with-trailing scheduling.
///
/// At most one request runs at a time. While one runs, only the newest
/// submission is kept; it starts as soon as the running one completes, so the
/// last input is never lost and historical inputs never queue up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExhaustWithTrailing<T> {
    state: SlotState<T>,
}

impl<T> Default for ExhaustWithTrailing<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ExhaustWithTrailing<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: SlotState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> &SlotState<T> {
        &self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !matches!(self.state, SlotState::Idle)
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        matches!(self.state, SlotState::RunningWithPending(_))
    }

    pub fn submit(&mut self, request: T) -> Admission<T> {
        match std::mem::replace(&mut self.state, SlotState::Idle) {
            SlotState::Idle => {
                self.state = SlotState::Running;
                Admission::Start(request)
            }
            SlotState::Running => {
                self.state = SlotState::RunningWithPending(request);
                Admission::Pending
            }
            SlotState::RunningWithPending(dropped) => {
                self.state = SlotState::RunningWithPending(request);
                Admission::Superseded(dropped)
            }
        }
    }

    /// Marks the running request finished and returns the one to start next.
    pub fn complete(&mut self) -> Option<T> {
        match std::mem::replace(&mut self.state, SlotState::Idle) {
            SlotState::Idle | SlotState::Running => None,
            SlotState::RunningWithPending(next) => {
                self.state = SlotState::Running;
                Some(next)
            }
        }
    }
}
