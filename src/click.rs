use std::time::{Duration, Instant};

/// Delay before a lone click is committed as an edit gesture. The host
/// toolkit reports a click *and* a double click for every double-click
/// gesture, so the first click must be held back long enough for the
/// second notification to arrive and supersede it.
pub const CLICK_WINDOW: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Edit { row: usize, col: usize },
    History { row: usize, col: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Pending {
        row: usize,
        col: usize,
        deadline: Instant,
    },
}

/// Turns the raw click/double-click stream for grid cells into exactly one
/// intent per gesture. A click arms a one-shot deadline; a double click
/// inside the window cancels it and yields the history intent immediately;
/// an undisturbed deadline yields the edit intent.
#[derive(Debug)]
pub struct ClickDisambiguator {
    state: State,
}

impl ClickDisambiguator {
    pub fn new() -> Self {
        Self { state: State::Idle }
    }

    /// (Re)arms the pending click. An earlier pending click is discarded:
    /// only the most recent cell can mature into an edit.
    pub fn on_click(&mut self, row: usize, col: usize, now: Instant) {
        self.state = State::Pending {
            row,
            col,
            deadline: now + CLICK_WINDOW,
        };
    }

    /// Cancels any pending click and resolves the gesture as a history
    /// request for the double-clicked cell.
    pub fn on_double_click(&mut self, row: usize, col: usize) -> Intent {
        self.state = State::Idle;
        Intent::History { row, col }
    }

    /// Deadline the event loop should wake up at, if a click is pending.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            State::Idle => None,
            State::Pending { deadline, .. } => Some(deadline),
        }
    }

    /// Matures the pending click into an edit intent once its deadline has
    /// passed. Returns None while idle or still inside the window.
    pub fn fire(&mut self, now: Instant) -> Option<Intent> {
        match self.state {
            State::Pending { row, col, deadline } if now >= deadline => {
                self.state = State::Idle;
                Some(Intent::Edit { row, col })
            }
            _ => None,
        }
    }
}

impl Default for ClickDisambiguator {
    fn default() -> Self {
        Self::new()
    }
}
