#[cfg(feature = "dump")]
use heapless::Deque;

use crate::State;

pub struct StateHolder<const HISTORY_SIZE: usize> {
    #[cfg(feature = "dump")]
    history: Deque<State, HISTORY_SIZE>,
    state: State,
}

impl<const HISTORY_SIZE: usize> StateHolder<HISTORY_SIZE> {
    pub const fn new() -> Self {
        Self {
            #[cfg(feature = "dump")]
            history: Deque::new(),
            state: State::Idle,
        }
    }

    pub fn set_state(&mut self, state: State) {
        if self.state == state {
            return;
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("i2c: {} -> {}", self.state, state);

        #[cfg(feature = "dump")]
        self.add_state_in_history(state);

        self.state = state;
    }

    pub fn get_state(&self) -> State {
        self.state
    }

    /// Latest states entered, oldest first. The initial `Idle` is not one.
    #[cfg(feature = "dump")]
    pub fn get_history(&self) -> &Deque<State, HISTORY_SIZE> {
        &self.history
    }

    #[cfg(feature = "dump")]
    fn add_state_in_history(&mut self, state: State) {
        if self.history.is_full() {
            self.history.pop_front();
        }
        // Never full after the pop above.
        let _ = self.history.push_back(state);
    }
}
