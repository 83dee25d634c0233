//! Load generations for discarding superseded responses.
//!
//! Every fetch a screen starts is tagged with the ticket current at the
//! time. Starting a new fetch or tearing the screen down advances the
//! generation, so a response that resolves late no longer matches and is
//! dropped instead of overwriting newer state.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct Generation {
    current: u64,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation and hand out its ticket.
    pub fn advance(&mut self) -> LoadTicket {
        self.current = self.current.wrapping_add(1);
        LoadTicket(self.current)
    }

    /// Retire the current ticket without issuing a new one.
    pub fn invalidate(&mut self) {
        self.current = self.current.wrapping_add(1);
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.current
    }
}
