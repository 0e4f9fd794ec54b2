//! Sequencing of server-side searches.
//!
//! Searches are fire-and-forget and may complete out of order. Each one is
//! tagged with a ticket; only the ticket issued last may replace the candidate
//! list.

/// Monotonic tag of one issued search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchTicket(u64);

impl SearchTicket {
    pub fn get(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct SearchSequencer {
    issued: u64,
}

impl SearchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> SearchTicket {
        self.issued += 1;
        SearchTicket(self.issued)
    }

    pub fn latest(&self) -> Option<SearchTicket> {
        (self.issued > 0).then_some(SearchTicket(self.issued))
    }

    pub fn is_latest(&self, ticket: SearchTicket) -> bool {
        ticket.0 == self.issued
    }
}
