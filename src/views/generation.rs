//! Stale response guard
//!
//! Loads are split into `begin` and `finish` so several requests for the same view may
//! be in flight. Each `begin` takes a ticket; `finish` only applies a result whose
//! ticket is still the latest one issued. The last-issued request wins regardless of
//! the order responses arrive in.

/// Stamp handed out when a load starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Issues load tickets for one view
#[derive(Debug, Default, Clone)]
pub struct GenerationCounter {
    latest: u64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation; every earlier ticket becomes stale
    pub fn issue(&mut self) -> LoadTicket {
        self.latest += 1;
        LoadTicket(self.latest)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }
}

/// What happened to a finished load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Data replaced the view's previous page
    Applied,
    /// The error banner was set to this message
    Failed(String),
    /// A newer load was started; the result was dropped
    Stale,
    /// Nothing to load yet (e.g. highlights before the video is known)
    Skipped,
}

impl LoadOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, LoadOutcome::Applied)
    }
}
