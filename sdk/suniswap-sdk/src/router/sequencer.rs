use std::sync::atomic::{AtomicU64, Ordering};

/// Generation tag of one quote request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuoteTicket(u64);

/// Hands out increasing tickets so only the newest quote batch is kept
///
/// A batch takes a ticket before it starts and offers its result back with
/// it. Any batch started later makes the earlier ticket stale.
#[derive(Debug, Default)]
pub struct QuoteSequencer {
    latest: AtomicU64,
}

impl QuoteSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> QuoteTicket {
        QuoteTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, ticket: QuoteTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// `value` if `ticket` is still the newest, `None` for a stale result
    pub fn accept<T>(&self, ticket: QuoteTicket, value: T) -> Option<T> {
        self.is_current(ticket).then_some(value)
    }
}
