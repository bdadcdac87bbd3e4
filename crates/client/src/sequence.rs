//! Request sequencing for store slices.
//!
//! Requests that write the same slice of store state can complete out of
//! order. Each request takes a [`Ticket`] when it starts; when it completes it
//! may only touch the slice if no newer ticket has been issued since. Older
//! responses are dropped, so the last request issued wins rather than the
//! last response received.

use std::sync::atomic::{AtomicU64, Ordering};

/// Sequence number of one store request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// The raw sequence number, for logging.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Issues tickets for one slice and tells whether a ticket is still current.
#[derive(Debug)]
pub struct RequestSequencer {
    slice: &'static str,
    latest: AtomicU64,
}

impl RequestSequencer {
    /// Create a sequencer for `slice` with no tickets issued.
    #[must_use]
    pub const fn new(slice: &'static str) -> Self {
        Self {
            slice,
            latest: AtomicU64::new(0),
        }
    }

    /// Name of the slice this sequencer orders.
    #[must_use]
    pub const fn slice(&self) -> &'static str {
        self.slice
    }

    /// Issue a ticket newer than every ticket issued before it.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is the most recently issued one.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}
