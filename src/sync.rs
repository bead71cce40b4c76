//! Completion flags shared between the DMA interrupt handlers and the
//! transfer initiator
//!
//! The three flags live in one atomic byte. Each handler sets only its own
//! bit with a single read-modify-write, so the two handlers never overwrite
//! each other, even when they run at the same time on different cores. The
//! initiator reads all three with one load, so it never sees a torn
//! combination.
//!
//! Only the initiator clears the flags, and only before it programs a new
//! transfer. At that point the previous transfer has already resolved, so no
//! handler belonging to it can still be waiting to set a bit.

use crate::{channel::Channel, Error};

use core::sync::atomic::{AtomicU8, Ordering};

const OUTBOUND_DONE: u8 = 1 << 0;
const INBOUND_DONE: u8 = 1 << 1;
const ERROR: u8 = 1 << 2;

const fn done_bit(channel: Channel) -> u8 {
    match channel {
        Channel::Outbound => OUTBOUND_DONE,
        Channel::Inbound => INBOUND_DONE,
    }
}

/// The done and error flags of one DMA engine
#[derive(Debug)]
pub struct SyncState {
    flags: AtomicU8,
}

impl SyncState {
    /// Create a flag set with every flag clear
    pub const fn new() -> Self {
        SyncState {
            flags: AtomicU8::new(0),
        }
    }

    /// Clear all three flags
    ///
    /// Only the initiator calls this, immediately before programming a
    /// transfer.
    pub fn clear(&self) {
        self.flags.store(0, Ordering::SeqCst);
    }

    /// Signal that `channel` completed its transfer
    pub fn signal_done(&self, channel: Channel) {
        self.flags.fetch_or(done_bit(channel), Ordering::SeqCst);
    }

    /// Signal that the hardware reported an error
    pub fn signal_error(&self) {
        self.flags.fetch_or(ERROR, Ordering::SeqCst);
    }

    /// Take a consistent snapshot of all three flags
    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.flags.load(Ordering::SeqCst))
    }

    /// Spin until the transfer resolves, then return its outcome
    ///
    /// There's no timeout. If the hardware never signals, this never returns.
    pub fn wait(&self) -> crate::Result<()> {
        loop {
            if let Some(outcome) = self.snapshot().outcome() {
                return outcome;
            }
            core::hint::spin_loop();
        }
    }
}

impl Default for SyncState {
    fn default() -> Self {
        Self::new()
    }
}

/// The three flags, as seen at one instant
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Snapshot(u8);

impl Snapshot {
    /// Returns `true` if `channel` signaled completion
    pub const fn is_done(self, channel: Channel) -> bool {
        self.0 & done_bit(channel) != 0
    }

    /// Returns `true` if a handler signaled an error
    pub const fn is_error(self) -> bool {
        self.0 & ERROR != 0
    }

    /// Returns `true` if no flag is set
    pub const fn is_clear(self) -> bool {
        self.0 == 0
    }

    /// Returns the transfer outcome, or `None` if it's still pending
    ///
    /// An error wins over completion: once the error flag is set, the
    /// outcome is [`Error::TransferRuntime`] whatever the done flags say.
    pub fn outcome(self) -> Option<crate::Result<()>> {
        if self.is_error() {
            Some(Err(Error::TransferRuntime))
        } else if self.is_done(Channel::Outbound) && self.is_done(Channel::Inbound) {
            Some(Ok(()))
        } else {
            None
        }
    }
}

impl core::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Snapshot")
            .field("outbound_done", &self.is_done(Channel::Outbound))
            .field("inbound_done", &self.is_done(Channel::Inbound))
            .field("error", &self.is_error())
            .finish()
    }
}
