//! DMA interrupt support
//!
//! Both channels run the same handler. It masks the channel's interrupt
//! sources, reads and acknowledges the status, and then does one of three
//! things:
//!
//! - nothing, if no completion or error source fired (spurious interrupt).
//! - set the error flag and attempt one bounded reset, if the error source
//!   fired.
//! - set the channel's done flag, if the completion source fired.
//!
//! Every path unmasks the sources again before returning.

use crate::{
    channel::{Channel, Irq},
    dma::Dma,
    sync::SyncState,
};

/// The interrupt sources the driver enables on each channel
pub(crate) const ENABLED: Irq = Irq::COMPLETE.union(Irq::ERROR);

/// How long to wait for a hardware reset to finish
///
/// The reset is polled in a tight loop with no delay between polls. If the
/// budget runs out, the reset is abandoned; the hardware may still be
/// resetting, or it may be stuck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetPolicy {
    max_polls: u32,
}

impl ResetPolicy {
    /// The default poll budget
    pub const DEFAULT_MAX_POLLS: u32 = 10_000;

    /// Poll the reset status at most `max_polls` times
    ///
    /// A budget of zero issues the reset without waiting for it.
    pub const fn new(max_polls: u32) -> Self {
        ResetPolicy { max_polls }
    }

    /// Returns the poll budget
    pub const fn max_polls(self) -> u32 {
        self.max_polls
    }

    /// Reset the DMA engine, and poll until the reset finishes or the
    /// budget runs out
    ///
    /// Returns `true` if the reset finished within the budget.
    pub fn reset<D: Dma + ?Sized>(self, dma: &D) -> bool {
        dma.reset();
        (0..self.max_polls).any(|_| dma.is_reset_done())
    }
}

impl Default for ResetPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_POLLS)
    }
}

/// What a handler invocation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerAction {
    /// Neither the completion nor the error source was asserted
    Spurious,
    /// The channel completed; its done flag is set
    Completed,
    /// The channel reported an error; the error flag is set and the
    /// engine was reset
    Recovered {
        /// `false` if the reset didn't finish within the policy's budget
        reset_done: bool,
    },
}

/// Run the handler for `channel`
pub(crate) fn handle<D: Dma + ?Sized>(
    dma: &D,
    flags: &SyncState,
    policy: ResetPolicy,
    channel: Channel,
) -> HandlerAction {
    dma.disable_interrupts(channel, Irq::ALL);

    let status = dma.interrupt_status(channel);
    dma.acknowledge(channel, status);

    if status.contains(Irq::ERROR) {
        flags.signal_error();
        let reset_done = policy.reset(dma);
        if !reset_done {
            log::warn!(
                "{:?} DMA reset didn't finish within {} polls",
                channel,
                policy.max_polls()
            );
        }
        // A reset clears the control registers of both channels.
        for channel in Channel::ALL {
            dma.enable_interrupts(channel, ENABLED);
        }
        log::trace!("{:?} DMA error, status {:?}", channel, status);
        HandlerAction::Recovered { reset_done }
    } else if status.contains(Irq::COMPLETE) {
        flags.signal_done(channel);
        dma.enable_interrupts(channel, ENABLED);
        log::trace!("{:?} DMA complete", channel);
        HandlerAction::Completed
    } else {
        dma.enable_interrupts(channel, ENABLED);
        log::warn!("{:?} DMA spurious interrupt, status {:?}", channel, status);
        HandlerAction::Spurious
    }
}
