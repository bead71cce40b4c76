//! The DMA engine register interface
//!
//! [`Engine`](crate::Engine) drives the hardware through the [`Dma`] trait.
//! [`AxiDma`](crate::AxiDma) implements it for the AXI DMA in simple mode.
//! Tests and other DMA blocks can supply their own implementation.

use crate::channel::{Channel, Irq};

/// Why the hardware refused to start a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The channel is still running a previous transfer
    Busy,
    /// The byte count is zero or doesn't fit the length register
    Length,
}

/// A DMA engine with one outbound and one inbound channel
///
/// All methods take `&self`: the interrupt handlers and the transfer
/// initiator both reach the same registers.
///
/// # Safety
///
/// `start_transfer` must move exactly `bytes` bytes through `address`
/// and nothing else. The engine relies on this to keep DMA accesses
/// inside the caller's buffers.
pub unsafe trait Dma {
    /// Returns `true` if the engine was synthesized with scatter-gather
    fn has_scatter_gather(&self) -> bool;
    /// Begin a reset of both channels
    ///
    /// A reset stops any in-flight transfer and clears the control
    /// registers, including interrupt enables.
    fn reset(&self);
    /// Returns `true` once the last reset has finished
    fn is_reset_done(&self) -> bool;
    /// Enable the `irq` sources of `channel`
    fn enable_interrupts(&self, channel: Channel, irq: Irq);
    /// Disable the `irq` sources of `channel`
    fn disable_interrupts(&self, channel: Channel, irq: Irq);
    /// Read the raw interrupt status of `channel`
    fn interrupt_status(&self, channel: Channel) -> Irq;
    /// Acknowledge (clear) the `irq` sources of `channel`
    fn acknowledge(&self, channel: Channel, irq: Irq);
    /// Program and start a simple transfer on `channel`
    ///
    /// For [`Channel::Outbound`], the engine reads `bytes` bytes starting
    /// at `address`. For [`Channel::Inbound`], it writes them.
    ///
    /// # Safety
    ///
    /// Caller must make sure that the memory region is valid for the
    /// access until the transfer completes or the engine is reset.
    unsafe fn start_transfer(
        &self,
        channel: Channel,
        address: usize,
        bytes: usize,
    ) -> Result<(), Rejection>;
}

// Safety: forwards to the implementation.
unsafe impl<D: Dma + ?Sized> Dma for &D {
    fn has_scatter_gather(&self) -> bool {
        (**self).has_scatter_gather()
    }
    fn reset(&self) {
        (**self).reset()
    }
    fn is_reset_done(&self) -> bool {
        (**self).is_reset_done()
    }
    fn enable_interrupts(&self, channel: Channel, irq: Irq) {
        (**self).enable_interrupts(channel, irq)
    }
    fn disable_interrupts(&self, channel: Channel, irq: Irq) {
        (**self).disable_interrupts(channel, irq)
    }
    fn interrupt_status(&self, channel: Channel) -> Irq {
        (**self).interrupt_status(channel)
    }
    fn acknowledge(&self, channel: Channel, irq: Irq) {
        (**self).acknowledge(channel, irq)
    }
    unsafe fn start_transfer(
        &self,
        channel: Channel,
        address: usize,
        bytes: usize,
    ) -> Result<(), Rejection> {
        (**self).start_transfer(channel, address, bytes)
    }
}
