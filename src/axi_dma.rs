//! AXI DMA in direct register (simple) mode

use crate::{
    channel::{Channel, Irq},
    dma::{Dma, Rejection},
    ral::{self, dma, Static},
};

use core::sync::atomic;

/// An AXI DMA engine
///
/// `AxiDma` wraps the engine's register block. It supports simple mode
/// only; [`Engine::new`](crate::Engine::new) rejects an engine that was
/// built with scatter-gather.
pub struct AxiDma {
    registers: Static<dma::RegisterBlock>,
    max_transfer_bytes: usize,
}

impl AxiDma {
    /// The widest buffer length register the IP supports, in bits
    pub const MAX_LENGTH_WIDTH: u32 = 26;

    /// Create the AXI DMA driver
    ///
    /// The driver assumes the widest length register. Use
    /// [`with_length_width`](AxiDma::with_length_width) if the IP was
    /// configured with a narrower one.
    ///
    /// # Safety
    ///
    /// Caller must make sure that `registers` points to the start of an AXI DMA
    /// register block, and that no other `AxiDma` is created for it.
    pub const unsafe fn new(registers: *const ()) -> Self {
        AxiDma {
            registers: Static(registers.cast()),
            max_transfer_bytes: (1 << Self::MAX_LENGTH_WIDTH) - 1,
        }
    }

    /// Set the width of the buffer length register, in bits
    ///
    /// The width is a synthesis parameter of the IP (8 to 26 bits). It bounds
    /// the number of bytes in a single transfer.
    ///
    /// # Panics
    ///
    /// Panics if `bits` is outside of `8..=26`.
    pub const fn with_length_width(mut self, bits: u32) -> Self {
        assert!(
            bits >= 8 && bits <= Self::MAX_LENGTH_WIDTH,
            "AXI DMA length width must be between 8 and 26 bits"
        );
        self.max_transfer_bytes = (1 << bits) - 1;
        self
    }

    /// Returns the largest transfer, in bytes, that the engine accepts
    pub const fn max_transfer_bytes(&self) -> usize {
        self.max_transfer_bytes
    }

    fn channel(&self, channel: Channel) -> &dma::channel::RegisterBlock {
        match channel {
            Channel::Outbound => &self.registers.MM2S,
            Channel::Inbound => &self.registers.S2MM,
        }
    }

    /// Returns `true` if `channel` is running and hasn't gone idle
    pub fn is_busy(&self, channel: Channel) -> bool {
        let regs = self.channel(channel);
        let (halted, idle) = ral::read_reg!(crate::ral::dma::channel, regs, DMASR, HALTED, IDLE);
        halted == 0 && idle == 0
    }
}

// Safety: each handler touches only its own channel's control and status
// registers, and the initiator only programs a channel while that channel
// is idle. Resets are single writes.
unsafe impl Send for AxiDma {}
unsafe impl Sync for AxiDma {}

// Safety: the address and length registers receive exactly the caller's
// region, and the engine stops at LENGTH bytes.
unsafe impl Dma for AxiDma {
    fn has_scatter_gather(&self) -> bool {
        let mm2s = self.channel(Channel::Outbound);
        ral::read_reg!(crate::ral::dma::channel, mm2s, DMASR, SG_INCLD == 1)
    }

    fn reset(&self) {
        // Resetting either channel resets the whole core. Write, not
        // modify: a reset clears every other control bit anyway.
        let mm2s = self.channel(Channel::Outbound);
        ral::write_reg!(crate::ral::dma::channel, mm2s, DMACR, RESET: 1);
    }

    fn is_reset_done(&self) -> bool {
        Channel::ALL.iter().all(|&channel| {
            let regs = self.channel(channel);
            ral::read_reg!(crate::ral::dma::channel, regs, DMACR, RESET == 0)
        })
    }

    fn enable_interrupts(&self, channel: Channel, irq: Irq) {
        let regs = self.channel(channel);
        let enabled = ral::read_reg!(crate::ral::dma::channel, regs, DMACR, IRQ_EN);
        ral::modify_reg!(crate::ral::dma::channel, regs, DMACR, IRQ_EN: enabled | irq.bits());
    }

    fn disable_interrupts(&self, channel: Channel, irq: Irq) {
        let regs = self.channel(channel);
        let enabled = ral::read_reg!(crate::ral::dma::channel, regs, DMACR, IRQ_EN);
        ral::modify_reg!(crate::ral::dma::channel, regs, DMACR, IRQ_EN: enabled & !irq.bits());
    }

    fn interrupt_status(&self, channel: Channel) -> Irq {
        let regs = self.channel(channel);
        Irq::from_bits(ral::read_reg!(crate::ral::dma::channel, regs, DMASR, IRQ))
    }

    fn acknowledge(&self, channel: Channel, irq: Irq) {
        // Write-one-to-clear. The other status bits are read-only.
        let regs = self.channel(channel);
        ral::write_reg!(crate::ral::dma::channel, regs, DMASR, IRQ: irq.bits());
    }

    unsafe fn start_transfer(
        &self,
        channel: Channel,
        address: usize,
        bytes: usize,
    ) -> Result<(), Rejection> {
        if bytes == 0 || bytes > self.max_transfer_bytes {
            return Err(Rejection::Length);
        }
        if self.is_busy(channel) {
            return Err(Rejection::Busy);
        }

        let regs = self.channel(channel);
        let address = address as u64;
        ral::write_reg!(crate::ral::dma::channel, regs, ADDR, address as u32);
        ral::write_reg!(crate::ral::dma::channel, regs, ADDR_MSB, (address >> 32) as u32);
        ral::modify_reg!(crate::ral::dma::channel, regs, DMACR, RS: 1);

        // Writing LENGTH starts the transfer. Memory writes, including any
        // cache maintenance, must land before that.
        atomic::fence(atomic::Ordering::SeqCst);
        ral::write_reg!(crate::ral::dma::channel, regs, LENGTH, bytes as u32);
        Ok(())
    }
}
