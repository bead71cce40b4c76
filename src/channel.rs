//! DMA channels and interrupt status

use core::fmt::{self, Debug};
use core::ops::BitOr;

/// One direction of the DMA engine
///
/// The accelerator is fed by the outbound channel and drained by the
/// inbound channel. Each channel has its own interrupt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Memory to accelerator (MM2S)
    Outbound,
    /// Accelerator to memory (S2MM)
    Inbound,
}

impl Channel {
    /// Both channels, outbound first
    pub const ALL: [Channel; 2] = [Channel::Outbound, Channel::Inbound];
}

/// A channel's interrupt sources
///
/// The bit positions match the AXI DMA status and control registers,
/// shifted down to start at bit 0.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Irq(u32);

impl Irq {
    /// No interrupt source
    pub const NONE: Irq = Irq(0);
    /// Interrupt on complete
    pub const COMPLETE: Irq = Irq(1 << 0);
    /// Interrupt on delay timeout
    ///
    /// This driver never enables it, but it may still appear in a raw status.
    pub const DELAY: Irq = Irq(1 << 1);
    /// Interrupt on error
    pub const ERROR: Irq = Irq(1 << 2);
    /// Every interrupt source
    pub const ALL: Irq = Irq(0b111);

    /// Create an interrupt set from raw bits
    ///
    /// Bits outside of [`ALL`](Irq::ALL) are dropped.
    pub const fn from_bits(bits: u32) -> Self {
        Irq(bits & Irq::ALL.0)
    }

    /// Returns the raw bits
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if no source is set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every source in `other` is also set in `self`
    pub const fn contains(self, other: Irq) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the sources set in either `self` or `other`
    pub const fn union(self, other: Irq) -> Irq {
        Irq(self.0 | other.0)
    }
}

impl BitOr for Irq {
    type Output = Irq;
    fn bitor(self, rhs: Irq) -> Irq {
        Irq(self.0 | rhs.0)
    }
}

impl Debug for Irq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Irq {{ complete: {}, delay: {}, error: {} }}",
            self.contains(Irq::COMPLETE),
            self.contains(Irq::DELAY),
            self.contains(Irq::ERROR),
        )
    }
}
