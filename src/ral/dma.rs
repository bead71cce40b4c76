//! AXI DMA register blocks and fields
//!
//! Direct register (simple) mode only. The MM2S and S2MM channels
//! share one layout; the S2MM block starts at offset 0x30.

use super::RWRegister;

/// AXI DMA registers.
#[repr(C)]
pub struct RegisterBlock {
    /// Memory-map to stream (outbound) channel
    pub MM2S: channel::RegisterBlock,
    /// Stream to memory-map (inbound) channel
    pub S2MM: channel::RegisterBlock,
}

const _: () = assert!(core::mem::offset_of!(RegisterBlock, S2MM) == 0x30);

/// One direction of the AXI DMA.
pub mod channel {
    use super::RWRegister;

    #[repr(C)]
    pub struct RegisterBlock {
        /// Control Register
        pub DMACR: RWRegister<u32>,
        /// Status Register
        pub DMASR: RWRegister<u32>,
        _reserved0: [u32; 4],
        /// Source (MM2S) or destination (S2MM) address
        pub ADDR: RWRegister<u32>,
        /// Upper 32 bits of the address, when addressing is wider than 32 bits
        pub ADDR_MSB: RWRegister<u32>,
        _reserved1: [u32; 2],
        /// Transfer length in bytes. Writing a non-zero value starts the transfer.
        pub LENGTH: RWRegister<u32>,
        _reserved2: [u32; 1],
    }

    const _: () = assert!(core::mem::offset_of!(RegisterBlock, ADDR) == 0x18);
    const _: () = assert!(core::mem::offset_of!(RegisterBlock, LENGTH) == 0x28);
    const _: () = assert!(core::mem::size_of::<RegisterBlock>() == 0x30);

    pub mod DMACR {
        fields! {
            RS: 0, 1;
            RESET: 2, 1;
            IRQ_EN: 12, 3;
        }
    }

    pub mod DMASR {
        fields! {
            HALTED: 0, 1;
            IDLE: 1, 1;
            SG_INCLD: 3, 1;
            IRQ: 12, 3;
        }
    }
}
